// Validation errors raised by the template model.
// All are recoverable input errors, never system faults: the model raises
// them to the caller and leaves its state untouched.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// `add_deployment` with a name already in the deployment set.
    #[error("There is already a deployment named {0}.")]
    DuplicateDeployment(String),

    /// `add_object` with a name already taken by another entry.
    #[error("Template already has an object named {0}.")]
    DuplicateEntry(String),

    /// `add_object` with the umbrella `Resource` tag. The umbrella is not a
    /// creatable leaf; callers must pick a concrete resource subtype.
    #[error("Select a specific kind of resource to create.")]
    InvalidKind,

    /// `add_object` with a kind that is not a node of the taxonomy.
    #[error("No such kind: {0}.")]
    UnknownKind(String),

    /// `add_object` into a deployment that was never registered.
    #[error("No such deployment: {0}.")]
    UnknownDeployment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        assert_eq!(
            ModelError::DuplicateDeployment("stress-set".to_string()).to_string(),
            "There is already a deployment named stress-set."
        );
        assert_eq!(
            ModelError::DuplicateEntry("ring-size".to_string()).to_string(),
            "Template already has an object named ring-size."
        );
        assert_eq!(
            ModelError::UnknownKind("Gateway".to_string()).to_string(),
            "No such kind: Gateway."
        );
        assert_eq!(
            ModelError::UnknownDeployment("prod".to_string()).to_string(),
            "No such deployment: prod."
        );
    }

    #[test]
    fn test_umbrella_kind_message() {
        assert_eq!(
            ModelError::InvalidKind.to_string(),
            "Select a specific kind of resource to create."
        );
    }
}
