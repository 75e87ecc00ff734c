// ARM Maker - Core Library
// The in-memory template model: entries, deployments, the kind taxonomy,
// and the subscribe/notify contract the browser builds on.

pub mod entry;
pub mod error;
pub mod kinds;
pub mod model;
pub mod observer;

// Re-export commonly used types
pub use entry::TemplateEntry;
pub use error::ModelError;
pub use kinds::KindNode;
pub use model::TemplateModel;
pub use observer::{ModelObserver, ObserverSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
