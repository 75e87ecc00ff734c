// Template Model - the single source of truth
//
// Owns the entry map, the deployment set, and the fixed kind taxonomy.
// Browsers never hold authoritative state; they read the queries here,
// issue the mutations, and get called back through the observer set.
//
// Single-threaded by contract: operations are synchronous, non-blocking
// dictionary work on small in-memory collections, with no internal locking.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::entry::TemplateEntry;
use crate::error::ModelError;
use crate::kinds::{self, KindNode};
use crate::observer::{ModelObserver, ObserverSet};

// ============================================================================
// MODEL
// ============================================================================

pub struct TemplateModel {
    /// All entries, keyed by their unique name. BTreeMap keeps the `objects`
    /// query sorted without re-sorting per call.
    entries: BTreeMap<String, TemplateEntry>,

    /// All known deployment names, sorted.
    deployments: BTreeSet<String>,

    /// The immutable kind taxonomy.
    kinds: Vec<KindNode>,

    observers: ObserverSet,
}

impl TemplateModel {
    /// A model pre-populated with the example template: three entries under
    /// `<default>`, one under `stress-set`. The deployment set is derived
    /// from the deployments the seed entries reference.
    pub fn new() -> Self {
        let seed = [
            TemplateEntry::new("<default>", kinds::classes_for("Parameter"), "ring-size"),
            TemplateEntry::new(
                "<default>",
                vec!["Resource".to_string(), "VNet".to_string()],
                "cassandra-vnet",
            ),
            TemplateEntry::new(
                "<default>",
                vec!["Resource".to_string(), "Network Security Group".to_string()],
                "cassandra-nsg",
            ),
            TemplateEntry::new("stress-set", kinds::classes_for("Parameter"), "data-subnet"),
        ];

        let deployments = seed.iter().map(|entry| entry.deployment.clone()).collect();
        let entries = seed
            .into_iter()
            .map(|entry| (entry.name.clone(), entry))
            .collect();

        TemplateModel {
            entries,
            deployments,
            kinds: kinds::builtin(),
            observers: ObserverSet::new(),
        }
    }

    /// Backing file of this template. Persistence is unimplemented, so there
    /// is never one.
    pub fn filename(&self) -> Option<&str> {
        None
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// All known deployment names, lexicographically sorted.
    pub fn deployments(&self) -> Vec<String> {
        self.deployments.iter().cloned().collect()
    }

    /// The static kind hierarchy. Constant across calls.
    pub fn kinds(&self) -> &[KindNode] {
        &self.kinds
    }

    /// Look up a single entry by its unique name.
    pub fn entry(&self, name: &str) -> Option<&TemplateEntry> {
        self.entries.get(name)
    }

    /// Names of every entry whose deployment is selected, whose classes share
    /// at least one tag with the selected kinds, and whose name contains
    /// `filter_text` as a contiguous substring. Sorted, pure.
    pub fn objects(
        &self,
        selected_deployments: &BTreeSet<String>,
        selected_kinds: &BTreeSet<String>,
        filter_text: &str,
    ) -> Vec<String> {
        self.entries
            .values()
            .filter(|entry| entry.matches(selected_deployments, selected_kinds, filter_text))
            .map(|entry| entry.name.clone())
            .collect()
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Register a new deployment name. Fails on a duplicate; on success the
    /// set stays sorted and every observer is notified once.
    pub fn add_deployment(&mut self, name: &str) -> Result<(), ModelError> {
        if self.deployments.contains(name) {
            return Err(ModelError::DuplicateDeployment(name.to_string()));
        }
        self.deployments.insert(name.to_string());
        self.update();
        Ok(())
    }

    /// Create a new entry of `kind` under `deployment`. Validation order:
    /// unique name, concrete (non-umbrella) kind, kind present in the
    /// taxonomy, known deployment. Succeeds or fails atomically; observers
    /// are notified exactly once on success, not at all on failure.
    pub fn add_object(
        &mut self,
        deployment: &str,
        kind: &str,
        name: &str,
    ) -> Result<(), ModelError> {
        if self.entries.contains_key(name) {
            return Err(ModelError::DuplicateEntry(name.to_string()));
        }
        if kind == kinds::RESOURCE {
            return Err(ModelError::InvalidKind);
        }
        if !kinds::contains(&self.kinds, kind) {
            return Err(ModelError::UnknownKind(kind.to_string()));
        }
        if !self.deployments.contains(deployment) {
            return Err(ModelError::UnknownDeployment(deployment.to_string()));
        }

        let entry = TemplateEntry::new(deployment, kinds::classes_for(kind), name);
        self.entries.insert(name.to_string(), entry);
        self.update();
        Ok(())
    }

    // ========================================================================
    // OBSERVERS
    // ========================================================================

    /// Register an observer. Idempotent for the same handle.
    pub fn subscribe(&mut self, observer: &Rc<dyn ModelObserver>) {
        self.observers.subscribe(observer);
    }

    /// Remove an observer. No-op if it was never subscribed.
    pub fn unsubscribe(&mut self, observer: &Rc<dyn ModelObserver>) {
        self.observers.unsubscribe(observer);
    }

    /// Notify every subscribed observer, synchronously. Mutations call this
    /// after committing; callers may also invoke it as a manual refresh.
    pub fn update(&self) {
        self.observers.notify();
    }

    /// Count of live observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl Default for TemplateModel {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
