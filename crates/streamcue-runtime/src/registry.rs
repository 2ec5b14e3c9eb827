//! Module registry - insertion-ordered, one instance per concrete type

use crate::module::ModuleEntry;
use tracing::{debug, error};

#[derive(Default)]
pub struct ModuleRegistry {
    entries: Vec<ModuleEntry>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry` unless a module of the same concrete type is already
    /// registered. A duplicate is not an error: the entry is dropped and the
    /// caller learns about it from the return value.
    pub fn add(&mut self, entry: ModuleEntry) -> bool {
        if self.entries.iter().any(|e| e.type_id() == entry.type_id()) {
            debug!(module = entry.module().name(), "duplicate module type ignored");
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// The most recently added entry.
    pub fn last(&self) -> Option<&ModuleEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best-effort teardown sweep: every registered module's `stop` is
    /// attempted, in registration order, even when an earlier one fails.
    pub async fn shutdown(&self) {
        for entry in &self.entries {
            if let Err(e) = entry.module().stop().await {
                error!(module = entry.module().name(), error = %e, "teardown failed");
            }
        }
    }
}
