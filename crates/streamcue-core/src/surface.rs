//! Shared output-surface handle
//!
//! Modules push named panels here; whatever shell embeds the runtime decides
//! how (and whether) to render them. No rendering happens in this crate.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

#[derive(Default)]
pub struct OutputSurface {
    panels: RwLock<BTreeMap<String, String>>,
}

impl OutputSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, key: impl Into<String>, value: impl Into<String>) {
        self.panels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.panels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.panels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
