//! Artist/title/difficulty/status tokens from the search result
//!
//! For an unresolved result the raw string stands in for the title, so
//! output patterns still show something useful.

use async_trait::async_trait;
use std::sync::Arc;
use streamcue_core::{MapSearchResult, Result, TokenMap};
use streamcue_runtime::{MapReplacementProvider, Module, ModuleEntry};

pub struct MapInfoReplacements;

impl MapInfoReplacements {
    pub fn entry() -> ModuleEntry {
        let module = Arc::new(Self);
        ModuleEntry::new(Arc::clone(&module)).with_map_replacement_provider(module)
    }
}

#[async_trait]
impl Module for MapInfoReplacements {
    fn name(&self) -> &'static str {
        "map-info"
    }

    async fn start(&self) -> Result<()> {
        Ok(())
    }
}

impl MapReplacementProvider for MapInfoReplacements {
    fn map_replacements(&self, result: &MapSearchResult) -> TokenMap {
        let title = result.title.clone().unwrap_or_else(|| {
            if result.found {
                String::new()
            } else {
                result.raw.clone()
            }
        });
        let mut tokens = TokenMap::new();
        tokens.insert(
            "artist".into(),
            result.artist.clone().unwrap_or_default(),
        );
        tokens.insert("title".into(), title);
        tokens.insert(
            "difficulty".into(),
            result.difficulty.clone().unwrap_or_default(),
        );
        tokens.insert("status".into(), result.status.to_string());
        tokens
    }
}
