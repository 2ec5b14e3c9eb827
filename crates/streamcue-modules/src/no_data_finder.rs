//! Terminal fallback finder - always answers, reports nothing found
//!
//! Must stay last in the finder order so real finders get their chance.

use async_trait::async_trait;
use std::sync::Arc;
use streamcue_core::{MapSearchResult, NowPlayingEvent, Result};
use streamcue_runtime::{MapDataFinder, Module, ModuleEntry};

pub struct NoDataFinder;

impl NoDataFinder {
    pub fn entry() -> ModuleEntry {
        let module = Arc::new(Self);
        ModuleEntry::new(Arc::clone(&module)).with_map_data_finder(module)
    }
}

#[async_trait]
impl Module for NoDataFinder {
    fn name(&self) -> &'static str {
        "no-data-finder"
    }

    async fn start(&self) -> Result<()> {
        Ok(())
    }
}

impl MapDataFinder for NoDataFinder {
    fn find_map_data(&self, event: &NowPlayingEvent) -> Option<MapSearchResult> {
        Some(MapSearchResult::not_found(event))
    }
}
