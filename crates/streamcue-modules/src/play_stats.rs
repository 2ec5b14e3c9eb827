//! Session play counters exposed as replacement tokens

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use streamcue_core::{ClientStatus, MapSearchResult, NowPlayingEvent, Result, TokenMap};
use streamcue_runtime::{MapReplacementProvider, Module, ModuleEntry, PipelineSink};

pub struct PlayStatsReplacements {
    plays: AtomicU64,
    session_start: DateTime<Utc>,
}

impl PlayStatsReplacements {
    pub fn entry() -> ModuleEntry {
        let module = Arc::new(Self {
            plays: AtomicU64::new(0),
            session_start: Utc::now(),
        });
        ModuleEntry::new(Arc::clone(&module))
            .with_map_replacement_provider(Arc::clone(&module) as Arc<dyn MapReplacementProvider>)
            .with_pipeline_sink(module)
    }

    pub fn plays(&self) -> u64 {
        self.plays.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Module for PlayStatsReplacements {
    fn name(&self) -> &'static str {
        "play-stats"
    }

    async fn start(&self) -> Result<()> {
        Ok(())
    }
}

impl PipelineSink for PlayStatsReplacements {
    fn handle_event(&self, event: &NowPlayingEvent) {
        if event.status == ClientStatus::Playing {
            self.plays.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl MapReplacementProvider for PlayStatsReplacements {
    fn map_replacements(&self, _result: &MapSearchResult) -> TokenMap {
        let mut tokens = TokenMap::new();
        tokens.insert("plays".into(), self.plays().to_string());
        tokens.insert(
            "sessionStart".into(),
            self.session_start.format("%H:%M").to_string(),
        );
        tokens
    }
}
