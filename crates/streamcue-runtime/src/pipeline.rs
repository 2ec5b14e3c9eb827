//! Live-state pipeline: event fan-out and map-data routing

use crate::collections::{RoleCollections, RoleList};
use crate::module::PipelineSink;
use std::sync::Arc;
use streamcue_core::{MapSearchResult, NowPlayingEvent, Saver, TokenMap};
use tracing::{debug, warn};

/// Fan-out point for live events. Whatever tracks the client calls
/// [`NowPlayingHub::dispatch`]; every registered sink sees the event, in
/// registration order.
pub struct NowPlayingHub {
    sinks: RoleList<dyn PipelineSink>,
}

impl NowPlayingHub {
    pub fn new(sinks: RoleList<dyn PipelineSink>) -> Self {
        Self { sinks }
    }

    pub fn dispatch(&self, event: &NowPlayingEvent) {
        for sink in self.sinks.snapshot() {
            sink.handle_event(event);
        }
    }
}

/// Drives one event through the role collections: the first finder to answer
/// wins, every replacement provider contributes tokens, every parser formats,
/// every getter is told, and the primary line lands in the save directory.
///
/// The router holds live collection handles, not snapshots - it is installed
/// before any module is wired, and modules wired afterwards still take part.
pub struct MapDataRouter {
    collections: RoleCollections,
    saver: Arc<Saver>,
}

impl MapDataRouter {
    pub fn new(collections: RoleCollections, saver: Arc<Saver>) -> Self {
        Self { collections, saver }
    }

    pub fn process(&self, event: &NowPlayingEvent) {
        let Some(result) = self.find(event) else {
            debug!(raw = %event.raw, "no finder produced a result");
            return;
        };

        let mut tokens = base_tokens(&result);
        for provider in self.collections.map_replacers.snapshot() {
            tokens.extend(provider.map_replacements(&result));
        }

        let mut formatted = Vec::new();
        for parser in self.collections.map_parsers.snapshot() {
            formatted.extend(parser.format_map_data(&result, &tokens));
        }

        for getter in self.collections.map_getters.snapshot() {
            getter.set_new_map(&result, &formatted);
        }

        if let Some(primary) = formatted.first() {
            if let Err(e) = self.saver.save("nowplaying.txt", &primary.line) {
                warn!(error = %e, "failed to write nowplaying artifact");
            }
        }
    }

    fn find(&self, event: &NowPlayingEvent) -> Option<MapSearchResult> {
        for finder in self.collections.map_finders.snapshot() {
            if let Some(result) = finder.find_map_data(event) {
                return Some(result);
            }
        }
        None
    }
}

fn base_tokens(result: &MapSearchResult) -> TokenMap {
    let mut tokens = TokenMap::new();
    tokens.insert("raw".into(), result.raw.clone());
    tokens.insert("mods".into(), result.mods.to_string());
    tokens
}

/// The built-in pipeline sink. The orchestrator installs it before any
/// module is wired, so it is always first in dispatch order.
pub struct NowPlayingFormatter {
    router: MapDataRouter,
}

impl NowPlayingFormatter {
    pub fn new(router: MapDataRouter) -> Self {
        Self { router }
    }
}

impl PipelineSink for NowPlayingFormatter {
    fn handle_event(&self, event: &NowPlayingEvent) {
        self.router.process(event);
    }
}
