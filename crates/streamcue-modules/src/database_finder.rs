//! Resolves live events against the shared track database

use async_trait::async_trait;
use std::sync::{Arc, OnceLock};
use streamcue_core::{Database, MapSearchResult, ModSet, NowPlayingEvent, Result};
use streamcue_runtime::{DatabaseConsumer, MapDataFinder, Module, ModuleEntry};
use tracing::warn;

pub struct DatabaseFinder {
    database: OnceLock<Arc<Database>>,
}

impl DatabaseFinder {
    pub fn entry() -> ModuleEntry {
        let module = Arc::new(Self {
            database: OnceLock::new(),
        });
        ModuleEntry::new(Arc::clone(&module))
            .with_map_data_finder(Arc::clone(&module) as Arc<dyn MapDataFinder>)
            .with_database_consumer(module)
    }
}

#[async_trait]
impl Module for DatabaseFinder {
    fn name(&self) -> &'static str {
        "database-finder"
    }

    async fn start(&self) -> Result<()> {
        Ok(())
    }
}

impl MapDataFinder for DatabaseFinder {
    fn find_map_data(&self, event: &NowPlayingEvent) -> Option<MapSearchResult> {
        let database = self.database.get()?;
        let (body, mods) = split_mod_suffix(&event.raw);
        match database.match_raw(body) {
            Ok(Some(track)) => Some(MapSearchResult::resolved(
                event,
                track.artist,
                track.title,
                track.difficulty,
                mods,
            )),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "database lookup failed");
                None
            }
        }
    }
}

impl DatabaseConsumer for DatabaseFinder {
    fn set_database(&self, database: Arc<Database>) {
        let _ = self.database.set(database);
    }
}

/// "Artist - Title +HDDT" splits into the lookup body and a mod set. A '+'
/// that is not followed by known codes stays part of the body.
fn split_mod_suffix(raw: &str) -> (&str, ModSet) {
    match raw.rsplit_once('+') {
        Some((body, codes)) if !codes.trim().is_empty() => {
            let mods = ModSet::parse_codes(codes);
            if mods.is_empty() {
                (raw, ModSet::NONE)
            } else {
                (body.trim_end(), mods)
            }
        }
        _ => (raw, ModSet::NONE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_with_known_codes_is_split_off() {
        let (body, mods) = split_mod_suffix("Vega - Afterglow +HDDT");
        assert_eq!(body, "Vega - Afterglow");
        assert_eq!(mods, ModSet::HIDDEN | ModSet::DOUBLE_TIME);
    }

    #[test]
    fn plus_inside_a_title_is_left_alone() {
        let (body, mods) = split_mod_suffix("C+ - Integral");
        assert_eq!(body, "C+ - Integral");
        assert!(mods.is_empty());
    }

    #[test]
    fn no_suffix_means_no_mods() {
        let (body, mods) = split_mod_suffix("Vega - Afterglow");
        assert_eq!(body, "Vega - Afterglow");
        assert!(mods.is_empty());
    }
}
