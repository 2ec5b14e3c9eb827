//! Streamcue feature modules
//!
//! Each module is a self-contained file. To add one: create the file,
//! implement the capability roles it needs, and list it in [`boot_plan`].
//! Order in the roster is load-bearing - wiring side effects are visible
//! only to modules that come later.

pub mod client_fallback_detector;
pub mod dashboard;
pub mod database_finder;
pub mod first_run;
pub mod game_path_resolver;
pub mod library_watcher;
pub mod map_info;
pub mod mod_badges;
pub mod mod_parser;
pub mod no_data_finder;
pub mod pattern_formatter;
pub mod play_stats;
pub mod save_location;
pub mod status_panel;

use std::sync::{Arc, OnceLock};
use streamcue_core::{Error, Result};
use streamcue_runtime::{BootPlan, NowPlayingHub};

/// The declared module list.
pub fn boot_plan(hub: Arc<NowPlayingHub>) -> BootPlan {
    BootPlan {
        first_run: Some(Box::new(first_run::FirstRun::bootstrap)),
        roster: Box::new(move || {
            vec![
                game_path_resolver::GamePathResolver::entry(),
                client_fallback_detector::ClientFallbackDetector::entry(),
                pattern_formatter::PatternFormatter::entry(),
                status_panel::StatusPanel::entry(),
                play_stats::PlayStatsReplacements::entry(),
                map_info::MapInfoReplacements::entry(),
                library_watcher::LibraryWatcher::entry(hub),
                save_location::SaveLocationProvider::entry(),
                database_finder::DatabaseFinder::entry(),
                no_data_finder::NoDataFinder::entry(),
                mod_parser::StandardModParser::entry(),
                mod_badges::ModBadgeGenerator::entry(),
                dashboard::Dashboard::entry(),
            ]
        }),
    }
}

/// Fetch a wired-in handle, with a uniform error when wiring never happened.
pub(crate) fn handle<'a, T>(
    slot: &'a OnceLock<Arc<T>>,
    module: &'static str,
    what: &str,
) -> Result<&'a Arc<T>> {
    slot.get()
        .ok_or_else(|| Error::module(module, format!("{what} handle was never delivered")))
}
