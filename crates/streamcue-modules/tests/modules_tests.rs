//! Tests for the feature modules, wired through a real Wirer so capability
//! delivery happens the same way it does at boot.

use std::sync::{Arc, Mutex};
use streamcue_core::{
    ClientStatus, Database, MapSearchResult, ModSet, NowPlayingEvent, OutputSurface, Saver,
    Settings,
};
use streamcue_modules::client_fallback_detector::{ClientFallbackDetector, LEGACY_CLIENT_KEY};
use streamcue_modules::dashboard::Dashboard;
use streamcue_modules::database_finder::DatabaseFinder;
use streamcue_modules::first_run::FirstRun;
use streamcue_modules::game_path_resolver::{GamePathResolver, CLIENT_PATH_KEY};
use streamcue_modules::library_watcher::{LibraryWatcher, LIBRARY_DIR_KEY};
use streamcue_modules::map_info::MapInfoReplacements;
use streamcue_modules::mod_badges::{
    badge_positions, BadgeGeometry, DrawDirection, DrawSide, ModBadgeGenerator,
};
use streamcue_modules::mod_parser::{StandardModParser, SHORT_MOD_NAMES_KEY};
use streamcue_modules::no_data_finder::NoDataFinder;
use streamcue_modules::pattern_formatter::{PatternFormatter, PATTERNS_KEY};
use streamcue_runtime::{
    MapDataFinder, MapDataParser, MapReplacementProvider, ModParser, Module, NowPlayingHub,
    PipelineSink, Wirer,
};

struct Fixture {
    settings: Arc<Settings>,
    saver: Arc<Saver>,
    surface: Arc<OutputSurface>,
    wirer: Wirer,
}

fn fixture(dir: &std::path::Path) -> Fixture {
    let settings = Arc::new(Settings::new());
    let saver = Arc::new(Saver::new(dir).unwrap());
    let surface = Arc::new(OutputSurface::new());
    let wirer = Wirer::new(
        Arc::clone(&settings),
        Arc::clone(&saver),
        Arc::clone(&surface),
    );
    Fixture {
        settings,
        saver,
        surface,
        wirer,
    }
}

#[derive(Default)]
struct CollectSink {
    events: Mutex<Vec<NowPlayingEvent>>,
}

impl PipelineSink for CollectSink {
    fn handle_event(&self, event: &NowPlayingEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ===========================================================================
// Badge layout
// ===========================================================================

fn geometry(side: DrawSide, direction: DrawDirection) -> BadgeGeometry {
    BadgeGeometry {
        image_width: 720,
        badge_width: 64,
        badge_height: 64,
        spacing: -25,
        opacity_pct: 85,
        side,
        direction,
    }
}

#[test]
fn badge_positions_left_to_right() {
    let geo = geometry(DrawSide::Left, DrawDirection::LeftToRight);
    assert_eq!(badge_positions(3, &geo), vec![0, 39, 78]);
}

#[test]
fn badge_positions_left_anchored_right_to_left() {
    let geo = geometry(DrawSide::Left, DrawDirection::RightToLeft);
    // strip width is 3 * 39 + 25 = 142
    assert_eq!(badge_positions(3, &geo), vec![78, 39, 0]);
}

#[test]
fn badge_positions_right_anchored() {
    let rtl = geometry(DrawSide::Right, DrawDirection::RightToLeft);
    assert_eq!(badge_positions(3, &rtl), vec![656, 617, 578]);

    let ltr = geometry(DrawSide::Right, DrawDirection::LeftToRight);
    assert_eq!(badge_positions(3, &ltr), vec![578, 617, 656]);
}

#[test]
fn badge_positions_single_badge_and_empty() {
    let geo = geometry(DrawSide::Right, DrawDirection::LeftToRight);
    assert_eq!(badge_positions(1, &geo), vec![656]);
    assert!(badge_positions(0, &geo).is_empty());
}

// ===========================================================================
// Pattern formatter
// ===========================================================================

#[tokio::test]
async fn pattern_formatter_seeds_defaults_and_formats_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let f = fixture(dir.path());

    f.wirer.wire(&PatternFormatter::entry()).await.unwrap();
    assert!(f.settings.contains(PATTERNS_KEY));

    let parser = f.wirer.collections().map_parsers.snapshot()[0].clone();
    let event = NowPlayingEvent::new("x", ClientStatus::Playing);
    let result = MapSearchResult::resolved(&event, "Vega", "Afterglow", "Hard", ModSet::HIDDEN);

    let mut tokens = streamcue_core::TokenMap::new();
    tokens.insert("artist".into(), "Vega".into());
    tokens.insert("title".into(), "Afterglow".into());
    tokens.insert("difficulty".into(), "Hard".into());
    tokens.insert("mods".into(), "HD".into());
    tokens.insert("status".into(), "playing".into());

    let formatted = parser.format_map_data(&result, &tokens);
    let nowplaying = formatted.iter().find(|f| f.name == "nowplaying").unwrap();
    assert_eq!(nowplaying.line, "Vega - Afterglow [Hard] HD");
    let status = formatted.iter().find(|f| f.name == "status").unwrap();
    assert_eq!(status.line, "playing");
}

// ===========================================================================
// Mod parser
// ===========================================================================

#[tokio::test]
async fn mod_parser_honors_the_short_names_flag() {
    let dir = tempfile::tempdir().unwrap();
    let f = fixture(dir.path());

    f.wirer.wire(&StandardModParser::entry()).await.unwrap();
    let parser = f.wirer.collections().mod_parsers.snapshot()[0].clone();

    let mods = ModSet::HIDDEN | ModSet::DOUBLE_TIME;
    assert_eq!(parser.mods_to_string(mods), "HDDT");

    f.settings.set(SHORT_MOD_NAMES_KEY, false);
    assert_eq!(parser.mods_to_string(mods), "Hidden, DoubleTime");

    assert_eq!(parser.parse_mods("hddt"), mods);
    assert_eq!(parser.mods_to_string(ModSet::NONE), "");
}

// ===========================================================================
// Finders
// ===========================================================================

#[tokio::test]
async fn database_finder_resolves_tracks_and_mod_suffixes() {
    let dir = tempfile::tempdir().unwrap();
    let f = fixture(dir.path());

    let database = Arc::new(Database::open_in_memory().unwrap());
    database.insert_track("Vega", "Afterglow", "Insane").unwrap();
    f.wirer.install_database(database);

    f.wirer.wire(&DatabaseFinder::entry()).await.unwrap();
    let finder = f.wirer.collections().map_finders.snapshot()[0].clone();

    let event = NowPlayingEvent::new("Vega - Afterglow +HD", ClientStatus::Playing);
    let result = finder.find_map_data(&event).unwrap();
    assert!(result.found);
    assert_eq!(result.difficulty.as_deref(), Some("Insane"));
    assert_eq!(result.mods, ModSet::HIDDEN);

    let miss = NowPlayingEvent::new("Unknown - Song", ClientStatus::Playing);
    assert!(finder.find_map_data(&miss).is_none());
}

#[test]
fn no_data_finder_always_answers_with_not_found() {
    let event = NowPlayingEvent::new("mystery", ClientStatus::Browsing);
    let result = NoDataFinder.find_map_data(&event).unwrap();
    assert!(!result.found);
    assert_eq!(result.raw, "mystery");
}

// ===========================================================================
// Replacements
// ===========================================================================

#[test]
fn map_info_uses_raw_as_title_when_unresolved() {
    let event = NowPlayingEvent::new("mystery", ClientStatus::Idle);
    let tokens = MapInfoReplacements.map_replacements(&MapSearchResult::not_found(&event));
    assert_eq!(tokens.get("title").map(String::as_str), Some("mystery"));
    assert_eq!(tokens.get("artist").map(String::as_str), Some(""));
    assert_eq!(tokens.get("status").map(String::as_str), Some("idle"));
}

#[test]
fn map_info_prefers_resolved_fields() {
    let event = NowPlayingEvent::new("Vega - Afterglow", ClientStatus::Playing);
    let result = MapSearchResult::resolved(&event, "Vega", "Afterglow", "Hard", ModSet::NONE);
    let tokens = MapInfoReplacements.map_replacements(&result);
    assert_eq!(tokens.get("artist").map(String::as_str), Some("Vega"));
    assert_eq!(tokens.get("difficulty").map(String::as_str), Some("Hard"));
}

#[tokio::test]
async fn play_stats_count_playing_events_only() {
    let dir = tempfile::tempdir().unwrap();
    let f = fixture(dir.path());

    f.wirer
        .wire(&streamcue_modules::play_stats::PlayStatsReplacements::entry())
        .await
        .unwrap();
    let sink = f.wirer.collections().pipeline_sinks.snapshot()[0].clone();
    let replacer = f.wirer.collections().map_replacers.snapshot()[0].clone();

    sink.handle_event(&NowPlayingEvent::new("a", ClientStatus::Playing));
    sink.handle_event(&NowPlayingEvent::new("b", ClientStatus::Browsing));
    sink.handle_event(&NowPlayingEvent::new("c", ClientStatus::Playing));

    let event = NowPlayingEvent::new("c", ClientStatus::Playing);
    let tokens = replacer.map_replacements(&MapSearchResult::not_found(&event));
    assert_eq!(tokens.get("plays").map(String::as_str), Some("2"));
    assert!(tokens.contains_key("sessionStart"));
}

// ===========================================================================
// Mod badges
// ===========================================================================

#[tokio::test]
async fn mod_badges_write_a_descriptor_for_existing_icons() {
    let dir = tempfile::tempdir().unwrap();
    let f = fixture(dir.path());

    // parser wired first so the badge module's snapshot contains it
    f.wirer.wire(&StandardModParser::entry()).await.unwrap();
    f.wirer.wire(&ModBadgeGenerator::entry()).await.unwrap();

    let badge_dir = f.saver.dir().join("badges");
    assert!(badge_dir.join("README.txt").exists());
    std::fs::write(badge_dir.join("HD.png"), b"png").unwrap();
    std::fs::write(badge_dir.join("DT.png"), b"png").unwrap();

    let replacer = f.wirer.collections().map_replacers.snapshot()[0].clone();
    let event = NowPlayingEvent::new("x", ClientStatus::Playing);
    let result = MapSearchResult::resolved(
        &event,
        "Vega",
        "Afterglow",
        "Hard",
        ModSet::HIDDEN | ModSet::DOUBLE_TIME,
    );
    let tokens = replacer.map_replacements(&result);
    assert!(tokens.contains_key("modBadges"));

    let body = std::fs::read_to_string(f.saver.dir().join("mod_badges.json")).unwrap();
    let descriptor: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(descriptor["label"], "HDDT");
    assert_eq!(descriptor["width"], 720);
    let badges = descriptor["badges"].as_array().unwrap();
    assert_eq!(badges.len(), 2);
    assert_eq!(badges[0]["x"], 0);
    assert_eq!(badges[1]["x"], 39);
}

#[tokio::test]
async fn mod_badges_skip_unresolved_results() {
    let dir = tempfile::tempdir().unwrap();
    let f = fixture(dir.path());
    f.wirer.wire(&ModBadgeGenerator::entry()).await.unwrap();

    let replacer = f.wirer.collections().map_replacers.snapshot()[0].clone();
    let event = NowPlayingEvent::new("mystery", ClientStatus::Idle);
    let tokens = replacer.map_replacements(&MapSearchResult::not_found(&event));
    assert!(tokens.is_empty());
}

// ===========================================================================
// Settings-driven modules
// ===========================================================================

#[tokio::test]
async fn fallback_detector_flags_a_legacy_marker() {
    let dir = tempfile::tempdir().unwrap();
    let client = tempfile::tempdir().unwrap();
    std::fs::write(client.path().join("fallback.cfg"), "legacy").unwrap();

    let f = fixture(dir.path());
    f.settings
        .set(CLIENT_PATH_KEY, client.path().display().to_string());

    f.wirer
        .wire(&ClientFallbackDetector::entry())
        .await
        .unwrap();
    assert!(f.settings.get(LEGACY_CLIENT_KEY, false));
}

#[tokio::test]
async fn path_resolver_keeps_a_valid_configured_path() {
    let dir = tempfile::tempdir().unwrap();
    let client = tempfile::tempdir().unwrap();

    let f = fixture(dir.path());
    let configured = client.path().display().to_string();
    f.settings.set(CLIENT_PATH_KEY, configured.clone());

    f.wirer.wire(&GamePathResolver::entry()).await.unwrap();
    assert_eq!(f.settings.get(CLIENT_PATH_KEY, String::new()), configured);
}

#[tokio::test]
async fn first_run_completes_only_with_a_valid_client_path() {
    let dir = tempfile::tempdir().unwrap();
    let client = tempfile::tempdir().unwrap();

    let f = fixture(dir.path());
    f.settings
        .set(CLIENT_PATH_KEY, client.path().display().to_string());
    let bootstrap = FirstRun::bootstrap();
    f.wirer.wire(&bootstrap.entry).await.unwrap();
    assert!(bootstrap.handle.completed_successfully());
    assert!(bootstrap.handle.follow_up().is_some());

    let other = tempfile::tempdir().unwrap();
    let g = fixture(other.path());
    g.settings.set(CLIENT_PATH_KEY, "/definitely/not/here");
    let failing = FirstRun::bootstrap();
    g.wirer.wire(&failing.entry).await.unwrap();
    assert!(!failing.handle.completed_successfully());
}

// ===========================================================================
// Dashboard
// ===========================================================================

#[tokio::test]
async fn dashboard_lists_groups_registered_before_it_only() {
    let dir = tempfile::tempdir().unwrap();
    let f = fixture(dir.path());

    f.wirer.wire(&PatternFormatter::entry()).await.unwrap();
    f.wirer.wire(&Dashboard::entry()).await.unwrap();
    // provider wired after the dashboard stays invisible to it
    f.wirer.wire(&ModBadgeGenerator::entry()).await.unwrap();

    assert_eq!(
        f.surface.get("settings/groups").as_deref(),
        Some("Output patterns")
    );
    assert!(f.surface.get("app/version").is_some());
}

// ===========================================================================
// Library watcher
// ===========================================================================

#[tokio::test]
async fn library_watcher_reports_chart_changes_and_stops_on_teardown() {
    let dir = tempfile::tempdir().unwrap();
    let library = tempfile::tempdir().unwrap();
    std::fs::write(
        library.path().join("Vega - Afterglow [Hard].chart"),
        "chart data",
    )
    .unwrap();

    let f = fixture(dir.path());
    f.settings
        .set(LIBRARY_DIR_KEY, library.path().display().to_string());
    f.settings.set("libraryPollMs", 25u64);

    let sink = Arc::new(CollectSink::default());
    f.wirer
        .collections()
        .pipeline_sinks
        .push(Arc::clone(&sink) as _);
    let hub = Arc::new(NowPlayingHub::new(
        f.wirer.collections().pipeline_sinks.clone(),
    ));

    let entry = LibraryWatcher::entry(hub);
    f.wirer.wire(&entry).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(400)).await;
    {
        let events = sink.events.lock().unwrap();
        assert!(!events.is_empty());
        assert_eq!(events[0].raw, "Vega - Afterglow [Hard]");
        assert_eq!(events[0].status, ClientStatus::Editing);
    }

    entry.module().stop().await.unwrap();
}
