//! Tests for streamcue-core: settings store, saver, surface, database, types

use streamcue_core::*;

// ===========================================================================
// Settings
// ===========================================================================

#[test]
fn settings_get_returns_default_when_unset() {
    let settings = Settings::new();
    assert_eq!(settings.get("X", 720), 720);
}

#[test]
fn settings_get_records_the_default() {
    let settings = Settings::new();
    assert!(!settings.contains("X"));
    let _ = settings.get("X", 720);
    assert!(settings.contains("X"));
}

#[test]
fn settings_set_then_get_round_trips() {
    let settings = Settings::new();
    settings.set("X", 1080);
    assert_eq!(settings.get("X", 720), 1080);
}

#[test]
fn settings_wrong_shape_falls_back_to_default() {
    let settings = Settings::new();
    settings.set("X", "not a number");
    assert_eq!(settings.get("X", 720), 720);
    // the stored value is untouched
    assert_eq!(settings.get("X", String::new()), "not a number");
}

#[test]
fn settings_load_missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::new();
    assert!(settings.load(&dir.path().join("nope.json")).is_ok());
}

#[test]
fn settings_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let settings = Settings::new();
    settings.set_save_path(&path);
    settings.set("console", true);
    settings.set("width", 1280);
    settings.save().unwrap();

    let reloaded = Settings::new();
    reloaded.load(&path).unwrap();
    assert!(reloaded.get("console", false));
    assert_eq!(reloaded.get("width", 0), 1280);
}

#[test]
fn settings_save_without_path_reports_an_error() {
    let settings = Settings::new();
    assert!(matches!(settings.save(), Err(Error::Settings(_))));
}

// ===========================================================================
// Saver
// ===========================================================================

#[test]
fn saver_creates_the_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let saver = Saver::new(dir.path()).unwrap();
    assert!(saver.dir().is_dir());
}

#[test]
fn saver_writes_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let saver = Saver::new(dir.path()).unwrap();
    let path = saver.save("np.txt", "Vega - Afterglow").unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "Vega - Afterglow");
}

#[test]
fn saver_sub_dir_is_created_once() {
    let dir = tempfile::tempdir().unwrap();
    let saver = Saver::new(dir.path()).unwrap();
    let sub = saver.sub_dir("badges").unwrap();
    assert!(sub.is_dir());
    assert_eq!(saver.sub_dir("badges").unwrap(), sub);
}

// ===========================================================================
// OutputSurface
// ===========================================================================

#[test]
fn surface_publish_and_get() {
    let surface = OutputSurface::new();
    surface.publish("a", "1");
    surface.publish("a", "2");
    assert_eq!(surface.get("a").as_deref(), Some("2"));
    assert_eq!(surface.get("b"), None);
}

#[test]
fn surface_snapshot_is_sorted_by_key() {
    let surface = OutputSurface::new();
    surface.publish("b", "2");
    surface.publish("a", "1");
    let keys: Vec<String> = surface.snapshot().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["a", "b"]);
}

// ===========================================================================
// Database
// ===========================================================================

#[test]
fn database_match_raw_finds_contained_track() {
    let db = Database::open_in_memory().unwrap();
    db.insert_track("Vega", "Afterglow", "Insane").unwrap();

    let hit = db.match_raw("Vega - Afterglow [Insane]").unwrap();
    assert_eq!(
        hit,
        Some(TrackRecord {
            artist: "Vega".into(),
            title: "Afterglow".into(),
            difficulty: "Insane".into(),
        })
    );
}

#[test]
fn database_match_raw_misses_unknown_tracks() {
    let db = Database::open_in_memory().unwrap();
    db.insert_track("Vega", "Afterglow", "Insane").unwrap();
    assert_eq!(db.match_raw("Someone Else - Something").unwrap(), None);
}

#[test]
fn database_match_raw_prefers_the_longest_match() {
    let db = Database::open_in_memory().unwrap();
    db.insert_track("Vega", "After", "Easy").unwrap();
    db.insert_track("Vega", "Afterglow", "Insane").unwrap();

    let hit = db.match_raw("Vega - Afterglow").unwrap().unwrap();
    assert_eq!(hit.title, "Afterglow");
}

// ===========================================================================
// ModSet
// ===========================================================================

#[test]
fn mod_set_codes_in_canonical_order() {
    let mods = ModSet::DOUBLE_TIME | ModSet::HIDDEN;
    assert_eq!(mods.codes(), vec!["HD", "DT"]);
    assert_eq!(mods.to_string(), "HDDT");
}

#[test]
fn mod_set_parse_codes_round_trips() {
    let mods = ModSet::parse_codes("HDDT");
    assert_eq!(mods, ModSet::HIDDEN | ModSet::DOUBLE_TIME);
    assert_eq!(ModSet::parse_codes(&mods.to_string()), mods);
}

#[test]
fn mod_set_parse_codes_ignores_case_and_separators() {
    assert_eq!(
        ModSet::parse_codes("hd, dt"),
        ModSet::HIDDEN | ModSet::DOUBLE_TIME
    );
}

#[test]
fn mod_set_parse_codes_skips_unknown_pairs() {
    assert_eq!(ModSet::parse_codes("ZZ"), ModSet::NONE);
    assert_eq!(ModSet::parse_codes(""), ModSet::NONE);
}

#[test]
fn mod_set_long_names() {
    let mods = ModSet::HIDDEN | ModSet::DOUBLE_TIME;
    assert_eq!(mods.long_names(), vec!["Hidden", "DoubleTime"]);
}

// ===========================================================================
// MapSearchResult
// ===========================================================================

#[test]
fn resolved_result_carries_event_context() {
    let event = NowPlayingEvent::new("Vega - Afterglow", ClientStatus::Playing);
    let result = MapSearchResult::resolved(&event, "Vega", "Afterglow", "Insane", ModSet::HIDDEN);
    assert!(result.found);
    assert_eq!(result.artist.as_deref(), Some("Vega"));
    assert_eq!(result.status, ClientStatus::Playing);
    assert_eq!(result.raw, "Vega - Afterglow");
}

#[test]
fn not_found_result_keeps_the_raw_string() {
    let event = NowPlayingEvent::new("mystery", ClientStatus::Idle);
    let result = MapSearchResult::not_found(&event);
    assert!(!result.found);
    assert!(result.title.is_none());
    assert_eq!(result.raw, "mystery");
    assert!(result.mods.is_empty());
}
