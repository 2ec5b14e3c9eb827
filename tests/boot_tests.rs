//! End-to-end boot tests with the real module roster

use streamcue_core::{Error, Settings};
use streamcue_runtime::{Module, Orchestrator, RunState};

fn seed_settings(dir: &std::path::Path, first_run: bool, client_path: Option<&str>) {
    let settings = Settings::new();
    settings.set_save_path(dir.join("settings.json"));
    settings.set("firstRun", first_run);
    if let Some(path) = client_path {
        settings.set("clientPath", path);
    }
    settings.save().unwrap();
}

#[tokio::test]
async fn full_boot_and_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let client = tempfile::tempdir().unwrap();
    seed_settings(dir.path(), true, Some(&client.path().display().to_string()));

    let mut orchestrator = Orchestrator::new(dir.path()).unwrap();
    let plan = streamcue_modules::boot_plan(orchestrator.hub().clone());
    orchestrator.start(plan).await.unwrap();

    assert_eq!(orchestrator.state(), RunState::Started);
    assert!(!orchestrator.settings().get("firstRun", true));
    assert!(orchestrator.surface().get("app/version").is_some());
    // the path resolver was already registered by the first-run phase, so
    // the roster's duplicate listing was skipped
    assert!(orchestrator
        .registry()
        .iter()
        .any(|e| e.module().name() == "first-run"));

    orchestrator.exit().await;
    assert_eq!(orchestrator.state(), RunState::Exited);

    let persisted = Settings::new();
    persisted.load(&dir.path().join("settings.json")).unwrap();
    assert!(!persisted.get("firstRun", true));
}

#[tokio::test]
async fn boot_aborts_when_first_run_cannot_complete() {
    let dir = tempfile::tempdir().unwrap();
    seed_settings(dir.path(), true, Some("/definitely/not/here"));

    let mut orchestrator = Orchestrator::new(dir.path()).unwrap();
    let plan = streamcue_modules::boot_plan(orchestrator.hub().clone());
    let err = orchestrator.start(plan).await.unwrap_err();

    assert!(matches!(err, Error::FirstRunIncomplete));
    // the first-run module and its path resolver were wired, nothing else
    assert_eq!(orchestrator.registry().len(), 2);
}

#[tokio::test]
async fn boot_without_first_run_flag_goes_straight_to_the_roster() {
    let dir = tempfile::tempdir().unwrap();

    let mut orchestrator = Orchestrator::new(dir.path()).unwrap();
    let plan = streamcue_modules::boot_plan(orchestrator.hub().clone());
    orchestrator.start(plan).await.unwrap();

    assert_eq!(orchestrator.state(), RunState::Started);
    assert!(orchestrator
        .registry()
        .iter()
        .all(|e| e.module().name() != "first-run"));
}
