//! Watches the client library for chart changes and feeds the pipeline
//!
//! Polls the newest `.chart` file's path and mtime; a change becomes a live
//! event dispatched through the hub. The loop runs in the background after
//! start and is cancelled at teardown.

use crate::game_path_resolver::CLIENT_PATH_KEY;
use crate::handle;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, SystemTime};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use streamcue_core::{ClientStatus, NowPlayingEvent, Result, Settings};
use streamcue_runtime::{Module, ModuleEntry, NowPlayingHub, SettingsConsumer};

pub const LIBRARY_DIR_KEY: &str = "libraryDir";

pub struct LibraryWatcher {
    settings: OnceLock<Arc<Settings>>,
    hub: Arc<NowPlayingHub>,
    cancel: CancellationToken,
}

impl LibraryWatcher {
    pub fn entry(hub: Arc<NowPlayingHub>) -> ModuleEntry {
        let module = Arc::new(Self {
            settings: OnceLock::new(),
            hub,
            cancel: CancellationToken::new(),
        });
        ModuleEntry::new(Arc::clone(&module)).with_settings_consumer(module)
    }
}

#[async_trait]
impl Module for LibraryWatcher {
    fn name(&self) -> &'static str {
        "library-watcher"
    }

    async fn start(&self) -> Result<()> {
        let settings = handle(&self.settings, self.name(), "settings")?;

        let client_path: String = settings.get(CLIENT_PATH_KEY, String::new());
        let default_dir = if client_path.is_empty() {
            String::new()
        } else {
            Path::new(&client_path).join("library").display().to_string()
        };
        let dir: String = settings.get(LIBRARY_DIR_KEY, default_dir);
        if dir.is_empty() {
            warn!("no library directory configured, watcher idle");
            return Ok(());
        }
        let poll_ms: u64 = settings.get("libraryPollMs", 1000u64);

        tokio::spawn(watch_loop(
            PathBuf::from(dir),
            Duration::from_millis(poll_ms),
            Arc::clone(&self.hub),
            self.cancel.clone(),
        ));
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.cancel.cancel();
        Ok(())
    }
}

impl SettingsConsumer for LibraryWatcher {
    fn set_settings(&self, settings: Arc<Settings>) {
        let _ = self.settings.set(settings);
    }
}

async fn watch_loop(
    dir: PathBuf,
    interval: Duration,
    hub: Arc<NowPlayingHub>,
    cancel: CancellationToken,
) {
    info!(dir = %dir.display(), "library watcher started");
    let mut last_seen: Option<(PathBuf, SystemTime)> = None;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("library watcher stopped");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }

        let Some((path, modified)) = newest_chart(&dir) else {
            continue;
        };
        let changed = last_seen
            .as_ref()
            .map_or(true, |(p, m)| p != &path || *m != modified);
        if changed {
            if let Some(event) = event_for(&path) {
                debug!(file = %path.display(), "chart change detected");
                hub.dispatch(&event);
            }
            last_seen = Some((path, modified));
        }
    }
}

fn newest_chart(dir: &Path) -> Option<(PathBuf, SystemTime)> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext == "chart")
        })
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((entry.into_path(), modified))
        })
        .max_by_key(|(_, modified)| *modified)
}

/// "Artist - Title [Difficulty].chart" becomes an editing event carrying the
/// file stem as its raw string.
fn event_for(path: &Path) -> Option<NowPlayingEvent> {
    let stem = path.file_stem()?.to_str()?;
    Some(NowPlayingEvent::new(stem, ClientStatus::Editing))
}
