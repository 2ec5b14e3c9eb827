//! Resolves the tracked client's install location into settings

use crate::handle;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use streamcue_core::{Result, Settings};
use streamcue_runtime::{Module, ModuleEntry, SettingsConsumer};
use tracing::{info, warn};

pub const CLIENT_PATH_KEY: &str = "clientPath";

pub struct GamePathResolver {
    settings: OnceLock<Arc<Settings>>,
}

impl GamePathResolver {
    pub fn entry() -> ModuleEntry {
        let module = Arc::new(Self {
            settings: OnceLock::new(),
        });
        ModuleEntry::new(Arc::clone(&module)).with_settings_consumer(module)
    }

    fn candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var("STREAMCUE_CLIENT_PATH") {
            candidates.push(PathBuf::from(path));
        }
        if let Ok(home) = std::env::var("HOME") {
            let home = PathBuf::from(home);
            candidates.push(home.join(".local/share/player"));
            candidates.push(home.join("Games/player"));
        }
        candidates
    }
}

#[async_trait]
impl Module for GamePathResolver {
    fn name(&self) -> &'static str {
        "game-path-resolver"
    }

    async fn start(&self) -> Result<()> {
        let settings = handle(&self.settings, self.name(), "settings")?;

        let current: String = settings.get(CLIENT_PATH_KEY, String::new());
        if !current.is_empty() && Path::new(&current).is_dir() {
            info!(path = %current, "client path already configured");
            return Ok(());
        }

        match Self::candidates().into_iter().find(|p| p.is_dir()) {
            Some(found) => {
                info!(path = %found.display(), "client install located");
                settings.set(CLIENT_PATH_KEY, found.display().to_string());
            }
            None => warn!("could not locate the client install path"),
        }
        Ok(())
    }
}

impl SettingsConsumer for GamePathResolver {
    fn set_settings(&self, settings: Arc<Settings>) {
        let _ = self.settings.set(settings);
    }
}
