//! One-shot first-time setup, run to completion before the regular roster
//!
//! Always asks for the path resolver to be started inline; if no valid
//! client path exists afterwards there is no configuration worth booting
//! with, and the orchestrator aborts.

use crate::game_path_resolver::{GamePathResolver, CLIENT_PATH_KEY};
use crate::handle;
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use streamcue_core::{Result, Settings};
use streamcue_runtime::{BootstrapEntry, BootstrapModule, Module, ModuleEntry, SettingsConsumer};
use tracing::info;

pub struct FirstRun {
    settings: OnceLock<Arc<Settings>>,
}

impl FirstRun {
    pub fn bootstrap() -> BootstrapEntry {
        let module = Arc::new(Self {
            settings: OnceLock::new(),
        });
        let entry = ModuleEntry::new(Arc::clone(&module))
            .with_settings_consumer(Arc::clone(&module) as Arc<dyn SettingsConsumer>);
        BootstrapEntry {
            entry,
            handle: module,
        }
    }

    fn client_path_valid(settings: &Settings) -> bool {
        let path: String = settings.get(CLIENT_PATH_KEY, String::new());
        !path.is_empty() && Path::new(&path).is_dir()
    }
}

#[async_trait]
impl Module for FirstRun {
    fn name(&self) -> &'static str {
        "first-run"
    }

    async fn start(&self) -> Result<()> {
        let settings = handle(&self.settings, self.name(), "settings")?;
        if Self::client_path_valid(settings) {
            info!("client path already valid, nothing to set up");
        } else {
            info!("no usable client path yet, deferring to the path resolver");
        }
        Ok(())
    }
}

impl SettingsConsumer for FirstRun {
    fn set_settings(&self, settings: Arc<Settings>) {
        let _ = self.settings.set(settings);
    }
}

impl BootstrapModule for FirstRun {
    fn completed_successfully(&self) -> bool {
        self.settings
            .get()
            .is_some_and(|settings| Self::client_path_valid(settings))
    }

    fn follow_up(&self) -> Option<ModuleEntry> {
        Some(GamePathResolver::entry())
    }
}
