//! Detects legacy client installs that need degraded data sources

use crate::game_path_resolver::CLIENT_PATH_KEY;
use crate::handle;
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use streamcue_core::{Result, Settings};
use streamcue_runtime::{Module, ModuleEntry, SettingsConsumer};
use tracing::warn;

const LEGACY_MARKER: &str = "fallback.cfg";
pub const LEGACY_CLIENT_KEY: &str = "legacyClient";

pub struct ClientFallbackDetector {
    settings: OnceLock<Arc<Settings>>,
}

impl ClientFallbackDetector {
    pub fn entry() -> ModuleEntry {
        let module = Arc::new(Self {
            settings: OnceLock::new(),
        });
        ModuleEntry::new(Arc::clone(&module)).with_settings_consumer(module)
    }
}

#[async_trait]
impl Module for ClientFallbackDetector {
    fn name(&self) -> &'static str {
        "client-fallback-detector"
    }

    async fn start(&self) -> Result<()> {
        let settings = handle(&self.settings, self.name(), "settings")?;
        let client_path: String = settings.get(CLIENT_PATH_KEY, String::new());
        let legacy =
            !client_path.is_empty() && Path::new(&client_path).join(LEGACY_MARKER).exists();
        if legacy {
            warn!("legacy client detected; some data sources may be unavailable");
        }
        settings.set(LEGACY_CLIENT_KEY, legacy);
        Ok(())
    }
}

impl SettingsConsumer for ClientFallbackDetector {
    fn set_settings(&self, settings: Arc<Settings>) {
        let _ = self.settings.set(settings);
    }
}
