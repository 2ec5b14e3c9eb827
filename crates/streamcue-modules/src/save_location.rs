//! Exposes the output-directory settings group

use crate::handle;
use async_trait::async_trait;
use std::sync::{Arc, OnceLock};
use streamcue_core::{Result, Saver, Settings};
use streamcue_runtime::{Module, ModuleEntry, SaveConsumer, SettingsProvider};
use tracing::info;

pub const OUTPUT_DIR_KEY: &str = "outputDir";

pub struct SaveLocationProvider {
    settings: OnceLock<Arc<Settings>>,
    saver: OnceLock<Arc<Saver>>,
}

impl SaveLocationProvider {
    pub fn entry() -> ModuleEntry {
        let module = Arc::new(Self {
            settings: OnceLock::new(),
            saver: OnceLock::new(),
        });
        ModuleEntry::new(Arc::clone(&module))
            .with_settings_provider(Arc::clone(&module) as Arc<dyn SettingsProvider>)
            .with_save_consumer(module)
    }
}

#[async_trait]
impl Module for SaveLocationProvider {
    fn name(&self) -> &'static str {
        "save-location"
    }

    async fn start(&self) -> Result<()> {
        let settings = handle(&self.settings, self.name(), "settings")?;
        let saver = handle(&self.saver, self.name(), "saver")?;
        let dir: String = settings.get(OUTPUT_DIR_KEY, saver.dir().display().to_string());
        info!(dir = %dir, "artifacts will be written here");
        Ok(())
    }
}

impl SettingsProvider for SaveLocationProvider {
    fn settings_group(&self) -> &'static str {
        "File save location"
    }

    fn set_settings(&self, settings: Arc<Settings>) {
        let _ = self.settings.set(settings);
    }
}

impl SaveConsumer for SaveLocationProvider {
    fn set_saver(&self, saver: Arc<Saver>) {
        let _ = self.saver.set(saver);
    }
}
