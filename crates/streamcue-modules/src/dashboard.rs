//! Boot summary panel - wired last, sees every earlier settings provider

use crate::handle;
use async_trait::async_trait;
use std::sync::{Arc, OnceLock};
use streamcue_core::{OutputSurface, Result};
use streamcue_runtime::{
    Module, ModuleEntry, OutputSurfaceConsumer, SettingsListConsumer, SettingsProvider,
};
use tracing::info;

pub struct Dashboard {
    surface: OnceLock<Arc<OutputSurface>>,
    providers: OnceLock<Vec<Arc<dyn SettingsProvider>>>,
}

impl Dashboard {
    pub fn entry() -> ModuleEntry {
        let module = Arc::new(Self {
            surface: OnceLock::new(),
            providers: OnceLock::new(),
        });
        ModuleEntry::new(Arc::clone(&module))
            .with_surface_consumer(Arc::clone(&module) as Arc<dyn OutputSurfaceConsumer>)
            .with_settings_list_consumer(module)
    }

    pub fn settings_groups(&self) -> Vec<&'static str> {
        self.providers
            .get()
            .map(|providers| providers.iter().map(|p| p.settings_group()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Module for Dashboard {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    async fn start(&self) -> Result<()> {
        let surface = handle(&self.surface, self.name(), "surface")?;
        let groups = self.settings_groups().join(", ");
        surface.publish("app/version", env!("CARGO_PKG_VERSION"));
        surface.publish("settings/groups", groups.clone());
        info!(groups = %groups, "dashboard ready");
        Ok(())
    }
}

impl OutputSurfaceConsumer for Dashboard {
    fn set_surface(&self, surface: Arc<OutputSurface>) {
        let _ = self.surface.set(surface);
    }
}

impl SettingsListConsumer for Dashboard {
    fn set_settings_list(&self, providers: Vec<Arc<dyn SettingsProvider>>) {
        let _ = self.providers.set(providers);
    }
}
