//! Publishes the latest formatted lines onto the output surface

use async_trait::async_trait;
use std::sync::{Arc, OnceLock};
use streamcue_core::{FormattedOutput, MapSearchResult, OutputSurface, Result};
use streamcue_runtime::{MapDataGetter, Module, ModuleEntry, OutputSurfaceConsumer};

pub struct StatusPanel {
    surface: OnceLock<Arc<OutputSurface>>,
}

impl StatusPanel {
    pub fn entry() -> ModuleEntry {
        let module = Arc::new(Self {
            surface: OnceLock::new(),
        });
        ModuleEntry::new(Arc::clone(&module))
            .with_map_data_getter(Arc::clone(&module) as Arc<dyn MapDataGetter>)
            .with_surface_consumer(module)
    }
}

#[async_trait]
impl Module for StatusPanel {
    fn name(&self) -> &'static str {
        "status-panel"
    }

    async fn start(&self) -> Result<()> {
        if let Some(surface) = self.surface.get() {
            surface.publish("nowplaying/found", "no");
        }
        Ok(())
    }
}

impl MapDataGetter for StatusPanel {
    fn set_new_map(&self, result: &MapSearchResult, formatted: &[FormattedOutput]) {
        let Some(surface) = self.surface.get() else {
            return;
        };
        for output in formatted {
            surface.publish(format!("nowplaying/{}", output.name), output.line.clone());
        }
        surface.publish("nowplaying/found", if result.found { "yes" } else { "no" });
    }
}

impl OutputSurfaceConsumer for StatusPanel {
    fn set_surface(&self, surface: Arc<OutputSurface>) {
        let _ = self.surface.set(surface);
    }
}
