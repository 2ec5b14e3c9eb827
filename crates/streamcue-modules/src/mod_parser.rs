//! Standard mod-string parsing

use crate::handle;
use async_trait::async_trait;
use std::sync::{Arc, OnceLock};
use streamcue_core::{ModSet, Result, Settings};
use streamcue_runtime::{ModParser, Module, ModuleEntry, SettingsConsumer};

pub const SHORT_MOD_NAMES_KEY: &str = "shortModNames";

pub struct StandardModParser {
    settings: OnceLock<Arc<Settings>>,
}

impl StandardModParser {
    pub fn entry() -> ModuleEntry {
        let module = Arc::new(Self {
            settings: OnceLock::new(),
        });
        ModuleEntry::new(Arc::clone(&module))
            .with_settings_consumer(Arc::clone(&module) as Arc<dyn SettingsConsumer>)
            .with_mod_parser(module)
    }
}

#[async_trait]
impl Module for StandardModParser {
    fn name(&self) -> &'static str {
        "mod-parser"
    }

    async fn start(&self) -> Result<()> {
        let settings = handle(&self.settings, self.name(), "settings")?;
        let _: bool = settings.get(SHORT_MOD_NAMES_KEY, true);
        Ok(())
    }
}

impl SettingsConsumer for StandardModParser {
    fn set_settings(&self, settings: Arc<Settings>) {
        let _ = self.settings.set(settings);
    }
}

impl ModParser for StandardModParser {
    fn mods_to_string(&self, mods: ModSet) -> String {
        if mods.is_empty() {
            return String::new();
        }
        let short = self
            .settings
            .get()
            .map_or(true, |s| s.get(SHORT_MOD_NAMES_KEY, true));
        if short {
            mods.codes().concat()
        } else {
            mods.long_names().join(", ")
        }
    }

    fn parse_mods(&self, text: &str) -> ModSet {
        ModSet::parse_codes(text)
    }
}
