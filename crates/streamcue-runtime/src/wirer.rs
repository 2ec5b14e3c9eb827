//! Capability wirer - connects a module to the services its roles declare
//!
//! Roles are serviced in a fixed order: settings delivery and provider
//! self-registration, then the shared handles, then list consumers, then the
//! map-data contributor roles, then mod-parser cooperation, then pipeline
//! sinks. No role action currently reads anything a later action delivers;
//! the order is contract so a future role cannot introduce silent
//! order-sensitivity.

use crate::collections::RoleCollections;
use crate::module::ModuleEntry;
use std::sync::{Arc, OnceLock};
use streamcue_core::{Database, OutputSurface, Result, Saver, Settings};
use tracing::{trace, warn};

pub struct Wirer {
    settings: Arc<Settings>,
    saver: Arc<Saver>,
    surface: Arc<OutputSurface>,
    database: OnceLock<Arc<Database>>,
    collections: RoleCollections,
}

impl Wirer {
    pub fn new(settings: Arc<Settings>, saver: Arc<Saver>, surface: Arc<OutputSurface>) -> Self {
        Self {
            settings,
            saver,
            surface,
            database: OnceLock::new(),
            collections: RoleCollections::default(),
        }
    }

    /// The database opens later in boot than the other singletons; it must be
    /// installed before any DatabaseConsumer is wired.
    pub fn install_database(&self, database: Arc<Database>) {
        let _ = self.database.set(database);
    }

    pub fn collections(&self) -> &RoleCollections {
        &self.collections
    }

    /// Wires and starts one module. An already-started module is left
    /// untouched: no role actions, no second start.
    pub async fn wire(&self, entry: &ModuleEntry) -> Result<()> {
        if entry.started() {
            return Ok(());
        }
        let name = entry.module().name();
        let caps = entry.capabilities();

        if let Some(role) = &caps.settings_consumer {
            role.set_settings(Arc::clone(&self.settings));
        }
        if let Some(role) = &caps.settings_provider {
            role.set_settings(Arc::clone(&self.settings));
            self.collections.settings_providers.push(Arc::clone(role));
        }

        if let Some(role) = &caps.save_consumer {
            role.set_saver(Arc::clone(&self.saver));
        }
        if let Some(role) = &caps.database_consumer {
            match self.database.get() {
                Some(database) => role.set_database(Arc::clone(database)),
                None => warn!(module = name, "database requested before it was opened"),
            }
        }
        if let Some(role) = &caps.surface_consumer {
            role.set_surface(Arc::clone(&self.surface));
        }

        if let Some(role) = &caps.settings_list_consumer {
            role.set_settings_list(self.collections.settings_providers.snapshot());
        }

        if let Some(role) = &caps.map_finder {
            self.collections.map_finders.push(Arc::clone(role));
        }
        if let Some(role) = &caps.map_parser {
            self.collections.map_parsers.push(Arc::clone(role));
        }
        if let Some(role) = &caps.map_getter {
            self.collections.map_getters.push(Arc::clone(role));
        }
        if let Some(role) = &caps.map_replacer {
            self.collections.map_replacers.push(Arc::clone(role));
        }

        if let Some(role) = &caps.mod_parser {
            self.collections.mod_parsers.push(Arc::clone(role));
        }
        if let Some(role) = &caps.mod_parser_list_consumer {
            role.set_mod_parsers(self.collections.mod_parsers.snapshot());
        }

        if let Some(role) = &caps.pipeline_sink {
            self.collections.pipeline_sinks.push(Arc::clone(role));
        }

        trace!(module = name, "wired");
        entry.module().start().await?;
        entry.mark_started();
        Ok(())
    }
}
