//! Module contract and capability roles
//!
//! A module is constructed as an `Arc` and wrapped in a [`ModuleEntry`] that
//! carries its concrete type identity (for de-duplication), its started flag,
//! and a capability descriptor: one optional handle per role the module
//! implements, populated once at construction. The wirer iterates the fixed
//! descriptor; nothing inspects types at runtime.

use async_trait::async_trait;
use std::any::TypeId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use streamcue_core::{
    Database, FormattedOutput, MapSearchResult, ModSet, NowPlayingEvent, OutputSurface, Result,
    Saver, Settings, TokenMap,
};

/// A self-contained feature unit, registered once and started in declared
/// order.
#[async_trait]
pub trait Module: Send + Sync {
    fn name(&self) -> &'static str;

    /// Called exactly once by the wirer, after every declared dependency has
    /// been delivered.
    async fn start(&self) -> Result<()>;

    /// Teardown at shutdown. Failures are reported by the registry and never
    /// stop the shutdown sweep.
    async fn stop(&self) -> Result<()> {
        Ok(())
    }
}

/// One-shot bootstrap module run to completion before the regular roster
/// (first-run setup). Non-success aborts the whole boot.
pub trait BootstrapModule: Module {
    fn completed_successfully(&self) -> bool;

    /// A secondary module this bootstrap step wants started inline, if any.
    fn follow_up(&self) -> Option<ModuleEntry> {
        None
    }
}

// --- Capability roles ------------------------------------------------------

/// Receives the settings store handle.
pub trait SettingsConsumer: Send + Sync {
    fn set_settings(&self, settings: Arc<Settings>);
}

/// Exposes a named settings group and joins the visible provider list.
pub trait SettingsProvider: Send + Sync {
    fn settings_group(&self) -> &'static str;
    fn set_settings(&self, settings: Arc<Settings>);
}

/// Receives the saver handle.
pub trait SaveConsumer: Send + Sync {
    fn set_saver(&self, saver: Arc<Saver>);
}

/// Receives the shared database handle.
pub trait DatabaseConsumer: Send + Sync {
    fn set_database(&self, database: Arc<Database>);
}

/// Receives the shared output-surface handle.
pub trait OutputSurfaceConsumer: Send + Sync {
    fn set_surface(&self, surface: Arc<OutputSurface>);
}

/// Receives the settings providers registered so far, as of its own wiring.
pub trait SettingsListConsumer: Send + Sync {
    fn set_settings_list(&self, providers: Vec<Arc<dyn SettingsProvider>>);
}

/// Converts between mod sets and their string forms.
pub trait ModParser: Send + Sync {
    fn mods_to_string(&self, mods: ModSet) -> String;
    fn parse_mods(&self, text: &str) -> ModSet;
}

/// Receives the mod parsers registered so far, as of its own wiring.
pub trait ModParserListConsumer: Send + Sync {
    fn set_mod_parsers(&self, parsers: Vec<Arc<dyn ModParser>>);
}

/// Resolves a live event into map data. Finders are queried in registration
/// order; the first result wins.
pub trait MapDataFinder: Send + Sync {
    fn find_map_data(&self, event: &NowPlayingEvent) -> Option<MapSearchResult>;
}

/// Formats output lines from a search result and its token map.
pub trait MapDataParser: Send + Sync {
    fn format_map_data(&self, result: &MapSearchResult, tokens: &TokenMap) -> Vec<FormattedOutput>;
}

/// Told about every resolved result after formatting.
pub trait MapDataGetter: Send + Sync {
    fn set_new_map(&self, result: &MapSearchResult, formatted: &[FormattedOutput]);
}

/// Contributes extra replacement tokens for a search result.
pub trait MapReplacementProvider: Send + Sync {
    fn map_replacements(&self, result: &MapSearchResult) -> TokenMap;
}

/// Receives raw live events; the entry point of the state pipeline.
pub trait PipelineSink: Send + Sync {
    fn handle_event(&self, event: &NowPlayingEvent);
}

// --- Descriptor ------------------------------------------------------------

/// Which roles a module implements. Populated once at construction, iterated
/// by the wirer in a fixed order.
#[derive(Default)]
pub struct Capabilities {
    pub(crate) settings_consumer: Option<Arc<dyn SettingsConsumer>>,
    pub(crate) settings_provider: Option<Arc<dyn SettingsProvider>>,
    pub(crate) save_consumer: Option<Arc<dyn SaveConsumer>>,
    pub(crate) database_consumer: Option<Arc<dyn DatabaseConsumer>>,
    pub(crate) surface_consumer: Option<Arc<dyn OutputSurfaceConsumer>>,
    pub(crate) settings_list_consumer: Option<Arc<dyn SettingsListConsumer>>,
    pub(crate) map_finder: Option<Arc<dyn MapDataFinder>>,
    pub(crate) map_parser: Option<Arc<dyn MapDataParser>>,
    pub(crate) map_getter: Option<Arc<dyn MapDataGetter>>,
    pub(crate) map_replacer: Option<Arc<dyn MapReplacementProvider>>,
    pub(crate) mod_parser: Option<Arc<dyn ModParser>>,
    pub(crate) mod_parser_list_consumer: Option<Arc<dyn ModParserListConsumer>>,
    pub(crate) pipeline_sink: Option<Arc<dyn PipelineSink>>,
}

/// A registered module: the instance, its type identity, its started flag,
/// and its capability descriptor.
pub struct ModuleEntry {
    type_id: TypeId,
    module: Arc<dyn Module>,
    started: AtomicBool,
    caps: Capabilities,
}

impl ModuleEntry {
    pub fn new<M: Module + 'static>(module: Arc<M>) -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            module,
            started: AtomicBool::new(false),
            caps: Capabilities::default(),
        }
    }

    pub fn module(&self) -> &Arc<dyn Module> {
        &self.module
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_started(&self) {
        self.started.store(true, Ordering::SeqCst);
    }

    pub(crate) fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn with_settings_consumer(mut self, role: Arc<dyn SettingsConsumer>) -> Self {
        self.caps.settings_consumer = Some(role);
        self
    }

    pub fn with_settings_provider(mut self, role: Arc<dyn SettingsProvider>) -> Self {
        self.caps.settings_provider = Some(role);
        self
    }

    pub fn with_save_consumer(mut self, role: Arc<dyn SaveConsumer>) -> Self {
        self.caps.save_consumer = Some(role);
        self
    }

    pub fn with_database_consumer(mut self, role: Arc<dyn DatabaseConsumer>) -> Self {
        self.caps.database_consumer = Some(role);
        self
    }

    pub fn with_surface_consumer(mut self, role: Arc<dyn OutputSurfaceConsumer>) -> Self {
        self.caps.surface_consumer = Some(role);
        self
    }

    pub fn with_settings_list_consumer(mut self, role: Arc<dyn SettingsListConsumer>) -> Self {
        self.caps.settings_list_consumer = Some(role);
        self
    }

    pub fn with_map_data_finder(mut self, role: Arc<dyn MapDataFinder>) -> Self {
        self.caps.map_finder = Some(role);
        self
    }

    pub fn with_map_data_parser(mut self, role: Arc<dyn MapDataParser>) -> Self {
        self.caps.map_parser = Some(role);
        self
    }

    pub fn with_map_data_getter(mut self, role: Arc<dyn MapDataGetter>) -> Self {
        self.caps.map_getter = Some(role);
        self
    }

    pub fn with_map_replacement_provider(mut self, role: Arc<dyn MapReplacementProvider>) -> Self {
        self.caps.map_replacer = Some(role);
        self
    }

    pub fn with_mod_parser(mut self, role: Arc<dyn ModParser>) -> Self {
        self.caps.mod_parser = Some(role);
        self
    }

    pub fn with_mod_parser_list_consumer(mut self, role: Arc<dyn ModParserListConsumer>) -> Self {
        self.caps.mod_parser_list_consumer = Some(role);
        self
    }

    pub fn with_pipeline_sink(mut self, role: Arc<dyn PipelineSink>) -> Self {
        self.caps.pipeline_sink = Some(role);
        self
    }
}
