//! Streamcue Runtime - module orchestration and capability wiring
//!
//! Feature units register once, start in a declared order, and get connected
//! to the cross-cutting services they ask for. Startup order decides which
//! cross-wirings are possible at all: a module that joins a role collection
//! after another module already took its snapshot is invisible to it.

pub mod collections;
pub mod logging;
pub mod module;
pub mod orchestrator;
pub mod pipeline;
pub mod registry;
pub mod wirer;

pub use collections::{RoleCollections, RoleList};
pub use module::{
    BootstrapModule, Capabilities, DatabaseConsumer, MapDataFinder, MapDataGetter, MapDataParser,
    MapReplacementProvider, ModParser, ModParserListConsumer, Module, ModuleEntry,
    OutputSurfaceConsumer, PipelineSink, SaveConsumer, SettingsConsumer, SettingsListConsumer,
    SettingsProvider,
};
pub use orchestrator::{BootPlan, BootstrapEntry, Orchestrator, RunState};
pub use pipeline::{MapDataRouter, NowPlayingFormatter, NowPlayingHub};
pub use registry::ModuleRegistry;
pub use wirer::Wirer;
