//! Composition root - boot and shutdown sequencing
//!
//! Boot is strictly sequential: settings, logging, the one-shot first-run
//! phase, the pipeline router, the database, then the declared module list.
//! Whether one module can see another in a role collection is decided
//! entirely by this ordering.

use crate::logging;
use crate::module::{BootstrapModule, ModuleEntry};
use crate::pipeline::{MapDataRouter, NowPlayingFormatter, NowPlayingHub};
use crate::registry::ModuleRegistry;
use crate::wirer::Wirer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use streamcue_core::{Database, Error, OutputSurface, Result, Saver, Settings};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

const SETTINGS_FILE: &str = "settings.json";
const DATABASE_FILE: &str = "streamcue.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Constructed,
    Booting,
    Started,
    Exiting,
    Exited,
}

/// A first-run module plus a typed handle to interrogate it after wiring.
pub struct BootstrapEntry {
    pub entry: ModuleEntry,
    pub handle: Arc<dyn BootstrapModule>,
}

/// What to boot. Both factories are lazy so that nothing is constructed past
/// a failed first-run phase.
pub struct BootPlan {
    /// Factory for the one-shot first-run module; only invoked when the
    /// `firstRun` settings flag is set.
    pub first_run: Option<Box<dyn FnOnce() -> BootstrapEntry + Send>>,
    /// Factory for the declared module list.
    pub roster: Box<dyn FnOnce() -> Vec<ModuleEntry> + Send>,
}

pub struct Orchestrator {
    base_dir: PathBuf,
    settings: Arc<Settings>,
    saver: Arc<Saver>,
    surface: Arc<OutputSurface>,
    hub: Arc<NowPlayingHub>,
    registry: ModuleRegistry,
    wirer: Wirer,
    state: RunState,
    _log_guard: Option<WorkerGuard>,
}

impl Orchestrator {
    pub fn new(base_dir: &Path) -> Result<Self> {
        let saver = Arc::new(Saver::new(base_dir)?);
        let settings = Arc::new(Settings::new());
        let surface = Arc::new(OutputSurface::new());
        let wirer = Wirer::new(
            Arc::clone(&settings),
            Arc::clone(&saver),
            Arc::clone(&surface),
        );
        let hub = Arc::new(NowPlayingHub::new(wirer.collections().pipeline_sinks.clone()));
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            settings,
            saver,
            surface,
            hub,
            registry: ModuleRegistry::new(),
            wirer,
            state: RunState::Constructed,
            _log_guard: None,
        })
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    pub fn saver(&self) -> &Arc<Saver> {
        &self.saver
    }

    pub fn surface(&self) -> &Arc<OutputSurface> {
        &self.surface
    }

    pub fn hub(&self) -> &Arc<NowPlayingHub> {
        &self.hub
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the boot sequence. Calling this again once Started is a no-op.
    pub async fn start(&mut self, plan: BootPlan) -> Result<()> {
        if self.state == RunState::Started {
            return Ok(());
        }
        self.state = RunState::Booting;

        let config_path = self.base_dir.join(SETTINGS_FILE);
        self.settings.load(&config_path)?;
        self.settings.set_save_path(&config_path);
        self._log_guard = Some(logging::init(&self.settings, &self.saver));
        info!("booting up");

        if self.settings.get("firstRun", false) {
            if let Some(factory) = plan.first_run {
                self.run_first_run(factory()).await?;
            }
        }

        // The router joins the sink list before any module can, and reads
        // the live role collections, so modules wired below still feed it.
        self.wirer.collections().pipeline_sinks.clear();
        let router = MapDataRouter::new(self.wirer.collections().clone(), Arc::clone(&self.saver));
        self.wirer
            .collections()
            .pipeline_sinks
            .push(Arc::new(NowPlayingFormatter::new(router)));

        info!("starting main services");
        let database = Arc::new(Database::open(&self.base_dir.join(DATABASE_FILE))?);
        self.wirer.install_database(database);

        info!("starting modules");
        for entry in (plan.roster)() {
            if self.registry.add(entry) {
                if let Some(added) = self.registry.last() {
                    self.wirer.wire(added).await?;
                }
            }
        }
        info!(
            modules = self.registry.len(),
            settings_groups = self.wirer.collections().settings_providers.len(),
            "modules loaded"
        );

        self.settings.set("firstRun", false);
        self.state = RunState::Started;
        info!("started");
        Ok(())
    }

    /// The first-run module goes through the normal registry path, so the
    /// duplicate listing in the roster later is skipped harmlessly. It runs
    /// to completion - including any secondary module it triggers - before
    /// anything else boots, and non-success aborts the boot.
    async fn run_first_run(&mut self, bootstrap: BootstrapEntry) -> Result<()> {
        info!("running first-time setup");
        let BootstrapEntry { entry, handle } = bootstrap;
        if self.registry.add(entry) {
            if let Some(added) = self.registry.last() {
                self.wirer.wire(added).await?;
            }
        }
        if let Some(follow_up) = handle.follow_up() {
            if self.registry.add(follow_up) {
                if let Some(added) = self.registry.last() {
                    self.wirer.wire(added).await?;
                }
            }
        }
        if !handle.completed_successfully() {
            return Err(Error::FirstRunIncomplete);
        }
        Ok(())
    }

    /// Shutdown: every module's teardown is attempted, then settings are
    /// persisted. Neither step can abort the other.
    pub async fn exit(&mut self) {
        if self.state == RunState::Exited {
            return;
        }
        self.state = RunState::Exiting;
        info!("shutting down");
        self.registry.shutdown().await;
        if let Err(e) = self.settings.save() {
            error!(error = %e, "failed to persist settings on exit");
        }
        self.state = RunState::Exited;
        info!("exited");
    }
}
