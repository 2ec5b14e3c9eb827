//! Logging bootstrap - sink selection happens once, during boot
//!
//! Modules only emit `tracing` events. The orchestrator decides what backs
//! them: an optional console layer (the `console` settings flag) plus a
//! file layer in the save directory.

use streamcue_core::{Saver, Settings};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. The returned guard must be held for the
/// lifetime of the process or buffered file output is lost.
pub fn init(settings: &Settings, saver: &Saver) -> WorkerGuard {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "streamcue=info".into());

    let file_appender = tracing_appender::rolling::never(saver.dir(), "streamcue.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false);

    let console_layer = settings
        .get("console", false)
        .then(|| tracing_subscriber::fmt::layer());

    // try_init: an embedding shell (or a test harness) may already have one
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    guard
}
