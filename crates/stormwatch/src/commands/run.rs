//! `stormwatch run`: the long-running scheduler.

use std::sync::Arc;

use tracing::info;

use stormwatch_core::{FileStore, build_runner, build_scheduler};

use crate::cli::{GlobalOpts, RunArgs};
use crate::config;
use crate::error::CliError;

pub async fn handle(args: RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let mut engine = config::engine_config(global, &cfg)?;
    engine.run_on_start |= args.run_on_start;

    let store_path = config::store_path(global, &cfg);
    let runner = Arc::new(build_runner(&engine, FileStore::new(&store_path))?);
    let cancel = runner.cancellation_token().clone();
    let shutdown = shutdown_signal()?;
    let handle = build_scheduler(&engine, runner).spawn();

    info!(
        cadence = %engine.cadence,
        store = %store_path.display(),
        concurrency = engine.cycle.concurrency,
        "scheduler started"
    );

    let signal = shutdown.await;
    info!(signal, "shutdown requested, waiting for the current cycle");
    cancel.cancel();

    handle.await.map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    info!("scheduler stopped");
    Ok(())
}

/// Resolves with the signal name on Ctrl-C, or on SIGTERM under Unix.
/// Handlers are registered before this returns.
fn shutdown_signal() -> std::io::Result<impl Future<Output = &'static str>> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;
        Ok(async move {
            tokio::select! {
                _ = interrupt.recv() => "SIGINT",
                _ = terminate.recv() => "SIGTERM",
            }
        })
    }
    #[cfg(not(unix))]
    {
        Ok(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "ctrl-c handler failed");
            }
            "ctrl-c"
        })
    }
}
