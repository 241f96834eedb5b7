//! Handler for running the watcher.

use tokio::signal;
use tracing::{info, warn};

use crate::adapter::inbound::cli::command::Cli;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_watcher;
use crate::infrastructure::config::settings::Config;

/// Resolve configuration from file, environment and flags, then validate.
///
/// # Errors
///
/// Returns a configuration error if loading or validation fails.
#[allow(clippy::result_large_err)]
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(&cli.config)?;
    cli.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Run the watcher until a shutdown signal arrives.
pub async fn execute(config: Config) -> Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "ordwatch starting");

    let mut watcher = build_watcher(&config).await?;
    watcher.run(shutdown_signal()).await?;

    info!("ordwatch stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutdown signal received");
}
