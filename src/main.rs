use clap::Parser;
use ordwatch::adapter::inbound::cli::command::Cli;
use ordwatch::adapter::inbound::cli::run;
use tracing::error;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    // Both tungstenite and reqwest ride on rustls; pin the ring provider once.
    let _ = rustls::crypto::ring::default_provider().install_default();
    let cli = Cli::parse();

    let config = match run::resolve_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();

    if let Err(e) = run::execute(config).await {
        error!(error = %e, "Fatal error");
        std::process::exit(1);
    }
}
