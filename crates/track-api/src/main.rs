//! mailtrack API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p track-api
//! ```
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honored).

use track_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // The environment decides the log format, so load config first
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let tracing_config = TracingConfig::for_environment(&config.app.env);
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        env = ?config.app.env,
        addr = %config.server.address(),
        "Starting mailtrack API server"
    );

    track_api::server::run(config).await?;

    Ok(())
}
