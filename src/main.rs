//! Tickdown - a single-screen countdown timer for the terminal
//!
//! This is the main entry point for the tickdown application.

use std::sync::Arc;

use tracing::info;

use tickdown::{config::Config, state::TimerController, ui};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level; stderr stays out
    // of the alternate screen but survives redirection
    tracing_subscriber::fmt()
        .with_env_filter(format!("tickdown={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting tickdown v1.0.0");

    let controller = Arc::new(TimerController::new());

    // Pre-fill the duration field when asked on the command line
    if let Some(seconds) = config.seconds {
        info!("Pre-filling duration field with {} seconds", seconds);
        controller.set_input(seconds.to_string());
    }

    ui::run(controller).await?;

    info!("Shutdown complete");
    Ok(())
}
