use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

use review_code::config::{AppConfig, Cli};
use review_code::run_session;
use review_code::services::{InteractiveRuntime, TranscriptRuntime};

/// Logs go to stderr; stdout carries replies only. `log` records from the
/// library crates are bridged into the subscriber.
fn init_logging(filter: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(filter)
        .with_context(|| format!("Invalid log filter '{}'", filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .try_init()
        .map_err(|err| anyhow!("Failed to install logger: {}", err))
}

fn main() -> Result<()> {
    let config = AppConfig::from_cli(Cli::parse());
    init_logging(&config.log_filter)?;
    log::debug!("configuration: {:?}", config);

    match &config.transcript {
        Some(path) => {
            let mut runtime = TranscriptRuntime::from_path(path, io::stdout().lock())
                .with_context(|| format!("Failed to load transcript {}", path.display()))?;
            run_session(&mut runtime).context("Failed to process transcript")?;
        }
        None => {
            let mut runtime = InteractiveRuntime::new(io::stdin().lock(), io::stdout().lock());
            run_session(&mut runtime).context("Session ended with an error")?;
        }
    }

    Ok(())
}
