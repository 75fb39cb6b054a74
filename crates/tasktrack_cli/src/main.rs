use clap::Parser;
use std::io;
use tasktrack_cli::cli::{Cli, normalize_parse_error};
use tasktrack_cli::session::Session;
use tasktrack_core::TaskManager;
use tasktrack_core::clock::LocalClock;
use tasktrack_core::config::{self, Config};
use tasktrack_core::error::AppError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_ENV_VAR: &str = "TASKTRACK_LOG";

/// Diagnostics are opt-in and go to stderr so they never mix with the prompt.
fn init_tracing() {
    let filter = std::env::var(LOG_ENV_VAR)
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<Config, AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        tracing::warn!(error = %err, "using default configuration");
    }
    let overrides = cli.config_overrides()?;
    let config = config::merge_overrides(&loaded.config, &overrides);
    tracing::debug!(theme = %config.theme, aliases = config.aliases.len(), "configuration resolved");
    Ok(config)
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = resolve_config(&cli)?;
    let mut manager = TaskManager::from_config(&config, Box::new(LocalClock));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let end = Session::new(
        stdin.lock(),
        stdout.lock(),
        io::stderr(),
        &mut manager,
        &config,
        cli.output_format(),
    )
    .run()?;
    tracing::debug!(?end, "session finished");
    Ok(())
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
