//! sweetshop - command line client for the sweet shop service.
//!
//! Signs in, browses the catalog, buys sweets and, for admins, manages
//! stock. The session token is kept between runs, so `login` only has to
//! happen once.

mod cli;
mod commands;

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use sweetshop_core::{ApiError, Config};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Command};

/// Initialize the tracing subscriber for logging.
/// Logs go to stderr unless a log file is given; the returned guard must be
/// held until exit so buffered file output is flushed.
fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file.as_deref())?;
    info!("sweetshop starting");

    // `saved` is what gets written back; overrides only apply to this run
    let config_path = Config::config_path()?;
    let mut saved = Config::load_from(&config_path)?;
    let mut effective = saved.clone();
    if let Some(ref url) = cli.api_url {
        effective.base_url = Some(url.clone());
    }

    let mut session = effective.session_store()?;
    if let Err(e) = session.initialize().await {
        warn!(error = %e, "Session restore incomplete");
        eprintln!("Warning: {}", e);
    }

    let signing_in = matches!(cli.command, Command::Login { .. } | Command::Register { .. });
    let result = commands::run(cli.command, &mut session, &mut saved, &config_path).await;

    if let Err(ref e) = result {
        if needs_login_hint(signing_in, e) {
            eprintln!("Not signed in or session expired - run `sweetshop login`");
        }
    }

    info!("sweetshop exiting");
    result
}

/// Whether a failed command should point the user at `sweetshop login`.
/// A 401 from login/register means bad credentials, not a missing session.
fn needs_login_hint(signing_in: bool, err: &anyhow::Error) -> bool {
    !signing_in
        && err
            .chain()
            .any(|cause| cause.downcast_ref::<ApiError>().is_some_and(ApiError::is_unauthorized))
}
