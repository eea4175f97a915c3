//! Open configuration files for editing, without letting the OS run them as
//! scripts.
//!
//! The logic lives in the subcrates; this binary sets up logging and hands off
//! to the CLI.

use anyhow::Context;
use cfgopen_cli::Args;
use cfgopen_util::paths;
use std::{fs::OpenOptions, process::ExitCode};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::EnvFilter, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logging failure shouldn't stop the user from editing their file
    if let Err(error) = initialize_tracing() {
        eprintln!("Error initializing logging: {error:#}");
    }

    let args = Args::parse();
    args.subcommand.execute().await.unwrap_or_else(|error| {
        eprintln!("{error}");
        error
            .chain()
            .skip(1)
            .for_each(|cause| eprintln!("  {cause}"));
        ExitCode::FAILURE
    })
}

/// Set up tracing to log to a file. Stdout is reserved for command output.
fn initialize_tracing() -> anyhow::Result<()> {
    let path = paths::log_file();
    paths::create_parent(&path)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| {
            format!("Error opening log file `{}`", path.display())
        })?;
    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        );
    tracing_subscriber::registry().with(file_subscriber).init();
    Ok(())
}
