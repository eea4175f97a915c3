use anyhow::anyhow;
use cfgopen_config::Config;
use cfgopen_core::OpenDispatcher;
use serde::Serialize;
use std::{io, path::Path, process::ExitCode};

/// Serialize data to YAML and print it
///
/// ## Errors
///
/// Error if serialization fails or writing to stdout fails
pub fn print_yaml<T: Serialize>(value: &T) -> anyhow::Result<()> {
    serde_yaml::to_writer(io::stdout(), value).map_err(anyhow::Error::from)
}

/// Build a dispatcher for the current platform from the configured extension
/// and fallback editor
pub fn dispatcher(config: &Config) -> OpenDispatcher {
    OpenDispatcher::system(config.extension(), config.fallback_editor.clone())
}

/// Open a file for editing through the dispatcher. The editor is started in
/// the background; this does not wait for the user to close it.
pub async fn open(config: &Config, path: &Path) -> anyhow::Result<ExitCode> {
    if dispatcher(config).open_config(path).await {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(anyhow!(
            "Could not open `{}` for editing",
            path.display()
        ))
    }
}
