use crate::{Subcommand, util::open};
use anyhow::{Context, bail};
use cfgopen_config::Config;
use cfgopen_util::paths::normalize_path;
use clap::Parser;
use std::{env, path::PathBuf, process::ExitCode};

/// Open a configuration file for editing
///
/// If the OS would run the file as a script instead of opening it in an
/// editor, the configured fallback editor is used instead.
#[derive(Clone, Debug, Parser)]
pub struct EditCommand {
    /// File to open. Defaults to the `file` field of the cfgopen config
    path: Option<PathBuf>,
}

impl Subcommand for EditCommand {
    async fn execute(self) -> anyhow::Result<ExitCode> {
        let config = Config::load()?;
        let path = self.path.unwrap_or_else(|| config.file());
        // Editors may resolve relative paths from their own working directory
        let current_dir =
            env::current_dir().context("Error getting current directory")?;
        let path = normalize_path(&current_dir, &path);
        if !path.exists() {
            bail!("`{}` does not exist", path.display());
        }
        open(&config, &path).await
    }
}
