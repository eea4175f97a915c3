use crate::{
    Subcommand,
    util::{open, print_yaml},
};
use anyhow::Context;
use cfgopen_config::Config;
use clap::Parser;
use std::{fs, process::ExitCode};
use tracing::info;

/// View and edit cfgopen's own configuration
#[derive(Clone, Debug, Parser)]
pub struct ConfigCommand {
    /// Open the configuration file for editing. This goes through the same
    /// safety check as `cfgopen edit`.
    #[clap(long)]
    edit: bool,
    /// Print the path of the config file and exit; overrides all other
    /// arguments
    #[clap(long)]
    path: bool,
}

impl Subcommand for ConfigCommand {
    async fn execute(self) -> anyhow::Result<ExitCode> {
        if self.path {
            let path = Config::path();
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        } else if self.edit {
            // If the config is invalid, the user is probably trying to
            // fix it so we should open anyway
            let config = Config::load().unwrap_or_default();
            let path = Config::path();
            // Give a fresh file some documentation to start from. Anything
            // already in the file, valid or not, is left alone.
            let metadata = fs::metadata(&path).with_context(|| {
                format!("Error reading config file `{}`", path.display())
            })?;
            if metadata.len() == 0 {
                info!(?path, "Writing default config template");
                fs::write(&path, Config::default_content()).with_context(
                    || {
                        format!(
                            "Error writing default config to `{}`",
                            path.display()
                        )
                    },
                )?;
            }
            open(&config, &path).await
        } else {
            let config = Config::load()?;
            print_yaml(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
