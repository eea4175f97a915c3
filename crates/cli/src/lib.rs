//! Command line interface for cfgopen.
//!
//! **This crate is not semver compliant**. The version is locked to the root
//! `cfgopen` crate version. If you choose to depend directly on this crate, you
//! do so at your own risk of breakage.

mod commands;
mod util;

use crate::commands::{
    config::ConfigCommand, edit::EditCommand, inspect::InspectCommand,
};
use clap::Parser;
use std::process::ExitCode;

const COMMAND_NAME: &str = "cfgopen";

#[derive(Debug, Parser)]
#[clap(
    author,
    version,
    about,
    name = COMMAND_NAME,
    long_about = "Open configuration files for editing, without letting the \
    OS run them as scripts"
)]
pub struct Args {
    #[command(subcommand)]
    pub subcommand: CliCommand,
}

impl Args {
    /// Alias for [clap::Parser::parse]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

/// A CLI subcommand
#[derive(Clone, Debug, clap::Subcommand)]
pub enum CliCommand {
    Config(ConfigCommand),
    Edit(EditCommand),
    Inspect(InspectCommand),
}

impl CliCommand {
    /// Execute this CLI subcommand
    pub async fn execute(self) -> anyhow::Result<ExitCode> {
        match self {
            Self::Config(command) => command.execute().await,
            Self::Edit(command) => command.execute().await,
            Self::Inspect(command) => command.execute().await,
        }
    }
}

/// An executable subcommand. This trait isn't strictly necessary because we do
/// static dispatch via the command enum, but it's helpful to enforce a
/// consistent interface for each subcommand.
trait Subcommand {
    /// Execute the subcommand
    async fn execute(self) -> anyhow::Result<ExitCode>;
}
