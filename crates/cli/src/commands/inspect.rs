use crate::{Subcommand, util::dispatcher};
use cfgopen_config::Config;
use clap::Parser;
use std::process::ExitCode;

/// Show how `cfgopen edit` would open a file, without opening anything
///
/// Prints the platform policy, the inspected extension's user choice and its
/// handler values, and the resulting strategy. The association store is only
/// read, never modified.
#[derive(Clone, Debug, Parser)]
pub struct InspectCommand {}

impl Subcommand for InspectCommand {
    async fn execute(self) -> anyhow::Result<ExitCode> {
        let config = Config::load()?;
        let dispatcher = dispatcher(&config);
        let inspector = dispatcher.inspector();

        println!("platform: {}", dispatcher.platform());
        println!("extension: {}", inspector.extension());
        // Inspect regardless of platform, so the output shows what the store
        // looks like even when the dispatcher wouldn't consult it
        match inspector.find_user_chosen_handler_key() {
            Ok(Some(key)) => {
                println!("user choice: {key}");
                match inspector.read_handler_values(&key) {
                    Ok(values) => {
                        println!("values:");
                        for (name, value) in values.iter() {
                            println!("  {name}: {value:?}");
                        }
                    }
                    Err(error) => println!("values: <{error}>"),
                }
            }
            Ok(None) => println!("user choice: <none>"),
            Err(error) => println!("user choice: <{error}>"),
        }
        match inspector.has_safe_default_configured() {
            Ok(safe) => println!("safe: {safe}"),
            Err(error) => println!("safe: <{error}>"),
        }
        println!("strategy: {}", dispatcher.strategy());
        Ok(ExitCode::SUCCESS)
    }
}
