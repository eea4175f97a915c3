//! Test-only binary for CLI integration tests. The root binary additionally
//! sets up logging, which the tests don't need.

use cfgopen_cli::Args;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
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
