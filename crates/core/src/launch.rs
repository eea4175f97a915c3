//! Hand a file off to an external program: either the OS default handler, or
//! an explicit fallback editor. Neither waits for the user to finish editing;
//! success means the handoff happened.

#[cfg(windows)]
mod win32;

use std::{
    error::Error,
    io,
    path::Path,
    process::Stdio,
};
use thiserror::Error;
use tokio::process::Command;
use tracing::{error, info};

/// An error handing a file off to another program
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The process couldn't be started at all (e.g. not on `PATH`)
    #[error("Error starting `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The Windows shell rejected the open request
    #[error("Shell could not open the file (error code {code})")]
    Shell { code: isize },

    #[error("Fallback editor command is empty")]
    EmptyCommand,

    #[error("Open task failed")]
    Join(#[from] tokio::task::JoinError),
}

/// The OS "open with the default handler" primitive
pub trait NativeOpener {
    /// Open a file with whatever handler the OS has configured for it
    async fn open(&self, path: &Path) -> Result<(), LaunchError>;
}

/// Something that can start an editor on a file
pub trait EditorLauncher {
    /// Start the editor. Resolves as soon as it has started.
    async fn launch(&self, path: &Path) -> Result<(), LaunchError>;

    /// Start the editor on a file. `true` if the process started. Errors are
    /// logged, not returned.
    async fn launch_fallback_editor(&self, path: &Path) -> bool {
        match self.launch(path).await {
            Ok(()) => true,
            Err(error) => {
                error!(
                    error = &error as &dyn Error,
                    ?path,
                    "Error launching fallback editor"
                );
                false
            }
        }
    }
}

/// [NativeOpener] for the current platform:
/// - Windows: `ShellExecuteW` with the `open` verb
/// - macOS: `open`
/// - Everything else: `xdg-open`
#[derive(Debug, Default)]
pub struct SystemOpener;

impl NativeOpener for SystemOpener {
    #[cfg(windows)]
    async fn open(&self, path: &Path) -> Result<(), LaunchError> {
        let path = path.to_owned();
        // ShellExecuteW blocks while the shell resolves the handler
        tokio::task::spawn_blocking(move || win32::shell_open(&path)).await?
    }

    /// The opener is spawned, not awaited. In its generic mode `xdg-open`
    /// runs the handler in the foreground, so waiting on it could mean waiting
    /// for the user to close the editor. The cost is that a handler that fails
    /// after starting isn't reported.
    #[cfg(not(windows))]
    async fn open(&self, path: &Path) -> Result<(), LaunchError> {
        spawn_detached(NATIVE_OPENER, &[], path)
    }
}

/// Program that opens a file with its default handler
#[cfg(target_os = "macos")]
const NATIVE_OPENER: &str = "open";
#[cfg(not(any(windows, target_os = "macos")))]
const NATIVE_OPENER: &str = "xdg-open";

/// Start a program with a file as its final argument, without waiting for it
/// to exit. Succeeds as soon as the process has started.
fn spawn_detached(
    program: &str,
    args: &[String],
    path: &Path,
) -> Result<(), LaunchError> {
    let child = Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::null())
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            program: program.to_owned(),
            source,
        })?;
    info!(%program, pid = ?child.id(), ?path, "Started process");
    // Dropping the handle leaves the process running. We don't care when the
    // user closes it.
    drop(child);
    Ok(())
}

/// Starts a known-safe plain text editor, regardless of OS associations. The
/// command is run directly with the file as its final argument. It never goes
/// through a shell, so paths with spaces or shell metacharacters are passed
/// through untouched.
#[derive(Debug)]
pub struct FallbackLauncher {
    command: Vec<String>,
}

impl FallbackLauncher {
    /// Create a launcher for a command, given as program followed by any
    /// leading arguments
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    /// Program that will be started
    pub fn program(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }
}

impl Default for FallbackLauncher {
    fn default() -> Self {
        Self::new(vec!["notepad.exe".into()])
    }
}

impl EditorLauncher for FallbackLauncher {
    async fn launch(&self, path: &Path) -> Result<(), LaunchError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or(LaunchError::EmptyCommand)?;
        spawn_detached(program, args, path)
    }
}
