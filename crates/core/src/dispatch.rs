//! Entrypoint: decide how to open a file, then open it


use crate::{
    association::{
        AssociationInspector, AssociationStore, InspectionError,
        RegistryAccess, SystemRegistry,
    },
    launch::{EditorLauncher, FallbackLauncher, NativeOpener, SystemOpener},
};
use derive_more::Display;
use std::{error::Error, path::Path};
use tracing::{debug, error, info, warn};

/// Whether the platform's default file associations can turn "open" into
/// "execute". This determines if we need to inspect associations before
/// delegating to the OS.
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
pub enum PlatformPolicy {
    /// Script extensions may be associated with a script host by default.
    /// Only open natively if the user has picked a safe handler.
    #[display("at-risk")]
    AtRisk,
    /// Default associations are trusted. Always open natively.
    #[display("standard")]
    Standard,
}

impl PlatformPolicy {
    /// Policy for the platform we're running on. Windows is the only platform
    /// that ships script-host associations for `.js`.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::AtRisk
        } else {
            Self::Standard
        }
    }

    /// Decide how a file with the inspector's extension should be opened.
    /// Under [Standard](Self::Standard) the association store is never
    /// touched. Inspection errors are logged and treated as "not safe".
    pub fn resolve_open_strategy<S: AssociationStore>(
        self,
        inspector: &AssociationInspector<S>,
    ) -> OpenStrategy {
        match self {
            Self::Standard => OpenStrategy::Native,
            Self::AtRisk => match inspector.has_safe_default_configured() {
                Ok(true) => OpenStrategy::Native,
                Ok(false) => {
                    warn!(
                        extension = inspector.extension(),
                        "Default handler is not a safe editor; \
                        opening with fallback editor"
                    );
                    OpenStrategy::Fallback
                }
                Err(error) => {
                    log_inspection_error(&error);
                    OpenStrategy::Fallback
                }
            },
        }
    }
}

/// Log a failed inspection. Platform-level failures are expected on some
/// setups, so they're only warnings. Anything else is unexpected.
fn log_inspection_error(error: &InspectionError) {
    match error {
        InspectionError::Unsupported | InspectionError::Unavailable { .. } => {
            warn!(
                error = error as &dyn Error,
                "Cannot inspect default handler; opening with fallback editor"
            );
        }
        InspectionError::KeyNotFound { .. }
        | InspectionError::OpenKey { .. }
        | InspectionError::Enumerate { .. } => {
            error!(
                error = error as &dyn Error,
                "Error inspecting default handler; \
                opening with fallback editor"
            );
        }
    }
}

/// How a file will be opened
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
pub enum OpenStrategy {
    /// Hand off to the OS default handler
    #[display("native")]
    Native,
    /// Start the fallback editor
    #[display("fallback")]
    Fallback,
}

/// Opens configuration files for editing, without ever letting the OS
/// execute them. Generic over the association store and both openers so the
/// decision logic can be driven without touching the OS.
pub struct OpenDispatcher<
    S = SystemRegistry,
    N = SystemOpener,
    F = FallbackLauncher,
> {
    platform: PlatformPolicy,
    inspector: AssociationInspector<S>,
    native: N,
    fallback: F,
}

impl OpenDispatcher {
    /// Dispatcher for the current platform. `extension` is the association
    /// to inspect, e.g. `.js`. `fallback_editor` is the command to start when
    /// the default handler can't be trusted.
    pub fn system(
        extension: impl Into<String>,
        fallback_editor: Vec<String>,
    ) -> Self {
        Self::new(
            PlatformPolicy::current(),
            AssociationInspector::new(RegistryAccess::system(), extension),
            SystemOpener,
            FallbackLauncher::new(fallback_editor),
        )
    }
}

impl<S, N, F> OpenDispatcher<S, N, F>
where
    S: AssociationStore,
    N: NativeOpener,
    F: EditorLauncher,
{
    pub fn new(
        platform: PlatformPolicy,
        inspector: AssociationInspector<S>,
        native: N,
        fallback: F,
    ) -> Self {
        Self {
            platform,
            inspector,
            native,
            fallback,
        }
    }

    pub fn platform(&self) -> PlatformPolicy {
        self.platform
    }

    pub fn inspector(&self) -> &AssociationInspector<S> {
        &self.inspector
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    /// Decide how a file would be opened, without opening anything
    pub fn strategy(&self) -> OpenStrategy {
        self.platform.resolve_open_strategy(&self.inspector)
    }

    /// Open a file for editing. `true` if an editor was started (or the OS
    /// accepted the open request), `false` if that failed. Never fails
    /// otherwise; all errors are logged.
    ///
    /// Resolves as soon as the editor is launched. It does *not* wait for the
    /// user to finish editing.
    pub async fn open_config(&self, path: &Path) -> bool {
        let strategy = self.strategy();
        debug!(platform = %self.platform, %strategy, ?path, "Opening file");
        match strategy {
            OpenStrategy::Native => self.open_native(path).await,
            OpenStrategy::Fallback => {
                self.fallback.launch_fallback_editor(path).await
            }
        }
    }

    async fn open_native(&self, path: &Path) -> bool {
        match self.native.open(path).await {
            Ok(()) => {
                info!(?path, "Opened with default handler");
                true
            }
            Err(error) => {
                error!(
                    error = &error as &dyn Error,
                    ?path,
                    "Error opening with default handler"
                );
                false
            }
        }
    }
}
