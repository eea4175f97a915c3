//! Read-only inspection of the OS file-type association store. On Windows this
//! is the registry, under the current user's `FileExts` tree:
//!
//! ```notrust
//! HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\FileExts\.js
//!   OpenWithList\
//!   OpenWithProgids\
//!   UserChoice\          <- the user's explicit choice of handler
//!     Progid = "Applications\code.exe"
//!     Hash   = "..."
//! ```
//!
//! The store is accessed through [AssociationStore] and [AssociationKey] so
//! the inspection logic is independent of the platform bindings. Nothing in
//! here ever writes to the store.

#[cfg(windows)]
mod win32;

#[cfg(windows)]
pub use win32::WindowsRegistry as SystemRegistry;

/// Association store for the current platform
#[cfg(not(windows))]
pub type SystemRegistry = NoRegistry;

use crate::policy::is_default_handler_safe;
use cfgopen_util::ResultTraced;
use derive_more::{Deref, Display};
use indexmap::IndexMap;
use std::{error::Error, sync::OnceLock};
use thiserror::Error;
use tracing::{debug, warn};

/// Root of the per-extension association tree, relative to the current-user
/// hive
const FILE_EXTS_ROOT: &str =
    r"Software\Microsoft\Windows\CurrentVersion\Explorer\FileExts";
/// Child key names ending with this record the user's explicit choice of
/// handler, as opposed to a system-wide default
const USER_CHOICE_SUFFIX: &str = "UserChoice";

/// Path to a key, relative to the current-user hive. Components are separated
/// by backslashes.
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
pub struct KeyPath(String);

impl KeyPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Path to the association root for an extension, e.g. `.js`
    pub fn file_exts(extension: &str) -> Self {
        Self(format!("{FILE_EXTS_ROOT}\\{extension}"))
    }

    /// Get the path of a child key
    #[must_use]
    pub fn join(&self, child: &str) -> Self {
        Self(format!("{}\\{child}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Names of the handler keys found for one extension, in enumeration order
#[derive(Clone, Debug, Default, Deref, PartialEq)]
pub struct ExtensionHandlerSet(Vec<String>);

impl ExtensionHandlerSet {
    /// Get the name of the key recording the user's choice, if any. There
    /// should only ever be one, but take the first to be safe.
    pub fn user_choice(&self) -> Option<&str> {
        self.0
            .iter()
            .find(|name| name.ends_with(USER_CHOICE_SUFFIX))
            .map(String::as_str)
    }
}

impl From<Vec<String>> for ExtensionHandlerSet {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

/// Named string values read from one handler key, in enumeration order.
/// Values that are missing or not strings are stored as `""`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandlerValueSet(IndexMap<String, String>);

impl HandlerValueSet {
    /// Get a value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterate over all values, discarding names
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for HandlerValueSet {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An error reading from the association store. None of these ever reach the
/// user; they downgrade the inspection to "no safe default".
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InspectionError {
    /// This platform has no association store we know how to read
    #[error("File associations cannot be inspected on this platform")]
    Unsupported,

    /// The store exists but couldn't be loaded
    #[error("Error loading file association store: {reason}")]
    Unavailable { reason: String },

    #[error("Key `{path}` does not exist")]
    KeyNotFound { path: KeyPath },

    /// Key exists but couldn't be opened, e.g. insufficient permissions
    #[error("Error opening key `{path}`: {reason}")]
    OpenKey { path: KeyPath, reason: String },

    /// Listing the subkeys or values of an open key failed
    #[error("Error enumerating key `{path}`: {reason}")]
    Enumerate { path: KeyPath, reason: String },
}

/// A read-only view of the association store for the current user
pub trait AssociationStore {
    type Key: AssociationKey;

    /// Open a key for reading. The key is closed when the returned value is
    /// dropped, so every handle is released exactly once regardless of how the
    /// caller exits.
    fn open_key(&self, path: &KeyPath) -> Result<Self::Key, InspectionError>;
}

/// An open key in the association store
pub trait AssociationKey {
    /// Names of the immediate children of this key
    fn subkey_names(&self) -> Result<Vec<String>, InspectionError>;

    /// Names of the values stored directly in this key
    fn value_names(&self) -> Result<Vec<String>, InspectionError>;

    /// Get the string contents of a value. `None` if the value is missing or
    /// isn't a string.
    fn string_value(&self, name: &str) -> Option<String>;
}

/// Lazily loaded, load-once access to an association store. The first call to
/// [get](Self::get) loads the store; the outcome (including failure) is cached
/// for all later calls. Loading failure is never fatal, it just means nothing
/// can be inspected.
pub struct RegistryAccess<S> {
    store: OnceLock<Result<S, InspectionError>>,
    load: fn() -> Result<S, InspectionError>,
}

impl<S> RegistryAccess<S> {
    /// Create access that will be loaded with the given function on first use
    pub fn new(load: fn() -> Result<S, InspectionError>) -> Self {
        Self {
            store: OnceLock::new(),
            load,
        }
    }

    /// Create access around an already loaded store
    pub fn loaded(store: S) -> Self {
        Self {
            store: OnceLock::from(Ok(store)),
            // Unreachable, the lock is already populated
            load: || {
                Err(InspectionError::Unavailable {
                    reason: "store was never loaded".into(),
                })
            },
        }
    }

    /// Get the store, loading it if this is the first access
    pub fn get(&self) -> Result<&S, InspectionError> {
        self.store
            .get_or_init(|| {
                let result = (self.load)();
                match &result {
                    Ok(_) => debug!("Loaded file association store"),
                    Err(error) => warn!(
                        error = error as &dyn Error,
                        "File association store unavailable"
                    ),
                }
                result
            })
            .as_ref()
            .map_err(InspectionError::clone)
    }

    /// Has a load been attempted yet?
    pub fn is_initialized(&self) -> bool {
        self.store.get().is_some()
    }
}

impl RegistryAccess<SystemRegistry> {
    /// Access to the current platform's store
    pub fn system() -> Self {
        Self::new(SystemRegistry::load)
    }
}

/// Inspects the current user's association for one extension. The extension
/// is fixed at construction; it is never derived from the file being opened.
pub struct AssociationInspector<S> {
    access: RegistryAccess<S>,
    extension: String,
}

impl<S: AssociationStore> AssociationInspector<S> {
    pub fn new(access: RegistryAccess<S>, extension: impl Into<String>) -> Self {
        Self {
            access,
            extension: extension.into(),
        }
    }

    /// Extension being inspected, e.g. `.js`
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn access(&self) -> &RegistryAccess<S> {
        &self.access
    }

    /// Path of the association root for our extension
    pub fn root_key(&self) -> KeyPath {
        KeyPath::file_exts(&self.extension)
    }

    /// List the handler keys configured for our extension
    pub fn handler_keys(&self) -> Result<ExtensionHandlerSet, InspectionError> {
        let store = self.access.get()?;
        let key = store.open_key(&self.root_key())?;
        // Key is dropped (closed) on the way out, even if enumeration fails
        let names = key.subkey_names()?;
        Ok(names.into())
    }

    /// Find the key recording the user's explicit choice of handler for our
    /// extension. `Ok(None)` if the extension has no association root, or the
    /// root has no user choice.
    pub fn find_user_chosen_handler_key(
        &self,
    ) -> Result<Option<KeyPath>, InspectionError> {
        let handlers = match self.handler_keys() {
            Ok(handlers) => handlers,
            Err(InspectionError::KeyNotFound { path }) => {
                debug!(%path, "No associations for extension");
                return Ok(None);
            }
            Err(error) => return Err(error).traced(),
        };
        Ok(handlers.user_choice().map(|name| self.root_key().join(name)))
    }

    /// Read every value of a handler key as a string. A missing key yields an
    /// empty set.
    pub fn read_handler_values(
        &self,
        path: &KeyPath,
    ) -> Result<HandlerValueSet, InspectionError> {
        let store = self.access.get()?;
        let key = match store.open_key(path) {
            Ok(key) => key,
            Err(InspectionError::KeyNotFound { .. }) => {
                debug!(%path, "Handler key is gone");
                return Ok(HandlerValueSet::default());
            }
            Err(error) => return Err(error).traced(),
        };
        let values = key
            .value_names()
            .traced()?
            .into_iter()
            .map(|name| {
                let value = key.string_value(&name).unwrap_or_default();
                (name, value)
            })
            .collect();
        Ok(values)
    }

    /// Has the user explicitly chosen a handler for our extension, and is that
    /// handler safe for editing? No recorded choice counts as *not* safe,
    /// because the OS default is exactly what we're guarding against.
    pub fn has_safe_default_configured(&self) -> Result<bool, InspectionError> {
        let Some(path) = self.find_user_chosen_handler_key()? else {
            debug!(extension = %self.extension, "No user choice recorded");
            return Ok(false);
        };
        let values = self.read_handler_values(&path)?;
        let safe = is_default_handler_safe(values.values());
        debug!(%path, ?values, safe, "Inspected default handler");
        Ok(safe)
    }
}

/// Store for platforms without a registry. It can never be constructed, so
/// inspection on these platforms always fails with
/// [Unsupported](InspectionError::Unsupported).
#[derive(Debug)]
pub enum NoRegistry {}

impl NoRegistry {
    pub fn load() -> Result<Self, InspectionError> {
        Err(InspectionError::Unsupported)
    }
}

impl AssociationStore for NoRegistry {
    type Key = Self;

    fn open_key(&self, _: &KeyPath) -> Result<Self::Key, InspectionError> {
        match *self {}
    }
}

impl AssociationKey for NoRegistry {
    fn subkey_names(&self) -> Result<Vec<String>, InspectionError> {
        match *self {}
    }

    fn value_names(&self) -> Result<Vec<String>, InspectionError> {
        match *self {}
    }

    fn string_value(&self, _: &str) -> Option<String> {
        match *self {}
    }
}
