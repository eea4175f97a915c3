//! Test doubles for the OS: an in-memory association store and openers that
//! record what they were asked to open

use crate::{
    association::{
        AssociationInspector, AssociationKey, AssociationStore,
        InspectionError, KeyPath, RegistryAccess,
    },
    launch::{EditorLauncher, LaunchError, NativeOpener},
};
use indexmap::IndexMap;
use rstest::fixture;
use std::{
    io,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Extension inspected in tests
pub const EXTENSION: &str = ".js";

/// Handler values from a user who picked a real editor
pub const SAFE_VALUES: &[(&str, Option<&str>)] = &[
    (
        "Progid",
        Some(r#"C:\Program Files\Sublime\sublime_text.exe "%1""#),
    ),
    ("Hash", Some("mBb0KL4dWpE=")),
];

/// Handler values pointing at the script host
pub const UNSAFE_VALUES: &[(&str, Option<&str>)] = &[
    ("Progid", Some(r"C:\Windows\System32\WScript.exe")),
    ("Hash", Some("")),
];

/// Contents of one key in a [MemoryStore]
#[derive(Clone, Debug, Default)]
pub struct MemoryKeyData {
    pub subkeys: Vec<String>,
    /// `None` simulates a value that exists but isn't a string
    pub values: Vec<(String, Option<String>)>,
    /// Opening the key fails with a permission error
    pub deny_open: bool,
    /// Listing subkeys/values fails after the key is opened
    pub fail_enumeration: bool,
}

/// How many key handles have been opened and closed
#[derive(Debug, Default)]
pub struct HandleCounter {
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl HandleCounter {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

/// In-memory association store. Tracks every handle it hands out so tests
/// can check that each one is closed exactly once.
#[derive(Debug, Default)]
pub struct MemoryStore {
    keys: IndexMap<KeyPath, MemoryKeyData>,
    handles: Arc<HandleCounter>,
}

impl MemoryStore {
    /// Add a key
    #[must_use]
    pub fn with_key(mut self, path: KeyPath, data: MemoryKeyData) -> Self {
        self.keys.insert(path, data);
        self
    }

    /// Add an association root for [EXTENSION] with the given subkeys
    #[must_use]
    pub fn with_root(self, subkeys: &[&str]) -> Self {
        self.with_key(
            KeyPath::file_exts(EXTENSION),
            MemoryKeyData {
                subkeys: subkeys.iter().map(ToString::to_string).collect(),
                ..MemoryKeyData::default()
            },
        )
    }

    /// Add a full association for [EXTENSION], with a user choice holding the
    /// given values
    #[must_use]
    pub fn with_user_choice(self, values: &[(&str, Option<&str>)]) -> Self {
        let path = KeyPath::file_exts(EXTENSION).join("UserChoice");
        self.with_root(&["OpenWithList", "OpenWithProgids", "UserChoice"])
            .with_key(
                path,
                MemoryKeyData {
                    values: values
                        .iter()
                        .map(|(name, value)| {
                            ((*name).to_owned(), value.map(str::to_owned))
                        })
                        .collect(),
                    ..MemoryKeyData::default()
                },
            )
    }

    /// Modify an existing key
    #[must_use]
    pub fn modify(
        mut self,
        path: &KeyPath,
        f: impl FnOnce(&mut MemoryKeyData),
    ) -> Self {
        f(self.keys.get_mut(path).expect("key not in store"));
        self
    }

    /// Handle counts for this store
    pub fn handles(&self) -> &HandleCounter {
        &self.handles
    }

    /// Wrap this store in an inspector for [EXTENSION]
    pub fn inspector(self) -> AssociationInspector<Self> {
        AssociationInspector::new(RegistryAccess::loaded(self), EXTENSION)
    }
}

impl AssociationStore for MemoryStore {
    type Key = MemoryKey;

    fn open_key(&self, path: &KeyPath) -> Result<MemoryKey, InspectionError> {
        let data = self.keys.get(path).ok_or_else(|| {
            InspectionError::KeyNotFound { path: path.clone() }
        })?;
        if data.deny_open {
            return Err(InspectionError::OpenKey {
                path: path.clone(),
                reason: "Access is denied".into(),
            });
        }
        self.handles.opened.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryKey {
            path: path.clone(),
            data: data.clone(),
            handles: Arc::clone(&self.handles),
        })
    }
}

/// Open key in a [MemoryStore]. Counts as closed when dropped.
#[derive(Debug)]
pub struct MemoryKey {
    path: KeyPath,
    data: MemoryKeyData,
    handles: Arc<HandleCounter>,
}

impl MemoryKey {
    fn check_enumeration(&self) -> Result<(), InspectionError> {
        if self.data.fail_enumeration {
            Err(InspectionError::Enumerate {
                path: self.path.clone(),
                reason: "The configuration registry database is corrupt".into(),
            })
        } else {
            Ok(())
        }
    }
}

impl AssociationKey for MemoryKey {
    fn subkey_names(&self) -> Result<Vec<String>, InspectionError> {
        self.check_enumeration()?;
        Ok(self.data.subkeys.clone())
    }

    fn value_names(&self) -> Result<Vec<String>, InspectionError> {
        self.check_enumeration()?;
        Ok(self.data.values.iter().map(|(name, _)| name.clone()).collect())
    }

    fn string_value(&self, name: &str) -> Option<String> {
        self.data
            .values
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, value)| value.clone())
    }
}

impl Drop for MemoryKey {
    fn drop(&mut self) {
        self.handles.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Store loader that always fails, like a platform without a registry
pub fn unsupported_store() -> Result<MemoryStore, InspectionError> {
    Err(InspectionError::Unsupported)
}

/// A [NativeOpener] and [EditorLauncher] that records each path it's given
/// instead of opening anything
#[derive(Debug, Default)]
pub struct RecordingOpener {
    calls: Mutex<Vec<PathBuf>>,
    fail: bool,
}

impl RecordingOpener {
    /// An opener whose every attempt fails
    pub fn failing() -> Self {
        Self {
            calls: Mutex::default(),
            fail: true,
        }
    }

    /// Every path this has been asked to open, in order
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, path: &Path) -> Result<(), LaunchError> {
        self.calls.lock().unwrap().push(path.to_owned());
        if self.fail {
            Err(LaunchError::Spawn {
                program: "recording".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "not found"),
            })
        } else {
            Ok(())
        }
    }
}

impl NativeOpener for RecordingOpener {
    async fn open(&self, path: &Path) -> Result<(), LaunchError> {
        self.record(path)
    }
}

impl EditorLauncher for RecordingOpener {
    async fn launch(&self, path: &Path) -> Result<(), LaunchError> {
        self.record(path)
    }
}

/// Store where the user picked a real editor
#[fixture]
pub fn safe_store() -> MemoryStore {
    MemoryStore::default().with_user_choice(SAFE_VALUES)
}

/// Store where the user's choice is the script host
#[fixture]
pub fn unsafe_store() -> MemoryStore {
    MemoryStore::default().with_user_choice(UNSAFE_VALUES)
}
