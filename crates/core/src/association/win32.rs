//! Registry bindings for the association store. Every key is opened with
//! `KEY_READ` only.
#![expect(unsafe_code, reason = "Win32 registry calls are FFI")]

use crate::association::{
    AssociationKey, AssociationStore, InspectionError, KeyPath,
};
use std::error::Error;
use tracing::warn;
use windows::{
    Win32::{
        Foundation::{ERROR_FILE_NOT_FOUND, ERROR_NO_MORE_ITEMS},
        System::Registry::{
            HKEY, KEY_READ, RRF_RT_REG_SZ, RegCloseKey, RegEnumKeyExW,
            RegEnumValueW, RegGetValueW, RegOpenCurrentUser, RegOpenKeyExW,
        },
    },
    core::{HSTRING, PCWSTR, PWSTR},
};

/// Longest key name the registry allows, plus the terminator
const MAX_KEY_NAME: usize = 256;
/// Longest value name the registry allows, plus the terminator
const MAX_VALUE_NAME: usize = 16_384;

/// The current user's registry hive
#[derive(Debug)]
pub struct WindowsRegistry {
    root: RegKey,
}

impl WindowsRegistry {
    /// Open the current user's hive
    pub fn load() -> Result<Self, InspectionError> {
        let mut hkey = HKEY::default();
        // SAFETY: `hkey` outlives the call, and is only used if it succeeds
        unsafe { RegOpenCurrentUser(KEY_READ.0, &mut hkey) }.map_err(
            |error| InspectionError::Unavailable {
                reason: error.to_string(),
            },
        )?;
        Ok(Self {
            root: RegKey {
                hkey,
                path: KeyPath::new("HKEY_CURRENT_USER"),
            },
        })
    }
}

impl AssociationStore for WindowsRegistry {
    type Key = RegKey;

    fn open_key(&self, path: &KeyPath) -> Result<RegKey, InspectionError> {
        let mut hkey = HKEY::default();
        // SAFETY: The root handle is open for the lifetime of self, and the
        // subkey string lives through the call
        unsafe {
            RegOpenKeyExW(
                self.root.hkey,
                &HSTRING::from(path.as_str()),
                0,
                KEY_READ,
                &mut hkey,
            )
        }
        .map_err(|error| {
            if error.code() == ERROR_FILE_NOT_FOUND.to_hresult() {
                InspectionError::KeyNotFound { path: path.clone() }
            } else {
                InspectionError::OpenKey {
                    path: path.clone(),
                    reason: error.to_string(),
                }
            }
        })?;
        Ok(RegKey {
            hkey,
            path: path.clone(),
        })
    }
}

/// An open registry key, closed on drop
#[derive(Debug)]
pub struct RegKey {
    hkey: HKEY,
    path: KeyPath,
}

impl RegKey {
    /// Call an enumeration function with increasing indexes until it runs out
    /// of items, collecting the name written by each call
    fn enumerate(
        &self,
        capacity: usize,
        mut next: impl FnMut(u32, PWSTR, &mut u32) -> windows::core::Result<()>,
    ) -> Result<Vec<String>, InspectionError> {
        let mut names = Vec::new();
        let mut buffer = vec![0u16; capacity];
        for index in 0u32.. {
            let mut len = buffer.len() as u32;
            match next(index, PWSTR(buffer.as_mut_ptr()), &mut len) {
                Ok(()) => names.push(String::from_utf16_lossy(
                    &buffer[..len as usize],
                )),
                Err(error) if error.code() == ERROR_NO_MORE_ITEMS.to_hresult() => {
                    break;
                }
                Err(error) => {
                    return Err(InspectionError::Enumerate {
                        path: self.path.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }
        Ok(names)
    }
}

impl AssociationKey for RegKey {
    fn subkey_names(&self) -> Result<Vec<String>, InspectionError> {
        self.enumerate(MAX_KEY_NAME, |index, name, len| {
            // SAFETY: `name` points to a buffer of `len` u16s
            unsafe {
                RegEnumKeyExW(
                    self.hkey,
                    index,
                    name,
                    len,
                    None,
                    PWSTR::null(),
                    None,
                    None,
                )
            }
        })
    }

    fn value_names(&self) -> Result<Vec<String>, InspectionError> {
        self.enumerate(MAX_VALUE_NAME, |index, name, len| {
            // SAFETY: `name` points to a buffer of `len` u16s
            unsafe {
                RegEnumValueW(self.hkey, index, name, len, None, None, None, None)
            }
        })
    }

    fn string_value(&self, name: &str) -> Option<String> {
        let name = HSTRING::from(name);
        // First call gets the size in bytes, second reads the data. Restricting
        // to REG_SZ makes any other type an error, which we treat as absent.
        let mut size = 0u32;
        // SAFETY: No data buffer given, so only `size` is written
        unsafe {
            RegGetValueW(
                self.hkey,
                PCWSTR::null(),
                &name,
                RRF_RT_REG_SZ,
                None,
                None,
                Some(&mut size),
            )
        }
        .ok()?;

        let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
        // SAFETY: `buffer` holds at least `size` bytes
        unsafe {
            RegGetValueW(
                self.hkey,
                PCWSTR::null(),
                &name,
                RRF_RT_REG_SZ,
                None,
                Some(buffer.as_mut_ptr().cast()),
                Some(&mut size),
            )
        }
        .ok()?;
        // Data is null-terminated
        let len = buffer.iter().position(|c| *c == 0).unwrap_or(buffer.len());
        Some(String::from_utf16_lossy(&buffer[..len]))
    }
}

impl Drop for RegKey {
    fn drop(&mut self) {
        // SAFETY: The handle was opened by us and is closed exactly once, here
        if let Err(error) = unsafe { RegCloseKey(self.hkey) } {
            warn!(
                path = %self.path,
                error = &error as &dyn Error,
                "Error closing registry key"
            );
        }
    }
}
