//! Shell bindings for the native open primitive
#![expect(unsafe_code, reason = "ShellExecuteW is FFI")]

use crate::launch::LaunchError;
use std::path::Path;
use windows::{
    Win32::{
        Foundation::HWND,
        UI::{Shell::ShellExecuteW, WindowsAndMessaging::SW_SHOWNORMAL},
    },
    core::{HSTRING, PCWSTR, w},
};

/// `ShellExecuteW` returns a value greater than this on success. Anything at
/// or below is an error code.
const MAX_ERROR_CODE: isize = 32;

/// Open a file with its associated handler, via the shell's `open` verb
pub fn shell_open(path: &Path) -> Result<(), LaunchError> {
    let file = HSTRING::from(path.as_os_str());
    // SAFETY: All strings live through the call, and a null window handle is
    // allowed
    let instance = unsafe {
        ShellExecuteW(
            HWND(0),
            w!("open"),
            &file,
            PCWSTR::null(),
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };
    if instance.0 > MAX_ERROR_CODE {
        Ok(())
    } else {
        Err(LaunchError::Shell { code: instance.0 })
    }
}
