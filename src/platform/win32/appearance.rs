// ── System app mode ───────────────────────────────────────────────────────────
//
// Windows stores the "Choose your default app mode" setting as the DWORD
// `AppsUseLightTheme` under the per-user Personalize key: 1 = light, 0 = dark.

#![allow(unsafe_code)]

use std::ffi::c_void;

use windows::{
    core::w,
    Win32::{
        Foundation::ERROR_SUCCESS,
        System::Registry::{RegGetValueW, HKEY_CURRENT_USER, RRF_RT_REG_DWORD},
    },
};

use crate::theme::SystemMode;

/// Read the current app mode.  Missing or unreadable values mean light, the
/// Windows default.
pub(crate) fn system_mode() -> SystemMode {
    let mut value: u32 = 1;
    let mut size = std::mem::size_of::<u32>() as u32;

    // SAFETY: `value` and `size` are live, correctly sized locals for the
    // duration of the call; RRF_RT_REG_DWORD restricts the write to 4 bytes.
    let status = unsafe {
        RegGetValueW(
            HKEY_CURRENT_USER,
            w!("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize"),
            w!("AppsUseLightTheme"),
            RRF_RT_REG_DWORD,
            None,
            Some((&mut value as *mut u32).cast::<c_void>()),
            Some(&mut size as *mut u32),
        )
    };

    if status != ERROR_SUCCESS {
        tracing::debug!(code = status.0, "AppsUseLightTheme unavailable, assuming light");
        return SystemMode::Light;
    }
    if value == 0 {
        SystemMode::Dark
    } else {
        SystemMode::Light
    }
}
