// ── DPI awareness ─────────────────────────────────────────────────────────────
//
// The process runs Per-Monitor v2 aware: the window is sized from the system
// DPI at creation and follows the rectangle Windows suggests whenever it
// moves to a monitor with a different scale.  WebView2 rescales its own
// content.

#![allow(unsafe_code)]

use windows::Win32::{
    Foundation::{HWND, LPARAM, RECT},
    UI::{
        HiDpi::{
            GetDpiForSystem, SetProcessDpiAwarenessContext,
            DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
        },
        WindowsAndMessaging::{SetWindowPos, SWP_NOACTIVATE, SWP_NOZORDER},
    },
};

pub(crate) const BASE_DPI: u32 = 96;

/// Scale a pixel value defined at 96 DPI to `dpi`.
pub(crate) fn scale(px: i32, dpi: u32) -> i32 {
    px * dpi as i32 / BASE_DPI as i32
}

/// Opt into Per-Monitor v2 DPI awareness.
/// MUST be called before any window is created on the calling thread.
pub(crate) fn init() {
    // SAFETY: Must precede all window creation; single call at process start.
    // Fails only when awareness was already set (e.g. by a manifest).
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// `(width, height)` in physical pixels for a window laid out at 96 DPI,
/// scaled to the primary monitor.
pub(crate) fn initial_size(width: i32, height: i32) -> (i32, i32) {
    let dpi = system_dpi();
    (scale(width, dpi), scale(height, dpi))
}

/// Move the window onto the rectangle carried by WM_DPICHANGED.
///
/// # Safety
/// `lparam` must be the LPARAM of a WM_DPICHANGED message currently being
/// handled for `hwnd`.
pub(crate) unsafe fn apply_suggested_rect(hwnd: HWND, lparam: LPARAM) {
    // SAFETY: for WM_DPICHANGED, lparam points to a RECT owned by the system
    // that is valid for the duration of the message (caller contract).
    let Some(rect) = (lparam.0 as *const RECT).as_ref() else {
        return;
    };
    // SAFETY: hwnd is the window receiving the message.
    let result = SetWindowPos(
        hwnd,
        HWND::default(),
        rect.left,
        rect.top,
        rect.right - rect.left,
        rect.bottom - rect.top,
        SWP_NOZORDER | SWP_NOACTIVATE,
    );
    if let Err(e) = result {
        tracing::warn!(error = %e, "could not apply DPI-scaled window rectangle");
    }
}

fn system_dpi() -> u32 {
    // SAFETY: GetDpiForSystem takes no parameters and always succeeds on Win10+.
    match unsafe { GetDpiForSystem() } {
        0 => BASE_DPI,
        v => v,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_identity_at_base_dpi() {
        assert_eq!(scale(960, BASE_DPI), 960);
    }

    #[test]
    fn scale_follows_dpi() {
        assert_eq!(scale(960, 144), 1440);
        assert_eq!(scale(640, 192), 1280);
    }
}
