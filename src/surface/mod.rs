// ── Embedded browser surface policy ───────────────────────────────────────────
//
// Platform-neutral halves of the render host: which navigations may run and
// which surface capabilities stay on.  The WebView2 glue in
// `platform::win32::webview` feeds engine events into these types; nothing in
// here touches Win32 or COM.

// Only the Windows host drives these outside of tests.
#![cfg_attr(not(windows), allow(dead_code))]

pub(crate) mod guard;
pub(crate) mod lockdown;
