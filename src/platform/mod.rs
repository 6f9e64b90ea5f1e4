// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface the rest of the codebase uses to talk to
// the OS.  No `unsafe` lives here; all Win32 / WebView2 FFI is confined to the
// `win32` sub-module and never leaks outward.  On other hosts the pipeline
// still runs, but nothing can be displayed.

use std::path::PathBuf;

use crate::{error::Result, surface::lockdown::LockdownPolicy, theme::Theme};

#[cfg(windows)]
pub(crate) mod win32;

/// Everything the render host needs to show one document.
#[derive(Debug)]
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) struct HostConfig {
    /// Window title.
    pub(crate) title: String,
    /// The fully assembled document, navigated to as a string.
    pub(crate) html: String,
    /// Directory served under the virtual host name.
    pub(crate) install_dir: PathBuf,
    /// Private WebView2 user data folder.
    pub(crate) user_data_dir: PathBuf,
    /// Theme the document was rendered with; the window background follows it.
    pub(crate) theme: Theme,
    pub(crate) lockdown: LockdownPolicy,
}

/// Create the window, present the document and run until it is closed.
pub(crate) fn run(config: HostConfig) -> Result<()> {
    #[cfg(windows)]
    {
        win32::window::run(config)
    }
    #[cfg(not(windows))]
    {
        tracing::debug!(html_len = config.html.len(), "no display host on this platform");
        Err(crate::error::PreviewError::UnsupportedPlatform)
    }
}

/// Report a fatal error to the user: a modal dialog on Windows, stderr
/// elsewhere.
pub(crate) fn show_error_dialog(message: &str) {
    #[cfg(windows)]
    win32::window::show_error_dialog(message);
    #[cfg(not(windows))]
    eprintln!("monaco-preview: {message}");
}
