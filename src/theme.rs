// ── Light / dark theme selection ──────────────────────────────────────────────
//
// Resolves the user's theme preference against the current system mode and
// maps the result onto Monaco's built-in theme names.  The system mode query
// itself lives in `platform::win32::appearance`; everything here is pure Rust.

use serde::{Deserialize, Serialize};

// ── System mode ───────────────────────────────────────────────────────────────

/// The light/dark mode currently selected for apps in the OS settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SystemMode {
    Light,
    Dark,
}

/// Read the current system mode.  Falls back to `Light` when the mode cannot
/// be determined (or on non-Windows hosts).
pub(crate) fn system_mode() -> SystemMode {
    #[cfg(windows)]
    {
        crate::platform::win32::appearance::system_mode()
    }
    #[cfg(not(windows))]
    {
        SystemMode::Light
    }
}

// ── Theme ─────────────────────────────────────────────────────────────────────

/// The editor theme the document is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Monaco built-in theme name substituted into the template.
    pub(crate) fn monaco_id(self) -> &'static str {
        match self {
            Theme::Light => "vs",
            Theme::Dark => "vs-dark",
        }
    }
}

// ── User preference ───────────────────────────────────────────────────────────

/// Theme preference stored in the settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ThemePreference {
    /// Follow the system app mode.
    #[default]
    System,
    Light,
    Dark,
}

impl ThemePreference {
    /// Pick the theme for the given system mode.
    pub(crate) fn resolve(self, mode: SystemMode) -> Theme {
        match (self, mode) {
            (ThemePreference::Light, _) => Theme::Light,
            (ThemePreference::Dark, _) => Theme::Dark,
            (ThemePreference::System, SystemMode::Light) => Theme::Light,
            (ThemePreference::System, SystemMode::Dark) => Theme::Dark,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
