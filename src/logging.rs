//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Release builds have no console, so records go to
//! `%TEMP%\MonacoPreview\preview.log`.  Debug builds log to stderr.  The
//! filter is read from `MONACO_PREVIEW_LOG` (e.g. `debug`,
//! `monaco_preview=trace`) and defaults to `info`.

use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the filter directives.
pub(crate) const LOG_ENV: &str = "MONACO_PREVIEW_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// Stderr in debug builds, the temp-dir log file otherwise.
    pub(crate) fn for_build() -> Self {
        if cfg!(debug_assertions) {
            LogTarget::Stderr
        } else {
            LogTarget::File(default_log_path())
        }
    }
}

/// `%TEMP%\MonacoPreview\preview.log`, next to the WebView2 user data.
pub(crate) fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("MonacoPreview").join("preview.log")
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber.  Call once, first thing in `main`.
///
/// A log file that cannot be opened falls back to stderr; logging problems
/// never stop the preview.
pub(crate) fn init(target: &LogTarget) {
    let filter = build_env_filter();

    let file = match target {
        LogTarget::Stderr => None,
        LogTarget::File(path) => match open_log_file(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("monaco-preview: cannot open log file {}: {e}", path.display());
                None
            }
        },
    };

    let result = match file {
        Some(file) => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            )
            .try_init(),
        None => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("monaco-preview: logging already initialised: {e}");
    }
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_lives_under_temp() {
        let path = default_log_path();
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(path.ends_with("MonacoPreview/preview.log"));
    }

    #[test]
    fn open_log_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("preview.log");
        open_log_file(&path).expect("open");
        assert!(path.exists());
    }

    #[test]
    fn build_target_matches_profile() {
        match LogTarget::for_build() {
            LogTarget::Stderr => assert!(cfg!(debug_assertions)),
            LogTarget::File(_) => assert!(!cfg!(debug_assertions)),
        }
    }
}
