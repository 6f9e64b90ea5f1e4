// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in the preview return `error::Result<T>`.  No panics
// in production paths.  Fatal errors surface as a single error dialog shown by
// `main()`; the rest are turned into an in-pane notice document by
// `app::prepare` (see `PreviewError::is_fatal`).

use std::path::PathBuf;

use thiserror::Error;

/// Every error that the preview can produce.
#[derive(Debug, Error)]
pub(crate) enum PreviewError {
    /// No file path was given on the command line.
    #[error("no file to preview: pass the path of the file as the only argument")]
    InputMissing,

    /// The command line could not be parsed for any other reason.
    #[error("invalid command line: {0}")]
    Usage(String),

    /// The target file could not be inspected or read.
    #[error("cannot read {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file reached the size limit while it was being read.
    #[error("{} is too large to preview (limit {limit} bytes)", path.display())]
    Oversized { path: PathBuf, limit: u64 },

    /// The file content is binary and cannot be shown as text.
    #[error("{} does not contain displayable text", path.display())]
    NotText { path: PathBuf },

    /// The HTML template next to the executable is missing or unreadable.
    #[error("preview template {} is missing: {source}", path.display())]
    TemplateMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTML template lacks one of its substitution tokens.
    #[error("preview template {} has no {token} placeholder", path.display())]
    TemplateInvalid { path: PathBuf, token: &'static str },

    /// The WebView2 runtime could not be started or attached to the window.
    #[error("WebView2 could not start during {stage} (error {code:#010x})")]
    BrowserEngineInit {
        /// The initialisation step that failed, for display purposes.
        stage: &'static str,
        /// The HRESULT reported by the engine, reinterpreted as `u32`.
        code: u32,
    },

    /// A Win32 API call returned a failure code.
    #[cfg_attr(not(windows), allow(dead_code))]
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// Previews are only displayed on Windows.
    #[cfg_attr(windows, allow(dead_code))]
    #[error("previews can only be displayed on Windows")]
    UnsupportedPlatform,

    /// The configured share link base is not an absolute URL.
    #[error("invalid share link base URL: {0}")]
    ShareLink(#[from] url::ParseError),

    /// A standard I/O error outside the file being previewed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PreviewError {
    /// `false` for errors that are shown inside the preview pane instead of
    /// aborting the process.
    pub(crate) fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::FileUnreadable { .. } | Self::Oversized { .. } | Self::NotText { .. }
        )
    }
}

// Convert a windows-crate error (HRESULT) directly into a PreviewError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for PreviewError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub(crate) type Result<T> = std::result::Result<T, PreviewError>;

// ── Tests ─────────────────────────────────────────────────────────────────────
