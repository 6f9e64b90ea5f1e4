// ── Preview pipeline ──────────────────────────────────────────────────────────
//
// gate → classify → assemble → fill template.  Runs once, before the window
// exists, and produces the single HTML string the render host navigates to.
// Read failures end up as an in-pane notice; only install problems (the
// template) escape as errors.

use std::{
    fs,
    path::{Path, PathBuf},
};

use url::Url;

use crate::{
    document::{
        assemble::{assemble, decode_text, read_bounded},
        template::Template,
        Notice,
    },
    error::{PreviewError, Result},
    languages::language_id_for_path,
    settings::Settings,
    theme::Theme,
};

// ── Size gate ─────────────────────────────────────────────────────────────────

/// Files of this size or larger are not rendered.
pub(crate) const MAX_FILE_SIZE_BYTES: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Render,
    Reject,
}

/// Decide from the size alone whether a file is rendered.  The limit itself
/// is rejected.
pub(crate) fn gate(file_size_bytes: u64, threshold_bytes: u64) -> Decision {
    if file_size_bytes >= threshold_bytes {
        Decision::Reject
    } else {
        Decision::Render
    }
}

// ── PreviewRequest ────────────────────────────────────────────────────────────

/// The file to preview, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PreviewRequest {
    pub(crate) file_path: PathBuf,
    pub(crate) file_size_bytes: u64,
}

impl PreviewRequest {
    /// Stat `path` without reading its content.
    pub(crate) fn from_path(path: PathBuf) -> Result<Self> {
        match fs::metadata(&path) {
            Ok(meta) => Ok(Self {
                file_size_bytes: meta.len(),
                file_path: path,
            }),
            Err(source) => Err(PreviewError::FileUnreadable { path, source }),
        }
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Inputs of the pipeline that do not come from the file itself.
#[derive(Debug)]
pub(crate) struct RenderContext<'a> {
    pub(crate) settings: &'a Settings,
    pub(crate) theme: Theme,
    /// Directory holding the executable and `index.html`.
    pub(crate) install_dir: &'a Path,
}

/// Build the HTML document for `path`.
pub(crate) fn prepare(path: PathBuf, ctx: &RenderContext<'_>) -> Result<String> {
    let request = match PreviewRequest::from_path(path) {
        Ok(request) => request,
        Err(e) => return notice_for(e),
    };

    let decision = gate(request.file_size_bytes, MAX_FILE_SIZE_BYTES);
    tracing::info!(
        size = request.file_size_bytes,
        ?decision,
        "size gate"
    );
    if decision == Decision::Reject {
        return Ok(Notice::Oversized.html());
    }

    let language = language_id_for_path(&request.file_path);
    let doc = match assemble(
        &request.file_path,
        language,
        ctx.settings.wrap,
        ctx.theme,
        MAX_FILE_SIZE_BYTES,
    ) {
        Ok(doc) => doc,
        Err(e) => return notice_for(e),
    };

    let template = Template::load(ctx.install_dir)?;
    let html = template.fill(&doc);
    tracing::info!(
        language,
        theme = ctx.theme.monaco_id(),
        wrap = ctx.settings.wrap,
        html_len = html.len(),
        "document assembled"
    );
    Ok(html)
}

/// Turn a read failure into the notice shown in the pane; anything else is
/// passed through.
fn notice_for(err: PreviewError) -> Result<String> {
    let notice = match &err {
        PreviewError::FileUnreadable { source, .. } => Notice::Unreadable(source.to_string()),
        PreviewError::Oversized { .. } => Notice::Oversized,
        PreviewError::NotText { .. } => Notice::NotText,
        _ => return Err(err),
    };
    tracing::warn!(error = %err, "showing notice instead of file");
    Ok(notice.html())
}

/// A link to the hosted editor page with the content of `path` in its query,
/// rendered with the same language, theme and wrap mode as a local preview.
///
/// The file is read and decoded by the same rules as a local preview; unlike
/// `prepare`, failures are returned rather than shown.
pub(crate) fn share_link(path: &Path, settings: &Settings, theme: Theme) -> Result<Url> {
    let bytes = read_bounded(path, MAX_FILE_SIZE_BYTES)?;
    let code = decode_text(&bytes).ok_or_else(|| PreviewError::NotText {
        path: path.to_owned(),
    })?;

    let language = language_id_for_path(path);
    let url = settings.share_url(theme, &code, language)?;
    tracing::info!(language, url_len = url.as_str().len(), "share link built");
    Ok(url)
}

/// Directory containing the running executable.
pub(crate) fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| PreviewError::Io(std::io::Error::other("executable has no parent directory")))
}

/// The window title for the previewed file.
pub(crate) fn window_title(path: &Path) -> String {
    match path.file_name() {
        Some(name) => format!("{} - Monaco Preview", name.to_string_lossy()),
        None => "Monaco Preview".to_owned(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
