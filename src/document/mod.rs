// ── Preview documents ─────────────────────────────────────────────────────────
//
// The two kinds of document the preview can ever display: the assembled
// editor page for a source file, and a fixed in-pane notice.  Exactly one of
// them is handed to the render host per process.

pub(crate) mod assemble;
pub(crate) mod template;

use crate::theme::Theme;
use template::Placeholder;

/// Host name mapped to the installation directory inside the browser.
pub(crate) const VIRTUAL_HOST_NAME: &str = "PowerToysLocalMonaco";

/// Body shown instead of the editor when a file is too large to preview.
pub(crate) const OVERSIZED_MESSAGE: &str =
    "This file is too big to display.<br />Max file size: 3KB";

// ── RenderableDocument ────────────────────────────────────────────────────────

/// Everything the template needs to display one source file.
///
/// Produced by [`assemble::assemble`]; consumed by value when it is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RenderableDocument {
    pub(crate) language_id: &'static str,
    pub(crate) wrap_enabled: bool,
    pub(crate) theme: Theme,
    /// Standard base64 of the raw file bytes.  The alphabet contains no
    /// character that can close a string, a tag or a placeholder.
    pub(crate) encoded_source: String,
    pub(crate) virtual_host: &'static str,
}

impl RenderableDocument {
    /// The replacement text for `placeholder`.
    pub(crate) fn value(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::Lang => self.language_id,
            Placeholder::Wrap => {
                if self.wrap_enabled {
                    "1"
                } else {
                    "0"
                }
            }
            Placeholder::Theme => self.theme.monaco_id(),
            Placeholder::Code => &self.encoded_source,
            Placeholder::Url => self.virtual_host,
        }
    }
}

// ── Notices ───────────────────────────────────────────────────────────────────

/// A fixed message displayed as the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Notice {
    /// The file reached the size limit.
    Oversized,
    /// The file could not be read; carries the I/O error text.
    Unreadable(String),
    /// The file holds binary data.
    NotText,
}

impl Notice {
    pub(crate) fn html(&self) -> String {
        match self {
            Notice::Oversized => OVERSIZED_MESSAGE.to_owned(),
            Notice::Unreadable(reason) => {
                format!("This file could not be read.<br />{}", escape_html(reason))
            }
            Notice::NotText => "This file does not contain displayable text.".to_owned(),
        }
    }
}

/// Escape the characters that are significant in HTML text and attributes.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_notice_is_the_literal_message() {
        assert_eq!(
            Notice::Oversized.html(),
            "This file is too big to display.<br />Max file size: 3KB"
        );
    }

    #[test]
    fn unreadable_notice_escapes_reason() {
        let html = Notice::Unreadable("<denied> & \"gone\"".to_owned()).html();
        assert_eq!(
            html,
            "This file could not be read.<br />&lt;denied&gt; &amp; &quot;gone&quot;"
        );
    }

    #[test]
    fn document_values() {
        let doc = RenderableDocument {
            language_id: "rust",
            wrap_enabled: false,
            theme: Theme::Light,
            encoded_source: "Zm4=".to_owned(),
            virtual_host: VIRTUAL_HOST_NAME,
        };
        assert_eq!(doc.value(Placeholder::Lang), "rust");
        assert_eq!(doc.value(Placeholder::Wrap), "0");
        assert_eq!(doc.value(Placeholder::Theme), "vs");
        assert_eq!(doc.value(Placeholder::Code), "Zm4=");
        assert_eq!(doc.value(Placeholder::Url), "PowerToysLocalMonaco");
    }
}
