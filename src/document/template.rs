// ── HTML template ─────────────────────────────────────────────────────────────
//
// The editor page (`index.html`) ships next to the executable and carries five
// literal placeholder tokens.  Filling it is a single left-to-right pass of
// plain token replacement: replacement values are never rescanned, so nothing
// a value contains can be mistaken for another placeholder.

use std::{
    fs,
    path::{Path, PathBuf},
};

use super::RenderableDocument;
use crate::error::{PreviewError, Result};

/// File name of the template inside the installation directory.
pub(crate) const TEMPLATE_FILE_NAME: &str = "index.html";

/// Common prefix of every placeholder token.
const TOKEN_PREFIX: &str = "[[PT_";

// ── Placeholders ──────────────────────────────────────────────────────────────

/// The five substitution points of the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placeholder {
    /// Monaco language identifier.
    Lang,
    /// `"1"` when word wrap is on, `"0"` otherwise.
    Wrap,
    /// Monaco theme name.
    Theme,
    /// Base64 of the file bytes.
    Code,
    /// Virtual host name the page loads its assets from.
    Url,
}

impl Placeholder {
    pub(crate) const ALL: [Placeholder; 5] = [
        Placeholder::Lang,
        Placeholder::Wrap,
        Placeholder::Theme,
        Placeholder::Code,
        Placeholder::Url,
    ];

    /// The literal token as it appears in the template.
    pub(crate) fn token(self) -> &'static str {
        match self {
            Placeholder::Lang => "[[PT_LANG]]",
            Placeholder::Wrap => "[[PT_WRAP]]",
            Placeholder::Theme => "[[PT_THEME]]",
            Placeholder::Code => "[[PT_CODE]]",
            Placeholder::Url => "[[PT_URL]]",
        }
    }
}

// ── Template ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub(crate) struct Template {
    text: String,
}

impl Template {
    /// Read `index.html` from `install_dir` and check that every placeholder
    /// is present.
    pub(crate) fn load(install_dir: &Path) -> Result<Self> {
        let path = install_dir.join(TEMPLATE_FILE_NAME);
        let text = fs::read_to_string(&path).map_err(|source| PreviewError::TemplateMissing {
            path: path.clone(),
            source,
        })?;
        Self::parse(text, path)
    }

    /// Validate template text.  Tab characters are stripped: the page is
    /// indented with tabs and none of them are significant.
    pub(crate) fn parse(text: String, path: PathBuf) -> Result<Self> {
        let text = if text.contains('\t') {
            text.replace('\t', "")
        } else {
            text
        };

        if let Some(missing) = Placeholder::ALL
            .into_iter()
            .find(|p| !text.contains(p.token()))
        {
            return Err(PreviewError::TemplateInvalid {
                path,
                token: missing.token(),
            });
        }

        Ok(Self { text })
    }

    /// Substitute every placeholder with the matching value from `doc`.
    pub(crate) fn fill(&self, doc: &RenderableDocument) -> String {
        let mut out = String::with_capacity(self.text.len() + doc.encoded_source.len());
        let mut rest = self.text.as_str();

        while let Some(idx) = rest.find(TOKEN_PREFIX) {
            out.push_str(&rest[..idx]);
            let tail = &rest[idx..];
            match Placeholder::ALL.into_iter().find(|p| tail.starts_with(p.token())) {
                Some(p) => {
                    out.push_str(doc.value(p));
                    rest = &tail[p.token().len()..];
                }
                // An unknown `[[PT_` sequence is kept verbatim.
                None => {
                    out.push_str(TOKEN_PREFIX);
                    rest = &tail[TOKEN_PREFIX.len()..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    const MINIMAL: &str = "<html lang=\"[[PT_LANG]]\" data-wrap=\"[[PT_WRAP]]\" \
                           data-theme=\"[[PT_THEME]]\"><script src=\"https://[[PT_URL]]/x.js\">\
                           </script><script>const code = \"[[PT_CODE]]\";</script></html>";

    fn doc(encoded_source: &str) -> RenderableDocument {
        RenderableDocument {
            language_id: "python",
            wrap_enabled: true,
            theme: Theme::Dark,
            encoded_source: encoded_source.to_owned(),
            virtual_host: "Host",
        }
    }

    fn template(text: &str) -> Template {
        Template::parse(text.to_owned(), PathBuf::from("index.html")).expect("valid template")
    }

    #[test]
    fn fills_all_placeholders() {
        let html = template(MINIMAL).fill(&doc("cHJpbnQ="));
        assert_eq!(
            html,
            "<html lang=\"python\" data-wrap=\"1\" data-theme=\"vs-dark\">\
             <script src=\"https://Host/x.js\"></script>\
             <script>const code = \"cHJpbnQ=\";</script></html>"
        );
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        let text = format!("{MINIMAL}[[PT_LANG]]");
        let html = template(&text).fill(&doc(""));
        assert!(html.ends_with("</html>python"));
        assert!(!html.contains("[[PT_"));
    }

    #[test]
    fn values_are_not_rescanned() {
        // A value that looks like a token must come through untouched.
        let html = template(MINIMAL).fill(&doc("[[PT_LANG]]"));
        assert!(html.contains("const code = \"[[PT_LANG]]\";"));
    }

    #[test]
    fn unknown_tokens_are_kept() {
        let text = format!("[[PT_OTHER]]{MINIMAL}");
        let html = template(&text).fill(&doc(""));
        assert!(html.starts_with("[[PT_OTHER]]<html"));
    }

    #[test]
    fn tabs_are_stripped() {
        let text = format!("\t\t{MINIMAL}\n\t");
        let html = template(&text).fill(&doc(""));
        assert!(!html.contains('\t'));
        assert!(html.starts_with("<html"));
    }

    #[test]
    fn missing_placeholder_is_rejected() {
        let text = MINIMAL.replace("[[PT_WRAP]]", "1");
        let err = Template::parse(text, PathBuf::from("index.html")).unwrap_err();
        assert!(matches!(
            err,
            PreviewError::TemplateInvalid {
                token: "[[PT_WRAP]]",
                ..
            }
        ));
    }

    #[test]
    fn missing_file_is_template_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Template::load(dir.path()).unwrap_err();
        assert!(matches!(err, PreviewError::TemplateMissing { .. }));
    }

    #[test]
    fn load_reads_from_install_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(TEMPLATE_FILE_NAME), MINIMAL).expect("write");
        let html = Template::load(dir.path()).expect("load").fill(&doc("QQ=="));
        assert!(html.contains("const code = \"QQ==\";"));
    }

    /// The page shipped in `assets/` carries each token exactly once.
    #[test]
    fn shipped_template_has_each_placeholder_once() {
        let shipped = include_str!("../../assets/index.html");
        for p in Placeholder::ALL {
            assert_eq!(
                shipped.matches(p.token()).count(),
                1,
                "{} should appear exactly once",
                p.token()
            );
        }
        assert!(Template::parse(shipped.to_owned(), PathBuf::from(TEMPLATE_FILE_NAME)).is_ok());
    }
}
