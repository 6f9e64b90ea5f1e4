// ── Settings persistence ──────────────────────────────────────────────────────
//
// Reads and writes `%APPDATA%\MonacoPreview\settings.json`.
// No `unsafe`; pure safe Rust + serde_json.

use std::{fs, io, path::PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::theme::{Theme, ThemePreference};

// ── On-disk type ──────────────────────────────────────────────────────────────

/// Root of the JSON settings file.
///
/// Every field is defaulted so that files written by older versions (or
/// edited by hand) still parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) version: u32,
    /// Address of the hosted editor page used for share links.
    pub(crate) base_url: String,
    /// Soft-wrap long lines in the editor.
    pub(crate) wrap: bool,
    pub(crate) theme: ThemePreference,
    /// Also suppress the browser's default context menu once the document
    /// has loaded.  Off unless explicitly enabled.
    pub(crate) disable_context_menus: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            base_url: DEFAULT_BASE_URL.to_owned(),
            wrap: true,
            theme: ThemePreference::System,
            disable_context_menus: false,
        }
    }
}

// ── Constants ─────────────────────────────────────────────────────────────────

const SETTINGS_VERSION: u32 = 1;

/// The template served through the virtual host mapping.
pub(crate) const DEFAULT_BASE_URL: &str = "https://PowerToysLocalMonaco/index.html";

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the path to the settings file:
/// `%APPDATA%\MonacoPreview\settings.json`.
///
/// Returns `None` if the `APPDATA` environment variable is not set.
pub(crate) fn settings_path() -> Option<PathBuf> {
    let appdata = std::env::var_os("APPDATA")?;
    let mut p = PathBuf::from(appdata);
    p.push("MonacoPreview");
    p.push("settings.json");
    Some(p)
}

// ── Load / save ───────────────────────────────────────────────────────────────

impl Settings {
    /// Read the settings file, falling back to defaults on any error: file
    /// missing, JSON parse failure, or an unrecognised version number.  A
    /// missing file is created with the defaults.
    pub(crate) fn load() -> Settings {
        let Some(path) = settings_path() else {
            return Settings::default();
        };
        match fs::read(&path) {
            Ok(data) => Self::from_json(&data).unwrap_or_else(|| {
                tracing::warn!(path = %path.display(), "settings file unusable, using defaults");
                Settings::default()
            }),
            // First run: write the defaults out so they can be edited.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let settings = Settings::default();
                if let Err(e) = settings.save() {
                    tracing::warn!(error = %e, "could not write default settings");
                }
                settings
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not read settings, using defaults");
                Settings::default()
            }
        }
    }

    /// Parse settings JSON.  Returns `None` for malformed input or a version
    /// this build does not understand.
    pub(crate) fn from_json(data: &[u8]) -> Option<Settings> {
        let settings: Settings = serde_json::from_slice(data).ok()?;
        if settings.version != SETTINGS_VERSION {
            return None;
        }
        Some(settings)
    }

    /// Write the settings to `%APPDATA%\MonacoPreview\settings.json`,
    /// creating the directory if needed.
    pub(crate) fn save(&self) -> io::Result<()> {
        let path = settings_path()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "APPDATA not set"))?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let file = fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, self).map_err(io::Error::other)
    }

    /// `"1"` or `"0"`, the encoding of `wrap` shared by the template and share
    /// links.
    pub(crate) fn wrap_flag(&self) -> &'static str {
        if self.wrap {
            "1"
        } else {
            "0"
        }
    }

    /// Build a link that opens the hosted editor page with `code` already
    /// loaded, using the same parameters the local document is rendered
    /// with.
    pub(crate) fn share_url(&self, theme: Theme, code: &str, lang: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &self.base_url,
            &[
                ("code", code),
                ("lang", lang),
                ("theme", theme.monaco_id()),
                ("wrap", self.wrap_flag()),
            ],
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let settings = Settings {
            wrap: false,
            theme: ThemePreference::Dark,
            disable_context_menus: true,
            ..Settings::default()
        };
        let json = serde_json::to_vec(&settings).expect("serialize");
        assert_eq!(Settings::from_json(&json), Some(settings));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed = Settings::from_json(br#"{"version":1,"wrap":false}"#).expect("parse");
        assert!(!parsed.wrap);
        assert_eq!(parsed.base_url, DEFAULT_BASE_URL);
        assert_eq!(parsed.theme, ThemePreference::System);
        assert!(!parsed.disable_context_menus);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Settings::from_json(b"{}"), Some(Settings::default()));
    }

    #[test]
    fn wrong_version_is_rejected() {
        assert_eq!(Settings::from_json(br#"{"version":99}"#), None);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert_eq!(Settings::from_json(b"{not json"), None);
    }

    #[test]
    fn wrap_flag_encoding() {
        let mut settings = Settings::default();
        assert_eq!(settings.wrap_flag(), "1");
        settings.wrap = false;
        assert_eq!(settings.wrap_flag(), "0");
    }

    // ── share_url ────────────────────────────────────────────────────────────

    #[test]
    fn share_url_carries_render_parameters() {
        let settings = Settings {
            wrap: false,
            ..Settings::default()
        };
        let url = settings
            .share_url(Theme::Dark, "print(\"hi\")", "python")
            .expect("url");

        // Host names are normalised to lowercase by the URL parser.
        assert_eq!(url.host_str(), Some("powertoyslocalmonaco"));
        assert_eq!(url.path(), "/index.html");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("code".to_owned(), "print(\"hi\")".to_owned()),
                ("lang".to_owned(), "python".to_owned()),
                ("theme".to_owned(), "vs-dark".to_owned()),
                ("wrap".to_owned(), "0".to_owned()),
            ]
        );
    }

    #[test]
    fn share_url_escapes_code() {
        let url = Settings::default()
            .share_url(Theme::Light, "a&b=c <d>", "plaintext")
            .expect("url");
        let query = url.query().expect("query");
        assert!(query.starts_with("code=a%26b%3Dc+%3Cd%3E&"));
    }

    #[test]
    fn share_url_rejects_relative_base() {
        let settings = Settings {
            base_url: "index.html".to_owned(),
            ..Settings::default()
        };
        assert!(settings.share_url(Theme::Light, "x", "plaintext").is_err());
    }
}
