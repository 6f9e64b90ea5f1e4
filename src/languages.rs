// ── Language detection ────────────────────────────────────────────────────────
//
// Maps file extensions to `Language` enum values and to the language
// identifiers understood by the Monaco editor.  No Win32 imports; pure Rust.

use std::path::Path;

// ── Language enum ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Language {
    PlainText,
    C,
    Cpp,
    CSharp,
    Go,
    Java,
    Python,
    Rust,
    JavaScript,
    TypeScript,
    Html,
    Xml,
    Css,
    Scss,
    Less,
    Json,
    Sql,
    Ini,
    Batch,
    Shell,
    PowerShell,
    Markdown,
    Yaml,
    Dockerfile,
    Php,
    Ruby,
    Lua,
}

impl Language {
    /// Identifier passed to Monaco's `monaco.editor.create({ language })`.
    ///
    /// Always non-empty; `PlainText` maps to Monaco's `plaintext` mode.
    pub(crate) fn monaco_id(self) -> &'static str {
        match self {
            Language::PlainText => "plaintext",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Java => "java",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Html => "html",
            Language::Xml => "xml",
            Language::Css => "css",
            Language::Scss => "scss",
            Language::Less => "less",
            Language::Json => "json",
            Language::Sql => "sql",
            Language::Ini => "ini",
            Language::Batch => "bat",
            Language::Shell => "shell",
            Language::PowerShell => "powershell",
            Language::Markdown => "markdown",
            Language::Yaml => "yaml",
            Language::Dockerfile => "dockerfile",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Lua => "lua",
        }
    }

    /// Classify a file extension (without the leading dot).
    ///
    /// Matching is ASCII case-insensitive.  Unknown and empty extensions
    /// return `Language::PlainText`; this never fails.
    pub(crate) fn from_extension(ext: &str) -> Language {
        match ext.to_ascii_lowercase().as_str() {
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" | "inl" => Language::Cpp,
            "cs" | "csx" => Language::CSharp,
            "go" => Language::Go,
            "java" => Language::Java,
            "py" | "pyw" | "pyi" => Language::Python,
            "rs" => Language::Rust,
            "js" | "mjs" | "cjs" | "jsx" => Language::JavaScript,
            "ts" | "mts" | "cts" | "tsx" => Language::TypeScript,
            "html" | "htm" | "xhtml" | "shtml" => Language::Html,
            "xml" | "xsl" | "xslt" | "svg" | "xaml" | "csproj" | "vbproj" | "props" => {
                Language::Xml
            }
            "css" => Language::Css,
            "scss" => Language::Scss,
            "less" => Language::Less,
            "json" | "jsonc" => Language::Json,
            "sql" => Language::Sql,
            "ini" | "cfg" | "conf" | "properties" | "editorconfig" => Language::Ini,
            "bat" | "cmd" => Language::Batch,
            "sh" | "bash" | "zsh" | "ksh" | "ash" => Language::Shell,
            "ps1" | "psm1" | "psd1" => Language::PowerShell,
            "md" | "markdown" | "mdown" | "mkd" => Language::Markdown,
            "yaml" | "yml" => Language::Yaml,
            "dockerfile" => Language::Dockerfile,
            "php" => Language::Php,
            "rb" => Language::Ruby,
            "lua" => Language::Lua,
            _ => Language::PlainText,
        }
    }
}

// ── Classification ────────────────────────────────────────────────────────────

/// Map an extension (leading dot already stripped, may be empty) to a Monaco
/// language identifier.
pub(crate) fn classify(extension: &str) -> &'static str {
    Language::from_extension(extension).monaco_id()
}

/// Monaco language identifier for the file at `path`.
pub(crate) fn language_id_for_path(path: &Path) -> &'static str {
    match special_name(path) {
        Some(language) => language.monaco_id(),
        None => classify(extension_of(path)),
    }
}

/// Extension-less file names with a well-known language.
fn special_name(path: &Path) -> Option<Language> {
    let name = path.file_name()?.to_str()?;
    match name.to_ascii_lowercase().as_str() {
        "dockerfile" | "containerfile" => Some(Language::Dockerfile),
        ".bashrc" | ".bash_profile" | ".zshrc" | ".profile" => Some(Language::Shell),
        _ => None,
    }
}

fn extension_of(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
