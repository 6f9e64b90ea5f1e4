// ── Command line ──────────────────────────────────────────────────────────────
//
// The process takes one positional argument: the file to preview.  With
// `--share-url` it prints a link to the hosted editor page instead of opening
// a window.

use std::{ffi::OsString, path::PathBuf};

use clap::Parser;

use crate::error::{PreviewError, Result};

#[derive(Debug, Parser)]
#[command(name = "monaco-preview", version, about = "Read-only syntax-highlighted preview of one file")]
pub(crate) struct Cli {
    /// Print a shareable editor link for the file and exit.
    #[arg(long)]
    share_url: bool,

    /// Absolute path of the file to preview.
    path: Option<PathBuf>,
}

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Preview(PathBuf),
    ShareUrl(PathBuf),
}

impl Cli {
    /// Parse `args` (including the program name).
    ///
    /// A missing path is `InputMissing`; every other problem, including
    /// `--help`, is reported as `Usage` with clap's rendered message.
    pub(crate) fn command<I, T>(args: I) -> Result<Command>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| PreviewError::Usage(e.to_string()))?;
        let path = cli.path.ok_or(PreviewError::InputMissing)?;
        Ok(if cli.share_url {
            Command::ShareUrl(path)
        } else {
            Command::Preview(path)
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_path() {
        let cmd = Cli::command(["monaco-preview", r"C:\src\a.py"]).expect("command");
        assert_eq!(cmd, Command::Preview(PathBuf::from(r"C:\src\a.py")));
    }

    #[test]
    fn share_url_flag() {
        let cmd = Cli::command(["monaco-preview", "--share-url", "a.py"]).expect("command");
        assert_eq!(cmd, Command::ShareUrl(PathBuf::from("a.py")));
    }

    #[test]
    fn missing_path_is_input_missing() {
        let err = Cli::command(["monaco-preview"]).unwrap_err();
        assert!(matches!(err, PreviewError::InputMissing));

        let err = Cli::command(["monaco-preview", "--share-url"]).unwrap_err();
        assert!(matches!(err, PreviewError::InputMissing));
    }

    #[test]
    fn extra_arguments_are_usage_errors() {
        let err = Cli::command(["monaco-preview", "a.py", "b.py"]).unwrap_err();
        assert!(matches!(err, PreviewError::Usage(_)));
    }

    #[test]
    fn unknown_flags_are_usage_errors() {
        let err = Cli::command(["monaco-preview", "--wrap", "a.py"]).unwrap_err();
        assert!(matches!(err, PreviewError::Usage(_)));
    }
}
