// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32`, which holds
// the Win32 and WebView2 FFI.  Each unsafe block there MUST carry a
// `// SAFETY:` comment.
#![deny(unsafe_code)]

// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that log output on stderr is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod cli;
mod document;
mod error;
mod languages;
mod logging;
mod platform;
mod settings;
mod surface;
mod theme;

use std::path::PathBuf;

use cli::{Cli, Command};
use error::Result;
use logging::LogTarget;
use platform::HostConfig;
use settings::Settings;
use surface::lockdown::LockdownPolicy;
use theme::Theme;

fn main() {
    logging::init(&LogTarget::for_build());

    if let Err(e) = run() {
        // Startup failed before or during the message loop.
        // Show a modal error dialog, the only visible output in a GUI app.
        tracing::error!(error = %e, "preview failed");
        platform::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let command = Cli::command(std::env::args_os())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "monaco-preview starting");

    let settings = Settings::load();
    let theme = settings.theme.resolve(theme::system_mode());

    match command {
        Command::Preview(path) => preview(path, &settings, theme),
        Command::ShareUrl(path) => {
            println!("{}", app::share_link(&path, &settings, theme)?);
            Ok(())
        }
    }
}

fn preview(path: PathBuf, settings: &Settings, theme: Theme) -> Result<()> {
    let install_dir = app::install_dir()?;
    let ctx = app::RenderContext {
        settings,
        theme,
        install_dir: &install_dir,
    };
    let html = app::prepare(path.clone(), &ctx)?;

    platform::run(HostConfig {
        title: app::window_title(&path),
        html,
        install_dir,
        user_data_dir: std::env::temp_dir().join("MonacoPreview"),
        theme,
        lockdown: LockdownPolicy {
            disable_context_menus: settings.disable_context_menus,
        },
    })
}
