/// Monaco Preview build script.
///
/// The preview loads its HTML template from the directory that holds the
/// executable at run time, so the template is copied next to the binary in
/// the active profile directory (`target/<profile>/`).
use std::{env, fs, path::PathBuf};

const TEMPLATE: &str = "assets/index.html";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={TEMPLATE}");

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" {
        // The pipeline and its tests are portable; only the WebView2 host
        // needs Windows. Warn instead of failing so `cargo test` still runs.
        println!(
            "cargo:warning=monaco-preview can only display previews on Windows \
             (CARGO_CFG_TARGET_OS = {target_os:?})"
        );
    }

    // OUT_DIR is target/<profile>/build/<pkg>-<hash>/out; the binary lives
    // three levels up.
    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return;
    };
    let Some(profile_dir) = out_dir.ancestors().nth(3) else {
        return;
    };

    if let Err(e) = fs::copy(TEMPLATE, profile_dir.join("index.html")) {
        println!("cargo:warning=could not copy {TEMPLATE} next to the binary: {e}");
    }
}
