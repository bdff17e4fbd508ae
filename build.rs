//! Build script for spotwire.
//!
//! Copies the `.env.example` template into the user's local data directory so
//! that a ready-to-edit configuration sits next to the place where
//! `config::load_env` looks for `.env`.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to `<data_local_dir>/spotwire/`.
///
/// Destinations:
/// - Linux: `~/.local/share/spotwire/.env.example`
/// - macOS: `~/Library/Application Support/spotwire/.env.example`
/// - Windows: `%LOCALAPPDATA%/spotwire/.env.example`
///
/// A missing template only produces a cargo warning. Failing to create the
/// directory or write the file fails the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotwire");
    fs::create_dir_all(&out_dir)?;

    if template.is_file() {
        fs::copy(&template, out_dir.join(".env.example"))?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
    }

    Ok(())
}
