use std::path::{Path, PathBuf};

use anyhow::Context;

/// Nearest ancestor of `start` (inclusive) containing `name`.
fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.exists())
}

/// Directory holding the workspace `Cargo.lock`, searched from the current
/// directory first and then from this crate's manifest.
pub fn workspace_root() -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir().context("reading current directory")?;
    let lock = find_upwards(&cwd, "Cargo.lock")
        .or_else(|| find_upwards(Path::new(env!("CARGO_MANIFEST_DIR")), "Cargo.lock"))
        .context("Cargo.lock not found (run from within the repository)")?;

    Ok(lock
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}
