// Shell step execution

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{bail, Context};

/// Run `cmd` through `sh -c` in `cwd`. With `quiet`, stdout is discarded.
pub fn sh(cmd: &str, cwd: &Path, quiet: bool) -> anyhow::Result<()> {
    log::debug!("[sh] {cmd}");

    let status = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .current_dir(cwd)
        .stdout(if quiet { Stdio::null() } else { Stdio::inherit() })
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("spawning `{cmd}`"))?;

    if !status.success() {
        bail!("command failed: {cmd} (exit code {:?})", status.code());
    }
    Ok(())
}
