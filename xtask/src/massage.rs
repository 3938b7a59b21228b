use clap::Args;

use crate::findup::workspace_root;
use crate::sh::sh;

/// Massage packages by running cargo fix, clippy, fmt, check, and test
#[derive(Args, Debug)]
pub struct MassageArgs {
    #[command(flatten)]
    workspace: clap_cargo::Workspace,

    /// Show command output
    #[arg(long = "verbose")]
    pub verbose: bool,
}

fn target_flags(workspace: &clap_cargo::Workspace) -> String {
    if workspace.workspace || workspace.package.is_empty() {
        return "--workspace".to_string();
    }
    workspace
        .package
        .iter()
        .map(|p| format!("-p {p}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn run(args: MassageArgs) -> anyhow::Result<()> {
    let root = workspace_root()?;
    let targets = target_flags(&args.workspace);

    let steps = [
        (
            "cargo fix",
            format!("cargo fix --allow-dirty --allow-staged --quiet {targets}"),
        ),
        (
            "cargo clippy --fix",
            format!("cargo clippy --fix --allow-dirty --allow-staged --quiet {targets}"),
        ),
        ("cargo fmt", "cargo fmt --all --quiet".to_string()),
        ("cargo check", format!("cargo check --quiet {targets}")),
        (
            "cargo nextest",
            format!("RUST_BACKTRACE=1 cargo nextest run --no-tests pass {targets}"),
        ),
    ];

    for (i, (label, cmd)) in steps.iter().enumerate() {
        log::info!("[{}/{}] {label}", i + 1, steps.len());
        sh(cmd, &root, !args.verbose)?;
    }
    Ok(())
}
