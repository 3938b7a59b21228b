use std::io::{self, Write};

use clap::Parser;
use matsum_cli::{Cli, Settings};

fn main() {
    let cli = Cli::parse();
    matsum_cli::logging::init(cli.verbose);

    let result = Settings::resolve(&cli).and_then(|settings| {
        // Keep stdout a clean JSON document when --json is set.
        let prompts: Box<dyn Write> = if settings.json {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        };
        matsum_cli::run(&settings, io::stdin().lock(), prompts, io::stdout())
    });

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
