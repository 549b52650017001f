use std::process::ExitCode;

use clap::Parser;

use pivotgraph::cli::{run, Cli};
use pivotgraph::observability::init_logging_with;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging_with(cli.verbose.then_some("pivotgraph=debug"));

    let output = run(&cli).and_then(|value| Ok(serde_json::to_string_pretty(&value)?));
    match output {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
