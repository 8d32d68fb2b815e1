use clap::Parser;
use docs_reorganizer::cli::{CliArgs, run_cli};
use docs_reorganizer::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run_cli(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e.diagnostic());
            ExitCode::from(e.exit_code())
        }
    }
}
