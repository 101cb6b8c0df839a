use std::process::ExitCode;

use clap::Parser;
use mdblock_cli::{App, CliArgs};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let result = App::from_args(&args).and_then(|app| app.run(args));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
