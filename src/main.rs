//! Octopus - paper ticket issuing and scanning

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = octopus_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
