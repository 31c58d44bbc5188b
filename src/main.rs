//! planhub - Scheduling and analytics views over project snapshots

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = planhub::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
