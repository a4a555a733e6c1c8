// src/main.rs

use std::process::ExitCode;

use taskdag::{cli, logging, run, RunStatus};

/// Exit code when the run stopped with tasks left open.
const EXIT_INCOMPLETE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("taskdag: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(RunStatus::Planned | RunStatus::Completed) => ExitCode::SUCCESS,
        Ok(RunStatus::Incomplete) => ExitCode::from(EXIT_INCOMPLETE),
        Err(err) => {
            tracing::error!(error = %err, "run failed");
            eprintln!("taskdag: {err:#}");
            ExitCode::FAILURE
        }
    }
}
