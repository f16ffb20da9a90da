// src/main.rs

use std::process::ExitCode;

use jobdag::errors::{ErrorKind, JobError};
use jobdag::{cli, logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("jobdag error: {err:?}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("jobdag error: {err:?}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// One exit status per error kind, so scripts can tell failures apart.
fn exit_code(err: &anyhow::Error) -> u8 {
    let Some(job_err) = err.downcast_ref::<JobError>() else {
        return 1;
    };
    match job_err.kind() {
        ErrorKind::Internal => 1,
        ErrorKind::Validation => 3,
        ErrorKind::NotFound => 4,
        ErrorKind::CyclicGraph => 5,
        ErrorKind::WriteConflict => 6,
        ErrorKind::Storage => 7,
        ErrorKind::Resource => 8,
        ErrorKind::Unsupported => 9,
        ErrorKind::Timeout => 10,
        ErrorKind::Config => 11,
    }
}
