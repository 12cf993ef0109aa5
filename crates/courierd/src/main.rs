//! Command-line entry point for the Courier request runtime.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process::ExitCode;
use std::sync::Arc;

use courier_multipart::{StreamBody, TracingProgress};
use courierd::{
    BootstrapError, ProcessError, Runtime, StructuredHealthReporter, SystemConfigLoader,
    bootstrap_with, builtin,
};
use thiserror::Error;

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    #[error("failed to open request body '{path}': {source}")]
    Body {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Process(#[from] ProcessError),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let mut stderr = io::stderr().lock();
            let _ignored = writeln!(stderr, "courierd: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), RunError> {
    let runtime = bootstrap_with(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        builtin::catalog,
    )?;
    match runtime.config().body_path() {
        Some(path) => process_file(&runtime, path.as_str()),
        None => Ok(()),
    }
}

fn process_file(runtime: &Runtime, path: &str) -> Result<(), RunError> {
    let body_error = |source| RunError::Body {
        path: path.to_owned(),
        source,
    };
    let file = File::open(path).map_err(body_error)?;
    let len = file.metadata().map_err(body_error)?.len();
    let mut body = StreamBody::new(BufReader::new(file), len).map_err(body_error)?;

    let responses = runtime
        .processor()
        .process(&mut body, path, &TracingProgress)?;
    responses
        .write_json(io::stdout().lock())
        .map_err(|error| RunError::Process(ProcessError::Dispatch(error)))
}
