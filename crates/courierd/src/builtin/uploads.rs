//! Upload inspection method.

use courier_plugins::{Arguments, CallError, MethodDefinition, Plugin, Response};

/// Provides `Up.Save`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadsPlugin;

impl Plugin for UploadsPlugin {
    fn methods(&self) -> Vec<MethodDefinition> {
        vec![MethodDefinition::new("Up", "Save", save)]
    }
}

/// Reports the files referenced by the first argument.
fn save(mut args: Arguments) -> Result<Response, CallError> {
    let files = args.take_files(0)?;
    let names: Vec<&str> = files.iter().map(|file| file.file_name()).collect();
    let bytes: u64 = files.iter().map(|file| file.len()).sum();
    tracing::debug!(
        target: "courierd::builtin::uploads",
        count = files.len(),
        bytes,
        "received uploaded files"
    );
    Ok(Response::success("OK")
        .with("Count", files.len())
        .with("Names", names)
        .with("Bytes", bytes))
}
