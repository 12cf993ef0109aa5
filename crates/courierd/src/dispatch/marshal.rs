//! Conversion of JSON call arguments into plugin arguments.
//!
//! Top-level arguments that reference uploaded files are replaced by the
//! matching [`UploadedFile`]s. Files are moved out of the [`FilePool`], so a
//! file reaches at most one argument.

use courier_multipart::token::{contains_reference, split_references};
use courier_multipart::{FileToken, UploadedFile};
use courier_plugins::{Argument, Arguments};
use serde_json::Value;

use super::DISPATCH_TARGET;

/// Uploaded files not yet handed to a call.
#[derive(Debug, Default)]
pub(crate) struct FilePool {
    files: Vec<UploadedFile>,
}

impl FilePool {
    pub(crate) const fn new(files: Vec<UploadedFile>) -> Self {
        Self { files }
    }

    /// Moves out every file whose indices match `token`.
    pub(crate) fn take(&mut self, token: &FileToken) -> Vec<UploadedFile> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|file| file.matches(token));
        self.files = kept;
        taken
    }

    pub(crate) const fn len(&self) -> usize {
        self.files.len()
    }
}

/// Converts the JSON arguments of one call, preserving positions.
pub(crate) fn marshal_arguments(args: Vec<Value>, pool: &mut FilePool) -> Arguments {
    args.into_iter()
        .map(|value| marshal_argument(value, pool))
        .collect::<Vec<_>>()
        .into()
}

fn marshal_argument(value: Value, pool: &mut FilePool) -> Argument {
    match value {
        Value::String(text) if contains_reference(&text) => Argument::Files(resolve(&[text], pool)),
        Value::Array(items) if is_reference_list(&items) => {
            let texts: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text),
                    _ => None,
                })
                .collect();
            Argument::Files(resolve(&texts, pool))
        }
        other => Argument::from(other),
    }
}

fn is_reference_list(items: &[Value]) -> bool {
    !items.is_empty()
        && items.iter().all(Value::is_string)
        && items
            .iter()
            .filter_map(Value::as_str)
            .any(contains_reference)
}

fn resolve(texts: &[String], pool: &mut FilePool) -> Vec<UploadedFile> {
    let mut files = Vec::new();
    for bare in texts.iter().flat_map(|text| split_references(text)) {
        match FileToken::parse(bare) {
            Ok(token) => files.extend(pool.take(&token)),
            Err(error) => tracing::warn!(
                target: DISPATCH_TARGET,
                token = bare,
                error = %error,
                "ignoring unparseable file reference"
            ),
        }
    }
    files
}
