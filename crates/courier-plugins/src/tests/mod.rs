//! Crate-level test doubles, integration and BDD tests.

use std::sync::Arc;

use courier_multipart::testing::MultipartBodyBuilder;
use courier_multipart::{FileToken, MultipartSplitter, NoProgress, SplitterOptions, UploadedFile};

use crate::argument::Arguments;
use crate::callable::{CallError, MethodDefinition};
use crate::descriptor::{Plugin, PluginDescriptor, PluginKind};
use crate::response::Response;

mod behaviour;

/// Plugin with no behaviour.
pub(crate) struct Marker;

impl Plugin for Marker {}

/// Method provider contributing one method per name in `methods`.
pub(crate) struct Provider {
    pub(crate) container: String,
    pub(crate) methods: Vec<String>,
}

fn echo(args: Arguments) -> Result<Response, CallError> {
    Ok(Response::success("OK").with("Count", args.len()))
}

impl Plugin for Provider {
    fn methods(&self) -> Vec<MethodDefinition> {
        self.methods
            .iter()
            .map(|method| MethodDefinition::new(self.container.as_str(), method.as_str(), echo))
            .collect()
    }
}

/// Descriptor for a [`Marker`] plugin with the given dependencies.
pub(crate) fn marker_descriptor(id: &str, requires: &[&str]) -> PluginDescriptor {
    PluginDescriptor::new(id, "1.0", PluginKind::Plugin, |_| Ok(Arc::new(Marker)))
        .requires(requires.iter().copied())
}

/// Descriptor for a [`Provider`] exposing `container.method` for each method.
pub(crate) fn provider_descriptor(
    id: &str,
    container_name: &str,
    method_names: &[&str],
    requires: &[&str],
) -> PluginDescriptor {
    let container = container_name.to_owned();
    let methods: Vec<String> = method_names
        .iter()
        .map(|method| (*method).to_owned())
        .collect();
    PluginDescriptor::new(id, "1.0", PluginKind::MethodProvider, move |_| {
        Ok(Arc::new(Provider {
            container: container.clone(),
            methods: methods.clone(),
        }))
    })
    .requires(requires.iter().copied())
}

/// Splits a generated body to obtain real uploaded files for `method`.
pub(crate) fn uploaded_files(method: &str, contents: &[&[u8]]) -> Vec<UploadedFile> {
    let mut builder = MultipartBodyBuilder::new("courier-test");
    for (index, content) in (0u32..).zip(contents) {
        builder = builder.file(
            &FileToken::new(method, 0, 0, index),
            &format!("file-{index}"),
            "application/octet-stream",
            content,
        );
    }
    let mut reader = builder.reader().expect("reader");
    let mapper = MultipartSplitter::new(SplitterOptions::default())
        .split(&mut reader, "plugin-tests", &NoProgress)
        .expect("split");
    let (_, _, files) = mapper.into_parts();
    files
}
