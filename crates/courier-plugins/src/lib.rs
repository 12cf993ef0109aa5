//! Plugin activation and the callable-method registry.
//!
//! Hosts describe their plugins with [`PluginDescriptor`]s, collect them in a
//! [`PluginCatalog`] and hand the catalog to [`PluginLoader::load`]. The
//! loader activates plugins in dependency order and asks every
//! [`PluginKind::MethodProvider`] for its methods, producing a read-only
//! [`CallRegistry`] keyed by `<Container>.<Method>`.
//!
//! Methods implement [`Callable`]: they receive positional [`Arguments`]
//! converted from JSON (with uploaded files substituted where the caller
//! referenced them) and return a [`Response`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use courier_plugins::{
//!     Arguments, CallError, MethodDefinition, Plugin, PluginCatalog, PluginDescriptor,
//!     PluginKind, PluginLoader, Response,
//! };
//!
//! struct Greeter;
//!
//! fn hello(args: Arguments) -> Result<Response, CallError> {
//!     let name = args.string(0)?;
//!     Ok(Response::success(format!("Hello, {name}")))
//! }
//!
//! impl Plugin for Greeter {
//!     fn methods(&self) -> Vec<MethodDefinition> {
//!         vec![MethodDefinition::new("Greeter", "Hello", hello)]
//!     }
//! }
//!
//! let mut catalog = PluginCatalog::new();
//! catalog
//!     .add(PluginDescriptor::new("greeter", "1.0", PluginKind::MethodProvider, |_| {
//!         Ok(Arc::new(Greeter))
//!     }))
//!     .unwrap();
//! let registry = PluginLoader::new().load(catalog).unwrap().into_registry();
//! assert!(registry.get("Greeter.Hello").is_some());
//! ```

pub mod argument;
pub mod callable;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod registry;
pub mod response;

#[cfg(test)]
mod tests;

pub use self::argument::{Argument, Arguments};
pub use self::callable::{CallError, Callable, MethodDefinition};
pub use self::descriptor::{
    Plugin, PluginCatalog, PluginDescriptor, PluginFactory, PluginKind, PluginState,
};
pub use self::error::{ArgumentError, LoaderError, PluginError};
pub use self::loader::{ActivationContext, LoadedPlugins, PluginLoader};
pub use self::registry::{CallRegistry, CallableMethod};
pub use self::response::Response;
