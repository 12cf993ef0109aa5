//! Index of callable methods by qualified name.
//!
//! The [`CallRegistry`] is filled once by the loader and is read-only
//! afterwards, so it can be shared across concurrent requests behind an
//! `Arc`. When two providers contribute the same qualified name the first
//! registration wins.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::callable::{Callable, MethodDefinition};

/// A registered method.
#[derive(Clone)]
pub struct CallableMethod {
    name: String,
    handle: Arc<dyn Callable>,
    plugin: String,
}

impl CallableMethod {
    /// Qualified `<Container>.<Method>` name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Plugin that contributed the method.
    #[must_use]
    pub const fn plugin(&self) -> &str {
        self.plugin.as_str()
    }

    /// Implementation handle.
    #[must_use]
    pub fn handle(&self) -> &dyn Callable {
        self.handle.as_ref()
    }
}

impl fmt::Debug for CallableMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableMethod")
            .field("name", &self.name)
            .field("plugin", &self.plugin)
            .finish_non_exhaustive()
    }
}

/// Registry of callable methods.
///
/// # Example
///
/// ```
/// use courier_plugins::{Arguments, CallError, CallRegistry, MethodDefinition, Response};
///
/// fn ping(_args: Arguments) -> Result<Response, CallError> {
///     Ok(Response::success("pong"))
/// }
///
/// let mut registry = CallRegistry::new();
/// assert!(registry.register("core", MethodDefinition::new("Sys", "Ping", ping)));
/// assert_eq!(registry.get("Sys.Ping").map(|m| m.plugin()), Some("core"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallRegistry {
    methods: HashMap<String, CallableMethod>,
}

impl CallRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `definition` on behalf of `plugin`.
    ///
    /// Returns `false`, leaving the existing entry in place, when the
    /// qualified name is already registered.
    pub fn register(&mut self, plugin: &str, definition: MethodDefinition) -> bool {
        let name = definition.qualified_name();
        if self.methods.contains_key(&name) {
            return false;
        }
        let method = CallableMethod {
            name: name.clone(),
            handle: definition.handle(),
            plugin: plugin.to_owned(),
        };
        self.methods.insert(name, method);
        true
    }

    /// Looks up a method by qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CallableMethod> {
        self.methods.get(name)
    }

    /// Whether a method is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Registered names in lexical order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` when no methods are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
