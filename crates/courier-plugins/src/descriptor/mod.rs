//! Plugin descriptors and the catalog the loader consumes.
//!
//! A [`PluginDescriptor`] declares a plugin's identity, version, category,
//! the identities it requires, and a factory that builds the plugin once its
//! dependencies are active. The host collects descriptors into a
//! [`PluginCatalog`], which rejects duplicate identities.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::callable::MethodDefinition;
use crate::error::{LoaderError, PluginError};
use crate::loader::ActivationContext;

/// Category of a plugin.
///
/// # Example
///
/// ```
/// use courier_plugins::PluginKind;
///
/// assert_eq!(PluginKind::MethodProvider.as_str(), "method_provider");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    /// Takes part in activation but contributes no methods.
    Plugin,
    /// Contributes callable methods once activated.
    MethodProvider,
}

impl PluginKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plugin => "plugin",
            Self::MethodProvider => "method_provider",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activation state of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    /// Not yet constructed.
    Unloaded,
    /// Constructed and available to dependants.
    Loaded,
}

/// An activated plugin.
///
/// Implementations are looked up by dependants through
/// [`ActivationContext::dependency`], which downcasts to the concrete type.
pub trait Plugin: Any + Send + Sync {
    /// Methods contributed by a [`PluginKind::MethodProvider`].
    fn methods(&self) -> Vec<MethodDefinition> {
        Vec::new()
    }
}

/// Builds a plugin from its active dependencies.
pub type PluginFactory =
    Box<dyn Fn(&ActivationContext<'_>) -> Result<Arc<dyn Plugin>, PluginError> + Send + Sync>;

/// Declarative description of one plugin.
pub struct PluginDescriptor {
    id: String,
    version: String,
    kind: PluginKind,
    requires: Vec<String>,
    factory: PluginFactory,
    state: PluginState,
}

impl PluginDescriptor {
    /// Creates an unloaded descriptor.
    pub fn new<F>(id: impl Into<String>, version: impl Into<String>, kind: PluginKind, factory: F) -> Self
    where
        F: Fn(&ActivationContext<'_>) -> Result<Arc<dyn Plugin>, PluginError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            version: version.into(),
            kind,
            requires: Vec::new(),
            factory: Box::new(factory),
            state: PluginState::Unloaded,
        }
    }

    /// Declares the identities this plugin depends on.
    #[must_use]
    pub fn requires<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(dependencies.into_iter().map(Into::into));
        self
    }

    /// Plugin identity.
    #[must_use]
    pub const fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Plugin version.
    #[must_use]
    pub const fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Plugin category.
    #[must_use]
    pub const fn kind(&self) -> PluginKind {
        self.kind
    }

    /// Identities that must be active first.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.requires
    }

    /// Current activation state.
    #[must_use]
    pub const fn state(&self) -> PluginState {
        self.state
    }

    pub(crate) fn activate(
        &mut self,
        context: &ActivationContext<'_>,
    ) -> Result<Arc<dyn Plugin>, PluginError> {
        let plugin = (self.factory)(context)?;
        self.state = PluginState::Loaded;
        Ok(plugin)
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("kind", &self.kind)
            .field("requires", &self.requires)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Descriptors available to the loader, in discovery order.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use courier_plugins::{Plugin, PluginCatalog, PluginDescriptor, PluginKind};
///
/// struct Core;
/// impl Plugin for Core {}
///
/// let mut catalog = PluginCatalog::new();
/// catalog
///     .add(PluginDescriptor::new("core", "1.0", PluginKind::Plugin, |_| {
///         Ok(Arc::new(Core))
///     }))
///     .unwrap();
/// assert!(catalog.add(PluginDescriptor::new("core", "2.0", PluginKind::Plugin, |_| {
///     Ok(Arc::new(Core))
/// })).is_err());
/// ```
#[derive(Debug, Default)]
pub struct PluginCatalog {
    descriptors: Vec<PluginDescriptor>,
}

impl PluginCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::DuplicatePlugin`] when the identity is already
    /// present.
    pub fn add(&mut self, descriptor: PluginDescriptor) -> Result<(), LoaderError> {
        if self.contains(descriptor.id()) {
            return Err(LoaderError::DuplicatePlugin {
                plugin: descriptor.id().to_owned(),
            });
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Whether a descriptor with `id` is present.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.descriptors.iter().any(|descriptor| descriptor.id() == id)
    }

    /// Descriptors in discovery order.
    #[must_use]
    pub fn descriptors(&self) -> &[PluginDescriptor] {
        &self.descriptors
    }

    /// Number of descriptors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub(crate) fn into_descriptors(self) -> Vec<PluginDescriptor> {
        self.descriptors
    }
}
