//! Dependency-ordered plugin activation.
//!
//! [`PluginLoader::load`] orders the catalog with Kahn's algorithm, activates
//! each plugin after everything it requires, then collects the methods of
//! every method provider into a [`CallRegistry`]. Among plugins that are
//! ready at the same time the catalog order is kept, so activation is
//! deterministic for a given catalog.

use std::any::{Any, type_name};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::descriptor::{Plugin, PluginCatalog, PluginDescriptor, PluginKind};
use crate::error::{LoaderError, PluginError};
use crate::registry::CallRegistry;

/// Tracing target for loader operations.
const LOADER_TARGET: &str = "courier_plugins::loader";

/// View of the already active plugins handed to a factory.
pub struct ActivationContext<'a> {
    plugin: &'a str,
    active: &'a HashMap<String, Arc<dyn Plugin>>,
}

impl<'a> ActivationContext<'a> {
    pub(crate) const fn new(plugin: &'a str, active: &'a HashMap<String, Arc<dyn Plugin>>) -> Self {
        Self { plugin, active }
    }

    /// Identity of the plugin being activated.
    #[must_use]
    pub const fn plugin_id(&self) -> &str {
        self.plugin
    }

    /// Whether `id` is already active.
    #[must_use]
    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains_key(id)
    }

    /// Returns the active dependency `id` as its concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::DependencyUnavailable`] when `id` is not active
    /// and [`PluginError::DependencyType`] when it is a different type.
    pub fn dependency<T: Plugin>(&self, id: &str) -> Result<&'a T, PluginError> {
        let plugin = self
            .active
            .get(id)
            .ok_or_else(|| PluginError::DependencyUnavailable {
                plugin: self.plugin.to_owned(),
                dependency: id.to_owned(),
            })?;
        let any: &'a dyn Any = &**plugin;
        any.downcast_ref::<T>()
            .ok_or_else(|| PluginError::DependencyType {
                plugin: self.plugin.to_owned(),
                dependency: id.to_owned(),
                expected: type_name::<T>(),
            })
    }
}

impl fmt::Debug for ActivationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut active: Vec<&str> = self.active.keys().map(String::as_str).collect();
        active.sort_unstable();
        f.debug_struct("ActivationContext")
            .field("plugin", &self.plugin)
            .field("active", &active)
            .finish()
    }
}

/// Result of a successful load.
pub struct LoadedPlugins {
    descriptors: Vec<PluginDescriptor>,
    plugins: HashMap<String, Arc<dyn Plugin>>,
    registry: CallRegistry,
}

impl LoadedPlugins {
    /// Plugin identities in activation order.
    #[must_use]
    pub fn activation_order(&self) -> Vec<&str> {
        self.descriptors.iter().map(PluginDescriptor::id).collect()
    }

    /// Descriptors in activation order, all in the loaded state.
    #[must_use]
    pub fn descriptors(&self) -> &[PluginDescriptor] {
        &self.descriptors
    }

    /// Active plugin with identity `id`.
    #[must_use]
    pub fn plugin(&self, id: &str) -> Option<&Arc<dyn Plugin>> {
        self.plugins.get(id)
    }

    /// Methods registered by the method providers.
    #[must_use]
    pub const fn registry(&self) -> &CallRegistry {
        &self.registry
    }

    /// Consumes the result, keeping only the registry.
    #[must_use]
    pub fn into_registry(self) -> CallRegistry {
        self.registry
    }
}

impl fmt::Debug for LoadedPlugins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedPlugins")
            .field("activation_order", &self.activation_order())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Activates a catalog of plugins.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use courier_plugins::{Plugin, PluginCatalog, PluginDescriptor, PluginKind, PluginLoader};
///
/// struct Core;
/// impl Plugin for Core {}
/// struct Math;
/// impl Plugin for Math {}
///
/// let mut catalog = PluginCatalog::new();
/// catalog
///     .add(PluginDescriptor::new("math", "1.0", PluginKind::MethodProvider, |ctx| {
///         ctx.dependency::<Core>("core")?;
///         Ok(Arc::new(Math))
///     })
///     .requires(["core"]))
///     .unwrap();
/// catalog
///     .add(PluginDescriptor::new("core", "1.0", PluginKind::Plugin, |_| Ok(Arc::new(Core))))
///     .unwrap();
///
/// let loaded = PluginLoader::new().load(catalog).unwrap();
/// assert_eq!(loaded.activation_order(), vec!["core", "math"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PluginLoader;

impl PluginLoader {
    /// Creates a loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Activates every plugin in the catalog and builds the call registry.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::MissingDependency`] or
    /// [`LoaderError::DependencyCycle`] when the catalog cannot be ordered,
    /// and [`LoaderError::Activation`] when a factory fails.
    pub fn load(&self, catalog: PluginCatalog) -> Result<LoadedPlugins, LoaderError> {
        let order = activation_order(catalog.descriptors())?;
        let mut slots: Vec<Option<PluginDescriptor>> =
            catalog.into_descriptors().into_iter().map(Some).collect();
        let mut descriptors = Vec::with_capacity(slots.len());
        let mut plugins: HashMap<String, Arc<dyn Plugin>> = HashMap::new();

        for index in order {
            let Some(mut descriptor) = slots.get_mut(index).and_then(Option::take) else {
                continue;
            };
            let id = descriptor.id().to_owned();
            let context = ActivationContext::new(&id, &plugins);
            let plugin = descriptor
                .activate(&context)
                .map_err(|source| LoaderError::Activation {
                    plugin: id.clone(),
                    source,
                })?;
            info!(
                target: LOADER_TARGET,
                plugin = descriptor.id(),
                version = descriptor.version(),
                kind = descriptor.kind().as_str(),
                "plugin activated"
            );
            plugins.insert(id, plugin);
            descriptors.push(descriptor);
        }

        let registry = register_methods(&descriptors, &plugins);
        Ok(LoadedPlugins {
            descriptors,
            plugins,
            registry,
        })
    }
}

fn register_methods(
    descriptors: &[PluginDescriptor],
    plugins: &HashMap<String, Arc<dyn Plugin>>,
) -> CallRegistry {
    let mut registry = CallRegistry::new();
    let providers = descriptors
        .iter()
        .filter(|descriptor| descriptor.kind() == PluginKind::MethodProvider);
    for descriptor in providers {
        let Some(plugin) = plugins.get(descriptor.id()) else {
            continue;
        };
        for definition in plugin.methods() {
            let name = definition.qualified_name();
            if registry.register(descriptor.id(), definition) {
                debug!(
                    target: LOADER_TARGET,
                    plugin = descriptor.id(),
                    method = %name,
                    "method registered"
                );
            } else {
                warn!(
                    target: LOADER_TARGET,
                    plugin = descriptor.id(),
                    method = %name,
                    owner = registry.get(&name).map_or("", |existing| existing.plugin()),
                    "method already registered; keeping first registration"
                );
            }
        }
    }
    registry
}

/// Orders catalog indices so every plugin follows its dependencies.
fn activation_order(descriptors: &[PluginDescriptor]) -> Result<Vec<usize>, LoaderError> {
    let positions: HashMap<&str, usize> = descriptors
        .iter()
        .enumerate()
        .map(|(index, descriptor)| (descriptor.id(), index))
        .collect();

    let mut pending = vec![0usize; descriptors.len()];
    let mut dependants: Vec<Vec<usize>> = vec![Vec::new(); descriptors.len()];
    for (index, descriptor) in descriptors.iter().enumerate() {
        let mut seen = HashSet::new();
        for dependency in descriptor.dependencies() {
            let Some(&required) = positions.get(dependency.as_str()) else {
                return Err(LoaderError::MissingDependency {
                    plugin: descriptor.id().to_owned(),
                    dependency: dependency.clone(),
                });
            };
            if !seen.insert(required) {
                continue;
            }
            if let Some(slot) = pending.get_mut(index) {
                *slot += 1;
            }
            if let Some(list) = dependants.get_mut(required) {
                list.push(index);
            }
        }
    }

    let mut ready: BTreeSet<usize> = pending
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count == 0)
        .map(|(index, _)| index)
        .collect();
    let mut order = Vec::with_capacity(descriptors.len());
    while let Some(index) = ready.pop_first() {
        order.push(index);
        for &dependant in dependants.get(index).map_or(&[][..], Vec::as_slice) {
            if let Some(slot) = pending.get_mut(dependant) {
                *slot -= 1;
                if *slot == 0 {
                    ready.insert(dependant);
                }
            }
        }
    }

    if order.len() < descriptors.len() {
        let members = descriptors
            .iter()
            .zip(&pending)
            .filter(|&(_, &count)| count > 0)
            .map(|(descriptor, _)| descriptor.id().to_owned())
            .collect();
        return Err(LoaderError::DependencyCycle { members });
    }
    Ok(order)
}
