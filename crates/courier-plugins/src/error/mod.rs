//! Domain errors raised while activating plugins and reading arguments.
//!
//! All errors use `thiserror`-derived enums with structured context so callers
//! can inspect the failure programmatically. Loader errors name both the
//! requesting plugin and the plugin it was looking for.

use thiserror::Error;

/// Errors raised by plugin factories during activation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    /// A factory asked for a dependency that is not active.
    #[error("plugin '{plugin}' requested inactive dependency '{dependency}'")]
    DependencyUnavailable {
        /// Plugin being activated.
        plugin: String,
        /// Dependency that was requested.
        dependency: String,
    },

    /// A dependency is active but has a different concrete type.
    #[error("plugin '{plugin}' expected dependency '{dependency}' to be a {expected}")]
    DependencyType {
        /// Plugin being activated.
        plugin: String,
        /// Dependency that was requested.
        dependency: String,
        /// Type name the factory asked for.
        expected: &'static str,
    },

    /// The factory could not construct the plugin.
    #[error("plugin '{plugin}' failed to activate: {message}")]
    Activation {
        /// Plugin being activated.
        plugin: String,
        /// Human-readable failure description.
        message: String,
    },
}

/// Errors that abort plugin loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// Two descriptors in the catalog share an identity.
    #[error("plugin '{plugin}' is already registered")]
    DuplicatePlugin {
        /// Repeated identity.
        plugin: String,
    },

    /// A plugin declares a dependency that is not in the catalog.
    #[error("plugin '{plugin}' requires '{dependency}', which is not available")]
    MissingDependency {
        /// Plugin declaring the dependency.
        plugin: String,
        /// Identity that could not be found.
        dependency: String,
    },

    /// Dependencies form at least one cycle.
    #[error("dependency cycle between plugins: {}", members.join(", "))]
    DependencyCycle {
        /// Every plugin that could not be ordered.
        members: Vec<String>,
    },

    /// A plugin factory failed.
    #[error("activation of plugin '{plugin}' failed: {source}")]
    Activation {
        /// Plugin that failed.
        plugin: String,
        /// Factory error.
        #[source]
        source: PluginError,
    },
}

/// Errors raised while reading call arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// The call supplied fewer arguments than the method reads.
    #[error("argument {index} is missing")]
    Missing {
        /// Zero-based argument position.
        index: usize,
    },

    /// The argument has a different shape than the method expects.
    #[error("argument {index} should be {expected} but was {found}")]
    TypeMismatch {
        /// Zero-based argument position.
        index: usize,
        /// Expected shape.
        expected: &'static str,
        /// Actual shape.
        found: &'static str,
    },
}
