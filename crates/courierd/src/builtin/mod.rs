//! Plugins shipped with the runtime.
//!
//! | Plugin    | Kind            | Requires | Methods                     |
//! | --------- | --------------- | -------- | --------------------------- |
//! | `core`    | plugin          |          |                             |
//! | `math`    | method provider | `core`   | `Math.Add`, `Math.Divide`   |
//! | `uploads` | method provider | `core`   | `Up.Save`                   |

mod core_plugin;
mod math;
mod uploads;

use std::sync::Arc;

use courier_plugins::{LoaderError, PluginCatalog, PluginDescriptor, PluginKind};

pub use self::core_plugin::CorePlugin;
pub use self::math::{DivisionError, MathError, MathPlugin};
pub use self::uploads::UploadsPlugin;

/// Identity of the base plugin every built-in provider requires.
pub const CORE_PLUGIN: &str = "core";

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Catalog of the built-in plugins.
///
/// # Errors
///
/// Returns [`LoaderError::DuplicatePlugin`] if two built-ins share an
/// identity.
pub fn catalog() -> Result<PluginCatalog, LoaderError> {
    let mut catalog = PluginCatalog::new();
    for descriptor in descriptors() {
        catalog.add(descriptor)?;
    }
    Ok(catalog)
}

/// Descriptors of the built-in plugins, in catalog order.
#[must_use]
pub fn descriptors() -> Vec<PluginDescriptor> {
    vec![
        PluginDescriptor::new("math", VERSION, PluginKind::MethodProvider, |ctx| {
            let core = ctx.dependency::<CorePlugin>(CORE_PLUGIN)?;
            Ok(Arc::new(MathPlugin::new(core)))
        })
        .requires([CORE_PLUGIN]),
        PluginDescriptor::new("uploads", VERSION, PluginKind::MethodProvider, |ctx| {
            ctx.dependency::<CorePlugin>(CORE_PLUGIN)?;
            Ok(Arc::new(UploadsPlugin))
        })
        .requires([CORE_PLUGIN]),
        PluginDescriptor::new(CORE_PLUGIN, VERSION, PluginKind::Plugin, |_| {
            Ok(Arc::new(CorePlugin::new()))
        }),
    ]
}
