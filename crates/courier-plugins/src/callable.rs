//! Invocable method handles.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::argument::Arguments;
use crate::response::Response;

/// Error returned by a failing callable.
pub type CallError = Box<dyn Error + Send + Sync>;

/// A method reachable by qualified name.
///
/// Functions and closures taking [`Arguments`] and returning a [`Response`]
/// implement this trait directly.
///
/// # Example
///
/// ```
/// use courier_plugins::{Arguments, CallError, Callable, Response};
///
/// fn ping(_args: Arguments) -> Result<Response, CallError> {
///     Ok(Response::success("pong"))
/// }
///
/// let response = ping.invoke(Arguments::default()).unwrap();
/// assert_eq!(response.message(), "pong");
/// ```
pub trait Callable: Send + Sync {
    /// Runs the method with positional arguments.
    ///
    /// # Errors
    ///
    /// Returns whatever error caused the method to fail.
    fn invoke(&self, args: Arguments) -> Result<Response, CallError>;
}

impl<F> Callable for F
where
    F: Fn(Arguments) -> Result<Response, CallError> + Send + Sync,
{
    fn invoke(&self, args: Arguments) -> Result<Response, CallError> {
        self(args)
    }
}

/// One method contributed by a method provider.
#[derive(Clone)]
pub struct MethodDefinition {
    container: String,
    method: String,
    handle: Arc<dyn Callable>,
}

impl MethodDefinition {
    /// Creates a definition for `<container>.<method>`.
    pub fn new(
        container: impl Into<String>,
        method: impl Into<String>,
        handle: impl Callable + 'static,
    ) -> Self {
        Self {
            container: container.into(),
            method: method.into(),
            handle: Arc::new(handle),
        }
    }

    /// Component the method belongs to.
    #[must_use]
    pub const fn container(&self) -> &str {
        self.container.as_str()
    }

    /// Bare method name.
    #[must_use]
    pub const fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Key the method is registered under.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.container, self.method)
    }

    /// Shared handle to the implementation.
    #[must_use]
    pub fn handle(&self) -> Arc<dyn Callable> {
        Arc::clone(&self.handle)
    }
}

impl fmt::Debug for MethodDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDefinition")
            .field("container", &self.container)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}
