//! Call batch decoding and execution.
//!
//! A call-map is decoded into a [`CallBatch`] and executed by the
//! [`RpcDispatcher`] one call at a time, in request order. Each call gets a
//! result key that is unique within the batch: repeated method names are
//! suffixed `_0`, `_1`, … and the responses are gathered into an ordered
//! [`BatchResponse`].
//!
//! ```json
//! [["Math.Add",[1,2]],["Foo.Bar",[]],["Foo.Bar",[]]]
//! ```
//!
//! produces the keys `Math.Add`, `Foo.Bar_0` and `Foo.Bar_1`.

mod dispatcher;
mod errors;
mod keys;
mod marshal;
mod request;
mod response;

pub use self::dispatcher::RpcDispatcher;
pub use self::errors::DispatchError;
pub use self::request::{Call, CallBatch};
pub use self::response::BatchResponse;

/// Tracing target for dispatch events.
pub(crate) const DISPATCH_TARGET: &str = "courierd::dispatch";
