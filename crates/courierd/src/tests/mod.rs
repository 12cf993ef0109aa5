//! Test suites for the runtime bootstrap and request handling.

mod behaviour;
mod support;
