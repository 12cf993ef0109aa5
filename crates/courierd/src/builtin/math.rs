//! Integer arithmetic methods.

use std::time::SystemTime;

use courier_plugins::{Arguments, CallError, MethodDefinition, Plugin, Response};
use thiserror::Error;

use super::CorePlugin;

const CONTAINER: &str = "Math";

/// Failures of the arithmetic methods.
#[derive(Debug, Error)]
pub enum MathError {
    /// The sum does not fit in a 64-bit integer.
    #[error("{left} + {right} overflows")]
    Overflow {
        /// Left operand.
        left: i64,
        /// Right operand.
        right: i64,
    },

    /// The quotient could not be computed.
    #[error("cannot divide {dividend} by {divisor}")]
    Divide {
        /// Dividend.
        dividend: i64,
        /// Divisor.
        divisor: i64,
        /// Why the division failed.
        #[source]
        source: DivisionError,
    },
}

/// Why a division failed.
#[derive(Debug, Error)]
pub enum DivisionError {
    /// Divisor was zero.
    #[error("division by zero")]
    ByZero,
    /// `i64::MIN / -1`.
    #[error("quotient overflows")]
    Overflow,
}

/// Provides `Math.Add` and `Math.Divide`.
#[derive(Debug, Clone, Copy)]
pub struct MathPlugin {
    core_started_at: SystemTime,
}

impl MathPlugin {
    /// Creates the plugin on top of an active core.
    #[must_use]
    pub const fn new(core: &CorePlugin) -> Self {
        Self {
            core_started_at: core.started_at(),
        }
    }

    /// Start time of the core plugin this provider was built on.
    #[must_use]
    pub const fn core_started_at(&self) -> SystemTime {
        self.core_started_at
    }
}

impl Plugin for MathPlugin {
    fn methods(&self) -> Vec<MethodDefinition> {
        vec![
            MethodDefinition::new(CONTAINER, "Add", add),
            MethodDefinition::new(CONTAINER, "Divide", divide),
        ]
    }
}

fn add(args: Arguments) -> Result<Response, CallError> {
    let left = args.integer(0)?;
    let right = args.integer(1)?;
    let sum = left
        .checked_add(right)
        .ok_or(MathError::Overflow { left, right })?;
    Ok(Response::success("OK").with("Sum", sum))
}

fn divide(args: Arguments) -> Result<Response, CallError> {
    let dividend = args.integer(0)?;
    let divisor = args.integer(1)?;
    let source = if divisor == 0 {
        DivisionError::ByZero
    } else {
        DivisionError::Overflow
    };
    let quotient = dividend
        .checked_div(divisor)
        .ok_or(MathError::Divide {
            dividend,
            divisor,
            source,
        })?;
    Ok(Response::success("OK").with("Quotient", quotient))
}
