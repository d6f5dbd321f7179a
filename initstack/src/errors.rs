//! Error types for initstack.
//!
//! Errors are split by the step that produced them:
//!
//! - **`UnitError`**: what a single resource unit reports from its own
//!   acquire or release step
//! - **`AcquisitionError`**: a unit failed to acquire while a stack was being
//!   built; carries the report of the rollback that already happened
//! - **`ReleaseError`**: a unit failed to release while a stack was unwinding;
//!   never stops the unwind, only recorded in a [`ReleaseReport`]
//!
//! Referencing a list slot that does not exist is not a runtime error at all:
//! `Element<I>` is only implemented for in-range indices, so the compiler
//! rejects it.

use std::fmt;

use thiserror::Error;

/// Errors a resource unit reports from its acquire or release step.
#[derive(Debug, Error)]
pub enum UnitError {
    /// The underlying subsystem refused the request
    #[error("subsystem rejected the request: {0}")]
    Rejected(String),

    /// The underlying subsystem is not in a state that allows the step
    #[error("subsystem is in an invalid state: {0}")]
    InvalidState(String),

    /// The step panicked; the payload message is preserved when it is a string
    #[error("step panicked: {0}")]
    Panicked(String),

    /// Any other failure raised by the subsystem
    #[error(transparent)]
    Subsystem(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl UnitError {
    /// Wraps an arbitrary subsystem error.
    pub fn subsystem<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Subsystem(Box::new(error))
    }

    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::Panicked(message)
    }
}

/// Type alias for the result of a unit's acquire or release step
pub type UnitResult<T> = Result<T, UnitError>;

/// A resource unit failed to acquire while an ordered stack was being built.
///
/// By the time a caller sees this error, every unit acquired earlier in the
/// same attempt has already been released in reverse order; `rollback`
/// describes how that went.
#[derive(Debug, Error)]
#[error("resource unit `{unit}` at index {index} failed to acquire: {source}")]
pub struct AcquisitionError {
    /// Name of the unit that failed
    pub unit: &'static str,
    /// Position of the failing unit in the declared list
    pub index: usize,
    /// What the unit reported
    #[source]
    pub source: UnitError,
    /// Outcome of releasing the prefix that had already been acquired
    pub rollback: ReleaseReport,
}

impl AcquisitionError {
    pub(crate) fn new(unit: &'static str, index: usize, source: UnitError) -> Self {
        Self {
            unit,
            index,
            source,
            rollback: ReleaseReport::default(),
        }
    }
}

/// A resource unit failed to release while a stack was unwinding.
#[derive(Debug, Error)]
#[error("resource unit `{unit}` at position {position} failed to release: {source}")]
pub struct ReleaseError {
    /// Name of the unit that failed
    pub unit: &'static str,
    /// Position of the unit in the ownership stack (0 is the bottom)
    pub position: usize,
    /// What the unit reported
    #[source]
    pub source: UnitError,
}

/// Outcome of unwinding an ownership stack.
#[derive(Debug, Default)]
pub struct ReleaseReport {
    /// Number of units whose release step ran, successful or not
    pub released: usize,
    /// Release steps that reported a failure, in release order
    pub failures: Vec<ReleaseError>,
}

impl ReleaseReport {
    /// True when every release step succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when nothing was released
    pub const fn is_noop(&self) -> bool {
        self.released == 0
    }
}

impl fmt::Display for ReleaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} released, {} failed",
            self.released,
            self.failures.len()
        )
    }
}
