//! Resource units: one process-wide subsystem per type
//!
//! A resource unit acquires its subsystem in its constructor and gives it
//! back in its release step. Nothing else is public: once a unit has been
//! pushed onto an [`OwnershipStack`](crate::OwnershipStack) the only thing
//! that ever touches it again is the stack unwinding that slot.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::errors::{ReleaseError, UnitError, UnitResult};

/// A process-wide subsystem that is acquired on construction and released on
/// teardown.
///
/// Implementors must be move-only: do not derive `Clone` or `Copy`. A unit
/// stands for a side effect on global state, so a second copy would release
/// the same subsystem twice.
///
/// Units are `Send` so that a whole stack can be handed to the thread that
/// will tear it down.
///
/// # Example
///
/// ```rust
/// use initstack::{ResourceUnit, UnitResult};
///
/// struct WorkerPool {
///     threads: usize,
/// }
///
/// impl ResourceUnit for WorkerPool {
///     const NAME: &'static str = "worker-pool";
///
///     fn acquire() -> UnitResult<Self> {
///         // start the pool
///         Ok(Self { threads: 4 })
///     }
///
///     fn release(&mut self) -> UnitResult<()> {
///         // join the workers
///         self.threads = 0;
///         Ok(())
///     }
/// }
/// ```
pub trait ResourceUnit: Sized + Send + 'static {
    /// Name used in logs and errors
    const NAME: &'static str;

    /// Acquire the subsystem.
    ///
    /// Returning an error means nothing was acquired; the unit will not be
    /// released.
    fn acquire() -> UnitResult<Self>;

    /// Release what [`acquire`](Self::acquire) acquired.
    ///
    /// Called exactly once, by the owning stack. Units whose subsystem needs
    /// no teardown still implement this and return `Ok(())`, saying so in
    /// their own docs.
    fn release(&mut self) -> UnitResult<()>;
}

/// Object-safe view of a [`ResourceUnit`] used for type erasure
trait Release {
    fn release(&mut self) -> UnitResult<()>;
}

impl<U: ResourceUnit> Release for U {
    fn release(&mut self) -> UnitResult<()> {
        ResourceUnit::release(self)
    }
}

/// An owned, type-erased, acquired unit sitting in one slot of an ownership
/// stack.
pub(crate) struct UnitHandle {
    name: &'static str,
    position: usize,
    unit: Box<dyn Release + Send>,
}

impl UnitHandle {
    /// Runs `U::acquire` and wraps the result.
    pub(crate) fn acquire<U: ResourceUnit>(position: usize) -> UnitResult<Self> {
        let unit = U::acquire()?;
        Ok(Self {
            name: U::NAME,
            position,
            unit: Box::new(unit),
        })
    }

    pub(crate) const fn name(&self) -> &'static str {
        self.name
    }

    /// Consumes the handle, running the unit's release step.
    ///
    /// A panic inside the release step is caught and reported like any
    /// other release failure.
    pub(crate) fn release(mut self) -> Result<(), ReleaseError> {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.unit.release()))
            .unwrap_or_else(|payload| Err(UnitError::from_panic(payload.as_ref())));

        outcome.map_err(|source| ReleaseError {
            unit: self.name,
            position: self.position,
            source,
        })
    }
}

impl std::fmt::Debug for UnitHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitHandle")
            .field("name", &self.name)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
