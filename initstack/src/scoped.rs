//! Ordered acquisition stacks
//!
//! [`AcquisitionStack`] is the scope-bound owner of a process's startup
//! resources. Building it acquires every unit of its list in order; dropping
//! it releases them in reverse. If a unit fails to acquire, the units before
//! it are released before the error is returned, so a failed startup leaves
//! nothing live behind.

use std::marker::PhantomData;

use tracing::{debug, error, info, info_span, warn, Span};

use crate::errors::{AcquisitionError, ReleaseReport};
use crate::list::ResourceList;
use crate::stack::OwnershipStack;
use crate::types::{StackId, StackState};

/// Acquires the units of `L` in order and releases them in reverse when
/// dropped.
///
/// # Example
///
/// ```rust
/// use initstack::{AcquisitionStack, ResourceUnit, UnitResult};
///
/// struct Logger;
/// struct Database;
///
/// impl ResourceUnit for Logger {
///     const NAME: &'static str = "logger";
///     fn acquire() -> UnitResult<Self> { Ok(Self) }
///     // nothing to flush
///     fn release(&mut self) -> UnitResult<()> { Ok(()) }
/// }
///
/// impl ResourceUnit for Database {
///     const NAME: &'static str = "database";
///     fn acquire() -> UnitResult<Self> { Ok(Self) }
///     fn release(&mut self) -> UnitResult<()> { Ok(()) }
/// }
///
/// # fn main() -> Result<(), initstack::AcquisitionError> {
/// // the logger is acquired first and released last
/// let stack = AcquisitionStack::<(Logger, Database)>::new()?;
/// assert_eq!(stack.unit_names(), vec!["logger", "database"]);
/// # Ok(())
/// # }
/// ```
pub struct AcquisitionStack<L: ResourceList> {
    id: StackId,
    stack: OwnershipStack,
    state: StackState,
    span: Span,
    _list: PhantomData<fn() -> L>,
}

impl<L: ResourceList> AcquisitionStack<L> {
    /// Acquires every unit of `L`, index 0 first.
    ///
    /// On failure the already-acquired prefix has been released, top first,
    /// by the time the error is returned. A panic inside a unit's acquire
    /// step unwinds the same prefix on its way out.
    pub fn new() -> Result<Self, AcquisitionError> {
        let id = StackId::new();
        let span = info_span!("acquisition_stack", stack_id = %id, units = L::LEN);
        let entered = span.enter();
        debug!(state = %StackState::Uninitialized, "building acquisition stack");

        let mut stack = OwnershipStack::with_capacity(L::LEN);
        if let Err(mut failure) = L::acquire_into(&mut stack) {
            failure.rollback = stack.release_all();
            error!(
                unit = failure.unit,
                index = failure.index,
                rolled_back = failure.rollback.released,
                rollback_failures = failure.rollback.failures.len(),
                "acquisition aborted; acquired prefix released"
            );
            return Err(failure);
        }

        info!(state = %StackState::Ready, "all resource units acquired");
        drop(entered);

        Ok(Self {
            id,
            stack,
            state: StackState::Ready,
            span,
            _list: PhantomData,
        })
    }

    /// Identifier used in this stack's log span
    pub const fn id(&self) -> StackId {
        self.id
    }

    /// `Ready` while units are held, `Empty` after release
    pub const fn state(&self) -> StackState {
        self.state
    }

    /// Number of units currently held
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// True when no unit is held
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Names of the units currently held, in acquisition order
    pub fn unit_names(&self) -> Vec<&'static str> {
        self.stack.unit_names()
    }

    /// Names of the declared units, in list order
    pub fn declared_units() -> Vec<&'static str> {
        L::unit_names()
    }

    /// Releases every held unit now and reports the outcome.
    ///
    /// Calling this again, or dropping the stack afterwards, does nothing.
    pub fn release_in_place(&mut self) -> ReleaseReport {
        if self.state == StackState::Empty {
            return ReleaseReport::default();
        }

        let _entered = self.span.enter();
        if let Some(top) = self.stack.len().checked_sub(1) {
            let releasing = StackState::Releasing { index: top };
            debug!(state = %releasing, "releasing acquisition stack");
        }

        let report = self.stack.release_all();
        self.state = StackState::Empty;

        if report.is_clean() {
            info!(released = report.released, state = %self.state, "all resource units released");
        } else {
            warn!(%report, state = %self.state, "resource units released with failures");
        }
        report
    }

    /// Consumes the stack, releasing every unit and returning the report.
    pub fn release(mut self) -> ReleaseReport {
        self.release_in_place()
    }
}

impl<L: ResourceList> Drop for AcquisitionStack<L> {
    fn drop(&mut self) {
        let _report = self.release_in_place();
    }
}

impl<L: ResourceList> std::fmt::Debug for AcquisitionStack<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcquisitionStack")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("units", &self.stack.unit_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UnitError;
    use crate::testing::{self, journal, Probe};
    use tracing_test::traced_test;

    type A = Probe<0>;
    type B = Probe<1>;
    type C = Probe<2>;

    #[test]
    fn test_new_is_ready_with_every_unit() {
        testing::reset();

        let stack = AcquisitionStack::<(A, B, C)>::new().unwrap();

        assert_eq!(stack.state(), StackState::Ready);
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.unit_names(), vec!["A", "B", "C"]);
        assert_eq!(AcquisitionStack::<(A, B, C)>::declared_units(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_release_in_place_twice_is_noop() {
        testing::reset();
        let mut stack = AcquisitionStack::<(A, B)>::new().unwrap();
        journal::clear();

        let first = stack.release_in_place();
        let second = stack.release_in_place();
        drop(stack);

        assert_eq!(first.released, 2);
        assert!(second.is_noop());
        assert_eq!(journal::take(), vec!["B-release", "A-release"]);
    }

    #[test]
    fn test_release_consumes_and_reports() {
        testing::reset();
        testing::fail_release("A");
        let stack = AcquisitionStack::<(A, B)>::new().unwrap();

        let report = stack.release();

        assert_eq!(report.released, 2);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].source, UnitError::Rejected(_)));
    }

    #[test]
    fn test_state_is_empty_after_release() {
        testing::reset();
        let mut stack = AcquisitionStack::<(A,)>::new().unwrap();

        let _ = stack.release_in_place();

        assert_eq!(stack.state(), StackState::Empty);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_failed_acquisition_rolls_back_prefix() {
        testing::reset();
        testing::fail_acquire("C");

        let error = AcquisitionStack::<(A, B, C)>::new().unwrap_err();

        assert_eq!(error.unit, "C");
        assert_eq!(error.index, 2);
        assert_eq!(error.rollback.released, 2);
        assert!(error.rollback.is_clean());
        assert_eq!(
            journal::take(),
            vec!["A-acquire", "B-acquire", "C-acquire-fails", "B-release", "A-release"]
        );
    }

    #[test]
    fn test_debug_lists_units() {
        testing::reset();
        let stack = AcquisitionStack::<(A, B)>::new().unwrap();

        let rendered = format!("{stack:?}");

        assert!(rendered.contains("AcquisitionStack"));
        assert!(rendered.contains("\"A\""));
        assert!(rendered.contains("Ready"));
    }

    #[traced_test]
    #[test]
    fn test_lifecycle_is_logged() {
        testing::reset();

        let stack = AcquisitionStack::<(A, B)>::new().unwrap();
        let id = stack.id().to_string();
        drop(stack);

        assert!(logs_contain("all resource units acquired"));
        assert!(logs_contain("all resource units released"));
        assert!(logs_contain("acquisition_stack"));
        assert!(logs_contain(&format!("stack_id={id}")));
        assert!(logs_contain("units=2"));
    }

    #[traced_test]
    #[test]
    fn test_rollback_is_logged() {
        testing::reset();
        testing::fail_acquire("B");

        let _ = AcquisitionStack::<(A, B)>::new();

        assert!(logs_contain("acquisition aborted; acquired prefix released"));
    }
}
