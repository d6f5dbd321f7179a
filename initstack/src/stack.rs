//! The runtime ownership stack
//!
//! Holds acquired units in acquisition order and only ever releases the most
//! recently pushed one. Dropping the stack releases everything still on it,
//! top first, which is what makes an early `?` return or a panic in the
//! middle of a startup sequence unwind the already-acquired prefix.

use tracing::{debug, error, warn};

use crate::errors::{AcquisitionError, ReleaseError, ReleaseReport};
use crate::types::StackState;
use crate::unit::{ResourceUnit, UnitHandle};

/// LIFO container of exclusively owned, acquired resource units.
#[derive(Debug, Default)]
pub struct OwnershipStack {
    handles: Vec<UnitHandle>,
}

impl OwnershipStack {
    /// Creates an empty stack
    pub const fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Creates an empty stack with room for `capacity` units
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            handles: Vec::with_capacity(capacity),
        }
    }

    /// Acquires a `U` and pushes it on top of the stack.
    ///
    /// On failure nothing is pushed and the units already on the stack are
    /// left alone.
    pub fn acquire<U: ResourceUnit>(&mut self) -> Result<(), AcquisitionError> {
        let index = self.handles.len();
        let state = StackState::Acquiring { index };
        debug!(unit = U::NAME, index, %state, "acquiring resource unit");

        match UnitHandle::acquire::<U>(index) {
            Ok(handle) => {
                self.handles.push(handle);
                Ok(())
            }
            Err(source) => {
                error!(unit = U::NAME, index, error = %source, "resource unit failed to acquire");
                Err(AcquisitionError::new(U::NAME, index, source))
            }
        }
    }

    /// Number of units currently held
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True when no unit is held
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Names of the held units, bottom (first acquired) to top
    pub fn unit_names(&self) -> Vec<&'static str> {
        self.handles.iter().map(UnitHandle::name).collect()
    }

    /// Releases the top unit.
    ///
    /// Returns `None` when the stack is already empty.
    pub fn release_top(&mut self) -> Option<Result<(), ReleaseError>> {
        let handle = self.handles.pop()?;
        let index = self.handles.len();
        let state = StackState::Releasing { index };
        debug!(unit = handle.name(), index, %state, "releasing resource unit");

        let outcome = handle.release();
        if let Err(failure) = &outcome {
            warn!(
                unit = failure.unit,
                index,
                error = %failure.source,
                "resource unit failed to release; continuing unwind"
            );
        }
        Some(outcome)
    }

    /// Releases every held unit, top first.
    ///
    /// A failing release never stops the unwind; failures are collected in
    /// the report. Calling this on an empty stack does nothing.
    pub fn release_all(&mut self) -> ReleaseReport {
        let mut report = ReleaseReport::default();
        while let Some(outcome) = self.release_top() {
            report.released += 1;
            if let Err(failure) = outcome {
                report.failures.push(failure);
            }
        }
        report
    }
}

impl Drop for OwnershipStack {
    fn drop(&mut self) {
        if self.handles.is_empty() {
            return;
        }

        let report = self.release_all();
        if report.is_clean() {
            debug!(released = report.released, "ownership stack unwound");
        } else {
            warn!(%report, "ownership stack unwound with release failures");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, journal, Probe};
    use tracing_test::traced_test;

    type A = Probe<0>;
    type B = Probe<1>;
    type C = Probe<2>;

    #[test]
    fn test_release_all_is_lifo() {
        testing::reset();
        let mut stack = OwnershipStack::new();
        stack.acquire::<A>().unwrap();
        stack.acquire::<B>().unwrap();
        stack.acquire::<C>().unwrap();
        assert_eq!(stack.unit_names(), vec!["A", "B", "C"]);

        let report = stack.release_all();

        assert_eq!(report.released, 3);
        assert!(report.is_clean());
        assert!(stack.is_empty());
        assert_eq!(
            journal::take(),
            vec!["A-acquire", "B-acquire", "C-acquire", "C-release", "B-release", "A-release"]
        );
    }

    #[test]
    fn test_release_all_on_empty_stack_is_noop() {
        testing::reset();
        let mut stack = OwnershipStack::with_capacity(4);

        let first = stack.release_all();
        let second = stack.release_all();

        assert!(first.is_noop());
        assert!(second.is_noop());
        assert!(stack.release_top().is_none());
        assert!(journal::take().is_empty());
    }

    #[test]
    fn test_release_top_only_removes_latest() {
        testing::reset();
        let mut stack = OwnershipStack::new();
        stack.acquire::<A>().unwrap();
        stack.acquire::<B>().unwrap();
        journal::clear();

        stack.release_top().unwrap().unwrap();

        assert_eq!(stack.unit_names(), vec!["A"]);
        assert_eq!(journal::take(), vec!["B-release"]);
    }

    #[test]
    fn test_drop_releases_in_reverse() {
        testing::reset();
        {
            let mut stack = OwnershipStack::new();
            stack.acquire::<A>().unwrap();
            stack.acquire::<B>().unwrap();
            journal::record("scope body");
        }

        assert_eq!(
            journal::take(),
            vec!["A-acquire", "B-acquire", "scope body", "B-release", "A-release"]
        );
    }

    #[test]
    fn test_failed_acquire_leaves_stack_untouched() {
        testing::reset();
        testing::fail_acquire("B");
        let mut stack = OwnershipStack::new();
        stack.acquire::<A>().unwrap();

        let error = stack.acquire::<B>().unwrap_err();

        assert_eq!(error.index, 1);
        assert_eq!(stack.len(), 1);
    }

    #[traced_test]
    #[test]
    fn test_release_failure_does_not_stop_unwind() {
        testing::reset();
        testing::fail_release("B");
        let mut stack = OwnershipStack::new();
        stack.acquire::<A>().unwrap();
        stack.acquire::<B>().unwrap();
        stack.acquire::<C>().unwrap();
        journal::clear();

        let report = stack.release_all();

        assert_eq!(report.released, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].unit, "B");
        assert_eq!(report.failures[0].position, 1);
        assert_eq!(
            journal::take(),
            vec!["C-release", "B-release-fails", "A-release"]
        );
        assert!(logs_contain("failed to release; continuing unwind"));
    }

    #[traced_test]
    #[test]
    fn test_acquire_failure_is_logged() {
        testing::reset();
        testing::fail_acquire("A");
        let mut stack = OwnershipStack::new();

        let _ = stack.acquire::<A>();

        assert!(logs_contain("resource unit failed to acquire"));
    }
}
