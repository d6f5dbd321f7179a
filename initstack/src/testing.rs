//! Test support: recording probes and fault injection.
//!
//! Everything here is thread-local, so tests running on separate threads of
//! the same harness never see each other's journals or faults.
//!
//! # Example
//!
//! ```rust
//! use initstack::testing::{self, journal, Probe};
//! use initstack::AcquisitionStack;
//!
//! type A = Probe<0>;
//! type B = Probe<1>;
//!
//! testing::reset();
//! {
//!     let _stack = AcquisitionStack::<(A, B)>::new().unwrap();
//!     journal::record("body");
//! }
//! assert_eq!(
//!     journal::take(),
//!     vec!["A-acquire", "B-acquire", "body", "B-release", "A-release"]
//! );
//! ```

use std::cell::RefCell;
use std::collections::HashSet;

use crate::errors::{UnitError, UnitResult};
use crate::unit::ResourceUnit;

const LABELS: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z",
];

#[derive(Default)]
struct Faults {
    fail_acquire: HashSet<&'static str>,
    fail_release: HashSet<&'static str>,
    panic_on_release: HashSet<&'static str>,
}

thread_local! {
    static JOURNAL: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    static FAULTS: RefCell<Faults> = RefCell::new(Faults::default());
}

/// The per-thread event journal probes write to.
pub mod journal {
    use super::JOURNAL;

    /// Appends an event
    pub fn record(event: impl Into<String>) {
        let event = event.into();
        JOURNAL.with(|journal| journal.borrow_mut().push(event));
    }

    /// Drains and returns every recorded event, oldest first
    pub fn take() -> Vec<String> {
        JOURNAL.with(|journal| std::mem::take(&mut *journal.borrow_mut()))
    }

    /// Discards every recorded event
    pub fn clear() {
        JOURNAL.with(|journal| journal.borrow_mut().clear());
    }
}

/// Clears the journal and every injected fault on this thread
pub fn reset() {
    journal::clear();
    FAULTS.with(|faults| *faults.borrow_mut() = Faults::default());
}

/// Makes the probe named `name` fail its acquire step on this thread
pub fn fail_acquire(name: &'static str) {
    FAULTS.with(|faults| faults.borrow_mut().fail_acquire.insert(name));
}

/// Makes the probe named `name` fail its release step on this thread
pub fn fail_release(name: &'static str) {
    FAULTS.with(|faults| faults.borrow_mut().fail_release.insert(name));
}

/// Makes the probe named `name` panic inside its release step on this thread
pub fn panic_on_release(name: &'static str) {
    FAULTS.with(|faults| faults.borrow_mut().panic_on_release.insert(name));
}

fn has_fault(select: impl FnOnce(&Faults) -> &HashSet<&'static str>, name: &str) -> bool {
    FAULTS.with(|faults| select(&*faults.borrow()).contains(name))
}

/// A resource unit that records its lifecycle in the [`journal`].
///
/// `Probe<0>` is named `"A"`, `Probe<1>` is `"B"`, and so on up to
/// `Probe<25>`. A tag past the alphabet is rejected when the name is
/// evaluated at compile time:
///
/// ```rust,compile_fail,E0080
/// use initstack::testing::Probe;
/// use initstack::ResourceUnit;
///
/// const NAME: &str = <Probe<26> as ResourceUnit>::NAME;
/// ```
#[derive(Debug)]
pub struct Probe<const TAG: u8> {
    released: bool,
}

impl<const TAG: u8> ResourceUnit for Probe<TAG> {
    const NAME: &'static str = LABELS[TAG as usize];

    fn acquire() -> UnitResult<Self> {
        if has_fault(|f| &f.fail_acquire, Self::NAME) {
            journal::record(format!("{}-acquire-fails", Self::NAME));
            return Err(UnitError::Rejected(format!(
                "injected acquire fault for {}",
                Self::NAME
            )));
        }
        journal::record(format!("{}-acquire", Self::NAME));
        Ok(Self { released: false })
    }

    fn release(&mut self) -> UnitResult<()> {
        if self.released {
            return Err(UnitError::InvalidState(format!(
                "{} released twice",
                Self::NAME
            )));
        }
        self.released = true;

        if has_fault(|f| &f.panic_on_release, Self::NAME) {
            journal::record(format!("{}-release-panics", Self::NAME));
            panic!("injected release panic for {}", Self::NAME);
        }
        if has_fault(|f| &f.fail_release, Self::NAME) {
            journal::record(format!("{}-release-fails", Self::NAME));
            return Err(UnitError::Rejected(format!(
                "injected release fault for {}",
                Self::NAME
            )));
        }
        journal::record(format!("{}-release", Self::NAME));
        Ok(())
    }
}
