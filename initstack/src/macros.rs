//! Declaration macro for named acquisition stacks.

/// Declares a named [`AcquisitionStack`](crate::AcquisitionStack) type over a
/// fixed list of resource units.
///
/// The list is written in acquisition order: the first unit is acquired
/// first and released last.
///
/// # Example
///
/// ```rust
/// use initstack::acquisition_stack;
/// use initstack::testing::{self, journal, Probe};
///
/// acquisition_stack! {
///     /// Units every test process needs
///     pub type TestProcess = [Probe<0>, Probe<1>];
/// }
///
/// testing::reset();
/// drop(TestProcess::new().unwrap());
/// assert_eq!(
///     journal::take(),
///     vec!["A-acquire", "B-acquire", "B-release", "A-release"]
/// );
/// ```
#[macro_export]
macro_rules! acquisition_stack {
    ($(#[$meta:meta])* $vis:vis type $name:ident = [$($unit:ty),* $(,)?];) => {
        $(#[$meta])*
        $vis type $name = $crate::AcquisitionStack<($($unit,)*)>;
    };
}
