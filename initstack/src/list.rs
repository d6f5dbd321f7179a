//! Compile-time lists of resource units
//!
//! A list is a tuple of [`ResourceUnit`] types: `(A, B, C)`. The tuple is
//! never instantiated. It only drives the straight-line acquisition code
//! generated below, and lets callers name a slot's type with
//! [`Element`].
//!
//! Tuple expansion runs left to right, so index 0 is acquired first, lands at
//! the bottom of the ownership stack, and is released last.

use crate::errors::AcquisitionError;
use crate::stack::OwnershipStack;
use crate::unit::ResourceUnit;

/// A fixed, ordered list of resource-unit types.
///
/// Implemented for tuples of up to twelve [`ResourceUnit`] types, including
/// the empty tuple. Duplicates are allowed.
pub trait ResourceList: 'static {
    /// Number of units in the list
    const LEN: usize;

    /// Acquires every unit in list order, pushing each onto `stack`.
    ///
    /// Stops at the first failure. Units pushed before the failure stay on
    /// the stack; unwinding them is the caller's job.
    fn acquire_into(stack: &mut OwnershipStack) -> Result<(), AcquisitionError>;

    /// Unit names in list order
    fn unit_names() -> Vec<&'static str>;
}

/// Type-level indexing into a [`ResourceList`].
///
/// `<(A, B, C) as Element<1>>::Unit` is `B`. Indices past the end of the list
/// have no implementation, so they fail to compile:
///
/// ```rust,compile_fail,E0277
/// use initstack::{Element, ResourceUnit, UnitResult};
///
/// struct Only;
///
/// impl ResourceUnit for Only {
///     const NAME: &'static str = "only";
///     fn acquire() -> UnitResult<Self> { Ok(Self) }
///     fn release(&mut self) -> UnitResult<()> { Ok(()) }
/// }
///
/// let _ = <<(Only, Only) as Element<2>>::Unit as ResourceUnit>::NAME;
/// ```
///
/// The empty list has no slots at all:
///
/// ```rust,compile_fail,E0277
/// use initstack::{Element, ResourceUnit};
///
/// let _ = <<() as Element<0>>::Unit as ResourceUnit>::NAME;
/// ```
pub trait Element<const I: usize>: ResourceList {
    /// The unit type in slot `I`
    type Unit: ResourceUnit;
}

impl ResourceList for () {
    const LEN: usize = 0;

    fn acquire_into(_stack: &mut OwnershipStack) -> Result<(), AcquisitionError> {
        Ok(())
    }

    fn unit_names() -> Vec<&'static str> {
        Vec::new()
    }
}

macro_rules! impl_resource_list {
    (@elements $all:tt $($idx:tt : $unit:ident),+) => {
        $( impl_resource_list!(@element $all $idx $unit); )+
    };
    (@element [$($all:ident),+] $idx:tt $unit:ident) => {
        impl<$($all: ResourceUnit),+> Element<$idx> for ($($all,)+) {
            type Unit = $unit;
        }
    };
    ($len:literal => $($idx:tt : $unit:ident),+) => {
        impl<$($unit: ResourceUnit),+> ResourceList for ($($unit,)+) {
            const LEN: usize = $len;

            fn acquire_into(stack: &mut OwnershipStack) -> Result<(), AcquisitionError> {
                $( stack.acquire::<$unit>()?; )+
                Ok(())
            }

            fn unit_names() -> Vec<&'static str> {
                vec![$($unit::NAME),+]
            }
        }

        impl_resource_list!(@elements [$($unit),+] $($idx : $unit),+);
    };
}

impl_resource_list!(1 => 0: U0);
impl_resource_list!(2 => 0: U0, 1: U1);
impl_resource_list!(3 => 0: U0, 1: U1, 2: U2);
impl_resource_list!(4 => 0: U0, 1: U1, 2: U2, 3: U3);
impl_resource_list!(5 => 0: U0, 1: U1, 2: U2, 3: U3, 4: U4);
impl_resource_list!(6 => 0: U0, 1: U1, 2: U2, 3: U3, 4: U4, 5: U5);
impl_resource_list!(7 => 0: U0, 1: U1, 2: U2, 3: U3, 4: U4, 5: U5, 6: U6);
impl_resource_list!(8 => 0: U0, 1: U1, 2: U2, 3: U3, 4: U4, 5: U5, 6: U6, 7: U7);
impl_resource_list!(9 => 0: U0, 1: U1, 2: U2, 3: U3, 4: U4, 5: U5, 6: U6, 7: U7, 8: U8);
impl_resource_list!(10 => 0: U0, 1: U1, 2: U2, 3: U3, 4: U4, 5: U5, 6: U6, 7: U7, 8: U8, 9: U9);
impl_resource_list!(11 => 0: U0, 1: U1, 2: U2, 3: U3, 4: U4, 5: U5, 6: U6, 7: U7, 8: U8, 9: U9, 10: U10);
impl_resource_list!(12 => 0: U0, 1: U1, 2: U2, 3: U3, 4: U4, 5: U5, 6: U6, 7: U7, 8: U8, 9: U9, 10: U10, 11: U11);
