//! `initstack` - ordered acquisition of process-wide resources
//!
//! A process often depends on subsystems that must be initialized in a fixed
//! order at startup and torn down in exactly the reverse order at shutdown:
//! a crypto library before the codecs that use it, a time base before
//! anything that timestamps. `initstack` turns that order into a type.
//!
//! - [`ResourceUnit`]: one subsystem, acquired in its constructor and
//!   released by its owning stack
//! - [`ResourceList`]: a tuple of unit types, fixed at compile time
//! - [`OwnershipStack`]: the LIFO container of acquired units
//! - [`AcquisitionStack`]: acquires a list in order, releases it in reverse
//!   on drop, and rolls back the acquired prefix if a unit fails
//!
//! ```rust
//! use initstack::{acquisition_stack, ResourceUnit, UnitResult};
//!
//! struct Crypto;
//! struct Codec;
//!
//! impl ResourceUnit for Crypto {
//!     const NAME: &'static str = "crypto";
//!     fn acquire() -> UnitResult<Self> { Ok(Self) }
//!     // torn down at process exit
//!     fn release(&mut self) -> UnitResult<()> { Ok(()) }
//! }
//!
//! impl ResourceUnit for Codec {
//!     const NAME: &'static str = "codec";
//!     fn acquire() -> UnitResult<Self> { Ok(Self) }
//!     fn release(&mut self) -> UnitResult<()> { Ok(()) }
//! }
//!
//! acquisition_stack! {
//!     type Process = [Crypto, Codec];
//! }
//!
//! # fn main() -> Result<(), initstack::AcquisitionError> {
//! let _process = Process::new()?;
//! // ... run; codec is released before crypto when `_process` drops
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod errors;
mod list;
mod macros;
mod scoped;
mod stack;
mod types;
mod unit;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use errors::{
    AcquisitionError, ReleaseError, ReleaseReport, UnitError, UnitResult,
};
pub use list::{Element, ResourceList};
pub use scoped::AcquisitionStack;
pub use stack::OwnershipStack;
pub use types::{StackId, StackState};
pub use unit::ResourceUnit;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        acquisition_stack, AcquisitionError, AcquisitionStack, ReleaseReport, ResourceList,
        ResourceUnit, UnitError, UnitResult,
    };
}
