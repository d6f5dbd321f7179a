//! The process-wide subsystems the resource units initialize.
//!
//! Each subsystem keeps its state in a module-level `RwLock` and refuses to
//! work until its unit has acquired it.

pub mod codec;
pub mod compress;
pub mod crypto;
pub mod time_base;
