//! Identifier and state types for acquisition stacks.

use std::fmt;

use nutype::nutype;
use uuid::Uuid;

/// Identifies one acquisition stack instance in logs.
///
/// `StackId` values are UUIDv7, which keeps them roughly time-ordered.
#[nutype(
    validate(predicate = |id: &Uuid| id.get_version() == Some(uuid::Version::SortRand)),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Deref,
        Display
    )
)]
pub struct StackId(Uuid);

impl StackId {
    /// Creates a new `StackId` with the current timestamp.
    pub fn new() -> Self {
        // Uuid::now_v7() always yields a version 7 UUID
        Self::try_new(Uuid::now_v7()).expect("Uuid::now_v7() should always return a valid v7 UUID")
    }
}

impl Default for StackId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of an acquisition stack.
///
/// `Acquiring` and `Releasing` are transient: they exist only while the
/// constructor or the teardown is running and show up in logs, never to a
/// caller holding the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackState {
    /// Nothing has been acquired yet
    Uninitialized,
    /// The unit at `index` is being acquired
    Acquiring {
        /// Position in the declared list
        index: usize,
    },
    /// Every declared unit is acquired
    Ready,
    /// The unit at `index` is being released
    Releasing {
        /// Position in the declared list
        index: usize,
    },
    /// Every acquired unit has been released
    Empty,
}

impl fmt::Display for StackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("uninitialized"),
            Self::Acquiring { index } => write!(f, "acquiring({index})"),
            Self::Ready => f.write_str("ready"),
            Self::Releasing { index } => write!(f, "releasing({index})"),
            Self::Empty => f.write_str("empty"),
        }
    }
}
