//! Process time base.
//!
//! Records a monotonic origin together with the wall-clock time it was taken
//! at, so elapsed durations can be mapped back onto wall-clock timestamps.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::errors::{SubsystemError, SubsystemResult};

const SUBSYSTEM: &str = "time_base";

/// A captured time base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBase {
    origin: Instant,
    wall_clock: DateTime<Utc>,
}

impl TimeBase {
    fn capture() -> Self {
        Self {
            origin: Instant::now(),
            wall_clock: Utc::now(),
        }
    }

    /// Monotonic instant the base was taken at
    pub const fn origin(&self) -> Instant {
        self.origin
    }

    /// Wall-clock time the base was taken at
    pub const fn wall_clock(&self) -> DateTime<Utc> {
        self.wall_clock
    }
}

static BASE: RwLock<Option<TimeBase>> = parking_lot::const_rwlock(None);

/// Captures a new time base, replacing any earlier one
pub fn reset_base() -> TimeBase {
    let base = TimeBase::capture();
    *BASE.write() = Some(base);
    tracing::debug!(wall_clock = %base.wall_clock, "time base reset");
    base
}

/// The current time base
pub fn base() -> SubsystemResult<TimeBase> {
    BASE.read().ok_or(SubsystemError::NotInitialized {
        subsystem: SUBSYSTEM,
    })
}

/// Monotonic time since the base was captured
pub fn elapsed() -> SubsystemResult<Duration> {
    Ok(base()?.origin.elapsed())
}

/// Wall-clock time the base was captured at
pub fn base_wall_clock() -> SubsystemResult<DateTime<Utc>> {
    Ok(base()?.wall_clock)
}

/// Base wall clock plus monotonic elapsed time.
///
/// Unaffected by wall-clock adjustments made after the base was captured.
pub fn now() -> SubsystemResult<DateTime<Utc>> {
    let base = base()?;
    let offset = chrono::Duration::from_std(base.origin.elapsed())?;
    Ok(base.wall_clock + offset)
}

#[cfg(test)]
pub(crate) fn reset() {
    *BASE.write() = None;
}
