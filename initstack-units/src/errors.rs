//! Error types for the process-wide subsystems.

use initstack::UnitError;
use thiserror::Error;

/// Errors raised by the crypto, codec, compression and time-base subsystems.
#[derive(Debug, Error)]
pub enum SubsystemError {
    /// The subsystem was used outside a live acquisition stack
    #[error("{subsystem} subsystem is not initialized")]
    NotInitialized {
        /// Which subsystem was used
        subsystem: &'static str,
    },

    /// The configured crypto engine is not one this build provides
    #[error("unknown crypto engine `{0}`")]
    UnknownEngine(String),

    /// Base64 input could not be decoded
    #[error("base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The compression stream failed
    #[error("compression error: {0}")]
    Compression(#[from] std::io::Error),

    /// Elapsed time since the time base does not fit a wall-clock offset
    #[error("time base offset out of range: {0}")]
    ClockOutOfRange(#[from] chrono::OutOfRangeError),

    /// Unit settings could not be parsed
    #[error("invalid unit settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Type alias for subsystem results
pub type SubsystemResult<T> = Result<T, SubsystemError>;

impl From<SubsystemError> for UnitError {
    fn from(error: SubsystemError) -> Self {
        match error {
            SubsystemError::NotInitialized { .. } => Self::InvalidState(error.to_string()),
            SubsystemError::UnknownEngine(_) => Self::Rejected(error.to_string()),
            other => Self::subsystem(other),
        }
    }
}
