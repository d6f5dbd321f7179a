//! Process-wide subsystems and the resource units that initialize them.
//!
//! The subsystems here (a digest engine, a base64 codec, a compression
//! context and a time base) are global: every function in
//! [`subsystems`] fails with [`SubsystemError::NotInitialized`] until the
//! matching unit has been acquired. [`StartupStack`] acquires all of them in
//! the right order.
//!
//! ```rust
//! use initstack_units::{settings, subsystems::codec, StartupStack, UnitSettings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! settings::install(UnitSettings::from_json(r#"{ "compression_level": 9 }"#)?);
//!
//! let startup = StartupStack::new()?;
//! assert_eq!(codec::encode(b"hi")?, "aGk=");
//!
//! let report = startup.release();
//! assert!(report.is_clean());
//! assert!(codec::encode(b"hi").is_err());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod errors;
pub mod logging;
pub mod settings;
pub mod subsystems;
mod units;

pub use errors::{SubsystemError, SubsystemResult};
pub use logging::{LogLevel, LoggingConfig, LoggingError};
pub use settings::{CompressionLevel, EngineName, UnitSettings};
pub use subsystems::crypto::DigestEngine;
pub use subsystems::time_base::TimeBase;
pub use units::{Base64Init, CompressInit, CryptoExplicit, CryptoInit, StartupStack, TimeBaseInit};

/// Serializes unit tests that touch process-wide subsystem state.
#[cfg(test)]
pub(crate) static SUBSYSTEM_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());
