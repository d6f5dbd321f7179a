//! Settings read by the resource units when they acquire.
//!
//! Units are built with no arguments, so their tunables live in one
//! process-wide [`UnitSettings`] value. Install it before building the
//! acquisition stack; units fall back to [`UnitSettings::default`] when
//! nothing was installed.

use nutype::nutype;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::errors::SubsystemResult;

/// Name of the digest engine the crypto unit installs.
///
/// Trimmed and lowercased; never empty and at most 64 characters.
#[nutype(
    sanitize(trim, lowercase),
    validate(not_empty, len_char_max = 64),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        AsRef,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct EngineName(String);

impl EngineName {
    /// Let the crypto subsystem pick its default engine
    pub fn auto() -> Self {
        Self::try_new("auto").expect("`auto` is always a valid engine name")
    }
}

impl Default for EngineName {
    fn default() -> Self {
        Self::auto()
    }
}

/// Compression level for the compression context.
///
/// Validated to be between 0 (store) and 9 (best).
#[nutype(
    validate(less_or_equal = 9),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct CompressionLevel(u32);

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::try_new(6).expect("6 is always a valid compression level")
    }
}

/// Tunables for the process-wide resource units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitSettings {
    /// Digest engine installed by `CryptoInit`
    pub crypto_engine: EngineName,
    /// Level used by the compression context
    pub compression_level: CompressionLevel,
}

impl UnitSettings {
    /// Creates settings with every default
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> SubsystemResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the crypto engine
    #[must_use]
    pub fn with_crypto_engine(mut self, engine: EngineName) -> Self {
        self.crypto_engine = engine;
        self
    }

    /// Sets the compression level
    #[must_use]
    pub const fn with_compression_level(mut self, level: CompressionLevel) -> Self {
        self.compression_level = level;
        self
    }
}

static SETTINGS: RwLock<Option<UnitSettings>> = parking_lot::const_rwlock(None);

/// Installs the settings units read on their next acquisition
pub fn install(settings: UnitSettings) {
    tracing::debug!(
        crypto_engine = %settings.crypto_engine,
        compression_level = u32::from(settings.compression_level),
        "unit settings installed"
    );
    *SETTINGS.write() = Some(settings);
}

/// The installed settings, or the defaults when none were installed
pub fn current() -> UnitSettings {
    SETTINGS.read().clone().unwrap_or_default()
}

/// Removes installed settings so units go back to the defaults
pub fn clear() {
    *SETTINGS.write() = None;
}
