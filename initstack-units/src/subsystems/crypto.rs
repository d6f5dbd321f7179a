//! Process-wide digest engine.
//!
//! One engine is installed per process. Everything that hashes goes through
//! [`digest`], which fails until [`init`] or [`install`] has run.

use parking_lot::RwLock;
use sha2::{Digest, Sha256, Sha512};

use crate::errors::{SubsystemError, SubsystemResult};
use crate::settings::EngineName;

const SUBSYSTEM: &str = "crypto";

/// Digest engines this build provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestEngine {
    /// SHA-256; what `auto` resolves to
    #[default]
    Sha256,
    /// SHA-512
    Sha512,
}

impl DigestEngine {
    /// Resolves a configured engine name.
    pub fn resolve(name: &EngineName) -> SubsystemResult<Self> {
        match name.as_ref() {
            "auto" | "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            other => Err(SubsystemError::UnknownEngine(other.to_string())),
        }
    }

    /// Canonical engine name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }

    /// Digest length in bytes
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

static ENGINE: RwLock<Option<DigestEngine>> = parking_lot::const_rwlock(None);

/// Resolves `name` and installs that engine.
///
/// Initializing twice is allowed; the second call replaces the engine.
pub fn init(name: &EngineName) -> SubsystemResult<DigestEngine> {
    let engine = DigestEngine::resolve(name)?;
    install(engine);
    Ok(engine)
}

/// Installs `engine` directly
pub fn install(engine: DigestEngine) {
    let previous = ENGINE.write().replace(engine);
    tracing::debug!(
        engine = engine.name(),
        replaced = previous.map(DigestEngine::name),
        "crypto engine installed"
    );
}

/// Tears the engine down.
///
/// Returns `false` when there was nothing to tear down.
pub fn cleanup() -> bool {
    let previous = ENGINE.write().take();
    if let Some(engine) = previous {
        tracing::debug!(engine = engine.name(), "crypto engine torn down");
    }
    previous.is_some()
}

/// True while an engine is installed
pub fn is_initialized() -> bool {
    ENGINE.read().is_some()
}

/// The installed engine
pub fn engine() -> SubsystemResult<DigestEngine> {
    ENGINE
        .read()
        .ok_or(SubsystemError::NotInitialized {
            subsystem: SUBSYSTEM,
        })
}

/// Hashes `data` with the installed engine
pub fn digest(data: &[u8]) -> SubsystemResult<Vec<u8>> {
    Ok(engine()?.digest(data))
}
