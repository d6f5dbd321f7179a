//! Process-wide base64 codec.
//!
//! The codec tables are built once by [`init_static`] and dropped by
//! [`uninit_static`]; [`encode`] and [`decode`] only work in between.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::Engine as _;
use parking_lot::RwLock;

use crate::errors::{SubsystemError, SubsystemResult};

const SUBSYSTEM: &str = "base64";

static CODEC: RwLock<Option<GeneralPurpose>> = parking_lot::const_rwlock(None);

/// Builds the codec tables. Calling it again rebuilds them.
pub fn init_static() {
    let engine = GeneralPurpose::new(&alphabet::STANDARD, PAD);
    *CODEC.write() = Some(engine);
    tracing::debug!("base64 codec tables built");
}

/// Drops the codec tables.
///
/// Returns `false` when they were not built.
pub fn uninit_static() -> bool {
    let removed = CODEC.write().take().is_some();
    if removed {
        tracing::debug!("base64 codec tables dropped");
    }
    removed
}

/// True while the codec tables exist
pub fn is_initialized() -> bool {
    CODEC.read().is_some()
}

fn not_initialized() -> SubsystemError {
    SubsystemError::NotInitialized {
        subsystem: SUBSYSTEM,
    }
}

/// Encodes `data` as padded standard base64
pub fn encode(data: &[u8]) -> SubsystemResult<String> {
    let codec = CODEC.read();
    let engine = codec.as_ref().ok_or_else(not_initialized)?;
    Ok(engine.encode(data))
}

/// Decodes padded standard base64
pub fn decode(encoded: &str) -> SubsystemResult<Vec<u8>> {
    let codec = CODEC.read();
    let engine = codec.as_ref().ok_or_else(not_initialized)?;
    Ok(engine.decode(encoded)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_requires_tables() {
        let _guard = crate::SUBSYSTEM_LOCK.lock();
        let _ = uninit_static();

        assert!(matches!(
            encode(b"abc"),
            Err(SubsystemError::NotInitialized { subsystem: "base64" })
        ));
        assert!(decode("YWJj").is_err());
    }

    #[test]
    fn test_encode_decode_with_tables() {
        let _guard = crate::SUBSYSTEM_LOCK.lock();
        init_static();

        assert_eq!(encode(b"hello").unwrap(), "aGVsbG8=");
        assert_eq!(decode("aGVsbG8=").unwrap(), b"hello");
        assert!(matches!(decode("not base64!"), Err(SubsystemError::Decode(_))));

        assert!(uninit_static());
        assert!(!uninit_static());
    }
}
