//! Process-wide compression context.
//!
//! [`init_static`] fixes the level every later [`compress`] call uses. The
//! context is never torn down; it lives until the process exits.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use parking_lot::RwLock;

use crate::errors::{SubsystemError, SubsystemResult};
use crate::settings::CompressionLevel;

const SUBSYSTEM: &str = "compress";

#[derive(Debug, Clone, Copy)]
struct CompressContext {
    level: CompressionLevel,
}

static CONTEXT: RwLock<Option<CompressContext>> = parking_lot::const_rwlock(None);

/// Initializes the static context at `level`.
///
/// Calling it again replaces the level.
pub fn init_static(level: CompressionLevel) {
    *CONTEXT.write() = Some(CompressContext { level });
    tracing::debug!(level = u32::from(level), "compression context initialized");
}

/// True once [`init_static`] has run
pub fn is_initialized() -> bool {
    CONTEXT.read().is_some()
}

/// Level of the static context
pub fn level() -> SubsystemResult<CompressionLevel> {
    context().map(|ctx| ctx.level)
}

fn context() -> SubsystemResult<CompressContext> {
    CONTEXT.read().ok_or(SubsystemError::NotInitialized {
        subsystem: SUBSYSTEM,
    })
}

/// Gzip-compresses `data` at the context level
pub fn compress(data: &[u8]) -> SubsystemResult<Vec<u8>> {
    let ctx = context()?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(ctx.level.into()));
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inflates gzip data produced by [`compress`]
pub fn decompress(data: &[u8]) -> SubsystemResult<Vec<u8>> {
    context()?;
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
pub(crate) fn reset() {
    *CONTEXT.write() = None;
}
