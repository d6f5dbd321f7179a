//! Resource units for the process-wide subsystems.
//!
//! Each unit reads [`settings::current`] when it acquires. [`StartupStack`]
//! is the order a process normally wants: crypto first so it is torn down
//! last.

use initstack::{acquisition_stack, ResourceUnit, UnitError, UnitResult};
use tracing::debug;

use crate::settings;
use crate::subsystems::crypto::{self, DigestEngine};
use crate::subsystems::time_base::{self, TimeBase};
use crate::subsystems::{codec, compress};

/// Installs the configured digest engine.
///
/// Release leaves the engine in place: it stays usable until the process
/// exits. Use [`CryptoExplicit`] when the engine must be torn down.
#[derive(Debug)]
pub struct CryptoInit {
    engine: DigestEngine,
}

impl CryptoInit {
    /// Engine this unit installed
    pub const fn engine(&self) -> DigestEngine {
        self.engine
    }
}

impl ResourceUnit for CryptoInit {
    const NAME: &'static str = "crypto";

    fn acquire() -> UnitResult<Self> {
        let engine = crypto::init(&settings::current().crypto_engine)?;
        Ok(Self { engine })
    }

    fn release(&mut self) -> UnitResult<()> {
        debug!(engine = self.engine.name(), "crypto engine left installed until exit");
        Ok(())
    }
}

/// Installs the builtin digest engine and tears it down on release.
#[derive(Debug)]
pub struct CryptoExplicit {
    _private: (),
}

impl ResourceUnit for CryptoExplicit {
    const NAME: &'static str = "crypto-explicit";

    fn acquire() -> UnitResult<Self> {
        crypto::install(DigestEngine::default());
        Ok(Self { _private: () })
    }

    fn release(&mut self) -> UnitResult<()> {
        if crypto::cleanup() {
            Ok(())
        } else {
            Err(UnitError::InvalidState(
                "crypto engine was already torn down".to_string(),
            ))
        }
    }
}

/// Builds the base64 codec tables and drops them on release.
#[derive(Debug)]
pub struct Base64Init {
    _private: (),
}

impl ResourceUnit for Base64Init {
    const NAME: &'static str = "base64";

    fn acquire() -> UnitResult<Self> {
        codec::init_static();
        Ok(Self { _private: () })
    }

    fn release(&mut self) -> UnitResult<()> {
        if codec::uninit_static() {
            Ok(())
        } else {
            Err(UnitError::InvalidState(
                "base64 codec tables were already dropped".to_string(),
            ))
        }
    }
}

/// Initializes the static compression context.
///
/// The context has no teardown; release does nothing.
#[derive(Debug)]
pub struct CompressInit {
    _private: (),
}

impl ResourceUnit for CompressInit {
    const NAME: &'static str = "compress";

    fn acquire() -> UnitResult<Self> {
        compress::init_static(settings::current().compression_level);
        Ok(Self { _private: () })
    }

    fn release(&mut self) -> UnitResult<()> {
        Ok(())
    }
}

/// Captures the process time base. Release does nothing.
#[derive(Debug)]
pub struct TimeBaseInit {
    base: TimeBase,
}

impl TimeBaseInit {
    /// The base captured on acquisition
    pub const fn base(&self) -> TimeBase {
        self.base
    }
}

impl ResourceUnit for TimeBaseInit {
    const NAME: &'static str = "time-base";

    fn acquire() -> UnitResult<Self> {
        Ok(Self {
            base: time_base::reset_base(),
        })
    }

    fn release(&mut self) -> UnitResult<()> {
        Ok(())
    }
}

acquisition_stack! {
    /// The standard process startup sequence.
    pub type StartupStack = [CryptoInit, Base64Init, CompressInit, TimeBaseInit];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{EngineName, UnitSettings};
    use initstack::ResourceList;
    use tracing_test::traced_test;

    fn reset_subsystems() {
        settings::clear();
        let _ = crypto::cleanup();
        let _ = codec::uninit_static();
        compress::reset();
        time_base::reset();
    }

    #[test]
    fn test_startup_stack_declares_crypto_first() {
        assert_eq!(
            <(CryptoInit, Base64Init, CompressInit, TimeBaseInit) as ResourceList>::unit_names(),
            vec!["crypto", "base64", "compress", "time-base"]
        );
        assert_eq!(
            StartupStack::declared_units(),
            vec!["crypto", "base64", "compress", "time-base"]
        );
    }

    #[test]
    fn test_crypto_init_uses_configured_engine() {
        let _guard = crate::SUBSYSTEM_LOCK.lock();
        reset_subsystems();
        settings::install(
            UnitSettings::new().with_crypto_engine(EngineName::try_new("sha512").unwrap()),
        );

        let mut unit = CryptoInit::acquire().unwrap();

        assert_eq!(unit.engine(), DigestEngine::Sha512);
        assert_eq!(crypto::engine().unwrap(), DigestEngine::Sha512);

        unit.release().unwrap();
        assert!(crypto::is_initialized(), "release leaves the engine installed");
        reset_subsystems();
    }

    #[test]
    fn test_crypto_init_rejects_unknown_engine() {
        let _guard = crate::SUBSYSTEM_LOCK.lock();
        reset_subsystems();
        settings::install(
            UnitSettings::new().with_crypto_engine(EngineName::try_new("whirlpool").unwrap()),
        );

        let result = CryptoInit::acquire();

        assert!(matches!(result, Err(UnitError::Rejected(_))));
        assert!(!crypto::is_initialized());
        reset_subsystems();
    }

    #[test]
    fn test_crypto_explicit_tears_down() {
        let _guard = crate::SUBSYSTEM_LOCK.lock();
        reset_subsystems();

        let mut unit = CryptoExplicit::acquire().unwrap();
        assert!(crypto::is_initialized());

        unit.release().unwrap();
        assert!(!crypto::is_initialized());
        assert!(matches!(unit.release(), Err(UnitError::InvalidState(_))));
    }

    #[test]
    fn test_base64_init_round_trip() {
        let _guard = crate::SUBSYSTEM_LOCK.lock();
        reset_subsystems();

        let mut unit = Base64Init::acquire().unwrap();
        assert_eq!(codec::encode(b"ok").unwrap(), "b2s=");

        unit.release().unwrap();
        assert!(codec::encode(b"ok").is_err());
        assert!(matches!(unit.release(), Err(UnitError::InvalidState(_))));
    }

    #[test]
    fn test_compress_init_reads_level() {
        let _guard = crate::SUBSYSTEM_LOCK.lock();
        reset_subsystems();
        settings::install(
            UnitSettings::new()
                .with_compression_level(crate::settings::CompressionLevel::try_new(3).unwrap()),
        );

        let mut unit = CompressInit::acquire().unwrap();

        assert_eq!(u32::from(compress::level().unwrap()), 3);
        unit.release().unwrap();
        assert!(compress::is_initialized(), "the context outlives the unit");
        reset_subsystems();
    }

    #[test]
    fn test_time_base_init_captures_base() {
        let _guard = crate::SUBSYSTEM_LOCK.lock();
        reset_subsystems();

        let mut unit = TimeBaseInit::acquire().unwrap();

        assert_eq!(time_base::base().unwrap(), unit.base());
        unit.release().unwrap();
        assert!(time_base::elapsed().is_ok());
        reset_subsystems();
    }

    #[traced_test]
    #[test]
    fn test_startup_stack_logs_subsystem_events() {
        let _guard = crate::SUBSYSTEM_LOCK.lock();
        reset_subsystems();

        let report = StartupStack::new().unwrap().release();

        assert!(report.is_clean());
        assert!(logs_contain("crypto engine installed"));
        assert!(logs_contain("base64 codec tables built"));
        assert!(logs_contain("compression context initialized"));
        assert!(logs_contain("time base reset"));
        assert!(logs_contain("base64 codec tables dropped"));
        assert!(logs_contain("crypto engine left installed until exit"));
        reset_subsystems();
    }

    #[traced_test]
    #[test]
    fn test_unknown_engine_touches_no_subsystem() {
        let _guard = crate::SUBSYSTEM_LOCK.lock();
        reset_subsystems();
        settings::install(
            UnitSettings::new().with_crypto_engine(EngineName::try_new("whirlpool").unwrap()),
        );

        let error = StartupStack::new().unwrap_err();

        assert_eq!(error.unit, "crypto");
        assert!(!logs_contain("crypto engine installed"));
        assert!(!logs_contain("base64 codec tables built"));
        reset_subsystems();
    }
}
