//! Logging tests that install the process-global subscriber.
//!
//! Kept in their own test binary so the global install cannot collide with
//! the `#[traced_test]` tests in the library's unit tests.

use initstack_units::{LoggingConfig, LoggingError};

#[test]
fn test_second_init_fails() {
    let config = LoggingConfig::new().with_plain_format();

    // May already fail if another test installed a subscriber first.
    let _ = config.init();

    assert!(matches!(config.init(), Err(LoggingError::AlreadyInstalled(_))));
}
