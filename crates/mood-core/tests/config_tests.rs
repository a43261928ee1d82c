// Host-side tests for runtime configuration and credential handling.

use mood_core::{ConfigError, Credential, MoodConfig};
use std::time::Duration;

#[test]
fn empty_document_is_all_defaults() {
    let cfg = MoodConfig::from_json("{}").unwrap();
    assert_eq!(cfg, MoodConfig::default());
    assert_eq!(cfg.classify_timeout(), Duration::from_millis(2500));
    assert_eq!(cfg.silence_debounce(), Duration::from_millis(2000));
    assert_eq!(cfg.bridge_reconnect_ms, 5000);
    assert_eq!(cfg.capture_width, 300);
    assert_eq!(cfg.log_level(), log::Level::Info);
}

#[test]
fn partial_document_overrides_named_fields() {
    let cfg = MoodConfig::from_json(
        r#"{ "bridge_url": "ws://10.0.0.2:9000", "silence_debounce_ms": 1200, "log_level": "DEBUG" }"#,
    )
    .unwrap();
    assert_eq!(cfg.bridge_url, "ws://10.0.0.2:9000");
    assert_eq!(cfg.silence_debounce(), Duration::from_millis(1200));
    assert_eq!(cfg.log_level(), log::Level::Debug);
    assert_eq!(cfg.capture_interval_ms, 500);
}

#[test]
fn out_of_range_values_are_rejected() {
    let err = MoodConfig::from_json(r#"{ "classify_timeout_ms": 0 }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::OutOfRange {
            field: "classify_timeout_ms",
            ..
        }
    ));
    let err = MoodConfig::from_json(r#"{ "capture_jpeg_quality": 1.5 }"#).unwrap_err();
    assert!(err.to_string().contains("capture_jpeg_quality"));
    assert!(matches!(
        MoodConfig::from_json("[1, 2]"),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn credential_rejects_placeholders() {
    assert!(Credential::parse("").is_err());
    assert!(Credential::parse("   ").is_err());
    assert!(Credential::parse("too-short").is_err());
    assert!(Credential::parse("PASTE_YOUR_API_KEY_INTO_THIS_SLOT").is_err());
    assert!(Credential::parse("put_your_key_here_1234567").is_err());

    let key = Credential::parse("  AIzaSyA1234567890abcdefXYZ  ").unwrap();
    assert_eq!(key.expose(), "AIzaSyA1234567890abcdefXYZ");
}

#[test]
fn credential_never_prints_in_full() {
    let key = Credential::parse("AIzaSyA1234567890abcdefXYZ").unwrap();
    assert_eq!(key.masked(), "AIza...fXYZ");
    let debug = format!("{key:?}");
    assert!(!debug.contains("1234567890"));
    assert_eq!(debug, "Credential(AIza...fXYZ)");
}
