//! Runtime knobs. Every field has a default so a partial (or absent) JSON
//! document is valid.

use crate::constants::*;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be {expected}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
    },
    #[error("classifier credential is missing or a placeholder")]
    InvalidCredential,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MoodConfig {
    pub bridge_url: String,
    pub bridge_reconnect_ms: u64,
    pub capture_interval_ms: u64,
    pub capture_width: u32,
    pub capture_jpeg_quality: f64,
    pub classify_endpoint: String,
    pub classify_api_key: String,
    pub classify_timeout_ms: u64,
    pub silence_debounce_ms: u64,
    pub log_level: String,
    pub start_muted: bool,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            bridge_url: "ws://localhost:8765".to_string(),
            bridge_reconnect_ms: BRIDGE_RECONNECT_MS,
            capture_interval_ms: CAPTURE_INTERVAL_MS,
            capture_width: CAPTURE_WIDTH_PX,
            capture_jpeg_quality: 0.7,
            classify_endpoint:
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
                    .to_string(),
            classify_api_key: String::new(),
            classify_timeout_ms: CLASSIFY_TIMEOUT_MS,
            silence_debounce_ms: SILENCE_DEBOUNCE_MS,
            log_level: "info".to_string(),
            start_muted: false,
        }
    }
}

impl MoodConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: MoodConfig = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field, v: u64| {
            if v == 0 {
                Err(ConfigError::OutOfRange {
                    field,
                    expected: "greater than zero",
                })
            } else {
                Ok(())
            }
        };
        positive("bridge_reconnect_ms", self.bridge_reconnect_ms)?;
        positive("capture_interval_ms", self.capture_interval_ms)?;
        positive("classify_timeout_ms", self.classify_timeout_ms)?;
        positive("silence_debounce_ms", self.silence_debounce_ms)?;
        if self.capture_width == 0 {
            return Err(ConfigError::OutOfRange {
                field: "capture_width",
                expected: "greater than zero",
            });
        }
        if !(self.capture_jpeg_quality > 0.0 && self.capture_jpeg_quality <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "capture_jpeg_quality",
                expected: "in (0, 1]",
            });
        }
        Ok(())
    }

    pub fn classify_timeout(&self) -> Duration {
        Duration::from_millis(self.classify_timeout_ms)
    }

    pub fn silence_debounce(&self) -> Duration {
        Duration::from_millis(self.silence_debounce_ms)
    }

    pub fn log_level(&self) -> log::Level {
        match self.log_level.to_ascii_lowercase().as_str() {
            "error" => log::Level::Error,
            "warn" => log::Level::Warn,
            "debug" => log::Level::Debug,
            "trace" => log::Level::Trace,
            _ => log::Level::Info,
        }
    }
}

/// A credential that has passed the placeholder checks.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.len() < 20 || raw.contains("API_KEY") || raw.contains("key_here") {
            return Err(ConfigError::InvalidCredential);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First and last four characters, for logs.
    pub fn masked(&self) -> String {
        let head: String = self.0.chars().take(4).collect();
        let mut tail: Vec<char> = self.0.chars().rev().take(4).collect();
        tail.reverse();
        format!("{}...{}", head, tail.into_iter().collect::<String>())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential({})", self.masked())
    }
}
