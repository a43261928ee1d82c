//! Platform-free core of the mood scene: emotion presets, text classifiers,
//! parallax, particles, post-processing, the ambient audio engine, the
//! guidance loop and the camera bridge hub.

pub mod audio;
pub mod bridge;
pub mod classifier;
pub mod color;
pub mod config;
pub mod constants;
pub mod emotion;
pub mod guide;
pub mod parallax;
pub mod particles;
pub mod post;
pub mod preset;
pub mod remote;
pub mod scene;
pub mod tween;
pub mod verses;

pub use classifier::{classify, AnalysisResult, Metrics};
pub use config::{ConfigError, Credential, MoodConfig};
pub use emotion::{Emotion, Intent, Theme};
pub use preset::{lookup, EmotionPreset};
pub use scene::Scene;
