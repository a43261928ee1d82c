//! Procedural ambient audio.
//!
//! The engine only talks to an [`AudioBackend`]; the browser implements it on
//! top of WebAudio and the tests implement it with a recording mock. Times are
//! seconds on the backend's own clock.

pub mod design;
pub mod engine;
pub mod noise;

pub use design::{design_for, Bed, OneShot, SoundDesign, Trigger};
pub use engine::Soundscape;
pub use noise::{NoiseBank, NoiseColor};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AudioError {
    #[error("failed to create {0} node")]
    Create(&'static str),
    #[error("failed to connect {0}")]
    Connect(&'static str),
    #[error("audio context is closed")]
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextState {
    Running,
    Suspended,
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    Lowpass,
    Highpass,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wave {
    Sine,
}

/// Automatable parameter of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Param {
    Gain,
    Frequency,
}

/// Scheduled parameter change. There is no "set now": every
/// audible change is a ramp or an approach.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Automation {
    /// Pin the value at `at` so the following ramp starts from it.
    Anchor { value: f32, at: f64 },
    Linear { value: f32, end: f64 },
    Exponential { value: f32, end: f64 },
    /// First-order approach toward `target` with time constant `tau`.
    Approach { target: f32, start: f64, tau: f64 },
    CancelFrom { at: f64 },
}

pub trait AudioBackend {
    type Node: Clone;

    fn now(&self) -> f64;
    fn sample_rate(&self) -> f32;
    fn state(&self) -> ContextState;

    fn gain(&mut self, level: f32) -> Result<Self::Node, AudioError>;
    fn filter(&mut self, kind: FilterKind, frequency: f32, q: f32) -> Result<Self::Node, AudioError>;
    /// Buffer source playing one of the installed noise buffers.
    fn noise(&mut self, color: NoiseColor, looped: bool) -> Result<Self::Node, AudioError>;
    fn oscillator(&mut self, wave: Wave, frequency: f32) -> Result<Self::Node, AudioError>;
    fn panner(&mut self, pan: f32) -> Result<Self::Node, AudioError>;

    fn connect(&mut self, from: &Self::Node, to: &Self::Node) -> Result<(), AudioError>;
    fn connect_param(&mut self, from: &Self::Node, to: &Self::Node, param: Param) -> Result<(), AudioError>;
    fn connect_output(&mut self, from: &Self::Node) -> Result<(), AudioError>;
    /// Idempotent.
    fn disconnect(&mut self, node: &Self::Node);

    fn automate(&mut self, node: &Self::Node, param: Param, change: Automation);
    fn start(&mut self, node: &Self::Node, at: f64);
    fn stop(&mut self, node: &Self::Node, at: f64);

    /// Called once, before any noise source is created.
    fn install_noise(&mut self, bank: &NoiseBank) -> Result<(), AudioError>;
    fn resume(&mut self);
    fn close(&mut self);
}
