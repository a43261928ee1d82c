//! Per-emotion sound designs, as data, plus the code that wires them.

use super::{AudioBackend, AudioError, Automation, FilterKind, NoiseColor, Param, Wave};
use crate::constants::SILENT_FLOOR;
use crate::emotion::Emotion;
use rand::prelude::*;
use smallvec::{smallvec, SmallVec};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lfo {
    pub rate_hz: f32,
    pub depth_hz: f32,
}

/// Continuous layer that runs for the life of the voice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bed {
    Noise {
        color: NoiseColor,
        filter: FilterKind,
        frequency: f32,
        q: f32,
        level: f32,
        /// Slow modulation of the filter cutoff.
        lfo: Option<Lfo>,
    },
    /// Detuned sine pair; the beating is the point.
    Drone { frequencies: [f32; 2], level: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OneShot {
    Chirp,
    Thunder,
    Heartbeat,
}

/// Repeating one-shot: every `period_sec`, fire with `probability`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trigger {
    pub event: OneShot,
    pub period_sec: f64,
    pub probability: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SoundDesign {
    pub beds: SmallVec<[Bed; 2]>,
    pub triggers: SmallVec<[Trigger; 1]>,
}

pub fn design_for(emotion: Emotion) -> SoundDesign {
    match emotion {
        Emotion::Happy => SoundDesign {
            beds: smallvec![Bed::Noise {
                color: NoiseColor::Pink,
                filter: FilterKind::Highpass,
                frequency: 1500.0,
                q: 1.0,
                level: 0.3,
                lfo: None,
            }],
            triggers: smallvec![Trigger {
                event: OneShot::Chirp,
                period_sec: 0.8,
                probability: 0.6,
            }],
        },
        Emotion::Sad => SoundDesign {
            beds: smallvec![Bed::Noise {
                color: NoiseColor::White,
                filter: FilterKind::Lowpass,
                frequency: 800.0,
                q: 0.5,
                level: 0.4,
                lfo: None,
            }],
            triggers: SmallVec::new(),
        },
        Emotion::Angry => SoundDesign {
            beds: smallvec![Bed::Noise {
                color: NoiseColor::Pink,
                filter: FilterKind::Lowpass,
                frequency: 400.0,
                q: 1.0,
                level: 1.0,
                lfo: Some(Lfo {
                    rate_hz: 0.2,
                    depth_hz: 100.0,
                }),
            }],
            triggers: smallvec![Trigger {
                event: OneShot::Thunder,
                period_sec: 2.5,
                probability: 0.2,
            }],
        },
        Emotion::Fear => SoundDesign {
            beds: smallvec![Bed::Drone {
                frequencies: [50.0, 55.0],
                level: 0.4,
            }],
            triggers: smallvec![Trigger {
                event: OneShot::Heartbeat,
                period_sec: 1.0,
                probability: 1.0,
            }],
        },
        Emotion::Calm | Emotion::Neutral | Emotion::Surprised => SoundDesign {
            beds: smallvec![Bed::Noise {
                color: NoiseColor::Pink,
                filter: FilterKind::Lowpass,
                frequency: 600.0,
                q: 0.5,
                level: 0.3,
                lfo: None,
            }],
            triggers: SmallVec::new(),
        },
    }
}

/// Nodes created so far for one build. On failure everything collected is
/// disconnected before the error is returned.
pub(crate) struct Collector<N> {
    pub nodes: Vec<N>,
}

impl<N: Clone> Collector<N> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn keep(&mut self, node: N) -> N {
        self.nodes.push(node.clone());
        node
    }

    pub fn abandon<B: AudioBackend<Node = N>>(self, backend: &mut B) {
        for n in &self.nodes {
            backend.disconnect(n);
        }
    }
}

/// Build the continuous beds of a design into `out`.
pub(crate) fn build_beds<B: AudioBackend>(
    backend: &mut B,
    design: &SoundDesign,
    out: &B::Node,
    nodes: &mut Collector<B::Node>,
) -> Result<(), AudioError> {
    let now = backend.now();
    for bed in &design.beds {
        match *bed {
            Bed::Noise {
                color,
                filter,
                frequency,
                q,
                level,
                lfo,
            } => {
                let src = nodes.keep(backend.noise(color, true)?);
                let f = nodes.keep(backend.filter(filter, frequency, q)?);
                let vol = nodes.keep(backend.gain(level)?);
                backend.connect(&src, &f)?;
                backend.connect(&f, &vol)?;
                backend.connect(&vol, out)?;
                if let Some(lfo) = lfo {
                    let osc = nodes.keep(backend.oscillator(Wave::Sine, lfo.rate_hz)?);
                    let depth = nodes.keep(backend.gain(lfo.depth_hz)?);
                    backend.connect(&osc, &depth)?;
                    backend.connect_param(&depth, &f, Param::Frequency)?;
                    backend.start(&osc, now);
                }
                backend.start(&src, now);
            }
            Bed::Drone { frequencies, level } => {
                let vol = nodes.keep(backend.gain(level)?);
                for hz in frequencies {
                    let osc = nodes.keep(backend.oscillator(Wave::Sine, hz)?);
                    backend.connect(&osc, &vol)?;
                    backend.start(&osc, now);
                }
                backend.connect(&vol, out)?;
            }
        }
    }
    Ok(())
}

/// A fired one-shot: its nodes and the time after which they are silent.
pub(crate) struct Transient<N> {
    pub until: f64,
    pub nodes: SmallVec<[N; 4]>,
}

pub(crate) fn fire<B: AudioBackend>(
    backend: &mut B,
    event: OneShot,
    out: &B::Node,
    rng: &mut StdRng,
) -> Result<Transient<B::Node>, AudioError> {
    let now = backend.now();
    let mut nodes = Collector::new();
    let result = match event {
        OneShot::Chirp => chirp(backend, out, now, rng, &mut nodes),
        OneShot::Thunder => thunder(backend, out, now, &mut nodes),
        OneShot::Heartbeat => heartbeat(backend, out, now, &mut nodes),
    };
    finish(backend, nodes, result)
}

fn finish<B: AudioBackend>(
    backend: &mut B,
    nodes: Collector<B::Node>,
    result: Result<f64, AudioError>,
) -> Result<Transient<B::Node>, AudioError> {
    match result {
        Ok(until) => Ok(Transient {
            until,
            nodes: nodes.nodes.into_iter().collect(),
        }),
        Err(e) => {
            nodes.abandon(backend);
            Err(e)
        }
    }
}

fn chirp<B: AudioBackend>(
    backend: &mut B,
    out: &B::Node,
    now: f64,
    rng: &mut StdRng,
    nodes: &mut Collector<B::Node>,
) -> Result<f64, AudioError> {
    let hz = 2000.0 + rng.gen::<f32>() * 1500.0;
    let pan = rng.gen::<f32>() * 2.0 - 1.0;
    let osc = nodes.keep(backend.oscillator(Wave::Sine, hz)?);
    let g = nodes.keep(backend.gain(0.0)?);
    let p = nodes.keep(backend.panner(pan)?);
    backend.automate(&osc, Param::Frequency, Automation::Anchor { value: hz, at: now });
    backend.automate(
        &osc,
        Param::Frequency,
        Automation::Exponential {
            value: hz + 500.0,
            end: now + 0.1,
        },
    );
    envelope(backend, &g, now, 0.05, 0.3, 0.2);
    backend.connect(&osc, &g)?;
    backend.connect(&g, &p)?;
    backend.connect(&p, out)?;
    backend.start(&osc, now);
    backend.stop(&osc, now + 0.3);
    Ok(now + 0.3)
}

fn thunder<B: AudioBackend>(
    backend: &mut B,
    out: &B::Node,
    now: f64,
    nodes: &mut Collector<B::Node>,
) -> Result<f64, AudioError> {
    let src = nodes.keep(backend.noise(NoiseColor::Pink, false)?);
    let f = nodes.keep(backend.filter(FilterKind::Lowpass, 120.0, 1.0)?);
    let g = nodes.keep(backend.gain(0.0)?);
    envelope(backend, &g, now, 0.1, 0.7, 3.0);
    backend.connect(&src, &f)?;
    backend.connect(&f, &g)?;
    backend.connect(&g, out)?;
    backend.start(&src, now);
    backend.stop(&src, now + 3.5);
    Ok(now + 3.5)
}

fn heartbeat<B: AudioBackend>(
    backend: &mut B,
    out: &B::Node,
    now: f64,
    nodes: &mut Collector<B::Node>,
) -> Result<f64, AudioError> {
    let osc = nodes.keep(backend.oscillator(Wave::Sine, 40.0)?);
    let g = nodes.keep(backend.gain(0.0)?);
    envelope(backend, &g, now, 0.005, 0.8, 0.15);
    backend.connect(&osc, &g)?;
    backend.connect(&g, out)?;
    backend.start(&osc, now);
    backend.stop(&osc, now + 0.2);
    Ok(now + 0.2)
}

/// Short confirmation blip played after a user-gesture resume.
pub(crate) fn ping<B: AudioBackend>(backend: &mut B, out: &B::Node) -> Result<Transient<B::Node>, AudioError> {
    let now = backend.now();
    let mut nodes = Collector::new();
    let result = blip(backend, out, now, &mut nodes);
    finish(backend, nodes, result)
}

fn blip<B: AudioBackend>(
    backend: &mut B,
    out: &B::Node,
    now: f64,
    nodes: &mut Collector<B::Node>,
) -> Result<f64, AudioError> {
    let osc = nodes.keep(backend.oscillator(Wave::Sine, 440.0)?);
    let g = nodes.keep(backend.gain(0.0)?);
    envelope(backend, &g, now, 0.005, 0.2, 0.2);
    backend.connect(&osc, &g)?;
    backend.connect(&g, out)?;
    backend.start(&osc, now);
    backend.stop(&osc, now + 0.3);
    Ok(now + 0.3)
}

/// Attack from silence to `peak`, then exponential decay to the floor.
fn envelope<B: AudioBackend>(backend: &mut B, gain: &B::Node, now: f64, attack: f64, peak: f32, decay_end: f64) {
    backend.automate(gain, Param::Gain, Automation::Anchor { value: 0.0, at: now });
    backend.automate(
        gain,
        Param::Gain,
        Automation::Linear {
            value: peak,
            end: now + attack,
        },
    );
    backend.automate(
        gain,
        Param::Gain,
        Automation::Exponential {
            value: SILENT_FLOOR,
            end: now + decay_end,
        },
    );
}
