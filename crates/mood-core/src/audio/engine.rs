//! The soundscape: one persistent output chain plus at most one live
//! emotion voice.
//!
//! Switching emotion retires the active voice (fast fade, timers cleared,
//! nodes disconnected after a grace period) and builds the next one. A second
//! switch inside the grace period finalizes the retiring voice immediately,
//! so there is never more than one voice fading out.

use super::design::{build_beds, design_for, fire, ping, Collector, Transient, Trigger};
use super::{AudioBackend, AudioError, Automation, ContextState, NoiseBank, Param};
use crate::constants::*;
use crate::emotion::Emotion;
use rand::prelude::*;

struct Schedule {
    trigger: Trigger,
    next_due: f64,
}

struct Voice<N> {
    emotion: Emotion,
    gain: N,
    nodes: Vec<N>,
    schedules: Vec<Schedule>,
    transients: Vec<Transient<N>>,
}

struct Retiring<N> {
    voice: Voice<N>,
    disconnect_at: f64,
}

pub struct Soundscape<B: AudioBackend> {
    backend: B,
    master: B::Node,
    panner: B::Node,
    muted: bool,
    active: Option<Voice<B::Node>>,
    retiring: Option<Retiring<B::Node>>,
    pings: Vec<Transient<B::Node>>,
    rng: StdRng,
    closed: bool,
}

impl<B: AudioBackend> Soundscape<B> {
    /// Build the fixed master → panner → output chain and install the shared
    /// noise buffers.
    pub fn new(mut backend: B, muted: bool, seed: u64) -> Result<Self, AudioError> {
        let bank = NoiseBank::generate(backend.sample_rate(), seed);
        backend.install_noise(&bank)?;
        let master = backend.gain(if muted { 0.0 } else { MASTER_LEVEL })?;
        let panner = backend.panner(0.0)?;
        backend.connect(&master, &panner)?;
        backend.connect_output(&panner)?;
        log::info!("[audio] engine initialized (state {:?})", backend.state());
        Ok(Self {
            backend,
            master,
            panner,
            muted,
            active: None,
            retiring: None,
            pings: Vec::new(),
            rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
            closed: false,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn emotion(&self) -> Option<Emotion> {
        self.active.as_ref().map(|v| v.emotion)
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn state(&self) -> ContextState {
        if self.closed {
            ContextState::Closed
        } else {
            self.backend.state()
        }
    }

    /// The platform is holding audio back until a user gesture.
    pub fn is_blocked(&self) -> bool {
        self.state() == ContextState::Suspended && !self.muted
    }

    pub fn has_retiring_voice(&self) -> bool {
        self.retiring.is_some()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if self.closed {
            return;
        }
        let now = self.backend.now();
        let target = if muted { 0.0 } else { MASTER_LEVEL };
        self.backend
            .automate(&self.master, Param::Gain, Automation::CancelFrom { at: now });
        self.backend.automate(
            &self.master,
            Param::Gain,
            Automation::Approach {
                target,
                start: now,
                tau: MUTE_TAU_SEC,
            },
        );
    }

    /// Crossfade to `emotion`. Re-applying the current emotion does nothing.
    pub fn set_emotion(&mut self, emotion: Emotion) -> Result<(), AudioError> {
        if self.closed {
            return Err(AudioError::Closed);
        }
        if self.emotion() == Some(emotion) {
            return Ok(());
        }
        log::info!("[audio] switching to {emotion}");

        if let Some(old) = self.retiring.take() {
            self.finalize(old.voice);
        }
        if let Some(voice) = self.active.take() {
            self.retire(voice);
        }
        self.active = Some(self.build_voice(emotion)?);
        Ok(())
    }

    fn retire(&mut self, mut voice: Voice<B::Node>) {
        let now = self.backend.now();
        self.backend
            .automate(&voice.gain, Param::Gain, Automation::CancelFrom { at: now });
        self.backend.automate(
            &voice.gain,
            Param::Gain,
            Automation::Approach {
                target: 0.0,
                start: now,
                tau: EMOTION_FADE_OUT_TAU_SEC,
            },
        );
        voice.schedules.clear();
        self.retiring = Some(Retiring {
            voice,
            disconnect_at: now + TEARDOWN_GRACE_SEC,
        });
    }

    fn finalize(&mut self, voice: Voice<B::Node>) {
        for t in &voice.transients {
            for n in &t.nodes {
                self.backend.disconnect(n);
            }
        }
        for n in &voice.nodes {
            self.backend.disconnect(n);
        }
        self.backend.disconnect(&voice.gain);
        log::debug!("[audio] released {} voice", voice.emotion);
    }

    fn build_voice(&mut self, emotion: Emotion) -> Result<Voice<B::Node>, AudioError> {
        let now = self.backend.now();
        let gain = self.backend.gain(0.0)?;
        let design = design_for(emotion);
        let mut nodes = Collector::new();
        let wired = self
            .backend
            .connect(&gain, &self.master)
            .and_then(|()| build_beds(&mut self.backend, &design, &gain, &mut nodes));
        if let Err(e) = wired {
            nodes.abandon(&mut self.backend);
            self.backend.disconnect(&gain);
            log::error!("[audio] failed to build {emotion} voice: {e}");
            return Err(e);
        }
        self.backend
            .automate(&gain, Param::Gain, Automation::Anchor { value: 0.0, at: now });
        self.backend.automate(
            &gain,
            Param::Gain,
            Automation::Linear {
                value: 1.0,
                end: now + EMOTION_FADE_IN_SEC,
            },
        );
        let schedules = design
            .triggers
            .iter()
            .map(|t| Schedule {
                trigger: *t,
                next_due: now + t.period_sec,
            })
            .collect();
        Ok(Voice {
            emotion,
            gain,
            nodes: nodes.nodes,
            schedules,
            transients: Vec::new(),
        })
    }

    /// Drive repeating one-shots and release expired nodes. Call often (every
    /// animation frame is fine); all timing comes from the audio clock.
    pub fn tick(&mut self) {
        if self.closed {
            return;
        }
        let now = self.backend.now();

        if self
            .retiring
            .as_ref()
            .is_some_and(|r| now >= r.disconnect_at)
        {
            if let Some(r) = self.retiring.take() {
                self.finalize(r.voice);
            }
        }

        let expired: Vec<_> = drain_expired(&mut self.pings, now);
        for n in expired {
            self.backend.disconnect(&n);
        }

        let Some(voice) = self.active.as_mut() else {
            return;
        };
        let mut released = drain_expired(&mut voice.transients, now);
        for s in &mut voice.schedules {
            if now < s.next_due {
                continue;
            }
            s.next_due += s.trigger.period_sec;
            if s.next_due <= now {
                // Fell behind (e.g. a throttled tab): resync instead of bursting.
                s.next_due = now + s.trigger.period_sec;
            }
            if self.rng.gen::<f32>() >= s.trigger.probability {
                continue;
            }
            match fire(&mut self.backend, s.trigger.event, &voice.gain, &mut self.rng) {
                Ok(t) => voice.transients.push(t),
                Err(e) => log::warn!("[audio] {:?} skipped: {e}", s.trigger.event),
            }
        }
        for n in released.drain(..) {
            self.backend.disconnect(&n);
        }
    }

    /// User-gesture resume of a suspended context; plays a short
    /// confirmation blip. Does nothing while the context is running.
    pub fn resume(&mut self) {
        if self.state() != ContextState::Suspended {
            return;
        }
        self.backend.resume();
        log::info!("[audio] resume requested");
        match ping(&mut self.backend, &self.master) {
            Ok(t) => self.pings.push(t),
            Err(e) => log::warn!("[audio] resume ping failed: {e}"),
        }
    }

    /// Stop everything and close the context. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        if let Some(r) = self.retiring.take() {
            self.finalize(r.voice);
        }
        if let Some(v) = self.active.take() {
            self.finalize(v);
        }
        for t in std::mem::take(&mut self.pings) {
            for n in &t.nodes {
                self.backend.disconnect(n);
            }
        }
        self.backend.disconnect(&self.master);
        self.backend.disconnect(&self.panner);
        self.backend.close();
        self.closed = true;
        log::info!("[audio] closed");
    }
}

fn drain_expired<N>(transients: &mut Vec<Transient<N>>, now: f64) -> Vec<N> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < transients.len() {
        if now >= transients[i].until {
            out.extend(transients.swap_remove(i).nodes);
        } else {
            i += 1;
        }
    }
    out
}
