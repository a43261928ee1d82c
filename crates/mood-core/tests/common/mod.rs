// Test doubles shared by the host-side integration tests.

#![allow(dead_code)]

use mood_core::audio::{
    AudioBackend, AudioError, Automation, ContextState, FilterKind, NoiseBank, NoiseColor, Param,
    Wave,
};
use mood_core::remote::{CompletionTransport, RemoteError};
use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum MockKind {
    Gain(f32),
    Filter(FilterKind, f32, f32),
    Noise(NoiseColor, bool),
    Oscillator(Wave, f32),
    Panner(f32),
}

/// Records every graph edit so tests can inspect what is still alive.
pub struct MockBackend {
    pub now: f64,
    pub state: ContextState,
    pub nodes: Vec<MockKind>,
    pub disconnected: HashSet<usize>,
    pub edges: Vec<(usize, usize)>,
    pub param_edges: Vec<(usize, usize, Param)>,
    pub outputs: Vec<usize>,
    pub automation: Vec<(usize, Param, Automation)>,
    pub started: Vec<(usize, f64)>,
    pub stopped: Vec<(usize, f64)>,
    pub noise_installs: usize,
    pub resumes: usize,
    pub closes: usize,
    /// Node creation fails once this many nodes exist.
    pub fail_at: Option<usize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            state: ContextState::Running,
            nodes: Vec::new(),
            disconnected: HashSet::new(),
            edges: Vec::new(),
            param_edges: Vec::new(),
            outputs: Vec::new(),
            automation: Vec::new(),
            started: Vec::new(),
            stopped: Vec::new(),
            noise_installs: 0,
            resumes: 0,
            closes: 0,
            fail_at: None,
        }
    }

    pub fn suspended() -> Self {
        Self {
            state: ContextState::Suspended,
            ..Self::new()
        }
    }

    fn create(&mut self, kind: MockKind, label: &'static str) -> Result<usize, AudioError> {
        if self.fail_at.is_some_and(|n| self.nodes.len() >= n) {
            return Err(AudioError::Create(label));
        }
        self.nodes.push(kind);
        Ok(self.nodes.len() - 1)
    }

    pub fn is_live(&self, id: usize) -> bool {
        id < self.nodes.len() && !self.disconnected.contains(&id)
    }

    /// Nodes feeding `target` that have not been disconnected.
    pub fn live_inputs(&self, target: usize) -> Vec<usize> {
        self.edges
            .iter()
            .filter(|(from, to)| *to == target && self.is_live(*from))
            .map(|(from, _)| *from)
            .collect()
    }

    pub fn automation_of(&self, id: usize, param: Param) -> Vec<Automation> {
        self.automation
            .iter()
            .filter(|(n, p, _)| *n == id && *p == param)
            .map(|(_, _, a)| *a)
            .collect()
    }

    pub fn oscillators_at(&self, hz: f32) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, k)| matches!(k, MockKind::Oscillator(_, f) if (*f - hz).abs() < 1e-3))
            .map(|(i, _)| i)
            .collect()
    }
}

impl AudioBackend for MockBackend {
    type Node = usize;

    fn now(&self) -> f64 {
        self.now
    }

    fn sample_rate(&self) -> f32 {
        // Small rate keeps noise generation cheap in tests.
        4000.0
    }

    fn state(&self) -> ContextState {
        self.state
    }

    fn gain(&mut self, level: f32) -> Result<usize, AudioError> {
        self.create(MockKind::Gain(level), "gain")
    }

    fn filter(&mut self, kind: FilterKind, frequency: f32, q: f32) -> Result<usize, AudioError> {
        self.create(MockKind::Filter(kind, frequency, q), "filter")
    }

    fn noise(&mut self, color: NoiseColor, looped: bool) -> Result<usize, AudioError> {
        if self.noise_installs == 0 {
            return Err(AudioError::Create("noise source"));
        }
        self.create(MockKind::Noise(color, looped), "noise source")
    }

    fn oscillator(&mut self, wave: Wave, frequency: f32) -> Result<usize, AudioError> {
        self.create(MockKind::Oscillator(wave, frequency), "oscillator")
    }

    fn panner(&mut self, pan: f32) -> Result<usize, AudioError> {
        self.create(MockKind::Panner(pan), "panner")
    }

    fn connect(&mut self, from: &usize, to: &usize) -> Result<(), AudioError> {
        self.edges.push((*from, *to));
        Ok(())
    }

    fn connect_param(&mut self, from: &usize, to: &usize, param: Param) -> Result<(), AudioError> {
        self.param_edges.push((*from, *to, param));
        Ok(())
    }

    fn connect_output(&mut self, from: &usize) -> Result<(), AudioError> {
        self.outputs.push(*from);
        Ok(())
    }

    fn disconnect(&mut self, node: &usize) {
        self.disconnected.insert(*node);
    }

    fn automate(&mut self, node: &usize, param: Param, change: Automation) {
        self.automation.push((*node, param, change));
    }

    fn start(&mut self, node: &usize, at: f64) {
        self.started.push((*node, at));
    }

    fn stop(&mut self, node: &usize, at: f64) {
        self.stopped.push((*node, at));
    }

    fn install_noise(&mut self, bank: &NoiseBank) -> Result<(), AudioError> {
        assert_eq!(bank.white.len(), 8000);
        self.noise_installs += 1;
        Ok(())
    }

    fn resume(&mut self) {
        self.resumes += 1;
        self.state = ContextState::Running;
    }

    fn close(&mut self) {
        self.closes += 1;
        self.state = ContextState::Closed;
    }
}

/// How a scripted completion call behaves.
pub enum Reply {
    Text(&'static str),
    Fail(&'static str),
    /// Never answers; only the timeout can end the race.
    Hang,
}

/// Completion transport that replays a script. `sleep` resolves at once, so
/// any `Hang` reply loses to the timeout.
pub struct ScriptedTransport {
    pub replies: RefCell<VecDeque<Reply>>,
    pub prompts: RefCell<Vec<String>>,
    pub sleeps: Cell<usize>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            prompts: RefCell::new(Vec::new()),
            sleeps: Cell::new(0),
        }
    }
}

impl CompletionTransport for ScriptedTransport {
    async fn complete(&self, prompt: &str) -> Result<String, RemoteError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        let next = self.replies.borrow_mut().pop_front();
        match next {
            Some(Reply::Text(t)) => Ok(t.to_string()),
            Some(Reply::Fail(msg)) => Err(RemoteError::Transport(msg.to_string())),
            Some(Reply::Hang) | None => std::future::pending().await,
        }
    }

    async fn sleep(&self, _duration: Duration) {
        self.sleeps.set(self.sleeps.get() + 1);
    }
}
