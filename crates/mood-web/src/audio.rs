use mood_core::audio::{
    AudioBackend, AudioError, Automation, ContextState, FilterKind, NoiseBank, NoiseColor, Param,
    Wave,
};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Graph node handle; cheap to clone (JS reference).
#[derive(Clone)]
pub enum WebNode {
    Gain(web::GainNode),
    Filter(web::BiquadFilterNode),
    Source(web::AudioBufferSourceNode),
    Osc(web::OscillatorNode),
    Panner(web::StereoPannerNode),
}

impl WebNode {
    fn node(&self) -> &web::AudioNode {
        match self {
            WebNode::Gain(n) => n,
            WebNode::Filter(n) => n,
            WebNode::Source(n) => n,
            WebNode::Osc(n) => n,
            WebNode::Panner(n) => n,
        }
    }

    fn param(&self, param: Param) -> Option<web::AudioParam> {
        match (self, param) {
            (WebNode::Gain(n), Param::Gain) => Some(n.gain()),
            (WebNode::Filter(n), Param::Frequency) => Some(n.frequency()),
            (WebNode::Osc(n), Param::Frequency) => Some(n.frequency()),
            _ => None,
        }
    }
}

/// WebAudio implementation of the soundscape backend.
pub struct WebAudio {
    ctx: web::AudioContext,
    white: Option<web::AudioBuffer>,
    pink: Option<web::AudioBuffer>,
    closed: bool,
}

impl WebAudio {
    pub fn new() -> anyhow::Result<Self> {
        let ctx = web::AudioContext::new().map_err(|e| {
            log::error!("AudioContext error: {:?}", e);
            anyhow::anyhow!("AudioContext unavailable")
        })?;
        Ok(Self {
            ctx,
            white: None,
            pink: None,
            closed: false,
        })
    }
}

fn created<T>(result: Result<T, wasm_bindgen::JsValue>, label: &'static str) -> Result<T, AudioError> {
    result.map_err(|e| {
        log::error!("{} node error: {:?}", label, e);
        AudioError::Create(label)
    })
}

impl AudioBackend for WebAudio {
    type Node = WebNode;

    fn now(&self) -> f64 {
        self.ctx.current_time()
    }

    fn sample_rate(&self) -> f32 {
        self.ctx.sample_rate()
    }

    fn state(&self) -> ContextState {
        if self.closed {
            return ContextState::Closed;
        }
        match self.ctx.state() {
            web::AudioContextState::Running => ContextState::Running,
            web::AudioContextState::Suspended => ContextState::Suspended,
            _ => ContextState::Closed,
        }
    }

    fn gain(&mut self, level: f32) -> Result<WebNode, AudioError> {
        let g = created(web::GainNode::new(&self.ctx), "gain")?;
        g.gain().set_value(level);
        Ok(WebNode::Gain(g))
    }

    fn filter(&mut self, kind: FilterKind, frequency: f32, q: f32) -> Result<WebNode, AudioError> {
        let f = created(web::BiquadFilterNode::new(&self.ctx), "filter")?;
        f.set_type(match kind {
            FilterKind::Lowpass => web::BiquadFilterType::Lowpass,
            FilterKind::Highpass => web::BiquadFilterType::Highpass,
        });
        f.frequency().set_value(frequency);
        f.q().set_value(q);
        Ok(WebNode::Filter(f))
    }

    fn noise(&mut self, color: NoiseColor, looped: bool) -> Result<WebNode, AudioError> {
        let buffer = match color {
            NoiseColor::White => self.white.as_ref(),
            NoiseColor::Pink => self.pink.as_ref(),
        }
        .ok_or(AudioError::Create("noise"))?;
        let src = created(web::AudioBufferSourceNode::new(&self.ctx), "noise")?;
        src.set_buffer(Some(buffer));
        src.set_loop(looped);
        Ok(WebNode::Source(src))
    }

    fn oscillator(&mut self, wave: Wave, frequency: f32) -> Result<WebNode, AudioError> {
        let osc = created(web::OscillatorNode::new(&self.ctx), "oscillator")?;
        osc.set_type(match wave {
            Wave::Sine => web::OscillatorType::Sine,
        });
        osc.frequency().set_value(frequency);
        Ok(WebNode::Osc(osc))
    }

    fn panner(&mut self, pan: f32) -> Result<WebNode, AudioError> {
        let p = created(web::StereoPannerNode::new(&self.ctx), "panner")?;
        p.pan().set_value(pan);
        Ok(WebNode::Panner(p))
    }

    fn connect(&mut self, from: &WebNode, to: &WebNode) -> Result<(), AudioError> {
        from.node()
            .connect_with_audio_node(to.node())
            .map(|_| ())
            .map_err(|_| AudioError::Connect("node"))
    }

    fn connect_param(&mut self, from: &WebNode, to: &WebNode, param: Param) -> Result<(), AudioError> {
        let target = to.param(param).ok_or(AudioError::Connect("param"))?;
        from.node()
            .connect_with_audio_param(&target)
            .map_err(|_| AudioError::Connect("param"))
    }

    fn connect_output(&mut self, from: &WebNode) -> Result<(), AudioError> {
        from.node()
            .connect_with_audio_node(&self.ctx.destination())
            .map(|_| ())
            .map_err(|_| AudioError::Connect("destination"))
    }

    fn disconnect(&mut self, node: &WebNode) {
        match node {
            WebNode::Source(s) => {
                let _ = s.stop();
            }
            WebNode::Osc(o) => {
                let _ = o.stop();
            }
            _ => {}
        }
        let _ = node.node().disconnect();
    }

    fn automate(&mut self, node: &WebNode, param: Param, change: Automation) {
        let Some(p) = node.param(param) else {
            log::warn!("[audio] {:?} is not automatable on this node", param);
            return;
        };
        let result = match change {
            Automation::Anchor { value, at } => p.set_value_at_time(value, at).map(|_| ()),
            Automation::Linear { value, end } => {
                p.linear_ramp_to_value_at_time(value, end).map(|_| ())
            }
            Automation::Exponential { value, end } => {
                p.exponential_ramp_to_value_at_time(value, end).map(|_| ())
            }
            Automation::Approach { target, start, tau } => {
                p.set_target_at_time(target, start, tau).map(|_| ())
            }
            Automation::CancelFrom { at } => p.cancel_scheduled_values(at).map(|_| ()),
        };
        if let Err(e) = result {
            log::warn!("[audio] automation {:?} rejected: {:?}", change, e);
        }
    }

    fn start(&mut self, node: &WebNode, at: f64) {
        let _ = match node {
            WebNode::Source(s) => s.start_with_when(at),
            WebNode::Osc(o) => o.start_with_when(at),
            _ => Ok(()),
        };
    }

    fn stop(&mut self, node: &WebNode, at: f64) {
        let _ = match node {
            WebNode::Source(s) => s.stop_with_when(at),
            WebNode::Osc(o) => o.stop_with_when(at),
            _ => Ok(()),
        };
    }

    fn install_noise(&mut self, bank: &NoiseBank) -> Result<(), AudioError> {
        let sr = self.ctx.sample_rate();
        let build = |color: NoiseColor| -> Result<web::AudioBuffer, AudioError> {
            let mut samples = bank.samples(color).to_vec();
            let buffer = created(self.ctx.create_buffer(1, samples.len() as u32, sr), "noise buffer")?;
            buffer
                .copy_to_channel(&mut samples, 0)
                .map_err(|_| AudioError::Create("noise buffer"))?;
            Ok(buffer)
        };
        let white = build(NoiseColor::White)?;
        let pink = build(NoiseColor::Pink)?;
        self.white = Some(white);
        self.pink = Some(pink);
        Ok(())
    }

    fn resume(&mut self) {
        match self.ctx.resume() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("[audio] resume rejected: {:?}", e);
                }
            }),
            Err(e) => log::warn!("[audio] resume failed: {:?}", e),
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.white = None;
        self.pink = None;
        if let Ok(promise) = self.ctx.close() {
            spawn_local(async move {
                let _ = JsFuture::from(promise).await;
            });
        }
    }
}
