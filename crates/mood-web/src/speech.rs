use crate::constants::{PLAIN_LANG_PREFIX, RECITATION_LANG_PREFIX, RECOGNITION_LANG};
use crate::dom;
use js_sys::{Array, Function, Reflect};
use mood_core::guide::{Segment, SpeechPlan, VoiceHint};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

#[derive(Clone, Debug, PartialEq)]
pub enum RecognitionEvent {
    /// Whole transcript so far, interim results included.
    Transcript(String),
    Ended,
    Denied,
    Failed(String),
}

fn get(target: &JsValue, key: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn call(target: &JsValue, method: &str) -> Result<(), JsValue> {
    let f: Function = get(target, method).dyn_into()?;
    f.call0(target).map(|_| ())
}

fn transcript_of(event: &JsValue) -> String {
    let results = get(event, "results");
    let len = get(&results, "length").as_f64().unwrap_or(0.0) as u32;
    let mut out = String::new();
    for i in 0..len {
        let result = Reflect::get_u32(&results, i).unwrap_or(JsValue::UNDEFINED);
        let best = Reflect::get_u32(&result, 0).unwrap_or(JsValue::UNDEFINED);
        if let Some(text) = get(&best, "transcript").as_string() {
            out.push_str(&text);
        }
    }
    out
}

/// Continuous speech recognition (`SpeechRecognition` or the webkit
/// prefixed constructor).
pub struct Recognizer {
    rec: JsValue,
    _handlers: [Closure<dyn FnMut(JsValue)>; 3],
}

impl Recognizer {
    /// `None` when the browser has no recognition support.
    pub fn new(handler: Rc<dyn Fn(RecognitionEvent)>) -> Option<Self> {
        let window: JsValue = web::window()?.into();
        let ctor = ["SpeechRecognition", "webkitSpeechRecognition"]
            .iter()
            .map(|name| get(&window, name))
            .find_map(|v| v.dyn_into::<Function>().ok())?;
        let rec = Reflect::construct(&ctor, &Array::new())
            .map_err(|e| log::warn!("[speech] recognizer construction failed: {:?}", e))
            .ok()?;
        let _ = Reflect::set(&rec, &"continuous".into(), &JsValue::TRUE);
        let _ = Reflect::set(&rec, &"interimResults".into(), &JsValue::TRUE);
        let _ = Reflect::set(&rec, &"lang".into(), &RECOGNITION_LANG.into());

        let on_result = {
            let handler = handler.clone();
            Closure::wrap(Box::new(move |ev: JsValue| {
                handler(RecognitionEvent::Transcript(transcript_of(&ev)));
            }) as Box<dyn FnMut(JsValue)>)
        };
        let on_end = {
            let handler = handler.clone();
            Closure::wrap(Box::new(move |_: JsValue| {
                handler(RecognitionEvent::Ended);
            }) as Box<dyn FnMut(JsValue)>)
        };
        let on_error = Closure::wrap(Box::new(move |ev: JsValue| {
            let code = get(&ev, "error").as_string().unwrap_or_default();
            match code.as_str() {
                "not-allowed" | "service-not-allowed" => handler(RecognitionEvent::Denied),
                // Routine; `end` follows and restarts listening.
                "no-speech" | "aborted" => log::debug!("[speech] recognition {code}"),
                _ => handler(RecognitionEvent::Failed(code)),
            }
        }) as Box<dyn FnMut(JsValue)>);

        let _ = Reflect::set(&rec, &"onresult".into(), on_result.as_ref());
        let _ = Reflect::set(&rec, &"onend".into(), on_end.as_ref());
        let _ = Reflect::set(&rec, &"onerror".into(), on_error.as_ref());

        Some(Self {
            rec,
            _handlers: [on_result, on_end, on_error],
        })
    }

    pub fn start(&self) {
        // Throws when already started; that is harmless.
        if let Err(e) = call(&self.rec, "start") {
            log::debug!("[speech] start ignored: {:?}", e);
        }
    }

    pub fn stop(&self) {
        let _ = call(&self.rec, "stop");
    }

    pub fn abort(&self) {
        for key in ["onresult", "onend", "onerror"] {
            let _ = Reflect::set(&self.rec, &key.into(), &JsValue::NULL);
        }
        let _ = call(&self.rec, "abort");
    }
}

/// Sequential text-to-speech. `cancel` invalidates everything in flight, so
/// a cancelled plan never reports completion.
pub struct Speaker {
    synth: web::SpeechSynthesis,
    generation: Rc<Cell<u64>>,
}

fn pick_voice(synth: &web::SpeechSynthesis, hint: VoiceHint) -> Option<web::SpeechSynthesisVoice> {
    let prefix = match hint {
        VoiceHint::Recitation => RECITATION_LANG_PREFIX,
        VoiceHint::Plain => PLAIN_LANG_PREFIX,
    };
    synth
        .get_voices()
        .iter()
        .filter_map(|v| v.dyn_into::<web::SpeechSynthesisVoice>().ok())
        .find(|v| v.lang().starts_with(prefix))
}

async fn speak_segment(synth: &web::SpeechSynthesis, segment: &Segment) {
    let utterance = match web::SpeechSynthesisUtterance::new_with_text(&segment.text) {
        Ok(u) => u,
        Err(e) => {
            log::warn!("[speech] utterance error: {:?}", e);
            return;
        }
    };
    utterance.set_rate(segment.rate);
    utterance.set_pitch(segment.pitch);
    if let Some(voice) = pick_voice(synth, segment.voice) {
        utterance.set_lang(&voice.lang());
        utterance.set_voice(Some(&voice));
    }

    let mut resolve_slot: Option<Function> = None;
    let finished = js_sys::Promise::new(&mut |resolve, _reject| {
        resolve_slot = Some(resolve);
    });
    let Some(resolve) = resolve_slot else {
        return;
    };
    let done = Closure::wrap(Box::new(move |_: web::Event| {
        let _ = resolve.call0(&JsValue::NULL);
    }) as Box<dyn FnMut(web::Event)>);
    utterance.set_onend(Some(done.as_ref().unchecked_ref()));
    utterance.set_onerror(Some(done.as_ref().unchecked_ref()));
    synth.speak(&utterance);
    let _ = JsFuture::from(finished).await;
    utterance.set_onend(None);
    utterance.set_onerror(None);
}

impl Speaker {
    pub fn new() -> Option<Self> {
        let synth = web::window()?.speech_synthesis().ok()?;
        Some(Self {
            synth,
            generation: Rc::new(Cell::new(0)),
        })
    }

    pub fn cancel(&self) {
        self.generation.set(self.generation.get() + 1);
        self.synth.cancel();
    }

    /// Speak every segment in order with its pause, then call `on_done`.
    pub fn speak(&self, plan: SpeechPlan, on_done: impl FnOnce() + 'static) {
        let synth = self.synth.clone();
        let generation = self.generation.clone();
        let mine = generation.get();
        spawn_local(async move {
            for segment in plan.segments.iter() {
                if generation.get() != mine {
                    return;
                }
                speak_segment(&synth, segment).await;
                if segment.pause_after_ms > 0 && generation.get() == mine {
                    dom::sleep_ms(segment.pause_after_ms.min(i32::MAX as u64) as i32).await;
                }
            }
            if generation.get() == mine {
                on_done();
            }
        });
    }
}
