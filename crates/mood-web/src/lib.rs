#![cfg(target_arch = "wasm32")]
//! Browser front end: DOM parallax layers, a particle canvas, CSS
//! post-processing and a WebAudio soundscape, all driven by `mood-core`.

mod app;
mod audio;
mod bridge;
mod camera;
mod config;
mod constants;
mod dom;
mod events;
mod frame;
mod keys;
mod overlay;
mod remote;
mod render;
mod speech;

use app::App;
use mood_core::Emotion;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

fn with_app(f: impl FnOnce(&Rc<App>)) {
    // Clone out first so the callback may re-enter the exports.
    let app = APP.with(|slot| slot.borrow().clone());
    match app {
        Some(app) => f(&app),
        None => log::warn!("[web] not started yet"),
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    console_error_panic_hook::set_once();
    let document = dom::window_document().ok_or_else(|| JsValue::from_str("no document"))?;
    let (cfg, warning) = config::load(&document);
    console_log::init_with_level(cfg.log_level()).ok();
    log::info!("mood-web starting");
    if let Some(w) = warning {
        log::warn!("[config] {w}");
    }

    match App::start(document, cfg) {
        Ok(app) => APP.with(|slot| *slot.borrow_mut() = Some(app)),
        Err(e) => {
            log::error!("init error: {:?}", e);
            return Err(JsValue::from_str(&e.to_string()));
        }
    }
    Ok(())
}

/// Switch the scene to an emotion by label (`"HAPPY"`, `"sad"`, ...).
#[wasm_bindgen]
pub fn set_emotion(label: &str) -> Result<(), JsValue> {
    let emotion = Emotion::from_label(label)
        .ok_or_else(|| JsValue::from_str(&format!("unknown emotion {label:?}")))?;
    with_app(|app| app.set_emotion(emotion, "script"));
    Ok(())
}

/// Current emotion label, or `NEUTRAL` before start.
#[wasm_bindgen]
pub fn current_emotion() -> String {
    APP.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(Emotion::Neutral, |app| app.emotion())
            .label()
            .to_string()
    })
}

/// Classify free text and apply the result.
#[wasm_bindgen]
pub fn submit_text(text: String) {
    with_app(|app| app.submit_text(text));
}

#[wasm_bindgen]
pub fn toggle_mute() {
    with_app(|app| app.toggle_mute());
}

#[wasm_bindgen]
pub fn resume_audio() {
    with_app(|app| app.resume_audio());
}

#[wasm_bindgen]
pub fn toggle_guide() {
    with_app(|app| app.toggle_guide());
}

#[wasm_bindgen]
pub fn toggle_camera() {
    with_app(|app| app.toggle_camera());
}

/// Latest camera reading as JSON `{ "emotion": .., "inner_state": .. }`,
/// or `null` while the camera is off.
#[wasm_bindgen]
pub fn camera_state() -> JsValue {
    let mut out = JsValue::NULL;
    with_app(|app| {
        if let Some(state) = app.camera_state() {
            let json = serde_json::json!({
                "emotion": state.emotion.label(),
                "inner_state": state.inner_state,
            });
            out = JsValue::from_str(&json.to_string());
        }
    });
    out
}

/// Tear everything down. Further calls are no-ops.
#[wasm_bindgen]
pub fn shutdown() {
    if let Some(app) = APP.with(|slot| slot.borrow_mut().take()) {
        app.close();
    }
}
