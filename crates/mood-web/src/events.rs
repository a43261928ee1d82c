use crate::app::App;
use crate::constants::{AUDIO_BLOCKED_ID, CAMERA_BUTTON_ID, GUIDE_BUTTON_ID, MUTE_BUTTON_ID};
use crate::dom::{self, Listener};
use crate::keys::{action_for_key, is_text_target, KeyAction};
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// `true` for events aimed at a form field, where shortcuts must not fire.
fn targets_text_field(ev: &web::Event) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .is_some_and(|el| is_text_target(&el.tag_name()))
}

fn handle_key(app: &Rc<App>, ev: &web::KeyboardEvent) {
    if ev.ctrl_key() || ev.meta_key() || ev.alt_key() || ev.repeat() {
        return;
    }
    let Some(action) = action_for_key(&ev.key()) else {
        return;
    };
    // Any key press is a user gesture; use it to unblock audio too.
    app.resume_audio();
    match action {
        KeyAction::Emotion(e) => app.set_emotion(e, "keyboard"),
        KeyAction::ToggleMute => app.toggle_mute(),
        KeyAction::ToggleGuide => app.toggle_guide(),
        KeyAction::ToggleCamera => app.toggle_camera(),
    }
}

fn on_click(
    document: &web::Document,
    id: &str,
    app: &Weak<App>,
    action: fn(&Rc<App>),
) -> Option<Listener> {
    let app = app.clone();
    dom::add_click_listener(document, id, move || {
        if let Some(app) = app.upgrade() {
            action(&app);
        }
    })
}

/// Wire keyboard, buttons, resize and page teardown. Listeners detach when
/// the returned guards are dropped.
pub fn wire(app: &Rc<App>) -> Vec<Listener> {
    let mut listeners = Vec::new();
    let Some(window) = web::window() else {
        return listeners;
    };
    let Some(document) = window.document() else {
        return listeners;
    };
    let weak = Rc::downgrade(app);

    let keydown = {
        let weak = weak.clone();
        Listener::new(&document, "keydown", move |ev: web::Event| {
            if targets_text_field(&ev) {
                return;
            }
            let (Some(app), Some(kev)) = (weak.upgrade(), ev.dyn_ref::<web::KeyboardEvent>()) else {
                return;
            };
            handle_key(&app, kev);
        })
    };
    listeners.extend(keydown);

    listeners.extend(on_click(&document, MUTE_BUTTON_ID, &weak, |app| {
        app.resume_audio();
        app.toggle_mute();
    }));
    listeners.extend(on_click(&document, GUIDE_BUTTON_ID, &weak, |app| {
        app.resume_audio();
        app.toggle_guide();
    }));
    listeners.extend(on_click(&document, CAMERA_BUTTON_ID, &weak, |app| {
        app.toggle_camera();
    }));
    listeners.extend(on_click(&document, AUDIO_BLOCKED_ID, &weak, |app| {
        app.resume_audio();
    }));

    let resize = {
        let weak = weak.clone();
        Listener::new(&window, "resize", move |_| {
            if let Some(app) = weak.upgrade() {
                app.on_resize();
            }
        })
    };
    listeners.extend(resize);

    // Closing from inside the listener would drop the listener itself.
    let pagehide = Listener::new(&window, "pagehide", move |_| {
        let weak = weak.clone();
        spawn_local(async move {
            if let Some(app) = weak.upgrade() {
                app.close();
            }
        });
    });
    listeners.extend(pagehide);

    log::debug!("[events] {} listeners attached", listeners.len());
    listeners
}
