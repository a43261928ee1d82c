use crate::audio::WebAudio;
use crate::bridge::BridgeClient;
use crate::camera::{CameraCapture, CaptureSettings};
use crate::constants::*;
use crate::dom::{self, Listener};
use crate::events;
use crate::frame::FrameLoop;
use crate::overlay;
use crate::remote::FetchTransport;
use crate::render::SceneView;
use crate::speech::{RecognitionEvent, Recognizer, Speaker};
use instant::Instant;
use mood_core::audio::{ContextState, Soundscape};
use mood_core::bridge::{BridgeState, SubscriberId};
use mood_core::guide::{Commands, Guide, GuideCommand, GuidePhase};
use mood_core::remote::RemoteClassifier;
use mood_core::{Emotion, MoodConfig, Scene};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Everything the page runs, wired together. Callbacks hold `Weak<App>` so
/// dropping the last `Rc` (or calling `close`) tears the whole thing down.
pub struct App {
    document: web::Document,
    config: MoodConfig,
    started: Instant,
    scene: RefCell<Scene<WebAudio>>,
    view: RefCell<SceneView>,
    remote: Rc<RemoteClassifier<FetchTransport>>,
    guide: RefCell<Guide>,
    recognizer: RefCell<Option<Recognizer>>,
    speaker: Option<Speaker>,
    bridge: RefCell<Option<Rc<BridgeClient>>>,
    bridge_sub: Cell<Option<SubscriberId>>,
    camera: RefCell<Option<CameraCapture>>,
    camera_pending: Cell<bool>,
    frame: RefCell<Option<FrameLoop>>,
    listeners: RefCell<Vec<Listener>>,
    audio_blocked: Cell<Option<bool>>,
    audio_state: Cell<Option<ContextState>>,
    closed: Cell<bool>,
}

impl App {
    pub fn start(document: web::Document, config: MoodConfig) -> anyhow::Result<Rc<Self>> {
        let seed = rand::random::<u64>();
        let started = Instant::now();

        let audio = WebAudio::new()
            .and_then(|backend| Ok(Soundscape::new(backend, config.start_muted, seed)?));
        let audio = match audio {
            Ok(a) => Some(a),
            Err(e) => {
                log::warn!("[app] continuing without audio: {e}");
                None
            }
        };

        let mut view = SceneView::mount(&document, seed)?;
        let (w, h) = view.resize();
        let scene = Scene::new(w, h, audio, seed, 0.0);

        let remote = RemoteClassifier::configure(
            &config.classify_api_key,
            config.classify_timeout(),
            |cred| FetchTransport::new(&config.classify_endpoint, cred),
        );
        let guide = Guide::new(config.silence_debounce(), seed.rotate_left(17));
        let speaker = Speaker::new();
        if speaker.is_none() {
            log::warn!("[app] speech synthesis unavailable");
        }

        let app = Rc::new(Self {
            document,
            config,
            started,
            scene: RefCell::new(scene),
            view: RefCell::new(view),
            remote: Rc::new(remote),
            guide: RefCell::new(guide),
            recognizer: RefCell::new(None),
            speaker,
            bridge: RefCell::new(None),
            bridge_sub: Cell::new(None),
            camera: RefCell::new(None),
            camera_pending: Cell::new(false),
            frame: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            audio_blocked: Cell::new(None),
            audio_state: Cell::new(None),
            closed: Cell::new(false),
        });

        *app.listeners.borrow_mut() = events::wire(&app);
        let weak = Rc::downgrade(&app);
        *app.frame.borrow_mut() = Some(FrameLoop::start(move |t_ms| match weak.upgrade() {
            Some(app) => app.frame(t_ms),
            None => false,
        }));
        app.refresh_controls();
        log::info!(
            "[app] started ({} classifier)",
            if app.remote.is_remote() { "hosted" } else { "local" }
        );
        Ok(app)
    }

    fn now_sec(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn frame(self: &Rc<Self>, t_ms: f64) -> bool {
        if self.closed.get() {
            return false;
        }
        let now_sec = self.now_sec();
        {
            let mut scene = self.scene.borrow_mut();
            scene.frame(t_ms);
            self.view.borrow_mut().draw(&*scene, now_sec, t_ms);
        }

        let (state, blocked) = match self.scene.borrow().audio() {
            Some(a) => (Some(a.state()), a.is_blocked()),
            None => (None, false),
        };
        if self.audio_state.get() != state {
            if let Some(state) = state {
                log::info!("[audio] context {:?}", state);
            }
            self.audio_state.set(state);
        }
        if self.audio_blocked.get() != Some(blocked) {
            overlay::set_visible(&self.document, AUDIO_BLOCKED_ID, blocked);
            self.audio_blocked.set(Some(blocked));
        }

        let commands = self.guide.borrow_mut().tick(now_sec * 1000.0);
        if !commands.is_empty() {
            self.run(commands);
        }
        true
    }

    /// Apply an emotion from any source. Repeats are ignored by the scene.
    pub fn set_emotion(&self, emotion: Emotion, source: &str) {
        if self.closed.get() {
            return;
        }
        let now = self.now_sec();
        if self.scene.borrow_mut().set_emotion(emotion, now).is_some() {
            log::info!("[app] {emotion} via {source}");
        }
    }

    pub fn emotion(&self) -> Emotion {
        self.scene.borrow().emotion()
    }

    /// Classify free text (hosted when configured) and apply the result.
    pub fn submit_text(self: &Rc<Self>, text: String) {
        if self.closed.get() || text.trim().is_empty() {
            return;
        }
        let remote = self.remote.clone();
        let weak = Rc::downgrade(self);
        spawn_local(async move {
            let emotion = remote.classify(&text).await;
            if let Some(app) = weak.upgrade() {
                app.set_emotion(emotion, "text");
            }
        });
    }

    pub fn toggle_mute(&self) {
        if let Some(audio) = self.scene.borrow_mut().audio_mut() {
            let muted = !audio.is_muted();
            audio.set_muted(muted);
            log::info!("[app] audio {}", if muted { "muted" } else { "unmuted" });
        }
        self.refresh_controls();
    }

    /// Resume a context the browser suspended; must run inside a gesture.
    pub fn resume_audio(&self) {
        if let Some(audio) = self.scene.borrow_mut().audio_mut() {
            audio.resume();
        }
    }

    fn refresh_controls(&self) {
        let muted = self
            .scene
            .borrow()
            .audio()
            .map_or(true, |a| a.is_muted());
        dom::set_text(&self.document, MUTE_BUTTON_ID, if muted { "Unmute" } else { "Mute" });
        let phase = self.guide.borrow().phase();
        dom::set_text(
            &self.document,
            GUIDE_BUTTON_ID,
            if phase == GuidePhase::Idle { "Talk to the guide" } else { "End conversation" },
        );
        dom::set_text(&self.document, GUIDE_STATUS_ID, phase.label());
        dom::set_text(&self.document, GUIDE_CAPTION_ID, self.guide.borrow().transcript());
        let camera_on = self.camera.borrow().is_some();
        dom::set_text(
            &self.document,
            CAMERA_BUTTON_ID,
            if camera_on { "Stop camera" } else { "Use camera" },
        );
    }

    // ---- guidance loop ----

    pub fn toggle_guide(self: &Rc<Self>) {
        if self.closed.get() {
            return;
        }
        if self.guide.borrow().phase() != GuidePhase::Idle {
            let commands = self.guide.borrow_mut().close();
            self.run(commands);
            return;
        }
        if !self.ensure_recognizer() {
            overlay::notice(
                &self.document,
                GUIDE_NOTICE_ID,
                "Speech recognition is not supported in this browser.",
            );
            return;
        }
        overlay::clear_notice(&self.document, GUIDE_NOTICE_ID);
        let commands = self.guide.borrow_mut().activate();
        self.run(commands);
    }

    fn ensure_recognizer(self: &Rc<Self>) -> bool {
        if self.recognizer.borrow().is_some() {
            return true;
        }
        let weak = Rc::downgrade(self);
        let handler: Rc<dyn Fn(RecognitionEvent)> = Rc::new(move |event| {
            if let Some(app) = weak.upgrade() {
                app.on_recognition(event);
            }
        });
        match Recognizer::new(handler) {
            Some(r) => {
                *self.recognizer.borrow_mut() = Some(r);
                true
            }
            None => false,
        }
    }

    fn on_recognition(self: &Rc<Self>, event: RecognitionEvent) {
        let commands = match event {
            RecognitionEvent::Transcript(text) => {
                let now_ms = self.now_sec() * 1000.0;
                self.guide.borrow_mut().partial(&text, now_ms)
            }
            RecognitionEvent::Ended => self.guide.borrow_mut().recognition_ended(),
            RecognitionEvent::Denied => {
                overlay::notice(&self.document, GUIDE_NOTICE_ID, "Microphone access was denied.");
                self.guide.borrow_mut().recognition_denied()
            }
            RecognitionEvent::Failed(code) => {
                log::warn!("[speech] recognition error: {code}");
                Commands::new()
            }
        };
        self.run(commands);
    }

    /// Carry out guide commands. No guide borrow may be held by the caller.
    fn run(self: &Rc<Self>, commands: Commands) {
        for command in commands {
            match command {
                GuideCommand::StartRecognition => {
                    if let Some(r) = self.recognizer.borrow().as_ref() {
                        r.start();
                    }
                }
                GuideCommand::StopRecognition => {
                    if let Some(r) = self.recognizer.borrow().as_ref() {
                        r.stop();
                    }
                }
                GuideCommand::CancelSpeech => {
                    if let Some(s) = &self.speaker {
                        s.cancel();
                    }
                }
                GuideCommand::Speak(plan) => match &self.speaker {
                    Some(s) => {
                        let weak = Rc::downgrade(self);
                        s.speak(plan, move || {
                            if let Some(app) = weak.upgrade() {
                                let next = app.guide.borrow_mut().speech_finished();
                                app.run(next);
                            }
                        });
                    }
                    None => {
                        let next = self.guide.borrow_mut().speech_finished();
                        self.run(next);
                    }
                },
                GuideCommand::Classify(text) => {
                    let remote = self.remote.clone();
                    let weak = Rc::downgrade(self);
                    spawn_local(async move {
                        let emotion = remote.classify(&text).await;
                        if let Some(app) = weak.upgrade() {
                            let next = app
                                .guide
                                .borrow_mut()
                                .processed::<anyhow::Error>(Ok(emotion));
                            app.run(next);
                        }
                    });
                }
                GuideCommand::EmotionDetected(emotion) => self.set_emotion(emotion, "guide"),
            }
        }
        self.refresh_controls();
    }

    // ---- camera ----

    pub fn toggle_camera(self: &Rc<Self>) {
        if self.closed.get() || self.camera_pending.get() {
            return;
        }
        if self.camera.borrow().is_some() {
            self.stop_camera();
            return;
        }
        let Some(video) = dom::element::<web::HtmlVideoElement>(&self.document, CAMERA_PREVIEW_ID)
        else {
            overlay::notice(&self.document, CAMERA_STATUS_ID, "No camera preview element.");
            return;
        };
        let bridge = self.ensure_bridge();
        let settings = CaptureSettings {
            interval_ms: self.config.capture_interval_ms.min(i32::MAX as u64) as i32,
            width: self.config.capture_width,
            jpeg_quality: self.config.capture_jpeg_quality,
        };
        self.camera_pending.set(true);
        let document = self.document.clone();
        let weak = Rc::downgrade(self);
        spawn_local(async move {
            let result = CameraCapture::start(&document, video, bridge, settings).await;
            let Some(app) = weak.upgrade() else {
                return;
            };
            app.camera_pending.set(false);
            match result {
                Ok(capture) if !app.closed.get() => {
                    *app.camera.borrow_mut() = Some(capture);
                    overlay::clear_notice(&app.document, CAMERA_STATUS_ID);
                    overlay::show(&app.document, CAMERA_PREVIEW_ID);
                }
                Ok(mut capture) => capture.stop(),
                Err(e) => {
                    log::warn!("[camera] unavailable: {e}");
                    overlay::notice(
                        &app.document,
                        CAMERA_STATUS_ID,
                        "Camera unavailable; the scene still follows your voice and keys.",
                    );
                    app.close_bridge();
                }
            }
            app.refresh_controls();
        });
    }

    fn stop_camera(&self) {
        if let Some(mut capture) = self.camera.borrow_mut().take() {
            capture.stop();
        }
        overlay::hide(&self.document, CAMERA_PREVIEW_ID);
        self.close_bridge();
        self.refresh_controls();
    }

    fn ensure_bridge(self: &Rc<Self>) -> Rc<BridgeClient> {
        if let Some(b) = self.bridge.borrow().as_ref() {
            return b.clone();
        }
        let bridge = Rc::new(BridgeClient::connect(
            &self.config.bridge_url,
            self.config.bridge_reconnect_ms,
        ));
        let weak = Rc::downgrade(self);
        // The first call is the cached replay; only react to changes after it.
        let mut seen: Option<Emotion> = None;
        let id = bridge.subscribe(move |state: BridgeState| {
            let previous = seen.replace(state.emotion);
            if previous.is_none() || previous == Some(state.emotion) {
                return;
            }
            if let Some(app) = weak.upgrade() {
                app.set_emotion(state.emotion, "camera");
            }
        });
        self.bridge_sub.set(Some(id));
        *self.bridge.borrow_mut() = Some(bridge.clone());
        bridge
    }

    fn close_bridge(&self) {
        if let Some(bridge) = self.bridge.borrow_mut().take() {
            if let Some(id) = self.bridge_sub.take() {
                bridge.unsubscribe(id);
            }
            bridge.close();
        }
    }

    /// Last state reported by the camera service, if connected.
    pub fn camera_state(&self) -> Option<BridgeState> {
        self.bridge.borrow().as_ref().map(|b| b.latest())
    }

    // ---- lifecycle ----

    pub fn on_resize(&self) {
        let (w, h) = self.view.borrow_mut().resize();
        self.scene.borrow_mut().resize(w, h);
    }

    /// Release every resource. Safe to call more than once.
    pub fn close(self: &Rc<Self>) {
        if self.closed.replace(true) {
            return;
        }
        if let Some(frame) = self.frame.borrow_mut().take() {
            frame.cancel();
        }
        let commands = self.guide.borrow_mut().close();
        self.run(commands);
        if let Some(r) = self.recognizer.borrow_mut().take() {
            r.abort();
        }
        if let Some(mut capture) = self.camera.borrow_mut().take() {
            capture.stop();
        }
        self.close_bridge();
        self.scene.borrow_mut().close();
        self.view.borrow().clear();
        self.listeners.borrow_mut().clear();
        log::info!("[app] closed");
    }
}
