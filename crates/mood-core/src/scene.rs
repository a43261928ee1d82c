//! The single coordination point for the shared emotion value.
//!
//! An emotion change is looked up once and handed to every presentation
//! component, each of which starts its own transition. Nothing here waits on
//! another component's transition.

use crate::audio::{AudioBackend, Soundscape};
use crate::constants::{AUDIO_RETRY_FRAMES, TITLE_DELAY_SEC, TITLE_HOLD_SEC};
use crate::emotion::Emotion;
use crate::parallax::Compositor;
use crate::particles::ParticleField;
use crate::post::{PostBlend, PostFrame};
use crate::preset::{self, EmotionPreset, ParticleKind};

/// Ambience caption shown briefly after each change.
#[derive(Clone, Copy, Debug)]
pub struct SceneTitle {
    text: &'static str,
    changed_at: f64,
}

impl SceneTitle {
    pub fn new(text: &'static str, now_sec: f64) -> Self {
        Self {
            text,
            changed_at: now_sec,
        }
    }

    pub fn set(&mut self, text: &'static str, now_sec: f64) {
        self.text = text;
        self.changed_at = now_sec;
    }

    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn is_visible(&self, now_sec: f64) -> bool {
        let since = now_sec - self.changed_at;
        since >= TITLE_DELAY_SEC && since < TITLE_DELAY_SEC + TITLE_HOLD_SEC
    }
}

pub struct Scene<B: AudioBackend> {
    emotion: Emotion,
    compositor: Compositor,
    particles: ParticleField,
    post: PostBlend,
    title: SceneTitle,
    audio: Option<Soundscape<B>>,
    /// Frames left before the audio voice is rebuilt after a failure.
    audio_retry: Option<u32>,
}

impl<B: AudioBackend> Scene<B> {
    /// Start on NEUTRAL. `audio` is optional: a page without a usable audio
    /// context still animates.
    pub fn new(width: f32, height: f32, audio: Option<Soundscape<B>>, seed: u64, now_sec: f64) -> Self {
        let p = preset::lookup(Emotion::Neutral);
        let mut particles = ParticleField::new(seed);
        particles.configure(p.particle_system, width, height);
        let mut scene = Self {
            emotion: Emotion::Neutral,
            compositor: Compositor::new(p),
            particles,
            post: PostBlend::new(&p.post_process, p.camera_effect),
            title: SceneTitle::new(p.ambience_description, now_sec),
            audio,
            audio_retry: None,
        };
        scene.sync_audio(Emotion::Neutral);
        scene
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    pub fn preset(&self) -> &'static EmotionPreset {
        preset::lookup(self.emotion)
    }

    /// Apply a new emotion. Returns the new preset, or `None` when nothing
    /// changed.
    pub fn set_emotion(&mut self, emotion: Emotion, now_sec: f64) -> Option<&'static EmotionPreset> {
        if emotion == self.emotion {
            return None;
        }
        let p = preset::lookup(emotion);
        log::info!("[scene] {} -> {} ({})", self.emotion, emotion, p.ambience_description);
        self.emotion = emotion;

        self.compositor.apply(p, now_sec);
        if self.particles.kind() != p.particle_system {
            let (w, h) = self.particles.viewport();
            self.particles.configure(p.particle_system, w, h);
        }
        self.post.retarget(&p.post_process, p.camera_effect, now_sec);
        self.title.set(p.ambience_description, now_sec);
        self.sync_audio(emotion);
        Some(p)
    }

    /// A voice that fails to build falls back to NEUTRAL and is retried
    /// every `AUDIO_RETRY_FRAMES` frames until it matches the scene.
    fn sync_audio(&mut self, emotion: Emotion) {
        let Some(audio) = self.audio.as_mut() else {
            return;
        };
        if audio.is_closed() {
            self.audio_retry = None;
            return;
        }
        match audio.set_emotion(emotion) {
            Ok(()) => self.audio_retry = None,
            Err(e) => {
                log::error!("[scene] audio did not follow {emotion}: {e}");
                if emotion != Emotion::Neutral && audio.emotion().is_none() {
                    match audio.set_emotion(Emotion::Neutral) {
                        Ok(()) => log::warn!("[scene] audio fell back to {}", Emotion::Neutral),
                        Err(e) => log::error!("[scene] audio fallback failed: {e}"),
                    }
                }
                self.audio_retry = Some(AUDIO_RETRY_FRAMES);
            }
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let kind = self.particles.kind();
        self.particles.configure(kind, width, height);
    }

    /// One animation frame. `t_ms` is the frame timestamp.
    pub fn frame(&mut self, t_ms: f64) {
        self.compositor.step();
        self.particles.step(t_ms);
        if let Some(audio) = self.audio.as_mut() {
            audio.tick();
        }
        match self.audio_retry {
            Some(0) => self.sync_audio(self.emotion),
            Some(left) => self.audio_retry = Some(left - 1),
            None => {}
        }
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn post_frame(&self, now_sec: f64) -> PostFrame {
        self.post.frame(now_sec)
    }

    pub fn title(&self) -> &SceneTitle {
        &self.title
    }

    pub fn audio(&self) -> Option<&Soundscape<B>> {
        self.audio.as_ref()
    }

    pub fn audio_mut(&mut self) -> Option<&mut Soundscape<B>> {
        self.audio.as_mut()
    }

    /// Release everything the scene owns. Idempotent.
    pub fn close(&mut self) {
        if let Some(audio) = self.audio.as_mut() {
            audio.close();
        }
        self.particles.configure(ParticleKind::None, 0.0, 0.0);
    }
}
