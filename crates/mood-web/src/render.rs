//! DOM and Canvas 2D presentation of a [`Scene`].
//!
//! Every sub-view is write-only: it reads a frame's worth of state from the
//! scene and pushes it into the page, caching what it last wrote.

mod layers;
mod particles;
mod post;

use crate::constants::TITLE_ID;
use crate::dom;
use crate::overlay;
use mood_core::audio::AudioBackend;
use mood_core::{Emotion, Scene};
use web_sys as web;

use layers::LayerStack;
use particles::ParticleCanvas;
use post::PostView;

pub struct SceneView {
    document: web::Document,
    layers: LayerStack,
    particles: ParticleCanvas,
    post: PostView,
    title_text: &'static str,
    title_visible: Option<bool>,
    mood: Option<Emotion>,
}

impl SceneView {
    pub fn mount(document: &web::Document, seed: u64) -> anyhow::Result<Self> {
        Ok(Self {
            document: document.clone(),
            layers: LayerStack::mount(document)?,
            particles: ParticleCanvas::mount(document)?,
            post: PostView::mount(document, seed)?,
            title_text: "",
            title_visible: None,
            mood: None,
        })
    }

    /// Viewport in CSS pixels after syncing the canvas backing store.
    pub fn resize(&mut self) -> (f32, f32) {
        self.particles.sync_size()
    }

    pub fn draw<B: AudioBackend>(&mut self, scene: &Scene<B>, now_sec: f64, t_ms: f64) {
        let emotion = scene.emotion();
        if self.mood != Some(emotion) {
            self.layers.set_mood(emotion);
            self.mood = Some(emotion);
        }
        let compositor = scene.compositor();
        self.layers
            .draw(compositor.views(now_sec), &compositor.sky(now_sec));
        self.particles.draw(scene.particles().sprites(t_ms));
        self.post.draw(&scene.post_frame(now_sec));

        let title = scene.title();
        if title.text() != self.title_text {
            dom::set_text(&self.document, TITLE_ID, title.text());
            self.title_text = title.text();
        }
        let visible = title.is_visible(now_sec);
        if self.title_visible != Some(visible) {
            overlay::set_visible(&self.document, TITLE_ID, visible);
            self.title_visible = Some(visible);
        }
    }

    pub fn clear(&self) {
        self.particles.clear();
    }
}
