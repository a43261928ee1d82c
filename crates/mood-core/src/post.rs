//! Full-screen post-process overlays derived from the active preset.

use crate::color::{BlendMode, Rgba};
use crate::constants::*;
use crate::preset::{CameraEffect, PostProcessConfig};
use crate::tween::Tween;
use rand::prelude::*;

/// Soft glow standing in for real bloom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub radius_px: f32,
    pub color: Rgba,
}

impl Glow {
    pub fn css(&self) -> String {
        format!("drop-shadow(0 0 {:.1}px {})", self.radius_px, self.color)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PostFrame {
    /// `saturate() contrast() brightness()` composed into one filter.
    pub filter: String,
    pub tint: Rgba,
    pub blend: BlendMode,
    pub vignette_opacity: f32,
    pub grain_opacity: f32,
    pub glow: Option<Glow>,
    /// Animation class for the camera effect, if any.
    pub camera_class: Option<&'static str>,
}

pub fn camera_class(effect: CameraEffect) -> Option<&'static str> {
    match effect {
        CameraEffect::Shake => Some("animate-shake"),
        CameraEffect::Pulse => Some("animate-pulse-fast"),
        CameraEffect::Breathing => Some("animate-breathing"),
        CameraEffect::None => None,
    }
}

pub fn compose(config: &PostProcessConfig, camera: CameraEffect) -> PostFrame {
    let glow = (config.bloom_intensity > 0.0).then(|| Glow {
        radius_px: BLOOM_RADIUS_PER_INTENSITY * config.bloom_intensity,
        color: Rgba::WHITE.with_alpha(BLOOM_ALPHA_PER_INTENSITY * config.bloom_intensity),
    });
    PostFrame {
        filter: format!(
            "saturate({}) contrast({}) brightness({})",
            config.saturation, config.contrast, config.brightness
        ),
        tint: config.tint_color,
        blend: config.tint_blend_mode,
        vignette_opacity: config.vignette_intensity,
        grain_opacity: config.grain_opacity,
        glow,
        camera_class: camera_class(camera),
    }
}

/// Eases the numeric post values between presets.
///
/// Blend mode and camera class switch immediately; everything numeric runs
/// through a one-second tween.
pub struct PostBlend {
    saturation: Tween<f32>,
    contrast: Tween<f32>,
    brightness: Tween<f32>,
    bloom: Tween<f32>,
    vignette: Tween<f32>,
    grain: Tween<f32>,
    tint: Tween<Rgba>,
    blend: BlendMode,
    camera: CameraEffect,
}

impl PostBlend {
    pub fn new(config: &PostProcessConfig, camera: CameraEffect) -> Self {
        let t = |v: f32| Tween::new(v, POST_EASE_SEC);
        Self {
            saturation: t(config.saturation),
            contrast: t(config.contrast),
            brightness: t(config.brightness),
            bloom: t(config.bloom_intensity),
            vignette: t(config.vignette_intensity),
            grain: t(config.grain_opacity),
            tint: Tween::new(config.tint_color, POST_EASE_SEC),
            blend: config.tint_blend_mode,
            camera,
        }
    }

    pub fn retarget(&mut self, config: &PostProcessConfig, camera: CameraEffect, now_sec: f64) {
        self.saturation.retarget(config.saturation, now_sec);
        self.contrast.retarget(config.contrast, now_sec);
        self.brightness.retarget(config.brightness, now_sec);
        self.bloom.retarget(config.bloom_intensity, now_sec);
        self.vignette.retarget(config.vignette_intensity, now_sec);
        self.grain.retarget(config.grain_opacity, now_sec);
        self.tint.retarget(config.tint_color, now_sec);
        self.blend = config.tint_blend_mode;
        self.camera = camera;
    }

    pub fn is_settled(&self, now_sec: f64) -> bool {
        self.saturation.is_settled(now_sec)
    }

    pub fn frame(&self, now_sec: f64) -> PostFrame {
        let current = PostProcessConfig {
            bloom_threshold: 0.0,
            bloom_intensity: self.bloom.value(now_sec),
            vignette_intensity: self.vignette.value(now_sec),
            grain_opacity: self.grain.value(now_sec),
            saturation: self.saturation.value(now_sec),
            contrast: self.contrast.value(now_sec),
            brightness: self.brightness.value(now_sec),
            tint_color: self.tint.value(now_sec),
            tint_blend_mode: self.blend,
        };
        compose(&current, self.camera)
    }
}

/// Square RGBA grain tile, generated once and reused as a repeating pattern.
pub fn grain_tile(seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(GRAIN_TILE_PX * GRAIN_TILE_PX * 4);
    for _ in 0..GRAIN_TILE_PX * GRAIN_TILE_PX {
        let v: u8 = rng.gen();
        out.extend_from_slice(&[v, v, v, 255]);
    }
    out
}
