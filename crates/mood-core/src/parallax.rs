//! Scrolling layer compositor.
//!
//! Each band scrolls at its own base speed scaled by a shared multiplier; the
//! depth illusion comes purely from the differing speeds. Bands never read
//! each other's position.

use crate::color::{Gradient, Rgba};
use crate::constants::*;
use crate::preset::EmotionPreset;
use crate::tween::Tween;

/// Distance after which a band's position wraps back by one period.
pub const WRAP_WIDTH: f32 = TILE_WIDTH_PX * WRAP_TILES;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Clouds,
    FarHills,
    FogFar,
    MidHills,
    NearHills,
    FogMid,
    GodRays,
    DenseForest,
    HeroTrees,
    Foreground,
}

/// Which multiplier drives a band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scroll {
    /// The preset's world multiplier.
    World,
    /// The preset's fog speed times this factor.
    Fog(f32),
    Fixed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerSpec {
    pub kind: LayerKind,
    pub base_speed: f32,
    pub z_index: i32,
    /// Vertical offset as a percentage of the viewport height.
    pub offset_y_pct: f32,
    pub scroll: Scroll,
}

const fn spec(kind: LayerKind, base_speed: f32, z_index: i32, offset_y_pct: f32, scroll: Scroll) -> LayerSpec {
    LayerSpec {
        kind,
        base_speed,
        z_index,
        offset_y_pct,
        scroll,
    }
}

/// Back-to-front.
pub const LAYERS: [LayerSpec; 10] = [
    spec(LayerKind::Clouds, 0.05, 15, 5.0, Scroll::World),
    spec(LayerKind::FarHills, 0.1, 20, 15.0, Scroll::World),
    spec(LayerKind::FogFar, 0.15, 22, 0.0, Scroll::Fog(1.0)),
    spec(LayerKind::MidHills, 0.2, 25, 12.0, Scroll::World),
    spec(LayerKind::NearHills, 0.3, 28, 5.0, Scroll::World),
    spec(LayerKind::FogMid, 0.35, 29, 10.0, Scroll::Fog(1.5)),
    spec(LayerKind::GodRays, 0.0, 30, 0.0, Scroll::Fixed),
    spec(LayerKind::DenseForest, 0.4, 31, 10.0, Scroll::World),
    spec(LayerKind::HeroTrees, 0.6, 35, 5.0, Scroll::World),
    spec(LayerKind::Foreground, 0.8, 40, 0.0, Scroll::World),
];

/// The near mist sits between the hero trees and the foreground.
pub const NEAR_MIST_Z: i32 = 39;

/// One frame of scrolling for a single band.
///
/// A zero multiplier leaves the position untouched. The result always lies in
/// `(-wrap, wrap]`; a non-finite position restarts at zero.
pub fn advance(position: f32, base_speed: f32, multiplier: f32, wrap: f32) -> f32 {
    if multiplier == 0.0 {
        return position;
    }
    let mut next = position - base_speed * multiplier;
    if !next.is_finite() {
        return 0.0;
    }
    if next <= -wrap || next > wrap {
        next %= wrap;
        if next <= -wrap {
            next += wrap;
        }
    }
    next
}

fn target_color(kind: LayerKind, preset: &EmotionPreset) -> Rgba {
    let p = &preset.palette;
    match kind {
        LayerKind::Clouds => p.clouds,
        LayerKind::FarHills => p.far_hill,
        LayerKind::MidHills => p.mid_hill,
        LayerKind::NearHills | LayerKind::DenseForest => p.near_hill,
        LayerKind::HeroTrees => p.hero_object,
        LayerKind::Foreground => p.foreground,
        LayerKind::FogFar | LayerKind::FogMid => preset.fog.color,
        LayerKind::GodRays => preset.lighting.sun_ray_color,
    }
}

fn target_opacity(kind: LayerKind, preset: &EmotionPreset) -> f32 {
    match kind {
        LayerKind::FogFar => preset.fog.opacity_far,
        LayerKind::FogMid => preset.fog.opacity_mid,
        LayerKind::GodRays => preset.lighting.sun_ray_intensity,
        _ => 1.0,
    }
}

fn ease_for(kind: LayerKind) -> f64 {
    match kind {
        LayerKind::Clouds | LayerKind::FogFar | LayerKind::FogMid | LayerKind::GodRays => FOG_EASE_SEC,
        _ => LAYER_COLOR_EASE_SEC,
    }
}

#[derive(Clone, Debug)]
pub struct Layer {
    pub spec: LayerSpec,
    position: f32,
    color: Tween<Rgba>,
    opacity: Tween<f32>,
}

impl Layer {
    pub fn position(&self) -> f32 {
        self.position
    }
}

/// What a renderer needs to draw one band this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerView {
    pub kind: LayerKind,
    pub z_index: i32,
    pub translate_x: f32,
    pub offset_y_pct: f32,
    pub color: Rgba,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyView {
    pub gradient: Gradient,
    pub near_mist_color: Rgba,
    pub near_mist_opacity: f32,
    pub highlight: Rgba,
}

pub struct Compositor {
    layers: Vec<Layer>,
    world_multiplier: f32,
    fog_speed: f32,
    sky: Tween<Gradient>,
    near_mist_color: Tween<Rgba>,
    near_mist_opacity: Tween<f32>,
    highlight: Tween<Rgba>,
}

impl Compositor {
    pub fn new(preset: &EmotionPreset) -> Self {
        let layers = LAYERS
            .iter()
            .map(|s| Layer {
                spec: *s,
                position: 0.0,
                color: Tween::new(target_color(s.kind, preset), ease_for(s.kind)),
                opacity: Tween::new(target_opacity(s.kind, preset), ease_for(s.kind)),
            })
            .collect();
        Self {
            layers,
            world_multiplier: preset.parallax_speed_multiplier,
            fog_speed: preset.fog.speed,
            sky: Tween::new(preset.palette.sky, FOG_EASE_SEC),
            near_mist_color: Tween::new(preset.fog.color, FOG_EASE_SEC),
            near_mist_opacity: Tween::new(preset.fog.opacity_near, FOG_EASE_SEC),
            highlight: Tween::new(preset.palette.highlight, LAYER_COLOR_EASE_SEC),
        }
    }

    /// Retarget every band. Speeds change immediately; colors and opacities
    /// ease from wherever they currently are.
    pub fn apply(&mut self, preset: &EmotionPreset, now_sec: f64) {
        self.world_multiplier = preset.parallax_speed_multiplier;
        self.fog_speed = preset.fog.speed;
        for layer in &mut self.layers {
            layer.color.retarget(target_color(layer.spec.kind, preset), now_sec);
            layer.opacity.retarget(target_opacity(layer.spec.kind, preset), now_sec);
        }
        self.sky.retarget(preset.palette.sky, now_sec);
        self.near_mist_color.retarget(preset.fog.color, now_sec);
        self.near_mist_opacity.retarget(preset.fog.opacity_near, now_sec);
        self.highlight.retarget(preset.palette.highlight, now_sec);
    }

    fn multiplier_for(&self, scroll: Scroll) -> f32 {
        match scroll {
            Scroll::World => self.world_multiplier,
            Scroll::Fog(factor) => self.fog_speed * factor,
            Scroll::Fixed => 0.0,
        }
    }

    /// Advance every band by one animation frame.
    pub fn step(&mut self) {
        for i in 0..self.layers.len() {
            let m = self.multiplier_for(self.layers[i].spec.scroll);
            let layer = &mut self.layers[i];
            layer.position = advance(layer.position, layer.spec.base_speed, m, WRAP_WIDTH);
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn views(&self, now_sec: f64) -> impl Iterator<Item = LayerView> + '_ {
        self.layers.iter().map(move |l| LayerView {
            kind: l.spec.kind,
            z_index: l.spec.z_index,
            translate_x: l.position,
            offset_y_pct: l.spec.offset_y_pct,
            color: l.color.value(now_sec),
            opacity: l.opacity.value(now_sec),
        })
    }

    pub fn sky(&self, now_sec: f64) -> SkyView {
        SkyView {
            gradient: self.sky.value(now_sec),
            near_mist_color: self.near_mist_color.value(now_sec),
            near_mist_opacity: self.near_mist_opacity.value(now_sec),
            highlight: self.highlight.value(now_sec),
        }
    }
}
