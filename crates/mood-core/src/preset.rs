//! Static emotion → scene bundle table.
//!
//! Every [`Emotion`] is bound to exactly one [`EmotionPreset`]; the table is
//! built at compile time and never mutated. Other components compare the
//! `id` of the preset they last applied against the active one to detect a
//! transition.

use crate::color::{BlendMode, Gradient, Rgba};
use crate::emotion::Emotion;

/// Colors for every band of the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub sky: Gradient,
    pub clouds: Rgba,
    pub far_hill: Rgba,
    pub mid_hill: Rgba,
    pub near_hill: Rgba,
    pub hero_object: Rgba,
    pub foreground: Rgba,
    /// Rim light color.
    pub highlight: Rgba,
    pub accent: Rgba,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub global_intensity: f32,
    pub global_color: Rgba,
    pub sun_ray_color: Rgba,
    /// 0..1
    pub sun_ray_intensity: f32,
    /// 0..1
    pub rim_light_intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: Rgba,
    pub opacity_near: f32,
    pub opacity_mid: f32,
    pub opacity_far: f32,
    /// Scroll multiplier for the fog bands (0 = still).
    pub speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostProcessConfig {
    pub bloom_threshold: f32,
    pub bloom_intensity: f32,
    pub vignette_intensity: f32,
    pub grain_opacity: f32,
    pub saturation: f32,
    pub contrast: f32,
    pub brightness: f32,
    pub tint_color: Rgba,
    pub tint_blend_mode: BlendMode,
}

/// Which particle simulation runs for a preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    None,
    Rain,
    Ash,
    Fog,
    Fireflies,
    Birds,
}

impl ParticleKind {
    pub fn label(self) -> &'static str {
        match self {
            ParticleKind::None => "none",
            ParticleKind::Rain => "rain",
            ParticleKind::Ash => "ash",
            ParticleKind::Fog => "fog",
            ParticleKind::Fireflies => "fireflies",
            ParticleKind::Birds => "birds",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraEffect {
    None,
    Shake,
    Pulse,
    Breathing,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmotionPreset {
    pub id: Emotion,
    pub ambience_description: &'static str,
    pub palette: Palette,
    pub lighting: Lighting,
    pub fog: Fog,
    pub post_process: PostProcessConfig,
    /// Applied to every world layer's base speed; 0 freezes the world.
    pub parallax_speed_multiplier: f32,
    pub particle_system: ParticleKind,
    pub camera_effect: CameraEffect,
}

/// Total, O(1) lookup.
pub fn lookup(emotion: Emotion) -> &'static EmotionPreset {
    &PRESETS[index_of(emotion)]
}

#[inline]
fn index_of(emotion: Emotion) -> usize {
    match emotion {
        Emotion::Happy => 0,
        Emotion::Sad => 1,
        Emotion::Angry => 2,
        Emotion::Fear => 3,
        Emotion::Calm => 4,
        Emotion::Surprised => 5,
        Emotion::Neutral => 6,
    }
}

static PRESETS: [EmotionPreset; 7] = [
    EmotionPreset {
        id: Emotion::Happy,
        ambience_description: "Sunlit Valley",
        palette: Palette {
            sky: Gradient([Rgba::hex(0x38bdf8), Rgba::hex(0xbae6fd), Rgba::hex(0xe0f2fe)]),
            clouds: Rgba::hex(0xffffff),
            far_hill: Rgba::hex(0x60a5fa),
            mid_hill: Rgba::hex(0x3b82f6),
            near_hill: Rgba::hex(0x1e40af),
            hero_object: Rgba::hex(0x15803d),
            foreground: Rgba::hex(0x14532d),
            highlight: Rgba::hex(0xfbbf24),
            accent: Rgba::hex(0xec4899),
        },
        lighting: Lighting {
            global_intensity: 1.1,
            global_color: Rgba::hex(0xffffff),
            sun_ray_color: Rgba::hex(0xfef08a),
            sun_ray_intensity: 0.6,
            rim_light_intensity: 0.8,
        },
        fog: Fog {
            color: Rgba::hex(0xe0f2fe),
            opacity_near: 0.0,
            opacity_mid: 0.1,
            opacity_far: 0.3,
            speed: 1.0,
        },
        post_process: PostProcessConfig {
            bloom_threshold: 0.8,
            bloom_intensity: 1.2,
            vignette_intensity: 0.2,
            grain_opacity: 0.03,
            saturation: 1.3,
            contrast: 1.1,
            brightness: 1.05,
            tint_color: Rgba::rgba(255, 200, 50, 0.1),
            tint_blend_mode: BlendMode::Overlay,
        },
        parallax_speed_multiplier: 1.0,
        particle_system: ParticleKind::Birds,
        camera_effect: CameraEffect::None,
    },
    EmotionPreset {
        id: Emotion::Sad,
        ambience_description: "Weeping Forest",
        palette: Palette {
            sky: Gradient([Rgba::hex(0x334155), Rgba::hex(0x475569), Rgba::hex(0x94a3b8)]),
            clouds: Rgba::hex(0x64748b),
            far_hill: Rgba::hex(0x475569),
            mid_hill: Rgba::hex(0x334155),
            near_hill: Rgba::hex(0x1e293b),
            hero_object: Rgba::hex(0x0f172a),
            foreground: Rgba::hex(0x020617),
            highlight: Rgba::hex(0x94a3b8),
            accent: Rgba::hex(0x334155),
        },
        lighting: Lighting {
            global_intensity: 0.7,
            global_color: Rgba::hex(0x94a3b8),
            sun_ray_color: Rgba::hex(0xcbd5e1),
            sun_ray_intensity: 0.1,
            rim_light_intensity: 0.2,
        },
        fog: Fog {
            color: Rgba::hex(0xcbd5e1),
            opacity_near: 0.2,
            opacity_mid: 0.4,
            opacity_far: 0.8,
            speed: 0.5,
        },
        post_process: PostProcessConfig {
            bloom_threshold: 1.0,
            bloom_intensity: 0.0,
            vignette_intensity: 0.4,
            grain_opacity: 0.08,
            saturation: 0.6,
            contrast: 0.9,
            brightness: 0.9,
            tint_color: Rgba::rgba(20, 30, 50, 0.3),
            tint_blend_mode: BlendMode::Multiply,
        },
        parallax_speed_multiplier: 0.5,
        particle_system: ParticleKind::Rain,
        camera_effect: CameraEffect::None,
    },
    EmotionPreset {
        id: Emotion::Angry,
        ambience_description: "Inferno Grove",
        palette: Palette {
            sky: Gradient([Rgba::hex(0x450a0a), Rgba::hex(0x7f1d1d), Rgba::hex(0x1c1917)]),
            clouds: Rgba::hex(0x292524),
            far_hill: Rgba::hex(0x7f1d1d),
            mid_hill: Rgba::hex(0x991b1b),
            near_hill: Rgba::hex(0x450a0a),
            hero_object: Rgba::hex(0x292524),
            foreground: Rgba::hex(0x000000),
            highlight: Rgba::hex(0xf87171),
            accent: Rgba::hex(0xef4444),
        },
        lighting: Lighting {
            global_intensity: 1.0,
            global_color: Rgba::hex(0xfea5a5),
            sun_ray_color: Rgba::hex(0xfca5a5),
            sun_ray_intensity: 0.0,
            rim_light_intensity: 1.0,
        },
        fog: Fog {
            color: Rgba::hex(0x7f1d1d),
            opacity_near: 0.1,
            opacity_mid: 0.3,
            opacity_far: 0.6,
            speed: 2.5,
        },
        post_process: PostProcessConfig {
            bloom_threshold: 0.6,
            bloom_intensity: 1.5,
            vignette_intensity: 0.5,
            grain_opacity: 0.15,
            saturation: 1.4,
            contrast: 1.4,
            brightness: 0.9,
            tint_color: Rgba::rgba(100, 0, 0, 0.2),
            tint_blend_mode: BlendMode::ColorBurn,
        },
        parallax_speed_multiplier: 1.5,
        particle_system: ParticleKind::Ash,
        camera_effect: CameraEffect::Shake,
    },
    EmotionPreset {
        id: Emotion::Fear,
        ambience_description: "Shadow Realm",
        palette: Palette {
            sky: Gradient([Rgba::hex(0x020617), Rgba::hex(0x000000), Rgba::hex(0x172554)]),
            clouds: Rgba::hex(0x0f172a),
            far_hill: Rgba::hex(0x1e1b4b),
            mid_hill: Rgba::hex(0x172554),
            near_hill: Rgba::hex(0x020617),
            hero_object: Rgba::hex(0x000000),
            foreground: Rgba::hex(0x000000),
            highlight: Rgba::hex(0x4c1d95),
            accent: Rgba::hex(0x581c87),
        },
        lighting: Lighting {
            global_intensity: 0.4,
            global_color: Rgba::hex(0x312e81),
            sun_ray_color: Rgba::hex(0x000000),
            sun_ray_intensity: 0.0,
            rim_light_intensity: 0.1,
        },
        fog: Fog {
            color: Rgba::hex(0x020617),
            opacity_near: 0.4,
            opacity_mid: 0.7,
            opacity_far: 0.95,
            speed: 0.2,
        },
        post_process: PostProcessConfig {
            bloom_threshold: 0.9,
            bloom_intensity: 0.3,
            vignette_intensity: 0.8,
            grain_opacity: 0.2,
            saturation: 0.4,
            contrast: 1.3,
            brightness: 0.7,
            tint_color: Rgba::rgba(0, 0, 10, 0.6),
            tint_blend_mode: BlendMode::Multiply,
        },
        parallax_speed_multiplier: 0.8,
        particle_system: ParticleKind::Fog,
        camera_effect: CameraEffect::Breathing,
    },
    EmotionPreset {
        id: Emotion::Calm,
        ambience_description: "Twilight Haven",
        palette: Palette {
            sky: Gradient([Rgba::hex(0x0f766e), Rgba::hex(0x2dd4bf), Rgba::hex(0xfcd34d)]),
            clouds: Rgba::hex(0xccfbf1),
            far_hill: Rgba::hex(0x2dd4bf),
            mid_hill: Rgba::hex(0x0d9488),
            near_hill: Rgba::hex(0x115e59),
            hero_object: Rgba::hex(0x0f766e),
            foreground: Rgba::hex(0x134e4a),
            highlight: Rgba::hex(0xfcd34d),
            accent: Rgba::hex(0xa7f3d0),
        },
        lighting: Lighting {
            global_intensity: 0.9,
            global_color: Rgba::hex(0xf0fdf4),
            sun_ray_color: Rgba::hex(0xfde68a),
            sun_ray_intensity: 0.4,
            rim_light_intensity: 0.5,
        },
        fog: Fog {
            color: Rgba::hex(0xccfbf1),
            opacity_near: 0.1,
            opacity_mid: 0.2,
            opacity_far: 0.4,
            speed: 0.6,
        },
        post_process: PostProcessConfig {
            bloom_threshold: 0.7,
            bloom_intensity: 1.0,
            vignette_intensity: 0.2,
            grain_opacity: 0.04,
            saturation: 1.1,
            contrast: 1.0,
            brightness: 1.0,
            tint_color: Rgba::rgba(200, 255, 200, 0.1),
            tint_blend_mode: BlendMode::SoftLight,
        },
        parallax_speed_multiplier: 0.6,
        particle_system: ParticleKind::Fireflies,
        camera_effect: CameraEffect::None,
    },
    EmotionPreset {
        id: Emotion::Surprised,
        ambience_description: "Neon Rift",
        palette: Palette {
            sky: Gradient([Rgba::hex(0x6366f1), Rgba::hex(0xa855f7), Rgba::hex(0xec4899)]),
            clouds: Rgba::hex(0xfbcfe8),
            far_hill: Rgba::hex(0xa855f7),
            mid_hill: Rgba::hex(0xd946ef),
            near_hill: Rgba::hex(0x7c3aed),
            hero_object: Rgba::hex(0x4f46e5),
            foreground: Rgba::hex(0x2e1065),
            highlight: Rgba::hex(0xffffff),
            accent: Rgba::hex(0x22d3ee),
        },
        lighting: Lighting {
            global_intensity: 1.2,
            global_color: Rgba::hex(0xfae8ff),
            sun_ray_color: Rgba::hex(0xffffff),
            sun_ray_intensity: 0.8,
            rim_light_intensity: 1.0,
        },
        fog: Fog {
            color: Rgba::hex(0xe879f9),
            opacity_near: 0.0,
            opacity_mid: 0.1,
            opacity_far: 0.2,
            speed: 0.0,
        },
        post_process: PostProcessConfig {
            bloom_threshold: 0.4,
            bloom_intensity: 2.0,
            vignette_intensity: 0.0,
            grain_opacity: 0.0,
            saturation: 1.5,
            contrast: 1.1,
            brightness: 1.1,
            tint_color: Rgba::rgba(255, 255, 255, 0.2),
            tint_blend_mode: BlendMode::Screen,
        },
        parallax_speed_multiplier: 0.0,
        particle_system: ParticleKind::Fireflies,
        camera_effect: CameraEffect::Pulse,
    },
    EmotionPreset {
        id: Emotion::Neutral,
        ambience_description: "Silent Woods",
        palette: Palette {
            sky: Gradient([Rgba::hex(0x1e293b), Rgba::hex(0x334155), Rgba::hex(0x64748b)]),
            clouds: Rgba::hex(0x94a3b8),
            far_hill: Rgba::hex(0x475569),
            mid_hill: Rgba::hex(0x334155),
            near_hill: Rgba::hex(0x1e293b),
            hero_object: Rgba::hex(0x0f172a),
            foreground: Rgba::hex(0x020617),
            highlight: Rgba::hex(0x64748b),
            accent: Rgba::hex(0x94a3b8),
        },
        lighting: Lighting {
            global_intensity: 0.8,
            global_color: Rgba::hex(0xf1f5f9),
            sun_ray_color: Rgba::hex(0xe2e8f0),
            sun_ray_intensity: 0.2,
            rim_light_intensity: 0.3,
        },
        fog: Fog {
            color: Rgba::hex(0x64748b),
            opacity_near: 0.05,
            opacity_mid: 0.2,
            opacity_far: 0.5,
            speed: 0.8,
        },
        post_process: PostProcessConfig {
            bloom_threshold: 1.0,
            bloom_intensity: 0.0,
            vignette_intensity: 0.3,
            grain_opacity: 0.05,
            saturation: 0.9,
            contrast: 1.0,
            brightness: 1.0,
            tint_color: Rgba::TRANSPARENT,
            tint_blend_mode: BlendMode::Normal,
        },
        parallax_speed_multiplier: 1.0,
        particle_system: ParticleKind::None,
        camera_effect: CameraEffect::None,
    },
];
