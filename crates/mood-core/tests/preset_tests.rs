// Host-side tests for the static emotion preset table.

use mood_core::color::BlendMode;
use mood_core::preset::{lookup, CameraEffect, ParticleKind};
use mood_core::Emotion;

#[test]
fn every_emotion_maps_to_its_own_preset() {
    for e in Emotion::ALL {
        assert_eq!(lookup(e).id, e, "preset id mismatch for {e}");
    }
}

#[test]
fn lookup_returns_the_same_static_bundle() {
    // Transition detection compares bundles by identity.
    assert!(std::ptr::eq(lookup(Emotion::Sad), lookup(Emotion::Sad)));
    assert!(!std::ptr::eq(lookup(Emotion::Sad), lookup(Emotion::Calm)));
}

#[test]
fn surprised_freezes_the_world() {
    let p = lookup(Emotion::Surprised);
    assert_eq!(p.parallax_speed_multiplier, 0.0);
    assert_eq!(p.camera_effect, CameraEffect::Pulse);
}

#[test]
fn particle_and_camera_bindings() {
    assert_eq!(lookup(Emotion::Happy).particle_system, ParticleKind::Birds);
    assert_eq!(lookup(Emotion::Sad).particle_system, ParticleKind::Rain);
    assert_eq!(lookup(Emotion::Angry).particle_system, ParticleKind::Ash);
    assert_eq!(lookup(Emotion::Fear).particle_system, ParticleKind::Fog);
    assert_eq!(lookup(Emotion::Calm).particle_system, ParticleKind::Fireflies);
    assert_eq!(lookup(Emotion::Neutral).particle_system, ParticleKind::None);
    assert_eq!(lookup(Emotion::Angry).camera_effect, CameraEffect::Shake);
    assert_eq!(lookup(Emotion::Fear).camera_effect, CameraEffect::Breathing);
}

#[test]
fn preset_values_are_in_range() {
    for e in Emotion::ALL {
        let p = lookup(e);
        assert!(!p.ambience_description.is_empty());
        assert!(p.parallax_speed_multiplier >= 0.0);
        assert!(p.fog.speed >= 0.0);
        for o in [p.fog.opacity_near, p.fog.opacity_mid, p.fog.opacity_far] {
            assert!((0.0..=1.0).contains(&o), "{e} fog opacity {o}");
        }
        assert!((0.0..=1.0).contains(&p.lighting.sun_ray_intensity));
        assert!((0.0..=1.0).contains(&p.post_process.vignette_intensity));
        assert!((0.0..=1.0).contains(&p.post_process.grain_opacity));
    }
}

#[test]
fn neutral_is_untinted() {
    assert_eq!(
        lookup(Emotion::Neutral).post_process.tint_blend_mode,
        BlendMode::Normal
    );
}
