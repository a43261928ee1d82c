// Host-side tests for post-process composition and blending.

use mood_core::color::BlendMode;
use mood_core::post::{camera_class, compose, grain_tile, PostBlend};
use mood_core::preset::CameraEffect;
use mood_core::{lookup, Emotion};

#[test]
fn filter_combines_grading_values() {
    let happy = lookup(Emotion::Happy);
    let frame = compose(&happy.post_process, happy.camera_effect);
    assert_eq!(frame.filter, "saturate(1.3) contrast(1.1) brightness(1.05)");
    assert_eq!(frame.camera_class, None);
}

#[test]
fn glow_scales_with_bloom() {
    let happy = lookup(Emotion::Happy);
    let glow = compose(&happy.post_process, CameraEffect::None).glow.unwrap();
    assert!((glow.radius_px - 24.0).abs() < 1e-4);
    assert!((glow.color.a - 0.36).abs() < 1e-4);
    assert_eq!((glow.color.r, glow.color.g, glow.color.b), (255, 255, 255));
    assert!(glow.css().starts_with("drop-shadow(0 0 24.0px"));

    let neutral = lookup(Emotion::Neutral);
    let frame = compose(&neutral.post_process, neutral.camera_effect);
    assert!(frame.glow.is_none());
    assert_eq!(frame.blend, BlendMode::Normal);
}

#[test]
fn camera_effects_map_to_animation_classes() {
    assert_eq!(camera_class(CameraEffect::Shake), Some("animate-shake"));
    assert_eq!(camera_class(CameraEffect::Pulse), Some("animate-pulse-fast"));
    assert_eq!(camera_class(CameraEffect::Breathing), Some("animate-breathing"));
    assert_eq!(camera_class(CameraEffect::None), None);

    let angry = lookup(Emotion::Angry);
    assert_eq!(
        compose(&angry.post_process, angry.camera_effect).camera_class,
        Some("animate-shake")
    );
}

#[test]
fn blend_eases_numbers_and_switches_modes() {
    let happy = lookup(Emotion::Happy);
    let fear = lookup(Emotion::Fear);
    let mut blend = PostBlend::new(&happy.post_process, happy.camera_effect);
    blend.retarget(&fear.post_process, fear.camera_effect, 5.0);

    let start = blend.frame(5.0);
    assert_eq!(start.filter, compose(&happy.post_process, CameraEffect::None).filter);
    // Discrete values switch at once.
    assert_eq!(start.blend, fear.post_process.tint_blend_mode);
    assert_eq!(start.camera_class, Some("animate-breathing"));

    assert!(!blend.is_settled(5.5));
    assert!(blend.is_settled(6.0));
    assert_eq!(blend.frame(6.0), compose(&fear.post_process, fear.camera_effect));
}

#[test]
fn grain_tile_is_opaque_gray_noise() {
    let tile = grain_tile(11);
    assert_eq!(tile.len(), 128 * 128 * 4);
    assert!(tile.chunks(4).all(|px| px[0] == px[1] && px[1] == px[2] && px[3] == 255));
    assert!(tile.chunks(4).any(|px| px[0] != tile[0]));
    assert_eq!(tile, grain_tile(11));
}
