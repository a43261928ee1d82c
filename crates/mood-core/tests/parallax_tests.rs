// Host-side tests for the scrolling layer compositor.

use mood_core::lookup;
use mood_core::parallax::{advance, Compositor, LayerKind, Scroll, LAYERS, NEAR_MIST_Z, WRAP_WIDTH};
use mood_core::Emotion;

fn position_of(c: &Compositor, kind: LayerKind) -> f32 {
    c.layers()
        .iter()
        .find(|l| l.spec.kind == kind)
        .map(|l| l.position())
        .unwrap()
}

#[test]
fn layers_are_ordered_back_to_front() {
    assert!(LAYERS.windows(2).all(|w| w[0].z_index < w[1].z_index));
    let hero = LAYERS.iter().find(|l| l.kind == LayerKind::HeroTrees).unwrap();
    let fg = LAYERS.iter().find(|l| l.kind == LayerKind::Foreground).unwrap();
    assert!(hero.z_index < NEAR_MIST_Z && NEAR_MIST_Z < fg.z_index);
}

#[test]
fn advance_stays_within_wrap_bounds() {
    let mut pos = 0.0;
    for _ in 0..100_000 {
        pos = advance(pos, 0.8, 1.5, WRAP_WIDTH);
        assert!(pos > -WRAP_WIDTH && pos <= WRAP_WIDTH, "escaped at {pos}");
    }
    // Negative multipliers scroll the other way and wrap just the same.
    for _ in 0..100_000 {
        pos = advance(pos, 0.8, -3.0, WRAP_WIDTH);
        assert!(pos > -WRAP_WIDTH && pos <= WRAP_WIDTH, "escaped at {pos}");
    }
}

#[test]
fn zero_multiplier_freezes_exactly() {
    for start in [0.0, -123.25, 2399.5] {
        assert_eq!(advance(start, 0.6, 0.0, WRAP_WIDTH), start);
    }
}

#[test]
fn non_finite_position_restarts_at_zero() {
    assert_eq!(advance(f32::NAN, 0.5, 1.0, WRAP_WIDTH), 0.0);
    assert_eq!(advance(f32::INFINITY, 0.5, 1.0, WRAP_WIDTH), 0.0);
}

#[test]
fn bands_scroll_at_their_own_speeds() {
    let angry = lookup(Emotion::Angry);
    let mut c = Compositor::new(angry);
    c.step();
    let m = angry.parallax_speed_multiplier;
    assert_eq!(position_of(&c, LayerKind::Clouds), -0.05 * m);
    assert_eq!(position_of(&c, LayerKind::Foreground), -0.8 * m);
    assert_eq!(position_of(&c, LayerKind::FogMid), -(0.35 * (angry.fog.speed * 1.5)));
    assert_eq!(position_of(&c, LayerKind::FogFar), -(0.15 * angry.fog.speed));
    assert_eq!(position_of(&c, LayerKind::GodRays), 0.0);
}

#[test]
fn god_rays_never_move() {
    let spec = LAYERS.iter().find(|l| l.kind == LayerKind::GodRays).unwrap();
    assert_eq!(spec.scroll, Scroll::Fixed);
    let mut c = Compositor::new(lookup(Emotion::Happy));
    for _ in 0..1000 {
        c.step();
    }
    assert_eq!(position_of(&c, LayerKind::GodRays), 0.0);
}

#[test]
fn surprised_freezes_every_band() {
    let mut c = Compositor::new(lookup(Emotion::Calm));
    for _ in 0..50 {
        c.step();
    }
    let before: Vec<f32> = c.layers().iter().map(|l| l.position()).collect();
    c.apply(lookup(Emotion::Surprised), 1.0);
    for _ in 0..50 {
        c.step();
    }
    let after: Vec<f32> = c.layers().iter().map(|l| l.position()).collect();
    assert_eq!(before, after);
}

#[test]
fn colors_ease_from_current_value() {
    let happy = lookup(Emotion::Happy);
    let sad = lookup(Emotion::Sad);
    let mut c = Compositor::new(happy);
    c.apply(sad, 10.0);

    let hero = |c: &Compositor, t| {
        c.views(t)
            .find(|v| v.kind == LayerKind::HeroTrees)
            .unwrap()
    };
    assert_eq!(hero(&c, 10.0).color, happy.palette.hero_object);
    assert_eq!(hero(&c, 11.5).color, sad.palette.hero_object);

    // Fog bands take the longer ease.
    let fog_far = |t| c.views(t).find(|v| v.kind == LayerKind::FogFar).unwrap();
    assert_eq!(fog_far(12.0).opacity, sad.fog.opacity_far);
    assert_eq!(fog_far(12.0).color, sad.fog.color);

    let sky = c.sky(12.0);
    assert_eq!(sky.gradient, sad.palette.sky);
    assert_eq!(sky.near_mist_opacity, sad.fog.opacity_near);
}

#[test]
fn views_carry_layout_and_position() {
    let mut c = Compositor::new(lookup(Emotion::Neutral));
    c.step();
    let views: Vec<_> = c.views(0.0).collect();
    assert_eq!(views.len(), LAYERS.len());
    for (v, spec) in views.iter().zip(LAYERS.iter()) {
        assert_eq!(v.kind, spec.kind);
        assert_eq!(v.z_index, spec.z_index);
        assert_eq!(v.offset_y_pct, spec.offset_y_pct);
    }
    let god_rays = views.iter().find(|v| v.kind == LayerKind::GodRays).unwrap();
    assert_eq!(god_rays.opacity, lookup(Emotion::Neutral).lighting.sun_ray_intensity);
}
