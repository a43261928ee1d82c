// Host-side tests for the scene coordinator.

mod common;

use common::MockBackend;
use mood_core::audio::Soundscape;
use mood_core::constants::AUDIO_RETRY_FRAMES;
use mood_core::preset::ParticleKind;
use mood_core::{lookup, Emotion, Scene};

fn scene() -> Scene<MockBackend> {
    let audio = Soundscape::new(MockBackend::new(), false, 5).unwrap();
    Scene::new(1280.0, 720.0, Some(audio), 5, 0.0)
}

#[test]
fn starts_neutral_with_matching_audio() {
    let s = scene();
    assert_eq!(s.emotion(), Emotion::Neutral);
    assert_eq!(s.preset().id, Emotion::Neutral);
    assert_eq!(s.audio().unwrap().emotion(), Some(Emotion::Neutral));
    assert_eq!(s.particles().kind(), ParticleKind::None);
}

#[test]
fn set_emotion_applies_once() {
    let mut s = scene();
    let p = s.set_emotion(Emotion::Sad, 1.0).unwrap();
    assert_eq!(p.id, Emotion::Sad);
    assert!(std::ptr::eq(p, lookup(Emotion::Sad)));
    assert!(s.set_emotion(Emotion::Sad, 2.0).is_none());

    assert_eq!(s.particles().kind(), ParticleKind::Rain);
    assert_eq!(s.particles().len(), 800);
    assert_eq!(s.audio().unwrap().emotion(), Some(Emotion::Sad));
    assert_eq!(s.title().text(), lookup(Emotion::Sad).ambience_description);
}

#[test]
fn title_shows_after_delay_then_hides() {
    let mut s = scene();
    s.set_emotion(Emotion::Happy, 10.0);
    let title = s.title();
    assert_eq!(title.text(), "Sunlit Valley");
    assert!(!title.is_visible(10.4));
    assert!(title.is_visible(10.5));
    assert!(title.is_visible(13.4));
    assert!(!title.is_visible(13.5));
}

#[test]
fn particles_only_rebuild_when_kind_changes() {
    let mut s = scene();
    s.set_emotion(Emotion::Calm, 0.0);
    assert_eq!(s.particles().kind(), ParticleKind::Fireflies);
    for t in 0..10 {
        s.frame(t as f64 * 16.0);
    }
    let moved = s.particles().particles().to_vec();

    // Surprised shares the firefly system, so the pool carries over.
    s.set_emotion(Emotion::Surprised, 1.0);
    assert_eq!(s.particles().particles(), moved.as_slice());
}

#[test]
fn post_frame_tracks_the_preset() {
    let mut s = scene();
    s.set_emotion(Emotion::Angry, 2.0);
    let frame = s.post_frame(3.0);
    assert_eq!(frame.camera_class, Some("animate-shake"));
    assert!(frame.glow.is_some());
}

#[test]
fn resize_keeps_kind() {
    let mut s = scene();
    s.set_emotion(Emotion::Fear, 0.0);
    s.resize(640.0, 480.0);
    assert_eq!(s.particles().kind(), ParticleKind::Fog);
    assert_eq!(s.particles().viewport(), (640.0, 480.0));
}

#[test]
fn runs_without_audio() {
    let mut s: Scene<MockBackend> = Scene::new(800.0, 600.0, None, 1, 0.0);
    assert!(s.set_emotion(Emotion::Angry, 0.5).is_some());
    s.frame(16.0);
    assert!(s.audio().is_none());
    s.close();
}

#[test]
fn close_releases_audio_and_particles() {
    let mut s = scene();
    s.set_emotion(Emotion::Happy, 0.0);
    s.close();
    s.close();
    let audio = s.audio().unwrap();
    assert!(audio.is_closed());
    assert_eq!(audio.backend().closes, 1);
    assert!(s.particles().is_empty());
}

#[test]
fn failed_voice_is_rebuilt_on_later_frames() {
    let mut s = scene();
    let backend = s.audio_mut().unwrap().backend_mut();
    backend.fail_at = Some(backend.nodes.len());
    assert!(s.set_emotion(Emotion::Angry, 1.0).is_some());
    assert_eq!(s.emotion(), Emotion::Angry);
    assert_eq!(s.audio().unwrap().emotion(), None);

    s.audio_mut().unwrap().backend_mut().fail_at = None;
    for i in 0..AUDIO_RETRY_FRAMES {
        s.frame(f64::from(i) * 16.0);
    }
    assert_eq!(s.audio().unwrap().emotion(), None);
    s.frame(f64::from(AUDIO_RETRY_FRAMES) * 16.0);
    assert_eq!(s.audio().unwrap().emotion(), Some(Emotion::Angry));

    // Once matched, frames stop rebuilding.
    for i in 0..AUDIO_RETRY_FRAMES * 2 {
        s.frame(f64::from(i) * 16.0);
    }
    assert_eq!(s.audio().unwrap().emotion(), Some(Emotion::Angry));
    assert!(s.set_emotion(Emotion::Angry, 9.0).is_none());
}
