// Host-side tests for the guidance loop and verse selection.

use mood_core::classifier::{classify, AnalysisResult, Metrics, Themes};
use mood_core::guide::{Guide, GuideCommand, GuidePhase, SpeechPlan, VoiceHint, GREETING};
use mood_core::verses::{self, candidates, score, speech_rate, verses_for};
use mood_core::{Emotion, Intent, Theme};
use rand::prelude::*;
use std::time::Duration;

const DEBOUNCE: Duration = Duration::from_millis(2000);

fn listening_guide() -> Guide {
    let mut g = Guide::new(DEBOUNCE, 3);
    g.activate();
    g.speech_finished();
    assert_eq!(g.phase(), GuidePhase::Listening);
    g
}

fn speak_plan(cmds: &[GuideCommand]) -> &SpeechPlan {
    cmds.iter()
        .find_map(|c| match c {
            GuideCommand::Speak(plan) => Some(plan),
            _ => None,
        })
        .expect("no Speak command")
}

#[test]
fn full_turn_from_greeting_to_verse() {
    let mut g = Guide::new(DEBOUNCE, 3);
    assert_eq!(g.phase(), GuidePhase::Idle);

    let cmds = g.activate();
    assert_eq!(g.phase(), GuidePhase::Speaking);
    assert_eq!(cmds[0], GuideCommand::CancelSpeech);
    let greeting = speak_plan(&cmds);
    assert_eq!(greeting.segments.len(), 1);
    assert_eq!(greeting.segments[0].text, GREETING);
    assert_eq!(greeting.segments[0].pitch, 0.8);

    assert_eq!(g.speech_finished().as_slice(), &[GuideCommand::StartRecognition]);
    assert_eq!(g.phase(), GuidePhase::Listening);

    let t = 10_000.0;
    assert!(g.partial("I feel so heavy and lost", t).is_empty());
    assert_eq!(g.transcript(), "I feel so heavy and lost");
    assert!(g.tick(t + 1999.0).is_empty());
    assert_eq!(g.phase(), GuidePhase::Listening);

    let cmds = g.tick(t + 2000.0);
    assert_eq!(g.phase(), GuidePhase::Processing);
    assert_eq!(
        cmds.as_slice(),
        &[
            GuideCommand::StopRecognition,
            GuideCommand::Classify("I feel so heavy and lost".into())
        ]
    );

    let cmds = g.processed::<String>(Ok(Emotion::Sad));
    assert_eq!(g.phase(), GuidePhase::Speaking);
    assert_eq!(cmds[0], GuideCommand::EmotionDetected(Emotion::Sad));
    assert_eq!(cmds[1], GuideCommand::CancelSpeech);

    let plan = speak_plan(&cmds);
    assert_eq!(plan.segments.len(), 3);
    assert_eq!(plan.segments[0].text, "I sense burdened.");
    assert_eq!(plan.segments[0].pause_after_ms, 300);
    assert_eq!(plan.segments[1].voice, VoiceHint::Recitation);
    assert_eq!(plan.segments[1].pause_after_ms, 500);
    assert_eq!(plan.segments[2].pause_after_ms, 0);
    assert!(plan.segments.iter().all(|s| s.rate == 0.75));
    assert!(plan.segments[2].text.contains("heals all sorrow"));

    let wisdom = g.last_wisdom().unwrap();
    assert_eq!(wisdom.verse, &verses_for(Emotion::Sad)[0]);

    assert_eq!(g.speech_finished().as_slice(), &[GuideCommand::StartRecognition]);
    assert_eq!(g.phase(), GuidePhase::Listening);
    assert_eq!(g.transcript(), "");
}

#[test]
fn later_partials_push_the_deadline_back() {
    let mut g = listening_guide();
    g.partial("I am", 0.0);
    g.partial("I am tired", 1500.0);
    assert!(g.tick(2000.0).is_empty());
    assert_eq!(g.tick(3500.0).len(), 2);
}

#[test]
fn blank_partial_clears_the_deadline() {
    let mut g = listening_guide();
    g.partial("hello", 0.0);
    g.partial("   ", 100.0);
    assert!(g.tick(5000.0).is_empty());
    assert_eq!(g.phase(), GuidePhase::Listening);
}

#[test]
fn own_voice_is_ignored_while_speaking_or_processing() {
    let mut g = Guide::new(DEBOUNCE, 3);
    g.activate();
    g.partial("I am here. Speak your heart.", 0.0);
    assert_eq!(g.transcript(), "");
    assert!(g.tick(10_000.0).is_empty());

    g.speech_finished();
    g.partial("hello there", 0.0);
    g.tick(2000.0);
    assert_eq!(g.phase(), GuidePhase::Processing);
    g.partial("more words", 2100.0);
    assert_eq!(g.transcript(), "hello there");
}

#[test]
fn processing_error_returns_to_listening() {
    let mut g = listening_guide();
    g.partial("hello", 0.0);
    g.tick(2000.0);
    let cmds = g.processed(Err("network down"));
    assert_eq!(cmds.as_slice(), &[GuideCommand::StartRecognition]);
    assert_eq!(g.phase(), GuidePhase::Listening);
    assert!(g.last_wisdom().is_none());
}

#[test]
fn recognizer_restarts_only_while_listening() {
    let mut g = listening_guide();
    assert_eq!(g.recognition_ended().as_slice(), &[GuideCommand::StartRecognition]);
    g.partial("hello", 0.0);
    g.tick(2000.0);
    assert!(g.recognition_ended().is_empty());
}

#[test]
fn denied_microphone_goes_idle() {
    let mut g = listening_guide();
    let cmds = g.recognition_denied();
    assert_eq!(cmds.as_slice(), &[GuideCommand::CancelSpeech]);
    assert_eq!(g.phase(), GuidePhase::Idle);
}

#[test]
fn close_works_from_every_phase() {
    let mut speaking = Guide::new(DEBOUNCE, 1);
    speaking.activate();

    let listening = listening_guide();

    let mut processing = listening_guide();
    processing.partial("hi", 0.0);
    processing.tick(2000.0);

    for mut g in [Guide::new(DEBOUNCE, 1), speaking, listening, processing] {
        let cmds = g.close();
        assert_eq!(
            cmds.as_slice(),
            &[GuideCommand::StopRecognition, GuideCommand::CancelSpeech]
        );
        assert_eq!(g.phase(), GuidePhase::Idle);
        assert!(g.tick(1e9).is_empty());
    }
}

#[test]
fn activate_is_ignored_unless_idle() {
    let mut g = listening_guide();
    assert!(g.activate().is_empty());
    assert_eq!(g.phase(), GuidePhase::Listening);
}

#[test]
fn intent_pulls_in_extra_candidates() {
    assert_eq!(candidates(Emotion::Happy, Intent::SeekingPeace).len(), 3);
    assert_eq!(candidates(Emotion::Calm, Intent::SeekingPeace).len(), 1);
    assert_eq!(candidates(Emotion::Fear, Intent::Burdened).len(), 4);
    assert_eq!(candidates(Emotion::Sad, Intent::Burdened).len(), 2);
    assert_eq!(candidates(Emotion::Sad, Intent::Confused).len(), 4);
}

#[test]
fn speech_rate_follows_intent() {
    assert_eq!(speech_rate(Intent::Burdened), 0.75);
    assert_eq!(speech_rate(Intent::Celebrating), 0.95);
    assert_eq!(speech_rate(Intent::Confused), 0.9);
    assert_eq!(speech_rate(Intent::Observing), 0.85);
    assert_eq!(speech_rate(Intent::SeekingPeace), 0.85);
}

fn analysis(intent: Intent, themes: &[Theme]) -> AnalysisResult {
    AnalysisResult {
        emotion: Emotion::Neutral,
        intent,
        metrics: Metrics {
            energy: 0.5,
            valence: 0.0,
            confidence: 0.5,
        },
        themes: themes.iter().copied().collect::<Themes>(),
    }
}

#[test]
fn scoring_weights_keywords_themes_and_intent() {
    let sad = &verses_for(Emotion::Sad)[0];
    // Two keyword hits.
    assert_eq!(score(sad, "so much grief and pain", &analysis(Intent::Observing, &[])), 4);
    // Intent bonus for a verse that speaks of healing.
    assert_eq!(score(sad, "", &analysis(Intent::Burdened, &[])), 5);

    let calm = &verses_for(Emotion::Calm)[0];
    assert_eq!(score(calm, "", &analysis(Intent::SeekingPeace, &[])), 5);

    let fear = &verses_for(Emotion::Fear)[0];
    // "fear" is named in the meaning text.
    assert_eq!(score(fear, "", &analysis(Intent::Confused, &[Theme::Fear])), 3);
}

#[test]
fn seeking_peace_can_pick_the_silence_verse() {
    let text = "I just want some quiet and rest";
    let a = classify(text);
    assert_eq!(a.intent, Intent::SeekingPeace);
    let mut rng = StdRng::seed_from_u64(0);
    let w = verses::select(text, &a, Emotion::Happy, &mut rng);
    assert_eq!(w.verse, &verses_for(Emotion::Calm)[0]);
    assert_eq!(w.intro, "I sense seeking peace.");
}

#[test]
fn zero_score_falls_back_to_primary_list() {
    let a = analysis(Intent::Observing, &[]);
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..10 {
        let w = verses::select("xyz", &a, Emotion::Happy, &mut rng);
        assert!(verses_for(Emotion::Happy).contains(w.verse));
        assert_eq!(w.rate, 0.85);
    }
}

#[test]
fn recitation_prefers_voiceover() {
    let happy = &verses_for(Emotion::Happy)[0];
    assert_ne!(happy.recitation(), happy.sanskrit);
    let sad = &verses_for(Emotion::Sad)[0];
    assert_eq!(sad.recitation(), sad.sanskrit);
}
