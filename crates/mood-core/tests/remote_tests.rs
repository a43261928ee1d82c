// Host-side tests for the hosted classifier adapter and its momentum fallback.

mod common;

use common::{Reply, ScriptedTransport};
use mood_core::remote::{
    build_prompt, parse_verdict, request_body, REMOTE_LABELS, RemoteClassifier, RemoteError,
};
use mood_core::{Emotion, Intent};
use pollster::block_on;
use std::time::Duration;

const KEY: &str = "AIzaSyTESTKEY0123456789abcdef";
const TIMEOUT: Duration = Duration::from_millis(2500);

fn remote(replies: Vec<Reply>) -> RemoteClassifier<ScriptedTransport> {
    RemoteClassifier::configure(KEY, TIMEOUT, |_| ScriptedTransport::new(replies))
}

#[test]
fn missing_key_uses_local_engine() {
    let c = RemoteClassifier::configure("", TIMEOUT, |_| ScriptedTransport::new(vec![]));
    assert!(!c.is_remote());
    assert_eq!(block_on(c.classify("I am terrified and scared")), Emotion::Fear);
    assert_eq!(c.last_known(), Emotion::Fear);
}

#[test]
fn placeholder_keys_are_rejected() {
    for key in ["YOUR_API_KEY_GOES_RIGHT_HERE", "paste_your_key_here_please", "short"] {
        let c = RemoteClassifier::configure(key, TIMEOUT, |_| ScriptedTransport::new(vec![]));
        assert!(!c.is_remote(), "{key} should not enable the remote path");
    }
}

#[test]
fn valid_response_updates_momentum() {
    let c = remote(vec![Reply::Text(
        r#"{"emotion":"SAD","intensity":0.8,"intent":"BURDENED"}"#,
    )]);
    assert!(c.is_remote());
    assert_eq!(block_on(c.classify("I failed my exam")), Emotion::Sad);
    assert_eq!(c.last_known(), Emotion::Sad);
}

#[test]
fn timeout_returns_previous_emotion() {
    let c = remote(vec![Reply::Text(r#"{"emotion":"HAPPY"}"#), Reply::Hang]);
    assert_eq!(block_on(c.classify("what a day")), Emotion::Happy);
    assert_eq!(block_on(c.classify("and now?")), Emotion::Happy);
}

#[test]
fn timeout_before_any_success_is_neutral() {
    let c = remote(vec![Reply::Hang]);
    assert_eq!(block_on(c.classify("hello")), Emotion::Neutral);
}

#[test]
fn disgust_folds_onto_angry() {
    let c = remote(vec![Reply::Text(r#"{"emotion":"DISGUST","intensity":0.4}"#)]);
    assert_eq!(block_on(c.classify("that is revolting")), Emotion::Angry);
}

#[test]
fn bad_payloads_keep_momentum() {
    let c = remote(vec![
        Reply::Text(r#"{"emotion":"CALM"}"#),
        Reply::Text("not json at all"),
        Reply::Text(r#"{"emotion":"JOYFUL"}"#),
        Reply::Text(r#"{"emotion":"SAD","intensity":1.5}"#),
        Reply::Fail("connection reset"),
    ]);
    assert_eq!(block_on(c.classify("breathe")), Emotion::Calm);
    for _ in 0..4 {
        assert_eq!(block_on(c.classify("anything")), Emotion::Calm);
    }
}

#[test]
fn direct_transport_starts_from_neutral() {
    let t = ScriptedTransport::new(vec![Reply::Fail("offline")]);
    let c = RemoteClassifier::with_transport(t, TIMEOUT);
    assert!(c.is_remote());
    assert_eq!(block_on(c.classify("the river is slow today")), Emotion::Neutral);
}

#[test]
fn prompt_quotes_the_utterance_safely() {
    let prompt = build_prompt(r#"she said "stop" to me"#);
    assert!(prompt.contains("Input: \"she said 'stop' to me\""));
    for label in REMOTE_LABELS {
        assert!(prompt.contains(label), "prompt is missing {label}");
    }
}

#[test]
fn verdict_errors_are_distinct() {
    assert!(matches!(parse_verdict("nope"), Err(RemoteError::Malformed(_))));
    assert!(matches!(
        parse_verdict(r#"{"intensity":0.5}"#),
        Err(RemoteError::Malformed(_))
    ));
    assert_eq!(
        parse_verdict(r#"{"emotion":"JOY"}"#),
        Err(RemoteError::UnrecognizedLabel("JOY".into()))
    );
    assert!(matches!(
        parse_verdict(r#"{"emotion":"SAD","intensity":-0.1}"#),
        Err(RemoteError::Malformed(_))
    ));
}

#[test]
fn verdict_keeps_optional_fields() {
    let v = parse_verdict(r#"{"emotion":"sad","intensity":0.8,"intent":"BURDENED"}"#).unwrap();
    assert_eq!(v.emotion, Emotion::Sad);
    assert_eq!(v.intensity, Some(0.8));
    assert_eq!(v.intent, Some(Intent::Burdened));
}

#[test]
fn request_asks_for_json_reply() {
    let body = request_body("hello there");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "hello there");
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
}
