// Host-side keyboard mapping tests.
// The web crate is wasm-only, so the pure key mapping is included directly.

#![allow(dead_code)]

mod keys {
    include!("../src/keys.rs");
}

use keys::{action_for_key, is_text_target, KeyAction};
use mood_core::Emotion;

#[test]
fn digits_follow_emotion_order() {
    for (i, e) in Emotion::ALL.iter().enumerate() {
        let key = (i + 1).to_string();
        assert_eq!(action_for_key(&key), Some(KeyAction::Emotion(*e)));
    }
}

#[test]
fn out_of_range_digits_are_ignored() {
    assert_eq!(action_for_key("0"), None);
    assert_eq!(action_for_key("8"), None);
    assert_eq!(action_for_key("-1"), None);
}

#[test]
fn letter_shortcuts_ignore_case() {
    assert_eq!(action_for_key("m"), Some(KeyAction::ToggleMute));
    assert_eq!(action_for_key("M"), Some(KeyAction::ToggleMute));
    assert_eq!(action_for_key("v"), Some(KeyAction::ToggleGuide));
    assert_eq!(action_for_key("C"), Some(KeyAction::ToggleCamera));
    assert_eq!(action_for_key("x"), None);
    assert_eq!(action_for_key("Enter"), None);
}

#[test]
fn typing_targets_are_detected() {
    assert!(is_text_target("INPUT"));
    assert!(is_text_target("textarea"));
    assert!(!is_text_target("DIV"));
    assert!(!is_text_target("BUTTON"));
}
