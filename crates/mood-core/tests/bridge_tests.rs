// Host-side tests for the camera-inference bridge messages and hub.

use mood_core::bridge::{decode_update, encode_frame, BridgeHub, BridgeState};
use mood_core::Emotion;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn frame_message_wraps_the_payload() {
    let raw = encode_frame("AAAA/9j=").unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["image"], "AAAA/9j=");
}

#[test]
fn inbound_labels_fold_onto_the_closed_set() {
    let cases = [
        (r#"{"emotion":"happy","inner_state":0.9}"#, Emotion::Happy),
        (r#"{"emotion":"DISGUST"}"#, Emotion::Angry),
        (r#"{"emotion":"surprise"}"#, Emotion::Surprised),
        (r#"{"emotion":"contempt"}"#, Emotion::Neutral),
        (r#"{}"#, Emotion::Neutral),
    ];
    for (raw, expected) in cases {
        assert_eq!(decode_update(raw).unwrap().emotion, expected, "{raw}");
    }
}

#[test]
fn inner_state_defaults_and_clamps() {
    assert_eq!(decode_update(r#"{"emotion":"SAD"}"#).unwrap().inner_state, 0.5);
    assert_eq!(decode_update(r#"{"inner_state":1.7}"#).unwrap().inner_state, 1.0);
    assert_eq!(decode_update(r#"{"inner_state":-3}"#).unwrap().inner_state, 0.0);
    assert_eq!(decode_update(r#"{"inner_state":0.25}"#).unwrap().inner_state, 0.25);
}

#[test]
fn subscribers_get_the_latest_state_immediately() {
    let mut hub = BridgeHub::new();
    hub.handle_message(r#"{"emotion":"FEAR","inner_state":0.2}"#).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    hub.subscribe(move |s| sink.borrow_mut().push(s));
    assert_eq!(
        seen.borrow().as_slice(),
        &[BridgeState {
            emotion: Emotion::Fear,
            inner_state: 0.2
        }]
    );
}

#[test]
fn fan_out_and_unsubscribe() {
    let mut hub = BridgeHub::new();
    let a = Rc::new(RefCell::new(0));
    let b = Rc::new(RefCell::new(0));
    let (ca, cb) = (a.clone(), b.clone());
    let id_a = hub.subscribe(move |_| *ca.borrow_mut() += 1);
    hub.subscribe(move |_| *cb.borrow_mut() += 1);
    assert_eq!(hub.subscriber_count(), 2);

    hub.handle_message(r#"{"emotion":"CALM"}"#).unwrap();
    assert_eq!((*a.borrow(), *b.borrow()), (2, 2));

    assert!(hub.unsubscribe(id_a));
    assert!(!hub.unsubscribe(id_a));
    hub.handle_message(r#"{"emotion":"SAD"}"#).unwrap();
    assert_eq!((*a.borrow(), *b.borrow()), (2, 3));
}

#[test]
fn malformed_message_keeps_cached_state() {
    let mut hub = BridgeHub::new();
    assert_eq!(hub.latest(), BridgeState::default());
    hub.handle_message(r#"{"emotion":"ANGRY","inner_state":0.8}"#).unwrap();
    let before = hub.latest();

    assert!(hub.handle_message("not json").is_err());
    assert!(hub.handle_message(r#"{"emotion":42}"#).is_err());
    assert_eq!(hub.latest(), before);
}
