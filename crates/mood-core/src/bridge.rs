//! Camera-inference bridge: wire messages and the subscriber hub.
//!
//! One connection, many listeners. The hub caches the latest state so a late
//! subscriber is brought up to date immediately, and so one-shot readers can
//! take a snapshot without subscribing.

use crate::constants::DEFAULT_INNER_STATE;
use crate::emotion::Emotion;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("malformed bridge message: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct FrameMessage<'a> {
    image: &'a str,
}

#[derive(Deserialize)]
struct UpdateMessage {
    emotion: Option<String>,
    inner_state: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BridgeState {
    pub emotion: Emotion,
    /// 0..1
    pub inner_state: f32,
}

impl Default for BridgeState {
    fn default() -> Self {
        Self {
            emotion: Emotion::Neutral,
            inner_state: DEFAULT_INNER_STATE,
        }
    }
}

/// Outbound `{ "image": <base64 jpeg> }`.
pub fn encode_frame(base64_jpeg: &str) -> Result<String, BridgeError> {
    Ok(serde_json::to_string(&FrameMessage { image: base64_jpeg })?)
}

/// Inbound `{ "emotion": .., "inner_state": .. }`. Unknown or missing labels
/// become NEUTRAL; a missing inner state becomes 0.5.
pub fn decode_update(raw: &str) -> Result<BridgeState, BridgeError> {
    let msg: UpdateMessage = serde_json::from_str(raw)?;
    let emotion = msg
        .emotion
        .as_deref()
        .and_then(Emotion::from_foreign_label)
        .unwrap_or(Emotion::Neutral);
    let inner_state = msg
        .inner_state
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0) as f32)
        .unwrap_or(DEFAULT_INNER_STATE);
    Ok(BridgeState {
        emotion,
        inner_state,
    })
}

pub type SubscriberId = u64;

type Listener = Box<dyn FnMut(BridgeState)>;

#[derive(Default)]
pub struct BridgeHub {
    latest: BridgeState,
    subscribers: FnvHashMap<SubscriberId, Listener>,
    next_id: SubscriberId,
}

impl BridgeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> BridgeState {
        self.latest
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Register `listener`; it is called right away with the latest state.
    pub fn subscribe<F>(&mut self, mut listener: F) -> SubscriberId
    where
        F: FnMut(BridgeState) + 'static,
    {
        listener(self.latest);
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.insert(id, Box::new(listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    pub fn publish(&mut self, state: BridgeState) {
        self.latest = state;
        for listener in self.subscribers.values_mut() {
            listener(state);
        }
    }

    /// Decode a raw socket message and fan it out. A bad message leaves the
    /// cached state untouched.
    pub fn handle_message(&mut self, raw: &str) -> Result<BridgeState, BridgeError> {
        let state = decode_update(raw)?;
        self.publish(state);
        Ok(state)
    }
}
