//! Hosted text classification with "emotional momentum".
//!
//! The hosted call is untrusted and may be slow. Every failure path returns
//! the last emotion that was successfully classified instead of snapping back
//! to NEUTRAL, so transient trouble never shows up as scene flicker.

use crate::classifier;
use crate::config::Credential;
use crate::emotion::{Emotion, Intent};
use futures_util::future::{self, Either};
use futures_util::pin_mut;
use serde::Deserialize;
use std::cell::Cell;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RemoteError {
    #[error("request timed out")]
    Timeout,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("unrecognized emotion label {0:?}")]
    UnrecognizedLabel(String),
}

/// One-shot prompt completion against some hosted model.
///
/// `sleep` lives on the transport so the timeout race runs on whatever
/// timer the host platform provides.
#[allow(async_fn_in_trait)]
pub trait CompletionTransport {
    async fn complete(&self, prompt: &str) -> Result<String, RemoteError>;
    async fn sleep(&self, duration: Duration);
}

/// Validated remote answer.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteVerdict {
    pub emotion: Emotion,
    pub intensity: Option<f64>,
    pub intent: Option<Intent>,
}

#[derive(Deserialize)]
struct RawVerdict {
    emotion: Option<String>,
    intensity: Option<f64>,
    intent: Option<String>,
}

/// The label set offered to the model. DISGUST is folded onto ANGRY on the
/// way back in.
pub const REMOTE_LABELS: [&str; 7] = ["NEUTRAL", "HAPPY", "SAD", "ANGRY", "FEAR", "CALM", "DISGUST"];

pub fn build_prompt(text: &str) -> String {
    // Keep the utterance from closing the quoted input early.
    let quoted = text.replace('"', "'");
    format!(
        "You are the emotional core of a Spirit Guide. Your task is to detect the latent emotion \
         and spiritual intent behind user speech.\n\n\
         Categorize into: {labels}.\n\n\
         Critical Rule: Recognize that failure (exams, jobs), loss (death, breakups), and \
         stagnation (boredom, stuck) are SAD. Recognize that friction, injustice, and noise are \
         ANGRY.\n\n\
         Input: \"{quoted}\"\n\n\
         Respond with a strict JSON object only: \
         {{ \"emotion\": \"SAD\", \"intensity\": 0.8, \"intent\": \"BURDENED\" }}.",
        labels = REMOTE_LABELS.join(", "),
    )
}

/// `generateContent` request body asking for a JSON-only reply.
pub fn request_body(prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": { "responseMimeType": "application/json" },
    })
}

fn strip_fences(raw: &str) -> &str {
    let body = raw.trim();
    let Some(rest) = body.strip_prefix("```") else {
        return body;
    };
    // Drop an optional language tag on the opening fence.
    let rest = rest.split_once('\n').map(|(_, tail)| tail).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse and validate a model response. Nothing in it is trusted.
pub fn parse_verdict(raw: &str) -> Result<RemoteVerdict, RemoteError> {
    let parsed: RawVerdict = serde_json::from_str(strip_fences(raw))
        .map_err(|e| RemoteError::Malformed(e.to_string()))?;
    let label = parsed
        .emotion
        .ok_or_else(|| RemoteError::Malformed("missing emotion field".into()))?;
    let emotion = Emotion::from_foreign_label(&label)
        .ok_or_else(|| RemoteError::UnrecognizedLabel(label.clone()))?;
    if let Some(v) = parsed.intensity {
        if !v.is_finite() || !(0.0..=1.0).contains(&v) {
            return Err(RemoteError::Malformed(format!("intensity {v} out of range")));
        }
    }
    let intent = parsed.intent.as_deref().and_then(Intent::from_label);
    Ok(RemoteVerdict {
        emotion,
        intensity: parsed.intensity,
        intent,
    })
}

pub struct RemoteClassifier<T> {
    transport: Option<T>,
    timeout: Duration,
    last: Cell<Emotion>,
}

impl<T: CompletionTransport> RemoteClassifier<T> {
    /// Build from a raw credential. A missing or placeholder credential
    /// degrades to the local engine; this is logged here and nowhere else.
    pub fn configure<F>(api_key: &str, timeout: Duration, build: F) -> Self
    where
        F: FnOnce(Credential) -> T,
    {
        match Credential::parse(api_key) {
            Ok(cred) => {
                log::info!("[remote] using hosted classifier (key {})", cred.masked());
                Self::with_transport(build(cred), timeout)
            }
            Err(e) => {
                log::warn!("[remote] {e}; using local heuristic engine");
                Self::local(timeout)
            }
        }
    }

    pub fn with_transport(transport: T, timeout: Duration) -> Self {
        Self {
            transport: Some(transport),
            timeout,
            last: Cell::new(Emotion::Neutral),
        }
    }

    pub fn local(timeout: Duration) -> Self {
        Self {
            transport: None,
            timeout,
            last: Cell::new(Emotion::Neutral),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.transport.is_some()
    }

    /// Last successfully classified emotion; NEUTRAL before the first one.
    pub fn last_known(&self) -> Emotion {
        self.last.get()
    }

    /// Classify `text`. Never fails: errors resolve to the last known emotion.
    pub async fn classify(&self, text: &str) -> Emotion {
        let Some(transport) = &self.transport else {
            let emotion = classifier::classify(text).emotion;
            self.last.set(emotion);
            return emotion;
        };
        match self.request(transport, text).await {
            Ok(verdict) => {
                log::info!(
                    "[remote] {} (intensity {:?}, intent {:?})",
                    verdict.emotion,
                    verdict.intensity,
                    verdict.intent
                );
                self.last.set(verdict.emotion);
                verdict.emotion
            }
            Err(err) => {
                let reason = match &err {
                    RemoteError::Timeout => "timeout",
                    RemoteError::Transport(_) => "transport",
                    RemoteError::Malformed(_) => "malformed",
                    RemoteError::UnrecognizedLabel(_) => "unrecognized label",
                };
                log::warn!(
                    "[remote] {reason}: {err}; keeping {}",
                    self.last.get()
                );
                self.last.get()
            }
        }
    }

    async fn request(&self, transport: &T, text: &str) -> Result<RemoteVerdict, RemoteError> {
        let prompt = build_prompt(text);
        let call = transport.complete(&prompt);
        let timer = transport.sleep(self.timeout);
        pin_mut!(call);
        pin_mut!(timer);
        match future::select(call, timer).await {
            Either::Left((response, _)) => parse_verdict(&response?),
            Either::Right(((), _)) => Err(RemoteError::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_is_unwrapped() {
        let raw = "```json\n{\"emotion\":\"sad\"}\n```";
        assert_eq!(parse_verdict(raw).map(|v| v.emotion), Ok(Emotion::Sad));
    }

    #[test]
    fn prompt_lists_label_set_and_quotes_input() {
        let p = build_prompt("say \"hi\"");
        assert!(p.contains("NEUTRAL, HAPPY, SAD, ANGRY, FEAR, CALM, DISGUST"));
        assert!(p.contains("Input: \"say 'hi'\""));
    }
}
