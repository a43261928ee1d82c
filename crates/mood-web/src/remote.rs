use crate::dom;
use mood_core::remote::{request_body, CompletionTransport, RemoteError};
use mood_core::Credential;
use serde::Deserialize;
use std::time::Duration;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// `generateContent`-style hosted completion over `fetch`.
pub struct FetchTransport {
    endpoint: String,
    credential: Credential,
}

impl FetchTransport {
    pub fn new(endpoint: &str, credential: Credential) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            credential,
        }
    }
}

#[derive(Deserialize)]
struct Completion {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

fn transport_err(e: JsValue) -> RemoteError {
    RemoteError::Transport(format!("{:?}", e))
}

/// The first candidate's first text part.
fn first_text(raw: &str) -> Result<String, RemoteError> {
    let parsed: Completion =
        serde_json::from_str(raw).map_err(|e| RemoteError::Malformed(e.to_string()))?;
    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| RemoteError::Malformed("no candidate text".into()))
}

/// Aborts the request if the call is dropped before the body arrives, which
/// is what happens when the timeout wins the race.
struct AbortOnDrop {
    controller: web::AbortController,
    armed: bool,
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.controller.abort();
        }
    }
}

impl CompletionTransport for FetchTransport {
    async fn complete(&self, prompt: &str) -> Result<String, RemoteError> {
        let body = request_body(prompt);
        let mut abort = AbortOnDrop {
            controller: web::AbortController::new().map_err(transport_err)?,
            armed: true,
        };
        let opts = web::RequestInit::new();
        opts.set_signal(Some(&abort.controller.signal()));
        opts.set_method("POST");
        opts.set_mode(web::RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body.to_string()));

        let url = format!("{}?key={}", self.endpoint, self.credential.expose());
        let request = web::Request::new_with_str_and_init(&url, &opts).map_err(transport_err)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(transport_err)?;

        let window = web::window().ok_or_else(|| RemoteError::Transport("no window".into()))?;
        let response: web::Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport_err)?
            .dyn_into()
            .map_err(transport_err)?;
        if !response.ok() {
            return Err(RemoteError::Transport(format!("HTTP {}", response.status())));
        }
        let text = JsFuture::from(response.text().map_err(transport_err)?)
            .await
            .map_err(transport_err)?
            .as_string()
            .ok_or_else(|| RemoteError::Malformed("body is not text".into()))?;
        abort.armed = false;
        first_text(&text)
    }

    async fn sleep(&self, duration: Duration) {
        dom::sleep_ms(duration.as_millis().min(i32::MAX as u128) as i32).await;
    }
}
