use crate::constants::CONFIG_ID;
use mood_core::MoodConfig;
use web_sys as web;

/// Read the page's embedded JSON config (`<script type="application/json"
/// id="mood-config">`). A missing block means defaults; an invalid one also
/// falls back to defaults and returns the reason so it can be logged once
/// logging is up.
pub fn load(document: &web::Document) -> (MoodConfig, Option<String>) {
    let raw = document
        .get_element_by_id(CONFIG_ID)
        .and_then(|el| el.text_content())
        .unwrap_or_default();
    if raw.trim().is_empty() {
        return (MoodConfig::default(), None);
    }
    match MoodConfig::from_json(&raw) {
        Ok(cfg) => (cfg, None),
        Err(e) => (
            MoodConfig::default(),
            Some(format!("#{CONFIG_ID} ignored: {e}")),
        ),
    }
}
