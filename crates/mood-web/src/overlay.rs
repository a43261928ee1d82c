use web_sys as web;

#[inline]
pub fn show(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        let _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        let _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn is_hidden(document: &web::Document, id: &str) -> bool {
    document
        .get_element_by_id(id)
        .and_then(|el| el.get_attribute("style"))
        .map(|s| s.contains("display:none"))
        .unwrap_or(false)
}

#[inline]
pub fn set_visible(document: &web::Document, id: &str, visible: bool) {
    if visible == is_hidden(document, id) {
        if visible {
            show(document, id);
        } else {
            hide(document, id);
        }
    }
}

/// Inline, non-fatal message for one feature (permission denied etc).
pub fn notice(document: &web::Document, id: &str, message: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(message));
        let _ = el.set_attribute("style", "");
    }
}

pub fn clear_notice(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(None);
        let _ = el.set_attribute("style", "display:none");
    }
}
