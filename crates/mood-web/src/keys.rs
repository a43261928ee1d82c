// Keyboard shortcuts. Kept free of browser types so the mapping can be
// exercised on the host.

use mood_core::Emotion;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Emotion(Emotion),
    ToggleMute,
    ToggleGuide,
    ToggleCamera,
}

/// Digits 1..=7 pick an emotion in `Emotion::ALL` order.
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "m" | "M" => Some(KeyAction::ToggleMute),
        "v" | "V" => Some(KeyAction::ToggleGuide),
        "c" | "C" => Some(KeyAction::ToggleCamera),
        _ => {
            let digit = key.parse::<usize>().ok()?;
            let idx = digit.checked_sub(1)?;
            Emotion::ALL.get(idx).copied().map(KeyAction::Emotion)
        }
    }
}

/// Shortcuts are ignored while the user is typing into a field.
#[inline]
pub fn is_text_target(tag_name: &str) -> bool {
    matches!(
        tag_name.to_ascii_uppercase().as_str(),
        "INPUT" | "TEXTAREA" | "SELECT"
    )
}
