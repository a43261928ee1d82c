//! The closed emotion set and the labels derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The single state variable that drives the whole scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Fear,
    Calm,
    Surprised,
    Neutral,
}

impl Default for Emotion {
    fn default() -> Self {
        Emotion::Neutral
    }
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fear,
        Emotion::Calm,
        Emotion::Surprised,
        Emotion::Neutral,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Emotion::Happy => "HAPPY",
            Emotion::Sad => "SAD",
            Emotion::Angry => "ANGRY",
            Emotion::Fear => "FEAR",
            Emotion::Calm => "CALM",
            Emotion::Surprised => "SURPRISED",
            Emotion::Neutral => "NEUTRAL",
        }
    }

    /// Exact (case-insensitive) match against the enum labels only.
    pub fn from_label(raw: &str) -> Option<Emotion> {
        let upper = raw.trim().to_ascii_uppercase();
        Emotion::ALL.into_iter().find(|e| e.label() == upper)
    }

    /// Lenient mapping used for labels coming from outside the closed set.
    ///
    /// Face-analysis style labels (`surprise`, `disgust`) are folded onto the
    /// nearest member; `None` means the label is not recognised at all.
    pub fn from_foreign_label(raw: &str) -> Option<Emotion> {
        if let Some(e) = Emotion::from_label(raw) {
            return Some(e);
        }
        match raw.trim().to_ascii_uppercase().as_str() {
            "DISGUST" | "DISGUSTED" => Some(Emotion::Angry),
            "SURPRISE" => Some(Emotion::Surprised),
            "FEARFUL" | "SCARED" => Some(Emotion::Fear),
            _ => None,
        }
    }

    /// Night scenes swap the sun for the moon.
    pub fn is_night(self) -> bool {
        matches!(
            self,
            Emotion::Fear | Emotion::Sad | Emotion::Angry | Emotion::Neutral
        )
    }

    /// Scenes where hero objects sway with the heavy animation.
    pub fn is_windy(self) -> bool {
        matches!(self, Emotion::Angry | Emotion::Surprised)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inferred purpose behind an utterance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    SeekingPeace,
    Burdened,
    Celebrating,
    Confused,
    Observing,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::SeekingPeace,
        Intent::Burdened,
        Intent::Celebrating,
        Intent::Confused,
        Intent::Observing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Intent::SeekingPeace => "SEEKING_PEACE",
            Intent::Burdened => "BURDENED",
            Intent::Celebrating => "CELEBRATING",
            Intent::Confused => "CONFUSED",
            Intent::Observing => "OBSERVING",
        }
    }

    pub fn from_label(raw: &str) -> Option<Intent> {
        let upper = raw.trim().to_ascii_uppercase();
        Intent::ALL.into_iter().find(|i| i.label() == upper)
    }

    /// Spoken form: lower-cased with the first underscore replaced by a space.
    pub fn spoken(self) -> String {
        self.label().to_ascii_lowercase().replacen('_', " ", 1)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse metaphorical category detected from keyword substrings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Theme {
    Heaviness,
    Void,
    Light,
    Flow,
    Chaos,
    Stillness,
    Fear,
}

impl Theme {
    pub const ALL: [Theme; 7] = [
        Theme::Heaviness,
        Theme::Void,
        Theme::Light,
        Theme::Flow,
        Theme::Chaos,
        Theme::Stillness,
        Theme::Fear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Theme::Heaviness => "HEAVINESS",
            Theme::Void => "VOID",
            Theme::Light => "LIGHT",
            Theme::Flow => "FLOW",
            Theme::Chaos => "CHAOS",
            Theme::Stillness => "STILLNESS",
            Theme::Fear => "FEAR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_case_insensitively() {
        for e in Emotion::ALL {
            assert_eq!(Emotion::from_label(&e.label().to_lowercase()), Some(e));
        }
        assert_eq!(Emotion::from_label("joyful"), None);
    }

    #[test]
    fn foreign_labels_fold_onto_nearest_member() {
        assert_eq!(Emotion::from_foreign_label("disgust"), Some(Emotion::Angry));
        assert_eq!(
            Emotion::from_foreign_label("surprise"),
            Some(Emotion::Surprised)
        );
        assert_eq!(Emotion::from_foreign_label("contempt"), None);
    }

    #[test]
    fn spoken_intent_replaces_first_underscore() {
        assert_eq!(Intent::SeekingPeace.spoken(), "seeking peace");
        assert_eq!(Intent::Burdened.spoken(), "burdened");
    }
}
