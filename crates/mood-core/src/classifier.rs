//! Local rule-based sentiment and intent engine.
//!
//! Two match rules coexist on purpose: the sentiment lexicons match a token
//! by *prefix* (`"lost"` hits `"lost"`, `"lonely"` hits `"lonely..."`), while
//! theme keywords match anywhere *inside* a token. Verse scoring downstream
//! was tuned against exactly this asymmetry, so it is kept as is.
//!
//! The decision tree is evaluated in strict priority order; the first branch
//! that fires wins. A CALM verdict with clearly negative valence is then
//! corrected to SAD so stillness vocabulary cannot mask sadness.

use crate::emotion::{Emotion, Intent, Theme};
use smallvec::SmallVec;

pub type Themes = SmallVec<[Theme; 7]>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    /// 0..1
    pub energy: f64,
    /// -1..1
    pub valence: f64,
    /// 0..1
    pub confidence: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisResult {
    pub emotion: Emotion,
    pub intent: Intent,
    pub metrics: Metrics,
    /// Detected themes in first-seen order, without duplicates.
    pub themes: Themes,
}

impl AnalysisResult {
    pub fn has_theme(&self, theme: Theme) -> bool {
        self.themes.contains(&theme)
    }
}

// `calm` and `peace` are deliberately absent: they are STILLNESS keywords and
// would otherwise push restful phrases into the HAPPY branch.
const POSITIVE: &[&str] = &[
    "good", "great", "love", "happy", "joy", "smile", "yes", "hope", "wonderful", "perfect",
    "nice", "splendid", "awesome", "excited", "amazing", "fantastic", "excellent", "brilliant",
    "beautiful", "lovely",
];

const NEGATIVE: &[&str] = &[
    "bad", "sad", "hate", "angry", "pain", "hurt", "no", "fear", "scared", "cry", "wrong",
    "terrible", "awful", "misery", "gloomy", "depressed", "melancholy", "grief", "broken",
    "lonely", "lost", "fail", "failure", "stress", "worst", "horrible", "stupid", "idiot",
    "useless", "weak", "pathetic",
];

fn theme_keywords(theme: Theme) -> &'static [&'static str] {
    match theme {
        Theme::Heaviness => &[
            "weight", "heavy", "stone", "burden", "carry", "drown", "sink", "pressure", "tired",
            "chain", "drag", "melancholy", "grief", "crushed", "defeat", "despair", "hopeless",
            "empty", "cry", "tears", "sorrow", "blue", "grim", "mourning", "loss", "regret",
            "shame", "guilty", "fail", "failure", "depressed", "gloomy", "miserable", "upset",
            "disappointed", "heartbroken",
        ],
        Theme::Void => &[
            "empty", "nothing", "hollow", "void", "abyss", "gone", "missing", "lost", "dark",
            "black", "silence", "nowhere", "blank", "numb", "dead", "death", "grave",
        ],
        Theme::Light => &[
            "shine", "bright", "sun", "glow", "light", "clear", "see", "vision", "awake",
            "morning", "star", "sparkle", "ray", "beam", "illuminate", "radiant", "brilliant",
            "dazzle",
        ],
        Theme::Flow => &[
            "river", "stream", "flow", "move", "dance", "wind", "breeze", "float", "drift",
            "easy", "smooth", "glide", "sail", "fly", "soar", "bloom", "grow",
        ],
        Theme::Chaos => &[
            "storm", "fire", "burn", "scream", "noise", "loud", "mess", "broken", "shatter",
            "fight", "trap", "rage", "furious", "mad", "annoy", "irritate", "yell", "hate",
            "conflict", "argument", "strike", "punch", "destroy", "smash", "crash", "ruin",
            "violent",
        ],
        Theme::Stillness => &[
            "quiet", "still", "silence", "pause", "wait", "stop", "calm", "peace", "rest",
            "relax", "meditate", "breath", "tranquil", "serene", "gentle", "soft", "slow",
            "content", "soothe", "comfort",
        ],
        Theme::Fear => &[
            "scared", "afraid", "terrified", "horror", "panic", "dread", "worry", "anxious",
            "nervous", "tense", "unease", "shake", "tremble", "nightmare", "danger", "threat",
            "hunt", "run", "hide",
        ],
    }
}

#[inline]
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '!' | '.' | '?')
}

/// Split on runs of separators. The segment count includes an empty leading
/// or trailing segment, so `"what is happening?"` has four segments.
fn tokenize(normalized: &str) -> (usize, SmallVec<[&str; 32]>) {
    let mut runs = 0usize;
    let mut in_run = false;
    for c in normalized.chars() {
        let sep = is_separator(c);
        if sep && !in_run {
            runs += 1;
        }
        in_run = sep;
    }
    let words = normalized
        .split(is_separator)
        .filter(|w| !w.is_empty())
        .collect();
    (runs + 1, words)
}

/// Classify free text. Deterministic: the same input always yields the same
/// result.
pub fn classify(text: &str) -> AnalysisResult {
    let normalized = text.to_lowercase();
    let (segment_count, words) = tokenize(&normalized);

    let mut energy: f64 = 0.5;
    let mut valence: f64 = 0.0;
    if text.contains('!') {
        energy += 0.2;
    }
    if text.contains("...") {
        energy -= 0.2;
    }
    if segment_count < 5 {
        energy -= 0.1;
    }

    let mut pos_count = 0u32;
    let mut neg_count = 0u32;
    let mut themes = Themes::new();

    for w in &words {
        if POSITIVE.iter().any(|k| w.starts_with(k)) {
            valence += 0.5;
            pos_count += 1;
        }
        if NEGATIVE.iter().any(|k| w.starts_with(k)) {
            valence -= 0.5;
            neg_count += 1;
        }
        for theme in Theme::ALL {
            if !themes.contains(&theme) && theme_keywords(theme).iter().any(|k| w.contains(k)) {
                themes.push(theme);
            }
        }
    }

    let energy = energy.clamp(0.0, 1.0);
    let valence = valence.clamp(-1.0, 1.0);
    let has = |t: Theme| themes.contains(&t);

    let (mut emotion, mut intent, confidence) = if has(Theme::Fear) {
        (Emotion::Fear, Intent::Confused, 0.9)
    } else if has(Theme::Chaos)
        || (energy > 0.7 && valence < -0.15)
        || (neg_count > 0 && energy > 0.6)
    {
        (Emotion::Angry, Intent::Confused, 0.8)
    } else if has(Theme::Heaviness)
        || has(Theme::Void)
        || (valence < -0.1 && energy < 0.8)
        || (neg_count > 0 && valence < 0.0)
    {
        (Emotion::Sad, Intent::Burdened, 0.85)
    } else if has(Theme::Light)
        || has(Theme::Flow)
        || (valence > 0.1 && energy > 0.2)
        || (pos_count > 0 && valence > 0.0)
    {
        (Emotion::Happy, Intent::Celebrating, 0.8)
    } else if has(Theme::Stillness) || (energy < 0.4 && valence >= 0.0) {
        (Emotion::Calm, Intent::SeekingPeace, 0.9)
    } else if let Some(&primary) = themes.first() {
        let (e, i) = match primary {
            Theme::Fear => (Emotion::Fear, Intent::Confused),
            Theme::Heaviness | Theme::Void => (Emotion::Sad, Intent::Burdened),
            Theme::Chaos => (Emotion::Angry, Intent::Confused),
            Theme::Light | Theme::Flow => (Emotion::Happy, Intent::Celebrating),
            Theme::Stillness => (Emotion::Calm, Intent::SeekingPeace),
        };
        (e, i, 0.6)
    } else if text.contains('?') {
        (Emotion::Neutral, Intent::Confused, 0.7)
    } else {
        (Emotion::Neutral, Intent::Observing, 0.5)
    };

    if emotion == Emotion::Calm && valence < -0.1 {
        emotion = Emotion::Sad;
        intent = Intent::Burdened;
    }

    log::debug!(
        "[classifier] {} / {} energy={:.2} valence={:.2} confidence={:.2} themes={:?}",
        emotion,
        intent,
        energy,
        valence,
        confidence,
        themes
    );

    AnalysisResult {
        emotion,
        intent,
        metrics: Metrics {
            energy,
            valence,
            confidence,
        },
        themes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_collapses_separator_runs() {
        let (count, words) = tokenize("a, b!! c");
        assert_eq!(count, 3);
        assert_eq!(words.as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn tokenize_counts_trailing_empty_segment() {
        let (count, words) = tokenize("what is happening?");
        assert_eq!(count, 4);
        assert_eq!(words.len(), 3);
    }

    #[test]
    fn empty_text_is_a_single_segment() {
        let (count, words) = tokenize("");
        assert_eq!(count, 1);
        assert!(words.is_empty());
    }
}
