//! Verse table for the guidance loop and the heuristic that picks one.

use crate::classifier::AnalysisResult;
use crate::emotion::{Emotion, Intent};
use rand::prelude::*;
use smallvec::SmallVec;

#[derive(Debug, PartialEq, Eq)]
pub struct Verse {
    pub sanskrit: &'static str,
    pub translation: &'static str,
    pub meaning: &'static str,
    pub keywords: &'static [&'static str],
    /// Full recitation, preferred over `sanskrit` when speaking.
    pub voiceover: Option<&'static str>,
}

impl Verse {
    pub fn recitation(&self) -> &'static str {
        self.voiceover.unwrap_or(self.sanskrit)
    }
}

static HAPPY: [Verse; 2] = [
    Verse {
        sanskrit: "विश्वं दर्पणदृश्यमाननगरीतुल्यं निजान्तर्गतं",
        translation: "Vishvam darpana-drishyamana-nagari-tulyam nijantargatam",
        meaning: "The entire universe is like a city seen within a mirror, existing within oneself. Your joy is a reflection of the infinite bliss within you.",
        keywords: &["joy", "happy", "bliss", "mirror", "reflection"],
        voiceover: Some("Viśvaṃ darpaṇa-dṛśyamāna-nagari-tulyaṃ nijāntargataṃ paśyann-ātmani māyayā bahir-ivodbhūtaṃ yathā nidrayā | yaḥ sākṣāt-kurute prabodha-samaye svātmānam-evādvayaṃ tasmai śrī-guru-mūrtaye nama idaṃ śrī-dakṣiṇāmūrtaye"),
    },
    Verse {
        sanskrit: "यस्यैव स्फुरणं सदात्मकमसत्कल्पार्थगं",
        translation: "Yasyaiva sphuranam sadatmakam asatkalparthagam",
        meaning: "By whose vibration alone this unreal world appears as real. Celebrate this moment, for it is the dance of your own consciousness.",
        keywords: &["dance", "celebrate", "real", "vibration"],
        voiceover: None,
    },
];

static SAD: [Verse; 2] = [
    Verse {
        sanskrit: "रोगार्तः करुणाकरां",
        translation: "Rogartah karunakaram",
        meaning: "Like a healer to the sick, the Self heals all sorrow. Do not be attached to this grief; it is but a cloud passing over the sun of your soul.",
        keywords: &["sad", "grief", "pain", "sorrow", "hurt", "cloud"],
        voiceover: None,
    },
    Verse {
        sanskrit: "नाहं देहो नेन्द्रियाण्यन्तराङ्गो",
        translation: "Naham deho nendriyany-antarango",
        meaning: "I am not the body, nor the senses, nor the mind. I am the witness. You are experiencing sadness, but you are not the sadness.",
        keywords: &["witness", "mind", "body", "detached"],
        voiceover: None,
    },
];

static ANGRY: [Verse; 2] = [
    Verse {
        sanskrit: "कोऽयं को मे",
        translation: "Ko'yam ko me",
        meaning: "Who am I? Who belongs to me? This anger arises from attachment. Let go of the 'mine' and find peace.",
        keywords: &["angry", "rage", "mine", "attachment", "fight"],
        voiceover: None,
    },
    Verse {
        sanskrit: "शान्तो दान्त उपरतस्तितिक्षुः",
        translation: "Shanto danta uparatastitikshuh",
        meaning: "Be calm, self-controlled, and patient. The fire of anger burns the vessel that holds it.",
        keywords: &["fire", "burn", "calm", "patient"],
        voiceover: None,
    },
];

static FEAR: [Verse; 2] = [
    Verse {
        sanskrit: "यस्मात्परं नापरमस्ति किञ्चित्",
        translation: "Yasmat-param naparam-asti kinchit",
        meaning: "There is nothing other than the Self. Of whom should you be afraid? Fear is a shadow where there is no duality.",
        keywords: &["fear", "scared", "afraid", "shadow", "ghost"],
        voiceover: None,
    },
    Verse {
        sanskrit: "अभयं सत्त्वसंशुद्धिः",
        translation: "Abhayam sattva-samshuddhih",
        meaning: "Fearlessness is the purity of existence. Stand firm, O seeker, for you are eternal.",
        keywords: &["eternal", "brave", "courage", "protect"],
        voiceover: None,
    },
];

static SURPRISED: [Verse; 1] = [Verse {
    sanskrit: "चित्रं वटतरोर्मूले",
    translation: "Chitram vata-taror-mule",
    meaning: "It is a wonder! Under the banyan tree, the Guru is young, the disciples are old. The universe is full of divine surprises.",
    keywords: &["wow", "shock", "wonder", "surprise", "miracle"],
    voiceover: None,
}];

static CALM: [Verse; 1] = [Verse {
    sanskrit: "मौकव्याख्याप्रकटितपरब्रह्मतत्त्वं",
    translation: "Mauna-vyakhya-prakatita-para-brahma-tattvam",
    meaning: "The highest truth is revealed through silence. In your deep silence, you touch the infinite.",
    keywords: &["silence", "quiet", "peace", "calm", "meditate"],
    voiceover: None,
}];

static NEUTRAL: [Verse; 1] = [Verse {
    sanskrit: "तस्मै श्रीगुरुमूर्तये नम इदं श्रीदक्षिणामूर्तये",
    translation: "Tasmai Shri-Guru-murtaye nama idam Shri-Dakshinamurtaye",
    meaning: "Salutations to that Guru, who is the embodiment of the Self. Keep your mind steady on this truth.",
    keywords: &["guru", "self", "steady", "hello", "hi"],
    voiceover: None,
}];

/// Used only if an emotion's list is ever empty.
pub static GENERAL: [Verse; 1] = [Verse {
    sanskrit: "ओमित्येकक्षरं ब्रह्म",
    translation: "Om ityekaksharam Brahma",
    meaning: "OM is the one imperishable Brahman. Remember the sound of the universe.",
    keywords: &[],
    voiceover: None,
}];

pub fn verses_for(emotion: Emotion) -> &'static [Verse] {
    let list: &'static [Verse] = match emotion {
        Emotion::Happy => &HAPPY,
        Emotion::Sad => &SAD,
        Emotion::Angry => &ANGRY,
        Emotion::Fear => &FEAR,
        Emotion::Surprised => &SURPRISED,
        Emotion::Calm => &CALM,
        Emotion::Neutral => &NEUTRAL,
    };
    if list.is_empty() {
        &GENERAL
    } else {
        list
    }
}

pub fn speech_rate(intent: Intent) -> f32 {
    match intent {
        Intent::Burdened => 0.75,
        Intent::Celebrating => 0.95,
        Intent::Confused => 0.9,
        _ => 0.85,
    }
}

/// Candidate list: the primary emotion's verses plus the lists pulled in by
/// intent.
pub fn candidates(primary: Emotion, intent: Intent) -> SmallVec<[&'static Verse; 8]> {
    let mut out: SmallVec<[&'static Verse; 8]> = verses_for(primary).iter().collect();
    if intent == Intent::SeekingPeace && primary != Emotion::Calm {
        out.extend(verses_for(Emotion::Calm));
    }
    if intent == Intent::Burdened && primary != Emotion::Sad {
        out.extend(verses_for(Emotion::Sad));
    }
    if intent == Intent::Confused {
        out.extend(verses_for(Emotion::Angry));
    }
    out
}

pub fn score(verse: &Verse, transcript_lower: &str, analysis: &AnalysisResult) -> i32 {
    let text = format!("{}{}", verse.meaning, verse.translation).to_lowercase();
    let mut score = 2 * verse
        .keywords
        .iter()
        .filter(|k| transcript_lower.contains(*k))
        .count() as i32;
    for theme in &analysis.themes {
        if text.contains(&theme.label().to_lowercase()) {
            score += 3;
        }
    }
    match analysis.intent {
        Intent::SeekingPeace if text.contains("peace") || text.contains("silence") => score += 5,
        Intent::Burdened if text.contains("heals") || text.contains("sorrow") => score += 5,
        _ => {}
    }
    score
}

/// What the guide says back.
#[derive(Clone, Debug, PartialEq)]
pub struct Wisdom {
    pub verse: &'static Verse,
    pub intro: String,
    pub recitation: &'static str,
    pub meaning: String,
    pub rate: f32,
}

/// Pick the best verse for `transcript`. Ties keep the first candidate; a
/// best score of zero or less picks at random from the primary list.
pub fn select(
    transcript: &str,
    analysis: &AnalysisResult,
    primary: Emotion,
    rng: &mut impl Rng,
) -> Wisdom {
    let lower = transcript.to_lowercase();
    let mut best: Option<(&'static Verse, i32)> = None;
    for verse in candidates(primary, analysis.intent) {
        let s = score(verse, &lower, analysis);
        if best.map_or(true, |(_, top)| s > top) {
            best = Some((verse, s));
        }
    }
    let verse = match best {
        Some((v, s)) if s > 0 => v,
        _ => {
            let list = verses_for(primary);
            list.choose(rng).unwrap_or(&GENERAL[0])
        }
    };
    Wisdom {
        verse,
        intro: format!("I sense {}.", analysis.intent.spoken()),
        recitation: verse.recitation(),
        meaning: format!("{}. {}", verse.meaning, verse.translation),
        rate: speech_rate(analysis.intent),
    }
}
