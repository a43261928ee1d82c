//! Turn-taking guidance loop.
//!
//! The state machine is pure: every input returns the commands the host must
//! carry out (start/stop recognition, speak, classify). The host reports back
//! with `speech_finished`, `partial`, `processed` and friends. Time is passed
//! in as milliseconds.

use crate::classifier;
use crate::constants::{PAUSE_AFTER_INTRO_MS, PAUSE_AFTER_VERSE_MS};
use crate::emotion::Emotion;
use crate::verses::{self, Wisdom};
use rand::prelude::*;
use smallvec::{smallvec, SmallVec};
use std::time::Duration;

pub const GREETING: &str = "I am here. Speak your heart.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuidePhase {
    Idle,
    Listening,
    Processing,
    Speaking,
}

impl GuidePhase {
    pub fn label(self) -> &'static str {
        match self {
            GuidePhase::Idle => "IDLE",
            GuidePhase::Listening => "LISTENING",
            GuidePhase::Processing => "PROCESSING",
            GuidePhase::Speaking => "SPEAKING",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceHint {
    /// Plain English voice.
    Plain,
    /// Voice used for the recited verse.
    Recitation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub text: String,
    pub voice: VoiceHint,
    pub rate: f32,
    pub pitch: f32,
    pub pause_after_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeechPlan {
    pub segments: SmallVec<[Segment; 3]>,
}

impl SpeechPlan {
    pub fn greeting() -> Self {
        Self {
            segments: smallvec![Segment {
                text: GREETING.to_string(),
                voice: VoiceHint::Plain,
                rate: 1.0,
                pitch: 0.8,
                pause_after_ms: 0,
            }],
        }
    }

    /// Intro, recitation, meaning, with the fixed pauses in between.
    pub fn from_wisdom(w: &Wisdom) -> Self {
        Self {
            segments: smallvec![
                Segment {
                    text: w.intro.clone(),
                    voice: VoiceHint::Plain,
                    rate: w.rate,
                    pitch: 0.9,
                    pause_after_ms: PAUSE_AFTER_INTRO_MS,
                },
                Segment {
                    text: w.recitation.to_string(),
                    voice: VoiceHint::Recitation,
                    rate: w.rate,
                    pitch: 0.85,
                    pause_after_ms: PAUSE_AFTER_VERSE_MS,
                },
                Segment {
                    text: w.meaning.clone(),
                    voice: VoiceHint::Plain,
                    rate: w.rate,
                    pitch: 0.9,
                    pause_after_ms: 0,
                },
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GuideCommand {
    StartRecognition,
    StopRecognition,
    CancelSpeech,
    Speak(SpeechPlan),
    /// Run the (possibly remote) classifier on the finished utterance.
    Classify(String),
    EmotionDetected(Emotion),
}

pub type Commands = SmallVec<[GuideCommand; 4]>;

pub struct Guide {
    phase: GuidePhase,
    transcript: String,
    deadline_ms: Option<f64>,
    debounce_ms: f64,
    last_wisdom: Option<Wisdom>,
    rng: StdRng,
}

impl Guide {
    pub fn new(silence_debounce: Duration, seed: u64) -> Self {
        Self {
            phase: GuidePhase::Idle,
            transcript: String::new(),
            deadline_ms: None,
            debounce_ms: silence_debounce.as_secs_f64() * 1000.0,
            last_wisdom: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> GuidePhase {
        self.phase
    }

    /// Live caption while the user is talking.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn last_wisdom(&self) -> Option<&Wisdom> {
        self.last_wisdom.as_ref()
    }

    fn enter(&mut self, next: GuidePhase) {
        if self.phase != next {
            log::debug!("[guide] {} -> {}", self.phase.label(), next.label());
            self.phase = next;
        }
    }

    /// Open the loop with the greeting. Ignored unless idle.
    pub fn activate(&mut self) -> Commands {
        if self.phase != GuidePhase::Idle {
            return Commands::new();
        }
        self.enter(GuidePhase::Speaking);
        smallvec![
            GuideCommand::CancelSpeech,
            GuideCommand::Speak(SpeechPlan::greeting())
        ]
    }

    /// Every segment of the current plan has been spoken (or failed).
    pub fn speech_finished(&mut self) -> Commands {
        if self.phase != GuidePhase::Speaking {
            return Commands::new();
        }
        self.enter(GuidePhase::Listening);
        smallvec![GuideCommand::StartRecognition]
    }

    /// Interim or final recognition result. Ignored unless listening, so the
    /// guide never reacts to its own voice.
    pub fn partial(&mut self, transcript: &str, now_ms: f64) -> Commands {
        if self.phase != GuidePhase::Listening {
            return Commands::new();
        }
        self.transcript.clear();
        self.transcript.push_str(transcript);
        self.deadline_ms = if transcript.trim().is_empty() {
            None
        } else {
            Some(now_ms + self.debounce_ms)
        };
        Commands::new()
    }

    /// Check the silence window.
    pub fn tick(&mut self, now_ms: f64) -> Commands {
        if self.phase != GuidePhase::Listening {
            return Commands::new();
        }
        match self.deadline_ms {
            Some(d) if now_ms >= d => {
                self.deadline_ms = None;
                self.enter(GuidePhase::Processing);
                smallvec![
                    GuideCommand::StopRecognition,
                    GuideCommand::Classify(self.transcript.trim().to_string())
                ]
            }
            _ => Commands::new(),
        }
    }

    /// Result of the `Classify` command. An error is recoverable: the loop
    /// goes back to listening.
    pub fn processed<E: std::fmt::Display>(&mut self, result: Result<Emotion, E>) -> Commands {
        if self.phase != GuidePhase::Processing {
            return Commands::new();
        }
        match result {
            Ok(detected) => {
                let analysis = classifier::classify(&self.transcript);
                let wisdom = verses::select(&self.transcript, &analysis, detected, &mut self.rng);
                log::info!(
                    "[guide] {} / {} at rate {}",
                    detected,
                    analysis.intent,
                    wisdom.rate
                );
                let plan = SpeechPlan::from_wisdom(&wisdom);
                self.last_wisdom = Some(wisdom);
                self.transcript.clear();
                self.enter(GuidePhase::Speaking);
                smallvec![
                    GuideCommand::EmotionDetected(detected),
                    GuideCommand::CancelSpeech,
                    GuideCommand::Speak(plan)
                ]
            }
            Err(e) => {
                log::warn!("[guide] processing failed: {e}");
                self.transcript.clear();
                self.enter(GuidePhase::Listening);
                smallvec![GuideCommand::StartRecognition]
            }
        }
    }

    /// The recognizer stopped on its own; restart it if we still want input.
    pub fn recognition_ended(&mut self) -> Commands {
        if self.phase == GuidePhase::Listening {
            smallvec![GuideCommand::StartRecognition]
        } else {
            Commands::new()
        }
    }

    /// Microphone permission was refused.
    pub fn recognition_denied(&mut self) -> Commands {
        log::warn!("[guide] microphone permission denied");
        self.reset();
        smallvec![GuideCommand::CancelSpeech]
    }

    /// Explicit close from any state.
    pub fn close(&mut self) -> Commands {
        self.reset();
        smallvec![GuideCommand::StopRecognition, GuideCommand::CancelSpeech]
    }

    fn reset(&mut self) {
        self.deadline_ms = None;
        self.transcript.clear();
        self.enter(GuidePhase::Idle);
    }
}
