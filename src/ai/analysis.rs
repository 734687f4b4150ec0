//! Mock Dialogue Analyzer: randomized emotion/intent, deterministic keywords.
//!
//! There is no model behind this. Emotion and intent labels are drawn from
//! fixed tables; keyword extraction is a plain token filter over the input
//! so the same text always yields the same keyword list.

use super::strategy::DatingStrategy;
use crate::utils::text::excerpt;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

// ── Label tables ───────────────────────────────────────────

pub const EMOTION_LABELS: &[&str] = &[
    "happy",
    "curious",
    "neutral",
    "thoughtful",
    "sad",
    "frustrated",
];

pub const INTENT_LABELS: &[&str] = &[
    "casual_chat",
    "info_seeking",
    "making_plans",
    "sharing_opinion",
];

pub const MAX_KEYWORDS: usize = 4;
const MIN_KEYWORD_CHARS: usize = 4;
const SUMMARY_PREFIX_CHARS: usize = 30;

pub const OPENNESS_MIN: u8 = 30;
pub const OPENNESS_MAX: u8 = 95;

// ── Analysis types ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionData {
    pub primary_emotion: String,
    /// 0.0 - 1.0
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentData {
    pub primary_intent: String,
    /// 0.0 - 1.0
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SemanticData {
    pub keywords: Vec<String>,
    pub summary: Option<String>,
}

/// Per-request analysis of the counterpart's message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DialogueAnalysis {
    pub emotion: Option<EmotionData>,
    pub intent: Option<IntentData>,
    pub semantics: Option<SemanticData>,
    /// Only present under the Accelerated Connection strategy (30-95).
    pub openness_score: Option<u8>,
}

impl EmotionData {
    pub fn new(label: &str, intensity: f32) -> Self {
        Self {
            primary_emotion: label.to_string(),
            intensity: intensity.clamp(0.0, 1.0),
        }
    }
}

impl IntentData {
    pub fn new(label: &str, confidence: f32) -> Self {
        Self {
            primary_intent: label.to_string(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

impl DialogueAnalysis {
    pub fn keywords(&self) -> &[String] {
        self.semantics
            .as_ref()
            .map(|s| s.keywords.as_slice())
            .unwrap_or(&[])
    }

    pub fn first_keyword(&self) -> Option<&str> {
        self.keywords().first().map(String::as_str)
    }

    pub fn emotion_label(&self) -> Option<&str> {
        self.emotion.as_ref().map(|e| e.primary_emotion.as_str())
    }

    pub fn intent_label(&self) -> Option<&str> {
        self.intent.as_ref().map(|i| i.primary_intent.as_str())
    }
}

// ── Analyzer ───────────────────────────────────────────────

/// Lower-case, split on whitespace, keep tokens longer than three chars,
/// drop duplicates, keep the first four in original order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut keywords: Vec<String> = Vec::with_capacity(MAX_KEYWORDS);
    for token in lower.split_whitespace() {
        if token.chars().count() < MIN_KEYWORD_CHARS {
            continue;
        }
        if keywords.iter().any(|k| k == token) {
            continue;
        }
        keywords.push(token.to_string());
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
    }
    keywords
}

fn summarize(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    Some(format!("User mentioned: {}...", excerpt(text, SUMMARY_PREFIX_CHARS)))
}

/// Produce a mock analysis for `text` under the active strategy.
pub fn analyze<R: Rng>(text: &str, strategy: DatingStrategy, rng: &mut R) -> DialogueAnalysis {
    let openness_score = match strategy {
        DatingStrategy::AcceleratedConnection => {
            Some(rng.gen_range(OPENNESS_MIN..=OPENNESS_MAX))
        }
        _ => None,
    };

    let emotion_label = EMOTION_LABELS.choose(rng).copied().unwrap_or("neutral");
    let emotion = EmotionData::new(emotion_label, rng.gen_range(0.4f32..=1.0));

    let intent_label = INTENT_LABELS.choose(rng).copied().unwrap_or("casual_chat");
    let intent = IntentData::new(intent_label, rng.gen_range(0.5f32..=1.0));

    let semantics = SemanticData {
        keywords: extract_keywords(text),
        summary: summarize(text),
    };

    let analysis = DialogueAnalysis {
        emotion: Some(emotion),
        intent: Some(intent),
        semantics: Some(semantics),
        openness_score,
    };

    tracing::info!(
        emotion = ?analysis.emotion_label(),
        intent = ?analysis.intent_label(),
        keywords = ?analysis.keywords(),
        openness = ?analysis.openness_score,
        "generated mock analysis"
    );
    analysis
}
