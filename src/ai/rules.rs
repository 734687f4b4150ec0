//! Suggestion Rule Engine: picks the base suggestion.
//!
//! Rules are evaluated in the fixed order of [`PRIORITY`]; the first one that
//! fires wins and the rest are skipped. The generic fallback only runs when
//! none of them fire.

use super::analysis::DialogueAnalysis;
use super::knowledge::KnowledgeSnippet;
use crate::utils::text::excerpt;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt;

pub const SNIPPET_EXCERPT_CHARS: usize = 30;

const HAPPY_INTENSITY: f32 = 0.7;
const LOW_MOOD_INTENSITY: f32 = 0.6;
const MAKING_PLANS_CONFIDENCE: f32 = 0.7;
const INFO_SEEKING_CONFIDENCE: f32 = 0.65;

pub const INTEREST_KEYWORDS: &[(&str, &str)] = &[
    ("music", "What kind of music do you enjoy?"),
    ("travel", "Any favorite travel destinations?"),
    ("food", "Tried any good restaurants lately?"),
    ("movie", "Seen any good movies recently?"),
    ("book", "Reading any interesting books?"),
];

pub const GENERIC_FALLBACKS: &[&str] = &[
    "That's interesting, tell me more.",
    "What are your thoughts on that?",
    "Cool!",
    "I see. Anything else on your mind?",
    "Gotcha.",
];

/// Why a base suggestion was chosen. `Display` gives the machine-readable tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SuggestionReason {
    Knowledge { snippet_id: u64, excerpt: String },
    Emotion { emotion: String },
    Intent { intent: String },
    Keyword { keyword: String },
    Fallback { keyword: Option<String> },
}

impl fmt::Display for SuggestionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Knowledge { snippet_id, .. } => write!(f, "used snippet {}", snippet_id),
            Self::Emotion { emotion } => write!(f, "detected {}", emotion),
            Self::Intent { intent } => write!(f, "detected intent {}", intent),
            Self::Keyword { keyword } => write!(f, "detected keyword {}", keyword),
            Self::Fallback { keyword } => {
                write!(f, "fallback, keyword {}", keyword.as_deref().unwrap_or("none"))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaseSuggestion {
    pub text: String,
    pub reason: SuggestionReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    KnowledgeGrounded,
    StrongEmotion,
    StrongIntent,
    InterestKeyword,
}

pub const PRIORITY: [Rule; 4] = [
    Rule::KnowledgeGrounded,
    Rule::StrongEmotion,
    Rule::StrongIntent,
    Rule::InterestKeyword,
];

impl Rule {
    pub fn evaluate(
        self,
        analysis: &DialogueAnalysis,
        snippet: Option<&KnowledgeSnippet>,
    ) -> Option<BaseSuggestion> {
        match self {
            Rule::KnowledgeGrounded => snippet.map(knowledge_grounded),
            Rule::StrongEmotion => strong_emotion(analysis),
            Rule::StrongIntent => strong_intent(analysis),
            Rule::InterestKeyword => interest_keyword(analysis),
        }
    }
}

fn knowledge_grounded(snippet: &KnowledgeSnippet) -> BaseSuggestion {
    let short = excerpt(&snippet.text, SNIPPET_EXCERPT_CHARS);
    BaseSuggestion {
        text: format!(
            "Remembering you mentioned '{short}', how about you say: 'Let's discuss that more!' or perhaps ask about their thoughts on similar topics?"
        ),
        reason: SuggestionReason::Knowledge {
            snippet_id: snippet.id,
            excerpt: short.to_string(),
        },
    }
}

fn strong_emotion(analysis: &DialogueAnalysis) -> Option<BaseSuggestion> {
    let emotion = analysis.emotion.as_ref()?;
    let text = match emotion.primary_emotion.as_str() {
        "happy" if emotion.intensity > HAPPY_INTENSITY => {
            "They seem happy! You could say: 'Glad to hear you're feeling good! What's got you in high spirits?'"
        }
        "sad" | "frustrated" if emotion.intensity > LOW_MOOD_INTENSITY => {
            "It sounds like they might be feeling down. Maybe offer some support, like: 'I'm here if you want to talk about it.'"
        }
        _ => return None,
    };
    Some(BaseSuggestion {
        text: text.to_string(),
        reason: SuggestionReason::Emotion {
            emotion: emotion.primary_emotion.clone(),
        },
    })
}

fn strong_intent(analysis: &DialogueAnalysis) -> Option<BaseSuggestion> {
    let intent = analysis.intent.as_ref()?;
    let text = match intent.primary_intent.as_str() {
        "making_plans" if intent.confidence > MAKING_PLANS_CONFIDENCE => {
            "Since they seem interested in making plans, how about suggesting: 'Would you be free to [activity] next [day]?'"
        }
        "info_seeking" if intent.confidence > INFO_SEEKING_CONFIDENCE => {
            "They seem to be looking for info. Maybe ask: 'Is there anything specific I can help you find out about that?'"
        }
        _ => return None,
    };
    Some(BaseSuggestion {
        text: text.to_string(),
        reason: SuggestionReason::Intent {
            intent: intent.primary_intent.clone(),
        },
    })
}

fn interest_keyword(analysis: &DialogueAnalysis) -> Option<BaseSuggestion> {
    analysis.keywords().iter().find_map(|kw| {
        INTEREST_KEYWORDS
            .iter()
            .find(|(interest, _)| interest == kw)
            .map(|(_, follow_up)| BaseSuggestion {
                text: format!("They mentioned '{kw}'! A good follow-up would be: '{follow_up}'"),
                reason: SuggestionReason::Keyword {
                    keyword: kw.clone(),
                },
            })
    })
}

fn fallback<R: Rng>(analysis: &DialogueAnalysis, rng: &mut R) -> BaseSuggestion {
    let line = GENERIC_FALLBACKS
        .choose(rng)
        .copied()
        .unwrap_or("That's interesting, tell me more.");
    let keyword = analysis.first_keyword().map(str::to_string);
    let text = match &keyword {
        Some(kw) => format!("Regarding '{kw}', you could say: '{line}'"),
        None => format!("You could respond with: '{line}'"),
    };
    BaseSuggestion {
        text,
        reason: SuggestionReason::Fallback { keyword },
    }
}

/// Run the priority chain, falling back to a random generic line.
pub fn select_suggestion<R: Rng>(
    analysis: &DialogueAnalysis,
    snippet: Option<&KnowledgeSnippet>,
    rng: &mut R,
) -> BaseSuggestion {
    let chosen = PRIORITY
        .iter()
        .find_map(|rule| rule.evaluate(analysis, snippet))
        .unwrap_or_else(|| fallback(analysis, rng));
    tracing::info!(reason = %chosen.reason, "base suggestion selected");
    chosen
}
