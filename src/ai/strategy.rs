//! Dating strategies and the post-processor that rewrites a styled
//! suggestion and picks the coaching tip.
//!
//! Dispatch is stateless per call; there are no transitions between
//! strategies. Accelerated Connection is the only branch that reads the
//! openness score produced by the analyzer.

use super::analysis::DialogueAnalysis;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum DatingStrategy {
    #[default]
    Balanced,
    AcceleratedConnection,
    DeepConnection,
    SocialExploration,
}

impl DatingStrategy {
    pub const ALL: [DatingStrategy; 4] = [
        DatingStrategy::Balanced,
        DatingStrategy::AcceleratedConnection,
        DatingStrategy::DeepConnection,
        DatingStrategy::SocialExploration,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Balanced => "Balanced Approach",
            Self::AcceleratedConnection => "Accelerated Connection",
            Self::DeepConnection => "Deep Connection",
            Self::SocialExploration => "Social Exploration",
        }
    }

    /// Stored name, e.g. `ACCELERATED_CONNECTION`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Balanced => "BALANCED",
            Self::AcceleratedConnection => "ACCELERATED_CONNECTION",
            Self::DeepConnection => "DEEP_CONNECTION",
            Self::SocialExploration => "SOCIAL_EXPLORATION",
        }
    }

    /// Parse a stored name or display name. Unknown values fall back to Balanced.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.name() == trimmed || s.display_name() == trimmed)
            .unwrap_or_else(|| {
                if !trimmed.is_empty() {
                    tracing::warn!(name = trimmed, "unknown dating strategy, using Balanced");
                }
                Self::Balanced
            })
    }
}

impl From<String> for DatingStrategy {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl fmt::Display for DatingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ── Coaching tips ──────────────────────────────────────────

const HIGH_OPENNESS: u8 = 75;
const LOW_OPENNESS: u8 = 50;
const TIP_INTENT_CONFIDENCE: f32 = 0.6;

pub const BALANCED_TIP: &str = "Keep the conversation balanced and engaging.";
pub const BALANCED_STRATEGY_TIP: &str =
    "Tip (Balanced): Maintain a good conversational flow, balancing listening and sharing.";

/// Tip derived from the analysis alone, used when a strategy sets none.
/// Intent tips override emotion tips.
pub fn analysis_tip(analysis: &DialogueAnalysis) -> &'static str {
    if let Some(intent) = &analysis.intent {
        if intent.confidence > TIP_INTENT_CONFIDENCE {
            match intent.primary_intent.as_str() {
                "making_plans" => {
                    return "Looks like there's interest in meeting up. Consider suggesting a concrete idea if the moment feels right.";
                }
                "info_seeking" => {
                    return "They're asking questions. Be open and answer thoughtfully to build rapport.";
                }
                _ => {}
            }
        }
    }

    match analysis.emotion_label() {
        Some("happy") => "Positive vibe! Now's a great time to share more or ask something fun.",
        Some("curious") => "They seem curious. Encourage their questions or ask one back!",
        Some("sad") | Some("frustrated") => {
            "Sense some negativity. Tread carefully, offer support if appropriate."
        }
        _ => BALANCED_TIP,
    }
}

// ── Post-processor ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    pub suggestion: String,
    pub coaching_tip: String,
    /// Diagnostic only; logged, never shown.
    pub note: String,
}

/// Rewrite the styled suggestion for `strategy` and choose the coaching tip.
pub fn apply_strategy(
    suggestion: &str,
    analysis: &DialogueAnalysis,
    strategy: DatingStrategy,
) -> StrategyOutcome {
    let mut note = format!("Strategy: {}.", strategy.display_name());

    let (final_text, tip) = match strategy {
        DatingStrategy::AcceleratedConnection => {
            let score = analysis.openness_score;
            let text = match score {
                Some(s) if s > HIGH_OPENNESS => {
                    note.push_str(&format!(" High openness ({s}) prompted very direct suggestion."));
                    format!(
                        "With their high openness ({s}/100), be bold: 'This is great, let's meet up! How about [day]?'"
                    )
                }
                Some(s) if s < LOW_OPENNESS => {
                    note.push_str(&format!(
                        " Moderate openness ({s}) prompted casual direct suggestion."
                    ));
                    format!(
                        "Openness is moderate ({s}/100). A casual invite could work: 'Enjoying this chat! Fancy a coffee sometime soon?'"
                    )
                }
                Some(s) => {
                    note.push_str(&format!(" Good openness ({s}) supported direct approach."));
                    format!(
                        "Openness ({s}/100) looks good. To speed things up: {suggestion} How about suggesting a quick call or meeting?"
                    )
                }
                None => {
                    tracing::warn!("accelerated connection without openness score");
                    note.push_str(" Made suggestion more direct (no openness score available).");
                    format!(
                        "To speed things up: {suggestion} How about suggesting a quick call or meeting up soon?"
                    )
                }
            };
            let shown = score.map_or_else(|| "N/A".to_string(), |s| s.to_string());
            let tip = format!(
                "Tip (Accelerated): Openness score: {shown}. Be bold if high, or proceed with a casual invite if moderate."
            );
            (text, Some(tip))
        }
        DatingStrategy::DeepConnection => {
            let topic = analysis.first_keyword().unwrap_or("values or future goals");
            note.push_str(&format!(" Added a prompt for deeper conversation around '{topic}'."));
            (
                format!(
                    "For a deeper connection: {suggestion} What are their thoughts on {topic}?"
                ),
                Some(
                    "Tip (Deep): Look for opportunities to discuss values, dreams, or significant experiences."
                        .to_string(),
                ),
            )
        }
        DatingStrategy::SocialExploration => {
            note.push_str(" Framed suggestion towards social aspects.");
            (
                format!(
                    "For social exploration: {suggestion} Is this something they enjoy with friends or a way to meet new people?"
                ),
                Some(
                    "Tip (Social): Keep it light, explore shared activities, and be open to group interactions."
                        .to_string(),
                ),
            )
        }
        DatingStrategy::Balanced => {
            note.push_str(" Maintained balanced approach.");
            (
                suggestion.to_string(),
                Some(BALANCED_STRATEGY_TIP.to_string()),
            )
        }
    };

    let coaching_tip = tip.unwrap_or_else(|| analysis_tip(analysis).to_string());

    tracing::info!(note = %note, tip = %coaching_tip, "applied dating strategy");

    StrategyOutcome {
        suggestion: final_text,
        coaching_tip,
        note,
    }
}
