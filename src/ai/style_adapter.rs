//! Style Transformer: mutates a suggestion by the user's style preferences.
//!
//! Three fixed passes, each applied to the previous result:
//! formality, then humor, then enthusiasm. Every pass that changes the text
//! is recorded as a [`StyleEffect`] for the explanation.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const HIGH_HUMOR: f32 = 0.7;
pub const MEDIUM_HUMOR: f32 = 0.3;

pub const FORMAL_LEAD_IN: &str = "Considering a formal approach: ";
pub const CASUAL_CLOSER: &str = " Wanna keep it chill?";
pub const JOKE_SUFFIX: &str =
    " ...and that's why the programmer quit his job, he didn't get arrays! ;)";
pub const CHUCKLE_SUFFIX: &str = " Heh, nice.";
pub const EXCITED_CLOSER: &str = " Sounds super exciting!!!";
pub const MELLOW_NOTE: &str = " (Just keeping it mellow).";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Formality {
    Low,
    #[default]
    Medium,
    High,
}

impl Formality {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

impl From<String> for Formality {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Enthusiasm {
    Calm,
    #[default]
    Neutral,
    Enthusiastic,
}

impl Enthusiasm {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "calm" => Self::Calm,
            "enthusiastic" => Self::Enthusiastic,
            _ => Self::Neutral,
        }
    }
}

impl From<String> for Enthusiasm {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

/// Style knobs supplied per request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleParameters {
    pub formality: Formality,
    /// 0.0 = serious, 1.0 = playful.
    pub humor_level: f32,
    pub enthusiasm: Enthusiasm,
}

impl StyleParameters {
    pub fn new(formality: Formality, humor_level: f32, enthusiasm: Enthusiasm) -> Self {
        Self {
            formality,
            humor_level: humor_level.clamp(0.0, 1.0),
            enthusiasm,
        }
    }
}

impl Default for StyleParameters {
    fn default() -> Self {
        Self::new(Formality::Medium, MEDIUM_HUMOR, Enthusiasm::Neutral)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StyleEffect {
    HighFormality,
    LowFormality,
    HighHumor,
    MediumHumor,
    Enthusiastic,
    Calm,
}

impl fmt::Display for StyleEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::HighFormality => "high formality",
            Self::LowFormality => "low formality",
            Self::HighHumor => "high humor",
            Self::MediumHumor => "medium humor",
            Self::Enthusiastic => "enthusiastic",
            Self::Calm => "calm",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledText {
    pub text: String,
    pub effects: Vec<StyleEffect>,
}

pub fn apply_style(suggestion: &str, style: &StyleParameters) -> StyledText {
    let mut text = suggestion.to_string();
    let mut effects = Vec::new();

    match style.formality {
        Formality::High => {
            text = format!("{FORMAL_LEAD_IN}{text}");
            effects.push(StyleEffect::HighFormality);
        }
        Formality::Low => {
            text.push_str(CASUAL_CLOSER);
            effects.push(StyleEffect::LowFormality);
        }
        Formality::Medium => {}
    }

    if style.humor_level > HIGH_HUMOR {
        text.push_str(JOKE_SUFFIX);
        effects.push(StyleEffect::HighHumor);
    } else if style.humor_level > MEDIUM_HUMOR {
        text.push_str(CHUCKLE_SUFFIX);
        effects.push(StyleEffect::MediumHumor);
    }

    match style.enthusiasm {
        Enthusiasm::Enthusiastic => {
            text.push_str(EXCITED_CLOSER);
            effects.push(StyleEffect::Enthusiastic);
        }
        Enthusiasm::Calm => {
            // Also flattens "!" added by the earlier passes.
            text = text.replace('!', ".");
            text.push_str(MELLOW_NOTE);
            effects.push(StyleEffect::Calm);
        }
        Enthusiasm::Neutral => {}
    }

    tracing::debug!(effects = ?effects, "applied style");
    StyledText { text, effects }
}
