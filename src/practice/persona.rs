//! Practice personas: fixed opening lines, templated replies and
//! per-persona feedback heuristics on the user's last message.

use crate::utils::text::{char_len, excerpt};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const INPUT_EXCERPT_CHARS: usize = 20;

pub const USER_SENDER: &str = "User";
pub const COACH_SENDER: &str = "Coach";
pub const SYSTEM_SENDER: &str = "System";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PracticePersona {
    #[default]
    GeneralChat,
    FlirtyAccelerated,
    SeriousDeep,
}

impl PracticePersona {
    pub const ALL: [PracticePersona; 3] = [
        PracticePersona::GeneralChat,
        PracticePersona::FlirtyAccelerated,
        PracticePersona::SeriousDeep,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::GeneralChat => "General Chat",
            Self::FlirtyAccelerated => "Flirty & Fast-Paced",
            Self::SeriousDeep => "Serious & Deep Convo",
        }
    }

    /// Unknown names fall back to General Chat.
    pub fn from_display_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.display_name() == name.trim())
            .unwrap_or_else(|| {
                tracing::warn!(name, "unknown practice persona, using General Chat");
                Self::GeneralChat
            })
    }

    pub fn opening_line(self) -> &'static str {
        match self {
            Self::GeneralChat => "Hey there! What's on your mind today?",
            Self::FlirtyAccelerated => "Well hello there... 😉 Ready to dive into some fun chat?",
            Self::SeriousDeep => {
                "Hello. I'm interested in having a meaningful conversation. What's something you're passionate about?"
            }
        }
    }
}

impl fmt::Display for PracticePersona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One line of a practice transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeMessage {
    pub sender: String,
    pub text: String,
    #[serde(default)]
    pub is_feedback: bool,
}

impl PracticeMessage {
    pub fn user(text: &str) -> Self {
        Self {
            sender: USER_SENDER.to_string(),
            text: text.to_string(),
            is_feedback: false,
        }
    }

    pub fn persona(persona: PracticePersona, text: &str) -> Self {
        Self {
            sender: persona.display_name().to_string(),
            text: text.to_string(),
            is_feedback: false,
        }
    }

    pub fn coach(text: &str) -> Self {
        Self {
            sender: COACH_SENDER.to_string(),
            text: text.to_string(),
            is_feedback: true,
        }
    }

    pub fn system(text: &str) -> Self {
        Self {
            sender: SYSTEM_SENDER.to_string(),
            text: text.to_string(),
            is_feedback: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeTurn {
    pub persona_response: String,
    pub feedback: Option<String>,
}

/// Persona reply to `user_input`. `_history` is accepted for richer backends;
/// the templated persona does not read it.
pub fn respond(
    user_input: &str,
    persona: PracticePersona,
    _history: &[PracticeMessage],
) -> PracticeTurn {
    let quoted = excerpt(user_input, INPUT_EXCERPT_CHARS);
    let len = char_len(user_input);

    let (persona_response, feedback) = match persona {
        PracticePersona::GeneralChat => {
            let reply = format!(
                "That's an interesting point about '{quoted}...'. I wonder, what's your take on [related topic like 'current events' or 'hobbies']?"
            );
            let feedback = if len < 10 {
                "A bit short, but okay! Try elaborating more next time."
            } else if user_input.contains('?') {
                "Good use of a question to keep it interactive!"
            } else {
                "Solid reply!"
            };
            (reply, feedback)
        }
        PracticePersona::FlirtyAccelerated => {
            let reply = format!(
                "Ooh, '{quoted}...' you say? 😉 That's bold. I like it. What's your wildest dream date?"
            );
            let feedback = if len < 15 && !user_input.contains('😉') {
                "Short and sweet! Maybe add a playful emoji next time? 😉"
            } else if user_input.contains("date") || user_input.contains("meet") {
                "Cutting to the chase, are we? Confident!"
            } else {
                "Intriguing... keep that energy up!"
            };
            (reply, feedback)
        }
        PracticePersona::SeriousDeep => {
            let reply = format!(
                "I appreciate you sharing that about '{quoted}...'. It makes me think about [deeper concept like 'the nature of connection' or 'personal growth']. How do you see it?"
            );
            let feedback = if len < 20 {
                "Thanks for sharing. To go deeper, perhaps expand on your thoughts a bit more?"
            } else if ["feel", "think", "believe"]
                .iter()
                .any(|w| user_input.contains(w))
            {
                "Great job sharing your perspective thoughtfully!"
            } else {
                "That's a good starting point for a deeper discussion."
            };
            (reply, feedback)
        }
    };

    tracing::debug!(persona = %persona, feedback, "persona responded");
    PracticeTurn {
        persona_response,
        feedback: Some(feedback.to_string()),
    }
}
