//! Conversation coaching engine.
//!
//! Given a message from a conversation partner, the coach produces a reply
//! suggestion, a coaching tip, an explanation and likely next topics. A
//! separate practice mode lets the user rehearse against scripted personas.

pub mod ai;
pub mod config;
pub mod error;
pub mod practice;
pub mod utils;

pub use ai::service::{AiModelService, SimulatedCoach, SuggestionDispatcher, SuggestionResult};
pub use ai::strategy::DatingStrategy;
pub use ai::style_adapter::{Enthusiasm, Formality, StyleParameters};
pub use config::EngineConfig;
pub use error::{CoachError, Result};
pub use practice::{PracticeMessage, PracticePersona, PracticeSession, PracticeTurn};
pub use utils::logging::init_tracing;
