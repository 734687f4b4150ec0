pub mod analysis;
pub mod explanation;
pub mod knowledge;
pub mod latency;
pub mod preferences;
pub mod rules;
pub mod service;
pub mod sink;
pub mod strategy;
pub mod style_adapter;

#[cfg(test)]
mod tests;

pub use knowledge::{InMemoryKnowledgeStore, KnowledgeProvider, KnowledgeSnippet};
pub use preferences::{FilePreferences, PreferenceSource, StaticPreferences, StylePreferences};
pub use service::{AiModelService, SimulatedCoach, SuggestionDispatcher, SuggestionResult};
pub use sink::{NoopSink, SuggestionSink, WatchSink};
pub use strategy::DatingStrategy;
pub use style_adapter::{Enthusiasm, Formality, StyleParameters};
