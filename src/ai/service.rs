//! Coaching service: the async surface callers talk to.
//!
//! `SimulatedCoach` runs the offline pipeline
//! (analyze → rules → style → strategy → explanation) behind a simulated
//! response latency. `SuggestionDispatcher` glues a preference source, a
//! service and a result sink together for the presentation layer.

use super::analysis::{self, DialogueAnalysis};
use super::explanation::{build_explanation, predict_next_topics};
use super::knowledge::{KnowledgeProvider, KnowledgeSnippet};
use super::latency::{self, CallKind, LatencyConfig};
use super::preferences::PreferenceSource;
use super::rules::select_suggestion;
use super::sink::SuggestionSink;
use super::strategy::{apply_strategy, DatingStrategy};
use super::style_adapter::{apply_style, StyleParameters};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::practice::persona::{self, PracticeMessage, PracticePersona, PracticeTurn};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Snippets requested from the knowledge provider per suggestion.
/// Only the first one is used.
const SNIPPET_FETCH_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResult {
    pub suggestion: String,
    pub analysis: DialogueAnalysis,
    pub coaching_tip: Option<String>,
    pub explanation: Option<String>,
    pub predicted_next_topics: Option<Vec<String>>,
    pub strategy_display_name: Option<String>,
}

#[async_trait]
pub trait AiModelService: Send + Sync {
    async fn get_suggestion(
        &self,
        input_text: &str,
        style: &StyleParameters,
        strategy: DatingStrategy,
    ) -> Result<SuggestionResult>;

    async fn get_practice_opening_line(&self, persona: PracticePersona) -> Result<String>;

    async fn get_practice_response(
        &self,
        user_input: &str,
        persona: PracticePersona,
        history: &[PracticeMessage],
    ) -> Result<PracticeTurn>;
}

// ── Pipeline ───────────────────────────────────────────────

/// Everything after analysis: rule selection, styling, strategy rewrite,
/// explanation and topic prediction.
pub fn compose_suggestion<R: Rng>(
    analysis: DialogueAnalysis,
    style: &StyleParameters,
    strategy: DatingStrategy,
    snippet: Option<&KnowledgeSnippet>,
    rng: &mut R,
) -> SuggestionResult {
    let base = select_suggestion(&analysis, snippet, rng);
    let styled = apply_style(&base.text, style);
    let outcome = apply_strategy(&styled.text, &analysis, strategy);

    let explanation = build_explanation(&base.reason, &styled.effects);
    let topics = predict_next_topics(analysis.first_keyword(), rng);

    SuggestionResult {
        suggestion: outcome.suggestion,
        analysis,
        coaching_tip: Some(outcome.coaching_tip),
        explanation: Some(explanation),
        predicted_next_topics: Some(topics),
        strategy_display_name: Some(strategy.display_name().to_string()),
    }
}

/// Full offline pipeline for one message.
pub fn generate_suggestion<R: Rng>(
    input_text: &str,
    style: &StyleParameters,
    strategy: DatingStrategy,
    snippet: Option<&KnowledgeSnippet>,
    rng: &mut R,
) -> SuggestionResult {
    let analysis = analysis::analyze(input_text, strategy, rng);
    compose_suggestion(analysis, style, strategy, snippet, rng)
}

// ── Simulated coach ────────────────────────────────────────

/// Offline coach with randomized analysis and simulated latency.
pub struct SimulatedCoach {
    rng: Mutex<StdRng>,
    latency: LatencyConfig,
    knowledge: Option<Arc<dyn KnowledgeProvider>>,
}

impl SimulatedCoach {
    pub fn new(config: &EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            latency: config.latency,
            knowledge: None,
        }
    }

    pub fn with_knowledge(mut self, provider: Arc<dyn KnowledgeProvider>) -> Self {
        self.knowledge = Some(provider);
        self
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        // A poisoned RNG is still a usable RNG.
        self.rng.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn draw_delay(&self, kind: CallKind) -> Duration {
        let range = self.latency.range(kind);
        range.sample(&mut *self.rng())
    }

    /// Top-ranked snippet, if any. Provider failures degrade to no snippet.
    async fn top_snippet(&self) -> Option<KnowledgeSnippet> {
        let provider = self.knowledge.as_ref()?;
        match provider.latest_snippets(SNIPPET_FETCH_LIMIT).await {
            Ok(snippets) => snippets.into_iter().next(),
            Err(e) => {
                tracing::warn!(error = %e, "knowledge lookup failed, continuing without snippet");
                None
            }
        }
    }
}

impl Default for SimulatedCoach {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[async_trait]
impl AiModelService for SimulatedCoach {
    async fn get_suggestion(
        &self,
        input_text: &str,
        style: &StyleParameters,
        strategy: DatingStrategy,
    ) -> Result<SuggestionResult> {
        tracing::info!(
            strategy = strategy.name(),
            input_chars = input_text.chars().count(),
            "suggestion requested"
        );
        latency::simulate(self.draw_delay(CallKind::Suggestion)).await;

        let snippet = self.top_snippet().await;
        let result = {
            let mut rng = self.rng();
            generate_suggestion(input_text, style, strategy, snippet.as_ref(), &mut *rng)
        };
        Ok(result)
    }

    async fn get_practice_opening_line(&self, persona: PracticePersona) -> Result<String> {
        tracing::info!(persona = %persona, "practice opening line requested");
        latency::simulate(self.draw_delay(CallKind::OpeningLine)).await;
        Ok(persona.opening_line().to_string())
    }

    async fn get_practice_response(
        &self,
        user_input: &str,
        persona: PracticePersona,
        history: &[PracticeMessage],
    ) -> Result<PracticeTurn> {
        tracing::info!(persona = %persona, history_len = history.len(), "practice response requested");
        latency::simulate(self.draw_delay(CallKind::PracticeResponse)).await;
        Ok(persona::respond(user_input, persona, history))
    }
}

// ── Dispatcher ─────────────────────────────────────────────

/// Fetches suggestions with the current preferences and publishes them.
///
/// Only the most recently started request may publish; an older request that
/// finishes late still returns its result to its caller but leaves the sink
/// alone.
pub struct SuggestionDispatcher {
    service: Arc<dyn AiModelService>,
    preferences: Arc<dyn PreferenceSource>,
    sink: Arc<dyn SuggestionSink>,
    in_flight: AtomicUsize,
    latest_request: AtomicU64,
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SuggestionDispatcher {
    pub fn new(
        service: Arc<dyn AiModelService>,
        preferences: Arc<dyn PreferenceSource>,
        sink: Arc<dyn SuggestionSink>,
    ) -> Self {
        Self {
            service,
            preferences,
            sink,
            in_flight: AtomicUsize::new(0),
            latest_request: AtomicU64::new(0),
        }
    }

    /// True while any `fetch_suggestion` call is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn fetch_suggestion(&self, input_text: &str) -> Result<SuggestionResult> {
        let _guard = InFlight::enter(&self.in_flight);
        let request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        let prefs = self.preferences.current().await;
        if prefs.voice_assist_enabled {
            tracing::debug!("voice assist enabled; spoken delivery is left to the caller");
        }

        let outcome = self
            .service
            .get_suggestion(input_text, &prefs.style(), prefs.dating_strategy)
            .await;

        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "suggestion request failed");
        }
        if self.latest_request.load(Ordering::SeqCst) == request {
            self.sink.publish(outcome.as_ref().ok());
        } else {
            tracing::debug!(request, "superseded suggestion not published");
        }
        outcome
    }
}
