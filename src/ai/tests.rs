//! End-to-end tests for the suggestion pipeline and the coach service.

use super::analysis::{extract_keywords, DialogueAnalysis, EmotionData, IntentData, SemanticData};
use super::knowledge::{InMemoryKnowledgeStore, KnowledgeProvider, KnowledgeSnippet};
use super::preferences::{StaticPreferences, StylePreferences};
use super::service::{
    compose_suggestion, generate_suggestion, AiModelService, SimulatedCoach, SuggestionDispatcher,
    SuggestionResult,
};
use super::sink::WatchSink;
use super::strategy::DatingStrategy;
use super::style_adapter::{Enthusiasm, Formality, StyleParameters};
use crate::config::EngineConfig;
use crate::error::{CoachError, Result};
use crate::practice::persona::{PracticeMessage, PracticePersona, PracticeTurn};
use async_trait::async_trait;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Analysis with no emotion or intent strong enough to fire a rule.
fn quiet_analysis(text: &str, openness: Option<u8>) -> DialogueAnalysis {
    DialogueAnalysis {
        emotion: Some(EmotionData::new("neutral", 0.5)),
        intent: Some(IntentData::new("casual_chat", 0.9)),
        semantics: Some(SemanticData {
            keywords: extract_keywords(text),
            summary: None,
        }),
        openness_score: openness,
    }
}

fn plain_style() -> StyleParameters {
    StyleParameters::new(Formality::Medium, 0.0, Enthusiasm::Neutral)
}

fn snippet(id: u64, text: &str) -> KnowledgeSnippet {
    KnowledgeSnippet {
        id,
        text: text.to_string(),
        timestamp_ms: 0,
    }
}

#[test]
fn music_message_gets_music_follow_up() {
    let input = "I love live music and travel!";
    let mut rng = StdRng::seed_from_u64(11);
    let result = compose_suggestion(
        quiet_analysis(input, None),
        &plain_style(),
        DatingStrategy::Balanced,
        None,
        &mut rng,
    );

    assert!(result.suggestion.contains("What kind of music do you enjoy?"));
    assert!(result
        .explanation
        .as_deref()
        .unwrap()
        .starts_with("Why this suggestion? detected keyword music."));
    assert_eq!(result.strategy_display_name.as_deref(), Some("Balanced Approach"));
    assert_eq!(
        result.coaching_tip.as_deref(),
        Some("Tip (Balanced): Maintain a good conversational flow, balancing listening and sharing.")
    );
}

#[test]
fn high_openness_gets_bold_template() {
    let mut rng = StdRng::seed_from_u64(12);
    let result = compose_suggestion(
        quiet_analysis("anything at all", Some(82)),
        &plain_style(),
        DatingStrategy::AcceleratedConnection,
        None,
        &mut rng,
    );

    assert!(result
        .suggestion
        .starts_with("With their high openness (82/100), be bold"));
    assert!(result.coaching_tip.unwrap().contains("82"));
}

#[test]
fn snippet_wins_over_strong_emotion() {
    let mut analysis = quiet_analysis("so happy today", None);
    analysis.emotion = Some(EmotionData::new("happy", 0.95));
    analysis.intent = Some(IntentData::new("making_plans", 0.99));

    let mut rng = StdRng::seed_from_u64(13);
    let result = compose_suggestion(
        analysis,
        &plain_style(),
        DatingStrategy::Balanced,
        Some(&snippet(7, "your trip to Japan")),
        &mut rng,
    );

    assert!(result.suggestion.contains("'your trip to Japan'"));
    let explanation = result.explanation.unwrap();
    assert!(explanation.contains("used snippet 7"));
    assert!(explanation.contains("Knowledge used: snippet 7 'your trip to Japan...'."));
}

#[test]
fn long_snippet_is_excerpted() {
    let long = "your trip to Japan last spring with the whole family";
    let mut rng = StdRng::seed_from_u64(14);
    let result = compose_suggestion(
        quiet_analysis("", None),
        &plain_style(),
        DatingStrategy::Balanced,
        Some(&snippet(3, long)),
        &mut rng,
    );
    assert!(result.suggestion.contains("'your trip to Japan last spring'"));
    assert!(!result.suggestion.contains("whole family"));
}

#[test]
fn empty_input_falls_back_to_generic_line() {
    let mut rng = StdRng::seed_from_u64(15);
    let result = compose_suggestion(
        quiet_analysis("", None),
        &plain_style(),
        DatingStrategy::Balanced,
        None,
        &mut rng,
    );
    assert!(result.analysis.keywords().is_empty());
    assert!(result.suggestion.starts_with("You could respond with: '"));
    assert!(result
        .explanation
        .unwrap()
        .contains("fallback, keyword none"));
}

#[test]
fn openness_present_only_for_accelerated() {
    for seed in 0..20 {
        for strategy in DatingStrategy::ALL {
            let mut rng = StdRng::seed_from_u64(seed);
            let result =
                generate_suggestion("we should grab food", &plain_style(), strategy, None, &mut rng);
            assert_eq!(
                result.analysis.openness_score.is_some(),
                strategy == DatingStrategy::AcceleratedConnection,
                "{strategy:?}"
            );
        }
    }
}

#[test]
fn styled_formal_humorous_suggestion_lists_effects() {
    let style = StyleParameters::new(Formality::High, 0.9, Enthusiasm::Enthusiastic);
    let mut rng = StdRng::seed_from_u64(16);
    let result = compose_suggestion(
        quiet_analysis("any good book lately", None),
        &style,
        DatingStrategy::Balanced,
        None,
        &mut rng,
    );
    assert!(result
        .suggestion
        .starts_with("Considering a formal approach: "));
    assert!(result.explanation.unwrap().contains("Applied styles: "));
}

#[test]
fn same_seed_same_result() {
    let style = plain_style();
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_suggestion("love travel and movies", &style, DatingStrategy::DeepConnection, None, &mut rng)
    };
    assert_eq!(run(99), run(99));
}

proptest! {
    #[test]
    fn calm_output_has_no_exclamation(input in ".{0,60}", seed in any::<u64>(), humor in 0.0f32..=1.0) {
        let style = StyleParameters::new(Formality::Low, humor, Enthusiasm::Calm);
        for strategy in [DatingStrategy::Balanced, DatingStrategy::SocialExploration] {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = generate_suggestion(&input, &style, strategy, None, &mut rng);
            prop_assert!(!result.suggestion.contains('!'), "{}", result.suggestion);
        }
    }

    #[test]
    fn suggestion_is_never_empty(input in ".{0,80}", seed in any::<u64>()) {
        for strategy in DatingStrategy::ALL {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = generate_suggestion(&input, &plain_style(), strategy, None, &mut rng);
            prop_assert!(!result.suggestion.trim().is_empty());
            let topics = result.predicted_next_topics.unwrap();
            prop_assert!((1..=2).contains(&topics.len()));
        }
    }
}

// ── Service ────────────────────────────────────────────────

struct FailingKnowledge;

#[async_trait]
impl KnowledgeProvider for FailingKnowledge {
    async fn latest_snippets(&self, _limit: usize) -> Result<Vec<KnowledgeSnippet>> {
        Err(CoachError::Knowledge("index unavailable".into()))
    }
}

struct FailingService;

#[async_trait]
impl AiModelService for FailingService {
    async fn get_suggestion(
        &self,
        _input_text: &str,
        _style: &StyleParameters,
        _strategy: DatingStrategy,
    ) -> Result<SuggestionResult> {
        Err(CoachError::Model("timeout".into()))
    }

    async fn get_practice_opening_line(&self, _persona: PracticePersona) -> Result<String> {
        Err(CoachError::Model("timeout".into()))
    }

    async fn get_practice_response(
        &self,
        _user_input: &str,
        _persona: PracticePersona,
        _history: &[PracticeMessage],
    ) -> Result<PracticeTurn> {
        Err(CoachError::Model("timeout".into()))
    }
}

#[tokio::test]
async fn coach_uses_newest_snippet() {
    let store = Arc::new(InMemoryKnowledgeStore::new());
    store.add_snippet("has a dog named Pepper").await;
    let newest = store.add_snippet("your trip to Japan").await;

    let coach = SimulatedCoach::new(&EngineConfig::deterministic(21)).with_knowledge(store);
    let result = coach
        .get_suggestion("hello", &plain_style(), DatingStrategy::Balanced)
        .await
        .unwrap();

    assert!(result.suggestion.contains("your trip to Japan"));
    assert!(result
        .explanation
        .unwrap()
        .contains(&format!("used snippet {}", newest.id)));
}

#[tokio::test]
async fn knowledge_failure_degrades_to_no_snippet() {
    let coach = SimulatedCoach::new(&EngineConfig::deterministic(22))
        .with_knowledge(Arc::new(FailingKnowledge));
    let result = coach
        .get_suggestion("tell me about your favorite movie", &plain_style(), DatingStrategy::Balanced)
        .await
        .unwrap();
    assert!(!result.explanation.unwrap().contains("used snippet"));
}

#[tokio::test(start_paused = true)]
async fn concurrent_suggestions_overlap_their_latency() {
    let config = EngineConfig {
        seed: Some(3),
        ..Default::default()
    };
    let coach = SimulatedCoach::new(&config);
    let style = plain_style();

    let start = tokio::time::Instant::now();
    let (a, b) = tokio::join!(
        coach.get_suggestion("first message", &style, DatingStrategy::Balanced),
        coach.get_suggestion("second message", &style, DatingStrategy::SocialExploration),
    );
    let elapsed = start.elapsed();

    assert!(a.is_ok() && b.is_ok());
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed <= Duration::from_millis(600), "{elapsed:?}");
}

#[tokio::test]
async fn practice_calls_use_persona_engine() {
    let coach = SimulatedCoach::new(&EngineConfig::deterministic(23));
    let opening = coach
        .get_practice_opening_line(PracticePersona::GeneralChat)
        .await
        .unwrap();
    assert_eq!(opening, "Hey there! What's on your mind today?");

    let turn = coach
        .get_practice_response("hi", PracticePersona::FlirtyAccelerated, &[])
        .await
        .unwrap();
    assert_eq!(
        turn.feedback.as_deref(),
        Some("Short and sweet! Maybe add a playful emoji next time? 😉")
    );
}

#[tokio::test]
async fn dispatcher_publishes_with_current_preferences() {
    let sink = Arc::new(WatchSink::new());
    let prefs = StylePreferences {
        enthusiasm: Enthusiasm::Calm,
        dating_strategy: DatingStrategy::SocialExploration,
        ..Default::default()
    };
    let dispatcher = SuggestionDispatcher::new(
        Arc::new(SimulatedCoach::new(&EngineConfig::deterministic(24))),
        Arc::new(StaticPreferences(prefs)),
        sink.clone(),
    );

    assert!(!dispatcher.is_loading());
    let result = dispatcher.fetch_suggestion("I went to a concert!").await.unwrap();
    assert!(!dispatcher.is_loading());

    assert!(result.suggestion.starts_with("For social exploration: "));
    assert_eq!(
        result.strategy_display_name.as_deref(),
        Some("Social Exploration")
    );
    assert_eq!(sink.latest(), Some(result));
}

#[tokio::test]
async fn dispatcher_clears_sink_on_failure() {
    let sink = Arc::new(WatchSink::new());
    let dispatcher = SuggestionDispatcher::new(
        Arc::new(FailingService),
        Arc::new(StaticPreferences(StylePreferences::default())),
        sink.clone(),
    );

    let err = dispatcher.fetch_suggestion("hello").await.unwrap_err();
    assert!(matches!(err, CoachError::Model(_)));
    assert!(sink.latest().is_none());
    assert!(!dispatcher.is_loading());
}

fn echo_result(text: &str) -> SuggestionResult {
    SuggestionResult {
        suggestion: text.to_string(),
        analysis: DialogueAnalysis::default(),
        coaching_tip: None,
        explanation: None,
        predicted_next_topics: None,
        strategy_display_name: None,
    }
}

/// Echoes the input after a delay that depends on it. Inputs starting with
/// "fail" return an error instead.
struct SlowEchoService;

#[async_trait]
impl AiModelService for SlowEchoService {
    async fn get_suggestion(
        &self,
        input_text: &str,
        _style: &StyleParameters,
        _strategy: DatingStrategy,
    ) -> Result<SuggestionResult> {
        let delay = if input_text.ends_with("old") { 500 } else { 50 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        if input_text.starts_with("fail") {
            return Err(CoachError::Model("timeout".into()));
        }
        Ok(echo_result(input_text))
    }

    async fn get_practice_opening_line(&self, persona: PracticePersona) -> Result<String> {
        Ok(persona.opening_line().to_string())
    }

    async fn get_practice_response(
        &self,
        user_input: &str,
        persona: PracticePersona,
        history: &[PracticeMessage],
    ) -> Result<PracticeTurn> {
        Ok(crate::practice::persona::respond(user_input, persona, history))
    }
}

fn echo_dispatcher(sink: Arc<WatchSink>) -> SuggestionDispatcher {
    SuggestionDispatcher::new(
        Arc::new(SlowEchoService),
        Arc::new(StaticPreferences(StylePreferences::default())),
        sink,
    )
}

#[tokio::test(start_paused = true)]
async fn slow_older_request_does_not_overwrite_newer_result() {
    let sink = Arc::new(WatchSink::new());
    let dispatcher = echo_dispatcher(sink.clone());

    let (old, new) = tokio::join!(dispatcher.fetch_suggestion("old"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        dispatcher.fetch_suggestion("new").await
    });

    assert_eq!(old.unwrap().suggestion, "old");
    assert_eq!(new.unwrap().suggestion, "new");
    assert_eq!(sink.latest().unwrap().suggestion, "new");
}

#[tokio::test(start_paused = true)]
async fn slow_older_failure_does_not_clear_newer_result() {
    let sink = Arc::new(WatchSink::new());
    let dispatcher = echo_dispatcher(sink.clone());

    let (old, new) = tokio::join!(dispatcher.fetch_suggestion("fail old"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        dispatcher.fetch_suggestion("new").await
    });

    assert!(old.is_err());
    assert!(new.is_ok());
    assert_eq!(sink.latest().unwrap().suggestion, "new");
}

/// Holds `get_suggestion` until released.
#[derive(Default)]
struct GatedSuggestionService {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl AiModelService for GatedSuggestionService {
    async fn get_suggestion(
        &self,
        input_text: &str,
        _style: &StyleParameters,
        _strategy: DatingStrategy,
    ) -> Result<SuggestionResult> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(echo_result(input_text))
    }

    async fn get_practice_opening_line(&self, persona: PracticePersona) -> Result<String> {
        Ok(persona.opening_line().to_string())
    }

    async fn get_practice_response(
        &self,
        user_input: &str,
        persona: PracticePersona,
        history: &[PracticeMessage],
    ) -> Result<PracticeTurn> {
        Ok(crate::practice::persona::respond(user_input, persona, history))
    }
}

#[tokio::test]
async fn dispatcher_is_loading_while_request_outstanding() {
    let gate = Arc::new(GatedSuggestionService::default());
    let sink = Arc::new(WatchSink::new());
    let dispatcher = Arc::new(SuggestionDispatcher::new(
        gate.clone(),
        Arc::new(StaticPreferences(StylePreferences::default())),
        sink.clone(),
    ));

    let pending = {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move { dispatcher.fetch_suggestion("are you free friday").await })
    };
    gate.entered.notified().await;
    assert!(dispatcher.is_loading());
    assert!(sink.latest().is_none());

    gate.release.notify_one();
    let result = pending.await.unwrap().unwrap();
    assert!(!dispatcher.is_loading());
    assert_eq!(sink.latest(), Some(result));
}
