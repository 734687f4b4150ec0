//! Explanation & topic generation for a finished suggestion.

use super::rules::SuggestionReason;
use super::style_adapter::StyleEffect;
use rand::seq::SliceRandom;
use rand::Rng;

/// "Why this suggestion?" text: the rule reason, then applied styles (if any),
/// then the knowledge snippet (if one grounded the suggestion).
pub fn build_explanation(reason: &SuggestionReason, effects: &[StyleEffect]) -> String {
    let mut explanation = format!("Why this suggestion? {}.", reason);

    if !effects.is_empty() {
        let styles: Vec<String> = effects.iter().map(ToString::to_string).collect();
        explanation.push_str(&format!(" Applied styles: {}.", styles.join(", ")));
    }

    if let SuggestionReason::Knowledge {
        snippet_id,
        excerpt,
    } = reason
    {
        explanation.push_str(&format!(
            " Knowledge used: snippet {} '{}...'.",
            snippet_id, excerpt
        ));
    }

    explanation
}

/// One or two likely next topics, shuffled from a fixed pool.
pub fn predict_next_topics<R: Rng>(first_keyword: Option<&str>, rng: &mut R) -> Vec<String> {
    let mut pool = vec![
        "Ask about their weekend plans".to_string(),
        "Share a recent personal achievement".to_string(),
        format!(
            "Discuss a common interest (e.g., {})",
            first_keyword.unwrap_or("hobbies")
        ),
        "Talk about a new movie or show".to_string(),
        "Ask a light-hearted hypothetical question".to_string(),
    ];
    pool.shuffle(rng);
    let count = rng.gen_range(1..=2);
    pool.truncate(count);
    pool
}
