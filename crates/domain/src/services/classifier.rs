//! Intent classification.
//!
//! Builds a request-local bag-of-words model from one tenant's example
//! corpus and scores an inbound utterance against it. The model is cheap to
//! train (the corpora are tens of utterances, not thousands), so a fresh
//! build per message keeps the "train on exactly this tenant's current
//! corpus" contract trivially true.
//!
//! Scoring is cosine similarity between the utterance's token counts and a
//! per-intent centroid of example token counts. Scores land in [0, 1];
//! anything under [`CONFIDENCE_THRESHOLD`] is coerced to no-match.

use std::collections::HashMap;

use tracing::debug;

use crate::models::IntentWithExamples;

/// Minimum confidence for a match. Policy constant, not tenant-configurable.
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Result of classifying one utterance.
///
/// `intent: None` is the no-match sentinel and always carries score 0.0,
/// whether the best candidate failed the threshold or classification never
/// ran at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub intent: Option<String>,
    pub score: f64,
}

impl Classification {
    pub fn no_match() -> Self {
        Self {
            intent: None,
            score: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.intent.is_some()
    }
}

/// Classifies an utterance against a tenant's intents.
///
/// Returns no-match when the corpus is empty, every intent has zero
/// examples, or the best score falls under the threshold. The corpus is
/// never mutated; classification is a pure function of (corpus, utterance).
pub fn classify(corpus: &[IntentWithExamples], utterance: &str) -> Classification {
    let trainable: Vec<&IntentWithExamples> = corpus
        .iter()
        .filter(|i| i.examples.iter().any(|e| !e.trim().is_empty()))
        .collect();

    if trainable.is_empty() {
        debug!("No trainable intents, skipping classification");
        return Classification::no_match();
    }

    // Case normalization happens before tokenization.
    let query = token_counts(&utterance.to_lowercase());
    if query.is_empty() {
        return Classification::no_match();
    }

    let mut best: Option<(&str, f64)> = None;
    for intent in &trainable {
        let mut centroid: HashMap<String, f64> = HashMap::new();
        for example in &intent.examples {
            for (token, count) in token_counts(&example.to_lowercase()) {
                *centroid.entry(token).or_insert(0.0) += count;
            }
        }

        let score = cosine_similarity(&query, &centroid);
        if best.map(|(_, s)| score > s).unwrap_or(true) {
            best = Some((&intent.name, score));
        }
    }

    match best {
        Some((name, score)) if score >= CONFIDENCE_THRESHOLD => {
            debug!(intent = name, score, "Intent matched");
            Classification {
                intent: Some(name.to_string()),
                score,
            }
        }
        Some((name, score)) => {
            debug!(intent = name, score, "Best intent under threshold");
            Classification::no_match()
        }
        None => Classification::no_match(),
    }
}

/// Splits text into lowercase alphanumeric tokens with counts.
fn token_counts(text: &str) -> HashMap<String, f64> {
    let mut counts = HashMap::new();
    for token in text.split(|c: char| !c.is_alphanumeric()) {
        if token.is_empty() {
            continue;
        }
        *counts.entry(token.to_string()).or_insert(0.0) += 1.0;
    }
    counts
}

fn cosine_similarity(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(token, av)| b.get(token).map(|bv| av * bv))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }

    let norm_a: f64 = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<IntentWithExamples> {
        vec![
            IntentWithExamples::new(
                "greeting",
                vec![
                    "merhaba".into(),
                    "selam".into(),
                    "iyi günler".into(),
                    "merhaba iyi günler".into(),
                ],
            ),
            IntentWithExamples::new(
                "pricing",
                vec![
                    "fiyat nedir".into(),
                    "ne kadar".into(),
                    "fiyat listesi".into(),
                ],
            ),
        ]
    }

    #[test]
    fn test_empty_corpus_returns_no_match() {
        let result = classify(&[], "merhaba");
        assert_eq!(result, Classification::no_match());
    }

    #[test]
    fn test_all_empty_examples_returns_no_match() {
        let corpus = vec![
            IntentWithExamples::new("greeting", vec![]),
            IntentWithExamples::new("pricing", vec!["   ".into()]),
        ];
        let result = classify(&corpus, "merhaba");
        assert_eq!(result, Classification::no_match());
    }

    #[test]
    fn test_exact_example_matches() {
        let result = classify(&corpus(), "merhaba");
        assert_eq!(result.intent.as_deref(), Some("greeting"));
        assert!(result.score >= CONFIDENCE_THRESHOLD);
    }

    #[test]
    fn test_case_insensitive_match() {
        let result = classify(&corpus(), "MERHABA");
        assert_eq!(result.intent.as_deref(), Some("greeting"));
    }

    #[test]
    fn test_unrelated_utterance_is_no_match() {
        let result = classify(&corpus(), "kargom nerede kaldı acaba");
        assert!(!result.is_match());
    }

    #[test]
    fn test_below_threshold_is_zero_score_no_match() {
        // One shared token out of many: weakly similar, but under the
        // threshold the sentinel must not leak the raw score.
        let result = classify(&corpus(), "fiyat konusunda hiç bilgim yok ama başka şey sorayım");
        assert_eq!(result, Classification::no_match());
    }

    #[test]
    fn test_picks_best_of_multiple_intents() {
        let result = classify(&corpus(), "fiyat listesi alabilir miyim");
        // "fiyat listesi" overlaps pricing far more than greeting.
        if let Some(name) = &result.intent {
            assert_eq!(name, "pricing");
        }
        assert!(result.score > 0.0);
    }

    #[test]
    fn test_blank_utterance_is_no_match() {
        let result = classify(&corpus(), "   ");
        assert_eq!(result, Classification::no_match());
    }

    #[test]
    fn test_classification_is_pure() {
        let corpus = corpus();
        let first = classify(&corpus, "merhaba");
        let second = classify(&corpus, "merhaba");
        assert_eq!(first, second);
    }
}
