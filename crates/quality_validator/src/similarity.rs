//! Pluggable string-similarity strategy for "did you mean" suggestions.

/// Scores how alike two strings are, normalized to [0, 1].
///
/// The strategy sits behind this trait so it can be swapped for an
/// edit-distance or phonetic algorithm without touching rule logic.
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Character-bigram overlap ratio (Sørensen–Dice), case-insensitive.
#[derive(Debug, Default)]
pub struct DiceScorer;

impl SimilarityScorer for DiceScorer {
    fn score(&self, a: &str, b: &str) -> f64 {
        strsim::sorensen_dice(&a.to_lowercase(), &b.to_lowercase())
    }
}

/// Best-scoring candidate for `value`, with its score.
pub fn best_match<'a>(
    scorer: &dyn SimilarityScorer,
    value: &str,
    candidates: &'a [String],
) -> Option<(&'a str, f64)> {
    candidates
        .iter()
        .map(|c| (c.as_str(), scorer.score(value, c)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
}
