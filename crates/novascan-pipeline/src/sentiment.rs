//! Lexicon sentiment scorer with negation and intensifier handling.

use novascan_core::{SentimentLabel, SentimentScore};

use crate::heuristics::{normalize_token, Heuristics};

/// Scores above this are labelled positive; below its negation, negative.
const LABEL_THRESHOLD: f64 = 0.5;

/// Score a text string against the sentiment lexicon.
///
/// Tokens are whitespace-separated, lowercased, and stripped of non-word
/// characters. Each lexicon hit contributes `+1` or `-1`; the immediately
/// preceding token may invert it (negation) or double it (intensifier).
/// Returns an all-zero neutral score for empty text.
#[must_use]
pub fn analyze_sentiment(text: &str, heuristics: &Heuristics) -> SentimentScore {
    let lowered = text.to_lowercase();
    let tokens: Vec<String> = lowered.split_whitespace().map(normalize_token).collect();

    if tokens.is_empty() {
        return SentimentScore::default();
    }

    let mut score = 0.0_f64;
    let mut positive_hits = 0_usize;
    let mut negative_hits = 0_usize;

    for (i, token) in tokens.iter().enumerate() {
        let polarity = if heuristics.positive.contains(token) {
            1.0
        } else if heuristics.negative.contains(token) {
            -1.0
        } else {
            continue;
        };

        let previous = i.checked_sub(1).map(|p| tokens[p].as_str());
        let negated = previous.is_some_and(|p| heuristics.negations.contains(p));
        let intensified = previous.is_some_and(|p| heuristics.intensifiers.contains(p));

        let signed = if negated { -polarity } else { polarity };
        let multiplier = if intensified { 2.0 } else { 1.0 };
        score += signed * multiplier;

        if signed > 0.0 {
            positive_hits += 1;
        } else {
            negative_hits += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let token_count = tokens.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let sentiment_hits = (positive_hits + negative_hits) as f64;

    let label = if score > LABEL_THRESHOLD {
        SentimentLabel::Positive
    } else if score < -LABEL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    SentimentScore {
        score,
        comparative: score / token_count,
        label,
        confidence: (sentiment_hits / (token_count / 10.0).max(1.0)).min(1.0),
    }
}
