//! Text quality, spam likelihood and topic domain heuristics.

use std::sync::LazyLock;

use novascan_core::QualityMetrics;
use regex::Regex;

use crate::heuristics::{Heuristics, SpamRules};

/// Domain label when no bucket keyword matches.
pub const GENERAL_DOMAIN: &str = "general";

/// Spam indicator total that maps to a spam score of 1.0.
const SPAM_SCALE: f64 = 5.0;

static CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```|`[^`]+`|function |class |import |const |let |var ").expect("valid code regex")
});
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://|www\.").expect("valid link regex"));
static LINK_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://").expect("valid link count regex"));

/// Compute text-quality metrics. Never fails; empty text yields zeros plus
/// the short-text spam indicator.
#[must_use]
pub fn analyze_quality(text: &str, heuristics: &Heuristics) -> QualityMetrics {
    let words: Vec<&str> = text.split_whitespace().collect();

    QualityMetrics {
        text_length: text.chars().count(),
        word_count: words.len(),
        readability_score: readability(text, &words),
        has_code: CODE_RE.is_match(text),
        has_links: LINK_RE.is_match(text),
        spam_score: spam_score(text, words.len(), heuristics),
    }
}

/// Mean of a word-length and a sentence-length component, each in `[0, 1]`.
fn readability(text: &str, words: &[&str]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }

    let sentence_count = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1);

    #[allow(clippy::cast_precision_loss)]
    let word_count = words.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let total_chars = words.iter().map(|w| w.chars().count()).sum::<usize>() as f64;
    #[allow(clippy::cast_precision_loss)]
    let avg_sentence_len = word_count / sentence_count as f64;
    let avg_word_len = total_chars / word_count;

    let word_component = (1.0 - (avg_word_len - 4.0) / 10.0).clamp(0.0, 1.0);
    let sentence_component = (1.0 - (avg_sentence_len - 15.0) / 30.0).clamp(0.0, 1.0);

    (word_component + sentence_component) / 2.0
}

fn spam_score(text: &str, word_count: usize, heuristics: &Heuristics) -> f64 {
    let rules = &heuristics.tables().spam;

    let mut indicators = heuristics
        .spam_patterns
        .iter()
        .filter(|re| re.is_match(text))
        .count();

    if has_repeated_run(text, rules.repeated_char_run) {
        indicators += 1;
    }

    let links = LINK_COUNT_RE.find_iter(text).count();
    if links > rules.max_links {
        indicators += (links - rules.max_links).min(rules.max_link_penalty);
    }

    let emoji = text.chars().filter(|c| is_emoticon(*c)).count();
    if emoji > rules.max_emoji {
        indicators += 1;
    }

    if is_length_outlier(text, word_count, rules) {
        indicators += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let raw = indicators as f64 / SPAM_SCALE;
    raw.min(1.0)
}

/// `true` if any character repeats `run` or more times consecutively.
fn has_repeated_run(text: &str, run: usize) -> bool {
    if run == 0 {
        return false;
    }
    let mut previous = None;
    let mut length = 0_usize;
    for c in text.chars() {
        if Some(c) == previous {
            length += 1;
        } else {
            previous = Some(c);
            length = 1;
        }
        if length >= run {
            return true;
        }
    }
    false
}

/// Emoticons block, U+1F600..=U+1F64F.
fn is_emoticon(c: char) -> bool {
    ('\u{1F600}'..='\u{1F64F}').contains(&c)
}

fn is_length_outlier(text: &str, word_count: usize, rules: &SpamRules) -> bool {
    word_count < rules.min_words
        || (word_count > rules.max_words_without_breaks && !text.contains('\n'))
}

/// Classify text into the bucket with the most keyword hits.
///
/// A keyword hits when it appears in the lowercased text or in the
/// space-joined lowercased tags. Ties go to the bucket declared first;
/// no hits at all yields [`GENERAL_DOMAIN`].
#[must_use]
pub fn classify_domain(text: &str, tags: &[String], heuristics: &Heuristics) -> String {
    let lower_text = text.to_lowercase();
    let all_tags = tags
        .iter()
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mut best = GENERAL_DOMAIN;
    let mut max_hits = 0_usize;

    for bucket in &heuristics.tables().domains {
        let hits = bucket
            .keywords
            .iter()
            .map(|k| k.to_lowercase())
            .filter(|k| lower_text.contains(k.as_str()) || all_tags.contains(k.as_str()))
            .count();
        if hits > max_hits {
            max_hits = hits;
            best = &bucket.name;
        }
    }

    best.to_string()
}
