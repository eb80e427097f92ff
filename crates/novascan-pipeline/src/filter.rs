//! Noise removal and composite quality filtering.

use chrono::{DateTime, Utc};
use novascan_core::Post;

/// Default composite threshold for [`filter_by_quality`].
pub const DEFAULT_MIN_QUALITY: f64 = 40.0;

const REDACTION_MARKERS: &[&str] = &["[deleted]", "[removed]"];
const DELETED_AUTHORS: &[&str] = &["deleted", "[deleted]"];

const MIN_CONTENT_CHARS: usize = 50;
const MIN_TITLE_CHARS: usize = 20;
const MAX_SPAM_SCORE: f64 = 0.7;
const STALE_AFTER_DAYS: f64 = 30.0;

/// Drop posts that are clearly unusable.
///
/// A post is removed when its body carries a moderation redaction marker,
/// when both body and title are too short to say anything, when its spam
/// score exceeds 0.7, or when it is older than 30 days with no score and no
/// comments.
#[must_use]
pub fn remove_noise(posts: Vec<Post>, now: DateTime<Utc>) -> Vec<Post> {
    let before = posts.len();
    let kept: Vec<Post> = posts
        .into_iter()
        .filter(|post| noise_reason(post, now).is_none())
        .collect();

    tracing::debug!(
        removed = before - kept.len(),
        remaining = kept.len(),
        "noise removal complete"
    );
    kept
}

fn noise_reason(post: &Post, now: DateTime<Utc>) -> Option<&'static str> {
    if REDACTION_MARKERS.iter().any(|m| post.content.contains(m)) {
        return Some("redacted");
    }

    if post.content.chars().count() < MIN_CONTENT_CHARS
        && post.title.chars().count() < MIN_TITLE_CHARS
    {
        return Some("too short");
    }

    if post.spam_score().is_some_and(|spam| spam > MAX_SPAM_SCORE) {
        return Some("spam");
    }

    if post.age_days(now) > STALE_AFTER_DAYS && post.score == 0 && post.num_comments == 0 {
        return Some("stale");
    }

    None
}

/// Composite quality score in `[0, 100]`.
///
/// Starts at 50 and adds engagement (up to 30), spam and length credit when
/// quality metrics are present (up to 20), recency (up to 10) and a known
/// author (5).
#[must_use]
pub fn quality_score(post: &Post, now: DateTime<Utc>) -> f64 {
    let mut score = 50.0;

    #[allow(clippy::cast_precision_loss)]
    let weighted_engagement = (post.score + post.num_comments * 2) as f64;
    score += (weighted_engagement / 10.0).min(30.0);

    if let Some(quality) = &post.quality {
        score += (1.0 - quality.spam_score) * 10.0;
        score += if quality.word_count > 50 { 10.0 } else { 5.0 };
    }

    let age = post.age_days(now);
    if age < 7.0 {
        score += 10.0;
    } else if age < 30.0 {
        score += 5.0;
    }

    let author = post.author.trim();
    if !author.is_empty() && !DELETED_AUTHORS.contains(&author) {
        score += 5.0;
    }

    score.min(100.0)
}

/// Keep posts whose [`quality_score`] is at least `min_score`.
#[must_use]
pub fn filter_by_quality(posts: Vec<Post>, min_score: f64, now: DateTime<Utc>) -> Vec<Post> {
    let before = posts.len();
    let kept: Vec<Post> = posts
        .into_iter()
        .filter(|post| quality_score(post, now) >= min_score)
        .collect();

    tracing::debug!(
        removed = before - kept.len(),
        remaining = kept.len(),
        min_score,
        "quality filter complete"
    );
    kept
}
