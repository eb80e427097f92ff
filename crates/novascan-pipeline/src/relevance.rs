//! Query relevance scoring and freshness boosting.

use chrono::{DateTime, Utc};
use novascan_core::Post;

pub const MAX_RELEVANCE: f64 = 100.0;

/// Query words at or below this length never count as partial matches.
const MIN_QUERY_WORD_LEN: usize = 3;

/// Score how well `post` matches `query`, in `[0, 100]`.
///
/// - title: 50 for the whole query as a substring, otherwise 30 times the
///   share of query words (longer than 3 chars) present in the title;
/// - body: 30 for the whole query, otherwise 20 times the same share;
/// - tags: 5 per tag that contains, or is contained in, the query;
/// - engagement: `(score + num_comments) / 100`, at most 10.
///
/// Matching is case-insensitive.
#[must_use]
pub fn calculate_relevance(post: &Post, query: &str) -> f64 {
    let query = query.to_lowercase();
    let title = post.title.to_lowercase();
    let content = post.content.to_lowercase();
    let query_words: Vec<&str> = query.split_whitespace().collect();

    let mut relevance = 0.0;

    relevance += if title.contains(&query) {
        50.0
    } else {
        word_share(&query_words, &title) * 30.0
    };

    relevance += if content.contains(&query) {
        30.0
    } else {
        word_share(&query_words, &content) * 20.0
    };

    let matching_tags = post
        .tags
        .iter()
        .map(|t| t.to_lowercase())
        .filter(|tag| query.contains(tag.as_str()) || tag.contains(query.as_str()))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let tag_points = matching_tags as f64 * 5.0;
    relevance += tag_points;

    #[allow(clippy::cast_precision_loss)]
    let engagement = post.engagement() as f64;
    relevance += (engagement / 100.0).min(10.0);

    relevance.clamp(0.0, MAX_RELEVANCE)
}

/// Fraction of query words longer than 3 chars found in `haystack`, over
/// all query words.
fn word_share(query_words: &[&str], haystack: &str) -> f64 {
    if query_words.is_empty() {
        return 0.0;
    }
    let matching = query_words
        .iter()
        .filter(|w| w.chars().count() > MIN_QUERY_WORD_LEN && haystack.contains(**w))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let share = matching as f64 / query_words.len() as f64;
    share
}

/// Overwrite every post's `relevance_score` for `query`.
#[must_use]
pub fn score_relevance(mut posts: Vec<Post>, query: &str) -> Vec<Post> {
    for post in &mut posts {
        post.relevance_score = Some(calculate_relevance(post, query));
    }
    posts
}

/// Recency multiplier for a post of the given age.
#[must_use]
pub fn freshness_multiplier(age_days: f64) -> f64 {
    if age_days < 1.0 {
        1.5
    } else if age_days < 7.0 {
        1.3
    } else if age_days < 30.0 {
        1.1
    } else if age_days > 365.0 {
        0.7
    } else {
        1.0
    }
}

/// Multiply each post's relevance by its [`freshness_multiplier`], in place.
///
/// The result is not clipped, so fresh posts can exceed
/// [`MAX_RELEVANCE`]; this keeps the ranking signal between equally
/// relevant posts of different ages. A missing relevance counts as zero.
pub fn apply_freshness_boost(posts: &mut [Post], now: DateTime<Utc>) {
    for post in posts {
        let multiplier = freshness_multiplier(post.age_days(now));
        post.relevance_score = Some(post.relevance_score.unwrap_or(0.0) * multiplier);
    }
}
