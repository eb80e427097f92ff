//! Caller-supplied search filters.
//!
//! Filters narrow an enriched result set; they never influence the enrichment
//! stages themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::post::{Platform, Post, SentimentLabel};

/// Inclusive `created_at` window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Any-of match on `platform`. Empty means all platforms.
    pub platforms: Vec<Platform>,
    pub date_range: Option<DateRange>,
    /// Any-of match on tags, case-insensitive.
    pub tags: Vec<String>,
    pub sentiment: Option<SentimentLabel>,
    /// Minimum platform `score`.
    pub min_score: Option<i64>,
    /// Any-of match on `domain_context`.
    pub domains: Vec<String>,
    /// Minimum quality in `[0.0, 1.0]`, checked as `spam_score <= 1 - min_quality`.
    pub min_quality: Option<f64>,
    /// Only keep posts tagged `problem`.
    pub problems_only: bool,
}

impl SearchFilters {
    /// Returns `true` when every configured filter accepts `post`.
    ///
    /// Posts that have not been analyzed yet fail the sentiment and domain
    /// filters and pass the quality filter.
    #[must_use]
    pub fn matches(&self, post: &Post) -> bool {
        if !self.platforms.is_empty() && !self.platforms.contains(&post.platform) {
            return false;
        }

        if let Some(range) = &self.date_range {
            if post.created_at < range.from || post.created_at > range.to {
                return false;
            }
        }

        if !self.tags.is_empty() {
            let hit = self.tags.iter().any(|wanted| {
                post.tags
                    .iter()
                    .any(|tag| tag.eq_ignore_ascii_case(wanted))
            });
            if !hit {
                return false;
            }
        }

        if let Some(label) = self.sentiment {
            if post.sentiment.as_ref().map(|s| s.label) != Some(label) {
                return false;
            }
        }

        if let Some(min_score) = self.min_score {
            if post.score < min_score {
                return false;
            }
        }

        if !self.domains.is_empty() {
            let Some(domain) = post.domain_context.as_deref() else {
                return false;
            };
            if !self.domains.iter().any(|d| d == domain) {
                return false;
            }
        }

        if let Some(min_quality) = self.min_quality {
            let max_spam = 1.0 - min_quality.clamp(0.0, 1.0);
            if !post.spam_score().is_none_or(|spam| spam <= max_spam) {
                return false;
            }
        }

        if self.problems_only && !post.tags.iter().any(|t| t == "problem") {
            return false;
        }

        true
    }
}

/// Keeps only the posts `filters` accepts, preserving order.
#[must_use]
pub fn apply_filters(mut posts: Vec<Post>, filters: &SearchFilters) -> Vec<Post> {
    posts.retain(|post| filters.matches(post));
    posts
}
