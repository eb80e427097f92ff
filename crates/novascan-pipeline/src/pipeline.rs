//! Pipeline orchestration: annotation followed by the ordered cleaning,
//! enrichment and ranking stages.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use novascan_core::Post;

use crate::dedup::deduplicate;
use crate::filter::{filter_by_quality, remove_noise, DEFAULT_MIN_QUALITY};
use crate::heuristics::Heuristics;
use crate::quality::{analyze_quality, classify_domain};
use crate::relevance::{apply_freshness_boost, score_relevance};
use crate::sentiment::analyze_sentiment;
use crate::tags::enrich_tags;

/// The enrichment pipeline over a batch of posts.
#[derive(Debug, Clone)]
pub struct Pipeline {
    heuristics: Arc<Heuristics>,
    min_quality: f64,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Arc::new(Heuristics::default()))
    }
}

impl Pipeline {
    #[must_use]
    pub fn new(heuristics: Arc<Heuristics>) -> Self {
        Self {
            heuristics,
            min_quality: DEFAULT_MIN_QUALITY,
        }
    }

    /// Override the composite quality threshold (default 40).
    #[must_use]
    pub fn with_min_quality(mut self, min_quality: f64) -> Self {
        self.min_quality = min_quality;
        self
    }

    /// Set sentiment, quality metrics and domain on each post from its
    /// title and body.
    pub fn annotate(&self, posts: &mut [Post]) {
        for post in posts {
            let text = post.full_text();
            post.sentiment = Some(analyze_sentiment(&text, &self.heuristics));
            post.quality = Some(analyze_quality(&text, &self.heuristics));
            post.domain_context = Some(classify_domain(&text, &post.tags, &self.heuristics));
        }
    }

    /// Run the stages in order:
    ///
    /// 1. remove noise;
    /// 2. deduplicate;
    /// 3. filter by composite quality;
    /// 4. enrich tags;
    /// 5. with a non-blank query: score relevance, sort by relevance
    ///    descending (stable), then apply the freshness boost.
    ///
    /// Without a query the output keeps the engagement order produced by
    /// deduplication. `now` is the reference time for every age check.
    #[must_use]
    pub fn run(&self, posts: Vec<Post>, query: Option<&str>, now: DateTime<Utc>) -> Vec<Post> {
        let input = posts.len();

        let posts = remove_noise(posts, now);
        let posts = deduplicate(posts);
        let posts = filter_by_quality(posts, self.min_quality, now);
        let mut posts = enrich_tags(posts, &self.heuristics);

        if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
            posts = score_relevance(posts, query);
            posts.sort_by(|a, b| {
                let a = a.relevance_score.unwrap_or(0.0);
                let b = b.relevance_score.unwrap_or(0.0);
                b.total_cmp(&a)
            });
            apply_freshness_boost(&mut posts, now);
        }

        tracing::debug!(
            input,
            output = posts.len(),
            query = query.unwrap_or_default(),
            "pipeline run complete"
        );

        posts
    }
}
