use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Content source a [`Post`] was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Reddit,
    HackerNews,
    ProductHunt,
    Quora,
    YouTube,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Reddit => write!(f, "reddit"),
            Platform::HackerNews => write!(f, "hackernews"),
            Platform::ProductHunt => write!(f, "producthunt"),
            Platform::Quora => write!(f, "quora"),
            Platform::YouTube => write!(f, "youtube"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
            SentimentLabel::Neutral => write!(f, "neutral"),
        }
    }
}

/// Lexicon sentiment of a post's title and body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Sum of signed word contributions. Unbounded.
    pub score: f64,
    /// `score` divided by token count.
    pub comparative: f64,
    pub label: SentimentLabel,
    /// Share of sentiment-bearing tokens, in `[0.0, 1.0]`.
    pub confidence: f64,
}

/// Text-quality heuristics for a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub text_length: usize,
    pub word_count: usize,
    /// In `[0.0, 1.0]`; higher reads more easily.
    pub readability_score: f64,
    pub has_code: bool,
    pub has_links: bool,
    /// In `[0.0, 1.0]`; higher is more likely spam.
    pub spam_score: f64,
}

/// A normalized content item from one source platform.
///
/// Identity and content fields are set by the source adapter and never
/// rewritten. Annotation fields (`sentiment`, `quality`, `domain_context`,
/// `relevance_score`, `embedding`) are filled by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Stable per source and native id, e.g. `"hn_39120044"`.
    pub id: String,
    pub platform: Platform,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    /// Upvotes, points, or karma as reported by the platform.
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_context: Option<String>,
    /// Query-specific ranking signal. Recomputed on every search cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    #[serde(default = "Utc::now")]
    pub indexed_at: DateTime<Utc>,
}

impl Post {
    /// Builds an unannotated post with empty body, no author, and zero engagement.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        platform: Platform,
        title: impl Into<String>,
        url: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            platform,
            title: title.into(),
            content: String::new(),
            author: String::new(),
            url: url.into(),
            created_at,
            score: 0,
            num_comments: 0,
            tags: Vec::new(),
            sentiment: None,
            quality: None,
            domain_context: None,
            relevance_score: None,
            embedding: None,
            indexed_at: created_at,
        }
    }

    /// Popularity proxy: `score + num_comments`.
    #[must_use]
    pub fn engagement(&self) -> i64 {
        self.score + self.num_comments
    }

    /// Title and body joined by a single space.
    #[must_use]
    pub fn full_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }

    /// Fractional age in days relative to `now`. Negative for future timestamps.
    #[must_use]
    pub fn age_days(&self, now: DateTime<Utc>) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let millis = (now - self.created_at).num_milliseconds() as f64;
        millis / 1000.0 / SECONDS_PER_DAY
    }

    /// Spam score from the quality annotation, or `None` before analysis.
    #[must_use]
    pub fn spam_score(&self) -> Option<f64> {
        self.quality.as_ref().map(|q| q.spam_score)
    }
}
