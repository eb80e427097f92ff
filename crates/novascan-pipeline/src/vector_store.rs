//! Post storage: the [`PostStore`] seam and a Qdrant-backed implementation.

use chrono::{DateTime, Utc};
use novascan_core::{Platform, Post, QualityMetrics, SentimentScore};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;

use crate::error::PipelineError;
use crate::BoxFuture;

/// Persists annotated posts. Upserts must be idempotent by post id.
pub trait PostStore
where
    Self: Send + Sync,
{
    fn upsert_posts<'a>(&'a self, posts: &'a [Post]) -> BoxFuture<'a, Result<(), PipelineError>>;
}

/// Qdrant HTTP client storing one point per post.
pub struct QdrantStore {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    api_key: Option<String>,
    collection_ready: OnceCell<()>,
}

#[derive(Serialize)]
struct CreateCollectionRequest {
    vectors: VectorsConfig,
}

#[derive(Serialize)]
struct VectorsConfig {
    size: usize,
    distance: &'static str,
}

#[derive(Serialize)]
struct UpsertPointsRequest<'a> {
    points: Vec<Point<'a>>,
}

#[derive(Serialize)]
struct Point<'a> {
    id: u64,
    vector: &'a [f32],
    payload: PointPayload<'a>,
}

/// Post fields stored alongside the vector. The embedding is omitted since
/// it already travels as the point's `vector`.
#[derive(Serialize)]
struct PointPayload<'a> {
    id: &'a str,
    platform: Platform,
    title: &'a str,
    content: &'a str,
    author: &'a str,
    url: &'a str,
    created_at: DateTime<Utc>,
    score: i64,
    num_comments: i64,
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    sentiment: Option<&'a SentimentScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<&'a QualityMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain_context: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    relevance_score: Option<f64>,
    indexed_at: DateTime<Utc>,
}

impl<'a> From<&'a Post> for PointPayload<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            id: &post.id,
            platform: post.platform,
            title: &post.title,
            content: &post.content,
            author: &post.author,
            url: &post.url,
            created_at: post.created_at,
            score: post.score,
            num_comments: post.num_comments,
            tags: &post.tags,
            sentiment: post.sentiment.as_ref(),
            quality: post.quality.as_ref(),
            domain_context: post.domain_context.as_deref(),
            relevance_score: post.relevance_score,
            indexed_at: post.indexed_at,
        }
    }
}

impl QdrantStore {
    #[must_use]
    pub fn new(qdrant_url: &str, collection: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: qdrant_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            api_key: None,
            collection_ready: OnceCell::new(),
        }
    }

    /// Send `api-key` on every request.
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    /// Ensure the collection exists, creating it with cosine distance and
    /// `dim`-dimensional vectors if absent.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Store`] on network or API failure.
    pub async fn ensure_collection(&self, dim: usize) -> Result<(), PipelineError> {
        let url = self.collection_url();

        if let Ok(resp) = self.request(reqwest::Method::GET, &url).send().await {
            if resp.status().is_success() {
                return Ok(());
            }
        }

        let body = CreateCollectionRequest {
            vectors: VectorsConfig {
                size: dim,
                distance: "Cosine",
            },
        };

        let resp = self
            .request(reqwest::Method::PUT, &url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Store(format!("collection create request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(PipelineError::Store(format!(
                "collection create returned status {}",
                resp.status()
            )));
        }

        tracing::info!(collection = %self.collection, dim, "created Qdrant collection");
        Ok(())
    }

    async fn upsert(&self, posts: &[Post]) -> Result<(), PipelineError> {
        if posts.is_empty() {
            return Ok(());
        }

        let mut points = Vec::with_capacity(posts.len());
        for post in posts {
            let vector = post.embedding.as_deref().ok_or_else(|| {
                PipelineError::Store(format!("post {} has no embedding", post.id))
            })?;
            points.push(Point {
                id: post_point_id(&post.id),
                vector,
                payload: PointPayload::from(post),
            });
        }

        let dim = points[0].vector.len();
        self.collection_ready
            .get_or_try_init(|| self.ensure_collection(dim))
            .await?;

        let url = format!("{}/points?wait=true", self.collection_url());
        let resp = self
            .request(reqwest::Method::PUT, &url)
            .json(&UpsertPointsRequest { points })
            .send()
            .await
            .map_err(|e| PipelineError::Store(format!("upsert request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(PipelineError::Store(format!(
                "upsert returned status {}",
                resp.status()
            )));
        }

        tracing::debug!(
            collection = %self.collection,
            count = posts.len(),
            "upserted posts"
        );
        Ok(())
    }
}

impl PostStore for QdrantStore {
    fn upsert_posts<'a>(&'a self, posts: &'a [Post]) -> BoxFuture<'a, Result<(), PipelineError>> {
        Box::pin(self.upsert(posts))
    }
}

/// Derive a stable Qdrant point ID from a post id.
///
/// Takes the first 8 bytes of SHA-256(id) as a big-endian u64, so
/// re-upserting a post overwrites its previous point.
#[must_use]
pub fn post_point_id(post_id: &str) -> u64 {
    let hash = Sha256::digest(post_id.as_bytes());
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&hash[..8]);
    u64::from_be_bytes(bytes)
}
