//! Embedding generation: the [`Embedder`] seam, a TEI (Text Embeddings
//! Inference) client, and the rate-limited batch driver.

use std::time::Duration;

use novascan_core::Post;
use serde::Serialize;

use crate::error::PipelineError;
use crate::BoxFuture;

/// Post content beyond this many characters is left out of the embedding text.
const CONTENT_PREVIEW_CHARS: usize = 500;

/// One embedding request item.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingInput {
    pub post_id: String,
    pub text: String,
}

/// Turns text into vectors.
///
/// Implementations embed exactly the inputs they are given and must return
/// one vector per input, in order. Batching and pacing are handled by
/// [`embed_posts`].
pub trait Embedder
where
    Self: Send + Sync,
{
    fn embed<'a>(
        &'a self,
        inputs: &'a [EmbeddingInput],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, PipelineError>>;
}

/// Build the text sent to the embedder for a post.
///
/// The title appears twice to weight it over the body, which is truncated
/// to 500 characters.
#[must_use]
pub fn prepare_text_for_embedding(post: &Post) -> String {
    let mut parts = vec![
        format!("Title: {}", post.title),
        format!("Title: {}", post.title),
    ];

    if !post.content.is_empty() {
        let preview: String = post.content.chars().take(CONTENT_PREVIEW_CHARS).collect();
        parts.push(format!("Content: {preview}"));
    }

    if !post.tags.is_empty() {
        parts.push(format!("Tags: {}", post.tags.join(", ")));
    }

    parts.push(format!("Platform: {}", post.platform));

    parts.join(" | ")
}

/// Embed every post in fixed-size batches and store the vectors on the posts.
///
/// Sleeps for `batch_delay` between batches (not after the last one). Any
/// batch failure or count mismatch aborts the whole run and leaves every
/// post's `embedding` untouched.
///
/// # Errors
///
/// Returns the embedder's error, or [`PipelineError::Embedding`] if it
/// returns the wrong number of vectors.
pub async fn embed_posts(
    embedder: &dyn Embedder,
    posts: &mut [Post],
    batch_size: usize,
    batch_delay: Duration,
) -> Result<(), PipelineError> {
    let inputs: Vec<EmbeddingInput> = posts
        .iter()
        .map(|post| EmbeddingInput {
            post_id: post.id.clone(),
            text: prepare_text_for_embedding(post),
        })
        .collect();

    let batch_size = batch_size.max(1);
    let batch_count = inputs.len().div_ceil(batch_size);
    let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(inputs.len());

    for (i, chunk) in inputs.chunks(batch_size).enumerate() {
        let batch = embedder.embed(chunk).await?;
        if batch.len() != chunk.len() {
            return Err(PipelineError::Embedding(format!(
                "embedder returned {} vectors for {} inputs",
                batch.len(),
                chunk.len()
            )));
        }
        vectors.extend(batch);

        tracing::debug!(
            batch = i + 1,
            batches = batch_count,
            "embedded batch"
        );

        if i + 1 < batch_count && !batch_delay.is_zero() {
            tokio::time::sleep(batch_delay).await;
        }
    }

    for (post, vector) in posts.iter_mut().zip(vectors) {
        post.embedding = Some(vector);
    }

    Ok(())
}

/// TEI HTTP client.
pub struct TeiEmbedder {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: Vec<&'a str>,
}

impl TeiEmbedder {
    /// Create a new `TeiEmbedder` for a TEI base URL.
    #[must_use]
    pub fn new(tei_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/embed", tei_url.trim_end_matches('/')),
        }
    }

    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> Result<Vec<Vec<f32>>, PipelineError> {
        let request = EmbedRequest {
            inputs: inputs.iter().map(|i| i.text.as_str()).collect(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::Embedding(format!("TEI request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PipelineError::Embedding(format!(
                "TEI returned status {}",
                response.status()
            )));
        }

        let embeddings: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| PipelineError::Embedding(format!("TEI response parse error: {e}")))?;

        if embeddings.len() != inputs.len() {
            return Err(PipelineError::Embedding(format!(
                "TEI returned {} embeddings for {} inputs",
                embeddings.len(),
                inputs.len()
            )));
        }

        Ok(embeddings)
    }
}

impl Embedder for TeiEmbedder {
    fn embed<'a>(
        &'a self,
        inputs: &'a [EmbeddingInput],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, PipelineError>> {
        Box::pin(self.embed_batch(inputs))
    }
}
