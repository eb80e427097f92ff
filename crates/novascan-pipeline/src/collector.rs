//! Background collection: fetch, annotate, run the pipeline, embed and
//! store posts for a query, plus the pending-query queue.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use novascan_core::{AppConfig, Post};
use serde::Serialize;

use crate::embeddings::{embed_posts, Embedder};
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use crate::sources::{collect_posts, PostSource};
use crate::vector_store::PostStore;

/// Queries that completed a cycle and queries waiting for one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectorState {
    processed: HashSet<String>,
    queue: VecDeque<String>,
}

impl CollectorState {
    #[must_use]
    pub fn is_processed(&self, query: &str) -> bool {
        self.processed.contains(&normalize_query(query))
    }

    #[must_use]
    pub fn queued(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    /// Forget every processed query and drop the queue.
    pub fn reset(&mut self) {
        self.processed.clear();
        self.queue.clear();
    }
}

/// Snapshot of the collector for status reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub queue_length: usize,
    pub threshold: usize,
    pub processed_count: usize,
    pub enabled_sources: Vec<String>,
}

/// Batching and queue settings for a [`Collector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectorSettings {
    pub embed_batch_size: usize,
    pub embed_batch_delay: Duration,
    pub queue_threshold: usize,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            embed_batch_size: 5,
            embed_batch_delay: Duration::from_millis(2000),
            queue_threshold: 10,
        }
    }
}

impl From<&AppConfig> for CollectorSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            embed_batch_size: config.embed_batch_size,
            embed_batch_delay: Duration::from_millis(config.embed_batch_delay_ms),
            queue_threshold: config.queue_threshold,
        }
    }
}

/// Lowercased, trimmed form used for processed/queued bookkeeping.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

pub struct Collector {
    sources: Vec<Box<dyn PostSource>>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn PostStore>,
    pipeline: Pipeline,
    settings: CollectorSettings,
    state: CollectorState,
}

impl Collector {
    #[must_use]
    pub fn new(
        sources: Vec<Box<dyn PostSource>>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn PostStore>,
        pipeline: Pipeline,
        settings: CollectorSettings,
    ) -> Self {
        Self {
            sources,
            embedder,
            store,
            pipeline,
            settings,
            state: CollectorState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &CollectorState {
        &self.state
    }

    /// Run one full cycle for `query` and return the stored posts.
    ///
    /// Sources are fetched concurrently and a failing source only costs its
    /// own posts. If nothing survives the pipeline, embedding and storage are
    /// skipped and the query is left unprocessed so a later cycle can retry
    /// it. On success the normalized query is marked processed.
    ///
    /// # Errors
    ///
    /// Returns the embedding or storage error. Nothing is persisted when
    /// embedding fails, and the query is not marked processed in either case.
    pub async fn collect_for_query(
        &mut self,
        query: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Post>, PipelineError> {
        let mut posts = collect_posts(&self.sources, query).await;
        if posts.is_empty() {
            tracing::info!(query, "no posts collected");
            return Ok(Vec::new());
        }
        let fetched = posts.len();

        self.pipeline.annotate(&mut posts);
        let mut posts = self.pipeline.run(posts, Some(query), now);
        if posts.is_empty() {
            tracing::info!(query, fetched, "no posts survived the pipeline");
            return Ok(Vec::new());
        }

        embed_posts(
            self.embedder.as_ref(),
            &mut posts,
            self.settings.embed_batch_size,
            self.settings.embed_batch_delay,
        )
        .await?;
        self.store.upsert_posts(&posts).await?;

        self.state.processed.insert(normalize_query(query));
        tracing::info!(query, fetched, stored = posts.len(), "collection cycle complete");

        Ok(posts)
    }

    /// Queue a query for later collection.
    ///
    /// Queries already processed or already queued are skipped. Returns
    /// `true` when the queue has reached the threshold and should be drained.
    pub fn enqueue(&mut self, query: &str) -> bool {
        let normalized = normalize_query(query);
        if !normalized.is_empty()
            && !self.state.processed.contains(&normalized)
            && !self.state.queue.contains(&normalized)
        {
            self.state.queue.push_back(normalized);
        }
        self.state.queue.len() >= self.settings.queue_threshold
    }

    /// Collect every queued query in order. Returns the number of posts
    /// stored.
    ///
    /// # Errors
    ///
    /// Stops at the first failing query, which stays at the front of the
    /// queue along with everything after it.
    pub async fn drain_queue(&mut self, now: DateTime<Utc>) -> Result<usize, PipelineError> {
        let mut stored = 0;
        while let Some(query) = self.state.queue.pop_front() {
            match self.collect_for_query(&query, now).await {
                Ok(posts) => stored += posts.len(),
                Err(e) => {
                    tracing::warn!(query = %query, error = %e, "queued collection failed");
                    self.state.queue.push_front(query);
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }

    #[must_use]
    pub fn status(&self) -> QueueStatus {
        QueueStatus {
            queue_length: self.state.queue.len(),
            threshold: self.settings.queue_threshold,
            processed_count: self.state.processed.len(),
            enabled_sources: self.sources.iter().map(|s| s.name().to_string()).collect(),
        }
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
#[path = "collector_test.rs"]
mod tests;
