//! Post enrichment pipeline for NovaScan.
//!
//! Annotates raw posts from the source platforms with sentiment, text
//! quality and topic domain, cleans and deduplicates them, enriches their
//! tags, and ranks them against a query. The [`Collector`] drives a full
//! cycle: fetch from every [`PostSource`], run the [`Pipeline`], embed via
//! an [`Embedder`] and persist through a [`PostStore`].

use std::future::Future;
use std::pin::Pin;

pub mod collector;
pub mod dedup;
pub mod embeddings;
pub mod error;
pub mod filter;
pub mod heuristics;
pub mod pipeline;
pub mod quality;
pub mod relevance;
pub mod sentiment;
pub mod sources;
pub mod tags;
pub mod vector_store;

pub use collector::{Collector, CollectorSettings, CollectorState, QueueStatus};
pub use dedup::deduplicate;
pub use embeddings::{embed_posts, prepare_text_for_embedding, Embedder, EmbeddingInput, TeiEmbedder};
pub use error::PipelineError;
pub use filter::{filter_by_quality, quality_score, remove_noise};
pub use heuristics::{HeuristicTables, Heuristics};
pub use pipeline::Pipeline;
pub use quality::{analyze_quality, classify_domain};
pub use relevance::{apply_freshness_boost, calculate_relevance, score_relevance};
pub use sentiment::analyze_sentiment;
pub use sources::{collect_posts, JsonFileSource, PostSource};
pub use tags::{enrich_tags, extract_enhanced_tags};
pub use vector_store::{PostStore, QdrantStore};

/// Boxed future returned by the collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
