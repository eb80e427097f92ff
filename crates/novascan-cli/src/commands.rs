//! Command handlers for the CLI.
//!
//! Handlers print machine-readable output (JSON or YAML) on stdout; logs go
//! to stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use novascan_core::{apply_filters, AppConfig, Post, SearchFilters};
use novascan_pipeline::{
    analyze_quality, analyze_sentiment, classify_domain, Collector, CollectorSettings,
    Heuristics, JsonFileSource, Pipeline, PostSource, QdrantStore, TeiEmbedder,
};

/// Load the heuristic tables from `NOVASCAN_HEURISTICS_PATH`, or the
/// built-in tables when unset.
pub(crate) fn load_heuristics(config: &AppConfig) -> anyhow::Result<Heuristics> {
    match &config.heuristics_path {
        Some(path) => {
            let heuristics = Heuristics::load(path)?;
            tracing::info!(path = %path.display(), "loaded heuristic tables");
            Ok(heuristics)
        }
        None => Ok(Heuristics::default()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Embeddings are dropped from printed posts; they are only useful to the store.
fn print_posts(mut posts: Vec<Post>) -> anyhow::Result<()> {
    for post in &mut posts {
        post.embedding = None;
    }
    println!("{}", serde_json::to_string_pretty(&posts)?);
    Ok(())
}

pub(crate) fn run_analyze(config: &AppConfig, text: &str) -> anyhow::Result<()> {
    let heuristics = load_heuristics(config)?;
    let output = serde_json::json!({
        "sentiment": analyze_sentiment(text, &heuristics),
        "quality": analyze_quality(text, &heuristics),
        "domain": classify_domain(text, &[], &heuristics),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Annotate and enrich posts from a file without embedding or storage.
///
/// # Errors
///
/// Returns an error if the input or filter file cannot be read or parsed,
/// or the heuristic tables fail to load.
pub(crate) fn run_process(
    config: &AppConfig,
    input: &Path,
    query: Option<&str>,
    min_quality: Option<f64>,
    filters: Option<&Path>,
) -> anyhow::Result<()> {
    let heuristics = load_heuristics(config)?;
    let pipeline = Pipeline::new(Arc::new(heuristics))
        .with_min_quality(min_quality.unwrap_or(config.min_quality));

    let mut posts: Vec<Post> = read_json(input)?;
    let fetched = posts.len();
    pipeline.annotate(&mut posts);
    let mut posts = pipeline.run(posts, query, Utc::now());

    if let Some(path) = filters {
        let filters: SearchFilters = read_json(path)?;
        posts = apply_filters(posts, &filters);
    }

    tracing::info!(fetched, kept = posts.len(), "processed posts");
    print_posts(posts)
}

/// Run one collection cycle over file-backed sources.
///
/// # Errors
///
/// Returns an error if the embedding or Qdrant URL is not configured, or if
/// embedding or storage fails. Unreadable input files are logged and skipped
/// like any other failing source.
pub(crate) async fn run_collect(
    config: &AppConfig,
    inputs: Vec<PathBuf>,
    query: &str,
) -> anyhow::Result<()> {
    let embed_url = config
        .embed_url
        .as_deref()
        .context("NOVASCAN_EMBED_URL must be set to collect")?;
    let qdrant_url = config
        .qdrant_url
        .as_deref()
        .context("NOVASCAN_QDRANT_URL must be set to collect")?;

    let heuristics = load_heuristics(config)?;
    let pipeline = Pipeline::new(Arc::new(heuristics)).with_min_quality(config.min_quality);

    let sources: Vec<Box<dyn PostSource>> = inputs
        .into_iter()
        .map(|path| Box::new(JsonFileSource::new(path)) as Box<dyn PostSource>)
        .collect();
    let store = QdrantStore::new(qdrant_url, &config.qdrant_collection)
        .with_api_key(config.qdrant_api_key.clone());

    let mut collector = Collector::new(
        sources,
        Arc::new(TeiEmbedder::new(embed_url)),
        Arc::new(store),
        pipeline,
        CollectorSettings::from(config),
    );

    let posts = collector.collect_for_query(query, Utc::now()).await?;
    let status = collector.status();
    tracing::info!(
        query,
        stored = posts.len(),
        processed = status.processed_count,
        sources = ?status.enabled_sources,
        "collection finished"
    );
    print_posts(posts)
}

pub(crate) fn run_heuristics(config: &AppConfig) -> anyhow::Result<()> {
    let heuristics = load_heuristics(config)?;
    print!("{}", serde_yaml::to_string(heuristics.tables())?);
    Ok(())
}
