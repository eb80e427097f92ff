use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{Duration as ChronoDuration, TimeZone};
use novascan_core::Platform;

use super::*;
use crate::embeddings::EmbeddingInput;
use crate::BoxFuture;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap()
}

fn post(id: &str, title: &str) -> Post {
    let mut p = Post::new(
        id,
        Platform::Reddit,
        title,
        format!("https://reddit.com/r/saas/{id}"),
        now() - ChronoDuration::days(2),
    );
    p.content = "We keep losing track of invoices and nobody owns the reconciliation.".into();
    p.author = "founder".into();
    p.score = 12;
    p.num_comments = 3;
    p
}

struct FakeSource {
    name: &'static str,
    posts: Vec<Post>,
    fail: bool,
}

impl FakeSource {
    fn ok(name: &'static str, posts: Vec<Post>) -> Box<dyn PostSource> {
        Box::new(Self {
            name,
            posts,
            fail: false,
        })
    }

    fn failing(name: &'static str) -> Box<dyn PostSource> {
        Box::new(Self {
            name,
            posts: Vec::new(),
            fail: true,
        })
    }
}

impl PostSource for FakeSource {
    fn name(&self) -> &str {
        self.name
    }

    fn fetch<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, Result<Vec<Post>, PipelineError>> {
        let result = if self.fail {
            Err(PipelineError::Source {
                source_name: self.name.to_string(),
                reason: "503".into(),
            })
        } else {
            Ok(self.posts.clone())
        };
        Box::pin(async move { result })
    }
}

#[derive(Default)]
struct FakeEmbedder {
    calls: AtomicUsize,
    fail: bool,
}

impl Embedder for FakeEmbedder {
    fn embed<'a>(
        &'a self,
        inputs: &'a [EmbeddingInput],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, PipelineError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail {
            Err(PipelineError::Embedding("TEI returned status 500".into()))
        } else {
            Ok(inputs.iter().map(|_| vec![0.1, 0.2, 0.3]).collect())
        };
        Box::pin(async move { result })
    }
}

#[derive(Default)]
struct FakeStore {
    stored: Mutex<Vec<String>>,
    fail: bool,
}

impl PostStore for FakeStore {
    fn upsert_posts<'a>(&'a self, posts: &'a [Post]) -> BoxFuture<'a, Result<(), PipelineError>> {
        let result = if self.fail {
            Err(PipelineError::Store("upsert returned status 503".into()))
        } else {
            self.stored
                .lock()
                .unwrap()
                .extend(posts.iter().map(|p| p.id.clone()));
            Ok(())
        };
        Box::pin(async move { result })
    }
}

fn settings(threshold: usize) -> CollectorSettings {
    CollectorSettings {
        embed_batch_size: 2,
        embed_batch_delay: Duration::ZERO,
        queue_threshold: threshold,
    }
}

fn collector(
    sources: Vec<Box<dyn PostSource>>,
    embedder: Arc<FakeEmbedder>,
    store: Arc<FakeStore>,
) -> Collector {
    Collector::new(sources, embedder, store, Pipeline::default(), settings(3))
}

#[tokio::test]
async fn cycle_embeds_stores_and_marks_processed() {
    let embedder = Arc::new(FakeEmbedder::default());
    let store = Arc::new(FakeStore::default());
    let mut collector = collector(
        vec![FakeSource::ok(
            "reddit",
            vec![
                post("a", "Invoice reconciliation is a nightmare"),
                post("b", "Which invoice software do you use"),
                post("c", "Looking for an invoice tool for agencies"),
            ],
        )],
        Arc::clone(&embedder),
        Arc::clone(&store),
    );

    let posts = collector
        .collect_for_query("  Invoice Software ", now())
        .await
        .unwrap();

    assert_eq!(posts.len(), 3);
    assert!(posts.iter().all(|p| p.embedding.is_some()));
    assert!(posts.iter().all(|p| p.sentiment.is_some() && p.quality.is_some()));
    assert_eq!(posts[0].id, "b", "exact title match ranks first");
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.stored.lock().unwrap().len(), 3);
    assert!(collector.state().is_processed("invoice software"));
}

#[tokio::test]
async fn failing_source_only_loses_its_own_posts() {
    let store = Arc::new(FakeStore::default());
    let mut collector = collector(
        vec![
            FakeSource::failing("youtube"),
            FakeSource::ok("reddit", vec![post("a", "Invoice reconciliation is a nightmare")]),
        ],
        Arc::new(FakeEmbedder::default()),
        Arc::clone(&store),
    );

    let posts = collector.collect_for_query("invoices", now()).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(*store.stored.lock().unwrap(), vec!["a".to_string()]);
}

#[tokio::test]
async fn embedding_failure_persists_nothing() {
    let store = Arc::new(FakeStore::default());
    let mut collector = collector(
        vec![FakeSource::ok("reddit", vec![post("a", "Invoice reconciliation is a nightmare")])],
        Arc::new(FakeEmbedder {
            fail: true,
            ..FakeEmbedder::default()
        }),
        Arc::clone(&store),
    );

    let err = collector.collect_for_query("invoices", now()).await.unwrap_err();
    assert!(matches!(err, PipelineError::Embedding(_)));
    assert!(store.stored.lock().unwrap().is_empty());
    assert!(!collector.state().is_processed("invoices"));
}

#[tokio::test]
async fn storage_failure_leaves_query_unprocessed() {
    let mut collector = collector(
        vec![FakeSource::ok("reddit", vec![post("a", "Invoice reconciliation is a nightmare")])],
        Arc::new(FakeEmbedder::default()),
        Arc::new(FakeStore {
            fail: true,
            ..FakeStore::default()
        }),
    );

    let err = collector.collect_for_query("invoices", now()).await.unwrap_err();
    assert!(matches!(err, PipelineError::Store(_)));
    assert!(!collector.state().is_processed("invoices"));
}

#[tokio::test]
async fn empty_pipeline_output_skips_embedding() {
    let embedder = Arc::new(FakeEmbedder::default());
    let mut noise = post("a", "Short");
    noise.content = "[removed]".into();
    let mut collector = collector(
        vec![FakeSource::ok("reddit", vec![noise])],
        Arc::clone(&embedder),
        Arc::new(FakeStore::default()),
    );

    let posts = collector.collect_for_query("invoices", now()).await.unwrap();
    assert!(posts.is_empty());
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert!(!collector.state().is_processed("invoices"));
}

#[test]
fn enqueue_skips_duplicates_and_reports_threshold() {
    let mut collector = collector(
        Vec::new(),
        Arc::new(FakeEmbedder::default()),
        Arc::new(FakeStore::default()),
    );

    assert!(!collector.enqueue("Invoices"));
    assert!(!collector.enqueue("invoices "));
    assert!(!collector.enqueue("crm"));
    assert!(!collector.enqueue("   "));
    assert!(collector.enqueue("payroll"));

    let queued: Vec<&str> = collector.state().queued().collect();
    assert_eq!(queued, vec!["invoices", "crm", "payroll"]);
}

#[tokio::test]
async fn enqueue_skips_processed_queries() {
    let mut collector = collector(
        vec![FakeSource::ok("reddit", vec![post("a", "Invoice reconciliation is a nightmare")])],
        Arc::new(FakeEmbedder::default()),
        Arc::new(FakeStore::default()),
    );
    collector.collect_for_query("invoices", now()).await.unwrap();

    collector.enqueue("INVOICES");
    assert_eq!(collector.status().queue_length, 0);
}

#[tokio::test]
async fn drain_queue_processes_in_order() {
    let store = Arc::new(FakeStore::default());
    let mut collector = collector(
        vec![FakeSource::ok("reddit", vec![post("a", "Invoice reconciliation is a nightmare")])],
        Arc::new(FakeEmbedder::default()),
        Arc::clone(&store),
    );
    collector.enqueue("invoices");
    collector.enqueue("billing");

    let stored = collector.drain_queue(now()).await.unwrap();
    assert_eq!(stored, 2);
    assert_eq!(collector.status().queue_length, 0);
    assert_eq!(collector.status().processed_count, 2);
}

#[tokio::test]
async fn failed_drain_keeps_remaining_queries() {
    let mut collector = collector(
        vec![FakeSource::ok("reddit", vec![post("a", "Invoice reconciliation is a nightmare")])],
        Arc::new(FakeEmbedder {
            fail: true,
            ..FakeEmbedder::default()
        }),
        Arc::new(FakeStore::default()),
    );
    collector.enqueue("invoices");
    collector.enqueue("billing");

    assert!(collector.drain_queue(now()).await.is_err());
    let queued: Vec<&str> = collector.state().queued().collect();
    assert_eq!(queued, vec!["invoices", "billing"]);
}

#[test]
fn status_reports_sources_and_threshold() {
    let collector = collector(
        vec![FakeSource::ok("reddit", Vec::new()), FakeSource::failing("hackernews")],
        Arc::new(FakeEmbedder::default()),
        Arc::new(FakeStore::default()),
    );
    let status = collector.status();
    assert_eq!(status.threshold, 3);
    assert_eq!(status.enabled_sources, vec!["reddit", "hackernews"]);

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["queueLength"], 0);
    assert_eq!(json["processedCount"], 0);
}

#[tokio::test]
async fn reset_clears_processed_and_queue() {
    let mut collector = collector(
        vec![FakeSource::ok("reddit", vec![post("a", "Invoice reconciliation is a nightmare")])],
        Arc::new(FakeEmbedder::default()),
        Arc::new(FakeStore::default()),
    );
    collector.collect_for_query("invoices", now()).await.unwrap();
    collector.enqueue("billing");

    collector.reset();

    assert!(!collector.state().is_processed("invoices"));
    assert_eq!(collector.status().queue_length, 0);
    assert_eq!(collector.status().processed_count, 0);
}

#[test]
fn settings_follow_app_config() {
    let config = AppConfig {
        env: novascan_core::Environment::Test,
        log_level: "info".into(),
        min_quality: 40.0,
        embed_url: None,
        embed_batch_size: 8,
        embed_batch_delay_ms: 250,
        qdrant_url: None,
        qdrant_collection: "social_signals".into(),
        qdrant_api_key: None,
        queue_threshold: 4,
        heuristics_path: None,
    };
    let settings = CollectorSettings::from(&config);
    assert_eq!(settings.embed_batch_size, 8);
    assert_eq!(settings.embed_batch_delay, Duration::from_millis(250));
    assert_eq!(settings.queue_threshold, 4);
}
