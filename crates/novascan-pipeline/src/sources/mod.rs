//! Post source abstractions.

mod file;

pub use file::JsonFileSource;

use futures::future::join_all;
use novascan_core::Post;

use crate::error::PipelineError;
use crate::BoxFuture;

/// A platform adapter that returns raw posts for a query.
pub trait PostSource
where
    Self: Send + Sync,
{
    /// Short identifier used in logs and queue status.
    fn name(&self) -> &str;

    fn fetch<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<Post>, PipelineError>>;
}

/// Fetch from every source concurrently and concatenate the results.
///
/// Continues past individual source failures, logging warnings. Results
/// keep source order. Returns an empty `Vec` if all sources fail.
pub async fn collect_posts(sources: &[Box<dyn PostSource>], query: &str) -> Vec<Post> {
    let results = join_all(sources.iter().map(|source| source.fetch(query))).await;

    let mut posts = Vec::new();
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(fetched) => {
                tracing::debug!(
                    source = source.name(),
                    query,
                    count = fetched.len(),
                    "collected posts"
                );
                posts.extend(fetched);
            }
            Err(e) => {
                tracing::warn!(
                    source = source.name(),
                    query,
                    error = %e,
                    "source fetch failed"
                );
            }
        }
    }

    posts
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use novascan_core::Platform;

    use super::*;

    struct StaticSource {
        name: &'static str,
        posts: Vec<Post>,
    }

    impl PostSource for StaticSource {
        fn name(&self) -> &str {
            self.name
        }

        fn fetch<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, Result<Vec<Post>, PipelineError>> {
            Box::pin(async move { Ok(self.posts.clone()) })
        }
    }

    struct FailingSource;

    impl PostSource for FailingSource {
        fn name(&self) -> &str {
            "broken"
        }

        fn fetch<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, Result<Vec<Post>, PipelineError>> {
            Box::pin(async {
                Err(PipelineError::Source {
                    source_name: "broken".into(),
                    reason: "rate limited".into(),
                })
            })
        }
    }

    fn post(id: &str, platform: Platform) -> Post {
        let created = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap();
        Post::new(id, platform, id, format!("https://x.com/{id}"), created)
    }

    #[tokio::test]
    async fn failing_source_does_not_abort_others() {
        let sources: Vec<Box<dyn PostSource>> = vec![
            Box::new(StaticSource {
                name: "reddit",
                posts: vec![post("r1", Platform::Reddit), post("r2", Platform::Reddit)],
            }),
            Box::new(FailingSource),
            Box::new(StaticSource {
                name: "hackernews",
                posts: vec![post("h1", Platform::HackerNews)],
            }),
        ];

        let posts = collect_posts(&sources, "invoices").await;
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2", "h1"]);
    }

    #[tokio::test]
    async fn all_sources_failing_yields_no_posts() {
        let sources: Vec<Box<dyn PostSource>> = vec![Box::new(FailingSource)];
        assert!(collect_posts(&sources, "q").await.is_empty());
    }
}
