//! Source backed by a JSON file of raw posts.

use std::path::PathBuf;

use novascan_core::Post;

use super::PostSource;
use crate::error::PipelineError;
use crate::BoxFuture;

/// Reads a JSON array of posts from disk on every fetch.
///
/// The query is ignored; ranking against it happens in the pipeline.
pub struct JsonFileSource {
    name: String,
    path: PathBuf,
}

impl JsonFileSource {
    /// The source name is the file stem, or `file` if there is none.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("file")
            .to_string();
        Self { name, path }
    }

    async fn read_posts(&self) -> Result<Vec<Post>, PipelineError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| PipelineError::Source {
                source_name: self.name.clone(),
                reason: format!("failed to read {}: {e}", self.path.display()),
            })?;

        serde_json::from_str(&raw).map_err(|source| PipelineError::Deserialize {
            context: self.path.display().to_string(),
            source,
        })
    }
}

impl PostSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, Result<Vec<Post>, PipelineError>> {
        Box::pin(self.read_posts())
    }
}
