use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Composite threshold for the quality filter stage.
    pub min_quality: f64,
    /// Base URL of a TEI-compatible embedding server. `None` disables indexing.
    pub embed_url: Option<String>,
    pub embed_batch_size: usize,
    pub embed_batch_delay_ms: u64,
    pub qdrant_url: Option<String>,
    pub qdrant_collection: String,
    pub qdrant_api_key: Option<String>,
    /// Queued queries needed before a drain is due.
    pub queue_threshold: usize,
    /// Optional YAML file overriding the built-in heuristic tables.
    pub heuristics_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("min_quality", &self.min_quality)
            .field("embed_url", &self.embed_url)
            .field("embed_batch_size", &self.embed_batch_size)
            .field("embed_batch_delay_ms", &self.embed_batch_delay_ms)
            .field("qdrant_url", &self.qdrant_url)
            .field("qdrant_collection", &self.qdrant_collection)
            .field(
                "qdrant_api_key",
                &self.qdrant_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("queue_threshold", &self.queue_threshold)
            .field("heuristics_path", &self.heuristics_path)
            .finish()
    }
}
