use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("vector store error: {0}")]
    Store(String),

    #[error("source {source_name} failed: {reason}")]
    Source { source_name: String, reason: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read heuristics file {path}: {source}")]
    HeuristicsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse heuristics: {0}")]
    HeuristicsParse(#[from] serde_yaml::Error),

    #[error("invalid heuristic pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
