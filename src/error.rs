use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

/// Setup failures. Anything that goes wrong once the crawl is running is
/// reported as data on the result instead.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid scope pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] crate::fetch::FetchError),
}
