use thiserror::Error;

/// Errors that can occur while fetching, storing, or reading crawl results.
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("termination criteria met: status {status} for {url}")]
    Terminated { status: u16, url: String },

    #[error("{0}")]
    TerminationHook(String),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fetch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("{path} does not exist and its creation was declined")]
    CreationDeclined { path: String },

    #[error("index entry references line {line} which is absent from {path}")]
    MissingLine { line: usize, path: String },
}

pub type Result<T> = std::result::Result<T, CrawlerError>;
