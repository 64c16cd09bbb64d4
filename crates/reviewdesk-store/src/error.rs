use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document file not found: {0}")]
    FileNotFound(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document {index} in {source_name}: {reason}")]
    BadDocument {
        source_name: String,
        index: usize,
        reason: String,
    },

    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
}
