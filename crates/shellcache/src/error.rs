use reqwest::StatusCode;

// Custom error type for worker operations
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(String),

    #[error("Server returned status code {0} for {1}")]
    StatusCode(StatusCode, String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<url::ParseError> for WorkerError {
    fn from(err: url::ParseError) -> Self {
        WorkerError::UrlError(err.to_string())
    }
}
