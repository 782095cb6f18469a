use thiserror::Error;

/// Errors that can occur when talking to the chat-completion service.
///
/// Every variant is transient from the evaluation loop's point of view: the
/// asking agent absorbs these with backoff and never surfaces them to the
/// runner.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LlmError {
    /// Transport-level failure from the HTTP client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service replied with a non-success status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {0}ms")]
    Timeout(u64),
}

/// Errors that can occur when loading a question file.
///
/// All of these are fatal at startup: a dataset that does not load is never
/// partially evaluated.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    /// Failed to read the dataset file
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the dataset JSON
    #[error("Failed to parse dataset: {0}")]
    Parse(String),

    /// A record parsed but does not form a valid four-option question
    #[error("Invalid question at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Top-level error for an evaluation run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvalError {
    /// Dataset could not be loaded
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
}
