use thiserror::Error;

/// Errors raised while fetching a page from the recipe source
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error("Failed to reach recipe source: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-success status
    #[error("Recipe source returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a valid search page
    #[error("Failed to parse recipe page: {0}")]
    Parse(#[from] serde_json::Error),

    /// The source client is missing required settings
    #[error("Recipe source misconfigured: {0}")]
    Config(String),
}

/// Errors raised by durable key/value storage
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage is not usable (poisoned lock, quota exceeded, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for setting up and driving a recipe browser
#[derive(Error, Debug)]
pub enum BrowseError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
