use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    /// The access key could not be resolved. Raised before any network I/O.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure from the HTTP client, passed through as-is.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Non-success status from the image endpoint. `body` is the raw reply.
    #[error("Endpoint returned {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("Response error: {0}")]
    Response(String),

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StudioError>;
