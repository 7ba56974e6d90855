use thiserror::Error;

pub type Result<T> = std::result::Result<T, WikidocsError>;

#[derive(Debug, Error)]
pub enum WikidocsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WikiDocs returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected WikiDocs response: {0}")]
    Malformed(String),
}
