use thiserror::Error;

pub type Result<T> = std::result::Result<T, FreepikError>;

#[derive(Debug, Error)]
pub enum FreepikError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Freepik API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed Freepik response: {0}")]
    Malformed(String),
}
