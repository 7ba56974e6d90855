//! Typed errors for pipeline stages.
//!
//! Every stage converts its own failure into one of these and records the
//! rendered message on the pipeline state. The orchestrator never matches
//! on the variant; only the message reaches the user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Model call failed or its reply could not be parsed
    #[error("content generation failed: {0}")]
    Generation(String),

    /// Any blog platform failure (create, upload, update)
    #[error("blog platform error: {0}")]
    Repository(String),

    /// Image job submission, status check or malformed job response
    #[error("image job error: {0}")]
    ImageJob(String),

    /// Poll attempts exhausted before the image was ready
    #[error("image generation timed out after {attempts} status checks")]
    Timeout { attempts: u32 },

    /// Fetching the generated image bytes failed
    #[error("image download failed: {0}")]
    Download(String),
}

impl PipelineError {
    /// Render an `anyhow` chain (outermost context first) into one line.
    pub(crate) fn chain(err: &anyhow::Error) -> String {
        format!("{:#}", err)
    }
}
