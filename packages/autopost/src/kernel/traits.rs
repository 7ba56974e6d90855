// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no pipeline logic.
// Prompt building, polling decisions and body composition live in pipeline/.
//
// Naming convention: Base* for trait names (e.g., BaseTextGenerator)

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// Text Generation Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseTextGenerator: Send + Sync {
    /// Send a single user message and return the raw reply text
    async fn complete(&self, prompt: &str) -> Result<String>;
}

// =============================================================================
// Post Repository Trait (Infrastructure - Blog platform)
// =============================================================================

/// Final content written to a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: String,
    pub body: String,
    pub tags: String,
    pub is_public: bool,
}

#[async_trait]
pub trait BasePostRepository: Send + Sync {
    /// Create an empty post and return its id
    async fn create_empty_post(&self) -> Result<i64>;

    /// Upload image bytes for a post, returning an embeddable reference.
    /// The reference is empty when the platform omits it.
    async fn upload_image(&self, post_id: i64, data: Vec<u8>) -> Result<String>;

    /// Overwrite title, body and tags of a post
    async fn update_post(&self, post_id: i64, update: &PostUpdate) -> Result<()>;

    /// Canonical public URL of a post
    fn post_url(&self, post_id: i64) -> String;
}

// =============================================================================
// Image Job Trait (Infrastructure - Asynchronous image generation)
// =============================================================================

/// Provider-agnostic job status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Queued or still rendering
    Pending,
    Completed,
    /// The provider gave up on the job
    Failed,
}

/// Result of one status check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPoll {
    pub status: JobStatus,
    /// First generated asset, only present when completed
    pub image_url: Option<String>,
}

impl JobPoll {
    pub fn pending() -> Self {
        Self {
            status: JobStatus::Pending,
            image_url: None,
        }
    }

    pub fn completed(url: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Completed,
            image_url: Some(url.into()),
        }
    }

    pub fn failed() -> Self {
        Self {
            status: JobStatus::Failed,
            image_url: None,
        }
    }
}

#[async_trait]
pub trait BaseImageJobService: Send + Sync {
    /// Submit a generation job and return its id
    async fn submit_job(&self, prompt: &str) -> Result<String>;

    /// Check job status once (no waiting)
    async fn poll_once(&self, job_id: &str) -> Result<JobPoll>;
}

// =============================================================================
// Image Download Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseImageDownloader: Send + Sync {
    /// Fetch the bytes behind a URL
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}
