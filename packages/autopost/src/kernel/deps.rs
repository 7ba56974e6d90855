//! Pipeline dependencies (using traits for testability)
//!
//! This module provides the dependency container used by every pipeline
//! stage, plus the adapters that put the API client crates behind the
//! Base* traits.

use anyhow::{Context, Result};
use anthropic_client::{AnthropicClient, Message, MessagesRequest};
use async_trait::async_trait;
use freepik_client::{FreepikClient, MysticRequest, TaskStatus};
use std::sync::Arc;
use std::time::Duration;
use wikidocs::{BlogUpdate, WikidocsOptions, WikidocsService};

use crate::config::Config;
use crate::kernel::{
    BaseImageDownloader, BaseImageJobService, BasePostRepository, BaseTextGenerator,
    HttpImageDownloader, JobPoll, JobStatus, PostUpdate,
};

/// Sampling temperature for post generation.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Download timeout for generated images.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

// =============================================================================
// AnthropicClient Adapter (implements BaseTextGenerator trait)
// =============================================================================

/// Wrapper around AnthropicClient that pins the model and temperature
pub struct AnthropicAdapter {
    client: AnthropicClient,
    model: String,
    temperature: f32,
}

impl AnthropicAdapter {
    pub fn new(client: AnthropicClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: GENERATION_TEMPERATURE,
        }
    }
}

#[async_trait]
impl BaseTextGenerator for AnthropicAdapter {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .messages(
                MessagesRequest::new(&self.model)
                    .message(Message::user(prompt))
                    .temperature(self.temperature),
            )
            .await
            .context("Anthropic request failed")?;

        Ok(response.content)
    }
}

// =============================================================================
// WikidocsService Adapter (implements BasePostRepository trait)
// =============================================================================

/// Wrapper around WikidocsService that implements BasePostRepository trait
pub struct WikidocsAdapter(pub Arc<WikidocsService>);

impl WikidocsAdapter {
    pub fn new(service: Arc<WikidocsService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BasePostRepository for WikidocsAdapter {
    async fn create_empty_post(&self) -> Result<i64> {
        self.0
            .create_blog()
            .await
            .context("Failed to create blog post")
    }

    async fn upload_image(&self, post_id: i64, data: Vec<u8>) -> Result<String> {
        let uploaded = self
            .0
            .upload_image(post_id, data)
            .await
            .context("Failed to upload image")?;

        Ok(uploaded.image_markdown_url.unwrap_or_default())
    }

    async fn update_post(&self, post_id: i64, update: &PostUpdate) -> Result<()> {
        let body = BlogUpdate {
            title: update.title.clone(),
            content: update.body.clone(),
            is_public: update.is_public,
            tags: update.tags.clone(),
        };

        self.0
            .update_blog(post_id, &body)
            .await
            .context("Failed to update blog post")
    }

    fn post_url(&self, post_id: i64) -> String {
        WikidocsService::public_url(post_id)
    }
}

// =============================================================================
// FreepikClient Adapter (implements BaseImageJobService trait)
// =============================================================================

/// Wrapper around FreepikClient that implements BaseImageJobService trait
pub struct FreepikAdapter(pub Arc<FreepikClient>);

impl FreepikAdapter {
    pub fn new(client: Arc<FreepikClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseImageJobService for FreepikAdapter {
    async fn submit_job(&self, prompt: &str) -> Result<String> {
        self.0
            .submit_task(&MysticRequest::thumbnail(prompt))
            .await
            .context("Failed to submit image task")
    }

    async fn poll_once(&self, job_id: &str) -> Result<JobPoll> {
        let task = self
            .0
            .get_task(job_id)
            .await
            .context("Failed to check image task")?;

        Ok(match task.status {
            TaskStatus::Completed => JobPoll {
                status: JobStatus::Completed,
                image_url: task.first_image_url().map(str::to_string),
            },
            TaskStatus::Failed => JobPoll::failed(),
            TaskStatus::Created | TaskStatus::InProgress | TaskStatus::Unknown => {
                JobPoll::pending()
            }
        })
    }
}

// =============================================================================
// PipelineDeps
// =============================================================================

/// Pipeline dependencies accessible to stages (using traits for testability)
#[derive(Clone)]
pub struct PipelineDeps {
    pub text_generator: Arc<dyn BaseTextGenerator>,
    pub posts: Arc<dyn BasePostRepository>,
    pub image_jobs: Arc<dyn BaseImageJobService>,
    pub downloader: Arc<dyn BaseImageDownloader>,
}

impl PipelineDeps {
    pub fn new(
        text_generator: Arc<dyn BaseTextGenerator>,
        posts: Arc<dyn BasePostRepository>,
        image_jobs: Arc<dyn BaseImageJobService>,
        downloader: Arc<dyn BaseImageDownloader>,
    ) -> Self {
        Self {
            text_generator,
            posts,
            image_jobs,
            downloader,
        }
    }

    /// Wire the production clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut anthropic = AnthropicClient::new(config.anthropic_api_key.expose());
        if let Some(url) = &config.anthropic_base_url {
            anthropic = anthropic.with_base_url(url);
        }

        let mut wikidocs_options = WikidocsOptions::new(config.wikidocs_api_key.expose());
        if let Some(url) = &config.wikidocs_base_url {
            wikidocs_options.base_url = url.clone();
        }

        let mut freepik = FreepikClient::new(config.freepik_api_key.expose().to_string());
        if let Some(url) = &config.freepik_base_url {
            freepik = freepik.with_base_url(url);
        }

        Ok(Self::new(
            Arc::new(AnthropicAdapter::new(anthropic, &config.anthropic_model)),
            Arc::new(WikidocsAdapter::new(Arc::new(WikidocsService::new(
                wikidocs_options,
            )))),
            Arc::new(FreepikAdapter::new(Arc::new(freepik))),
            Arc::new(HttpImageDownloader::new(DOWNLOAD_TIMEOUT)?),
        ))
    }
}
