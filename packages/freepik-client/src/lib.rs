//! Pure Freepik Mystic REST API client.
//!
//! A minimal client for the Freepik AI image generation API. Supports
//! submitting a Mystic generation task and fetching its status. Pacing and
//! attempt limits belong to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use freepik_client::{FreepikClient, MysticRequest, TaskStatus};
//!
//! let client = FreepikClient::new("your-api-key".into());
//!
//! let task_id = client.submit_task(&MysticRequest::thumbnail("a quiet spring park")).await?;
//! let task = client.get_task(&task_id).await?;
//! if task.status == TaskStatus::Completed {
//!     println!("{}", task.first_image_url().unwrap_or_default());
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{FreepikError, Result};
pub use types::{MysticRequest, TaskCreated, TaskData, TaskStatus};

use std::time::Duration;

use serde::de::DeserializeOwned;
use types::ApiResponse;

const BASE_URL: &str = "https://api.freepik.com/v1/ai/mystic";

pub struct FreepikClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl FreepikClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Submit a generation task. Returns immediately with the task id.
    pub async fn submit_task(&self, request: &MysticRequest) -> Result<String> {
        let resp = self
            .client
            .post(&self.base_url)
            .header("x-freepik-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;

        let created: ApiResponse<TaskCreated> = Self::parse(resp).await?;
        if created.data.task_id.is_empty() {
            return Err(FreepikError::Malformed("empty task_id".into()));
        }

        tracing::debug!(task_id = %created.data.task_id, "Freepik task submitted");
        Ok(created.data.task_id)
    }

    /// Fetch the current status of a task.
    ///
    /// A `COMPLETED` task without any generated asset is reported as malformed.
    pub async fn get_task(&self, task_id: &str) -> Result<TaskData> {
        let url = format!("{}/{}", self.base_url, task_id);
        let resp = self
            .client
            .get(&url)
            .header("x-freepik-api-key", &self.api_key)
            .timeout(self.timeout)
            .send()
            .await?;

        let task: ApiResponse<TaskData> = Self::parse(resp).await?;
        if task.data.status == TaskStatus::Completed && task.data.generated.is_empty() {
            return Err(FreepikError::Malformed(format!(
                "task {} completed without generated images",
                task_id
            )));
        }

        tracing::debug!(task_id, status = %task.data.status, "Freepik task status");
        Ok(task.data)
    }

    async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Freepik API error");
            return Err(FreepikError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| FreepikError::Malformed(e.to_string()))
    }
}
