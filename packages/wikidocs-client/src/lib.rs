//! WikiDocs blog API client.
//!
//! Covers the three calls needed to publish a post: create an empty blog
//! entry, upload an image for it, and update its content.

pub mod error;
pub mod models;

pub use error::{Result, WikidocsError};
pub use models::{BlogUpdate, CreatedBlog, UploadedImage};

use std::time::Duration;

use reqwest::{multipart, Client, Response};

pub const DEFAULT_BASE_URL: &str = "https://wikidocs.net/napi/blog";

const PUBLIC_BLOG_URL: &str = "https://wikidocs.net/blog";

#[derive(Debug, Clone)]
pub struct WikidocsOptions {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl WikidocsOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WikidocsService {
    options: WikidocsOptions,
    client: Client,
}

impl WikidocsService {
    pub fn new(options: WikidocsOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    /// Canonical public URL of a blog post.
    pub fn public_url(blog_id: i64) -> String {
        format!("{}/{}", PUBLIC_BLOG_URL, blog_id)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.options.base_url.trim_end_matches('/'), path)
    }

    fn authorization(&self) -> String {
        format!("Token {}", self.options.api_key)
    }

    /// Create an empty blog entry and return its id.
    pub async fn create_blog(&self) -> Result<i64> {
        let response = self
            .client
            .post(self.endpoint("create/"))
            .header("Authorization", self.authorization())
            .timeout(self.options.timeout)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let body = check_status(response).await?.text().await?;
        let created: CreatedBlog = serde_json::from_str(&body)
            .map_err(|e| WikidocsError::Malformed(format!("create response: {}", e)))?;

        tracing::debug!(blog_id = created.id, "WikiDocs blog created");
        Ok(created.id)
    }

    /// Upload PNG bytes for a blog entry.
    pub async fn upload_image(&self, blog_id: i64, data: Vec<u8>) -> Result<UploadedImage> {
        let file = multipart::Part::bytes(data)
            .file_name("image.png")
            .mime_str("image/png")?;
        let form = multipart::Form::new()
            .part("file", file)
            .text("blog_id", blog_id.to_string());

        let response = self
            .client
            .post(self.endpoint("images/upload/"))
            .header("Authorization", self.authorization())
            .timeout(self.options.timeout)
            .multipart(form)
            .send()
            .await?;

        let body = check_status(response).await?.text().await?;
        let uploaded: UploadedImage = serde_json::from_str(&body)
            .map_err(|e| WikidocsError::Malformed(format!("upload response: {}", e)))?;

        if uploaded.image_markdown_url.is_none() {
            tracing::warn!(blog_id, "WikiDocs upload response has no image_markdown_url");
        }
        Ok(uploaded)
    }

    /// Replace the title, content and tags of a blog entry.
    pub async fn update_blog(&self, blog_id: i64, update: &BlogUpdate) -> Result<()> {
        let response = self
            .client
            .put(self.endpoint(&format!("{}/", blog_id)))
            .header("Authorization", self.authorization())
            .timeout(self.options.timeout)
            .json(update)
            .send()
            .await?;

        check_status(response).await?;
        tracing::debug!(blog_id, "WikiDocs blog updated");
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, body = %message, "WikiDocs returned an error");
    Err(WikidocsError::Api {
        status: status.as_u16(),
        message,
    })
}
