use serde::{Deserialize, Serialize};

/// Response from `POST /create/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedBlog {
    pub id: i64,
}

/// Response from `POST /images/upload/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadedImage {
    /// Markdown snippet embedding the hosted image. The platform may omit it.
    #[serde(default)]
    pub image_markdown_url: Option<String>,
}

/// Body of `PUT /{id}/`.
#[derive(Debug, Clone, Serialize)]
pub struct BlogUpdate {
    pub title: String,
    pub content: String,
    pub is_public: bool,
    pub tags: String,
}
