use serde::Serialize;

use crate::error::PipelineError;

/// Lifecycle of the single image job of a run.
///
/// Advances `Unstarted -> Pending -> {Completed | Failed | TimedOut}`;
/// the only self-transition is `Pending -> Pending` while polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageStatus {
    #[default]
    Unstarted,
    Pending,
    Completed,
    Failed,
    TimedOut,
}

impl ImageStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ImageStatus::Completed | ImageStatus::Failed | ImageStatus::TimedOut
        )
    }
}

/// The record threaded through every stage of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PipelineState {
    // Input
    pub topic: String,
    pub source_contents: String,

    // Generated content
    pub title: String,
    pub body: String,
    pub tags: String,
    pub image_prompt: String,

    // Blog post, set once
    pub post_id: Option<i64>,

    // Image job
    pub image_job_id: Option<String>,
    pub image_status: ImageStatus,
    pub image_url: String,
    pub uploaded_image_ref: String,
    pub poll_count: u32,

    // Outcome
    pub error_message: Option<String>,
    pub result_message: Option<String>,
}

impl PipelineState {
    pub fn new(topic: impl Into<String>, source_contents: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            source_contents: source_contents.into(),
            ..Default::default()
        }
    }

    /// True once any stage has recorded an error. Terminal for the run.
    pub fn is_failed(&self) -> bool {
        self.error_message.is_some()
    }

    /// Record a stage failure. The first error wins.
    pub fn fail(&mut self, error: PipelineError) {
        if self.error_message.is_none() {
            tracing::warn!(error = %error, "Pipeline stage failed");
            self.error_message = Some(error.to_string());
        }
    }

    /// Final post body: the image reference, a blank line, then the text.
    /// Without a reference the body is used as is.
    pub fn compose_body(&self) -> String {
        if self.uploaded_image_ref.is_empty() {
            self.body.clone()
        } else {
            format!("{}\n\n{}", self.uploaded_image_ref, self.body)
        }
    }
}
