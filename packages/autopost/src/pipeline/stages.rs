//! Pipeline stages.
//!
//! Each stage takes the whole run state and performs at most one kind of side
//! effect. The first thing every stage does is check `is_failed()`: once an
//! error is recorded, stages leave the state untouched and call nothing.

use tracing::{debug, error, info, warn};

use super::content::{build_prompt, parse_reply};
use super::state::{ImageStatus, PipelineState};
use super::PipelineSettings;
use crate::error::PipelineError;
use crate::kernel::{JobStatus, PipelineDeps, PostUpdate};

/// Ask the model for title, body, tags and image prompt.
pub async fn generate_content(
    state: &mut PipelineState,
    deps: &PipelineDeps,
    settings: &PipelineSettings,
) {
    if state.is_failed() {
        return;
    }
    info!(topic = %state.topic, "Generating post content");

    let prompt = build_prompt(&state.topic, &state.source_contents, &settings.tags);
    let reply = match deps.text_generator.complete(&prompt).await {
        Ok(reply) => reply,
        Err(e) => return state.fail(PipelineError::Generation(PipelineError::chain(&e))),
    };

    let content = match parse_reply(&reply) {
        Ok(content) => content,
        Err(e) => return state.fail(e),
    };

    if content.tags != settings.tags {
        warn!(
            returned = %content.tags,
            expected = %settings.tags,
            "Model changed the tag set; keeping the configured tags"
        );
    }

    state.title = content.title;
    state.body = content.body;
    state.tags = settings.tags.clone();
    state.image_prompt = content.image_prompt;
    debug!(title = %state.title, body_chars = state.body.chars().count(), "Content generated");
}

/// Create the empty post that the run will fill in.
pub async fn create_post(state: &mut PipelineState, deps: &PipelineDeps) {
    if state.is_failed() {
        return;
    }
    info!("Creating blog post");

    match deps.posts.create_empty_post().await {
        Ok(post_id) => {
            debug_assert!(state.post_id.is_none(), "post id is assigned once per run");
            state.post_id = Some(post_id);
            debug!(post_id, "Blog post created");
        }
        Err(e) => state.fail(PipelineError::Repository(PipelineError::chain(&e))),
    }
}

/// Submit the image job: `Unstarted -> Pending`, poll counter reset.
pub async fn submit_image_job(state: &mut PipelineState, deps: &PipelineDeps) {
    if state.is_failed() {
        return;
    }
    info!("Requesting image generation");

    match deps.image_jobs.submit_job(&state.image_prompt).await {
        Ok(job_id) => {
            debug_assert!(state.image_job_id.is_none(), "image job is submitted once per run");
            debug!(job_id = %job_id, "Image job submitted");
            state.image_job_id = Some(job_id);
            state.image_status = ImageStatus::Pending;
            state.poll_count = 0;
        }
        Err(e) => state.fail(PipelineError::ImageJob(PipelineError::chain(&e))),
    }
}

/// Wait the pacing interval, then check the image job once.
pub async fn poll_image_job(
    state: &mut PipelineState,
    deps: &PipelineDeps,
    settings: &PipelineSettings,
) {
    if state.is_failed() {
        return;
    }
    let Some(job_id) = state.image_job_id.clone() else {
        return state.fail(PipelineError::ImageJob("no image job was submitted".into()));
    };

    tokio::time::sleep(settings.poll.interval).await;

    state.poll_count += 1;
    info!(attempt = state.poll_count, "Checking image status");

    let poll = match deps.image_jobs.poll_once(&job_id).await {
        Ok(poll) => poll,
        Err(e) => {
            state.image_status = ImageStatus::Failed;
            return state.fail(PipelineError::ImageJob(PipelineError::chain(&e)));
        }
    };
    debug!(job_id = %job_id, attempt = state.poll_count, status = ?poll.status, "Image job status");

    match poll.status {
        JobStatus::Completed => match poll.image_url {
            Some(url) if !url.is_empty() => {
                info!("Image generation completed");
                state.image_status = ImageStatus::Completed;
                state.image_url = url;
            }
            _ => {
                state.image_status = ImageStatus::Failed;
                state.fail(PipelineError::ImageJob(
                    "job completed without a generated image".into(),
                ));
            }
        },
        JobStatus::Failed if settings.poll.fail_fast_on_provider_failure => {
            state.image_status = ImageStatus::Failed;
            state.fail(PipelineError::ImageJob(format!(
                "provider reported job {} as failed",
                job_id
            )));
        }
        JobStatus::Failed => {
            warn!(job_id = %job_id, "Provider reported failure; still waiting for the job");
        }
        JobStatus::Pending => {}
    }
}

/// Close the poll loop after the attempt budget is spent.
pub fn expire_image_job(state: &mut PipelineState) {
    if state.is_failed() {
        return;
    }
    state.image_status = ImageStatus::TimedOut;
    state.fail(PipelineError::Timeout {
        attempts: state.poll_count,
    });
}

/// Download the generated image and upload it to the post.
pub async fn transfer_image(state: &mut PipelineState, deps: &PipelineDeps) {
    if state.is_failed() {
        return;
    }
    let Some(post_id) = state.post_id else {
        return state.fail(PipelineError::Repository("no post to attach the image to".into()));
    };
    info!("Downloading and uploading image");

    let bytes = match deps.downloader.download(&state.image_url).await {
        Ok(bytes) => bytes,
        Err(e) => return state.fail(PipelineError::Download(PipelineError::chain(&e))),
    };

    match deps.posts.upload_image(post_id, bytes).await {
        Ok(image_ref) => {
            if image_ref.is_empty() {
                warn!(post_id, "Upload returned no image reference; posting text only");
            }
            state.uploaded_image_ref = image_ref;
        }
        Err(e) => state.fail(PipelineError::Repository(PipelineError::chain(&e))),
    }
}

/// Write the final title, body and tags, and record the success summary.
pub async fn publish_post(state: &mut PipelineState, deps: &PipelineDeps) {
    if state.is_failed() {
        return;
    }
    let Some(post_id) = state.post_id else {
        return state.fail(PipelineError::Repository("no post to update".into()));
    };
    info!(post_id, "Updating blog post content");

    let update = PostUpdate {
        title: state.title.clone(),
        body: state.compose_body(),
        tags: state.tags.clone(),
        is_public: false,
    };

    if let Err(e) = deps.posts.update_post(post_id, &update).await {
        return state.fail(PipelineError::Repository(PipelineError::chain(&e)));
    }

    state.result_message = Some(format!(
        "Blog post published\n\n- Post ID: {}\n- Title: {}\n- URL: {}",
        post_id,
        state.title,
        deps.posts.post_url(post_id)
    ));
}

/// Terminal error step. Reports and changes nothing.
pub fn report_error(state: &PipelineState) {
    error!(
        error = state.error_message.as_deref().unwrap_or("unknown error"),
        "Pipeline failed"
    );
}
