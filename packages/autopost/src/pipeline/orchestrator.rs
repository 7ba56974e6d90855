//! Run orchestration as an explicit state machine.
//!
//! ```text
//! GenerateContent -> CreatePost -> SubmitImageJob -> PollImageJob --+--> TransferImage -> PublishPost -> Done
//!                                                      ^      |     |
//!                                                      +------+     +--> ExpireImageJob --+
//!                                                   (still pending)                      v
//!                     any stage that records an error -----------------------------> ReportError -> Done
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use super::polling::{decide, PollDecision};
use super::stages;
use super::state::PipelineState;
use super::PipelineSettings;
use crate::kernel::PipelineDeps;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    GenerateContent,
    CreatePost,
    SubmitImageJob,
    PollImageJob,
    ExpireImageJob,
    TransferImage,
    PublishPost,
    ReportError,
    Done,
}

impl Stage {
    /// Transition function over the stage graph.
    pub fn next(self, state: &PipelineState, settings: &PipelineSettings) -> Stage {
        match self {
            Stage::ReportError | Stage::Done => return Stage::Done,
            _ if state.is_failed() => return Stage::ReportError,
            _ => {}
        }

        match self {
            Stage::GenerateContent => Stage::CreatePost,
            Stage::CreatePost => Stage::SubmitImageJob,
            Stage::SubmitImageJob => Stage::PollImageJob,
            Stage::PollImageJob => match decide(state, &settings.poll) {
                PollDecision::PollAgain => Stage::PollImageJob,
                PollDecision::Proceed => Stage::TransferImage,
                PollDecision::TimeOut => Stage::ExpireImageJob,
                PollDecision::Fail => Stage::ReportError,
            },
            Stage::ExpireImageJob => Stage::ReportError,
            Stage::TransferImage => Stage::PublishPost,
            Stage::PublishPost => Stage::Done,
            Stage::ReportError | Stage::Done => Stage::Done,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Success { message: String },
    Failure { message: String },
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: RunOutcome,
    pub state: PipelineState,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RunOutcome::Success { .. })
    }

    /// Human-readable summary for the terminal.
    pub fn summary(&self) -> &str {
        match &self.outcome {
            RunOutcome::Success { message } | RunOutcome::Failure { message } => message,
        }
    }
}

pub struct Orchestrator {
    deps: PipelineDeps,
    settings: PipelineSettings,
}

impl Orchestrator {
    pub fn new(deps: PipelineDeps, settings: PipelineSettings) -> Self {
        Self { deps, settings }
    }

    /// Run one post end to end.
    pub async fn run(&self, topic: &str, source_contents: &str) -> RunReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = tracing::info_span!("run", %run_id);

        let state = self
            .drive(PipelineState::new(topic, source_contents))
            .instrument(span)
            .await;

        let outcome = match (&state.error_message, &state.result_message) {
            (Some(error), _) => RunOutcome::Failure {
                message: format!("Failed: {}", error),
            },
            (None, Some(message)) => RunOutcome::Success {
                message: message.clone(),
            },
            (None, None) => RunOutcome::Failure {
                message: "Failed: run ended without publishing".to_string(),
            },
        };

        RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcome,
            state,
        }
    }

    /// Step through the stage graph until `Done`.
    pub async fn drive(&self, mut state: PipelineState) -> PipelineState {
        let mut stage = Stage::GenerateContent;

        while stage != Stage::Done {
            self.execute(stage, &mut state).await;
            stage = stage.next(&state, &self.settings);
        }

        state
    }

    /// Run a single stage against the state.
    pub async fn execute(&self, stage: Stage, state: &mut PipelineState) {
        let deps = &self.deps;
        let settings = &self.settings;

        match stage {
            Stage::GenerateContent => stages::generate_content(state, deps, settings).await,
            Stage::CreatePost => stages::create_post(state, deps).await,
            Stage::SubmitImageJob => stages::submit_image_job(state, deps).await,
            Stage::PollImageJob => stages::poll_image_job(state, deps, settings).await,
            Stage::ExpireImageJob => stages::expire_image_job(state),
            Stage::TransferImage => stages::transfer_image(state, deps).await,
            Stage::PublishPost => stages::publish_post(state, deps).await,
            Stage::ReportError => stages::report_error(state),
            Stage::Done => {}
        }
    }
}
