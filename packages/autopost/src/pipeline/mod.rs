//! The post publishing pipeline.

pub mod content;
pub mod orchestrator;
pub mod polling;
pub mod stages;
pub mod state;

pub use content::{build_prompt, parse_reply, GeneratedContent};
pub use orchestrator::{Orchestrator, RunOutcome, RunReport, Stage};
pub use polling::{decide, PollDecision, PollSettings};
pub use state::{ImageStatus, PipelineState};

use crate::config::DEFAULT_POST_TAGS;

/// Run tunables, fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Literal tag set every post is published with
    pub tags: String,
    pub poll: PollSettings,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            tags: DEFAULT_POST_TAGS.to_string(),
            poll: PollSettings::default(),
        }
    }
}
