// Autopost - generated blog post publisher
//
// Generates a short poem with an LLM, illustrates it with an asynchronous
// image generation job, and publishes both to a WikiDocs blog.
//
// The run is a single sequential pipeline (see pipeline/orchestrator.rs).
// External services sit behind the Base* traits in kernel/.

pub mod config;
pub mod error;
pub mod kernel;
pub mod pipeline;
pub mod secret;

pub use config::*;
pub use error::PipelineError;
pub use pipeline::{Orchestrator, PipelineSettings, PipelineState, RunOutcome, RunReport};
