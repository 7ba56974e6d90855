//! Kernel module - infrastructure and dependencies.

pub mod deps;
pub mod downloader;
pub mod test_dependencies;
pub mod traits;

pub use deps::{AnthropicAdapter, FreepikAdapter, PipelineDeps, WikidocsAdapter};
pub use downloader::HttpImageDownloader;
pub use test_dependencies::TestDependencies;
pub use traits::*;
