//! Shared fixtures for pipeline integration tests.
#![allow(dead_code)]

use std::time::Duration;

use autopost::kernel::test_dependencies::{
    MockImageDownloader, MockImageJobService, MockPostRepository, MockTextGenerator,
};
use autopost::kernel::{JobPoll, TestDependencies};
use autopost::pipeline::PollSettings;
use autopost::{Orchestrator, PipelineSettings};

pub const TOPIC: &str = "봄날의 산책";
pub const CONTENTS: &str = "따뜻한 봄 햇살 아래 공원을 걷는 평화로운 순간";
pub const TAGS: &str = "AI시집,n8n";
pub const TITLE: &str = "햇살 아래 오솔길";
pub const IMAGE_PROMPT: &str = "a peaceful sunlit park path in spring, photorealistic";
pub const IMAGE_URL: &str = "https://cdn.test/generated/abc.png";

/// An 80-character poem body.
pub fn body() -> String {
    let body: String = "따뜻한 햇살 아래 천천히 걷는 길, "
        .chars()
        .cycle()
        .take(80)
        .collect();
    assert_eq!(body.chars().count(), 80);
    body
}

/// Model reply as JSON text, the way the model is asked to answer.
pub fn reply_json() -> String {
    serde_json::json!({
        "title": TITLE,
        "content": body(),
        "tags": TAGS,
        "image_prompt": IMAGE_PROMPT,
    })
    .to_string()
}

/// Same reply wrapped in a ```json fence.
pub fn fenced_reply() -> String {
    format!("```json\n{}\n```", reply_json())
}

/// Settings with no pacing delay so tests run instantly.
pub fn settings(max_attempts: u32) -> PipelineSettings {
    PipelineSettings {
        tags: TAGS.to_string(),
        poll: PollSettings {
            interval: Duration::ZERO,
            max_attempts,
            fail_fast_on_provider_failure: true,
        },
    }
}

/// Mocks for a run that succeeds after `pending` pending polls.
pub fn happy_mocks(pending: usize) -> TestDependencies {
    TestDependencies::new(
        MockTextGenerator::new().with_reply(&fenced_reply()),
        MockPostRepository::new(123).with_image_ref("![img](u)"),
        MockImageJobService::new("abc")
            .with_pending(pending)
            .with_poll(JobPoll::completed(IMAGE_URL)),
        MockImageDownloader::new(b"PNG"),
    )
}

pub fn orchestrator(mocks: &TestDependencies, settings: PipelineSettings) -> Orchestrator {
    Orchestrator::new(mocks.deps(), settings)
}
