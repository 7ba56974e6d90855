//! Bounds and transitions of the image job poll loop.

mod common;

use std::time::Duration;

use autopost::kernel::test_dependencies::{
    MockImageDownloader, MockImageJobService, MockPostRepository, MockTextGenerator,
};
use autopost::kernel::{JobPoll, TestDependencies};
use autopost::pipeline::ImageStatus;
use common::*;

fn mocks_with_jobs(image_jobs: MockImageJobService) -> TestDependencies {
    TestDependencies::new(
        MockTextGenerator::new().with_reply(&reply_json()),
        MockPostRepository::new(123).with_image_ref("![img](u)"),
        image_jobs,
        MockImageDownloader::new(b"PNG"),
    )
}

#[tokio::test]
async fn test_k_pending_then_completed_checks_k_plus_one_times() {
    let max_attempts = 5;
    for k in 0..max_attempts as usize {
        let mocks = happy_mocks(k);
        let report = orchestrator(&mocks, settings(max_attempts))
            .run(TOPIC, CONTENTS)
            .await;

        assert!(report.is_success(), "k={}: {}", k, report.summary());
        assert_eq!(report.state.image_status, ImageStatus::Completed);
        assert_eq!(report.state.poll_count as usize, k + 1);
        assert_eq!(mocks.image_jobs.poll_count(), k + 1);
    }
}

#[tokio::test]
async fn test_always_pending_stops_at_max_attempts() {
    let mocks = mocks_with_jobs(MockImageJobService::new("abc"));

    let report = orchestrator(&mocks, settings(4)).run(TOPIC, CONTENTS).await;

    assert!(!report.is_success());
    assert_eq!(mocks.image_jobs.poll_count(), 4);
    assert_eq!(report.state.poll_count, 4);
    assert_eq!(report.state.image_status, ImageStatus::TimedOut);
    assert_eq!(
        report.state.error_message.as_deref(),
        Some("image generation timed out after 4 status checks")
    );
    assert!(mocks.downloader.urls().is_empty());
    assert!(mocks.posts.updates().is_empty());
}

#[tokio::test]
async fn test_single_attempt_budget() {
    let mocks = mocks_with_jobs(MockImageJobService::new("abc"));

    let report = orchestrator(&mocks, settings(1)).run(TOPIC, CONTENTS).await;

    assert_eq!(mocks.image_jobs.poll_count(), 1);
    assert_eq!(report.state.image_status, ImageStatus::TimedOut);
}

#[tokio::test]
async fn test_status_check_error_fails_immediately() {
    let mocks = mocks_with_jobs(
        MockImageJobService::new("abc")
            .with_pending(1)
            .with_poll_error("502 Bad Gateway"),
    );

    let report = orchestrator(&mocks, settings(30)).run(TOPIC, CONTENTS).await;

    assert_eq!(mocks.image_jobs.poll_count(), 2);
    assert_eq!(report.state.image_status, ImageStatus::Failed);
    assert_eq!(
        report.state.error_message.as_deref(),
        Some("image job error: 502 Bad Gateway")
    );
    assert!(mocks.downloader.urls().is_empty());
}

#[tokio::test]
async fn test_completed_without_url_is_a_job_error() {
    let mocks = mocks_with_jobs(MockImageJobService::new("abc").with_poll(JobPoll {
        status: autopost::kernel::JobStatus::Completed,
        image_url: None,
    }));

    let report = orchestrator(&mocks, settings(30)).run(TOPIC, CONTENTS).await;

    assert_eq!(report.state.image_status, ImageStatus::Failed);
    assert!(report.summary().contains("without a generated image"));
}

// A provider-reported failure is terminal by default. With fail-fast
// disabled it is treated as still pending and the loop runs to timeout.

#[tokio::test]
async fn test_provider_failure_fails_fast_by_default() {
    let mocks = mocks_with_jobs(
        MockImageJobService::new("abc")
            .with_pending(1)
            .with_poll(JobPoll::failed()),
    );

    let report = orchestrator(&mocks, settings(30)).run(TOPIC, CONTENTS).await;

    assert_eq!(mocks.image_jobs.poll_count(), 2);
    assert_eq!(report.state.image_status, ImageStatus::Failed);
    assert!(report.summary().contains("provider reported job abc as failed"));
}

#[tokio::test]
async fn test_provider_failure_loops_to_timeout_when_fail_fast_disabled() {
    let mocks = mocks_with_jobs(MockImageJobService::new("abc").with_poll(JobPoll::failed()));
    let mut settings = settings(3);
    settings.poll.fail_fast_on_provider_failure = false;

    let report = orchestrator(&mocks, settings).run(TOPIC, CONTENTS).await;

    assert_eq!(mocks.image_jobs.poll_count(), 3);
    assert_eq!(report.state.image_status, ImageStatus::TimedOut);
}

#[tokio::test(start_paused = true)]
async fn test_pacing_wait_precedes_every_check() {
    let mocks = mocks_with_jobs(MockImageJobService::new("abc"));
    let mut settings = settings(3);
    settings.poll.interval = Duration::from_secs(2);

    let start = tokio::time::Instant::now();
    let report = orchestrator(&mocks, settings.clone()).run(TOPIC, CONTENTS).await;
    let elapsed = start.elapsed();

    assert_eq!(report.state.image_status, ImageStatus::TimedOut);
    assert!(elapsed >= settings.poll.max_wait(), "{:?}", elapsed);
    assert!(elapsed < settings.poll.max_wait() + Duration::from_secs(1), "{:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_first_check_is_also_paced() {
    let mocks = happy_mocks(0);
    let mut settings = settings(30);
    settings.poll.interval = Duration::from_secs(2);

    let start = tokio::time::Instant::now();
    let report = orchestrator(&mocks, settings).run(TOPIC, CONTENTS).await;

    assert!(report.is_success());
    assert!(start.elapsed() >= Duration::from_secs(2));
    assert!(start.elapsed() < Duration::from_secs(3));
}
