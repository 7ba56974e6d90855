// TestDependencies - mock implementations for testing
//
// Provides scripted services that can be injected into PipelineDeps for tests.
// Every mock records its calls so tests can assert which side effects happened.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{
    BaseImageDownloader, BaseImageJobService, BasePostRepository, BaseTextGenerator, JobPoll,
    PipelineDeps, PostUpdate,
};

// =============================================================================
// Mock Text Generator
// =============================================================================

pub struct MockTextGenerator {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a reply to be returned
    pub fn with_reply(self, reply: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(reply.to_string()));
        self
    }

    /// Queue a failed model call
    pub fn with_failure(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// Get all prompts that were sent
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseTextGenerator for MockTextGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no mock reply queued")),
        }
    }
}

// =============================================================================
// Mock Post Repository
// =============================================================================

pub struct MockPostRepository {
    post_id: i64,
    image_ref: String,
    create_failure: Option<String>,
    upload_failure: Option<String>,
    update_failure: Option<String>,
    create_calls: Arc<Mutex<usize>>,
    uploads: Arc<Mutex<Vec<(i64, Vec<u8>)>>>,
    updates: Arc<Mutex<Vec<(i64, PostUpdate)>>>,
}

impl MockPostRepository {
    pub fn new(post_id: i64) -> Self {
        Self {
            post_id,
            image_ref: String::new(),
            create_failure: None,
            upload_failure: None,
            update_failure: None,
            create_calls: Arc::new(Mutex::new(0)),
            uploads: Arc::new(Mutex::new(Vec::new())),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reference returned by upload_image (empty by default)
    pub fn with_image_ref(mut self, image_ref: &str) -> Self {
        self.image_ref = image_ref.to_string();
        self
    }

    pub fn failing_create(mut self, message: &str) -> Self {
        self.create_failure = Some(message.to_string());
        self
    }

    pub fn failing_upload(mut self, message: &str) -> Self {
        self.upload_failure = Some(message.to_string());
        self
    }

    pub fn failing_update(mut self, message: &str) -> Self {
        self.update_failure = Some(message.to_string());
        self
    }

    pub fn create_calls(&self) -> usize {
        *self.create_calls.lock().unwrap()
    }

    pub fn uploads(&self) -> Vec<(i64, Vec<u8>)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(i64, PostUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.create_calls() + self.uploads().len() + self.updates().len()
    }
}

#[async_trait]
impl BasePostRepository for MockPostRepository {
    async fn create_empty_post(&self) -> Result<i64> {
        *self.create_calls.lock().unwrap() += 1;
        match &self.create_failure {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(self.post_id),
        }
    }

    async fn upload_image(&self, post_id: i64, data: Vec<u8>) -> Result<String> {
        self.uploads.lock().unwrap().push((post_id, data));
        match &self.upload_failure {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(self.image_ref.clone()),
        }
    }

    async fn update_post(&self, post_id: i64, update: &PostUpdate) -> Result<()> {
        self.updates.lock().unwrap().push((post_id, update.clone()));
        match &self.update_failure {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(()),
        }
    }

    fn post_url(&self, post_id: i64) -> String {
        format!("https://blog.test/{}", post_id)
    }
}

// =============================================================================
// Mock Image Job Service
// =============================================================================

pub struct MockImageJobService {
    job_id: String,
    submit_failure: Option<String>,
    polls: Arc<Mutex<VecDeque<Result<JobPoll, String>>>>,
    submitted_prompts: Arc<Mutex<Vec<String>>>,
    polled_ids: Arc<Mutex<Vec<String>>>,
}

impl MockImageJobService {
    /// Jobs stay pending once the scripted polls run out
    pub fn new(job_id: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            submit_failure: None,
            polls: Arc::new(Mutex::new(VecDeque::new())),
            submitted_prompts: Arc::new(Mutex::new(Vec::new())),
            polled_ids: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_submit(mut self, message: &str) -> Self {
        self.submit_failure = Some(message.to_string());
        self
    }

    /// Queue a poll result
    pub fn with_poll(self, poll: JobPoll) -> Self {
        self.polls.lock().unwrap().push_back(Ok(poll));
        self
    }

    /// Queue `count` pending polls
    pub fn with_pending(self, count: usize) -> Self {
        for _ in 0..count {
            self.polls.lock().unwrap().push_back(Ok(JobPoll::pending()));
        }
        self
    }

    /// Queue a failed status check
    pub fn with_poll_error(self, message: &str) -> Self {
        self.polls
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn submitted_prompts(&self) -> Vec<String> {
        self.submitted_prompts.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> usize {
        self.polled_ids.lock().unwrap().len()
    }

    pub fn polled_ids(&self) -> Vec<String> {
        self.polled_ids.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.submitted_prompts().len() + self.poll_count()
    }
}

#[async_trait]
impl BaseImageJobService for MockImageJobService {
    async fn submit_job(&self, prompt: &str) -> Result<String> {
        self.submitted_prompts
            .lock()
            .unwrap()
            .push(prompt.to_string());
        match &self.submit_failure {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(self.job_id.clone()),
        }
    }

    async fn poll_once(&self, job_id: &str) -> Result<JobPoll> {
        self.polled_ids.lock().unwrap().push(job_id.to_string());
        match self.polls.lock().unwrap().pop_front() {
            Some(Ok(poll)) => Ok(poll),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(JobPoll::pending()),
        }
    }
}

// =============================================================================
// Mock Image Downloader
// =============================================================================

pub struct MockImageDownloader {
    result: Result<Vec<u8>, String>,
    urls: Arc<Mutex<Vec<String>>>,
}

impl MockImageDownloader {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            result: Ok(bytes.to_vec()),
            urls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            urls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseImageDownloader for MockImageDownloader {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.urls.lock().unwrap().push(url.to_string());
        self.result.clone().map_err(|message| anyhow!(message))
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock services with handles kept for assertions after a run
pub struct TestDependencies {
    pub text_generator: Arc<MockTextGenerator>,
    pub posts: Arc<MockPostRepository>,
    pub image_jobs: Arc<MockImageJobService>,
    pub downloader: Arc<MockImageDownloader>,
}

impl TestDependencies {
    pub fn new(
        text_generator: MockTextGenerator,
        posts: MockPostRepository,
        image_jobs: MockImageJobService,
        downloader: MockImageDownloader,
    ) -> Self {
        Self {
            text_generator: Arc::new(text_generator),
            posts: Arc::new(posts),
            image_jobs: Arc::new(image_jobs),
            downloader: Arc::new(downloader),
        }
    }

    pub fn deps(&self) -> PipelineDeps {
        PipelineDeps::new(
            self.text_generator.clone(),
            self.posts.clone(),
            self.image_jobs.clone(),
            self.downloader.clone(),
        )
    }

    /// Calls made to the blog platform, the image API and the image host
    pub fn external_call_count(&self) -> usize {
        self.posts.call_count() + self.image_jobs.call_count() + self.downloader.urls().len()
    }
}
