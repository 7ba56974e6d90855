//! Polling state machine for the asynchronous image job.
//!
//! A status check is always preceded by a fixed pacing wait, and the loop
//! stops after `max_attempts` checks. The longest a run can wait for an image
//! is therefore `interval * max_attempts`, plus network latency.

use std::time::Duration;

use super::state::{ImageStatus, PipelineState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    /// Wait before every status check, including the first
    pub interval: Duration,
    /// Status checks allowed before the job counts as timed out
    pub max_attempts: u32,
    /// Treat a provider-reported failure as terminal instead of pending
    pub fail_fast_on_provider_failure: bool,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 30,
            fail_fast_on_provider_failure: true,
        }
    }
}

impl PollSettings {
    /// Upper bound on time spent pacing, excluding request latency.
    pub fn max_wait(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

/// What to do after a status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    /// The check (or an earlier stage) failed; stop
    Fail,
    /// Image is ready; continue with download and upload
    Proceed,
    /// Attempt budget spent without a result
    TimeOut,
    /// Still pending; check again
    PollAgain,
}

/// Decide the next step from the state left by the latest check.
pub fn decide(state: &PipelineState, settings: &PollSettings) -> PollDecision {
    if state.is_failed() {
        PollDecision::Fail
    } else if state.image_status == ImageStatus::Completed {
        PollDecision::Proceed
    } else if state.poll_count >= settings.max_attempts {
        PollDecision::TimeOut
    } else {
        PollDecision::PollAgain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    fn pending(poll_count: u32) -> PipelineState {
        PipelineState {
            image_status: ImageStatus::Pending,
            poll_count,
            ..Default::default()
        }
    }

    fn settings(max_attempts: u32) -> PollSettings {
        PollSettings {
            max_attempts,
            ..Default::default()
        }
    }

    #[test]
    fn pending_below_limit_polls_again() {
        assert_eq!(decide(&pending(1), &settings(3)), PollDecision::PollAgain);
        assert_eq!(decide(&pending(2), &settings(3)), PollDecision::PollAgain);
    }

    #[test]
    fn pending_at_limit_times_out() {
        assert_eq!(decide(&pending(3), &settings(3)), PollDecision::TimeOut);
    }

    #[test]
    fn completed_proceeds_even_on_last_attempt() {
        let mut state = pending(3);
        state.image_status = ImageStatus::Completed;
        assert_eq!(decide(&state, &settings(3)), PollDecision::Proceed);
    }

    #[test]
    fn error_takes_precedence() {
        let mut state = pending(1);
        state.image_status = ImageStatus::Completed;
        state.fail(PipelineError::ImageJob("boom".into()));
        assert_eq!(decide(&state, &settings(3)), PollDecision::Fail);
    }

    #[test]
    fn max_wait_is_interval_times_attempts() {
        let settings = PollSettings::default();
        assert_eq!(settings.max_wait(), Duration::from_secs(60));
    }
}
