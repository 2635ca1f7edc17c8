//! Attempt planning for [`VideoRenderer::create_video`].
//!
//! Each attempt runs with an explicit [`AttemptPlan`]. After an attempt the
//! [`RetryPolicy`] turns its outcome into a [`Transition`]: done, try again
//! with a new plan, or give up. A timeout shortens the narration and the
//! polling window for the next attempt; a transient transport error repeats
//! the same plan; anything else is final.
//!
//! [`VideoRenderer::create_video`]: super::VideoRenderer::create_video

use std::time::Duration;

use super::job::RenderJob;
use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_timeout: Duration,
    /// Removed from the polling window after each timeout.
    pub timeout_step: Duration,
    /// The polling window never shrinks below this.
    pub timeout_floor: Duration,
    /// Words cut from the end of the narration after each timeout.
    pub words_dropped: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_timeout: Duration::from_secs(300),
            timeout_step: Duration::from_secs(60),
            timeout_floor: Duration::from_secs(180),
            words_dropped: 50,
        }
    }
}

/// Inputs of a single render attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptPlan {
    /// 1-based.
    pub attempt: u32,
    pub text: String,
    pub timeout: Duration,
}

impl AttemptPlan {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// What to do after an attempt.
#[derive(Debug)]
pub enum Transition {
    Complete(RenderJob),
    Retry {
        next: AttemptPlan,
        reason: PipelineError,
    },
    Fail(PipelineError),
}

impl RetryPolicy {
    pub fn first_attempt(&self, description: &str) -> AttemptPlan {
        AttemptPlan {
            attempt: 1,
            text: description.to_string(),
            timeout: self.initial_timeout,
        }
    }

    /// Plan used after a timeout: shorter text, shorter window.
    pub fn degrade(&self, plan: &AttemptPlan) -> AttemptPlan {
        let shrunk = plan
            .timeout
            .saturating_sub(self.timeout_step)
            .max(self.timeout_floor)
            .min(plan.timeout);
        AttemptPlan {
            attempt: plan.attempt + 1,
            text: drop_trailing_words(&plan.text, self.words_dropped),
            timeout: shrunk,
        }
    }

    /// Plan used after a transient transport error: same inputs.
    pub fn repeat(&self, plan: &AttemptPlan) -> AttemptPlan {
        AttemptPlan {
            attempt: plan.attempt + 1,
            ..plan.clone()
        }
    }

    pub fn next(&self, plan: &AttemptPlan, outcome: Result<RenderJob, PipelineError>) -> Transition {
        let err = match outcome {
            Ok(job) => return Transition::Complete(job),
            Err(err) => err,
        };
        if !err.is_transient() || plan.attempt >= self.max_attempts {
            return Transition::Fail(err);
        }
        let next = match err {
            PipelineError::Timeout { .. } => self.degrade(plan),
            _ => self.repeat(plan),
        };
        Transition::Retry { next, reason: err }
    }
}

/// Removes the last `count` whitespace-separated words. Never goes below
/// the empty string.
pub fn drop_trailing_words(text: &str, count: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let keep = words.len().saturating_sub(count);
    words[..keep].join(" ")
}
