use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::avatar::{JobStatusReport, RemoteStatus};

/// Lifecycle of a render job as seen by the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStatus {
    Submitted,
    Processing,
    Completed,
    Failed,
    Timeout,
}

impl RenderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RenderStatus::Completed | RenderStatus::Failed | RenderStatus::Timeout
        )
    }
}

impl std::fmt::Display for RenderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderStatus::Submitted => write!(f, "SUBMITTED"),
            RenderStatus::Processing => write!(f, "PROCESSING"),
            RenderStatus::Completed => write!(f, "COMPLETED"),
            RenderStatus::Failed => write!(f, "FAILED"),
            RenderStatus::Timeout => write!(f, "TIMEOUT"),
        }
    }
}

/// A job submitted to the avatar service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderJob {
    pub job_id: String,
    pub avatar_id: String,
    pub voice_id: String,
    pub input_text: String,
    pub status: RenderStatus,
    pub video_url: Option<String>,
    pub local_path: Option<PathBuf>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RenderJob {
    pub fn submitted(job_id: String, avatar_id: String, voice_id: String, input_text: String) -> Self {
        let now = Utc::now();
        Self {
            job_id,
            avatar_id,
            voice_id,
            input_text,
            status: RenderStatus::Submitted,
            video_url: None,
            local_path: None,
            submitted_at: now,
            updated_at: now,
        }
    }

    /// Folds a status report into the job. Returns `false`, leaving the job
    /// untouched, once the job is terminal.
    ///
    /// `pending`, `waiting` and unrecognised statuses carry no new
    /// information and keep the current status.
    pub fn observe(&mut self, report: &JobStatusReport) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        match report.status {
            RemoteStatus::Processing => self.status = RenderStatus::Processing,
            RemoteStatus::Completed => {
                self.status = RenderStatus::Completed;
                self.video_url = report.video_url.clone();
            }
            RemoteStatus::Failed => self.status = RenderStatus::Failed,
            RemoteStatus::Pending | RemoteStatus::Waiting | RemoteStatus::Unknown => {}
        }
        self.updated_at = Utc::now();
        true
    }

    /// Marks the polling window as exhausted. No-op on a terminal job.
    pub fn mark_timed_out(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = RenderStatus::Timeout;
        self.updated_at = Utc::now();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> RenderJob {
        RenderJob::submitted("vid_1".into(), "av".into(), "vo".into(), "Welcome.".into())
    }

    fn report(status: RemoteStatus, video_url: Option<&str>) -> JobStatusReport {
        JobStatusReport {
            status,
            video_url: video_url.map(str::to_string),
            error: None,
        }
    }

    #[test]
    fn new_job_is_submitted() {
        let job = job();
        assert_eq!(job.status, RenderStatus::Submitted);
        assert!(job.video_url.is_none());
        assert!(!job.status.is_terminal());
    }

    #[test]
    fn walks_to_completed() {
        let mut job = job();
        assert!(job.observe(&report(RemoteStatus::Pending, None)));
        assert_eq!(job.status, RenderStatus::Submitted);
        assert!(job.observe(&report(RemoteStatus::Processing, None)));
        assert_eq!(job.status, RenderStatus::Processing);
        assert!(job.observe(&report(RemoteStatus::Completed, Some("https://v/1.mp4"))));
        assert_eq!(job.status, RenderStatus::Completed);
        assert_eq!(job.video_url.as_deref(), Some("https://v/1.mp4"));
    }

    #[test]
    fn terminal_states_are_sticky() {
        let mut done = job();
        done.observe(&report(RemoteStatus::Completed, Some("https://v/1.mp4")));
        assert!(!done.observe(&report(RemoteStatus::Processing, None)));
        assert!(!done.observe(&report(RemoteStatus::Failed, None)));
        assert!(!done.mark_timed_out());
        assert_eq!(done.status, RenderStatus::Completed);

        let mut failed = job();
        failed.observe(&report(RemoteStatus::Failed, None));
        assert!(!failed.observe(&report(RemoteStatus::Completed, Some("https://late"))));
        assert_eq!(failed.status, RenderStatus::Failed);
        assert!(failed.video_url.is_none());

        let mut timed_out = job();
        assert!(timed_out.mark_timed_out());
        assert!(!timed_out.observe(&report(RemoteStatus::Completed, Some("https://late"))));
        assert_eq!(timed_out.status, RenderStatus::Timeout);
    }

    #[test]
    fn status_display_and_serde() {
        assert_eq!(RenderStatus::Processing.to_string(), "PROCESSING");
        assert_eq!(
            serde_json::to_string(&RenderStatus::Timeout).unwrap(),
            "\"timeout\""
        );
    }

    #[test]
    fn job_serialization_roundtrip() {
        let job = job();
        let json = serde_json::to_string(&job).unwrap();
        let back: RenderJob = serde_json::from_str(&json).unwrap();
        assert_eq!(back.job_id, "vid_1");
        assert_eq!(back.status, RenderStatus::Submitted);
    }
}
