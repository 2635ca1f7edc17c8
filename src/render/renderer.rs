use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{error, info, warn};

use super::job::RenderJob;
use super::state::{AttemptPlan, RetryPolicy, Transition};
use crate::avatar::{Avatar, AvatarApi, GenerateRequest, JobStatusReport, RemoteStatus, Voice};
use crate::error::PipelineError;
use crate::stock::MediaAsset;

/// How long to wait between status checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub interval: Duration,
    /// Used while the service reports `processing`.
    pub processing_interval: Duration,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            processing_interval: Duration::from_secs(10),
        }
    }
}

impl PollSchedule {
    pub fn interval_for(&self, status: RemoteStatus) -> Duration {
        match status {
            RemoteStatus::Processing => self.processing_interval,
            _ => self.interval,
        }
    }
}

/// First avatar in the listing.
pub fn pick_avatar(avatars: &[Avatar]) -> Option<&Avatar> {
    avatars.first()
}

/// First English voice, or the first voice if none is English.
pub fn pick_voice(voices: &[Voice]) -> Option<&Voice> {
    voices.iter().find(|v| v.is_english()).or_else(|| voices.first())
}

/// Drives a background video and a narration through the avatar service
/// until a rendered video exists.
pub struct VideoRenderer<A> {
    api: A,
    policy: RetryPolicy,
    schedule: PollSchedule,
    output_dir: PathBuf,
}

impl<A: AvatarApi> VideoRenderer<A> {
    pub fn new(api: A, policy: RetryPolicy, schedule: PollSchedule, output_dir: PathBuf) -> Self {
        Self {
            api,
            policy,
            schedule,
            output_dir,
        }
    }

    pub async fn select_avatar(&self) -> Result<String, PipelineError> {
        let avatars = self.api.list_avatars().await?;
        pick_avatar(&avatars)
            .map(|a| a.avatar_id.clone())
            .ok_or_else(|| PipelineError::ResourceUnavailable("no avatars available".into()))
    }

    pub async fn select_voice(&self) -> Result<String, PipelineError> {
        let voices = self.api.list_voices().await?;
        pick_voice(&voices)
            .map(|v| v.voice_id.clone())
            .ok_or_else(|| PipelineError::ResourceUnavailable("no voices available".into()))
    }

    pub async fn upload_asset(&self, local_path: &Path) -> Result<String, PipelineError> {
        if !local_path.exists() {
            return Err(PipelineError::Upload(format!(
                "video file not found: {}",
                local_path.display()
            )));
        }
        self.api.upload_asset(local_path).await
    }

    pub async fn submit_job(
        &self,
        avatar_id: &str,
        voice_id: &str,
        text: &str,
        background_url: &str,
    ) -> Result<RenderJob, PipelineError> {
        let request = GenerateRequest::talking_avatar(avatar_id, voice_id, text, background_url);
        let job_id = self.api.submit_job(&request).await?;
        info!(%job_id, "render job submitted");
        Ok(RenderJob::submitted(
            job_id,
            avatar_id.to_string(),
            voice_id.to_string(),
            text.to_string(),
        ))
    }

    /// Polls until the job completes or fails, or `timeout` runs out. One
    /// last status check is made after the window closes.
    pub async fn poll_until_terminal(
        &self,
        mut job: RenderJob,
        timeout: Duration,
    ) -> Result<RenderJob, PipelineError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            let report = self.api.job_status(&job.job_id).await?;
            job.observe(&report);
            if report.status.is_terminal() {
                return self.settle(job, report).await;
            }

            let remaining = timeout.saturating_sub(start.elapsed());
            let wait = self.schedule.interval_for(report.status).min(remaining);
            info!(
                job_id = %job.job_id,
                status = %report.status,
                elapsed_secs = start.elapsed().as_secs(),
                "render in progress, waiting {}s",
                wait.as_secs()
            );
            sleep(wait).await;
        }

        let report = self.api.job_status(&job.job_id).await?;
        job.observe(&report);
        if report.status.is_terminal() {
            return self.settle(job, report).await;
        }

        job.mark_timed_out();
        error!(job_id = %job.job_id, timeout_secs = timeout.as_secs(), "timed out waiting for render");
        Err(PipelineError::Timeout {
            job_id: job.job_id,
            timeout_secs: timeout.as_secs(),
        })
    }

    async fn settle(&self, mut job: RenderJob, report: JobStatusReport) -> Result<RenderJob, PipelineError> {
        if report.status == RemoteStatus::Failed {
            let message = report.error_message();
            error!(job_id = %job.job_id, %message, "render job failed");
            return Err(PipelineError::JobFailed {
                job_id: job.job_id,
                message,
            });
        }

        let Some(video_url) = job.video_url.clone() else {
            return Err(PipelineError::JobFailed {
                job_id: job.job_id,
                message: "completed without a video URL".into(),
            });
        };

        let dest = self.output_dir.join(format!("{}.mp4", job.job_id));
        match self.api.download_video(&video_url, &dest).await {
            Ok(()) => job.local_path = Some(dest),
            // The remote URL is still usable without the local copy.
            Err(e) => warn!(job_id = %job.job_id, error = %e, "could not save rendered video locally"),
        }
        info!(job_id = %job.job_id, %video_url, "render completed");
        Ok(job)
    }

    async fn run_attempt(&self, asset: &MediaAsset, plan: &AttemptPlan) -> Result<RenderJob, PipelineError> {
        let avatar_id = self.select_avatar().await?;
        let voice_id = self.select_voice().await?;
        info!(%avatar_id, %voice_id, "using avatar and voice");
        let background_url = self.upload_asset(&asset.local_path).await?;
        let job = self
            .submit_job(&avatar_id, &voice_id, &plan.text, &background_url)
            .await?;
        self.poll_until_terminal(job, plan.timeout).await
    }

    /// Renders `description` over `asset`, retrying per the [`RetryPolicy`].
    /// Every attempt submits a fresh job.
    pub async fn create_video(&self, asset: &MediaAsset, description: &str) -> Result<RenderJob, PipelineError> {
        let mut plan = self.policy.first_attempt(description);
        loop {
            info!(
                attempt = plan.attempt,
                max_attempts = self.policy.max_attempts,
                words = plan.word_count(),
                timeout_secs = plan.timeout.as_secs(),
                "starting render attempt"
            );
            let outcome = self.run_attempt(asset, &plan).await;
            match self.policy.next(&plan, outcome) {
                Transition::Complete(job) => return Ok(job),
                Transition::Retry { next, reason } => {
                    warn!(
                        attempt = next.attempt,
                        max_attempts = self.policy.max_attempts,
                        error = %reason,
                        "retrying render"
                    );
                    plan = next;
                }
                Transition::Fail(err) => {
                    error!(attempt = plan.attempt, error = %err, "giving up on render");
                    return Err(err);
                }
            }
        }
    }
}
