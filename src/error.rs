use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Transfer failure detected before or outside the HTTP client.
    #[error("Network error: {0}")]
    TransferFailed(String),

    #[error("HTTP {status} from {endpoint}: {body}")]
    Http {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("No videos found for {0}")]
    NotFound(String),

    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Job submission failed: {0}")]
    Submission(String),

    #[error("Render job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    #[error("Render job {job_id} did not finish within {timeout_secs}s")]
    Timeout { job_id: String, timeout_secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PipelineError {
    /// Whether a render attempt that hit this error may be repeated.
    ///
    /// Network failures, throttling and server-side errors are transient, as
    /// is an exhausted polling window. A job the service reported as failed
    /// is not.
    pub fn is_transient(&self) -> bool {
        match self {
            PipelineError::Transport(_)
            | PipelineError::TransferFailed(_)
            | PipelineError::Timeout { .. } => true,
            PipelineError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Builds an [`PipelineError::Http`] from a non-success response, keeping
    /// the body for diagnostics.
    pub async fn from_response(endpoint: &str, response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        PipelineError::Http {
            endpoint: endpoint.to_string(),
            status,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_mentions_room() {
        let err = PipelineError::NotFound("living room".into());
        assert_eq!(err.to_string(), "No videos found for living room");
    }

    #[test]
    fn timeout_display() {
        let err = PipelineError::Timeout {
            job_id: "vid_1".into(),
            timeout_secs: 180,
        };
        assert_eq!(
            err.to_string(),
            "Render job vid_1 did not finish within 180s"
        );
    }

    #[test]
    fn transient_classification() {
        let timeout = PipelineError::Timeout {
            job_id: "a".into(),
            timeout_secs: 300,
        };
        assert!(timeout.is_transient());

        let server = PipelineError::Http {
            endpoint: "/v2/avatars".into(),
            status: 502,
            body: "bad gateway".into(),
        };
        assert!(server.is_transient());

        let throttled = PipelineError::Http {
            endpoint: "/v2/voices".into(),
            status: 429,
            body: String::new(),
        };
        assert!(throttled.is_transient());

        let unauthorized = PipelineError::Http {
            endpoint: "/v2/avatars".into(),
            status: 401,
            body: "invalid key".into(),
        };
        assert!(!unauthorized.is_transient());

        let failed = PipelineError::JobFailed {
            job_id: "a".into(),
            message: "bad avatar".into(),
        };
        assert!(!failed.is_transient());
        assert!(!PipelineError::Submission("no id".into()).is_transient());
        assert!(PipelineError::TransferFailed("no download URL provided".into()).is_transient());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PipelineError>();
    }
}
