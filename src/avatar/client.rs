use std::path::Path;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use super::types::{
    Avatar, AvatarList, Envelope, GenerateRequest, JobStatusReport, SubmittedJob, UploadedAsset,
    Voice, VoiceList,
};
use crate::download::stream_to_file;
use crate::error::PipelineError;

/// Remote operations of the avatar video service.
///
/// [`HeygenClient`] talks HTTP; the render state machine only depends on
/// this trait.
pub trait AvatarApi {
    async fn list_avatars(&self) -> Result<Vec<Avatar>, PipelineError>;
    async fn list_voices(&self) -> Result<Vec<Voice>, PipelineError>;
    /// Uploads a local video and returns the URL the service can read it from.
    async fn upload_asset(&self, local_path: &Path) -> Result<String, PipelineError>;
    /// Creates a render job and returns its id.
    async fn submit_job(&self, request: &GenerateRequest) -> Result<String, PipelineError>;
    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, PipelineError>;
    async fn download_video(&self, url: &str, dest: &Path) -> Result<(), PipelineError>;
}

pub struct HeygenClient {
    api_key: String,
    client: Client,
    base_url: String,
    upload_url: String,
}

impl HeygenClient {
    pub fn new(api_key: String, base_url: String, upload_url: String) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(300))
            .build()?;
        Ok(Self {
            api_key,
            client,
            base_url,
            upload_url,
        })
    }

    async fn get_listing<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T, PipelineError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "fetching listing");
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = PipelineError::from_response(&url, response).await;
            error!(error = %err, "{what} listing failed");
            return Err(err);
        }

        let body = response.text().await?;
        serde_json::from_str::<Envelope<T>>(&body)
            .map(|envelope| envelope.data)
            .map_err(|e| {
                error!(%body, "unexpected {what} listing schema");
                PipelineError::ResourceUnavailable(format!("malformed {what} listing: {e}"))
            })
    }
}

/// Throttling and server-side failures surface as [`PipelineError::Http`] so
/// the render loop retries them; other rejections are final.
fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

impl AvatarApi for HeygenClient {
    async fn list_avatars(&self) -> Result<Vec<Avatar>, PipelineError> {
        let list: AvatarList = self.get_listing("/v2/avatars", "avatar").await?;
        Ok(list.avatars)
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, PipelineError> {
        let list: VoiceList = self.get_listing("/v2/voices", "voice").await?;
        Ok(list.voices)
    }

    async fn upload_asset(&self, local_path: &Path) -> Result<String, PipelineError> {
        let bytes = tokio::fs::read(local_path).await.map_err(|e| {
            PipelineError::Upload(format!("cannot read {}: {e}", local_path.display()))
        })?;

        let url = format!("{}/v1/asset", self.upload_url);
        info!(path = %local_path.display(), bytes = bytes.len(), "uploading background video");
        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .header("Content-Type", "video/mp4")
            .header("X-Api-Key", &self.api_key)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if is_retryable_status(status) {
            let err = PipelineError::from_response(&url, response).await;
            error!(error = %err, "asset upload temporarily unavailable");
            return Err(err);
        }
        let body = response.text().await?;
        if !status.is_success() {
            error!(status = status.as_u16(), %body, "asset upload rejected");
            return Err(PipelineError::Upload(format!("HTTP {}: {body}", status.as_u16())));
        }

        let asset: Envelope<UploadedAsset> = serde_json::from_str(&body)
            .map_err(|e| PipelineError::Upload(format!("unexpected upload response ({e}): {body}")))?;
        debug!(asset_id = ?asset.data.id, "asset uploaded");
        Ok(asset.data.url)
    }

    async fn submit_job(&self, request: &GenerateRequest) -> Result<String, PipelineError> {
        let url = format!("{}/v2/video/generate", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .header("X-Api-Key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if is_retryable_status(status) {
            let err = PipelineError::from_response(&url, response).await;
            error!(error = %err, "job submission temporarily unavailable");
            return Err(err);
        }
        let body = response.text().await?;
        if !status.is_success() {
            error!(status = status.as_u16(), %body, "job submission rejected");
            return Err(PipelineError::Submission(format!("HTTP {}: {body}", status.as_u16())));
        }

        serde_json::from_str::<Envelope<SubmittedJob>>(&body)
            .ok()
            .and_then(|envelope| envelope.data.video_id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                error!(%body, "no job id in submission response");
                PipelineError::Submission(format!("no video_id in response: {body}"))
            })
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, PipelineError> {
        let url = format!("{}/v1/video_status.get", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("X-Api-Key", &self.api_key)
            .query(&[("video_id", job_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            let err = PipelineError::from_response(&url, response).await;
            error!(job_id, error = %err, "status check failed");
            return Err(err);
        }

        let report: Envelope<JobStatusReport> = response.json().await?;
        Ok(report.data)
    }

    async fn download_video(&self, url: &str, dest: &Path) -> Result<(), PipelineError> {
        stream_to_file(&self.client, url, dest).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::types::RemoteStatus;
    use serde_json::json;
    use wiremock::matchers::{body_bytes, body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HeygenClient {
        HeygenClient::new("hg-key".into(), server.uri(), format!("{}/upload", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn lists_avatars_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/avatars"))
            .and(header("X-Api-Key", "hg-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": null,
                "data": {"avatars": [{"avatar_id": "a1"}, {"avatar_id": "a2"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let avatars = client_for(&server).list_avatars().await.unwrap();
        assert_eq!(avatars.len(), 2);
        assert_eq!(avatars[0].avatar_id, "a1");
    }

    #[tokio::test]
    async fn malformed_voice_listing_is_resource_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/voices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"voices": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).list_voices().await.unwrap_err();
        assert!(matches!(err, PipelineError::ResourceUnavailable(_)));
    }

    #[tokio::test]
    async fn listing_http_error_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/avatars"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_avatars().await.unwrap_err();
        assert!(matches!(err, PipelineError::Http { status: 503, .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn uploads_raw_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/v1/asset"))
            .and(header("Content-Type", "video/mp4"))
            .and(body_bytes(b"raw-video".to_vec()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 100,
                "data": {"id": "asset_1", "url": "https://resource.heygen.ai/asset_1.mp4"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bg.mp4");
        std::fs::write(&file, b"raw-video").unwrap();

        let url = client_for(&server).upload_asset(&file).await.unwrap();
        assert_eq!(url, "https://resource.heygen.ai/asset_1.mp4");
    }

    #[tokio::test]
    async fn upload_of_missing_file_fails() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let err = client_for(&server)
            .upload_asset(&dir.path().join("nope.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Upload(_)));
    }

    #[tokio::test]
    async fn upload_rejection_is_upload_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bg.mp4");
        std::fs::write(&file, b"x").unwrap();

        let err = client_for(&server).upload_asset(&file).await.unwrap_err();
        assert!(matches!(err, PipelineError::Upload(_)));
        assert!(err.to_string().contains("413"));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn upload_server_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/v1/asset"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bg.mp4");
        std::fs::write(&file, b"x").unwrap();

        let err = client_for(&server).upload_asset(&file).await.unwrap_err();
        assert!(matches!(err, PipelineError::Http { status: 503, .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn submit_returns_video_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/video/generate"))
            .and(body_partial_json(json!({"dimension": {"width": 1920, "height": 1080}})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": null, "data": {"video_id": "vid_42"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let req = GenerateRequest::talking_avatar("a1", "v1", "Welcome home.", "https://bg");
        let id = client_for(&server).submit_job(&req).await.unwrap();
        assert_eq!(id, "vid_42");
    }

    #[tokio::test]
    async fn submit_without_id_is_submission_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/video/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .mount(&server)
            .await;

        let req = GenerateRequest::talking_avatar("a1", "v1", "text", "https://bg");
        let err = client_for(&server).submit_job(&req).await.unwrap_err();
        assert!(matches!(err, PipelineError::Submission(_)));
    }

    #[tokio::test]
    async fn submit_rejection_is_submission_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/video/generate"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid avatar_id"))
            .mount(&server)
            .await;

        let req = GenerateRequest::talking_avatar("bad", "v1", "text", "https://bg");
        let err = client_for(&server).submit_job(&req).await.unwrap_err();
        assert!(matches!(err, PipelineError::Submission(_)));
        assert!(err.to_string().contains("invalid avatar_id"));
    }

    #[tokio::test]
    async fn submit_throttling_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/video/generate"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let req = GenerateRequest::talking_avatar("a1", "v1", "text", "https://bg");
        let err = client_for(&server).submit_job(&req).await.unwrap_err();
        assert!(matches!(err, PipelineError::Http { status: 429, .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn status_uses_video_id_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/video_status.get"))
            .and(query_param("video_id", "vid_42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"status": "processing"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let report = client_for(&server).job_status("vid_42").await.unwrap();
        assert_eq!(report.status, RemoteStatus::Processing);
        assert!(report.video_url.is_none());
    }
}
