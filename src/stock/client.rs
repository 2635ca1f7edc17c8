use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use super::types::{MediaAsset, SearchResponse, VideoCandidate};
use crate::download::stream_to_file;
use crate::error::PipelineError;

/// Client for the stock-video search API.
pub struct StockVideoClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl StockVideoClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            api_key,
            client,
            base_url,
        })
    }

    /// Landscape keyword search. An empty result is not an error; callers
    /// decide what "nothing found" means for them.
    pub async fn search(&self, query: &str, count: u32) -> Result<Vec<VideoCandidate>, PipelineError> {
        if query.trim().is_empty() {
            return Err(PipelineError::InvalidInput("search query must not be empty".into()));
        }
        if count == 0 {
            return Err(PipelineError::InvalidInput("search count must be at least 1".into()));
        }

        let url = format!("{}/search", self.base_url);
        let per_page = count.to_string();
        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", "landscape"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let err = PipelineError::from_response(&url, response).await;
            warn!(query, error = %err, "video search failed");
            return Err(err);
        }

        let body: SearchResponse = response.json().await?;
        if body.videos.is_empty() {
            warn!(query, "no videos found");
        } else {
            info!(query, results = body.videos.len(), "video search complete");
        }
        Ok(body.videos)
    }

    /// Streams `source_url` to `destination`, creating parent directories.
    pub async fn download(&self, source_url: &str, destination: &Path) -> Result<PathBuf, PipelineError> {
        let (path, _) = stream_to_file(&self.client, source_url, destination).await?;
        Ok(path)
    }

    /// Downloads the best rendition of `candidate` and returns the resulting asset.
    pub async fn fetch_asset(
        &self,
        candidate: VideoCandidate,
        destination: &Path,
    ) -> Result<MediaAsset, PipelineError> {
        let link = candidate
            .best_rendition()
            .map(|r| r.link.clone())
            .ok_or_else(|| {
                PipelineError::InvalidInput(format!("video {} has no downloadable renditions", candidate.url))
            })?;
        let local_path = self.download(&link, destination).await?;
        Ok(candidate.into_asset(link, local_path))
    }
}
