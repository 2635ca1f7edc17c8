//! Streams a remote file to local disk. Shared by the stock-video client
//! (source footage) and the avatar client (rendered videos).

use std::path::{Path, PathBuf};

use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::PipelineError;

/// Downloads `url` into `dest`, creating parent directories as needed.
/// Returns the destination path and the number of bytes written.
pub async fn stream_to_file(
    client: &Client,
    url: &str,
    dest: &Path,
) -> Result<(PathBuf, u64), PipelineError> {
    if url.trim().is_empty() {
        return Err(PipelineError::TransferFailed("no download URL provided".into()));
    }

    let mut response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(PipelineError::from_response(url, response).await);
    }

    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = File::create(dest).await?;
    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    info!(path = %dest.display(), bytes = written, "download complete");
    Ok((dest.to_path_buf(), written))
}
