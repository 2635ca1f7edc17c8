//! Data types for the stock-video search API and the assets it yields.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Search response body: `{"videos": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub videos: Vec<VideoCandidate>,
}

/// A search hit that has not been downloaded yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCandidate {
    /// Public page of the video on the stock site.
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Length in seconds.
    pub duration: u32,
    /// Every encoded variant of the video.
    #[serde(rename = "video_files", default)]
    pub renditions: Vec<Rendition>,
}

/// One encoded variant of a source video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendition {
    pub link: String,
    /// Unknown for some streaming renditions (HLS), which report `null`.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
}

impl Rendition {
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        Some((self.width?, self.height?))
    }

    pub fn area(&self) -> Option<u64> {
        self.dimensions().map(|(w, h)| u64::from(w) * u64::from(h))
    }
}

impl VideoCandidate {
    /// The rendition with the largest pixel area. The first one listed wins a
    /// tie; renditions of unknown size are never picked.
    pub fn best_rendition(&self) -> Option<&Rendition> {
        self.renditions
            .iter()
            .filter_map(|r| r.area().map(|area| (area, r)))
            .reduce(|best, cur| if cur.0 > best.0 { cur } else { best })
            .map(|(_, r)| r)
    }

    /// Turns this candidate into an asset once its best rendition is on disk.
    pub fn into_asset(self, source_url: String, local_path: PathBuf) -> MediaAsset {
        MediaAsset {
            source_url,
            width: self.width,
            height: self.height,
            duration_seconds: self.duration,
            local_path,
        }
    }
}

/// A downloaded stock video, ready to be used as a render background.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaAsset {
    pub source_url: String,
    pub width: u32,
    pub height: u32,
    pub duration_seconds: u32,
    pub local_path: PathBuf,
}
