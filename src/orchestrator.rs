use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::avatar::AvatarApi;
use crate::config::RoomSpec;
use crate::description::DescriptionClient;
use crate::error::PipelineError;
use crate::render::{RenderJob, RenderStatus, VideoRenderer};
use crate::stock::StockVideoClient;
use crate::text::TextModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Success,
    Failed,
}

/// Outcome of processing one room. Built once, never modified.
#[derive(Debug, Clone, Serialize)]
pub struct RoomResult {
    pub room_type: String,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
    pub status: RoomStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RoomResult {
    fn success(room: &RoomSpec, description: String, job: RenderJob) -> Self {
        debug_assert_eq!(job.status, RenderStatus::Completed);
        Self {
            room_type: room.room_type.clone(),
            features: room.features.clone(),
            description: Some(description),
            video_url: job.video_url,
            local_path: job.local_path,
            status: RoomStatus::Success,
            error: None,
        }
    }

    fn failed(room: &RoomSpec, err: &PipelineError) -> Self {
        Self {
            room_type: room.room_type.clone(),
            features: room.features.clone(),
            description: None,
            video_url: None,
            local_path: None,
            status: RoomStatus::Failed,
            error: Some(err.to_string()),
        }
    }
}

/// Summary of a whole run, written next to the rendered videos.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub results: Vec<RoomResult>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == RoomStatus::Success)
            .count()
    }

    /// Writes the report as pretty JSON, creating the parent directory.
    pub fn write_to(&self, path: &Path) -> Result<(), PipelineError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Search query used for a room's background footage.
pub fn search_query(room_type: &str) -> String {
    format!("luxury {room_type}")
}

/// Where a room's background video is stored.
pub fn download_path(downloads_dir: &Path, room_type: &str) -> PathBuf {
    downloads_dir.join(format!("{}.mp4", room_type.replace(' ', "_")))
}

/// Runs rooms through search → download → description → render, one at a time.
pub struct Pipeline<M, A> {
    pub stock: StockVideoClient,
    pub descriptions: DescriptionClient<M>,
    pub renderer: VideoRenderer<A>,
    pub downloads_dir: PathBuf,
    pub search_results: u32,
}

impl<M: TextModel, A: AvatarApi> Pipeline<M, A> {
    /// Processes every room in order. A failed room never stops the run.
    pub async fn run(
        &self,
        rooms: &[RoomSpec],
        mut on_result: impl FnMut(&RoomResult),
    ) -> RunReport {
        let started_at = Utc::now();
        let mut results = Vec::with_capacity(rooms.len());
        for room in rooms {
            let result = self.process_room(room).await;
            on_result(&result);
            results.push(result);
        }
        RunReport {
            run_id: Uuid::new_v4(),
            started_at,
            completed_at: Utc::now(),
            results,
        }
    }

    /// Processes one room, folding any failure into the result.
    pub async fn process_room(&self, room: &RoomSpec) -> RoomResult {
        match self.render_room(room).await {
            Ok((description, job)) => {
                info!(room_type = %room.room_type, video_url = ?job.video_url, "room processed");
                RoomResult::success(room, description, job)
            }
            Err(e) => {
                error!(room_type = %room.room_type, error = %e, "room failed");
                RoomResult::failed(room, &e)
            }
        }
    }

    async fn render_room(&self, room: &RoomSpec) -> Result<(String, RenderJob), PipelineError> {
        info!(room_type = %room.room_type, "searching for video");
        let mut candidates = self
            .stock
            .search(&search_query(&room.room_type), self.search_results)
            .await?;
        if candidates.is_empty() {
            return Err(PipelineError::NotFound(room.room_type.clone()));
        }
        let candidate = candidates.swap_remove(0);
        let asset = self
            .stock
            .fetch_asset(candidate, &download_path(&self.downloads_dir, &room.room_type))
            .await?;

        info!(room_type = %room.room_type, "generating description");
        let description = self
            .descriptions
            .generate(&room.room_type, &room.features)
            .await;

        info!(room_type = %room.room_type, "creating avatar video");
        let job = self.renderer.create_video(&asset, &description).await?;
        Ok((description, job))
    }
}
