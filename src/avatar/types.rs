//! Wire types for the avatar video API.
//!
//! Every response is wrapped in an envelope with a `data` object. Listing
//! endpoints use a single schema each: avatars under `data.avatars`, voices
//! under `data.voices`. Anything that does not match is rejected rather than
//! guessed at.

use serde::{Deserialize, Serialize};

/// `{"data": T}` envelope shared by all endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvatarList {
    pub avatars: Vec<Avatar>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Avatar {
    pub avatar_id: String,
    #[serde(default)]
    pub avatar_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoiceList {
    pub voices: Vec<Voice>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Language code or name, e.g. `en-US` or `English`. Some voices report
    /// `null`.
    #[serde(default)]
    pub language: Option<String>,
}

impl Voice {
    pub fn is_english(&self) -> bool {
        self.language
            .as_deref()
            .is_some_and(|lang| lang.to_ascii_lowercase().starts_with("en"))
    }
}

/// `data` of the asset upload response.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedAsset {
    #[serde(default)]
    pub id: Option<String>,
    pub url: String,
}

/// Body of the job submission request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub video_inputs: Vec<VideoInput>,
    pub dimension: Dimension,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoInput {
    pub character: Character,
    pub voice: VoiceSettings,
    pub background: Background,
}

#[derive(Debug, Clone, Serialize)]
pub struct Character {
    #[serde(rename = "type")]
    pub kind: String,
    pub avatar_id: String,
    pub avatar_style: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceSettings {
    #[serde(rename = "type")]
    pub kind: String,
    pub voice_id: String,
    pub input_text: String,
    pub speed: f32,
    pub volume: f32,
    pub pitch: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Background {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub play_style: String,
    pub fit: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

/// Output size of every rendered video.
pub const OUTPUT_DIMENSION: Dimension = Dimension {
    width: 1920,
    height: 1080,
};

impl GenerateRequest {
    /// A single scene: the avatar speaking `text` over a looping,
    /// cover-scaled background video.
    pub fn talking_avatar(avatar_id: &str, voice_id: &str, text: &str, background_url: &str) -> Self {
        Self {
            video_inputs: vec![VideoInput {
                character: Character {
                    kind: "avatar".into(),
                    avatar_id: avatar_id.into(),
                    avatar_style: "normal".into(),
                },
                voice: VoiceSettings {
                    kind: "text".into(),
                    voice_id: voice_id.into(),
                    input_text: text.into(),
                    speed: 1.0,
                    volume: 1.0,
                    pitch: 0,
                },
                background: Background {
                    kind: "video".into(),
                    url: background_url.into(),
                    play_style: "loop".into(),
                    fit: "cover".into(),
                },
            }],
            dimension: OUTPUT_DIMENSION,
        }
    }
}

/// `data` of the submission response.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedJob {
    #[serde(default)]
    pub video_id: Option<String>,
}

/// Status values reported by the job status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteStatus {
    Pending,
    Waiting,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl RemoteStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RemoteStatus::Completed | RemoteStatus::Failed)
    }
}

impl std::fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RemoteStatus::Pending => "pending",
            RemoteStatus::Waiting => "waiting",
            RemoteStatus::Processing => "processing",
            RemoteStatus::Completed => "completed",
            RemoteStatus::Failed => "failed",
            RemoteStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobError {
    #[serde(default)]
    pub message: Option<String>,
}

/// `data` of the status response.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusReport {
    pub status: RemoteStatus,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub error: Option<JobError>,
}

impl JobStatusReport {
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }

    /// Human-readable status of `job_id`, one fact per line.
    pub fn summary(&self, job_id: &str) -> String {
        let mut lines = vec![format!("{job_id}: {}", self.status)];
        if let Some(url) = &self.video_url {
            lines.push(format!("video: {url}"));
        }
        if self.error.is_some() {
            lines.push(format!("error: {}", self.error_message()));
        }
        lines.join("\n")
    }
}
