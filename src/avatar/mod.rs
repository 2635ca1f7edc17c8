pub mod client;
pub mod types;

pub use client::{AvatarApi, HeygenClient};
pub use types::{Avatar, GenerateRequest, JobStatusReport, RemoteStatus, Voice};
