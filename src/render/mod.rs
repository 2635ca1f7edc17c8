mod job;
mod renderer;
mod state;

pub use job::{RenderJob, RenderStatus};
pub use renderer::{PollSchedule, VideoRenderer};
pub use state::RetryPolicy;
