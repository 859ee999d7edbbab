//! Grabber core: pure job lifecycle state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    is_video_host_url, AppState, Format, JobId, Phase, Preview, PreviewEntry, ProgressUpdate,
    RequestId, ValidationError, DEFAULT_DEBOUNCE,
};
pub use update::update;
pub use view_model::{
    format_duration, AppViewModel, ButtonView, PreviewRowView, PreviewView, ProgressView,
    ResultView,
};
