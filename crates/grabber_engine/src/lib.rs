//! Grabber engine: Job Service client, progress streams and effect execution.
mod client;
mod debounce;
mod engine;
mod progress;
mod sse;
mod types;

pub use client::{JobService, ProgressStream, ReqwestJobService, ServiceSettings};
pub use debounce::Debouncer;
pub use engine::{EngineCommand, EngineError, EngineHandle};
pub use progress::{spawn_progress_stream, ChannelEventSink, EventSink, StreamHandle};
pub use sse::{SseDecoder, SseEvent};
pub use types::{
    DownloadRequest, DownloadResponse, EngineEvent, InfoEntry, InfoRequest, InfoResponse,
    ProgressPayload, ServiceError,
};
