use std::sync::{mpsc, Arc};

use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::StreamExt;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, JobService};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Owner side of one open progress stream. Closing is idempotent.
#[derive(Debug, Clone)]
pub struct StreamHandle {
    job_id: String,
    token: CancellationToken,
}

impl StreamHandle {
    pub fn close(&self) {
        if !self.token.is_cancelled() {
            engine_debug!("closing progress stream for job {}", self.job_id);
            self.token.cancel();
        }
    }
}

/// Opens the progress stream for `job_id` on `runtime` and forwards every
/// decoded event to `sink` until the returned handle is closed.
///
/// If the stream ends or fails before being closed, exactly one
/// [`EngineEvent::StreamLost`] is emitted. There is no reconnect.
pub fn spawn_progress_stream(
    runtime: &Handle,
    service: Arc<dyn JobService>,
    job_id: String,
    sink: Arc<dyn EventSink>,
) -> StreamHandle {
    let token = CancellationToken::new();
    let handle = StreamHandle {
        job_id: job_id.clone(),
        token: token.clone(),
    };
    runtime.spawn(async move {
        run_stream(service.as_ref(), job_id, sink.as_ref(), token).await;
    });
    handle
}

async fn run_stream(
    service: &dyn JobService,
    job_id: String,
    sink: &dyn EventSink,
    token: CancellationToken,
) {
    let opened = tokio::select! {
        _ = token.cancelled() => return,
        opened = service.progress(&job_id) => opened,
    };
    let mut events = match opened {
        Ok(events) => events,
        Err(err) => {
            engine_warn!("Progress stream for job {} failed to open: {}", job_id, err);
            sink.emit(EngineEvent::StreamLost {
                job_id,
                reason: err.to_string(),
            });
            return;
        }
    };

    loop {
        let next = tokio::select! {
            biased;
            _ = token.cancelled() => {
                engine_debug!("progress stream for job {} closed by client", job_id);
                return;
            }
            next = events.next() => next,
        };
        match next {
            Some(Ok(payload)) => sink.emit(EngineEvent::Progress {
                job_id: job_id.clone(),
                payload,
            }),
            Some(Err(err)) => {
                engine_warn!("Progress stream for job {} dropped: {}", job_id, err);
                sink.emit(EngineEvent::StreamLost {
                    job_id,
                    reason: err.to_string(),
                });
                return;
            }
            None => {
                engine_info!("Progress stream for job {} ended by server", job_id);
                sink.emit(EngineEvent::StreamLost {
                    job_id,
                    reason: "stream ended".to_string(),
                });
                return;
            }
        }
    }
}
