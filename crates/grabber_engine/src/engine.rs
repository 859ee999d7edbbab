use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use tokio::runtime::{Handle, Runtime};

use crate::progress::{spawn_progress_stream, ChannelEventSink, EventSink, StreamHandle};
use crate::{
    Debouncer, DownloadRequest, EngineEvent, JobService, ReqwestJobService, ServiceError,
    ServiceSettings,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    SchedulePreview {
        delay: Duration,
    },
    CancelPendingPreview,
    FetchPreview {
        request_id: u64,
        url: String,
    },
    Submit {
        url: String,
        format: String,
        selected_urls: Option<Vec<String>>,
    },
    TrackProgress {
        job_id: String,
    },
    CloseStream {
        job_id: String,
    },
    Cancel {
        job_id: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(std::io::Error),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Command side of the engine. Events come back on the receiver returned by
/// [`EngineHandle::new`].
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        settings: ServiceSettings,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let service = ReqwestJobService::new(settings)?;
        Self::with_service(Arc::new(service))
    }

    pub fn with_service(
        service: Arc<dyn JobService>,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("grabber-engine")
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("grabber-engine-commands".to_string())
            .spawn(move || {
                let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
                run_command_loop(runtime, service, sink, cmd_rx);
            })
            .map_err(EngineError::Thread)?;

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_error!("Engine command loop is gone; command dropped");
        }
    }
}

fn run_command_loop(
    runtime: Runtime,
    service: Arc<dyn JobService>,
    sink: Arc<dyn EventSink>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
) {
    let mut dispatcher = Dispatcher::new(runtime.handle().clone(), service, sink);
    while let Ok(command) = cmd_rx.recv() {
        dispatcher.handle(command);
    }
    engine_info!("Engine command channel closed; shutting down");
    dispatcher.shutdown();
    runtime.shutdown_timeout(Duration::from_secs(1));
}

/// Executes engine commands on a runtime. Owns the debounce timer and the
/// open progress streams.
pub(crate) struct Dispatcher {
    runtime: Handle,
    service: Arc<dyn JobService>,
    sink: Arc<dyn EventSink>,
    debouncer: Debouncer,
    streams: HashMap<String, StreamHandle>,
}

impl Dispatcher {
    pub(crate) fn new(runtime: Handle, service: Arc<dyn JobService>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            debouncer: Debouncer::new(runtime.clone()),
            runtime,
            service,
            sink,
            streams: HashMap::new(),
        }
    }

    pub(crate) fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::SchedulePreview { delay } => {
                let sink = self.sink.clone();
                self.debouncer
                    .schedule(delay, move || sink.emit(EngineEvent::PreviewDue));
            }
            EngineCommand::CancelPendingPreview => self.debouncer.cancel(),
            EngineCommand::FetchPreview { request_id, url } => {
                engine_debug!("FetchPreview request_id={} url_len={}", request_id, url.len());
                let service = self.service.clone();
                let sink = self.sink.clone();
                self.runtime.spawn(async move {
                    let result = service.info(&url).await;
                    if let Err(err) = &result {
                        engine_debug!("Preview {} failed: {}", request_id, err);
                    }
                    sink.emit(EngineEvent::PreviewLoaded { request_id, result });
                });
            }
            EngineCommand::Submit {
                url,
                format,
                selected_urls,
            } => {
                engine_info!(
                    "Submit format={} selected={:?} url={}",
                    format,
                    selected_urls.as_ref().map(Vec::len),
                    url
                );
                let service = self.service.clone();
                let sink = self.sink.clone();
                let request = DownloadRequest {
                    url,
                    format,
                    selected_urls,
                };
                self.runtime.spawn(async move {
                    let result = service.download(&request).await.map(|r| r.job_id);
                    match &result {
                        Ok(job_id) => engine_info!("Job {} accepted", job_id),
                        Err(err) => engine_warn!("Submit failed: {}", err),
                    }
                    sink.emit(EngineEvent::JobSubmitted(result));
                });
            }
            EngineCommand::TrackProgress { job_id } => {
                if let Some(previous) = self.streams.remove(&job_id) {
                    previous.close();
                }
                let handle = spawn_progress_stream(
                    &self.runtime,
                    self.service.clone(),
                    job_id.clone(),
                    self.sink.clone(),
                );
                self.streams.insert(job_id, handle);
            }
            EngineCommand::CloseStream { job_id } => {
                if let Some(handle) = self.streams.remove(&job_id) {
                    handle.close();
                }
            }
            EngineCommand::Cancel { job_id } => {
                engine_info!("Cancel requested for job {}", job_id);
                let service = self.service.clone();
                self.runtime.spawn(async move {
                    if let Err(err) = service.cancel(&job_id).await {
                        engine_warn!("Cancel request for job {} failed: {}", job_id, err);
                    }
                });
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn open_streams(&self) -> usize {
        self.streams.len()
    }

    pub(crate) fn shutdown(&mut self) {
        self.debouncer.cancel();
        for (_, handle) in self.streams.drain() {
            handle.close();
        }
    }
}
