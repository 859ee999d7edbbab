use std::sync::mpsc;
use std::thread;

use engine_logging::{engine_debug, engine_info, engine_warn};
use grabber_core::{Effect, JobId, Msg, Preview, PreviewEntry, ProgressUpdate};
use grabber_engine::{
    EngineCommand, EngineError, EngineEvent, EngineHandle, InfoResponse, ProgressPayload,
    ServiceError, ServiceSettings,
};

const UNTITLED: &str = "Untitled";
const SUBMIT_FAILED: &str = "Failed to start download";

/// Turns core effects into engine commands and feeds engine events back as
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ServiceSettings, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::new(settings)?;
        spawn_event_loop(events, msg_tx);
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            let command = map_effect(effect);
            engine_debug!("engine command: {:?}", command);
            self.engine.send(command);
        }
    }
}

fn spawn_event_loop(events: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = events.recv() {
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        }
        engine_info!("engine event loop finished");
    });
}

fn map_effect(effect: Effect) -> EngineCommand {
    match effect {
        Effect::SchedulePreview { delay } => EngineCommand::SchedulePreview { delay },
        Effect::CancelPendingPreview => EngineCommand::CancelPendingPreview,
        Effect::FetchPreview { request_id, url } => EngineCommand::FetchPreview { request_id, url },
        Effect::SubmitJob {
            url,
            format,
            selected_urls,
        } => {
            engine_info!(
                "SubmitJob format={} url_len={} selected={:?}",
                format.as_str(),
                url.len(),
                selected_urls.as_ref().map(Vec::len)
            );
            EngineCommand::Submit {
                url,
                format: format.as_str().to_string(),
                selected_urls,
            }
        }
        Effect::TrackProgress { job_id } => EngineCommand::TrackProgress {
            job_id: job_id.as_str().to_string(),
        },
        Effect::CloseStream { job_id } => EngineCommand::CloseStream {
            job_id: job_id.as_str().to_string(),
        },
        Effect::CancelJob { job_id } => EngineCommand::Cancel {
            job_id: job_id.as_str().to_string(),
        },
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PreviewDue => Msg::PreviewDue,
        EngineEvent::PreviewLoaded { request_id, result } => Msg::PreviewLoaded {
            request_id,
            result: result.map(map_preview).map_err(|err| err.to_string()),
        },
        EngineEvent::JobSubmitted(result) => Msg::JobSubmitted(match result {
            Ok(job_id) => Ok(JobId::new(job_id)),
            Err(err @ ServiceError::HttpStatus { .. }) => {
                engine_warn!("Download request rejected: {}", err);
                Err(SUBMIT_FAILED.to_string())
            }
            Err(err) => {
                engine_warn!("Download request failed: {}", err);
                Err(err.to_string())
            }
        }),
        EngineEvent::Progress { job_id, payload } => Msg::ProgressReceived {
            job_id: JobId::new(job_id),
            update: map_progress(payload),
        },
        EngineEvent::StreamLost { job_id, reason } => {
            engine_warn!("Progress stream for job {} lost: {}", job_id, reason);
            Msg::StreamLost {
                job_id: JobId::new(job_id),
            }
        }
    }
}

fn map_preview(info: InfoResponse) -> Preview {
    Preview {
        title: info.title,
        is_playlist: info.is_playlist,
        entries: info
            .entries
            .into_iter()
            .map(|entry| PreviewEntry {
                title: entry.title.unwrap_or_else(|| UNTITLED.to_string()),
                duration: entry.duration,
                url: entry.url,
            })
            .collect(),
    }
}

fn map_progress(payload: ProgressPayload) -> ProgressUpdate {
    ProgressUpdate {
        progress: payload.progress,
        status: payload.status,
        current_file: payload.current_file,
        error: payload.error,
        cancelled: payload.cancelled,
        playlist_title: payload.playlist_title,
    }
}
