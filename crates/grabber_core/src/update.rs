use crate::{is_video_host_url, AppState, Effect, JobId, Msg, ProgressUpdate, ValidationError};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            if is_video_host_url(state.input().trim()) {
                vec![Effect::SchedulePreview {
                    delay: state.debounce(),
                }]
            } else {
                state.hide_preview();
                vec![Effect::CancelPendingPreview]
            }
        }
        Msg::PreviewDue => {
            // The timer may race a later edit; re-check what is in the box now.
            let url = state.input().trim().to_string();
            if url.is_empty() || !is_video_host_url(&url) {
                return (state, Vec::new());
            }
            let request_id = state.begin_preview();
            vec![Effect::FetchPreview { request_id, url }]
        }
        Msg::PreviewLoaded { request_id, result } => {
            state.apply_preview(request_id, result);
            Vec::new()
        }
        Msg::EntryToggled(index) => {
            state.toggle_entry(index);
            Vec::new()
        }
        Msg::SelectAllToggled => {
            state.toggle_select_all();
            Vec::new()
        }
        Msg::FormatSelected(format) => {
            state.set_format(format);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::JobSubmitted(result) => {
            if state.phase() != crate::Phase::Submitting {
                return (state, Vec::new());
            }
            match result {
                Ok(job_id) => {
                    state.start_tracking(job_id.clone());
                    vec![Effect::TrackProgress { job_id }]
                }
                Err(message) => {
                    state.fail(&message);
                    Vec::new()
                }
            }
        }
        Msg::ProgressReceived { job_id, update } => {
            if !state.is_streaming(&job_id) {
                return (state, Vec::new());
            }
            apply_progress_event(&mut state, job_id, update)
        }
        Msg::StreamLost { job_id } => {
            if !state.is_streaming(&job_id) {
                return (state, Vec::new());
            }
            state.mark_stream_lost();
            vec![Effect::CloseStream { job_id }]
        }
        Msg::CancelClicked => match state.request_cancel() {
            Some(job_id) => {
                // With the stream gone no confirmation can arrive, so settle locally.
                if !state.is_stream_open() {
                    state.cancelled();
                }
                vec![Effect::CancelJob { job_id }]
            }
            None => Vec::new(),
        },
        Msg::AlertDismissed => {
            state.dismiss_alert();
            Vec::new()
        }
        Msg::ErrorDismissed => {
            state.dismiss_error();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if state.phase().is_busy() {
        return Vec::new();
    }

    let url = state.input().trim().to_string();
    if url.is_empty() {
        state.raise_alert(ValidationError::MissingUrl);
        return Vec::new();
    }

    let selection = state.playlist_preview().map(|list| list.selected_urls());
    let selected_urls = match selection {
        Some(urls) => {
            if urls.is_empty() {
                state.raise_alert(ValidationError::EmptySelection);
                return Vec::new();
            }
            Some(urls)
        }
        None => None,
    };

    state.begin_submission();
    vec![Effect::SubmitJob {
        url,
        format: state.format(),
        selected_urls,
    }]
}

/// Latest-wins projection of one stream event. Every terminal branch closes
/// the stream once and clears the tracked job, so later events are ignored.
fn apply_progress_event(state: &mut AppState, job_id: JobId, update: ProgressUpdate) -> Vec<Effect> {
    if let Some(error) = update.error.as_deref().filter(|e| !e.is_empty()) {
        state.fail(error);
        return vec![Effect::CloseStream { job_id }];
    }
    if update.cancelled {
        state.cancelled();
        return vec![Effect::CloseStream { job_id }];
    }

    state.apply_progress(&update);

    match update.status.as_deref() {
        Some("Completed") => {
            state.complete(job_id.clone(), update.playlist_title);
            vec![Effect::CloseStream { job_id }]
        }
        Some("Error") => {
            state.fail("Unknown error");
            vec![Effect::CloseStream { job_id }]
        }
        _ => Vec::new(),
    }
}
