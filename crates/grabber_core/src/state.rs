use std::fmt;
use std::time::Duration;

use url::Url;

use crate::view_model::{AppViewModel, ButtonView, PreviewView, ProgressView, ResultView};

/// Quiet period after the last keystroke before a preview is fetched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);

const VIDEO_HOST_MARKERS: [&str; 2] = ["youtube.com/", "youtu.be/"];

/// Preview request token; later requests always carry a larger id.
pub type RequestId = u64;

/// Opaque server-assigned job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    Mp3,
    #[default]
    Mp4,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Mp3, Format::Mp4];

    /// Wire name understood by the Job Service.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Mp3 => "mp3",
            Format::Mp4 => "mp4",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Format::Mp3 => Format::Mp4,
            Format::Mp4 => Format::Mp3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewEntry {
    pub title: String,
    pub duration: Option<f64>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub title: String,
    pub is_playlist: bool,
    pub entries: Vec<PreviewEntry>,
}

/// One decoded progress-stream event. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressUpdate {
    pub progress: Option<f64>,
    pub status: Option<String>,
    pub current_file: Option<String>,
    pub error: Option<String>,
    pub cancelled: bool,
    pub playlist_title: Option<String>,
}

/// Client-observable lifecycle of the current download job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl Phase {
    /// Submit stays disabled while a job is being started or tracked.
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Submitting | Phase::InProgress)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed | Phase::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingUrl,
    EmptySelection,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingUrl => write!(f, "Please paste a YouTube URL"),
            ValidationError::EmptySelection => {
                write!(f, "Please select at least one video to download")
            }
        }
    }
}

/// True when the input points at a host the preview endpoint understands.
pub fn is_video_host_url(url: &str) -> bool {
    VIDEO_HOST_MARKERS.iter().any(|marker| url.contains(marker))
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SelectableEntry {
    pub(crate) entry: PreviewEntry,
    pub(crate) checked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PreviewList {
    pub(crate) title: String,
    pub(crate) is_playlist: bool,
    pub(crate) entries: Vec<SelectableEntry>,
    pub(crate) select_all: bool,
}

impl PreviewList {
    fn new(preview: Preview) -> Self {
        Self {
            title: preview.title,
            is_playlist: preview.is_playlist,
            entries: preview
                .entries
                .into_iter()
                .map(|entry| SelectableEntry {
                    entry,
                    checked: true,
                })
                .collect(),
            select_all: true,
        }
    }

    fn sync_select_all(&mut self) {
        self.select_all = self.entries.iter().all(|e| e.checked);
    }

    /// Checked entries that carry a usable URL, in display order.
    pub(crate) fn selected_urls(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.checked)
            .filter_map(|e| e.entry.url.as_deref())
            .filter(|url| !url.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PreviewPanel {
    Hidden,
    Loading { request_id: RequestId },
    Ready(PreviewList),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProgressDisplay {
    pub(crate) percent: f64,
    pub(crate) status: String,
    pub(crate) current_file: String,
}

impl ProgressDisplay {
    fn initializing() -> Self {
        Self {
            percent: 0.0,
            status: "Initializing...".to_string(),
            current_file: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JobResult {
    pub(crate) job_id: JobId,
    pub(crate) title: String,
}

/// Session context for the job lifecycle client: at most one tracked job.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    origin: Url,
    debounce: Duration,
    input: String,
    format: Format,
    preview: PreviewPanel,
    next_request_id: RequestId,
    phase: Phase,
    current_job: Option<JobId>,
    stream_open: bool,
    cancel_requested: bool,
    progress: Option<ProgressDisplay>,
    result: Option<JobResult>,
    error: Option<String>,
    alert: Option<ValidationError>,
    dirty: bool,
}

impl AppState {
    /// `origin` is the Job Service base URL used to build artifact links.
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            debounce: DEFAULT_DEBOUNCE,
            input: String::new(),
            format: Format::default(),
            preview: PreviewPanel::Hidden,
            next_request_id: 1,
            phase: Phase::Idle,
            current_job: None,
            stream_open: false,
            cancel_requested: false,
            progress: None,
            result: None,
            error: None,
            alert: None,
            dirty: false,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_job(&self) -> Option<&JobId> {
        self.current_job.as_ref()
    }

    pub fn is_stream_open(&self) -> bool {
        self.stream_open
    }

    /// Returns whether anything observable changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let busy = self.phase.is_busy();
        AppViewModel {
            input: self.input.clone(),
            format: self.format,
            phase: self.phase,
            preview: match &self.preview {
                PreviewPanel::Hidden => None,
                PreviewPanel::Loading { .. } => Some(PreviewView::loading()),
                PreviewPanel::Ready(list) => Some(PreviewView::from_list(list)),
            },
            submit: ButtonView {
                enabled: !busy,
                label: if busy { "Processing..." } else { "Start Download" },
            },
            cancel: ButtonView {
                enabled: self.current_job.is_some() && !self.cancel_requested,
                label: if self.cancel_requested {
                    "Cancelling..."
                } else {
                    "Cancel Download"
                },
            },
            progress: self.progress.as_ref().map(ProgressView::from_display),
            result: self
                .result
                .as_ref()
                .map(|result| ResultView::new(&self.origin, result)),
            error: self.error.clone(),
            alert: self.alert.map(|alert| alert.to_string()),
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn debounce(&self) -> Duration {
        self.debounce
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn format(&self) -> Format {
        self.format
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
        if self.phase.is_terminal() {
            self.phase = Phase::Idle;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_format(&mut self, format: Format) {
        if self.format != format {
            self.format = format;
            self.mark_dirty();
        }
    }

    pub(crate) fn hide_preview(&mut self) {
        if self.preview != PreviewPanel::Hidden {
            self.preview = PreviewPanel::Hidden;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_preview(&mut self) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.preview = PreviewPanel::Loading { request_id };
        self.mark_dirty();
        request_id
    }

    /// Applies a preview response; stale or unexpected responses are dropped.
    pub(crate) fn apply_preview(&mut self, request_id: RequestId, result: Result<Preview, String>) {
        match self.preview {
            PreviewPanel::Loading { request_id: pending } if pending == request_id => {}
            _ => return,
        }
        self.preview = match result {
            Ok(preview) => PreviewPanel::Ready(PreviewList::new(preview)),
            Err(_) => PreviewPanel::Hidden,
        };
        self.mark_dirty();
    }

    pub(crate) fn toggle_entry(&mut self, index: usize) {
        if let PreviewPanel::Ready(list) = &mut self.preview {
            if let Some(entry) = list.entries.get_mut(index) {
                entry.checked = !entry.checked;
                list.sync_select_all();
                self.dirty = true;
            }
        }
    }

    pub(crate) fn toggle_select_all(&mut self) {
        if let PreviewPanel::Ready(list) = &mut self.preview {
            list.select_all = !list.select_all;
            let checked = list.select_all;
            for entry in &mut list.entries {
                entry.checked = checked;
            }
            self.dirty = true;
        }
    }

    /// The ready playlist preview, if one is on screen.
    pub(crate) fn playlist_preview(&self) -> Option<&PreviewList> {
        match &self.preview {
            PreviewPanel::Ready(list) if list.is_playlist => Some(list),
            _ => None,
        }
    }

    pub(crate) fn raise_alert(&mut self, alert: ValidationError) {
        self.alert = Some(alert);
        self.mark_dirty();
    }

    pub(crate) fn dismiss_alert(&mut self) {
        if self.alert.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn dismiss_error(&mut self) {
        if self.error.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_submission(&mut self) {
        self.phase = Phase::Submitting;
        self.progress = Some(ProgressDisplay::initializing());
        self.result = None;
        self.error = None;
        self.cancel_requested = false;
        self.mark_dirty();
    }

    pub(crate) fn start_tracking(&mut self, job_id: JobId) {
        self.phase = Phase::InProgress;
        self.current_job = Some(job_id);
        self.stream_open = true;
        self.mark_dirty();
    }

    /// True when `job_id` is tracked and its stream has not been closed.
    pub(crate) fn is_streaming(&self, job_id: &JobId) -> bool {
        self.stream_open && self.current_job.as_ref() == Some(job_id)
    }

    pub(crate) fn apply_progress(&mut self, update: &ProgressUpdate) {
        let display = self.progress.get_or_insert_with(ProgressDisplay::initializing);
        display.percent = update.progress.unwrap_or(0.0);
        display.status = update.status.clone().unwrap_or_default();
        display.current_file = update.current_file.clone().unwrap_or_default();
        self.mark_dirty();
    }

    pub(crate) fn mark_stream_lost(&mut self) {
        self.stream_open = false;
        let display = self.progress.get_or_insert_with(ProgressDisplay::initializing);
        display.status = "Lost connection".to_string();
        self.mark_dirty();
    }

    pub(crate) fn request_cancel(&mut self) -> Option<JobId> {
        if self.cancel_requested {
            return None;
        }
        let job_id = self.current_job.clone()?;
        self.cancel_requested = true;
        self.mark_dirty();
        Some(job_id)
    }

    pub(crate) fn complete(&mut self, job_id: JobId, title: Option<String>) {
        self.result = Some(JobResult {
            job_id,
            title: title.unwrap_or_else(|| "Download".to_string()),
        });
        self.finish(Phase::Completed);
    }

    pub(crate) fn fail(&mut self, message: &str) {
        self.error = Some(error_panel_text(message));
        self.finish(Phase::Failed);
    }

    pub(crate) fn cancelled(&mut self) {
        self.error = Some(error_panel_text("Download cancelled"));
        self.finish(Phase::Cancelled);
    }

    fn finish(&mut self, phase: Phase) {
        self.phase = phase;
        self.progress = None;
        self.current_job = None;
        self.stream_open = false;
        self.cancel_requested = false;
        self.mark_dirty();
    }
}

fn error_panel_text(message: &str) -> String {
    if message.contains("Error:") {
        message.to_string()
    } else {
        format!("Notification: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::{error_panel_text, is_video_host_url, Format};

    #[test]
    fn recognizes_video_hosts() {
        assert!(is_video_host_url("https://www.youtube.com/watch?v=abc"));
        assert!(is_video_host_url("https://youtu.be/abc"));
        assert!(!is_video_host_url("https://youtube.com"));
        assert!(!is_video_host_url("https://vimeo.com/123"));
    }

    #[test]
    fn raw_errors_keep_their_prefix() {
        assert_eq!(error_panel_text("Error: boom"), "Error: boom");
        assert_eq!(error_panel_text("disk full"), "Notification: disk full");
    }

    #[test]
    fn format_toggles_between_both_choices() {
        assert_eq!(Format::Mp3.toggled(), Format::Mp4);
        assert_eq!(Format::Mp4.toggled().as_str(), "mp3");
    }
}
