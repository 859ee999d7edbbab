use url::Url;

use crate::state::{JobResult, PreviewList, ProgressDisplay};
use crate::{Format, Phase};

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub input: String,
    pub format: Format,
    pub phase: Phase,
    /// `None` while the preview panel is hidden.
    pub preview: Option<PreviewView>,
    pub submit: ButtonView,
    pub cancel: ButtonView,
    /// `None` while the progress panel is hidden.
    pub progress: Option<ProgressView>,
    pub result: Option<ResultView>,
    /// Dismissable error panel text.
    pub error: Option<String>,
    /// Blocking validation alert.
    pub alert: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonView {
    pub enabled: bool,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewView {
    pub title: String,
    pub loading: bool,
    pub select_all: bool,
    pub entries: Vec<PreviewRowView>,
}

impl PreviewView {
    pub(crate) fn loading() -> Self {
        Self {
            title: "Loading preview...".to_string(),
            loading: true,
            select_all: true,
            entries: Vec::new(),
        }
    }

    pub(crate) fn from_list(list: &PreviewList) -> Self {
        let kind = if list.is_playlist { "Playlist" } else { "Video" };
        Self {
            title: format!("{kind}: {}", list.title),
            loading: false,
            select_all: list.select_all,
            entries: list
                .entries
                .iter()
                .map(|e| PreviewRowView {
                    title: e.entry.title.clone(),
                    duration: format_duration(e.entry.duration),
                    checked: e.checked,
                    selectable: e.entry.url.as_deref().is_some_and(|url| !url.is_empty()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRowView {
    pub title: String,
    pub duration: String,
    pub checked: bool,
    /// Entries without a URL never contribute to the selection.
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    /// Raw percentage as last reported, 0..=100.
    pub percent: f64,
    pub percent_text: String,
    pub status: String,
    pub current_file: String,
}

impl ProgressView {
    pub(crate) fn from_display(display: &ProgressDisplay) -> Self {
        Self {
            percent: display.percent,
            percent_text: format!("{}%", display.percent.round() as i64),
            status: display.status.clone(),
            current_file: display.current_file.clone(),
        }
    }

    /// Bar fill in 0.0..=1.0.
    pub fn ratio(&self) -> f64 {
        if self.percent.is_finite() {
            (self.percent / 100.0).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub title: String,
    pub download_url: String,
}

impl ResultView {
    pub(crate) fn new(origin: &Url, result: &JobResult) -> Self {
        let path = format!("download/{}", result.job_id);
        let download_url = origin.join(&path).map(String::from).unwrap_or_else(|_| {
            format!("{}/{path}", origin.as_str().trim_end_matches('/'))
        });
        Self {
            title: result.title.clone(),
            download_url,
        }
    }
}

/// Renders seconds as `MM:SS`, or `HH:MM:SS` once there is a full hour.
/// Absent or zero durations render as an empty string.
pub fn format_duration(seconds: Option<f64>) -> String {
    let seconds = match seconds {
        Some(s) if s.is_finite() && s > 0.0 => s.floor() as u64,
        _ => return String::new(),
    };
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours == 0 {
        format!("{minutes:02}:{secs:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    }
}
