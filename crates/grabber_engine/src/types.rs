use serde::{Deserialize, Serialize};

/// Body of `POST /api/info`. The service ignores `format` for previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoRequest {
    pub url: String,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InfoResponse {
    pub title: String,
    #[serde(default)]
    pub is_playlist: bool,
    #[serde(default)]
    pub entries: Vec<InfoEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InfoEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of `POST /api/download`; `selected_urls` serializes as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub format: String,
    pub selected_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadResponse {
    pub job_id: String,
}

/// Data of one `GET /api/progress/{job_id}` event. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProgressPayload {
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_file: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub cancelled: bool,
    #[serde(default)]
    pub playlist_title: Option<String>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

#[derive(Debug)]
pub enum EngineEvent {
    /// The preview debounce timer elapsed.
    PreviewDue,
    PreviewLoaded {
        request_id: u64,
        result: Result<InfoResponse, ServiceError>,
    },
    JobSubmitted(Result<String, ServiceError>),
    Progress {
        job_id: String,
        payload: ProgressPayload,
    },
    /// The stream ended or failed without being closed by the client.
    StreamLost { job_id: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::{DownloadRequest, ProgressPayload};

    #[test]
    fn absent_selection_is_sent_as_null() {
        let body = serde_json::to_value(DownloadRequest {
            url: "https://youtu.be/a".into(),
            format: "mp3".into(),
            selected_urls: None,
        })
        .unwrap();
        assert!(body["selected_urls"].is_null());
        assert_eq!(body["format"], "mp3");
    }

    #[test]
    fn server_job_snapshot_decodes_as_progress() {
        let raw = r#"{"progress": 0, "status": "Starting...", "file": null, "error": null,
            "current_file": null, "playlist_title": "playlist", "cancelled": false,
            "created_at": 1700000000.5}"#;
        let payload: ProgressPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.progress, Some(0.0));
        assert_eq!(payload.status.as_deref(), Some("Starting..."));
        assert_eq!(payload.error, None);
        assert!(!payload.cancelled);
    }

    #[test]
    fn sparse_payload_uses_defaults() {
        let payload: ProgressPayload = serde_json::from_str(r#"{"error": "Not found"}"#).unwrap();
        assert_eq!(payload.error.as_deref(), Some("Not found"));
        assert_eq!(payload.progress, None);
        assert!(!payload.cancelled);

        let payload: ProgressPayload = serde_json::from_str(r#"{"cancelled": null}"#).unwrap();
        assert!(!payload.cancelled);
    }
}
