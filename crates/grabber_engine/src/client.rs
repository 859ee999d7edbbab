use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use futures_util::{stream, Stream, StreamExt};
use reqwest::header::ACCEPT;
use url::Url;

use crate::sse::{SseDecoder, SseEvent};
use crate::{
    DownloadRequest, DownloadResponse, InfoRequest, InfoResponse, ProgressPayload, ServiceError,
};

/// Decoded progress events for one job, in server order.
pub type ProgressStream =
    Pin<Box<dyn Stream<Item = Result<ProgressPayload, ServiceError>> + Send>>;

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Origin of the Job Service, e.g. `http://127.0.0.1:5000/`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applies to info/download/cancel; progress streams never time out.
    pub request_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait::async_trait]
pub trait JobService: Send + Sync {
    async fn info(&self, url: &str) -> Result<InfoResponse, ServiceError>;

    async fn download(&self, request: &DownloadRequest) -> Result<DownloadResponse, ServiceError>;

    /// Fire-and-forget; the response body is not interpreted.
    async fn cancel(&self, job_id: &str) -> Result<(), ServiceError>;

    async fn progress(&self, job_id: &str) -> Result<ProgressStream, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobService {
    base: Url,
    client: reqwest::Client,
    stream_client: reqwest::Client,
}

impl ReqwestJobService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let base = parse_base(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::Network(err.to_string()))?;
        let stream_client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ServiceError::Network(err.to_string()))?;
        Ok(Self {
            base,
            client,
            stream_client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base
            .join(path)
            .map_err(|err| ServiceError::InvalidUrl(err.to_string()))
    }

    fn job_endpoint(&self, prefix: &str, job_id: &str) -> Result<Url, ServiceError> {
        let mut url = self.endpoint(prefix)?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidUrl(format!("{} cannot carry a path", self.base)))?
            .push(job_id);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl JobService for ReqwestJobService {
    async fn info(&self, url: &str) -> Result<InfoResponse, ServiceError> {
        let body = InfoRequest {
            url: url.to_string(),
            format: "mp4".to_string(),
        };
        let response = self
            .client
            .post(self.endpoint("api/info")?)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        response.json().await.map_err(map_reqwest_error)
    }

    async fn download(&self, request: &DownloadRequest) -> Result<DownloadResponse, ServiceError> {
        let response = self
            .client
            .post(self.endpoint("api/download")?)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        response.json().await.map_err(map_reqwest_error)
    }

    async fn cancel(&self, job_id: &str) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(self.job_endpoint("api/cancel", job_id)?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response).await?;
        Ok(())
    }

    async fn progress(&self, job_id: &str) -> Result<ProgressStream, ServiceError> {
        let response = self
            .stream_client
            .get(self.job_endpoint("api/progress", job_id)?)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        engine_debug!("progress stream opened for job {}", job_id);

        let job = job_id.to_string();
        let chunks = Box::pin(response.bytes_stream());
        let state = (chunks, SseDecoder::new(), VecDeque::<SseEvent>::new());
        let events = stream::unfold(state, move |(mut chunks, mut decoder, mut pending)| {
            let job = job.clone();
            async move {
                loop {
                    if let Some(event) = pending.pop_front() {
                        match decode_payload(&job, &event) {
                            Some(payload) => return Some((Ok(payload), (chunks, decoder, pending))),
                            None => continue,
                        }
                    }
                    match chunks.next().await {
                        Some(Ok(chunk)) => pending.extend(decoder.feed(&chunk)),
                        Some(Err(err)) => {
                            return Some((Err(map_reqwest_error(err)), (chunks, decoder, pending)))
                        }
                        None => return None,
                    }
                }
            }
        });
        Ok(Box::pin(events))
    }
}

fn parse_base(raw: &str) -> Result<Url, ServiceError> {
    let mut url = Url::parse(raw.trim()).map_err(|err| ServiceError::InvalidUrl(err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ServiceError::InvalidUrl(format!("{raw} cannot be a base url")));
    }
    // Without a trailing slash `join` would replace the last path segment.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn decode_payload(job_id: &str, event: &SseEvent) -> Option<ProgressPayload> {
    match serde_json::from_str(&event.data) {
        Ok(payload) => Some(payload),
        Err(err) => {
            engine_warn!(
                "Skipping undecodable progress event for job {}: {} (data_len={})",
                job_id,
                err,
                event.data.len()
            );
            None
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_detail(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    Err(ServiceError::HttpStatus {
        status: status.as_u16(),
        message,
    })
}

/// Extracts the `detail` field of a JSON error body.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::Timeout;
    }
    if err.is_decode() {
        return ServiceError::Decode(err.to_string());
    }
    ServiceError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{error_detail, parse_base};

    #[test]
    fn base_url_gains_trailing_slash() {
        let base = parse_base("http://host:5000/app").unwrap();
        assert_eq!(base.join("api/info").unwrap().as_str(), "http://host:5000/app/api/info");
        assert!(parse_base("not a url").is_err());
    }

    #[test]
    fn detail_is_taken_from_error_bodies() {
        assert_eq!(
            error_detail(r#"{"detail": "Unsupported URL"}"#).as_deref(),
            Some("Unsupported URL")
        );
        assert_eq!(error_detail("<html>oops</html>"), None);
        assert_eq!(error_detail(r#"{"other": 1}"#), None);
    }
}
