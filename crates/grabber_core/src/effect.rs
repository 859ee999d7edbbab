use std::time::Duration;

use crate::{Format, JobId, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// (Re)start the preview debounce timer; any pending timer is dropped.
    SchedulePreview { delay: Duration },
    /// Drop the pending preview timer, if any.
    CancelPendingPreview,
    FetchPreview { request_id: RequestId, url: String },
    SubmitJob {
        url: String,
        format: Format,
        /// `None` downloads the whole target.
        selected_urls: Option<Vec<String>>,
    },
    TrackProgress { job_id: JobId },
    CloseStream { job_id: JobId },
    CancelJob { job_id: JobId },
}
