#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the URL input box.
    InputChanged(String),
    /// The preview debounce timer elapsed.
    PreviewDue,
    /// Job Service answered a preview request.
    PreviewLoaded {
        request_id: crate::RequestId,
        result: Result<crate::Preview, String>,
    },
    /// User toggled one preview entry checkbox.
    EntryToggled(usize),
    /// User toggled the master "select all" checkbox.
    SelectAllToggled,
    FormatSelected(crate::Format),
    /// User clicked Start Download.
    SubmitClicked,
    /// Job Service answered the download request.
    JobSubmitted(Result<crate::JobId, String>),
    /// One event from the progress stream of `job_id`.
    ProgressReceived {
        job_id: crate::JobId,
        update: crate::ProgressUpdate,
    },
    /// The progress stream dropped without a semantic payload.
    StreamLost { job_id: crate::JobId },
    /// User clicked Cancel Download.
    CancelClicked,
    AlertDismissed,
    ErrorDismissed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
