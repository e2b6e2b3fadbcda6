use crate::view_model::TrackerView;
use crate::{JobId, ProgressEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerState {
    #[default]
    Idle,
    StreamConnecting,
    Streaming,
    PollingFallback,
    Completed,
    Failed,
}

impl TrackerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TrackerState::Completed | TrackerState::Failed)
    }

    /// True while the push channel is the active transport.
    pub fn is_streaming(self) -> bool {
        matches!(self, TrackerState::StreamConnecting | TrackerState::Streaming)
    }
}

/// Why a tracker ended in [`TrackerState::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    Server,
    Transport,
    Protocol,
    Cancelled,
}

/// Tracks a single enrichment job from submission to its terminal event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobTracker {
    state: TrackerState,
    job_id: Option<JobId>,
    latest: Option<ProgressEvent>,
    outcome: Option<ProgressEvent>,
    failure_cause: Option<FailureCause>,
    fallback_reason: Option<String>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    /// The terminal event, once one was produced.
    pub fn outcome(&self) -> Option<&ProgressEvent> {
        self.outcome.as_ref()
    }

    pub fn view(&self) -> TrackerView {
        let mut view = TrackerView {
            state: self.state,
            job_id: self.job_id.clone(),
            failure_cause: self.failure_cause,
            fallback_reason: self.fallback_reason.clone(),
            ..TrackerView::default()
        };
        if let Some(ProgressEvent::Progress {
            processed,
            total,
            percent,
            message,
        }) = &self.latest
        {
            view.processed = *processed;
            view.total = *total;
            view.percent = *percent;
            view.message = message.clone();
        }
        match &self.outcome {
            Some(ProgressEvent::Completed { download_ref }) => {
                view.percent = 100;
                view.download_ref = Some(download_ref.clone());
            }
            Some(ProgressEvent::Failed { error_message }) => {
                view.error_message = Some(error_message.clone());
            }
            _ => {}
        }
        view
    }

    pub(crate) fn begin(&mut self, job_id: JobId) {
        self.job_id = Some(job_id);
        self.state = TrackerState::StreamConnecting;
    }

    pub(crate) fn record_progress(&mut self, event: ProgressEvent, state: TrackerState) {
        self.latest = Some(event);
        self.state = state;
    }

    pub(crate) fn fall_back(&mut self, reason: String) {
        self.fallback_reason = Some(reason);
        self.state = TrackerState::PollingFallback;
    }

    pub(crate) fn complete(&mut self, download_ref: String) -> ProgressEvent {
        let event = ProgressEvent::Completed { download_ref };
        self.state = TrackerState::Completed;
        self.outcome = Some(event.clone());
        event
    }

    pub(crate) fn fail(&mut self, cause: FailureCause, error: Option<String>) -> ProgressEvent {
        let event = ProgressEvent::failed(error);
        self.state = TrackerState::Failed;
        self.failure_cause = Some(cause);
        self.outcome = Some(event.clone());
        event
    }
}
