use crate::{FailureCause, JobId, TrackerState};

/// Latest known snapshot of a tracked job, for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackerView {
    pub state: TrackerState,
    pub job_id: Option<JobId>,
    pub processed: u64,
    pub total: u64,
    pub percent: u8,
    pub message: Option<String>,
    pub download_ref: Option<String>,
    pub error_message: Option<String>,
    pub failure_cause: Option<FailureCause>,
    /// Set once the tracker switched from the push channel to polling.
    pub fallback_reason: Option<String>,
}
