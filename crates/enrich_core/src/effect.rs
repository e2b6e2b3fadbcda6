use crate::{JobId, ProgressEvent};

/// Side effects requested by [`crate::update`], executed in order by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenStream { job_id: JobId },
    CloseStream,
    StartPolling { job_id: JobId },
    StopPolling,
    Notify(ProgressEvent),
}
