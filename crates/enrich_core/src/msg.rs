use crate::{FailureCause, JobId, StatusReport, StreamFrame};

/// Inbound events for the job tracker, whatever transport produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Job was accepted by the server; begin tracking it.
    Start { job_id: JobId },
    /// Decoded frame from the push channel.
    StreamFrame(StreamFrame),
    /// Push channel delivered a frame that is not valid JSON for this protocol.
    StreamMalformed { detail: String },
    /// Push channel failed to open, errored, or closed before a terminal frame.
    StreamTransportError { detail: String },
    /// Status endpoint answered a poll.
    PollSucceeded(StatusReport),
    /// Status poll could not be completed.
    PollFailed { cause: FailureCause, detail: String },
    /// User asked to stop tracking.
    CancelRequested,
}
