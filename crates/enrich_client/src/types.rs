use std::fmt;

use enrich_core::{FailureCause, SubmissionError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Validation, message)
    }

    pub(crate) fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, message)
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Protocol, message)
    }

    /// How the tracker should classify this error if it ends a job.
    pub fn failure_cause(&self) -> FailureCause {
        match self.kind {
            FailureKind::Transport => FailureCause::Transport,
            FailureKind::Protocol => FailureCause::Protocol,
            FailureKind::Validation | FailureKind::Server { .. } => FailureCause::Server,
        }
    }
}

impl From<SubmissionError> for ClientError {
    fn from(err: SubmissionError) -> Self {
        Self::validation(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Rejected locally before anything was sent.
    Validation,
    /// Network-level failure: connect, timeout, reset.
    Transport,
    /// Non-success HTTP status, or a job the server reported as failed.
    Server { status: Option<u16> },
    /// Response body did not match the expected shape.
    Protocol,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Validation => write!(f, "validation error"),
            FailureKind::Transport => write!(f, "transport error"),
            FailureKind::Server { status: Some(code) } => write!(f, "server error (http {code})"),
            FailureKind::Server { status: None } => write!(f, "server error"),
            FailureKind::Protocol => write!(f, "protocol error"),
        }
    }
}
