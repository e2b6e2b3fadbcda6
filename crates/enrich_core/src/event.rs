pub const UNKNOWN_FAILURE: &str = "an unknown error occurred";
pub const CANCELLED_MESSAGE: &str = "cancelled";

/// Transport-agnostic progress notification. Each `Progress` is a full
/// snapshot, so consumers overwrite rather than accumulate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Progress {
        processed: u64,
        total: u64,
        percent: u8,
        message: Option<String>,
    },
    Completed {
        download_ref: String,
    },
    Failed {
        error_message: String,
    },
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProgressEvent::Progress { .. })
    }

    /// Build a progress snapshot, deriving the percentage when the payload
    /// omits it and clamping it to 0..=100 otherwise.
    pub fn progress(
        processed: u64,
        total: u64,
        percentage: Option<i64>,
        message: Option<String>,
    ) -> Self {
        let percent = match percentage {
            Some(value) => value.clamp(0, 100) as u8,
            None => (processed.saturating_mul(100) / total.max(1)).min(100) as u8,
        };
        ProgressEvent::Progress {
            processed,
            total,
            percent,
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    pub fn failed(error: Option<String>) -> Self {
        ProgressEvent::Failed {
            error_message: error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_FAILURE.to_string()),
        }
    }
}

/// Server path of a finished job's artifact.
pub fn download_ref_for(job_id: &str) -> String {
    format!("/api/download/{job_id}")
}
