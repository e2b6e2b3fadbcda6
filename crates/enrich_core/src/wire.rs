//! JSON payloads exchanged with the enrichment server.
use serde::{Deserialize, Deserializer, Serialize};

use crate::{ColumnMapping, JobId};

/// Body of a successful `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub job_id: JobId,
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: Vec<String>,
    #[serde(default)]
    pub detected_company_col: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub detected_context_cols: Vec<String>,
    #[serde(default)]
    pub row_count: u64,
}

/// Body of `POST /api/enrich`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichRequest {
    pub job_id: JobId,
    pub column_mappings: Vec<ColumnMapping>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Uploaded,
    Processing,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Body of `GET /api/status/{job_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: JobStatus,
    #[serde(default)]
    pub progress: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub percentage: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Frame received on the job's push channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamFrame {
    Progress {
        #[serde(default)]
        progress: u64,
        #[serde(default)]
        total: u64,
        #[serde(default)]
        percentage: Option<i64>,
        #[serde(default)]
        message: Option<String>,
    },
    Completed {
        #[serde(default)]
        download_url: Option<String>,
    },
    Error {
        #[serde(default)]
        error: Option<String>,
    },
    /// Keep-alive replies and any frame type this client does not know.
    #[serde(other)]
    Unknown,
}

/// Entry of `GET /api/jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: JobId,
    pub filename: String,
    pub status: JobStatus,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
