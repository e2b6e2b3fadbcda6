use std::path::Path;
use std::sync::Arc;

use enrich_core::UploadResponse;
use enrich_logging::enrich_info;

use crate::{ClientError, ClientSettings, EnrichmentApi};

/// Checks a local file against the server's upload rules and sends it.
pub struct UploadCoordinator {
    api: Arc<dyn EnrichmentApi>,
    max_upload_bytes: u64,
    allowed_extensions: Vec<String>,
}

impl UploadCoordinator {
    pub fn new(api: Arc<dyn EnrichmentApi>, settings: &ClientSettings) -> Self {
        Self {
            api,
            max_upload_bytes: settings.max_upload_bytes,
            allowed_extensions: settings.allowed_extensions.clone(),
        }
    }

    /// Validate extension and size without reading the file. Returns the
    /// file name to upload under.
    pub async fn validate(&self, path: &Path) -> Result<String, ClientError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ClientError::validation("file name is missing or not UTF-8"))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        if !self
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
        {
            return Err(ClientError::validation(format!(
                "unsupported file type {file_name:?}, expected one of: {}",
                self.allowed_extensions.join(", ")
            )));
        }

        let size = tokio::fs::metadata(path)
            .await
            .map_err(|err| ClientError::validation(format!("cannot read {file_name:?}: {err}")))?
            .len();
        if size > self.max_upload_bytes {
            return Err(ClientError::validation(format!(
                "file too large ({size} bytes, max {})",
                self.max_upload_bytes
            )));
        }

        Ok(file_name.to_string())
    }

    pub async fn upload(&self, path: &Path) -> Result<UploadResponse, ClientError> {
        let file_name = self.validate(path).await?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ClientError::validation(format!("cannot read {file_name:?}: {err}")))?;
        enrich_info!("Upload file={} bytes={}", file_name, bytes.len());

        let response = self.api.upload(&file_name, bytes).await?;
        enrich_info!(
            "Uploaded job_id={} rows={} columns={}",
            response.job_id,
            response.row_count,
            response.columns.len()
        );
        Ok(response)
    }
}
