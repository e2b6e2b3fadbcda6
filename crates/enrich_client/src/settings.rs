use std::time::Duration;

use url::Url;

use crate::ClientError;

/// Upload limit enforced by the server (50 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 52_428_800;

/// Longest accepted poll interval.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    /// Push channel silent for this long is given up in favour of polling.
    pub stream_idle_timeout: Duration,
    pub max_upload_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(2),
            stream_idle_timeout: Duration::from_secs(30),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            allowed_extensions: vec!["csv".to_string(), "xlsx".to_string(), "xls".to_string()],
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// URL for an API path such as `/api/status/{id}`, resolved under the
    /// base URL's path so deployments behind a prefix keep it.
    pub fn api_url(&self, path: &str) -> Result<Url, ClientError> {
        let mut base = Url::parse(&self.base_url)
            .map_err(|err| ClientError::validation(format!("invalid base url: {err}")))?;
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::validation(format!("invalid api path {path}: {err}")))
    }

    /// Job-scoped push channel address, `ws://` or `wss://` following the base URL.
    pub fn stream_url(&self, job_id: &str) -> Result<Url, ClientError> {
        let mut url = self.api_url(&format!("/ws/{job_id}"))?;
        let scheme = match url.scheme() {
            "https" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|_| ClientError::validation("cannot derive push channel url"))?;
        Ok(url)
    }
}

