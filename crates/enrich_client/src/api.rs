use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use enrich_core::{EnrichRequest, JobSummary, StatusReport, UploadResponse};

use crate::{ClientError, ClientSettings, FailureKind};

/// Body of a download, chunk by chunk as it arrives.
pub type ByteStream = BoxStream<'static, Result<Bytes, ClientError>>;

/// Request/response surface of the enrichment server.
#[async_trait::async_trait]
pub trait EnrichmentApi: Send + Sync {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>)
        -> Result<UploadResponse, ClientError>;

    async fn start_enrichment(&self, request: &EnrichRequest) -> Result<(), ClientError>;

    async fn status(&self, job_id: &str) -> Result<StatusReport, ClientError>;

    /// Fails up front on a non-success status; transport errors while the
    /// body streams surface as stream items.
    async fn download(&self, job_id: &str) -> Result<ByteStream, ClientError>;

    async fn list_jobs(&self) -> Result<Vec<JobSummary>, ClientError>;

    async fn delete_job(&self, job_id: &str) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::transport(err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}

#[async_trait::async_trait]
impl EnrichmentApi for ReqwestApi {
    async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ClientError> {
        let url = self.settings.api_url("/api/upload")?;
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let response = send(self.client.post(url).multipart(form)).await?;
        decode(response).await
    }

    async fn start_enrichment(&self, request: &EnrichRequest) -> Result<(), ClientError> {
        let url = self.settings.api_url("/api/enrich")?;
        send(self.client.post(url).json(request)).await?;
        Ok(())
    }

    async fn status(&self, job_id: &str) -> Result<StatusReport, ClientError> {
        let url = self.settings.api_url(&format!("/api/status/{job_id}"))?;
        let response = send(self.client.get(url)).await?;
        decode(response).await
    }

    async fn download(&self, job_id: &str) -> Result<ByteStream, ClientError> {
        let url = self.settings.api_url(&format!("/api/download/{job_id}"))?;
        let response = send(self.client.get(url)).await?;
        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_reqwest_error))
            .boxed())
    }

    async fn list_jobs(&self) -> Result<Vec<JobSummary>, ClientError> {
        let url = self.settings.api_url("/api/jobs")?;
        let response = send(self.client.get(url)).await?;
        decode(response).await
    }

    async fn delete_job(&self, job_id: &str) -> Result<(), ClientError> {
        let url = self.settings.api_url(&format!("/api/jobs/{job_id}"))?;
        send(self.client.delete(url)).await?;
        Ok(())
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
    let response = request.send().await.map_err(map_reqwest_error)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_detail(&body).unwrap_or_else(|| status.to_string());
    Err(ClientError::new(
        FailureKind::Server {
            status: Some(status.as_u16()),
        },
        message,
    ))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::protocol(err.to_string()))
}

/// `detail` from an error body; validation errors carry a list instead of a string.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::transport(format!("request timed out: {err}"));
    }
    if err.is_decode() {
        return ClientError::protocol(err.to_string());
    }
    ClientError::transport(err.to_string())
}
