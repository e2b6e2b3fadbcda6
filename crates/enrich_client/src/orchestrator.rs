use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use enrich_core::{
    ColumnMapping, JobState, JobSummary, MappingCandidate, ProgressEvent, SessionContext,
    StatusReport, Submission,
};
use enrich_logging::{enrich_info, enrich_warn};

use crate::filename::result_filename;
use crate::{
    save_result, ClientError, ClientSettings, DownloadError, EnrichmentApi, ProgressObserver,
    PushConnector, ReqwestApi, SavedResult, TrackerDriver, UploadCoordinator, WsConnector,
};

/// Upload → mapping → submission → tracking, for one job at a time.
pub struct JobOrchestrator {
    settings: ClientSettings,
    api: Arc<dyn EnrichmentApi>,
    connector: Arc<dyn PushConnector>,
    uploader: UploadCoordinator,
    session: SessionContext,
}

impl JobOrchestrator {
    /// Orchestrator talking HTTP via reqwest and the push channel via websockets.
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let api = Arc::new(ReqwestApi::new(settings.clone())?);
        let connector = Arc::new(WsConnector::new(settings.clone()));
        Ok(Self::with_transports(settings, api, connector))
    }

    pub fn with_transports(
        settings: ClientSettings,
        api: Arc<dyn EnrichmentApi>,
        connector: Arc<dyn PushConnector>,
    ) -> Self {
        let uploader = UploadCoordinator::new(Arc::clone(&api), &settings);
        Self {
            settings,
            api,
            connector,
            uploader,
            session: SessionContext::new(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn candidates(&self) -> &[MappingCandidate] {
        self.session.candidates()
    }

    /// Upload a file and return the resolver's default mapping for its columns.
    /// Replaces any previous job.
    pub async fn upload(&mut self, path: &Path) -> Result<&[MappingCandidate], ClientError> {
        let response = self.uploader.upload(path).await?;
        Ok(self.session.begin_job(response))
    }

    /// Validate the user's choices and ask the server to start enrichment.
    pub async fn submit(&mut self, choices: &[ColumnMapping]) -> Result<Submission, ClientError> {
        let submission = self.session.prepare_submission(choices)?;
        for dropped in &submission.dropped_duplicates {
            enrich_warn!(
                "Dropping duplicate mapping source={} target={}",
                dropped.source_column,
                dropped.target_column
            );
        }

        self.api.start_enrichment(&submission.request).await?;
        enrich_info!(
            "Enrichment started job_id={} mappings={}",
            submission.request.job_id,
            submission.request.column_mappings.len()
        );
        self.session
            .mark_submitted(submission.request.column_mappings.clone());
        Ok(submission)
    }

    /// Follow the submitted job to its terminal event.
    pub async fn track(
        &mut self,
        observers: &[Arc<dyn ProgressObserver>],
        cancel: CancellationToken,
    ) -> Result<ProgressEvent, ClientError> {
        let job_id = match self.session.job() {
            Some(job) if job.state == JobState::Submitted => job.id.clone(),
            Some(job) => {
                return Err(ClientError::validation(format!(
                    "job {} is not running (state {:?})",
                    job.id, job.state
                )))
            }
            None => return Err(ClientError::validation("no job to track")),
        };

        let driver = TrackerDriver::new(
            Arc::clone(&self.api),
            Arc::clone(&self.connector),
            self.settings.poll_interval,
        );
        let outcome = driver.track(job_id, observers, cancel).await;
        self.session.apply_outcome(&outcome);
        Ok(outcome)
    }

    /// Save the current job's result into `output_dir`.
    pub async fn download_result(&self, output_dir: &Path) -> Result<SavedResult, DownloadError> {
        let job = self
            .session
            .job()
            .filter(|job| job.state == JobState::Completed)
            .ok_or(DownloadError::NotCompleted)?;
        self.download_job(&job.id, &job.source_filename, output_dir)
            .await
    }

    /// Save any finished job's result into `output_dir`.
    pub async fn download_job(
        &self,
        job_id: &str,
        source_filename: &str,
        output_dir: &Path,
    ) -> Result<SavedResult, DownloadError> {
        let body = self.api.download(job_id).await?;
        let filename = result_filename(source_filename, job_id);
        let saved = save_result(body, output_dir, &filename).await?;
        enrich_info!(
            "Downloaded job_id={} bytes={} path={:?}",
            job_id,
            saved.bytes,
            saved.path
        );
        Ok(saved)
    }

    pub async fn status(&self, job_id: &str) -> Result<StatusReport, ClientError> {
        self.api.status(job_id).await
    }

    pub async fn list_jobs(&self) -> Result<Vec<JobSummary>, ClientError> {
        self.api.list_jobs().await
    }

    /// Delete a job on the server; forgets it locally if it is the current one.
    pub async fn delete_job(&mut self, job_id: &str) -> Result<(), ClientError> {
        self.api.delete_job(job_id).await?;
        enrich_info!("Deleted job_id={}", job_id);
        if self.session.job().is_some_and(|job| job.id == job_id) {
            self.session.reset();
        }
        Ok(())
    }

    /// Drop the current job so the next upload starts fresh.
    pub fn new_job(&mut self) {
        self.session.reset();
    }
}
