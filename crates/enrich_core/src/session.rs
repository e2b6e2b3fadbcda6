use crate::mapping::{build_submission, resolve};
use crate::{
    ColumnMapping, JobId, MappingCandidate, ProgressEvent, Submission, SubmissionError,
    UploadResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Uploaded,
    Submitted,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub source_filename: String,
    pub row_count: u64,
    pub state: JobState,
}

/// Everything the client knows about the job in hand. Replaced wholesale
/// when a new file is uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionContext {
    job: Option<Job>,
    columns: Vec<String>,
    detected_company_column: Option<String>,
    detected_context_columns: Vec<String>,
    candidates: Vec<MappingCandidate>,
    submitted: Vec<ColumnMapping>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a freshly uploaded file and resolve its default mapping.
    pub fn begin_job(&mut self, upload: UploadResponse) -> &[MappingCandidate] {
        let candidates = resolve(
            &upload.columns,
            upload.detected_company_col.as_deref(),
            &upload.detected_context_cols,
        );
        *self = Self {
            job: Some(Job {
                id: upload.job_id,
                source_filename: upload.filename,
                row_count: upload.row_count,
                state: JobState::Uploaded,
            }),
            columns: upload.columns,
            detected_company_column: upload.detected_company_col,
            detected_context_columns: upload.detected_context_cols,
            candidates,
            submitted: Vec::new(),
        };
        &self.candidates
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn detected_company_column(&self) -> Option<&str> {
        self.detected_company_column.as_deref()
    }

    pub fn detected_context_columns(&self) -> &[String] {
        &self.detected_context_columns
    }

    pub fn candidates(&self) -> &[MappingCandidate] {
        &self.candidates
    }

    pub fn submitted_mappings(&self) -> &[ColumnMapping] {
        &self.submitted
    }

    /// Validate choices against the current job without changing state.
    pub fn prepare_submission(
        &self,
        choices: &[ColumnMapping],
    ) -> Result<Submission, SubmissionError> {
        let job = self.job.as_ref().ok_or(SubmissionError::NoActiveJob)?;
        if job.state != JobState::Uploaded {
            return Err(SubmissionError::AlreadySubmitted(job.id.clone()));
        }
        build_submission(&job.id, choices)
    }

    pub fn mark_submitted(&mut self, mappings: Vec<ColumnMapping>) {
        if let Some(job) = self.job.as_mut() {
            job.state = JobState::Submitted;
            self.submitted = mappings;
        }
    }

    /// Record the tracker's terminal event on the job. Progress events are ignored.
    pub fn apply_outcome(&mut self, event: &ProgressEvent) {
        let Some(job) = self.job.as_mut() else {
            return;
        };
        match event {
            ProgressEvent::Completed { .. } => job.state = JobState::Completed,
            ProgressEvent::Failed { .. } => job.state = JobState::Failed,
            ProgressEvent::Progress { .. } => {}
        }
    }

    /// Forget the current job, e.g. when the user starts over.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
