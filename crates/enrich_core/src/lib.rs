//! Enrichment core: column mapping resolver and pure job-tracker state machine.
mod catalog;
mod effect;
mod event;
mod mapping;
mod msg;
mod session;
mod state;
mod update;
mod view_model;
mod wire;

pub type JobId = String;

pub use catalog::{ColumnCatalogEntry, TargetField, CATALOG};
pub use effect::Effect;
pub use event::{download_ref_for, ProgressEvent, CANCELLED_MESSAGE, UNKNOWN_FAILURE};
pub use mapping::{
    apply_overrides, build_submission, resolve, ColumnMapping, MappingCandidate, Submission,
    SubmissionError,
};
pub use msg::Msg;
pub use session::{Job, JobState, SessionContext};
pub use state::{FailureCause, JobTracker, TrackerState};
pub use update::update;
pub use view_model::TrackerView;
pub use wire::{EnrichRequest, JobStatus, JobSummary, StatusReport, StreamFrame, UploadResponse};
