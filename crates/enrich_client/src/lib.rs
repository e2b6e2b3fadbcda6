//! Enrichment client: HTTP and push-channel IO, and effect execution for the tracker.
mod api;
mod download;
mod driver;
mod filename;
mod orchestrator;
mod poll;
mod settings;
mod stream;
mod types;
mod upload;

pub use api::{ByteStream, EnrichmentApi, ReqwestApi};
pub use download::{save_result, DownloadError, SavedResult};
pub use driver::{ProgressObserver, TrackerDriver};
pub use filename::result_filename;
pub use orchestrator::JobOrchestrator;
pub use settings::{ClientSettings, MAX_POLL_INTERVAL, MAX_UPLOAD_BYTES};
pub use stream::{decode_frame, PushConnector, WsConnector};
pub use types::{ClientError, FailureKind};
pub use upload::UploadCoordinator;
