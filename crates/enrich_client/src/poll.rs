use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Instant, MissedTickBehavior};

use enrich_core::{JobId, JobStatus, Msg};
use enrich_logging::{enrich_debug, enrich_warn};

use crate::settings::MAX_POLL_INTERVAL;
use crate::EnrichmentApi;

/// Poll the status endpoint every `interval` (first request after one
/// interval) until the job ends or a request fails.
pub(crate) async fn poll_status(
    api: Arc<dyn EnrichmentApi>,
    job_id: JobId,
    interval: Duration,
    tx: UnboundedSender<Msg>,
) {
    let interval = interval.clamp(Duration::from_millis(1), MAX_POLL_INTERVAL);
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let (msg, last) = match api.status(&job_id).await {
            Ok(report) => {
                enrich_debug!(
                    "Poll job_id={} status={:?} progress={}/{}",
                    job_id,
                    report.status,
                    report.progress,
                    report.total
                );
                let last = matches!(report.status, JobStatus::Completed | JobStatus::Failed);
                (Msg::PollSucceeded(report), last)
            }
            Err(err) => {
                enrich_warn!("Poll failed job_id={} err={}", job_id, err);
                (
                    Msg::PollFailed {
                        cause: err.failure_cause(),
                        detail: err.message,
                    },
                    true,
                )
            }
        };
        if tx.send(msg).is_err() || last {
            return;
        }
    }
}
