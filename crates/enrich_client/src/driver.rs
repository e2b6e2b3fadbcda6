use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use enrich_core::{update, Effect, JobId, JobTracker, Msg, ProgressEvent};
use enrich_logging::{enrich_debug, enrich_info, enrich_warn};

use crate::poll::poll_status;
use crate::{EnrichmentApi, PushConnector};

/// Receives every event the tracker emits, in order. Terminal events arrive once.
pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

/// Executes tracker effects for one job at a time.
///
/// All state transitions happen on the task calling [`TrackerDriver::track`];
/// the push channel and the poller run as spawned tasks that only send
/// messages back, and at most one of them is alive.
pub struct TrackerDriver {
    api: Arc<dyn EnrichmentApi>,
    connector: Arc<dyn PushConnector>,
    poll_interval: Duration,
}

impl TrackerDriver {
    pub fn new(
        api: Arc<dyn EnrichmentApi>,
        connector: Arc<dyn PushConnector>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            api,
            connector,
            poll_interval,
        }
    }

    /// Track `job_id` until it completes, fails, or `cancel` fires, and
    /// return the terminal event.
    pub async fn track(
        &self,
        job_id: JobId,
        observers: &[Arc<dyn ProgressObserver>],
        cancel: CancellationToken,
    ) -> ProgressEvent {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut transport = ActiveTransport::default();
        let mut tracker = JobTracker::new();
        let mut pending = Some(Msg::Start { job_id });
        let mut cancel_seen = false;

        loop {
            let next_msg = match pending.take() {
                Some(msg) => Some(msg),
                None => tokio::select! {
                    _ = cancel.cancelled(), if !cancel_seen => {
                        cancel_seen = true;
                        Some(Msg::CancelRequested)
                    }
                    received = rx.recv() => received,
                },
            };
            // `tx` lives until this function returns, so the inbox cannot close first.
            let Some(msg) = next_msg else {
                enrich_warn!("Tracker inbox closed job_id={:?}", tracker.job_id());
                transport.shutdown();
                return ProgressEvent::failed(Some("progress channel closed".to_string()));
            };

            let (next, effects) = update(tracker, msg);
            tracker = next;
            for effect in effects {
                self.run_effect(effect, &mut transport, &tx, observers);
            }

            if let Some(outcome) = tracker.outcome() {
                transport.shutdown();
                enrich_debug!("Tracker finished view={:?}", tracker.view());
                return outcome.clone();
            }
        }
    }

    fn run_effect(
        &self,
        effect: Effect,
        transport: &mut ActiveTransport,
        tx: &UnboundedSender<Msg>,
        observers: &[Arc<dyn ProgressObserver>],
    ) {
        match effect {
            Effect::OpenStream { job_id } => {
                enrich_info!("OpenStream job_id={}", job_id);
                transport.close_stream();
                let connector = Arc::clone(&self.connector);
                let tx = tx.clone();
                transport.stream = Some(tokio::spawn(async move {
                    connector.run(&job_id, tx).await;
                }));
            }
            Effect::CloseStream => {
                enrich_debug!("CloseStream");
                transport.close_stream();
            }
            Effect::StartPolling { job_id } => {
                enrich_warn!(
                    "Falling back to polling job_id={} interval={:?}",
                    job_id,
                    self.poll_interval
                );
                transport.close_stream();
                transport.stop_polling();
                let api = Arc::clone(&self.api);
                transport.poller = Some(tokio::spawn(poll_status(
                    api,
                    job_id,
                    self.poll_interval,
                    tx.clone(),
                )));
            }
            Effect::StopPolling => {
                enrich_debug!("StopPolling");
                transport.stop_polling();
            }
            Effect::Notify(event) => {
                for observer in observers {
                    observer.on_event(&event);
                }
            }
        }
    }
}

/// Live transport tasks; dropped tasks are aborted.
#[derive(Default)]
struct ActiveTransport {
    stream: Option<JoinHandle<()>>,
    poller: Option<JoinHandle<()>>,
}

impl ActiveTransport {
    fn close_stream(&mut self) {
        if let Some(handle) = self.stream.take() {
            handle.abort();
        }
    }

    fn stop_polling(&mut self) {
        if let Some(handle) = self.poller.take() {
            handle.abort();
        }
    }

    fn shutdown(&mut self) {
        self.close_stream();
        self.stop_polling();
    }
}

impl Drop for ActiveTransport {
    fn drop(&mut self) {
        self.shutdown();
    }
}
