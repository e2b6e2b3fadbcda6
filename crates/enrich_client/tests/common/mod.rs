#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use enrich_client::{ClientSettings, ProgressObserver, PushConnector};
use enrich_core::{Msg, ProgressEvent};
use tokio::sync::mpsc::UnboundedSender;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(enrich_logging::initialize_for_tests);
}

pub fn fast_settings(base_url: impl Into<String>) -> ClientSettings {
    ClientSettings {
        poll_interval: Duration::from_millis(20),
        connect_timeout: Duration::from_secs(2),
        request_timeout: Duration::from_secs(5),
        ..ClientSettings::with_base_url(base_url)
    }
}

#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<ProgressEvent>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressObserver for Recorder {
    fn on_event(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Push connector that replays a fixed list of messages, then optionally
/// stays open until aborted.
pub struct ScriptedConnector {
    script: Vec<Msg>,
    hold_open: bool,
    dropped: Arc<AtomicBool>,
}

impl ScriptedConnector {
    pub fn new(script: Vec<Msg>) -> Self {
        Self {
            script,
            hold_open: false,
            dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn held_open(script: Vec<Msg>) -> Self {
        Self {
            hold_open: true,
            ..Self::new(script)
        }
    }

    /// Becomes true once a running channel task has been torn down.
    pub fn dropped_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.dropped)
    }
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl PushConnector for ScriptedConnector {
    async fn run(&self, _job_id: &str, tx: UnboundedSender<Msg>) {
        let _guard = DropFlag(Arc::clone(&self.dropped));
        for msg in self.script.clone() {
            if tx.send(msg).is_err() {
                return;
            }
        }
        if self.hold_open {
            std::future::pending::<()>().await;
        }
    }
}
