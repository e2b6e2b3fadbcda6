use futures_util::StreamExt;
use tokio::sync::mpsc::UnboundedSender;
use tokio_tungstenite::tungstenite::Message;

use enrich_core::{Msg, StreamFrame};
use enrich_logging::{enrich_debug, enrich_info, enrich_warn};

use crate::ClientSettings;

/// Opens the job's push channel and forwards what it receives as tracker messages.
#[async_trait::async_trait]
pub trait PushConnector: Send + Sync {
    /// Runs until the channel ends. Unless aborted first, the last message
    /// sent is a `StreamTransportError`.
    async fn run(&self, job_id: &str, tx: UnboundedSender<Msg>);
}

#[derive(Debug, Clone)]
pub struct WsConnector {
    settings: ClientSettings,
}

impl WsConnector {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl PushConnector for WsConnector {
    async fn run(&self, job_id: &str, tx: UnboundedSender<Msg>) {
        let url = match self.settings.stream_url(job_id) {
            Ok(url) => url,
            Err(err) => {
                let _ = tx.send(transport_error(err.message));
                return;
            }
        };

        let connect = tokio_tungstenite::connect_async(url.as_str());
        let mut socket = match tokio::time::timeout(self.settings.connect_timeout, connect).await {
            Ok(Ok((socket, _response))) => socket,
            Ok(Err(err)) => {
                enrich_warn!("Push channel failed to open job_id={} err={}", job_id, err);
                let _ = tx.send(transport_error(err.to_string()));
                return;
            }
            Err(_) => {
                enrich_warn!("Push channel connect timed out job_id={}", job_id);
                let _ = tx.send(transport_error("push channel connect timed out"));
                return;
            }
        };
        enrich_info!("Push channel open job_id={} url={}", job_id, url);

        let idle = self.settings.stream_idle_timeout;
        loop {
            let received = match tokio::time::timeout(idle, socket.next()).await {
                Ok(Some(received)) => received,
                Ok(None) => break,
                Err(_) => {
                    enrich_warn!("Push channel idle job_id={} for={:?}", job_id, idle);
                    let _ = tx.send(transport_error(format!("push channel idle for {idle:?}")));
                    return;
                }
            };
            let msg = match received {
                Ok(Message::Text(text)) => decode_frame(&text),
                Ok(Message::Binary(bytes)) => match std::str::from_utf8(&bytes) {
                    Ok(text) => decode_frame(text),
                    Err(err) => Msg::StreamMalformed {
                        detail: err.to_string(),
                    },
                },
                Ok(Message::Close(frame)) => {
                    enrich_debug!("Push channel closed by server job_id={} frame={:?}", job_id, frame);
                    break;
                }
                Ok(_) => continue,
                Err(err) => {
                    enrich_warn!("Push channel error job_id={} err={}", job_id, err);
                    let _ = tx.send(transport_error(err.to_string()));
                    return;
                }
            };
            if tx.send(msg).is_err() {
                return;
            }
        }

        let _ = tx.send(transport_error("push channel closed"));
    }
}

/// Decode one text frame of the push protocol.
pub fn decode_frame(text: &str) -> Msg {
    match serde_json::from_str::<StreamFrame>(text) {
        Ok(frame) => Msg::StreamFrame(frame),
        Err(err) => Msg::StreamMalformed {
            detail: err.to_string(),
        },
    }
}

fn transport_error(detail: impl Into<String>) -> Msg {
    Msg::StreamTransportError {
        detail: detail.into(),
    }
}
