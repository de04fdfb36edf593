use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::error::ConnectionError;
use crate::live::connection::{Outbound, ReplayConnector, ReplayLink};

/// Upper bound on the TCP connect plus WebSocket handshake
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connects to the replay server's WebSocket endpoint
pub struct WebSocketConnector {
    url: String,
    connect_timeout: Duration,
}

impl WebSocketConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ReplayConnector for WebSocketConnector {
    async fn connect(&self) -> Result<ReplayLink, ConnectionError> {
        let (socket, _response) = timeout(self.connect_timeout, connect_async(self.url.as_str()))
            .await
            .map_err(|_| ConnectionError::Timeout {
                url: self.url.clone(),
                after: self.connect_timeout,
            })?
            .map_err(|source| ConnectionError::Connect {
                url: self.url.clone(),
                source: Box::new(source),
            })?;
        info!("connected to replay stream at {}", self.url);

        let (mut write, mut read) = socket.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Outbound>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                match frame {
                    Outbound::Control(message) => {
                        let payload = match serde_json::to_string(&message) {
                            Ok(payload) => payload,
                            Err(err) => {
                                warn!(?err, "failed to encode replay control message");
                                continue;
                            }
                        };
                        debug!("WS: sending {}", payload);
                        if let Err(err) = write.send(Message::Text(payload)).await {
                            warn!(?err, "failed to send replay control message");
                            break;
                        }
                    }
                    Outbound::Close => break,
                }
            }
            if let Err(err) = write.close().await {
                debug!(?err, "WS: close on finished socket");
            }
        });

        let reader = tokio::spawn(async move {
            while let Some(next) = read.next().await {
                match next {
                    Ok(Message::Text(text)) => {
                        if inbound_tx.send(text).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(frame)) => {
                        info!(?frame, "replay server closed the stream");
                        break;
                    }
                    Ok(_) => continue,
                    Err(err) => {
                        warn!(?err, "replay stream read error");
                        break;
                    }
                }
            }
        });

        Ok(ReplayLink::new(outbound_tx, inbound_rx).with_reader(reader.abort_handle()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_failure_is_reported() {
        // Port 9 (discard) is not expected to host a WebSocket server.
        let connector = WebSocketConnector::new("ws://127.0.0.1:9/ws/replay");
        let result = connector.connect().await;
        assert!(matches!(result, Err(ConnectionError::Connect { .. })));
    }

    #[tokio::test]
    async fn test_unanswered_handshake_times_out() {
        // Accepts TCP but never answers the upgrade request.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connector = WebSocketConnector::new(format!("ws://{}/ws/replay", addr))
            .with_connect_timeout(Duration::from_millis(200));

        let result = connector.connect().await;
        assert!(matches!(result, Err(ConnectionError::Timeout { .. })));
        drop(listener);
    }

    #[test]
    fn test_url_is_kept() {
        let connector = WebSocketConnector::new("ws://localhost:8083/ws/replay");
        assert_eq!(connector.url(), "ws://localhost:8083/ws/replay");
    }
}
