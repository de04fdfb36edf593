//! Transport-neutral handle for the replay connection.
//!
//! A [`ReplayLink`] is a pair of channels: control directives go out, text
//! frames come in. Transports (WebSocket, mocks) own the actual socket on
//! their side of the channels, so tearing a link down never touches a socket
//! that has already gone away.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::debug;

use crate::error::ConnectionError;
use crate::live::message::ControlMessage;

/// Frames queued for the transport's writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Control(ControlMessage),
    Close,
}

/// An open duplex link to the replay server
#[derive(Debug)]
pub struct ReplayLink {
    outbound: mpsc::UnboundedSender<Outbound>,
    inbound: mpsc::UnboundedReceiver<String>,
    reader: Option<AbortHandle>,
}

impl ReplayLink {
    pub fn new(
        outbound: mpsc::UnboundedSender<Outbound>,
        inbound: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        Self {
            outbound,
            inbound,
            reader: None,
        }
    }

    /// Attach the transport task that feeds `inbound`, aborted on close
    pub fn with_reader(mut self, reader: AbortHandle) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Queue a control directive
    pub fn send(&self, message: ControlMessage) -> Result<(), ConnectionError> {
        self.outbound
            .send(Outbound::Control(message))
            .map_err(|_| ConnectionError::Closed)
    }

    /// Next inbound text frame; `None` once the remote side has gone away
    pub async fn recv(&mut self) -> Option<String> {
        self.inbound.recv().await
    }

    /// Ask the transport to close the socket and release the link
    ///
    /// Safe to call on a link whose transport has already failed.
    pub fn close(self) {
        if self.outbound.send(Outbound::Close).is_err() {
            debug!("LINK: Transport already gone on close");
        }
        // Drop aborts the reader.
    }
}

impl Drop for ReplayLink {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

/// Opens replay links, implemented by the WebSocket connector and mocks
#[async_trait]
pub trait ReplayConnector: Send + Sync {
    async fn connect(&self) -> Result<ReplayLink, ConnectionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_and_close_reach_transport() {
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let (_in_tx, in_rx) = mpsc::unbounded_channel();
        let link = ReplayLink::new(out_tx, in_rx);

        link.send(ControlMessage::start(2)).unwrap();
        link.close();

        assert_eq!(out_rx.recv().await, Some(Outbound::Control(ControlMessage::start(2))));
        assert_eq!(out_rx.recv().await, Some(Outbound::Close));
        assert_eq!(out_rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_send_after_transport_gone_is_error_not_panic() {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (_in_tx, in_rx) = mpsc::unbounded_channel();
        let link = ReplayLink::new(out_tx, in_rx);
        drop(out_rx);

        assert!(matches!(
            link.send(ControlMessage::StopReplay),
            Err(ConnectionError::Closed)
        ));
        link.close();
    }

    #[tokio::test]
    async fn test_recv_none_when_remote_closes() {
        let (out_tx, _out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let mut link = ReplayLink::new(out_tx, in_rx);

        in_tx.send("hello".to_string()).unwrap();
        drop(in_tx);
        assert_eq!(link.recv().await.as_deref(), Some("hello"));
        assert_eq!(link.recv().await, None);
    }
}
