/// In-process replay server for development and testing
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::ConnectionError;
use crate::fixtures;
use crate::live::connection::{Outbound, ReplayConnector, ReplayLink};
use crate::live::message::ControlMessage;

/// Server-side ends of a manually driven link
pub struct MockLinkEnds {
    /// Everything the session sent
    pub outbound: mpsc::UnboundedReceiver<Outbound>,
    /// Frames pushed here arrive at the session; drop to close the link
    pub inbound: mpsc::UnboundedSender<String>,
}

/// Connector that never touches the network
///
/// In manual mode each connection's server ends are parked for a test to
/// pick up with [`MockConnector::take_link`]. In scripted mode a task plays
/// timed frames after the start directive arrives, compressed by the
/// requested speed.
pub struct MockConnector {
    script: Vec<(Duration, String)>,
    links: Mutex<Vec<MockLinkEnds>>,
    connects: AtomicUsize,
    refusing: AtomicBool,
    /// Simulated handshake time, in milliseconds
    connect_delay_ms: AtomicU64,
}

impl MockConnector {
    pub fn manual() -> Self {
        Self::scripted(Vec::new())
    }

    pub fn scripted(script: Vec<(Duration, String)>) -> Self {
        Self {
            script,
            links: Mutex::new(Vec::new()),
            connects: AtomicUsize::new(0),
            refusing: AtomicBool::new(false),
            connect_delay_ms: AtomicU64::new(0),
        }
    }

    /// Scripted connector replaying the fixture game
    pub fn new() -> Self {
        info!("Creating MockConnector for development mode");
        Self::scripted(fixtures::create_mock_replay())
    }

    pub fn set_refusing(&self, refusing: bool) {
        self.refusing.store(refusing, Ordering::SeqCst);
    }

    /// Make every later connect take this long before it resolves
    pub fn set_connect_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.connect_delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Connections opened so far
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Oldest parked link from manual mode
    pub fn take_link(&self) -> Option<MockLinkEnds> {
        let mut links = self.links.lock().ok()?;
        if links.is_empty() {
            None
        } else {
            Some(links.remove(0))
        }
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReplayConnector for MockConnector {
    async fn connect(&self) -> Result<ReplayLink, ConnectionError> {
        if self.refusing.load(Ordering::SeqCst) {
            return Err(ConnectionError::Refused(
                "mock connector refusing connections".to_string(),
            ));
        }
        self.connects.fetch_add(1, Ordering::SeqCst);

        let delay = self.connect_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let link = ReplayLink::new(outbound_tx, inbound_rx);

        if self.script.is_empty() {
            let ends = MockLinkEnds {
                outbound: outbound_rx,
                inbound: inbound_tx,
            };
            if let Ok(mut links) = self.links.lock() {
                links.push(ends);
            }
            return Ok(link);
        }

        let player = tokio::spawn(play_script(self.script.clone(), outbound_rx, inbound_tx));
        Ok(link.with_reader(player.abort_handle()))
    }
}

async fn play_script(
    script: Vec<(Duration, String)>,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    inbound: mpsc::UnboundedSender<String>,
) {
    let speed = loop {
        match outbound.recv().await {
            Some(Outbound::Control(ControlMessage::StartReplay { speed, .. })) => {
                break speed.max(1)
            }
            Some(other) => debug!("MockConnector: Ignoring {:?} before start", other),
            None => return,
        }
    };
    info!("MockConnector: Playing {} frames at {}x", script.len(), speed);

    let mut clock = Duration::ZERO;
    for (at, payload) in script {
        let delay = at.saturating_sub(clock) / speed;
        clock = clock.max(at);

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = stopped(&mut outbound) => {
                debug!("MockConnector: Stopped at {:?}", clock);
                return;
            }
        }

        if inbound.send(payload).is_err() || inbound.send(status("replaying", clock, speed)).is_err() {
            return;
        }
    }

    let _ = inbound.send(status("stopped", clock, speed));
    stopped(&mut outbound).await;
}

/// Resolves once the session asks to stop or goes away
async fn stopped(outbound: &mut mpsc::UnboundedReceiver<Outbound>) {
    while let Some(frame) = outbound.recv().await {
        if matches!(
            frame,
            Outbound::Close | Outbound::Control(ControlMessage::StopReplay)
        ) {
            return;
        }
    }
}

fn status(state: &str, clock: Duration, speed: u32) -> String {
    let secs = clock.as_secs();
    json!({
        "status": state,
        "currentReplayTime": format!("{:02}:{:02}", secs / 60, secs % 60),
        "speed": f64::from(speed),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::message::{parse_inbound, InboundMessage};

    #[tokio::test]
    async fn test_manual_link_is_parked() {
        let connector = MockConnector::manual();
        let link = connector.connect().await.unwrap();
        link.send(ControlMessage::start(2)).unwrap();

        let mut ends = connector.take_link().unwrap();
        assert_eq!(
            ends.outbound.recv().await,
            Some(Outbound::Control(ControlMessage::start(2)))
        );
        assert!(connector.take_link().is_none());
        assert_eq!(connector.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_refusing_connector() {
        let connector = MockConnector::manual();
        connector.set_refusing(true);
        assert!(matches!(
            connector.connect().await,
            Err(ConnectionError::Refused(_))
        ));
        assert_eq!(connector.connect_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_delay() {
        let connector = MockConnector::manual();
        connector.set_connect_delay(Duration::from_secs(3));

        let started = tokio::time::Instant::now();
        connector.connect().await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert_eq!(connector.connect_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_script_waits_for_start_and_scales_by_speed() {
        let script = vec![
            (Duration::from_secs(4), r#"{"firstname":"A","lastname":"B","event_type":"shot"}"#.to_string()),
        ];
        let connector = MockConnector::scripted(script);
        let mut link = connector.connect().await.unwrap();

        let started = tokio::time::Instant::now();
        link.send(ControlMessage::start(2)).unwrap();

        let first = link.recv().await.unwrap();
        assert!(matches!(parse_inbound(&first), InboundMessage::Event(_)));
        assert_eq!(started.elapsed(), Duration::from_secs(2));

        let InboundMessage::Status(status) = parse_inbound(&link.recv().await.unwrap()) else {
            panic!("expected status frame");
        };
        assert_eq!(status.status, "replaying");
        assert_eq!(status.current_replay_time.as_deref(), Some("00:04"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_script_stops_on_directive() {
        let connector = MockConnector::new();
        let mut link = connector.connect().await.unwrap();
        link.send(ControlMessage::start(1)).unwrap();
        link.send(ControlMessage::StopReplay).unwrap();

        // The player exits without sending anything and drops its sender.
        assert_eq!(link.recv().await, None);
    }
}
