//! The live session task.
//!
//! One task owns the aggregator, the replay link, the tick timer and the
//! annotation expiry schedule, and processes their inputs one at a time:
//! commands from the UI, frames from the replay server, timer ticks,
//! annotation deadlines, finished player loads and finished connection
//! attempts. Network work runs in spawned tasks whose results come back
//! tagged with a generation, so no step waits on the network. State is
//! published as a [`LiveSnapshot`] after every step.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::mpsc::error::SendError;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Duration, Instant, Interval};
use tracing::{debug, info, trace, warn};

use crate::data_provider::PlayerDataProvider;
use crate::error::ConnectionError;
use crate::live::aggregator::{AppliedStat, StatAggregator};
use crate::live::connection::{ReplayConnector, ReplayLink};
use crate::live::deltas::DeltaAnnotation;
use crate::live::message::{parse_inbound, ControlMessage, InboundMessage, ServerStatus};
use crate::live::replay::ReplayState;
use crate::types::{PlayerId, PlayerRecord, StatCounter};

/// Period of the elapsed-time tick
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Buffer for applied-stat notifications; slow subscribers lag rather than block
const APPLIED_CHANNEL_CAPACITY: usize = 256;

/// Commands accepted by a running session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Stop,
    Reset,
    /// Raw text from the speed field
    SetSpeed(String),
    Shutdown,
}

/// Progress of the bulk player load
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

/// Everything the render layer needs, published after every session step
#[derive(Debug, Clone, Default)]
pub struct LiveSnapshot {
    pub players: Arc<Vec<PlayerRecord>>,
    pub deltas: Vec<DeltaAnnotation>,
    pub replay: ReplayState,
    pub load: LoadState,
    pub loaded_at: Option<DateTime<Local>>,
    pub connection_error: Option<String>,
    /// A start is waiting on the replay connection
    pub connecting: bool,
    pub server_status: Option<ServerStatus>,
    pub last_applied: Option<AppliedStat>,
}

impl LiveSnapshot {
    /// Newest visible delta for a table cell
    pub fn delta_for(&self, player: PlayerId, counter: StatCounter) -> Option<&DeltaAnnotation> {
        self.deltas
            .iter()
            .rev()
            .find(|delta| delta.player == player && delta.counter == counter)
    }
}

/// Client side of a spawned session
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    snapshots: watch::Receiver<LiveSnapshot>,
    applied: broadcast::Sender<AppliedStat>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Queue a command; false if the session has already ended
    pub fn send(&self, command: SessionCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Latest published state
    pub fn snapshot(&self) -> LiveSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LiveSnapshot> {
        self.snapshots.clone()
    }

    /// Stream of every increment applied from now on
    pub fn applied_stats(&self) -> broadcast::Receiver<AppliedStat> {
        self.applied.subscribe()
    }

    /// Stop any running replay, release the connection and wait for the task
    pub async fn shutdown(self) {
        let _ = self.commands.send(SessionCommand::Shutdown);
        if let Err(e) = self.task.await {
            warn!("LIVE: Session task ended abnormally: {}", e);
        }
    }
}

type LoadResult = (u64, Result<Vec<PlayerRecord>, String>);
type ConnectResult = (u64, Result<ReplayLink, ConnectionError>);

pub struct LiveSession {
    provider: Arc<dyn PlayerDataProvider>,
    connector: Arc<dyn ReplayConnector>,
    aggregator: StatAggregator,
    link: Option<ReplayLink>,
    ticker: Option<Interval>,
    load: LoadState,
    loaded_at: Option<DateTime<Local>>,
    /// Bumped per load request so superseded loads are discarded
    load_generation: u64,
    loaded_tx: mpsc::UnboundedSender<LoadResult>,
    loaded_rx: mpsc::UnboundedReceiver<LoadResult>,
    /// Bumped per connection attempt and on stop, so late links are closed
    connect_generation: u64,
    connecting: bool,
    connected_tx: mpsc::UnboundedSender<ConnectResult>,
    connected_rx: mpsc::UnboundedReceiver<ConnectResult>,
    connection_error: Option<String>,
    server_status: Option<ServerStatus>,
    last_applied: Option<AppliedStat>,
    snapshot_tx: watch::Sender<LiveSnapshot>,
    applied_tx: broadcast::Sender<AppliedStat>,
}

impl LiveSession {
    /// Spawn a session task and start the initial player load
    pub fn spawn(
        provider: Arc<dyn PlayerDataProvider>,
        connector: Arc<dyn ReplayConnector>,
        initial_speed: u32,
    ) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(LiveSnapshot::default());
        let (applied_tx, _) = broadcast::channel(APPLIED_CHANNEL_CAPACITY);
        let (loaded_tx, loaded_rx) = mpsc::unbounded_channel();
        let (connected_tx, connected_rx) = mpsc::unbounded_channel();

        let session = LiveSession {
            provider,
            connector,
            aggregator: StatAggregator::new(Vec::new(), ReplayState::with_speed(initial_speed)),
            link: None,
            ticker: None,
            load: LoadState::Loading,
            loaded_at: None,
            load_generation: 0,
            loaded_tx,
            loaded_rx,
            connect_generation: 0,
            connecting: false,
            connected_tx,
            connected_rx,
            connection_error: None,
            server_status: None,
            last_applied: None,
            snapshot_tx,
            applied_tx: applied_tx.clone(),
        };

        let task = tokio::spawn(session.run(command_rx));

        SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            applied: applied_tx,
            task,
        }
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<SessionCommand>) {
        info!("LIVE: Session started");
        self.request_load();

        loop {
            self.publish();
            let next_expiry = self.aggregator.deltas().next_deadline();

            tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some((generation, result)) = self.loaded_rx.recv() => {
                    self.handle_loaded(generation, result);
                }
                Some((generation, result)) = self.connected_rx.recv() => {
                    self.handle_connected(generation, result);
                }
                inbound = next_inbound(&mut self.link) => match inbound {
                    Some(text) => self.handle_inbound(&text),
                    None => self.handle_link_closed(),
                },
                _ = next_tick(&mut self.ticker) => {
                    self.aggregator.replay_mut().tick();
                }
                _ = wait_until(next_expiry) => {
                    self.aggregator.prune_deltas(Instant::now());
                }
            }
        }

        self.stop();
        self.publish();
        info!("LIVE: Session closed");
    }

    fn handle_command(&mut self, command: SessionCommand) {
        debug!("LIVE: Command {:?}", command);
        match command {
            SessionCommand::Start => self.start(),
            SessionCommand::Stop => self.stop(),
            SessionCommand::Reset => self.reset(),
            SessionCommand::SetSpeed(_) if self.connecting => {
                debug!("LIVE: Speed edit ignored while connecting");
            }
            SessionCommand::SetSpeed(input) => {
                if let Err(e) = self.aggregator.replay_mut().edit_speed(&input) {
                    debug!("LIVE: Speed edit rejected: {}", e);
                }
            }
            SessionCommand::Shutdown => {}
        }
    }

    fn start(&mut self) {
        if self.aggregator.replay().is_active() || self.link.is_some() {
            debug!("LIVE: Start ignored, replay already running");
            return;
        }
        if self.connecting {
            debug!("LIVE: Start ignored, already connecting");
            return;
        }

        self.connect_generation += 1;
        let generation = self.connect_generation;
        self.connecting = true;

        let connector = Arc::clone(&self.connector);
        let connected_tx = self.connected_tx.clone();
        tokio::spawn(async move {
            let result = connector.connect().await;
            if let Err(SendError((_, Ok(link)))) = connected_tx.send((generation, result)) {
                link.close();
            }
        });
    }

    /// Drop a pending connection attempt; its link is closed when it lands
    fn cancel_connect(&mut self) {
        if self.connecting {
            debug!("LIVE: Abandoning connection attempt #{}", self.connect_generation);
            self.connecting = false;
            self.connect_generation += 1;
        }
    }

    fn handle_connected(&mut self, generation: u64, result: Result<ReplayLink, ConnectionError>) {
        if !self.connecting || generation != self.connect_generation {
            debug!("LIVE: Discarding abandoned connection #{}", generation);
            if let Ok(link) = result {
                link.close();
            }
            return;
        }
        self.connecting = false;

        let link = match result {
            Ok(link) => link,
            Err(e) => {
                warn!("LIVE: Could not open replay connection: {}", e);
                self.connection_error = Some(e.to_string());
                return;
            }
        };

        let speed = self.aggregator.replay().speed();
        if let Err(e) = link.send(ControlMessage::start(speed)) {
            warn!("LIVE: Could not send start directive: {}", e);
            self.connection_error = Some(e.to_string());
            link.close();
            return;
        }

        self.link = Some(link);
        self.connection_error = None;
        self.server_status = None;
        self.aggregator.replay_mut().begin();
        self.ticker = Some(interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD));
        info!("LIVE: Replay started at {}x", speed);
    }

    fn stop(&mut self) {
        self.cancel_connect();
        if !self.aggregator.replay_mut().halt() {
            debug!("LIVE: Stop ignored, no replay running");
            return;
        }

        self.ticker = None;
        if let Some(link) = self.link.take() {
            if let Err(e) = link.send(ControlMessage::StopReplay) {
                debug!("LIVE: Stop directive not delivered: {}", e);
            }
            link.close();
        }
        info!(
            "LIVE: Replay stopped at {}s",
            self.aggregator.replay().elapsed_secs()
        );
    }

    fn reset(&mut self) {
        self.stop();
        self.aggregator.reset();
        self.connection_error = None;
        self.server_status = None;
        self.last_applied = None;
        info!("LIVE: Session reset, reloading players");
        self.request_load();
    }

    fn request_load(&mut self) {
        self.load_generation += 1;
        let generation = self.load_generation;
        self.load = LoadState::Loading;

        let provider = Arc::clone(&self.provider);
        let loaded_tx = self.loaded_tx.clone();
        tokio::spawn(async move {
            let result = provider.players().await.map_err(|e| e.to_string());
            let _ = loaded_tx.send((generation, result));
        });
    }

    fn handle_loaded(&mut self, generation: u64, result: Result<Vec<PlayerRecord>, String>) {
        if generation != self.load_generation {
            debug!("LIVE: Discarding superseded player load #{}", generation);
            return;
        }

        match result {
            Ok(players) => {
                info!("LIVE: Loaded {} players", players.len());
                self.aggregator.replace_players(players);
                self.load = LoadState::Ready;
                self.loaded_at = Some(Local::now());
            }
            Err(e) => {
                warn!("LIVE: Player load failed: {}", e);
                self.load = LoadState::Failed(format!("Failed to load players: {}", e));
            }
        }
    }

    fn handle_inbound(&mut self, text: &str) {
        match parse_inbound(text) {
            InboundMessage::Event(event) => {
                if let Some(applied) = self.aggregator.apply_event(&event, Instant::now()) {
                    let _ = self.applied_tx.send(applied.clone());
                    self.last_applied = Some(applied);
                }
            }
            InboundMessage::Status(status) => {
                trace!("LIVE: Server status {:?}", status);
                self.server_status = Some(status);
            }
            InboundMessage::Ignored => {
                trace!("LIVE: Ignoring inbound frame: {}", text);
            }
        }
    }

    /// The server went away mid-replay; stop locally without a directive
    fn handle_link_closed(&mut self) {
        warn!("LIVE: Replay connection closed by server");
        self.link = None;
        self.ticker = None;
        self.aggregator.replay_mut().halt();
        self.connection_error = Some(ConnectionError::Closed.to_string());
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(LiveSnapshot {
            players: Arc::new(self.aggregator.players().to_vec()),
            deltas: self.aggregator.deltas().to_vec(),
            replay: self.aggregator.replay().clone(),
            load: self.load.clone(),
            loaded_at: self.loaded_at,
            connection_error: self.connection_error.clone(),
            connecting: self.connecting,
            server_status: self.server_status.clone(),
            last_applied: self.last_applied.clone(),
        });
    }
}

async fn next_inbound(link: &mut Option<ReplayLink>) -> Option<String> {
    match link {
        Some(link) => link.recv().await,
        None => std::future::pending().await,
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
