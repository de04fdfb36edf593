use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::commands::print_box_score;
use crate::data_provider::PlayerDataProvider;
use crate::formatting::{format_delta, format_elapsed};
use crate::live::aggregator::AppliedStat;
use crate::live::connection::ReplayConnector;
use crate::live::session::{LiveSession, LiveSnapshot, LoadState, SessionCommand};

/// Run a replay without the TUI, printing each stat as it lands
///
/// Ends after `seconds` of wall time, on Ctrl-C, or when the replay server
/// drops the connection. The final box score is printed either way.
pub async fn run(
    provider: Arc<dyn PlayerDataProvider>,
    connector: Arc<dyn ReplayConnector>,
    speed: u32,
    seconds: Option<u64>,
) -> Result<()> {
    let handle = LiveSession::spawn(provider, connector, speed);
    let mut snapshots = handle.subscribe();

    if let Err(e) = wait_for_roster(&mut snapshots).await {
        handle.shutdown().await;
        return Err(e);
    }

    let mut applied = handle.applied_stats();
    handle.send(SessionCommand::Start);
    println!("Replay started at {}x (Ctrl-C to stop)\n", speed.max(1));

    let deadline = seconds.map(|s| Instant::now() + Duration::from_secs(s));
    let mut started = false;
    let outcome = loop {
        tokio::select! {
            stat = applied.recv() => match stat {
                Ok(stat) => {
                    let elapsed = snapshots.borrow().replay.elapsed_secs();
                    println!("{}", format_applied(&stat, elapsed));
                }
                Err(RecvError::Lagged(skipped)) => warn!("WATCH: Skipped {} stat lines", skipped),
                Err(RecvError::Closed) => break Ok(()),
            },
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let snapshot = snapshots.borrow_and_update();
                if snapshot.replay.is_active() {
                    started = true;
                } else if let Some(error) = &snapshot.connection_error {
                    if started {
                        println!("\nReplay ended: {}", error);
                        break Ok(());
                    }
                    break Err(anyhow::anyhow!("Could not start replay: {}", error));
                }
            }
            _ = wait_until(deadline) => {
                info!("WATCH: Time limit reached");
                break Ok(());
            }
            _ = tokio::signal::ctrl_c() => {
                info!("WATCH: Interrupted");
                break Ok(());
            }
        }
    };

    handle.send(SessionCommand::Stop);
    let final_snapshot = handle.snapshot();
    handle.shutdown().await;
    outcome?;

    print_box_score(
        &format!(
            "Box Score after {}",
            format_elapsed(final_snapshot.replay.elapsed_secs())
        ),
        &final_snapshot.players,
    );
    Ok(())
}

async fn wait_for_roster(snapshots: &mut watch::Receiver<LiveSnapshot>) -> Result<()> {
    loop {
        match &snapshots.borrow_and_update().load {
            LoadState::Ready => return Ok(()),
            LoadState::Failed(e) => bail!("{}", e),
            LoadState::Loading => {}
        }
        snapshots
            .changed()
            .await
            .context("Live session ended before players loaded")?;
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn format_applied(stat: &AppliedStat, elapsed_secs: u64) -> String {
    format!(
        "[{}] {:<24} {:>3} {} ({})",
        format_elapsed(elapsed_secs),
        stat.player_name,
        format_delta(stat.amount),
        stat.counter.abbrev(),
        stat.total
    )
}
