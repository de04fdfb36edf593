use tokio::sync::watch;
use tokio::time::Duration;

use crate::live::session::LiveSnapshot;

/// Wait until a published snapshot satisfies `predicate` and return it
pub async fn wait_for(
    rx: &mut watch::Receiver<LiveSnapshot>,
    predicate: impl Fn(&LiveSnapshot) -> bool,
) -> LiveSnapshot {
    let wait = async {
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if predicate(&snapshot) {
                    return snapshot.clone();
                }
            }
            rx.changed().await.expect("session ended while waiting");
        }
    };
    tokio::time::timeout(Duration::from_secs(60), wait)
        .await
        .expect("timed out waiting for snapshot")
}
