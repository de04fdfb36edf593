//! Short-lived "value increased" markers for the live table.
//!
//! Every annotation carries its own deadline. Pruning removes only the
//! entries whose deadline has passed, so overlapping deltas for the same
//! player and counter each expire on their own schedule.

use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

use crate::types::{PlayerId, StatCounter};

/// How long a delta stays visible
pub const DELTA_DISPLAY_DURATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaAnnotation {
    pub player: PlayerId,
    pub counter: StatCounter,
    pub amount: u32,
    /// Distinguishes repeated identical deltas so each gets its own flash
    pub token: Uuid,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct DeltaBoard {
    entries: Vec<DeltaAnnotation>,
}

impl DeltaBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh annotation expiring one display period after `now`
    pub fn push(
        &mut self,
        player: PlayerId,
        counter: StatCounter,
        amount: u32,
        now: Instant,
    ) -> &DeltaAnnotation {
        self.entries.push(DeltaAnnotation {
            player,
            counter,
            amount,
            token: Uuid::new_v4(),
            expires_at: now + DELTA_DISPLAY_DURATION,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Drop every annotation whose deadline is at or before `now`
    ///
    /// Returns the number of annotations removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.expires_at > now);
        before - self.entries.len()
    }

    /// Earliest pending deadline, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.expires_at).min()
    }

    /// Most recent annotation for a (player, counter) pair
    pub fn latest(&self, player: PlayerId, counter: StatCounter) -> Option<&DeltaAnnotation> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.player == player && entry.counter == counter)
    }

    pub fn to_vec(&self) -> Vec<DeltaAnnotation> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
