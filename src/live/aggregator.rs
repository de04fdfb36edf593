use tokio::time::Instant;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::live::deltas::{DeltaAnnotation, DeltaBoard};
use crate::live::message::GameEvent;
use crate::live::replay::ReplayState;
use crate::live::resolver::resolve_player;
use crate::live::rules::{self, StatChange};
use crate::types::{PlayerId, PlayerRecord, StatCounter};

/// Record of one increment applied to the roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedStat {
    pub player: PlayerId,
    pub player_name: String,
    pub counter: StatCounter,
    pub amount: u32,
    /// Counter value after the increment
    pub total: u32,
    pub token: Uuid,
}

/// Running box score for a replay session
///
/// Owns the roster being mutated, the active delta annotations and the replay
/// control state. All mutation goes through `&mut self`, so applying an event
/// (resolve, add, annotate) is never interleaved with another event.
#[derive(Debug, Clone, Default)]
pub struct StatAggregator {
    players: Vec<PlayerRecord>,
    deltas: DeltaBoard,
    replay: ReplayState,
}

impl StatAggregator {
    pub fn new(players: Vec<PlayerRecord>, replay: ReplayState) -> Self {
        Self {
            players,
            deltas: DeltaBoard::new(),
            replay,
        }
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn deltas(&self) -> &DeltaBoard {
        &self.deltas
    }

    pub fn replay(&self) -> &ReplayState {
        &self.replay
    }

    pub fn replay_mut(&mut self) -> &mut ReplayState {
        &mut self.replay
    }

    /// Swap in a freshly loaded roster, discarding annotations for the old one
    pub fn replace_players(&mut self, players: Vec<PlayerRecord>) {
        self.players = players;
        self.deltas.clear();
    }

    /// Clear the roster and annotations and return replay control to defaults
    pub fn reset(&mut self) {
        self.players.clear();
        self.deltas.clear();
        self.replay.reset();
    }

    /// Resolve, score and annotate one game event
    ///
    /// Unknown event types and events matching no player are dropped and
    /// return `None`.
    pub fn apply_event(&mut self, event: &GameEvent, now: Instant) -> Option<AppliedStat> {
        let Some(change) = rules::evaluate(&event.event_type) else {
            trace!("LIVE: Ignoring event type '{}'", event.event_type);
            return None;
        };

        let Some(player) = resolve_player(&self.players, event) else {
            debug!(
                "LIVE: No player for '{}' (#{}), dropping {}",
                event.full_name(),
                event.player_number.as_deref().unwrap_or("-"),
                event.event_type
            );
            return None;
        };

        self.apply_change(player, change, now)
    }

    /// Add a stat change to one player and register its annotation
    pub fn apply_change(
        &mut self,
        player: PlayerId,
        change: StatChange,
        now: Instant,
    ) -> Option<AppliedStat> {
        if change.amount == 0 {
            return None;
        }
        let record = self.players.get_mut(player.0)?;
        let total = record.add(change.counter, change.amount);
        let player_name = record.player_name.clone();
        let token = self
            .deltas
            .push(player, change.counter, change.amount, now)
            .token;

        debug!(
            "LIVE: {} +{} {} -> {}",
            player_name, change.amount, change.counter, total
        );

        Some(AppliedStat {
            player,
            player_name,
            counter: change.counter,
            amount: change.amount,
            total,
            token,
        })
    }

    /// Expire annotations whose display period has passed
    pub fn prune_deltas(&mut self, now: Instant) -> usize {
        self.deltas.prune(now)
    }

    /// Current annotation for a cell, if one is showing
    pub fn delta_for(&self, player: PlayerId, counter: StatCounter) -> Option<&DeltaAnnotation> {
        self.deltas.latest(player, counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::player;
    use crate::live::deltas::DELTA_DISPLAY_DURATION;
    use std::time::Duration;

    fn aggregator() -> StatAggregator {
        let mut a = player("A B", "Test Team", Some(7), "G");
        a.points = 10;
        StatAggregator::new(
            vec![a, player("Other Guy", "Test Team", Some(11), "C")],
            ReplayState::default(),
        )
    }

    fn lines(agg: &StatAggregator) -> Vec<[u32; 4]> {
        agg.players()
            .iter()
            .map(|p| [p.points, p.rebounds, p.assists, p.fouls])
            .collect()
    }

    #[test]
    fn test_each_rule_touches_exactly_one_counter() {
        let cases = [
            ("shot", StatCounter::Points, 2),
            ("points", StatCounter::Points, 2),
            ("score-5", StatCounter::Points, 5),
            ("three-pointer", StatCounter::Points, 3),
            ("free_throw", StatCounter::Points, 1),
            ("rebound", StatCounter::Rebounds, 1),
            ("assist", StatCounter::Assists, 1),
            ("foul", StatCounter::Fouls, 1),
        ];

        for (event_type, counter, amount) in cases {
            let mut agg = aggregator();
            let before = agg.players()[0].clone();
            let other_before = agg.players()[1].clone();

            let applied = agg
                .apply_event(&GameEvent::new("A", "B", event_type), Instant::now())
                .unwrap_or_else(|| panic!("{} should apply", event_type));
            assert_eq!(applied.counter, counter);
            assert_eq!(applied.amount, amount);

            let after = &agg.players()[0];
            for c in StatCounter::ALL {
                let expected = if c == counter {
                    before.counter(c) + amount
                } else {
                    before.counter(c)
                };
                assert_eq!(after.counter(c), expected, "{} changed {}", event_type, c);
            }
            assert_eq!(agg.players()[1], other_before);
        }
    }

    #[test]
    fn test_score_suffix_and_fallback() {
        let mut agg = aggregator();
        agg.apply_event(&GameEvent::new("A", "B", "score-7"), Instant::now());
        assert_eq!(agg.players()[0].points, 17);

        agg.apply_event(&GameEvent::new("A", "B", "score-x"), Instant::now());
        assert_eq!(agg.players()[0].points, 19);
    }

    #[test]
    fn test_unmatched_player_changes_nothing() {
        let mut agg = aggregator();
        let before = lines(&agg);
        let event = GameEvent::new("Ghost", "Player", "three-pointer").with_number("99");

        assert_eq!(agg.apply_event(&event, Instant::now()), None);
        assert_eq!(lines(&agg), before);
        assert!(agg.deltas().is_empty());
    }

    #[test]
    fn test_unknown_event_type_changes_nothing() {
        let mut agg = aggregator();
        let before = lines(&agg);
        assert_eq!(agg.apply_event(&GameEvent::new("A", "B", "steal"), Instant::now()), None);
        assert_eq!(lines(&agg), before);
        assert!(agg.deltas().is_empty());
    }

    #[test]
    fn test_annotation_lifecycle() {
        let mut agg = aggregator();
        let now = Instant::now();
        let applied = agg
            .apply_event(&GameEvent::new("A", "B", "three-pointer"), now)
            .unwrap();
        assert_eq!(applied.total, 13);

        let delta = agg.delta_for(PlayerId(0), StatCounter::Points).unwrap();
        assert_eq!(delta.amount, 3);
        assert_eq!(delta.token, applied.token);

        agg.prune_deltas(now + Duration::from_millis(500));
        assert!(agg.delta_for(PlayerId(0), StatCounter::Points).is_some());

        agg.prune_deltas(now + DELTA_DISPLAY_DURATION);
        assert!(agg.delta_for(PlayerId(0), StatCounter::Points).is_none());
    }

    #[test]
    fn test_concurrent_annotations_keep_own_timers() {
        let mut agg = aggregator();
        let now = Instant::now();
        agg.apply_event(&GameEvent::new("A", "B", "rebound"), now);
        agg.apply_event(
            &GameEvent::new("Other", "Guy", "assist"),
            now + Duration::from_millis(400),
        );

        agg.prune_deltas(now + Duration::from_millis(1000));
        assert!(agg.delta_for(PlayerId(0), StatCounter::Rebounds).is_none());
        assert!(agg.delta_for(PlayerId(1), StatCounter::Assists).is_some());

        agg.prune_deltas(now + Duration::from_millis(1400));
        assert!(agg.deltas().is_empty());
    }

    #[test]
    fn test_counters_never_decrease() {
        let mut agg = aggregator();
        let now = Instant::now();
        let mut previous = lines(&agg);
        for event_type in ["foul", "shot", "score-0", "block", "score--4", "free_throw"] {
            agg.apply_event(&GameEvent::new("a", "b", event_type), now);
            let current = lines(&agg);
            for (before, after) in previous.iter().zip(&current) {
                for i in 0..4 {
                    assert!(after[i] >= before[i]);
                }
            }
            previous = current;
        }
    }

    #[test]
    fn test_reset_clears_roster_and_replay() {
        let mut agg = aggregator();
        agg.replay_mut().edit_speed("4").unwrap();
        agg.apply_event(&GameEvent::new("A", "B", "shot"), Instant::now());
        agg.reset();
        assert!(agg.players().is_empty());
        assert!(agg.deltas().is_empty());
        assert_eq!(agg.replay(), &ReplayState::default());
    }
}
