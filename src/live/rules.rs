//! Scoring rules mapping replay event types to stat increments.
//!
//! Rules are evaluated in order and the first match wins. Event types are
//! compared lower-cased; anything no rule recognises is a no-op.

use crate::types::StatCounter;

/// Points credited for a `score-<n>` event whose suffix does not parse
const DEFAULT_SCORE: u32 = 2;

const SCORE_PREFIX: &str = "score-";

/// The counter an event increments and by how much
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatChange {
    pub counter: StatCounter,
    pub amount: u32,
}

struct ScoringRule {
    matches: fn(&str) -> bool,
    counter: StatCounter,
    amount: fn(&str) -> u32,
}

const RULES: &[ScoringRule] = &[
    ScoringRule {
        matches: is_field_goal,
        counter: StatCounter::Points,
        amount: fixed::<2>,
    },
    ScoringRule {
        matches: is_explicit_score,
        counter: StatCounter::Points,
        amount: score_suffix,
    },
    ScoringRule {
        matches: is_three_pointer,
        counter: StatCounter::Points,
        amount: fixed::<3>,
    },
    ScoringRule {
        matches: is_free_throw,
        counter: StatCounter::Points,
        amount: fixed::<1>,
    },
    ScoringRule {
        matches: is_rebound,
        counter: StatCounter::Rebounds,
        amount: fixed::<1>,
    },
    ScoringRule {
        matches: is_assist,
        counter: StatCounter::Assists,
        amount: fixed::<1>,
    },
    ScoringRule {
        matches: is_foul,
        counter: StatCounter::Fouls,
        amount: fixed::<1>,
    },
];

// "shot" and "points" carry no documented difference and stay aliases.
fn is_field_goal(event_type: &str) -> bool {
    event_type == "shot" || event_type == "points"
}

fn is_explicit_score(event_type: &str) -> bool {
    event_type.starts_with(SCORE_PREFIX)
}

fn is_three_pointer(event_type: &str) -> bool {
    event_type == "three-pointer"
}

fn is_free_throw(event_type: &str) -> bool {
    event_type == "free_throw"
}

fn is_rebound(event_type: &str) -> bool {
    event_type == "rebound"
}

fn is_assist(event_type: &str) -> bool {
    event_type == "assist"
}

fn is_foul(event_type: &str) -> bool {
    event_type == "foul"
}

fn fixed<const N: u32>(_event_type: &str) -> u32 {
    N
}

/// Points from the text after the first `-`, falling back to two
fn score_suffix(event_type: &str) -> u32 {
    event_type
        .split_once('-')
        .and_then(|(_, suffix)| suffix.trim().parse::<u32>().ok())
        .filter(|points| *points > 0)
        .unwrap_or(DEFAULT_SCORE)
}

/// Look up the stat change for an event type
///
/// Returns `None` for unrecognised types, which callers treat as a no-op.
pub fn evaluate(event_type: &str) -> Option<StatChange> {
    let normalized = event_type.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&normalized))
        .map(|rule| StatChange {
            counter: rule.counter,
            amount: (rule.amount)(&normalized),
        })
        .filter(|change| change.amount > 0)
}
