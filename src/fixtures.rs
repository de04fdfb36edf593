/// Mock fixture data for testing and development
///
/// Deterministic rosters and a scripted replay used by unit tests, the
/// `--mock` development mode and the benchmarks.
use std::time::Duration;

use serde_json::json;

use crate::types::PlayerRecord;

/// Build a player with zeroed counters
pub fn player(name: &str, team: &str, jersey: Option<u32>, position: &str) -> PlayerRecord {
    PlayerRecord {
        player_name: name.to_string(),
        team_name: team.to_string(),
        jersey_number: jersey,
        position: position.to_string(),
        ..PlayerRecord::default()
    }
}

/// Two starting fives with a couple of bench players
pub fn create_mock_roster() -> Vec<PlayerRecord> {
    let lakers = "Los Angeles Lakers";
    let celtics = "Boston Celtics";

    let mut roster = vec![
        player("LeBron James", lakers, Some(23), "F"),
        player("Anthony Davis", lakers, Some(3), "F-C"),
        player("Austin Reaves", lakers, Some(15), "G"),
        player("D'Angelo Russell", lakers, Some(1), "G"),
        player("Rui Hachimura", lakers, Some(28), "F"),
        player("Jaxson Hayes", lakers, Some(11), "C"),
        player("Jayson Tatum", celtics, Some(0), "F"),
        player("Jaylen Brown", celtics, Some(7), "G-F"),
        player("Jrue Holiday", celtics, Some(4), "G"),
        player("Derrick White", celtics, Some(9), "G"),
        player("Kristaps Porzingis", celtics, Some(8), "C"),
        player("Al Horford", celtics, None, "C"),
    ];

    for (idx, record) in roster.iter_mut().enumerate() {
        record.height_cm = Some(190 + (idx as u32 * 3) % 28);
        record.weight_kg = Some(88 + (idx as u32 * 5) % 30);
    }
    roster[0].birth_date = Some("1984-12-30".to_string());
    roster[6].college = Some("Duke".to_string());

    roster
}

/// A roster of `size` synthetic players, for benchmarks
pub fn create_large_roster(size: usize) -> Vec<PlayerRecord> {
    (0..size)
        .map(|idx| {
            player(
                &format!("Player{} Number{}", idx, idx),
                if idx % 2 == 0 { "Home" } else { "Away" },
                Some((idx % 100) as u32),
                "G",
            )
        })
        .collect()
}

fn event(firstname: &str, lastname: &str, event_type: &str, number: u32) -> String {
    json!({
        "firstname": firstname,
        "lastname": lastname,
        "event_type": event_type,
        "player_number": number.to_string(),
    })
    .to_string()
}

/// Replay frames keyed by game-clock offset, matching [`create_mock_roster`]
///
/// Includes an unknown event type and an unknown player, both of which the
/// aggregator drops.
pub fn create_mock_replay() -> Vec<(Duration, String)> {
    let secs = Duration::from_secs;
    vec![
        (secs(2), event("LeBron", "James", "shot", 23)),
        (secs(4), event("Jayson", "Tatum", "rebound", 0)),
        (secs(6), event("Jaylen", "Brown", "three-pointer", 7)),
        (secs(7), event("Jayson", "Tatum", "assist", 0)),
        (secs(9), event("Anthony", "Davis", "foul", 3)),
        (secs(10), event("Jrue", "Holiday", "free_throw", 4)),
        (secs(10), event("Jrue", "Holiday", "free_throw", 4)),
        (secs(13), event("Austin", "Reaves", "score-3", 15)),
        (secs(14), event("LeBron", "James", "assist", 23)),
        (secs(16), event("Derrick", "White", "steal", 9)),
        (secs(18), event("Kristaps", "Porzingis", "points", 8)),
        (secs(19), event("Bench", "Warmer", "shot", 99)),
        (secs(21), event("Rui", "Hachimura", "rebound", 28)),
        (secs(23), event("Anthony", "Davis", "shot", 3)),
        (secs(24), event("Al", "Horford", "foul", 42)),
        (secs(27), event("Jaylen", "Brown", "three-pointer", 7)),
        (secs(30), event("LeBron", "James", "three-pointer", 23)),
    ]
}
