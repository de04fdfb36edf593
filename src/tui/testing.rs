//! General test utilities for TUI tests.

use std::sync::Arc;

use ratatui::buffer::Buffer;
use tokio::time::{Duration, Instant};
use uuid::Uuid;

use crate::fixtures::player;
use crate::live::deltas::DeltaAnnotation;
use crate::live::session::{LiveSnapshot, LoadState};
use crate::types::{PlayerId, PlayerRecord, StatCounter};

/// Constant for general rendering width
pub const RENDER_WIDTH: u16 = 80;

/// Helper to extract lines from buffer
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area();
    (0..area.height)
        .map(|y| {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

/// Helper for buffer assertions, ignoring trailing spaces
pub fn assert_buffer(buf: &Buffer, expected: &[&str]) {
    let actual = buffer_lines(buf);
    assert_eq!(
        actual.len(),
        expected.len(),
        "Buffer height mismatch: expected {} lines, got {}",
        expected.len(),
        actual.len()
    );
    for (i, expected_line) in expected.iter().enumerate() {
        assert_eq!(
            actual[i].trim_end(),
            expected_line.trim_end(),
            "Line {} mismatch:\nExpected: '{}'\nActual:   '{}'",
            i,
            expected_line,
            actual[i]
        );
    }
}

/// Column of the first occurrence of `needle` on line `y`
pub fn find_in_line(buf: &Buffer, y: u16, needle: &str) -> Option<u16> {
    let line = buffer_lines(buf).get(y as usize)?.clone();
    let byte_idx = line.find(needle)?;
    Some(line[..byte_idx].chars().count() as u16)
}

pub fn test_roster() -> Vec<PlayerRecord> {
    let mut lebron = player("LeBron James", "Los Angeles Lakers", Some(23), "F");
    lebron.points = 27;
    lebron.rebounds = 8;
    lebron.assists = 9;
    lebron.fouls = 2;
    let mut tatum = player("Jayson Tatum", "Boston Celtics", Some(0), "F");
    tatum.points = 31;
    tatum.rebounds = 11;
    vec![lebron, tatum, player("Al Horford", "Boston Celtics", None, "C")]
}

/// Ready snapshot over [`test_roster`]
pub fn ready_snapshot() -> LiveSnapshot {
    LiveSnapshot {
        players: Arc::new(test_roster()),
        load: LoadState::Ready,
        ..Default::default()
    }
}

pub fn delta(player: usize, counter: StatCounter, amount: u32) -> DeltaAnnotation {
    DeltaAnnotation {
        player: PlayerId(player),
        counter,
        amount,
        token: Uuid::new_v4(),
        expires_at: Instant::now() + Duration::from_secs(1),
    }
}
