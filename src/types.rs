/// Shared types used across the application
///
/// This module contains the player record served by the stats API and the
/// counters the live aggregator mutates. Both the library (commands, tui,
/// live) and the binary (main.rs) use them.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Global constants
pub const NBA_LEAGUE_ABBREV: &str = "NBA";

/// Identifies a player by position in the loaded roster
///
/// Rosters are never reordered or shrunk during a session, so the index is a
/// stable identity until the next reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub usize);

/// One of the four cumulative counters tracked per player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatCounter {
    Points,
    Rebounds,
    Assists,
    Fouls,
}

impl StatCounter {
    pub const ALL: [StatCounter; 4] = [
        StatCounter::Points,
        StatCounter::Rebounds,
        StatCounter::Assists,
        StatCounter::Fouls,
    ];

    /// Field name as used by the stats API
    pub fn name(&self) -> &'static str {
        match self {
            StatCounter::Points => "points",
            StatCounter::Rebounds => "rebounds",
            StatCounter::Assists => "assists",
            StatCounter::Fouls => "fouls",
        }
    }

    /// Short column header
    pub fn abbrev(&self) -> &'static str {
        match self {
            StatCounter::Points => "PTS",
            StatCounter::Rebounds => "REB",
            StatCounter::Assists => "AST",
            StatCounter::Fouls => "PF",
        }
    }
}

impl fmt::Display for StatCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A player row from `/api/players`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub player_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_name: String,
    #[serde(default)]
    pub jersey_number: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(default)]
    pub height_cm: Option<u32>,
    #[serde(default)]
    pub weight_kg: Option<u32>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rebounds: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assists: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fouls: u32,
}

impl PlayerRecord {
    /// Current value of a counter
    pub fn counter(&self, counter: StatCounter) -> u32 {
        match counter {
            StatCounter::Points => self.points,
            StatCounter::Rebounds => self.rebounds,
            StatCounter::Assists => self.assists,
            StatCounter::Fouls => self.fouls,
        }
    }

    /// Add to a counter and return the new value
    pub fn add(&mut self, counter: StatCounter, amount: u32) -> u32 {
        let slot = match counter {
            StatCounter::Points => &mut self.points,
            StatCounter::Rebounds => &mut self.rebounds,
            StatCounter::Assists => &mut self.assists,
            StatCounter::Fouls => &mut self.fouls,
        };
        *slot = slot.saturating_add(amount);
        *slot
    }

    /// Jersey number as shown in tables ("#23"), empty when unknown
    pub fn jersey_label(&self) -> String {
        self.jersey_number
            .map(|n| format!("#{}", n))
            .unwrap_or_default()
    }
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_record_from_api_json() {
        let json = r#"{
            "playerName": "LeBron James",
            "teamName": "Los Angeles Lakers",
            "jerseyNumber": 23,
            "position": "SF",
            "heightCm": 206,
            "weightKg": 113,
            "birthDate": "1984-12-30",
            "college": null,
            "salary": 47607350.0,
            "points": 12,
            "rebounds": 4,
            "assists": 6,
            "fouls": 1
        }"#;

        let player: PlayerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(player.player_name, "LeBron James");
        assert_eq!(player.team_name, "Los Angeles Lakers");
        assert_eq!(player.jersey_number, Some(23));
        assert_eq!(player.points, 12);
        assert_eq!(player.fouls, 1);
        assert_eq!(player.college, None);
    }

    #[test]
    fn test_player_record_missing_counters_default_to_zero() {
        let json = r#"{"playerName": "Rookie", "teamName": null, "jerseyNumber": null, "position": null}"#;
        let player: PlayerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(player.team_name, "");
        assert_eq!(player.jersey_number, None);
        for counter in StatCounter::ALL {
            assert_eq!(player.counter(counter), 0);
        }
    }

    #[test]
    fn test_add_only_touches_one_counter() {
        let mut player = PlayerRecord {
            player_name: "Test".to_string(),
            points: 10,
            ..Default::default()
        };
        assert_eq!(player.add(StatCounter::Points, 3), 13);
        assert_eq!(player.rebounds, 0);
        assert_eq!(player.assists, 0);
        assert_eq!(player.fouls, 0);
    }

    #[test]
    fn test_jersey_label() {
        let mut player = PlayerRecord::default();
        assert_eq!(player.jersey_label(), "");
        player.jersey_number = Some(0);
        assert_eq!(player.jersey_label(), "#0");
    }
}
