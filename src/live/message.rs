//! Wire messages exchanged with the replay server.
//!
//! Inbound frames are loosely typed JSON. They are classified here so the
//! rest of the live module only ever sees a validated [`GameEvent`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Game clock position a replay starts from
pub const REPLAY_START_TIME: &str = "00:00";

const REQUIRED_EVENT_FIELDS: [&str; 3] = ["firstname", "lastname", "event_type"];

/// A single play broadcast by the replay server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameEvent {
    pub firstname: String,
    pub lastname: String,
    pub event_type: String,
    #[serde(default, alias = "jersey_number", deserialize_with = "jersey_string")]
    pub player_number: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl GameEvent {
    pub fn new(firstname: &str, lastname: &str, event_type: &str) -> Self {
        Self {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            event_type: event_type.to_string(),
            player_number: None,
            timestamp: None,
        }
    }

    pub fn with_number(mut self, number: &str) -> Self {
        self.player_number = Some(number.to_string());
        self
    }

    /// "first last", trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname.trim(), self.lastname.trim())
            .trim()
            .to_string()
    }
}

/// Replay progress reported by the server, shown but never acted on
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub status: String,
    #[serde(default)]
    pub current_replay_time: Option<String>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Classified inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Event(GameEvent),
    Status(ServerStatus),
    Ignored,
}

/// Control directives sent to the replay server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ControlMessage {
    StartReplay {
        #[serde(rename = "startTime")]
        start_time: String,
        speed: u32,
    },
    StopReplay,
}

impl ControlMessage {
    pub fn start(speed: u32) -> Self {
        ControlMessage::StartReplay {
            start_time: REPLAY_START_TIME.to_string(),
            speed,
        }
    }
}

/// `status` values the replay server reports about playback; anything else
/// (such as the `processing` acknowledgment of a control message) is ignored
const REPLAY_STATUSES: [&str; 3] = ["replaying", "stopped", "error"];

/// Classify a text frame from the replay connection
///
/// Only objects carrying string `firstname`, `lastname` and `event_type`
/// fields become events. Objects with a playback `status` become status
/// reports. Everything else, malformed JSON included, is ignored.
pub fn parse_inbound(text: &str) -> InboundMessage {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => return InboundMessage::Ignored,
    };

    let Some(object) = value.as_object() else {
        return InboundMessage::Ignored;
    };

    let is_event = REQUIRED_EVENT_FIELDS
        .iter()
        .all(|field| object.get(*field).is_some_and(Value::is_string));
    if is_event {
        return serde_json::from_value(value)
            .map(InboundMessage::Event)
            .unwrap_or(InboundMessage::Ignored);
    }

    let is_status = object
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|status| REPLAY_STATUSES.contains(&status));
    if is_status {
        return serde_json::from_value(value)
            .map(InboundMessage::Status)
            .unwrap_or(InboundMessage::Ignored);
    }

    InboundMessage::Ignored
}

/// Accept jersey numbers sent as strings or numbers
fn jersey_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
