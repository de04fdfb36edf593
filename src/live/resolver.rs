use crate::live::message::GameEvent;
use crate::types::{PlayerId, PlayerRecord};

/// Find the roster entry an event refers to
///
/// A case-insensitive full-name match wins; otherwise the first player whose
/// jersey number equals the event's `player_number`. Events that match
/// nobody resolve to `None` and are dropped by the caller.
pub fn resolve_player(players: &[PlayerRecord], event: &GameEvent) -> Option<PlayerId> {
    let name = event.full_name().to_lowercase();
    if !name.is_empty() {
        let by_name = players
            .iter()
            .position(|player| player.player_name.trim().to_lowercase() == name);
        if by_name.is_some() {
            return by_name.map(PlayerId);
        }
    }

    let number = event.player_number.as_deref().map(str::trim)?;
    if number.is_empty() {
        return None;
    }
    players
        .iter()
        .position(|player| {
            player
                .jersey_number
                .is_some_and(|jersey| jersey.to_string() == number)
        })
        .map(PlayerId)
}
