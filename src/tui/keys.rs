/// Keyboard event to action mapping
///
/// Replay commands go straight to the live session. Speed edits are only
/// produced while no replay is running; the session rejects them otherwise.
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, trace};

use crate::live::session::{LiveSnapshot, SessionCommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Session(SessionCommand),
    SelectNext,
    SelectPrevious,
    Quit,
}

pub fn key_to_action(key: KeyEvent, snapshot: &LiveSnapshot) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    let replay = &snapshot.replay;
    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter => {
            Action::Session(SessionCommand::Start)
        }
        KeyCode::Char('x') | KeyCode::Char('X') => Action::Session(SessionCommand::Stop),
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Session(SessionCommand::Reset),
        KeyCode::Down | KeyCode::Char('j') => Action::SelectNext,
        KeyCode::Up | KeyCode::Char('k') => Action::SelectPrevious,
        code if replay.is_active() => {
            trace!("KEY: {:?} ignored while replay is running", code);
            return None;
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            Action::Session(SessionCommand::SetSpeed(format!("{}{}", replay.speed_input(), c)))
        }
        KeyCode::Backspace => {
            let mut input = replay.speed_input().to_string();
            input.pop();
            Action::Session(SessionCommand::SetSpeed(input))
        }
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Session(SessionCommand::SetSpeed(
            replay.speed().saturating_add(1).to_string(),
        )),
        KeyCode::Char('-') => Action::Session(SessionCommand::SetSpeed(
            replay.speed().saturating_sub(1).max(1).to_string(),
        )),
        _ => return None,
    };

    debug!("KEY: {:?} -> {:?}", key.code, action);
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::replay::ReplayState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn idle_at(speed: u32) -> LiveSnapshot {
        LiveSnapshot {
            replay: ReplayState::with_speed(speed),
            ..Default::default()
        }
    }

    fn active() -> LiveSnapshot {
        let mut replay = ReplayState::with_speed(2);
        replay.begin();
        LiveSnapshot {
            replay,
            ..Default::default()
        }
    }

    #[test]
    fn test_control_keys() {
        let snapshot = idle_at(1);
        assert_eq!(
            key_to_action(key(KeyCode::Char('s')), &snapshot),
            Some(Action::Session(SessionCommand::Start))
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('x')), &snapshot),
            Some(Action::Session(SessionCommand::Stop))
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('r')), &snapshot),
            Some(Action::Session(SessionCommand::Reset))
        );
        assert_eq!(key_to_action(key(KeyCode::Esc), &snapshot), Some(Action::Quit));
        assert_eq!(
            key_to_action(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &snapshot
            ),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_speed_editing_appends_to_field() {
        let snapshot = idle_at(1);
        assert_eq!(
            key_to_action(key(KeyCode::Char('5')), &snapshot),
            Some(Action::Session(SessionCommand::SetSpeed("15".to_string())))
        );
        assert_eq!(
            key_to_action(key(KeyCode::Backspace), &snapshot),
            Some(Action::Session(SessionCommand::SetSpeed(String::new())))
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('+')), &idle_at(4)),
            Some(Action::Session(SessionCommand::SetSpeed("5".to_string())))
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('-')), &idle_at(1)),
            Some(Action::Session(SessionCommand::SetSpeed("1".to_string())))
        );
    }

    #[test]
    fn test_speed_keys_ignored_while_active() {
        let snapshot = active();
        assert_eq!(key_to_action(key(KeyCode::Char('5')), &snapshot), None);
        assert_eq!(key_to_action(key(KeyCode::Backspace), &snapshot), None);
        assert_eq!(key_to_action(key(KeyCode::Char('+')), &snapshot), None);
        assert_eq!(
            key_to_action(key(KeyCode::Char('x')), &snapshot),
            Some(Action::Session(SessionCommand::Stop))
        );
    }

    #[test]
    fn test_selection_keys() {
        let snapshot = active();
        assert_eq!(key_to_action(key(KeyCode::Down), &snapshot), Some(Action::SelectNext));
        assert_eq!(key_to_action(key(KeyCode::Char('k')), &snapshot), Some(Action::SelectPrevious));
        assert_eq!(key_to_action(key(KeyCode::Char('z')), &snapshot), None);
    }
}
