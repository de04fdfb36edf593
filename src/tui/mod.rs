pub mod keys;
pub mod widgets;

#[cfg(test)]
pub mod testing;

pub use keys::{key_to_action, Action};

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    Terminal,
};
use tracing::debug;

use crate::config::Config;
use crate::live::session::{LiveSnapshot, LoadState, SessionHandle};
use widgets::status_bar::live_hints;
use widgets::{RenderableWidget, ReplayBar, StatsTable, StatusBar};

/// Keyboard poll period, also the redraw cadence while idle
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// UI-only state; everything else comes from the session snapshot
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub selected: usize,
}

impl ViewState {
    fn apply(&mut self, action: &Action, player_count: usize) {
        match action {
            Action::SelectNext if self.selected + 1 < player_count => self.selected += 1,
            Action::SelectPrevious => self.selected = self.selected.saturating_sub(1),
            _ => {}
        }
    }

    fn clamp(&mut self, player_count: usize) {
        self.selected = self.selected.min(player_count.saturating_sub(1));
    }
}

/// Main entry point for TUI mode
pub async fn run(handle: SessionHandle, config: Config) -> Result<(), io::Error> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &handle, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    handle.shutdown().await;
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    handle: &SessionHandle,
    config: &Config,
) -> Result<(), io::Error> {
    let mut view = ViewState::default();

    loop {
        let snapshot = handle.snapshot();
        view.clamp(snapshot.players.len());

        terminal.draw(|f| {
            let area = f.area();
            render_live_view(area, f.buffer_mut(), &snapshot, &view, config);
        })?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key_to_action(key, &snapshot) {
            Some(Action::Quit) => {
                debug!("ACTION: Quitting application");
                break;
            }
            Some(Action::Session(command)) => {
                if !handle.send(command) {
                    debug!("ACTION: Session has ended, quitting");
                    break;
                }
            }
            Some(action) => view.apply(&action, snapshot.players.len()),
            None => {}
        }
    }

    Ok(())
}

/// Draw the whole live view: replay bar, box score and status bar
pub fn render_live_view(
    area: Rect,
    buf: &mut Buffer,
    snapshot: &LiveSnapshot,
    view: &ViewState,
    config: &Config,
) {
    let theme = &config.theme;
    let [top, body, bottom] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(area);

    ReplayBar::new(&snapshot.replay)
        .with_server_status(snapshot.server_status.as_ref())
        .with_connecting(snapshot.connecting)
        .render(top, buf, theme);

    StatsTable::new(snapshot, view.selected).render(body, buf, theme);

    let error = match &snapshot.load {
        LoadState::Failed(message) => Some(message.clone()),
        _ => snapshot.connection_error.clone(),
    };
    StatusBar::new()
        .with_error(error)
        .with_loaded(snapshot.loaded_at, snapshot.players.len())
        .with_time_format(config.time_format.as_str())
        .with_hints(live_hints(snapshot.replay.is_active()))
        .render(bottom, buf, theme);
}
