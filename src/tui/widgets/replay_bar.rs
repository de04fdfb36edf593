/// ReplayBar widget - one line with phase, speed field and replay clock
///
/// The most recent server status, when there is one, is right-aligned.
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use crate::config::ThemeConfig;
use crate::formatting::format_elapsed;
use crate::live::message::ServerStatus;
use crate::live::replay::{ReplayPhase, ReplayState};
use crate::tui::widgets::RenderableWidget;

#[derive(Debug)]
pub struct ReplayBar<'a> {
    pub replay: &'a ReplayState,
    pub server_status: Option<&'a ServerStatus>,
    pub connecting: bool,
}

impl<'a> ReplayBar<'a> {
    pub fn new(replay: &'a ReplayState) -> Self {
        Self {
            replay,
            server_status: None,
            connecting: false,
        }
    }

    pub fn with_connecting(mut self, connecting: bool) -> Self {
        self.connecting = connecting;
        self
    }

    pub fn with_server_status(mut self, status: Option<&'a ServerStatus>) -> Self {
        self.server_status = status;
        self
    }

    fn server_text(&self) -> Option<String> {
        let status = self.server_status?;
        let text = match &status.error {
            Some(error) => format!("Server: {} ({})", status.status, error),
            None => match &status.current_replay_time {
                Some(time) => format!("Server: {} {}", status.status, time),
                None => format!("Server: {}", status.status),
            },
        };
        Some(text)
    }
}

impl RenderableWidget for ReplayBar<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &ThemeConfig) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let phase = self.replay.phase();
        let (label, phase_style) = if self.connecting {
            ("CONNECTING", Style::default().fg(theme.selection_fg))
        } else {
            (phase.label(), phase_style(phase, theme))
        };
        // Highlighted only while it can be edited
        let speed_style = if phase.is_active() {
            Style::default()
        } else {
            Style::default().fg(theme.selection_fg)
        };
        let speed_text = match self.replay.speed_input() {
            "" => "_".to_string(),
            input => input.to_string(),
        };

        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("{:<7}", label), phase_style),
            Span::raw(" Speed: "),
            Span::styled(speed_text, speed_style),
            Span::raw("x  Elapsed: "),
            Span::raw(format_elapsed(self.replay.elapsed_secs())),
        ]);
        let left_width = line.width() as u16;
        buf.set_line(area.x, area.y, &line, area.width);

        if let Some(text) = self.server_text() {
            let width = text.width() as u16;
            if left_width + width + 2 <= area.width {
                let x = area.right() - width - 1;
                buf.set_string(x, area.y, text, Style::default().add_modifier(Modifier::DIM));
            }
        }
    }

    fn preferred_height(&self) -> Option<u16> {
        Some(1)
    }
}

fn phase_style(phase: ReplayPhase, theme: &ThemeConfig) -> Style {
    match phase {
        ReplayPhase::Active => Style::default()
            .fg(theme.flash_fg)
            .add_modifier(Modifier::BOLD),
        ReplayPhase::Stopped => Style::default().fg(theme.error_fg),
        ReplayPhase::Idle => Style::default().add_modifier(Modifier::DIM),
    }
}
