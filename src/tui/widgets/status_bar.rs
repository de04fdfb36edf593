/// StatusBar widget - displays status information and keyboard hints at the bottom of the screen
///
/// Two lines: a horizontal separator, then either the current error or the
/// key hints on the left, and the roster load time on the right.
use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use crate::config::ThemeConfig;
use crate::tui::widgets::RenderableWidget;

/// Represents a keyboard hint displayed in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    /// The keyboard key (e.g., "s", "q")
    pub key: String,
    /// The action description (e.g., "Start", "Quit")
    pub action: String,
}

impl KeyHint {
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Hints for the live view, depending on whether a replay is running
pub fn live_hints(active: bool) -> Vec<KeyHint> {
    if active {
        vec![
            KeyHint::new("x", "Stop"),
            KeyHint::new("r", "Reset"),
            KeyHint::new("↑↓", "Select"),
            KeyHint::new("q", "Quit"),
        ]
    } else {
        vec![
            KeyHint::new("s", "Start"),
            KeyHint::new("r", "Reset"),
            KeyHint::new("0-9 +/-", "Speed"),
            KeyHint::new("↑↓", "Select"),
            KeyHint::new("q", "Quit"),
        ]
    }
}

/// Widget for displaying status information and keyboard hints
#[derive(Debug)]
pub struct StatusBar {
    pub error_message: Option<String>,
    pub loaded_at: Option<DateTime<Local>>,
    pub player_count: usize,
    pub time_format: String,
    pub hints: Vec<KeyHint>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            error_message: None,
            loaded_at: None,
            player_count: 0,
            time_format: "%H:%M:%S".to_string(),
            hints: live_hints(false),
        }
    }

    pub fn with_error(mut self, error: Option<impl Into<String>>) -> Self {
        self.error_message = error.map(Into::into);
        self
    }

    pub fn with_loaded(mut self, loaded_at: Option<DateTime<Local>>, player_count: usize) -> Self {
        self.loaded_at = loaded_at;
        self.player_count = player_count;
        self
    }

    pub fn with_time_format(mut self, time_format: impl Into<String>) -> Self {
        self.time_format = time_format.into();
        self
    }

    pub fn with_hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    fn build_left_line(&self, theme: &ThemeConfig) -> Line<'static> {
        if let Some(msg) = &self.error_message {
            return Line::from(vec![
                Span::raw(" "),
                Span::styled(format!("ERROR: {}", msg), Style::default().fg(theme.error_fg)),
            ]);
        }

        let key_style = Style::default()
            .fg(theme.selection_fg)
            .add_modifier(Modifier::BOLD);
        let mut spans = Vec::new();
        for hint in &self.hints {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(hint.key.clone(), key_style));
            spans.push(Span::raw(format!(" {} ", hint.action)));
        }
        Line::from(spans)
    }

    fn build_right_text(&self) -> String {
        match self.loaded_at {
            Some(at) => format!(
                "{} players @ {}",
                self.player_count,
                at.format(&self.time_format)
            ),
            None => "---".to_string(),
        }
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderableWidget for StatusBar {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &ThemeConfig) {
        if area.height < 2 || area.width == 0 {
            return;
        }

        let separator = "─".repeat(area.width as usize);
        buf.set_string(area.x, area.y, separator, Style::default());

        let y = area.y + 1;
        let right = self.build_right_text();
        let right_width = right.width() as u16 + 1;
        let left_max = area.width.saturating_sub(right_width + 1);
        buf.set_line(area.x, y, &self.build_left_line(theme), left_max);

        if right_width < area.width {
            buf.set_string(area.right() - right_width, y, right, Style::default());
        }
    }

    fn preferred_height(&self) -> Option<u16> {
        Some(2)
    }
}
