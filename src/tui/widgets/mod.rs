/// Widget-based rendering for the live view
///
/// Widgets render themselves directly to a ratatui Buffer so each one can be
/// tested against a plain test buffer.
pub mod replay_bar;
pub mod stats_table;
pub mod status_bar;

pub use replay_bar::ReplayBar;
pub use stats_table::StatsTable;
pub use status_bar::{KeyHint, StatusBar};

use ratatui::{buffer::Buffer, layout::Rect};

use crate::config::ThemeConfig;

/// Core trait for renderable widgets
pub trait RenderableWidget {
    /// Render this widget into the provided buffer
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &ThemeConfig);

    /// Get the preferred height of this widget
    ///
    /// Returns None if the widget can adapt to any height.
    fn preferred_height(&self) -> Option<u16> {
        None
    }
}
