/// StatsTable widget - the live box score
///
/// One row per player with the four tracked counters. A counter with a
/// visible delta annotation is drawn in the flash color with its increment
/// ("+3") beside it until the annotation expires.
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};

use crate::config::ThemeConfig;
use crate::formatting::{fit_width, format_delta};
use crate::live::session::{LiveSnapshot, LoadState};
use crate::tui::widgets::RenderableWidget;
use crate::types::{PlayerId, PlayerRecord, StatCounter};

const JERSEY_WIDTH: u16 = 4;
const POSITION_WIDTH: u16 = 5;
/// Value, space, delta label
const STAT_WIDTH: u16 = 9;

/// Widths of the flexible name and team columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    name: u16,
    team: u16,
}

impl Columns {
    fn for_width(width: u16) -> Self {
        let fixed = JERSEY_WIDTH + POSITION_WIDTH + STAT_WIDTH * StatCounter::ALL.len() as u16 + 2;
        let rest = width.saturating_sub(fixed);
        let name = rest * 55 / 100;
        Self {
            name,
            team: rest - name,
        }
    }

    fn stats_x(&self) -> u16 {
        JERSEY_WIDTH + self.name + 1 + self.team + 1 + POSITION_WIDTH
    }
}

#[derive(Debug)]
pub struct StatsTable<'a> {
    pub snapshot: &'a LiveSnapshot,
    pub selected: usize,
}

impl<'a> StatsTable<'a> {
    pub fn new(snapshot: &'a LiveSnapshot, selected: usize) -> Self {
        Self { snapshot, selected }
    }

    fn render_header(&self, area: Rect, cols: Columns, buf: &mut Buffer) {
        let style = Style::default().add_modifier(Modifier::BOLD);
        let mut text = format!(
            "{}{} {} {}",
            fit_width("#", JERSEY_WIDTH as usize),
            fit_width("Player", cols.name as usize),
            fit_width("Team", cols.team as usize),
            fit_width("Pos", POSITION_WIDTH as usize),
        );
        for counter in StatCounter::ALL {
            text.push_str(&fit_width(
                &format!("{:>4}", counter.abbrev()),
                STAT_WIDTH as usize,
            ));
        }
        buf.set_stringn(area.x, area.y, text, area.width as usize, style);
    }

    fn render_row(
        &self,
        idx: usize,
        player: &PlayerRecord,
        row: Rect,
        cols: Columns,
        buf: &mut Buffer,
        theme: &ThemeConfig,
    ) {
        let base = if idx == self.selected {
            Style::default()
                .fg(theme.selection_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let text = format!(
            "{}{} {} {}",
            fit_width(&player.jersey_label(), JERSEY_WIDTH as usize),
            fit_width(&player.player_name, cols.name as usize),
            fit_width(&player.team_name, cols.team as usize),
            fit_width(&player.position, POSITION_WIDTH as usize),
        );
        buf.set_stringn(row.x, row.y, text, row.width as usize, base);

        for (i, counter) in StatCounter::ALL.into_iter().enumerate() {
            let x = cols.stats_x() + STAT_WIDTH * i as u16;
            if x >= row.width {
                break;
            }
            let max = (row.width - x) as usize;

            let (cell, style) = match self.snapshot.delta_for(PlayerId(idx), counter) {
                Some(delta) => (
                    format!("{:>4} {}", player.counter(counter), format_delta(delta.amount)),
                    Style::default()
                        .fg(theme.flash_fg)
                        .add_modifier(Modifier::BOLD),
                ),
                None => (format!("{:>4}", player.counter(counter)), base),
            };
            buf.set_stringn(row.x + x, row.y, fit_width(&cell, STAT_WIDTH as usize), max, style);
        }
    }

    fn render_message(&self, area: Rect, buf: &mut Buffer, text: &str, style: Style) {
        buf.set_stringn(area.x + 1, area.y, text, area.width.saturating_sub(1) as usize, style);
    }
}

/// First visible row so that `selected` stays on screen
fn scroll_offset(selected: usize, visible: usize, total: usize) -> usize {
    if visible == 0 || selected < visible {
        return 0;
    }
    (selected + 1 - visible).min(total.saturating_sub(visible))
}

impl RenderableWidget for StatsTable<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &ThemeConfig) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let players = self.snapshot.players.as_slice();
        match &self.snapshot.load {
            LoadState::Loading if players.is_empty() => {
                self.render_message(area, buf, "Loading players…", Style::default());
                return;
            }
            LoadState::Failed(message) => {
                self.render_message(area, buf, message, Style::default().fg(theme.error_fg));
                return;
            }
            _ if players.is_empty() => {
                self.render_message(area, buf, "No players", Style::default());
                return;
            }
            _ => {}
        }

        let cols = Columns::for_width(area.width);
        self.render_header(area, cols, buf);

        let visible = area.height.saturating_sub(1) as usize;
        let offset = scroll_offset(self.selected, visible, players.len());
        for (row, (idx, player)) in players
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .enumerate()
        {
            let row = Rect {
                y: area.y + 1 + row as u16,
                height: 1,
                ..area
            };
            self.render_row(idx, player, row, cols, buf, theme);
        }
    }
}
