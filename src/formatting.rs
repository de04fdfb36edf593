use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::types::PlayerRecord;

/// Format a header with text and an underline of matching width
pub fn format_header(text: &str, double_line: bool) -> String {
    let separator = if double_line { "═" } else { "─" };
    format!("{}\n{}\n", text, separator.repeat(text.width()))
}

/// Replay clock as `MM:SS`, or `H:MM:SS` past the hour
pub fn format_elapsed(secs: u64) -> String {
    let (hours, minutes, seconds) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Increment label shown next to a counter
pub fn format_delta(amount: u32) -> String {
    format!("+{}", amount)
}

/// Pad or truncate `text` to exactly `width` terminal columns
///
/// Truncated text ends in `…`.
pub fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return format!("{}{}", text, " ".repeat(width - text.width()));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// One row of the plain-text box score
pub fn format_player_line(player: &PlayerRecord) -> String {
    format!(
        "{:>3} {} {} {:>4} {:>4} {:>4} {:>4}",
        player.jersey_label(),
        fit_width(&player.player_name, 24),
        fit_width(&player.team_name, 22),
        player.points,
        player.rebounds,
        player.assists,
        player.fouls,
    )
}

/// Header matching [`format_player_line`]
pub fn player_table_header() -> String {
    format!(
        "{:>3} {} {} {:>4} {:>4} {:>4} {:>4}",
        "#",
        fit_width("Player", 24),
        fit_width("Team", 22),
        "PTS",
        "REB",
        "AST",
        "PF",
    )
}
