pub mod players;
pub mod watch;

use crate::formatting::{format_header, format_player_line, player_table_header};
use crate::types::PlayerRecord;

/// Print a titled plain-text box score, grouped by team in roster order
pub fn print_box_score(title: &str, players: &[PlayerRecord]) {
    print!("\n{}", format_header(title, true));

    if players.is_empty() {
        println!("No players\n");
        return;
    }

    let header = player_table_header();
    println!("{}", header);
    println!("{}", "─".repeat(header.chars().count()));

    let mut teams: Vec<&str> = Vec::new();
    for player in players {
        if !teams.contains(&player.team_name.as_str()) {
            teams.push(&player.team_name);
        }
    }
    for team in teams {
        for player in players.iter().filter(|p| p.team_name == team) {
            println!("{}", format_player_line(player));
        }
    }
    println!();
}
