use crate::commands::print_box_score;
use crate::data_provider::PlayerDataProvider;
use crate::types::NBA_LEAGUE_ABBREV;
use anyhow::{Context, Result};

pub async fn run(client: &dyn PlayerDataProvider) -> Result<()> {
    let players = client
        .players()
        .await
        .context("Failed to load players")?;

    print_box_score(
        &format!("{} Players ({})", NBA_LEAGUE_ABBREV, players.len()),
        &players,
    );
    Ok(())
}
