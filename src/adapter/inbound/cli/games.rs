//! Handler for the `games` command.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::command::GamesArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::feed::{flatten_selections, FeedClient, GamesQuery};
use crate::config::NetworkProfile;
use crate::domain::Game;
use crate::error::Result;

/// List upcoming games with their open selections.
pub async fn execute(profile_path: Option<&Path>, args: &GamesArgs) -> Result<()> {
    if output::is_quiet() && !output::is_json() {
        return Ok(());
    }

    let profile = NetworkProfile::resolve(profile_path)?;
    let feed = FeedClient::new(&profile);
    let query = GamesQuery {
        first: args.first,
        sport: args.sport.clone(),
        country: args.country.clone(),
        order: args.order_by.into(),
        ..GamesQuery::default()
    };

    let pb = output::spinner("Fetching games");
    let games = match feed.games(&query).await {
        Ok(games) => {
            output::spinner_success(&pb, "Fetching games");
            games
        }
        Err(err) => {
            output::spinner_fail(&pb, "Fetching games");
            return Err(err);
        }
    };

    if output::is_json() {
        let rows: Vec<_> = games
            .iter()
            .map(|game| {
                json!({
                    "gameId": game.game_id,
                    "title": game.display_title(),
                    "sport": game.sport.as_ref().map(|s| s.name.as_str()),
                    "league": game.league.as_ref().map(|l| l.name.as_str()),
                    "country": game.country.as_ref().map(|c| c.name.as_str()),
                    "startsAt": game.starts_at_utc().map(|t| t.to_rfc3339()),
                    "selections": flatten_selections(std::slice::from_ref(game)),
                })
            })
            .collect();
        output::json_output(json!({
            "command": "games",
            "count": rows.len(),
            "games": rows,
        }));
        return Ok(());
    }

    if games.is_empty() {
        output::warning("No games matched the query");
        return Ok(());
    }

    for game in &games {
        render_game(game);
    }

    output::hint(&format!(
        "place a wager with {}",
        output::highlight("punter place --condition-id <ID> --outcome-id <ID>")
    ));

    Ok(())
}

fn render_game(game: &Game) {
    output::section(&game.display_title());
    output::field("Game", &game.game_id);
    match (&game.sport, &game.league) {
        (Some(sport), Some(league)) => {
            output::field("Event", format!("{} / {}", sport.name, league.name));
        }
        (Some(sport), None) => output::field("Event", &sport.name),
        (None, Some(league)) => output::field("Event", &league.name),
        (None, None) => {}
    }
    if let Some(starts) = game.starts_at_utc() {
        output::field("Starts", starts.format("%Y-%m-%d %H:%M UTC"));
    }

    let selections = flatten_selections(std::slice::from_ref(game));
    if selections.is_empty() {
        output::note("(no open selections)");
        return;
    }
    for selection in &selections {
        output::note(&format!(
            "{} - {} @ {}  {}",
            selection.market_label,
            selection.selection_label,
            selection.current_odds,
            output::muted(format!(
                "--condition-id {} --outcome-id {}",
                selection.condition_id, selection.outcome_id
            )),
        ));
    }
}
