//! Game data feed and bet history clients.
//!
//! Both endpoints are GraphQL services queried with plain POST
//! requests. A `200` response can still carry query errors, so the
//! response envelope is checked before any data is handed out.

pub mod labels;

use std::time::Duration;

use alloy_primitives::Address;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::NetworkProfile;
use crate::domain::{Bet, Game, Selection};
use crate::error::{FeedError, Result};

/// Largest page any single query may request.
pub const MAX_PAGE_SIZE: u32 = 50;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const GAMES_QUERY: &str = r"
query Games($first: Int!, $where: Game_filter, $orderBy: Game_orderBy, $orderDirection: OrderDirection) {
  games(first: $first, where: $where, orderBy: $orderBy, orderDirection: $orderDirection) {
    gameId
    title
    state
    startsAt
    league { name }
    country { name }
    sport { name }
    participants { name }
    conditions {
      conditionId
      state
      outcomes {
        outcomeId
        currentOdds
      }
    }
  }
}
";

const BETS_QUERY: &str = r"
query BettorBets($first: Int!, $where: V3Bet_filter, $orderBy: V3Bet_orderBy, $orderDirection: OrderDirection) {
  v3Bets(first: $first, where: $where, orderBy: $orderBy, orderDirection: $orderDirection) {
    betId
    status
    result
    isRedeemable
    isRedeemed
    amount
    payout
    createdBlockTimestamp
    resolvedBlockTimestamp
  }
}
";

/// Ordering choices for game listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOrder {
    /// Busiest markets first.
    Turnover,
    /// Soonest kick-off first.
    StartsAt,
}

impl GameOrder {
    const fn order_by(self) -> &'static str {
        match self {
            GameOrder::Turnover => "turnover",
            GameOrder::StartsAt => "startsAt",
        }
    }

    const fn direction(self) -> &'static str {
        match self {
            GameOrder::Turnover => "desc",
            GameOrder::StartsAt => "asc",
        }
    }
}

/// Parameters for a game listing query.
#[derive(Debug, Clone)]
pub struct GamesQuery {
    pub first: u32,
    /// Game state filter, `Prematch` by default.
    pub state: String,
    pub sport: Option<String>,
    pub country: Option<String>,
    pub order: GameOrder,
}

impl Default for GamesQuery {
    fn default() -> Self {
        Self {
            first: 5,
            state: "Prematch".to_string(),
            sport: None,
            country: None,
            order: GameOrder::Turnover,
        }
    }
}

impl GamesQuery {
    fn clamped_first(&self) -> u32 {
        self.first.clamp(1, MAX_PAGE_SIZE)
    }

    fn variables(&self) -> Value {
        let mut where_clause = json!({ "state": self.state });
        if let Some(sport) = &self.sport {
            where_clause["sport_"] = json!({ "slug": sport });
        }
        if let Some(country) = &self.country {
            where_clause["country_"] = json!({ "slug": country });
        }
        json!({
            "first": self.clamped_first(),
            "where": where_clause,
            "orderBy": self.order.order_by(),
            "orderDirection": self.order.direction(),
        })
    }
}

/// Parameters for a bet history query.
#[derive(Debug, Clone)]
pub struct BetsQuery {
    pub bettor: Address,
    pub redeemable_only: bool,
    pub first: u32,
}

impl BetsQuery {
    fn variables(&self) -> Value {
        // The subgraph indexes bettor addresses lowercased.
        let mut where_clause = json!({ "bettor": self.bettor.to_string().to_ascii_lowercase() });
        if self.redeemable_only {
            where_clause["isRedeemable"] = json!(true);
        }
        json!({
            "first": self.first.clamp(1, MAX_PAGE_SIZE),
            "where": where_clause,
            "orderBy": "createdBlockTimestamp",
            "orderDirection": "desc",
        })
    }
}

#[derive(Debug, Deserialize)]
struct GraphResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphError>>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GamesData {
    #[serde(default)]
    games: Vec<Game>,
}

#[derive(Debug, Deserialize)]
struct BetsData {
    #[serde(rename = "v3Bets", default)]
    bets: Vec<Bet>,
}

/// Client for the game data feed and the bets subgraph.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: Client,
    data_feed_url: String,
    bets_subgraph_url: String,
}

impl FeedClient {
    /// Builds a client against the profile's endpoints.
    #[must_use]
    pub fn new(profile: &NetworkProfile) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                warn!("failed to build HTTP client with timeouts, using defaults: {err}");
                Client::new()
            });
        Self {
            http,
            data_feed_url: profile.data_feed_url.clone(),
            bets_subgraph_url: profile.bets_subgraph_url.clone(),
        }
    }

    /// Fetches games matching the query.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] on transport failure, a non-2xx status,
    /// or GraphQL-level query errors.
    pub async fn games(&self, query: &GamesQuery) -> Result<Vec<Game>> {
        debug!(first = query.clamped_first(), state = %query.state, "querying game feed");
        let data: GamesData = self
            .post_query(&self.data_feed_url, GAMES_QUERY, query.variables())
            .await?;
        debug!(count = data.games.len(), "game feed answered");
        Ok(data.games)
    }

    /// Fetches a bettor's bet history, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] on transport failure, a non-2xx status,
    /// or GraphQL-level query errors.
    pub async fn bets(&self, query: &BetsQuery) -> Result<Vec<Bet>> {
        debug!(
            bettor = %query.bettor,
            redeemable_only = query.redeemable_only,
            "querying bet history"
        );
        let data: BetsData = self
            .post_query(&self.bets_subgraph_url, BETS_QUERY, query.variables())
            .await?;
        Ok(data.bets)
    }

    async fn post_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        let response = self
            .http
            .post(url)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(FeedError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            }
            .into());
        }
        let body = response.text().await.map_err(FeedError::Transport)?;
        let envelope: GraphResponse<T> = serde_json::from_str(&body).map_err(FeedError::Decode)?;
        if let Some(errors) = envelope.errors {
            if !errors.is_empty() {
                let joined = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(FeedError::Query(joined).into());
            }
        }
        envelope.data.ok_or_else(|| FeedError::MissingData.into())
    }
}

/// Flattens games into tradable selections, keeping feed order and
/// skipping conditions that are not active.
#[must_use]
pub fn flatten_selections(games: &[Game]) -> Vec<Selection> {
    let mut selections = Vec::new();
    for game in games {
        for condition in game.conditions.iter().filter(|c| c.is_active()) {
            for outcome in &condition.outcomes {
                let (market_label, selection_label) = labels::outcome_labels(&outcome.outcome_id);
                selections.push(Selection {
                    game_id: game.game_id.clone(),
                    game_title: game.display_title(),
                    condition_id: condition.condition_id.clone(),
                    outcome_id: outcome.outcome_id.clone(),
                    current_odds: outcome
                        .current_odds
                        .clone()
                        .unwrap_or_else(|| "1".to_string()),
                    market_label,
                    selection_label,
                });
            }
        }
    }
    selections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Label;
    use std::str::FromStr;

    fn sample_games() -> Vec<Game> {
        serde_json::from_str(
            r#"[{
                "gameId": "1001",
                "title": "Alpha vs Beta",
                "conditions": [
                    {
                        "conditionId": "c-active",
                        "state": "Active",
                        "outcomes": [
                            {"outcomeId": "29", "currentOdds": "1.85"},
                            {"outcomeId": "31"}
                        ]
                    },
                    {
                        "conditionId": "c-paused",
                        "state": "Paused",
                        "outcomes": [{"outcomeId": "30", "currentOdds": "3.2"}]
                    }
                ]
            }]"#,
        )
        .unwrap()
    }

    #[test]
    fn games_variables_default_to_prematch_by_turnover() {
        let query = GamesQuery::default();
        let variables = query.variables();
        assert_eq!(variables["first"], 5);
        assert_eq!(variables["where"]["state"], "Prematch");
        assert_eq!(variables["orderBy"], "turnover");
        assert_eq!(variables["orderDirection"], "desc");
        assert!(variables["where"].get("sport_").is_none());
    }

    #[test]
    fn start_time_ordering_is_ascending() {
        let query = GamesQuery {
            order: GameOrder::StartsAt,
            ..GamesQuery::default()
        };
        let variables = query.variables();
        assert_eq!(variables["orderBy"], "startsAt");
        assert_eq!(variables["orderDirection"], "asc");
    }

    #[test]
    fn slug_filters_nest_under_where() {
        let query = GamesQuery {
            sport: Some("football".into()),
            country: Some("england".into()),
            ..GamesQuery::default()
        };
        let variables = query.variables();
        assert_eq!(variables["where"]["sport_"]["slug"], "football");
        assert_eq!(variables["where"]["country_"]["slug"], "england");
    }

    #[test]
    fn page_size_is_clamped() {
        let oversized = GamesQuery {
            first: 500,
            ..GamesQuery::default()
        };
        assert_eq!(oversized.variables()["first"], 50);

        let zero = GamesQuery {
            first: 0,
            ..GamesQuery::default()
        };
        assert_eq!(zero.variables()["first"], 1);
    }

    #[test]
    fn bets_variables_lowercase_the_bettor() {
        let query = BetsQuery {
            bettor: Address::from_str("0x8dA05c0021e6b35865FDC959c54dCeF3A4AbBa9d").unwrap(),
            redeemable_only: false,
            first: 50,
        };
        let variables = query.variables();
        assert_eq!(
            variables["where"]["bettor"],
            "0x8da05c0021e6b35865fdc959c54dcef3a4abba9d"
        );
        assert!(variables["where"].get("isRedeemable").is_none());
        assert_eq!(variables["orderBy"], "createdBlockTimestamp");
        assert_eq!(variables["orderDirection"], "desc");
    }

    #[test]
    fn redeemable_filter_is_opt_in() {
        let query = BetsQuery {
            bettor: Address::ZERO,
            redeemable_only: true,
            first: 10,
        };
        assert_eq!(query.variables()["where"]["isRedeemable"], true);
    }

    #[test]
    fn flatten_skips_inactive_conditions_and_keeps_order() {
        let selections = flatten_selections(&sample_games());
        assert_eq!(selections.len(), 2);
        assert_eq!(selections[0].outcome_id, "29");
        assert_eq!(selections[1].outcome_id, "31");
        assert!(selections.iter().all(|s| s.condition_id == "c-active"));
    }

    #[test]
    fn flatten_defaults_missing_odds_to_one() {
        let selections = flatten_selections(&sample_games());
        assert_eq!(selections[0].current_odds, "1.85");
        assert_eq!(selections[1].current_odds, "1");
    }

    #[test]
    fn flatten_labels_known_outcomes() {
        let selections = flatten_selections(&sample_games());
        assert_eq!(selections[0].market_label, Label::known("Full Time Result"));
        assert_eq!(selections[0].selection_label, Label::known("1"));
    }

    #[test]
    fn graph_errors_are_joined() {
        let envelope: GraphResponse<GamesData> = serde_json::from_str(
            r#"{"errors": [{"message": "bad field"}, {"message": "bad filter"}]}"#,
        )
        .unwrap();
        let errors = envelope.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "bad field");
    }
}
