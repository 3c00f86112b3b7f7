//! Game feed rows and the tradable selections flattened from them.
//!
//! A game carries conditions (markets), each condition carries
//! outcomes, and only outcomes under an `Active` condition are
//! tradable. Outcome labels are resolved against an embedded
//! dictionary; unresolved ids stay visibly [`Label::Unknown`] instead
//! of being masked with a placeholder.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire;

/// A named entity on the feed: league, country, sport, or participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Named {
    pub name: String,
}

/// One outcome row inside a condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    #[serde(deserialize_with = "wire::loose_string")]
    pub outcome_id: String,
    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub current_odds: Option<String>,
}

/// A betting market attached to a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(deserialize_with = "wire::loose_string")]
    pub condition_id: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

impl Condition {
    /// Only `Active` conditions are tradable.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.as_deref() == Some("Active")
    }
}

/// A game row from the data feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(deserialize_with = "wire::loose_string")]
    pub game_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub league: Option<Named>,
    #[serde(default)]
    pub country: Option<Named>,
    #[serde(default)]
    pub sport: Option<Named>,
    #[serde(default)]
    pub participants: Vec<Named>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl Game {
    /// Title for display, falling back to the participant names and
    /// then to the game id.
    #[must_use]
    pub fn display_title(&self) -> String {
        if let Some(title) = self.title.as_deref() {
            if !title.trim().is_empty() {
                return title.to_string();
            }
        }
        if !self.participants.is_empty() {
            let names: Vec<&str> = self.participants.iter().map(|p| p.name.as_str()).collect();
            return names.join(" vs ");
        }
        format!("game {}", self.game_id)
    }

    /// Start time decoded from the feed's unix-seconds string.
    #[must_use]
    pub fn starts_at_utc(&self) -> Option<DateTime<Utc>> {
        let seconds: i64 = self.starts_at.as_deref()?.trim().parse().ok()?;
        DateTime::from_timestamp(seconds, 0)
    }
}

/// An outcome label resolved from the embedded dictionary.
///
/// Serializes as the label string when known and as `null` when not,
/// so JSON consumers can tell an unlabeled outcome from a labeled one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Label {
    Known(String),
    Unknown,
}

impl Label {
    pub fn known(name: impl Into<String>) -> Self {
        Label::Known(name.into())
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Label::Known(_))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Known(name) => f.write_str(name),
            Label::Unknown => f.write_str("unknown"),
        }
    }
}

/// A single tradable selection flattened out of the game feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub game_id: String,
    pub game_title: String,
    pub condition_id: String,
    pub outcome_id: String,
    pub current_odds: String,
    pub market_label: Label,
    pub selection_label: Label,
}
