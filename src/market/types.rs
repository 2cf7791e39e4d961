//! Record types returned by the Manifold Markets API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};
use time::OffsetDateTime;

/// Placeholder shown when a market carries no question text.
pub const UNKNOWN_QUESTION: &str = "Unknown";

/// Filter accepted by the search endpoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SearchFilter {
    /// Every market.
    #[default]
    All,
    /// Markets still accepting bets.
    Open,
    /// Markets past their close time.
    Closed,
    /// Markets with a resolution.
    Resolved,
}

/// One prediction market as returned by `/markets` and friends.
///
/// Well-known keys are typed; everything else lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// Market ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Market question text.
    #[serde(default)]
    pub question: Option<String>,
    /// Username of the market creator.
    #[serde(default)]
    pub creator_username: Option<String>,
    /// Public URL of the market.
    #[serde(default)]
    pub url: Option<String>,
    /// Outcome type (e.g. "BINARY", "MULTIPLE_CHOICE").
    #[serde(default)]
    pub outcome_type: Option<String>,
    /// Market mechanism (e.g. "cpmm-1").
    #[serde(default)]
    pub mechanism: Option<String>,
    /// Current probability for binary markets.
    #[serde(default)]
    pub probability: Option<f64>,
    /// Total traded volume in mana.
    #[serde(default)]
    pub volume: Option<f64>,
    /// Whether the market has resolved.
    #[serde(default)]
    pub is_resolved: Option<bool>,
    /// Creation time, Unix milliseconds.
    #[serde(default)]
    pub created_time: Option<i64>,
    /// Close time, Unix milliseconds.
    #[serde(default)]
    pub close_time: Option<i64>,
    /// Remaining keys, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Market {
    /// Market built from just a question, mostly for fixtures.
    pub fn with_question(question: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            ..Self::default()
        }
    }

    /// Question text, or [`UNKNOWN_QUESTION`] when absent.
    pub fn question_or_unknown(&self) -> &str {
        self.question.as_deref().unwrap_or(UNKNOWN_QUESTION)
    }

    /// Look up any key the record carried that is not a typed field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Creation time as a timestamp.
    pub fn created_at(&self) -> Option<OffsetDateTime> {
        self.created_time.and_then(from_unix_millis)
    }

    /// Close time as a timestamp.
    pub fn closes_at(&self) -> Option<OffsetDateTime> {
        self.close_time.and_then(from_unix_millis)
    }

    /// Check if the market is past its close time.
    pub fn is_closed(&self) -> bool {
        self.closes_at()
            .map(|close| OffsetDateTime::now_utc() >= close)
            .unwrap_or(false)
    }
}

/// A single bet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    /// Bet ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Market the bet was placed on.
    #[serde(default)]
    pub contract_id: Option<String>,
    /// Bettor's user ID.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Amount in mana.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Outcome bet on ("YES"/"NO" or an answer ID).
    #[serde(default)]
    pub outcome: Option<String>,
    /// Shares received.
    #[serde(default)]
    pub shares: Option<f64>,
    /// Probability before the bet.
    #[serde(default)]
    pub prob_before: Option<f64>,
    /// Probability after the bet.
    #[serde(default)]
    pub prob_after: Option<f64>,
    /// Creation time, Unix milliseconds.
    #[serde(default)]
    pub created_time: Option<i64>,
    /// Remaining keys, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bet {
    /// Creation time as a timestamp.
    pub fn created_at(&self) -> Option<OffsetDateTime> {
        self.created_time.and_then(from_unix_millis)
    }
}

/// A Manifold user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Handle.
    #[serde(default)]
    pub username: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Mana balance.
    #[serde(default)]
    pub balance: Option<f64>,
    /// Lifetime deposits.
    #[serde(default)]
    pub total_deposits: Option<f64>,
    /// Creation time, Unix milliseconds.
    #[serde(default)]
    pub created_time: Option<i64>,
    /// Remaining keys, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A user's holding in one market, as returned by `/user/{username}/positions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Market the position is in.
    #[serde(default)]
    pub contract_id: Option<String>,
    /// Whether any shares are still held.
    #[serde(default)]
    pub has_shares: Option<bool>,
    /// Mana put in.
    #[serde(default)]
    pub invested: Option<f64>,
    /// Current value of the shares.
    #[serde(default)]
    pub payout: Option<f64>,
    /// Profit so far, realized or not.
    #[serde(default)]
    pub profit: Option<f64>,
    /// Remaining keys, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn from_unix_millis(ms: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000).ok()
}
