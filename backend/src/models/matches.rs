use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::MatchError;

/// Stored interest relationship between two users, keyed by the canonical pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub user_a: String,
    pub user_b: String,
    /// Actor of the first positive swipe on this pair.
    pub initiated_by: String,
    pub is_mutual: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn pair(&self) -> CanonicalPair {
        CanonicalPair::from_ordered(self.user_a.clone(), self.user_b.clone())
    }

    pub fn involves(&self, user_id: &str) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Nope,
    Super,
}

impl SwipeAction {
    /// `like` and `super` weigh the same for match formation.
    pub fn is_positive(self) -> bool {
        matches!(self, SwipeAction::Like | SwipeAction::Super)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SwipeAction::Like => "like",
            SwipeAction::Nope => "nope",
            SwipeAction::Super => "super",
        }
    }
}

impl FromStr for SwipeAction {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(SwipeAction::Like),
            "nope" => Ok(SwipeAction::Nope),
            "super" => Ok(SwipeAction::Super),
            other => Err(MatchError::InvalidInput(format!(
                "action must be one of like, nope, super (got '{}')",
                other
            ))),
        }
    }
}

impl fmt::Display for SwipeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unordered pair of user ids, stored with `user_a < user_b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPair {
    user_a: String,
    user_b: String,
}

impl CanonicalPair {
    pub fn new(actor: &str, target: &str) -> Result<Self, MatchError> {
        if actor.trim().is_empty() {
            return Err(MatchError::InvalidInput("actor id is required".to_string()));
        }
        if target.trim().is_empty() {
            return Err(MatchError::InvalidInput("target user id is required".to_string()));
        }
        if actor == target {
            return Err(MatchError::InvalidInput("cannot swipe on yourself".to_string()));
        }

        let (user_a, user_b) = if actor < target {
            (actor, target)
        } else {
            (target, actor)
        };

        Ok(Self {
            user_a: user_a.to_string(),
            user_b: user_b.to_string(),
        })
    }

    /// Rebuild a pair read back from storage, already in canonical order.
    pub(crate) fn from_ordered(user_a: String, user_b: String) -> Self {
        Self { user_a, user_b }
    }

    pub fn user_a(&self) -> &str {
        &self.user_a
    }

    pub fn user_b(&self) -> &str {
        &self.user_b
    }
}

/// What a single swipe did to the pair's record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// `nope`: nothing persisted.
    Passed,
    Created(Match),
    BecameMutual(Match),
    Unchanged(Match),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    #[serde(default)]
    pub target_user_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}
