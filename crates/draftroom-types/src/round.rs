//! Round model: one timed bidding window for a position group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{RoundId, SeasonId};

/// Lifecycle status of a round.
///
/// Created `Active` by external scheduling tooling; moves to
/// `TiebreakerPending` when finalization detects an unresolved tie;
/// becomes `Completed` only after the committer has applied every
/// allocation and no unresolved tiebreakers remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundStatus {
    Active,
    TiebreakerPending,
    Completed,
}

impl std::fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::TiebreakerPending => write!(f, "TIEBREAKER_PENDING"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// One auction round for a position (or position group) within a season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub season_id: SeasonId,
    /// 1-based round number within the season; drives phase derivation.
    pub round_number: u32,
    /// Positions auctioned this round (e.g. `["GK"]` or `["DEF", "MID"]`).
    pub positions: Vec<String>,
    /// How many confirmed bids a team must place to count as submitted.
    pub bid_quota: u32,
    pub status: RoundStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Round {
    /// A fresh `Active` round.
    #[must_use]
    pub fn new(
        season_id: SeasonId,
        round_number: u32,
        positions: Vec<String>,
        bid_quota: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RoundId::new(),
            season_id,
            round_number,
            positions,
            bid_quota,
            status: RoundStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this round covers the given player position.
    #[must_use]
    pub fn covers_position(&self, position: &str) -> bool {
        self.positions.iter().any(|p| p == position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_round_is_active() {
        let round = Round::new(SeasonId(16), 3, vec!["GK".into()], 1);
        assert_eq!(round.status, RoundStatus::Active);
        assert_eq!(round.round_number, 3);
    }

    #[test]
    fn covers_position_group() {
        let round = Round::new(SeasonId(16), 7, vec!["DEF".into(), "MID".into()], 1);
        assert!(round.covers_position("DEF"));
        assert!(round.covers_position("MID"));
        assert!(!round.covers_position("FWD"));
    }

    #[test]
    fn status_display() {
        assert_eq!(RoundStatus::TiebreakerPending.to_string(), "TIEBREAKER_PENDING");
    }
}
