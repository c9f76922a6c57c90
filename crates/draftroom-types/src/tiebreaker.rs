//! Tiebreaker model: a dispute over one (round, player) pair where two or
//! more bids are equal and highest.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BidId, PlayerId, RoundId, SeasonId, TeamId, TiebreakerId};

/// Lifecycle status of a tiebreaker.
///
/// `Pending` tiebreakers are queued behind an `Active` one for the same
/// (round, player) pair and are promoted oldest-first when the active one
/// leaves the `Active` state. `TiedAgain` records that resolution produced
/// another tie and a fresh tiebreaker was spawned for the re-tied teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TiebreakerStatus {
    Pending,
    Active,
    Resolved,
    Excluded,
    TiedAgain,
}

impl std::fmt::Display for TiebreakerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Resolved => write!(f, "RESOLVED"),
            Self::Excluded => write!(f, "EXCLUDED"),
            Self::TiedAgain => write!(f, "TIED_AGAIN"),
        }
    }
}

/// How to resolve a tiebreaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionMode {
    /// Pick the highest submitted re-bid (re-tie spawns a new tiebreaker;
    /// zero submissions behaves like `Exclude`).
    Auto,
    /// Exclude the disputed player from allocation, no winner.
    Exclude,
}

/// One tiebreaker dispute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tiebreaker {
    pub id: TiebreakerId,
    pub round_id: RoundId,
    pub player_id: PlayerId,
    pub season_id: SeasonId,
    /// The amount every tied team originally bid.
    pub original_amount: Decimal,
    pub tied_team_count: usize,
    pub status: TiebreakerStatus,
    pub winning_team_id: Option<TeamId>,
    pub winning_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// One team's participation record within a tiebreaker. The set of
/// participants is fixed at creation and never extended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamTiebreaker {
    pub tiebreaker_id: TiebreakerId,
    pub team_id: TeamId,
    /// The bid that produced the original tie.
    pub original_bid_id: BidId,
    pub original_amount: Decimal,
    /// The re-bid, once submitted.
    pub new_amount: Option<Decimal>,
    pub submitted: bool,
    /// Mirrors the parent tiebreaker's terminal status.
    pub status: TiebreakerStatus,
}

/// Outcome of [`ResolutionMode`]-driven resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub status: TiebreakerStatus,
    pub winning_team_id: Option<TeamId>,
    pub winning_amount: Option<Decimal>,
    /// Set when resolution re-tied and spawned a fresh tiebreaker.
    pub new_tiebreaker_id: Option<TiebreakerId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        assert_eq!(TiebreakerStatus::TiedAgain.to_string(), "TIED_AGAIN");
        assert_eq!(TiebreakerStatus::Pending.to_string(), "PENDING");
    }

    #[test]
    fn tiebreaker_serde_roundtrip() {
        let tb = Tiebreaker {
            id: TiebreakerId::new(),
            round_id: RoundId::new(),
            player_id: PlayerId::new(),
            season_id: SeasonId(16),
            original_amount: Decimal::new(50, 0),
            tied_team_count: 2,
            status: TiebreakerStatus::Active,
            winning_team_id: None,
            winning_amount: None,
            created_at: Utc::now(),
            resolved_at: None,
        };
        let json = serde_json::to_string(&tb).unwrap();
        let back: Tiebreaker = serde_json::from_str(&json).unwrap();
        assert_eq!(tb.id, back.id);
        assert_eq!(back.status, TiebreakerStatus::Active);
    }
}
