//! Reserve model: the three-phase budget floor a team must keep unspent
//! so it can still fill future mandatory rounds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The three auction stages, derived solely from the round number against
/// the policy's two end-round thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionPhase {
    /// Strict: the full forward reserve is enforced; skipping not allowed.
    Phase1,
    /// Soft: only a worst-case floor is enforced, the recommended reserve
    /// produces warnings; skipping allowed.
    Phase2,
    /// Flexible: no reserve, only the per-player minimum; skipping allowed.
    Phase3,
}

impl std::fmt::Display for AuctionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Phase1 => write!(f, "PHASE_1"),
            Self::Phase2 => write!(f, "PHASE_2"),
            Self::Phase3 => write!(f, "PHASE_3"),
        }
    }
}

/// Per-phase components of a computed reserve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveBreakdown {
    pub phase_1_reserve: Decimal,
    pub phase_2_reserve: Decimal,
    pub phase_3_reserve: Decimal,
}

/// A team's computed reserve position for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveInfo {
    /// Total recommended reserve.
    pub reserve: Decimal,
    /// Strictly enforced floor (equal to `reserve` in phase 1).
    pub floor_reserve: Decimal,
    /// Maximum bid allowed: `balance - floor_reserve`, clamped to zero.
    pub max_bid: Decimal,
    /// Recommended maximum bid: `balance - reserve`, clamped to zero.
    pub max_recommended_bid: Decimal,
    pub phase: AuctionPhase,
    /// Whether the full reserve (not just the floor) is enforced.
    pub enforce_strict: bool,
    /// Whether the team may skip the round when it cannot afford it.
    pub allow_skip: bool,
    /// Minimum balance needed to participate in this round.
    pub minimum_to_participate: Decimal,
    /// Human-readable numeric breakdown of the calculation.
    pub calculation: String,
    pub breakdown: ReserveBreakdown,
}

/// Verdict on a proposed bid amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidAssessment {
    /// The bid is allowed; phase 2 bids above the recommended cap carry
    /// a warning.
    Accepted { warning: Option<String> },
    /// The bid is rejected with a human-readable reason.
    Rejected { reason: String },
}

impl BidAssessment {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Accepted { warning } => warning.as_deref(),
            Self::Rejected { .. } => None,
        }
    }

    #[must_use]
    pub fn rejection(&self) -> Option<&str> {
        match self {
            Self::Accepted { .. } => None,
            Self::Rejected { reason } => Some(reason),
        }
    }
}

/// The reserve figures exposed to external collaborators for one
/// (round, team) query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveSummary {
    pub requires_reserve: bool,
    pub minimum_reserve: Decimal,
    pub explanation: String,
    pub phase: AuctionPhase,
}
