//! Allocation model: the computed (team, player, amount) assignments a
//! finalization run produces. Transient until the committer applies them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BidId, PlayerId, TeamId, TiebreakerId, UnsealedBid};

/// Whether the allocation came from a genuine top bid or the forced
/// fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationPhase {
    Regular,
    Incomplete,
}

impl std::fmt::Display for AllocationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular => write!(f, "REGULAR"),
            Self::Incomplete => write!(f, "INCOMPLETE"),
        }
    }
}

/// One computed (team, player, amount) assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub team_id: TeamId,
    pub player_id: PlayerId,
    /// The amount the team is charged (for `Incomplete` this is the mean
    /// amount, not the sealed bid).
    pub amount: Decimal,
    /// The backing bid, if any. Forced allocations drawn from the open
    /// pool have no backing bid.
    pub bid_id: Option<BidId>,
    pub phase: AllocationPhase,
}

/// The result of one finalization attempt.
///
/// Either a full allocation list (`tie_detected == false`) or a halt on
/// the first detected tie, carrying the tied set and the tiebreaker that
/// must be resolved before finalization is retried.
#[derive(Debug, Clone, Default)]
pub struct FinalizationReport {
    pub allocations: Vec<Allocation>,
    pub tie_detected: bool,
    pub tied_bids: Vec<UnsealedBid>,
    pub tiebreaker_id: Option<TiebreakerId>,
}

impl FinalizationReport {
    /// A successful report carrying the given allocations.
    #[must_use]
    pub fn complete(allocations: Vec<Allocation>) -> Self {
        Self {
            allocations,
            ..Self::default()
        }
    }

    /// A halted report: a tie was found and a tiebreaker created.
    #[must_use]
    pub fn halted(tied_bids: Vec<UnsealedBid>, tiebreaker_id: TiebreakerId) -> Self {
        Self {
            allocations: Vec::new(),
            tie_detected: true,
            tied_bids,
            tiebreaker_id: Some(tiebreaker_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_report_has_no_tie() {
        let report = FinalizationReport::complete(vec![]);
        assert!(!report.tie_detected);
        assert!(report.tiebreaker_id.is_none());
    }

    #[test]
    fn halted_report_carries_tiebreaker() {
        let tb = TiebreakerId::new();
        let report = FinalizationReport::halted(vec![], tb);
        assert!(report.tie_detected);
        assert_eq!(report.tiebreaker_id, Some(tb));
        assert!(report.allocations.is_empty());
    }

    #[test]
    fn phase_display() {
        assert_eq!(AllocationPhase::Regular.to_string(), "REGULAR");
    }
}
