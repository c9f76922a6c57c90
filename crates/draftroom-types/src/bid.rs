//! Bid model: sealed (persisted) and unsealed (in-memory working set) forms.
//!
//! A bid's (player, amount) payload is stored only as an encrypted token;
//! the clear form exists solely inside finalization's working set.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BidId, PlayerId, RoundId, TeamId};

/// Lifecycle status of a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidStatus {
    Active,
    Won,
    Lost,
}

impl std::fmt::Display for BidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Won => write!(f, "WON"),
            Self::Lost => write!(f, "LOST"),
        }
    }
}

/// How a winning bid was resolved: a genuine top bid, or the forced
/// fallback path for a team that never submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidPhase {
    Regular,
    Incomplete,
}

impl std::fmt::Display for BidPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular => write!(f, "REGULAR"),
            Self::Incomplete => write!(f, "INCOMPLETE"),
        }
    }
}

/// One team's sealed bid in a round, as persisted in the ledger.
///
/// `token` is the encrypted (player, amount) payload; it is opaque until
/// round close. The UI layer enforces one bid per team per round, but the
/// engine tolerates multiple records defensively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedBid {
    pub id: BidId,
    pub round_id: RoundId,
    pub team_id: TeamId,
    /// `hex(nonce):hex(tag):hex(ciphertext)` sealing token.
    pub token: String,
    /// Whether the team explicitly confirmed this bid before round close.
    pub confirmed: bool,
    pub status: BidStatus,
    /// Set once the bid is resolved as won.
    pub phase: Option<BidPhase>,
    /// For `Incomplete` wins the charged amount differs from the sealed
    /// amount; the originally sealed amount is retained here.
    pub actual_bid_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SealedBid {
    /// A fresh `Active`, confirmed bid around the given sealing token.
    #[must_use]
    pub fn new(round_id: RoundId, team_id: TeamId, token: String) -> Self {
        let now = Utc::now();
        Self {
            id: BidId::new(),
            round_id,
            team_id,
            token,
            confirmed: true,
            status: BidStatus::Active,
            phase: None,
            actual_bid_amount: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A decrypted bid inside finalization's working set. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsealedBid {
    pub bid_id: BidId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bid_is_active_and_confirmed() {
        let bid = SealedBid::new(RoundId::new(), TeamId::new(), "aa:bb:cc".into());
        assert_eq!(bid.status, BidStatus::Active);
        assert!(bid.confirmed);
        assert!(bid.phase.is_none());
    }

    #[test]
    fn status_display() {
        assert_eq!(BidStatus::Won.to_string(), "WON");
        assert_eq!(BidPhase::Incomplete.to_string(), "INCOMPLETE");
    }

    #[test]
    fn sealed_bid_serde_roundtrip() {
        let bid = SealedBid::new(RoundId::new(), TeamId::new(), "aa:bb:cc".into());
        let json = serde_json::to_string(&bid).unwrap();
        let back: SealedBid = serde_json::from_str(&json).unwrap();
        assert_eq!(bid.id, back.id);
        assert_eq!(bid.token, back.token);
    }
}
