//! Auction policy configuration: phase thresholds, minimums, squad size,
//! and contract length for one season's auction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AuctionPhase, DraftroomError, Result, constants};

/// Per-season auction policy. Loaded from the configuration source at
/// service start and injected into the engine; a missing or inconsistent
/// policy fails validation instead of defaulting silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionPolicy {
    /// Last round number of phase 1.
    pub phase_1_end_round: u32,
    /// Minimum balance a team must keep per remaining phase-1 round.
    pub phase_1_min_balance: Decimal,
    /// Last round number of phase 2.
    pub phase_2_end_round: u32,
    /// Minimum balance per remaining phase-2 round.
    pub phase_2_min_balance: Decimal,
    /// Minimum per remaining empty squad slot in phase 3.
    pub phase_3_min_balance: Decimal,
    /// Total squad size.
    pub max_squad_size: u32,
    /// Global minimum bid, independent of phase.
    pub min_bid: Decimal,
    /// Charged amount for forced allocations when no regular allocation
    /// exists to average over.
    pub fallback_default_amount: Decimal,
    /// Contract length attached to committed allocations.
    pub contract_duration_seasons: u32,
}

impl AuctionPolicy {
    /// The standard league policy: 18 phase-1 rounds at £30, two phase-2
    /// rounds at £30, £10 phase-3 slots, 25-man squads, 2-season contracts.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            phase_1_end_round: 18,
            phase_1_min_balance: Decimal::new(30, 0),
            phase_2_end_round: 20,
            phase_2_min_balance: Decimal::new(30, 0),
            phase_3_min_balance: Decimal::new(10, 0),
            max_squad_size: 25,
            min_bid: constants::DEFAULT_MIN_BID,
            fallback_default_amount: constants::FALLBACK_DEFAULT_AMOUNT,
            contract_duration_seasons: constants::DEFAULT_CONTRACT_DURATION_SEASONS,
        }
    }

    /// Check internal consistency. Every reserve computation calls this
    /// first so a broken policy fails loudly.
    pub fn validate(&self) -> Result<()> {
        if self.phase_2_end_round < self.phase_1_end_round {
            return Err(DraftroomError::InvalidPolicy {
                reason: format!(
                    "phase_2_end_round ({}) precedes phase_1_end_round ({})",
                    self.phase_2_end_round, self.phase_1_end_round,
                ),
            });
        }
        if self.max_squad_size == 0 {
            return Err(DraftroomError::InvalidPolicy {
                reason: "max_squad_size must be positive".to_string(),
            });
        }
        for (name, value) in [
            ("phase_1_min_balance", self.phase_1_min_balance),
            ("phase_2_min_balance", self.phase_2_min_balance),
            ("phase_3_min_balance", self.phase_3_min_balance),
            ("min_bid", self.min_bid),
        ] {
            if value.is_sign_negative() {
                return Err(DraftroomError::InvalidPolicy {
                    reason: format!("{name} must not be negative"),
                });
            }
        }
        if self.contract_duration_seasons == 0 {
            return Err(DraftroomError::InvalidPolicy {
                reason: "contract_duration_seasons must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Phase for a given round number.
    #[must_use]
    pub fn phase_of(&self, round_number: u32) -> AuctionPhase {
        if round_number <= self.phase_1_end_round {
            AuctionPhase::Phase1
        } else if round_number <= self.phase_2_end_round {
            AuctionPhase::Phase2
        } else {
            AuctionPhase::Phase3
        }
    }

    /// The participation minimum for a phase.
    #[must_use]
    pub fn phase_minimum(&self, phase: AuctionPhase) -> Decimal {
        match phase {
            AuctionPhase::Phase1 => self.phase_1_min_balance,
            AuctionPhase::Phase2 => self.phase_2_min_balance,
            AuctionPhase::Phase3 => self.phase_3_min_balance,
        }
    }
}
