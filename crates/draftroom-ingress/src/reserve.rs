//! Reserve calculator — pure functions over the three-phase budget policy.
//!
//! The reserve is the budget a team must keep unspent so it can still fill
//! every future mandatory round. Phase 1 enforces the full forward reserve,
//! phase 2 enforces only a worst-case floor and warns above the recommended
//! cap, phase 3 enforces the per-player minimum only.

use draftroom_types::{
    AuctionPhase, AuctionPolicy, BidAssessment, ReserveBreakdown, ReserveInfo, ReserveSummary,
    Result,
};
use rust_decimal::Decimal;

/// Verdict on whether a team's balance lets it take part in a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participation {
    pub can_participate: bool,
    pub reason: Option<String>,
}

/// Compute a team's reserve position for one round.
///
/// `squad_size` is the team's current player count. Remaining rounds are
/// derived from the policy's end-round thresholds, not from rounds already
/// created, so the reserve covers the expected shape of the season.
pub fn compute_reserve(
    round_number: u32,
    balance: Decimal,
    squad_size: u32,
    policy: &AuctionPolicy,
) -> Result<ReserveInfo> {
    policy.validate()?;

    match policy.phase_of(round_number) {
        AuctionPhase::Phase1 => {
            let phase_1_remaining = policy.phase_1_end_round.saturating_sub(round_number);
            let phase_2_full = policy
                .phase_2_end_round
                .saturating_sub(policy.phase_1_end_round);

            // The team wins a player this round, then one per remaining
            // phase-1/2 round; whatever slots are left fall to phase 3.
            let players_after_phase_2 = squad_size + 1 + phase_1_remaining + phase_2_full;
            let slots_after_phase_2 = policy.max_squad_size.saturating_sub(players_after_phase_2);

            let breakdown = ReserveBreakdown {
                phase_1_reserve: Decimal::from(phase_1_remaining) * policy.phase_1_min_balance,
                phase_2_reserve: Decimal::from(phase_2_full) * policy.phase_2_min_balance,
                phase_3_reserve: Decimal::from(slots_after_phase_2) * policy.phase_3_min_balance,
            };
            let total =
                breakdown.phase_1_reserve + breakdown.phase_2_reserve + breakdown.phase_3_reserve;

            Ok(ReserveInfo {
                reserve: total,
                floor_reserve: total,
                max_bid: (balance - total).max(Decimal::ZERO),
                max_recommended_bid: (balance - total).max(Decimal::ZERO),
                phase: AuctionPhase::Phase1,
                enforce_strict: true,
                allow_skip: false,
                minimum_to_participate: policy.phase_1_min_balance,
                calculation: format!(
                    "Phase 1: {phase_1_remaining}x£{} + Phase 2: {phase_2_full}x£{} + Phase 3: {slots_after_phase_2}x£{} = £{total}",
                    policy.phase_1_min_balance, policy.phase_2_min_balance, policy.phase_3_min_balance,
                ),
                breakdown,
            })
        }
        AuctionPhase::Phase2 => {
            let phase_2_remaining = policy.phase_2_end_round.saturating_sub(round_number);

            // Floor: the team wins this round then skips the rest of
            // phase 2, so every other empty slot must survive to phase 3.
            let slots_after_this_round = policy.max_squad_size.saturating_sub(squad_size + 1);
            let phase_3_floor =
                Decimal::from(slots_after_this_round) * policy.phase_3_min_balance;

            // Recommended: the team completes every remaining phase-2 round.
            let players_after_phase_2 = squad_size + 1 + phase_2_remaining;
            let slots_after_phase_2 = policy.max_squad_size.saturating_sub(players_after_phase_2);
            let breakdown = ReserveBreakdown {
                phase_1_reserve: Decimal::ZERO,
                phase_2_reserve: Decimal::from(phase_2_remaining) * policy.phase_2_min_balance,
                phase_3_reserve: Decimal::from(slots_after_phase_2) * policy.phase_3_min_balance,
            };
            let recommended = breakdown.phase_2_reserve + breakdown.phase_3_reserve;

            Ok(ReserveInfo {
                reserve: recommended,
                floor_reserve: phase_3_floor,
                max_bid: (balance - phase_3_floor).max(Decimal::ZERO),
                max_recommended_bid: (balance - recommended).max(Decimal::ZERO),
                phase: AuctionPhase::Phase2,
                enforce_strict: false,
                allow_skip: true,
                minimum_to_participate: policy.phase_2_min_balance,
                calculation: format!(
                    "Recommended: {phase_2_remaining}x£{} + {slots_after_phase_2}x£{} = £{recommended} | Floor: £{phase_3_floor} (worst case: {slots_after_this_round} slots if skip rest)",
                    policy.phase_2_min_balance, policy.phase_3_min_balance,
                ),
                breakdown,
            })
        }
        AuctionPhase::Phase3 => Ok(ReserveInfo {
            reserve: Decimal::ZERO,
            floor_reserve: Decimal::ZERO,
            max_bid: balance,
            max_recommended_bid: balance,
            phase: AuctionPhase::Phase3,
            enforce_strict: false,
            allow_skip: true,
            minimum_to_participate: policy.phase_3_min_balance,
            calculation: format!(
                "Phase 3: No reserve (final phase), minimum £{} per player",
                policy.phase_3_min_balance,
            ),
            breakdown: ReserveBreakdown::default(),
        }),
    }
}

/// Check whether a team's balance lets it take part in the round.
#[must_use]
pub fn can_participate(balance: Decimal, reserve: &ReserveInfo) -> Participation {
    if balance < reserve.minimum_to_participate {
        let reason = if reserve.allow_skip {
            format!(
                "Insufficient balance (£{balance}). Round is skippable - you'll be assigned a random player for £{}.",
                reserve.minimum_to_participate,
            )
        } else {
            format!(
                "Insufficient balance (£{balance}). You need at least £{} to participate in this round.",
                reserve.minimum_to_participate,
            )
        };
        return Participation {
            can_participate: false,
            reason: Some(reason),
        };
    }
    Participation {
        can_participate: true,
        reason: None,
    }
}

/// Validate a proposed bid amount against the phase rules.
#[must_use]
pub fn validate_bid(
    amount: Decimal,
    balance: Decimal,
    reserve: &ReserveInfo,
    policy: &AuctionPolicy,
) -> BidAssessment {
    if amount < policy.min_bid {
        return BidAssessment::Rejected {
            reason: format!("Minimum bid is £{}", policy.min_bid),
        };
    }
    if amount > balance {
        return BidAssessment::Rejected {
            reason: "Bid exceeds team balance".to_string(),
        };
    }

    match reserve.phase {
        AuctionPhase::Phase1 => {
            if amount > reserve.max_bid {
                return BidAssessment::Rejected {
                    reason: format!(
                        "Bid exceeds maximum allowed (£{}). {}",
                        reserve.max_bid, reserve.calculation,
                    ),
                };
            }
        }
        AuctionPhase::Phase2 => {
            if amount > reserve.max_bid {
                return BidAssessment::Rejected {
                    reason: format!(
                        "Bid violates Phase 3 floor reserve. Maximum allowed: £{} (must maintain £{} for remaining slots)",
                        reserve.max_bid, reserve.floor_reserve,
                    ),
                };
            }
            if amount > reserve.max_recommended_bid {
                return BidAssessment::Accepted {
                    warning: Some(format!(
                        "Bid exceeds recommended limit (£{}). You may not have enough for upcoming Phase 2 rounds.",
                        reserve.max_recommended_bid,
                    )),
                };
            }
        }
        AuctionPhase::Phase3 => {
            if amount < reserve.minimum_to_participate {
                return BidAssessment::Rejected {
                    reason: format!(
                        "Minimum bid in Phase 3 is £{}",
                        reserve.minimum_to_participate,
                    ),
                };
            }
        }
    }

    BidAssessment::Accepted { warning: None }
}

/// The reserve figures exposed to external collaborators.
#[must_use]
pub fn summarize_reserve(reserve: &ReserveInfo) -> ReserveSummary {
    ReserveSummary {
        requires_reserve: reserve.enforce_strict,
        minimum_reserve: reserve.floor_reserve,
        explanation: reserve.calculation.clone(),
        phase: reserve.phase,
    }
}
