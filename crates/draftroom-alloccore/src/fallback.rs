//! Forced-allocation fallback for teams that never submitted a bid.
//!
//! Phases 1 and 3 force an allocation on every non-submitted team that can
//! still afford the phase minimum, charged at the mean regular amount
//! capped by what the team's reserve allows. Phase 2 is skippable, so
//! non-submitted teams simply receive nothing.
//!
//! Randomness is injected as an `Rng` so the engine can seed it for
//! deterministic tests.

use draftroom_types::{Allocation, AllocationPhase, AuctionPhase, BidId, PlayerId, TeamId};
use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashSet;

/// One non-submitted team's fallback inputs, affordability pre-computed
/// by the caller against the reserve calculator.
#[derive(Debug, Clone)]
pub struct FallbackCandidate {
    pub team_id: TeamId,
    /// Whether the team can afford the phase participation minimum.
    pub can_afford_minimum: bool,
    /// The most the team may spend without breaking its reserve.
    pub max_affordable: Decimal,
    /// The team's own unallocated bid targets, preferred over the pool.
    pub own_targets: Vec<(BidId, PlayerId)>,
}

/// Mean amount of the regular allocations, rounded to whole units.
///
/// Returns `default` when there are no regular allocations to average
/// over (an all-incomplete round still needs a charge amount).
#[must_use]
pub fn mean_regular_amount(allocations: &[Allocation], default: Decimal) -> Decimal {
    let regular: Vec<Decimal> = allocations
        .iter()
        .filter(|a| a.phase == AllocationPhase::Regular)
        .map(|a| a.amount)
        .collect();
    if regular.is_empty() {
        return default;
    }
    let sum: Decimal = regular.iter().sum();
    (sum / Decimal::from(regular.len()))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Force allocations for non-submitted teams.
///
/// Each eligible candidate is charged `min(mean_amount, max_affordable)`
/// and tagged `Incomplete`. Targets come first from the candidate's own
/// unallocated bids (random pick), then from a random player in the open
/// pool. Candidates that cannot afford the phase minimum, and candidates
/// left with no available target, are skipped.
///
/// `pool` must already exclude players allocated by the regular pass;
/// players taken by earlier candidates within this call are tracked here.
pub fn fallback<R: Rng>(
    phase: AuctionPhase,
    mean_amount: Decimal,
    candidates: &[FallbackCandidate],
    pool: &[PlayerId],
    rng: &mut R,
) -> Vec<Allocation> {
    if phase == AuctionPhase::Phase2 {
        return Vec::new();
    }

    let mut allocations = Vec::new();
    let mut taken: HashSet<PlayerId> = HashSet::new();

    for candidate in candidates {
        if !candidate.can_afford_minimum {
            continue;
        }

        let amount = mean_amount.min(candidate.max_affordable);

        let own: Vec<&(BidId, PlayerId)> = candidate
            .own_targets
            .iter()
            .filter(|(_, player)| !taken.contains(player))
            .collect();

        let (bid_id, player_id) = if own.is_empty() {
            let open: Vec<PlayerId> = pool
                .iter()
                .filter(|player| !taken.contains(player))
                .copied()
                .collect();
            if open.is_empty() {
                continue;
            }
            (None, open[rng.gen_range(0..open.len())])
        } else {
            let (bid_id, player_id) = *own[rng.gen_range(0..own.len())];
            (Some(bid_id), player_id)
        };

        taken.insert(player_id);
        allocations.push(Allocation {
            team_id: candidate.team_id,
            player_id,
            amount,
            bid_id,
            phase: AllocationPhase::Incomplete,
        });
    }

    allocations
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn regular(amount: i64) -> Allocation {
        Allocation {
            team_id: TeamId::new(),
            player_id: PlayerId::new(),
            amount: dec(amount),
            bid_id: Some(BidId::new()),
            phase: AllocationPhase::Regular,
        }
    }

    fn candidate(max_affordable: i64, own_targets: Vec<(BidId, PlayerId)>) -> FallbackCandidate {
        FallbackCandidate {
            team_id: TeamId::new(),
            can_afford_minimum: true,
            max_affordable: dec(max_affordable),
            own_targets,
        }
    }

    #[test]
    fn mean_rounds_to_whole_units() {
        let allocations = vec![regular(30), regular(45), regular(50)];
        // 125 / 3 = 41.66... -> 42
        assert_eq!(mean_regular_amount(&allocations, dec(1000)), dec(42));
    }

    #[test]
    fn mean_without_regular_allocations_is_the_default() {
        assert_eq!(mean_regular_amount(&[], dec(1000)), dec(1000));

        let incomplete = vec![Allocation {
            phase: AllocationPhase::Incomplete,
            ..regular(30)
        }];
        assert_eq!(mean_regular_amount(&incomplete, dec(1000)), dec(1000));
    }

    #[test]
    fn phase_2_forces_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = vec![candidate(100, vec![])];
        let pool = vec![PlayerId::new()];
        let out = fallback(AuctionPhase::Phase2, dec(40), &candidates, &pool, &mut rng);
        assert!(out.is_empty());
    }

    #[test]
    fn own_bid_target_preferred_over_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let own_bid = BidId::new();
        let own_player = PlayerId::new();
        let candidates = vec![candidate(100, vec![(own_bid, own_player)])];
        let pool = vec![PlayerId::new(), PlayerId::new()];

        let out = fallback(AuctionPhase::Phase1, dec(40), &candidates, &pool, &mut rng);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].player_id, own_player);
        assert_eq!(out[0].bid_id, Some(own_bid));
        assert_eq!(out[0].phase, AllocationPhase::Incomplete);
    }

    #[test]
    fn pool_draw_has_no_backing_bid() {
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = vec![candidate(100, vec![])];
        let pool = vec![PlayerId::new(), PlayerId::new()];

        let out = fallback(AuctionPhase::Phase3, dec(40), &candidates, &pool, &mut rng);
        assert_eq!(out.len(), 1);
        assert!(out[0].bid_id.is_none());
        assert!(pool.contains(&out[0].player_id));
    }

    #[test]
    fn charge_is_capped_by_affordability() {
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = vec![candidate(25, vec![])];
        let pool = vec![PlayerId::new()];

        let out = fallback(AuctionPhase::Phase1, dec(40), &candidates, &pool, &mut rng);
        assert_eq!(out[0].amount, dec(25));
    }

    #[test]
    fn broke_team_is_skipped() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut broke = candidate(0, vec![]);
        broke.can_afford_minimum = false;
        let pool = vec![PlayerId::new()];

        let out = fallback(AuctionPhase::Phase1, dec(40), &[broke], &pool, &mut rng);
        assert!(out.is_empty());
    }

    #[test]
    fn earlier_candidate_takes_the_player_out_of_the_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let only_player = PlayerId::new();
        let candidates = vec![candidate(100, vec![]), candidate(100, vec![])];
        let pool = vec![only_player];

        let out = fallback(AuctionPhase::Phase1, dec(40), &candidates, &pool, &mut rng);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].player_id, only_player);
    }

    #[test]
    fn exhausted_own_targets_fall_back_to_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let shared_player = PlayerId::new();
        let pool_player = PlayerId::new();
        let candidates = vec![
            candidate(100, vec![(BidId::new(), shared_player)]),
            candidate(100, vec![(BidId::new(), shared_player)]),
        ];
        let pool = vec![pool_player];

        let out = fallback(AuctionPhase::Phase1, dec(40), &candidates, &pool, &mut rng);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].player_id, shared_player);
        assert_eq!(out[1].player_id, pool_player);
        assert!(out[1].bid_id.is_none());
    }
}
