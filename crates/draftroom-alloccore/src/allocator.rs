//! Pure greedy top-bid allocator.
//!
//! The core matching function: takes the unsealed bids of a round's
//! submitted teams and produces either the full allocation list or the
//! first tied set. No side effects, no store access.
//!
//! ```text
//! allocate(&[UnsealedBid]) -> GreedyOutcome
//! ```
//!
//! ## Tie Halting
//!
//! If two or more bids share the top (amount, player) pair, allocation
//! halts immediately and returns the tied set. Partial allocations from
//! before the tie are discarded; the round is re-finalized from scratch
//! once the tiebreaker resolves, with the winning re-bid substituted.

use draftroom_types::{Allocation, AllocationPhase, UnsealedBid};

/// Result of one greedy allocation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GreedyOutcome {
    /// Every team got at most one player, every player at most one team.
    Complete { allocations: Vec<Allocation> },
    /// Two or more bids share the top (amount, player) pair.
    Tied { tied: Vec<UnsealedBid> },
}

/// Greedy top-bid allocation over an immutable snapshot.
///
/// ## Algorithm
///
/// 1. Sort remaining bids: amount descending, then player, then bid id
/// 2. If the top (amount, player) pair is held by one bid, allocate it
///    and drop every other bid by that team or for that player
/// 3. If it is held by two or more bids, halt with the tied set
/// 4. Repeat over the remaining slice until it is empty
///
/// The explicit three-key ordering makes the scan deterministic: the same
/// bid set always produces the same allocations or the same tied set.
#[must_use]
pub fn allocate(bids: &[UnsealedBid]) -> GreedyOutcome {
    let mut remaining: Vec<UnsealedBid> = bids.to_vec();
    let mut allocations = Vec::new();

    while !remaining.is_empty() {
        remaining.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then(a.player_id.cmp(&b.player_id))
                .then(a.bid_id.cmp(&b.bid_id))
        });

        let top = remaining[0].clone();
        let tied: Vec<UnsealedBid> = remaining
            .iter()
            .filter(|bid| bid.amount == top.amount && bid.player_id == top.player_id)
            .cloned()
            .collect();

        if tied.len() > 1 {
            return GreedyOutcome::Tied { tied };
        }

        allocations.push(Allocation {
            team_id: top.team_id,
            player_id: top.player_id,
            amount: top.amount,
            bid_id: Some(top.bid_id),
            phase: AllocationPhase::Regular,
        });

        // One player per team per round, one team per player.
        remaining.retain(|bid| bid.player_id != top.player_id && bid.team_id != top.team_id);
    }

    GreedyOutcome::Complete { allocations }
}

#[cfg(test)]
mod tests {
    use draftroom_types::{BidId, PlayerId, TeamId};
    use rust_decimal::Decimal;

    use super::*;

    fn bid(team: TeamId, player: PlayerId, amount: i64) -> UnsealedBid {
        UnsealedBid {
            bid_id: BidId::new(),
            team_id: team,
            player_id: player,
            amount: Decimal::new(amount, 0),
        }
    }

    #[test]
    fn empty_input_allocates_nothing() {
        let outcome = allocate(&[]);
        assert_eq!(
            outcome,
            GreedyOutcome::Complete {
                allocations: vec![]
            }
        );
    }

    #[test]
    fn highest_bid_wins_each_player() {
        let (a, b) = (TeamId::new(), TeamId::new());
        let (x, y) = (PlayerId::new(), PlayerId::new());
        let bids = vec![bid(a, x, 60), bid(b, x, 40), bid(b, y, 30)];

        let GreedyOutcome::Complete { allocations } = allocate(&bids) else {
            panic!("expected complete allocation");
        };
        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].team_id, a);
        assert_eq!(allocations[0].player_id, x);
        assert_eq!(allocations[0].amount, Decimal::new(60, 0));
        assert_eq!(allocations[1].team_id, b);
        assert_eq!(allocations[1].player_id, y);
    }

    #[test]
    fn one_player_per_team_one_team_per_player() {
        let teams: Vec<TeamId> = (0..3).map(|_| TeamId::new()).collect();
        let players: Vec<PlayerId> = (0..3).map(|_| PlayerId::new()).collect();

        // Every team bids on every player with distinct amounts.
        let mut bids = Vec::new();
        let mut amount = 10;
        for &team in &teams {
            for &player in &players {
                bids.push(bid(team, player, amount));
                amount += 5;
            }
        }

        let GreedyOutcome::Complete { allocations } = allocate(&bids) else {
            panic!("expected complete allocation");
        };
        assert_eq!(allocations.len(), 3);

        let mut seen_teams: Vec<TeamId> = allocations.iter().map(|a| a.team_id).collect();
        let mut seen_players: Vec<PlayerId> = allocations.iter().map(|a| a.player_id).collect();
        seen_teams.sort();
        seen_teams.dedup();
        seen_players.sort();
        seen_players.dedup();
        assert_eq!(seen_teams.len(), 3);
        assert_eq!(seen_players.len(), 3);
    }

    #[test]
    fn equal_top_bids_for_same_player_halt_as_tie() {
        let (a, b, c) = (TeamId::new(), TeamId::new(), TeamId::new());
        let (x, y) = (PlayerId::new(), PlayerId::new());
        let bids = vec![bid(a, x, 50), bid(b, x, 50), bid(c, y, 30)];

        let GreedyOutcome::Tied { tied } = allocate(&bids) else {
            panic!("expected tie");
        };
        assert_eq!(tied.len(), 2);
        assert!(tied.iter().all(|t| t.player_id == x));
        assert!(tied.iter().all(|t| t.amount == Decimal::new(50, 0)));
    }

    #[test]
    fn equal_amounts_for_different_players_are_not_a_tie() {
        let (a, b) = (TeamId::new(), TeamId::new());
        let (x, y) = (PlayerId::new(), PlayerId::new());
        let bids = vec![bid(a, x, 50), bid(b, y, 50)];

        let GreedyOutcome::Complete { allocations } = allocate(&bids) else {
            panic!("expected complete allocation");
        };
        assert_eq!(allocations.len(), 2);
    }

    #[test]
    fn tie_lower_down_still_halts_when_reached() {
        // The tie is not at the global top; the top bid allocates first
        // and removes its team, then the tie surfaces.
        let (a, b, c) = (TeamId::new(), TeamId::new(), TeamId::new());
        let (x, y) = (PlayerId::new(), PlayerId::new());
        let bids = vec![bid(a, x, 80), bid(b, y, 40), bid(c, y, 40)];

        let GreedyOutcome::Tied { tied } = allocate(&bids) else {
            panic!("expected tie");
        };
        assert_eq!(tied.len(), 2);
        assert!(tied.iter().all(|t| t.player_id == y));
    }

    #[test]
    fn losing_team_falls_through_to_its_next_bid() {
        let (a, b) = (TeamId::new(), TeamId::new());
        let (x, y) = (PlayerId::new(), PlayerId::new());
        let bids = vec![bid(a, x, 60), bid(b, x, 50), bid(b, y, 20)];

        let GreedyOutcome::Complete { allocations } = allocate(&bids) else {
            panic!("expected complete allocation");
        };
        assert_eq!(allocations.len(), 2);
        let b_alloc = allocations.iter().find(|al| al.team_id == b).unwrap();
        assert_eq!(b_alloc.player_id, y);
        assert_eq!(b_alloc.amount, Decimal::new(20, 0));
    }

    #[test]
    fn allocation_is_deterministic_across_input_order() {
        let (a, b) = (TeamId::new(), TeamId::new());
        let (x, y) = (PlayerId::new(), PlayerId::new());
        let bids = vec![bid(a, x, 60), bid(b, x, 40), bid(b, y, 30), bid(a, y, 25)];

        let mut reversed = bids.clone();
        reversed.reverse();

        assert_eq!(allocate(&bids), allocate(&reversed));
    }
}
