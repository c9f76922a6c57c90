//! Tiebreaker state machine.
//!
//! A tiebreaker disputes one (round, player) pair where two or more bids
//! are equal and highest. Lifecycle: `Active -> Resolved | Excluded |
//! TiedAgain`, with `TiedAgain` immediately spawning a fresh `Active`
//! tiebreaker carrying forward exactly the re-tied teams. A second tie
//! for a pair that already has an `Active` tiebreaker queues as `Pending`
//! and is promoted oldest-first once the active one leaves `Active`.
//!
//! Resolution is submission-driven only; there is no timeout path.
//! Resolving never touches balances or rosters -- that happens when the
//! owning round is re-finalized and committed.

use chrono::Utc;
use draftroom_types::{
    DraftroomError, PlayerId, Resolution, ResolutionMode, Result, RoundId, SeasonId, TeamId,
    TeamTiebreaker, Tiebreaker, TiebreakerId, TiebreakerStatus, UnsealedBid,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::store::LedgerStore;

/// Create a tiebreaker for a tied set of bids.
///
/// Idempotent against concurrent finalization attempts: if an `Active`
/// tiebreaker already disputes this (round, player) with the same team
/// set, its id is returned instead of duplicating. A tie with a
/// different team set queues as `Pending` behind the active one.
pub fn create_tiebreaker<L: LedgerStore>(
    ledger: &mut L,
    round_id: RoundId,
    player_id: PlayerId,
    season_id: SeasonId,
    tied: &[UnsealedBid],
) -> Result<TiebreakerId> {
    if tied.len() < 2 {
        return Err(DraftroomError::NotEnoughTiedBids { count: tied.len() });
    }

    let mut tied_teams: Vec<TeamId> = tied.iter().map(|b| b.team_id).collect();
    tied_teams.sort();

    let active = ledger
        .tiebreakers_for_round(round_id)
        .into_iter()
        .find(|t| t.player_id == player_id && t.status == TiebreakerStatus::Active);

    let status = if let Some(active) = active {
        let mut active_teams: Vec<TeamId> = ledger
            .team_tiebreakers(active.id)
            .iter()
            .map(|t| t.team_id)
            .collect();
        active_teams.sort();

        if active_teams == tied_teams {
            return Ok(active.id);
        }
        // A different dispute over the same pair waits its turn.
        TiebreakerStatus::Pending
    } else {
        TiebreakerStatus::Active
    };

    let tiebreaker = Tiebreaker {
        id: TiebreakerId::new(),
        round_id,
        player_id,
        season_id,
        original_amount: tied[0].amount,
        tied_team_count: tied.len(),
        status,
        winning_team_id: None,
        winning_amount: None,
        created_at: Utc::now(),
        resolved_at: None,
    };
    let id = tiebreaker.id;
    ledger.insert_tiebreaker(tiebreaker);

    for bid in tied {
        ledger.insert_team_tiebreaker(TeamTiebreaker {
            tiebreaker_id: id,
            team_id: bid.team_id,
            original_bid_id: bid.bid_id,
            original_amount: bid.amount,
            new_amount: None,
            submitted: false,
            status,
        });
    }

    info!(%id, %player_id, teams = tied.len(), ?status, "tiebreaker created");
    Ok(id)
}

/// Record one team's re-bid. Does not resolve the tiebreaker by itself.
pub fn submit_rebid<L: LedgerStore>(
    ledger: &mut L,
    id: TiebreakerId,
    team_id: TeamId,
    amount: Decimal,
) -> Result<()> {
    let tiebreaker = ledger
        .tiebreaker(id)
        .ok_or(DraftroomError::TiebreakerNotFound(id))?;
    if tiebreaker.status != TiebreakerStatus::Active {
        return Err(DraftroomError::TiebreakerNotActive {
            id,
            status: tiebreaker.status,
        });
    }

    let mut record = ledger
        .team_tiebreakers(id)
        .into_iter()
        .find(|t| t.team_id == team_id)
        .ok_or(DraftroomError::TeamNotInTiebreaker {
            team: team_id,
            tiebreaker: id,
        })?;

    record.new_amount = Some(amount);
    record.submitted = true;
    ledger.update_team_tiebreaker(record)?;

    info!(%id, %team_id, "re-bid submitted");
    Ok(())
}

/// Whether every participation record for the tiebreaker is submitted.
pub fn all_teams_submitted<L: LedgerStore>(ledger: &L, id: TiebreakerId) -> Result<bool> {
    ledger
        .tiebreaker(id)
        .ok_or(DraftroomError::TiebreakerNotFound(id))?;
    let records = ledger.team_tiebreakers(id);
    Ok(!records.is_empty() && records.iter().all(|t| t.submitted))
}

/// Resolve an `Active` tiebreaker.
///
/// The status transition is a compare-and-swap that only succeeds when
/// the prior status is exactly `Active`; a concurrent resolver losing
/// the race gets a precondition error, not a silent double-resolution.
pub fn resolve<L: LedgerStore>(
    ledger: &mut L,
    id: TiebreakerId,
    mode: ResolutionMode,
) -> Result<Resolution> {
    let tiebreaker = ledger
        .tiebreaker(id)
        .ok_or(DraftroomError::TiebreakerNotFound(id))?;
    if tiebreaker.status != TiebreakerStatus::Active {
        return Err(DraftroomError::TiebreakerNotActive {
            id,
            status: tiebreaker.status,
        });
    }

    let participants = ledger.team_tiebreakers(id);
    let mut submissions: Vec<&TeamTiebreaker> = participants
        .iter()
        .filter(|t| t.submitted && t.new_amount.is_some())
        .collect();
    submissions.sort_by(|a, b| b.new_amount.cmp(&a.new_amount).then(a.team_id.cmp(&b.team_id)));

    // Auto with zero submissions behaves like an exclusion.
    let outcome = match mode {
        ResolutionMode::Exclude => Outcome::Excluded,
        ResolutionMode::Auto if submissions.is_empty() => Outcome::Excluded,
        ResolutionMode::Auto => {
            let top_amount = submissions[0].new_amount;
            let tied_again: Vec<&&TeamTiebreaker> = submissions
                .iter()
                .filter(|t| t.new_amount == top_amount)
                .collect();
            if tied_again.len() > 1 {
                Outcome::TiedAgain {
                    rebids: tied_again
                        .iter()
                        .map(|t| UnsealedBid {
                            bid_id: t.original_bid_id,
                            team_id: t.team_id,
                            player_id: tiebreaker.player_id,
                            amount: t.new_amount.unwrap_or(tiebreaker.original_amount),
                        })
                        .collect(),
                }
            } else {
                Outcome::Resolved {
                    team_id: submissions[0].team_id,
                    amount: submissions[0].new_amount.unwrap_or(tiebreaker.original_amount),
                }
            }
        }
    };

    let (status, winning_team_id, winning_amount) = match &outcome {
        Outcome::Excluded => (TiebreakerStatus::Excluded, None, None),
        Outcome::TiedAgain { .. } => (TiebreakerStatus::TiedAgain, None, None),
        Outcome::Resolved { team_id, amount } => {
            (TiebreakerStatus::Resolved, Some(*team_id), Some(*amount))
        }
    };

    let swapped = ledger.cas_tiebreaker(id, TiebreakerStatus::Active, &mut |t| {
        t.status = status;
        t.winning_team_id = winning_team_id;
        t.winning_amount = winning_amount;
        t.resolved_at = Some(Utc::now());
    })?;
    if !swapped {
        let current = ledger
            .tiebreaker(id)
            .ok_or(DraftroomError::TiebreakerNotFound(id))?;
        return Err(DraftroomError::TiebreakerNotActive {
            id,
            status: current.status,
        });
    }

    for mut record in ledger.team_tiebreakers(id) {
        record.status = status;
        ledger.update_team_tiebreaker(record)?;
    }

    let new_tiebreaker_id = match outcome {
        Outcome::TiedAgain { rebids } => {
            // The fresh dispute becomes the pair's active tiebreaker, so
            // the pending queue stays behind it.
            let new_id = create_tiebreaker(
                ledger,
                tiebreaker.round_id,
                tiebreaker.player_id,
                tiebreaker.season_id,
                &rebids,
            )?;
            info!(%id, %new_id, "re-tie spawned a fresh tiebreaker");
            Some(new_id)
        }
        _ => {
            promote_oldest_pending(ledger, tiebreaker.round_id, tiebreaker.player_id)?;
            None
        }
    };

    info!(%id, %status, "tiebreaker resolved");
    Ok(Resolution {
        status,
        winning_team_id,
        winning_amount,
        new_tiebreaker_id,
    })
}

enum Outcome {
    Excluded,
    Resolved { team_id: TeamId, amount: Decimal },
    TiedAgain { rebids: Vec<UnsealedBid> },
}

/// Promote the oldest `Pending` tiebreaker for a (round, player) pair.
fn promote_oldest_pending<L: LedgerStore>(
    ledger: &mut L,
    round_id: RoundId,
    player_id: PlayerId,
) -> Result<()> {
    let oldest = ledger
        .tiebreakers_for_round(round_id)
        .into_iter()
        .find(|t| t.player_id == player_id && t.status == TiebreakerStatus::Pending);

    let Some(pending) = oldest else {
        return Ok(());
    };

    let promoted = ledger.cas_tiebreaker(pending.id, TiebreakerStatus::Pending, &mut |t| {
        t.status = TiebreakerStatus::Active;
    })?;
    if promoted {
        for mut record in ledger.team_tiebreakers(pending.id) {
            record.status = TiebreakerStatus::Active;
            ledger.update_team_tiebreaker(record)?;
        }
        info!(id = %pending.id, %player_id, "pending tiebreaker promoted");
    }
    Ok(())
}
