//! Allocation committer: turns a computed allocation into durable state.
//!
//! The relational path (bids, ownership, players, round status) aborts on
//! the first failure and is safe to re-run thanks to the (player, season)
//! ownership upsert. The document-store roster update is deliberately
//! best-effort: a failure there is logged and swallowed, never aborting
//! the relational commit. `reconcile_roster` is the matching repair pass
//! that re-derives every sheet from the committed ownership ledger.

use std::collections::HashSet;

use draftroom_ingress::BidSealer;
use draftroom_types::{
    Allocation, AllocationPhase, AuctionPolicy, BidId, BidPhase, ContractTerms, DraftroomError,
    OwnershipRecord, Result, RoundId, RoundStatus, SeasonId, TeamSeasonKey,
};
use tracing::{info, warn};

use crate::bulk::BulkStandoff;
use crate::store::{LedgerStore, RosterStore};

/// Apply a finalized allocation set to both stores.
///
/// Idempotent on an already-`Completed` round: returns success without
/// side effects. Already-applied allocations are never rolled back; a
/// relational failure aborts the remaining loop and the caller re-invokes.
pub fn apply_finalization<L: LedgerStore, R: RosterStore>(
    ledger: &mut L,
    roster: &mut R,
    sealer: &BidSealer,
    policy: &AuctionPolicy,
    round_id: RoundId,
    allocations: &[Allocation],
) -> Result<()> {
    let round = ledger
        .round(round_id)
        .ok_or(DraftroomError::RoundNotFound(round_id))?;

    if round.status == RoundStatus::Completed {
        info!(%round_id, "round already completed, nothing to apply");
        return Ok(());
    }
    if round.status != RoundStatus::Active && round.status != RoundStatus::TiebreakerPending {
        return Err(DraftroomError::RoundNotFinalizable {
            round: round_id,
            status: round.status,
        });
    }

    let contract = ContractTerms::starting(round.season_id, policy.contract_duration_seasons);
    let mut winning_bids: HashSet<BidId> = HashSet::new();

    for allocation in allocations {
        if let Some(bid_id) = allocation.bid_id {
            winning_bids.insert(bid_id);
            let (phase, actual) = match allocation.phase {
                AllocationPhase::Regular => (BidPhase::Regular, None),
                AllocationPhase::Incomplete => {
                    // The team is charged the mean, not its own bid; keep
                    // the originally sealed amount on the record.
                    let actual = ledger
                        .bid(bid_id)
                        .and_then(|bid| sealer.unseal(&bid.token).ok())
                        .map_or(allocation.amount, |(_, amount)| amount);
                    (BidPhase::Incomplete, Some(actual))
                }
            };
            ledger.mark_bid_won(bid_id, phase, actual)?;
        }

        ledger.upsert_ownership(OwnershipRecord::new(
            allocation.player_id,
            round.season_id,
            allocation.team_id,
            round_id,
            allocation.amount,
            contract,
        ))?;

        let mut player = ledger
            .player(allocation.player_id)
            .ok_or(DraftroomError::PlayerNotFound(allocation.player_id))?;
        let position = player.position.clone();
        player.mark_sold(allocation.team_id, allocation.amount, round.season_id, round_id);
        ledger.update_player(player)?;

        apply_roster_update(roster, allocation, round.season_id, &position);

        info!(
            team = %allocation.team_id,
            player = %allocation.player_id,
            amount = %allocation.amount,
            phase = %allocation.phase,
            "allocation committed"
        );
    }

    for bid in ledger.active_bids(round_id) {
        if !winning_bids.contains(&bid.id) {
            ledger.mark_bid_lost(bid.id)?;
        }
    }

    let swapped = ledger.cas_round_status(round_id, round.status, RoundStatus::Completed)?;
    if !swapped {
        return Err(DraftroomError::RoundStatusConflict {
            round: round_id,
            expected: round.status,
        });
    }

    info!(%round_id, allocations = allocations.len(), "round completed");
    Ok(())
}

/// Commit a decided bulk standoff directly, bypassing re-finalization.
pub fn commit_standoff<L: LedgerStore, R: RosterStore>(
    ledger: &mut L,
    roster: &mut R,
    policy: &AuctionPolicy,
    standoff: &BulkStandoff,
) -> Result<Allocation> {
    let (team_id, price) =
        standoff
            .winner()
            .ok_or_else(|| DraftroomError::InvalidStandoffMove {
                reason: "standoff is not decided".to_string(),
            })?;

    let contract = ContractTerms::starting(standoff.season_id, policy.contract_duration_seasons);
    ledger.upsert_ownership(OwnershipRecord::new(
        standoff.player_id,
        standoff.season_id,
        team_id,
        standoff.round_id,
        price,
        contract,
    ))?;

    let mut player = ledger
        .player(standoff.player_id)
        .ok_or(DraftroomError::PlayerNotFound(standoff.player_id))?;
    let position = player.position.clone();
    player.mark_sold(team_id, price, standoff.season_id, standoff.round_id);
    ledger.update_player(player)?;

    let allocation = Allocation {
        team_id,
        player_id: standoff.player_id,
        amount: price,
        bid_id: None,
        phase: AllocationPhase::Regular,
    };
    apply_roster_update(roster, &allocation, standoff.season_id, &position);

    info!(id = %standoff.id, %team_id, %price, "standoff committed");
    Ok(allocation)
}

/// Best-effort document-store update; a failure is logged, never raised.
fn apply_roster_update<R: RosterStore>(
    roster: &mut R,
    allocation: &Allocation,
    season: SeasonId,
    position: &str,
) {
    let key = TeamSeasonKey::new(allocation.team_id, season);
    match roster.sheet(&key) {
        Some(mut sheet) => {
            sheet.record_acquisition(allocation.amount, Some(position));
            if let Err(err) = roster.update_sheet(sheet) {
                warn!(%key, %err, "roster update failed, ledger and roster have diverged");
            }
        }
        None => warn!(%key, "team sheet not found, skipping roster update"),
    }
}

/// Re-derive every team sheet for a season from the ownership ledger.
///
/// Idempotent: spent, budget, player count, and position counts are
/// recomputed from scratch, so running it twice converges to the same
/// sheets. This is the repair pass for the committer's best-effort
/// roster asymmetry.
pub fn reconcile_roster<L: LedgerStore, R: RosterStore>(
    ledger: &L,
    roster: &mut R,
    season: SeasonId,
) -> Result<()> {
    let owned = ledger.ownership_for_season(season);

    for mut sheet in roster.sheets_for_season(season) {
        let team_records: Vec<&OwnershipRecord> =
            owned.iter().filter(|o| o.team_id == sheet.team_id).collect();

        sheet.total_spent = team_records.iter().map(|o| o.price).sum();
        sheet.budget = sheet.initial_budget - sheet.total_spent;
        sheet.players_count = u32::try_from(team_records.len())
            .map_err(|_| DraftroomError::Internal("roster size overflow".to_string()))?;
        sheet.position_counts.clear();
        for record in &team_records {
            if let Some(player) = ledger.player(record.player_id) {
                *sheet.position_counts.entry(player.position).or_insert(0) += 1;
            }
        }
        sheet.updated_at = chrono::Utc::now();

        let team_id = sheet.team_id;
        roster.update_sheet(sheet)?;
        info!(%team_id, %season, "team sheet reconciled");
    }
    Ok(())
}
