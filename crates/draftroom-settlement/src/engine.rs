//! The `AuctionEngine` facade: the synchronous external interface over
//! the two stores, the sealer, and the policy.
//!
//! Explicitly constructed and dependency-injected; no global state. Each
//! call reloads authoritative state from the stores and runs to
//! completion or failure within the invocation.

use std::collections::{HashMap, HashSet};

use draftroom_alloccore::{FallbackCandidate, GreedyOutcome, allocate, fallback, mean_regular_amount};
use draftroom_ingress::{BidSealer, can_participate, compute_reserve, summarize_reserve, validate_bid};
use draftroom_types::{
    Allocation, AuctionPolicy, BidAssessment, DraftroomError, FinalizationReport, PlayerId,
    ReserveInfo, ReserveSummary, Resolution, ResolutionMode, Result, Round, RoundId, RoundStatus,
    SeasonId, TeamId, TeamSeasonKey, TiebreakerId, TiebreakerStatus, UnsealedBid,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::committer;
use crate::store::{LedgerStore, RosterStore};
use crate::tiebreaker;

/// The auction allocation engine.
pub struct AuctionEngine<L: LedgerStore, R: RosterStore> {
    ledger: L,
    roster: R,
    sealer: BidSealer,
    policy: AuctionPolicy,
    rng: StdRng,
}

impl<L: LedgerStore, R: RosterStore> AuctionEngine<L, R> {
    /// Build an engine over the given stores, sealer, and policy.
    #[must_use]
    pub fn new(ledger: L, roster: R, sealer: BidSealer, policy: AuctionPolicy) -> Self {
        Self {
            ledger,
            roster,
            sealer,
            policy,
            rng: StdRng::from_entropy(),
        }
    }

    /// Like [`AuctionEngine::new`] but with a seeded RNG, so fallback
    /// allocation draws are reproducible in tests.
    #[must_use]
    pub fn with_rng_seed(
        ledger: L,
        roster: R,
        sealer: BidSealer,
        policy: AuctionPolicy,
        seed: u64,
    ) -> Self {
        Self {
            ledger,
            roster,
            sealer,
            policy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn roster(&self) -> &R {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut R {
        &mut self.roster
    }

    pub fn sealer(&self) -> &BidSealer {
        &self.sealer
    }

    pub fn policy(&self) -> &AuctionPolicy {
        &self.policy
    }

    /// Compute the provisional allocation for a round.
    ///
    /// Nothing is persisted except, on a detected tie, the tiebreaker
    /// itself and the round's move to `TiebreakerPending`. Finalization
    /// is retried after the tiebreaker resolves; resolved winning
    /// amounts then supersede the sealed originals.
    pub fn finalize_round(&mut self, round_id: RoundId) -> Result<FinalizationReport> {
        let round = self
            .ledger
            .round(round_id)
            .ok_or(DraftroomError::RoundNotFound(round_id))?;
        if round.status == RoundStatus::Completed {
            return Err(DraftroomError::RoundNotFinalizable {
                round: round_id,
                status: round.status,
            });
        }
        self.ensure_no_active_tiebreaker(round_id)?;

        // Resolved tiebreaker amounts supersede the sealed originals.
        let replacements: HashMap<(PlayerId, TeamId), Decimal> = self
            .ledger
            .tiebreakers_for_round(round_id)
            .into_iter()
            .filter(|t| t.status == TiebreakerStatus::Resolved)
            .filter_map(|t| {
                t.winning_team_id
                    .zip(t.winning_amount)
                    .map(|(team, amount)| ((t.player_id, team), amount))
            })
            .collect();

        let active_bids = self.ledger.active_bids(round_id);
        let mut unsealed: Vec<UnsealedBid> = Vec::with_capacity(active_bids.len());
        let mut confirmed_counts: HashMap<TeamId, u32> = HashMap::new();
        for bid in &active_bids {
            match self.sealer.unseal(&bid.token) {
                Ok((player_id, amount)) => {
                    let amount = replacements
                        .get(&(player_id, bid.team_id))
                        .copied()
                        .unwrap_or(amount);
                    unsealed.push(UnsealedBid {
                        bid_id: bid.id,
                        team_id: bid.team_id,
                        player_id,
                        amount,
                    });
                    if bid.confirmed {
                        *confirmed_counts.entry(bid.team_id).or_insert(0) += 1;
                    }
                }
                Err(err) => warn!(bid = %bid.id, %err, "skipping undecryptable bid"),
            }
        }

        if unsealed.is_empty() {
            info!(%round_id, "no usable bids, empty finalization");
            return Ok(FinalizationReport::complete(Vec::new()));
        }

        let submitted: HashSet<TeamId> = confirmed_counts
            .iter()
            .filter(|&(_, &count)| count >= round.bid_quota)
            .map(|(&team, _)| team)
            .collect();

        let submitted_bids: Vec<UnsealedBid> = unsealed
            .iter()
            .filter(|b| submitted.contains(&b.team_id))
            .cloned()
            .collect();

        let mut allocations = match allocate(&submitted_bids) {
            GreedyOutcome::Tied { tied } => {
                let player_id = tied[0].player_id;
                let tiebreaker_id = tiebreaker::create_tiebreaker(
                    &mut self.ledger,
                    round_id,
                    player_id,
                    round.season_id,
                    &tied,
                )?;
                // Already TiebreakerPending on a retry; the swap losing
                // is fine.
                self.ledger.cas_round_status(
                    round_id,
                    RoundStatus::Active,
                    RoundStatus::TiebreakerPending,
                )?;
                warn!(%round_id, %player_id, teams = tied.len(), "tie detected, finalization halted");
                return Ok(FinalizationReport::halted(tied, tiebreaker_id));
            }
            GreedyOutcome::Complete { allocations } => allocations,
        };

        allocations.extend(self.force_allocations(&round, &unsealed, &submitted, &allocations)?);

        // A tiebreaker created concurrently since the entry check must
        // invalidate this run before its output is trusted.
        self.ensure_no_active_tiebreaker(round_id)?;

        info!(%round_id, allocations = allocations.len(), "round finalized");
        Ok(FinalizationReport::complete(allocations))
    }

    /// Forced allocations for non-submitted teams, phases 1 and 3 only.
    fn force_allocations(
        &mut self,
        round: &Round,
        unsealed: &[UnsealedBid],
        submitted: &HashSet<TeamId>,
        regular: &[Allocation],
    ) -> Result<Vec<Allocation>> {
        let phase = self.policy.phase_of(round.round_number);
        let mean = mean_regular_amount(regular, self.policy.fallback_default_amount);
        let allocated_players: HashSet<PlayerId> =
            regular.iter().map(|a| a.player_id).collect();

        // Teams that already hold an ownership record for this round
        // were handled by an earlier partial run.
        let already_owned: HashSet<TeamId> = self
            .ledger
            .ownership_for_round(round.id)
            .iter()
            .map(|o| o.team_id)
            .collect();

        let mut candidates = Vec::new();
        for sheet in self.roster.sheets_for_season(round.season_id) {
            if submitted.contains(&sheet.team_id) || already_owned.contains(&sheet.team_id) {
                continue;
            }
            let reserve = compute_reserve(
                round.round_number,
                sheet.budget,
                sheet.players_count,
                &self.policy,
            )?;
            let participation = can_participate(sheet.budget, &reserve);
            if !participation.can_participate {
                info!(team = %sheet.team_id, "team cannot afford the phase minimum, skipped");
            }
            let own_targets = unsealed
                .iter()
                .filter(|b| b.team_id == sheet.team_id && !allocated_players.contains(&b.player_id))
                .map(|b| (b.bid_id, b.player_id))
                .collect();
            candidates.push(FallbackCandidate {
                team_id: sheet.team_id,
                can_afford_minimum: participation.can_participate,
                max_affordable: reserve.max_bid,
                own_targets,
            });
        }

        let pool: Vec<PlayerId> = self
            .ledger
            .unsold_players(&round.positions)
            .iter()
            .map(|p| p.id)
            .filter(|id| !allocated_players.contains(id))
            .collect();

        Ok(fallback(phase, mean, &candidates, &pool, &mut self.rng))
    }

    /// Apply a finalized allocation set across both stores.
    pub fn apply_finalization(
        &mut self,
        round_id: RoundId,
        allocations: &[Allocation],
    ) -> Result<()> {
        committer::apply_finalization(
            &mut self.ledger,
            &mut self.roster,
            &self.sealer,
            &self.policy,
            round_id,
            allocations,
        )
    }

    /// Create a tiebreaker for a tied bid set. Idempotent: an existing
    /// active tiebreaker over the same tied team set is reused.
    pub fn create_tiebreaker(
        &mut self,
        round_id: RoundId,
        player_id: PlayerId,
        tied: &[UnsealedBid],
    ) -> Result<TiebreakerId> {
        let round = self
            .ledger
            .round(round_id)
            .ok_or(DraftroomError::RoundNotFound(round_id))?;
        tiebreaker::create_tiebreaker(&mut self.ledger, round_id, player_id, round.season_id, tied)
    }

    /// Record one team's tiebreaker re-bid.
    pub fn submit_rebid(
        &mut self,
        id: TiebreakerId,
        team_id: TeamId,
        amount: Decimal,
    ) -> Result<()> {
        tiebreaker::submit_rebid(&mut self.ledger, id, team_id, amount)
    }

    /// Whether every participant of the tiebreaker has submitted.
    pub fn all_teams_submitted(&self, id: TiebreakerId) -> Result<bool> {
        tiebreaker::all_teams_submitted(&self.ledger, id)
    }

    /// Resolve an active tiebreaker.
    pub fn resolve_tiebreaker(
        &mut self,
        id: TiebreakerId,
        mode: ResolutionMode,
    ) -> Result<Resolution> {
        tiebreaker::resolve(&mut self.ledger, id, mode)
    }

    /// Re-derive a season's team sheets from the ownership ledger.
    pub fn reconcile_roster(&mut self, season: SeasonId) -> Result<()> {
        committer::reconcile_roster(&self.ledger, &mut self.roster, season)
    }

    /// A team's full reserve position for a round.
    pub fn reserve_info(&self, round_id: RoundId, team_id: TeamId) -> Result<ReserveInfo> {
        let round = self
            .ledger
            .round(round_id)
            .ok_or(DraftroomError::RoundNotFound(round_id))?;
        let key = TeamSeasonKey::new(team_id, round.season_id);
        let sheet = self
            .roster
            .sheet(&key)
            .ok_or_else(|| DraftroomError::TeamSheetNotFound {
                key: key.to_string(),
            })?;
        compute_reserve(
            round.round_number,
            sheet.budget,
            sheet.players_count,
            &self.policy,
        )
    }

    /// The reserve figures exposed to external collaborators.
    pub fn compute_reserve(&self, round_id: RoundId, team_id: TeamId) -> Result<ReserveSummary> {
        Ok(summarize_reserve(&self.reserve_info(round_id, team_id)?))
    }

    /// Validate a proposed bid amount against the policy and reserve.
    #[must_use]
    pub fn validate_bid_amount(
        &self,
        amount: Decimal,
        balance: Decimal,
        reserve: &ReserveInfo,
    ) -> BidAssessment {
        validate_bid(amount, balance, reserve, &self.policy)
    }

    fn ensure_no_active_tiebreaker(&self, round_id: RoundId) -> Result<()> {
        if let Some(outstanding) = self
            .ledger
            .tiebreakers_for_round(round_id)
            .into_iter()
            .find(|t| t.status == TiebreakerStatus::Active)
        {
            return Err(DraftroomError::TiebreakerOutstanding {
                round: round_id,
                tiebreaker: outstanding.id,
            });
        }
        Ok(())
    }
}
