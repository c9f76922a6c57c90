//! Storage seams for the Finality plane.
//!
//! Two independently-failing stores back the engine: the relational
//! ledger (rounds, bids, tiebreakers, ownership, players) and the
//! document roster store (per-team-per-season balance sheets). The
//! traits here are those seams; the in-memory implementations are the
//! reference backend used by the engine's tests and by embedders that
//! do not need durability.
//!
//! Status transitions on rounds and tiebreakers go through
//! compare-and-swap methods: the update applies only if the current
//! status equals the expected one, and a lost race reports `Ok(false)`
//! rather than overwriting.

use std::collections::HashMap;

use draftroom_types::{
    BidId, BidPhase, BidStatus, DraftroomError, OwnershipRecord, PlayerId, PlayerRecord, Result,
    Round, RoundId, RoundStatus, SealedBid, SeasonId, TeamId, TeamSeasonKey, TeamSheet,
    TeamTiebreaker, Tiebreaker, TiebreakerId, TiebreakerStatus,
};
use rust_decimal::Decimal;

/// Relational ledger: the source of truth for rounds, bids, tiebreakers,
/// committed ownership, and the player pool.
pub trait LedgerStore {
    // --- rounds ---
    fn insert_round(&mut self, round: Round);
    fn round(&self, id: RoundId) -> Option<Round>;
    /// Compare-and-swap the round status. `Ok(false)` means the current
    /// status was not `expected` and nothing changed.
    fn cas_round_status(
        &mut self,
        id: RoundId,
        expected: RoundStatus,
        next: RoundStatus,
    ) -> Result<bool>;

    // --- bids ---
    fn insert_bid(&mut self, bid: SealedBid);
    fn bid(&self, id: BidId) -> Option<SealedBid>;
    /// All `Active` bids for a round, oldest first.
    fn active_bids(&self, round: RoundId) -> Vec<SealedBid>;
    fn mark_bid_won(
        &mut self,
        id: BidId,
        phase: BidPhase,
        actual_bid_amount: Option<Decimal>,
    ) -> Result<()>;
    fn mark_bid_lost(&mut self, id: BidId) -> Result<()>;

    // --- tiebreakers ---
    fn insert_tiebreaker(&mut self, tiebreaker: Tiebreaker);
    fn tiebreaker(&self, id: TiebreakerId) -> Option<Tiebreaker>;
    /// All tiebreakers for a round, oldest first.
    fn tiebreakers_for_round(&self, round: RoundId) -> Vec<Tiebreaker>;
    /// Compare-and-swap the tiebreaker status; the closure patches the
    /// rest of the record (winner, resolved_at) only when the swap wins.
    fn cas_tiebreaker(
        &mut self,
        id: TiebreakerId,
        expected: TiebreakerStatus,
        patch: &mut dyn FnMut(&mut Tiebreaker),
    ) -> Result<bool>;
    fn insert_team_tiebreaker(&mut self, record: TeamTiebreaker);
    fn team_tiebreakers(&self, id: TiebreakerId) -> Vec<TeamTiebreaker>;
    fn update_team_tiebreaker(&mut self, record: TeamTiebreaker) -> Result<()>;

    // --- ownership ---
    /// Upsert on the (player, season) conflict key: a re-run after
    /// partial failure updates in place instead of duplicating.
    fn upsert_ownership(&mut self, record: OwnershipRecord) -> Result<()>;
    fn ownership_for_round(&self, round: RoundId) -> Vec<OwnershipRecord>;
    fn ownership_for_season(&self, season: SeasonId) -> Vec<OwnershipRecord>;

    // --- players ---
    fn insert_player(&mut self, player: PlayerRecord);
    fn player(&self, id: PlayerId) -> Option<PlayerRecord>;
    fn update_player(&mut self, player: PlayerRecord) -> Result<()>;
    /// Unsold players at any of the given positions, in id order.
    fn unsold_players(&self, positions: &[String]) -> Vec<PlayerRecord>;
}

/// Document store holding per-(team, season) balance sheets.
pub trait RosterStore {
    fn upsert_sheet(&mut self, sheet: TeamSheet);
    fn sheet(&self, key: &TeamSeasonKey) -> Option<TeamSheet>;
    /// All sheets for a season, in team-id order.
    fn sheets_for_season(&self, season: SeasonId) -> Vec<TeamSheet>;
    /// Replace an existing sheet. Fails if the sheet does not exist or
    /// the backend rejects the write.
    fn update_sheet(&mut self, sheet: TeamSheet) -> Result<()>;
}

/// In-memory relational ledger.
#[derive(Default)]
pub struct MemoryLedger {
    rounds: HashMap<RoundId, Round>,
    bids: HashMap<BidId, SealedBid>,
    tiebreakers: HashMap<TiebreakerId, Tiebreaker>,
    team_tiebreakers: HashMap<(TiebreakerId, TeamId), TeamTiebreaker>,
    ownership: HashMap<(PlayerId, SeasonId), OwnershipRecord>,
    players: HashMap<PlayerId, PlayerRecord>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryLedger {
    fn insert_round(&mut self, round: Round) {
        self.rounds.insert(round.id, round);
    }

    fn round(&self, id: RoundId) -> Option<Round> {
        self.rounds.get(&id).cloned()
    }

    fn cas_round_status(
        &mut self,
        id: RoundId,
        expected: RoundStatus,
        next: RoundStatus,
    ) -> Result<bool> {
        let round = self
            .rounds
            .get_mut(&id)
            .ok_or(DraftroomError::RoundNotFound(id))?;
        if round.status != expected {
            return Ok(false);
        }
        round.status = next;
        round.updated_at = chrono::Utc::now();
        Ok(true)
    }

    fn insert_bid(&mut self, bid: SealedBid) {
        self.bids.insert(bid.id, bid);
    }

    fn bid(&self, id: BidId) -> Option<SealedBid> {
        self.bids.get(&id).cloned()
    }

    fn active_bids(&self, round: RoundId) -> Vec<SealedBid> {
        let mut bids: Vec<SealedBid> = self
            .bids
            .values()
            .filter(|b| b.round_id == round && b.status == BidStatus::Active)
            .cloned()
            .collect();
        bids.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        bids
    }

    fn mark_bid_won(
        &mut self,
        id: BidId,
        phase: BidPhase,
        actual_bid_amount: Option<Decimal>,
    ) -> Result<()> {
        let bid = self.bids.get_mut(&id).ok_or(DraftroomError::BidNotFound(id))?;
        bid.status = BidStatus::Won;
        bid.phase = Some(phase);
        if actual_bid_amount.is_some() {
            bid.actual_bid_amount = actual_bid_amount;
        }
        bid.updated_at = chrono::Utc::now();
        Ok(())
    }

    fn mark_bid_lost(&mut self, id: BidId) -> Result<()> {
        let bid = self.bids.get_mut(&id).ok_or(DraftroomError::BidNotFound(id))?;
        bid.status = BidStatus::Lost;
        bid.updated_at = chrono::Utc::now();
        Ok(())
    }

    fn insert_tiebreaker(&mut self, tiebreaker: Tiebreaker) {
        self.tiebreakers.insert(tiebreaker.id, tiebreaker);
    }

    fn tiebreaker(&self, id: TiebreakerId) -> Option<Tiebreaker> {
        self.tiebreakers.get(&id).cloned()
    }

    fn tiebreakers_for_round(&self, round: RoundId) -> Vec<Tiebreaker> {
        let mut found: Vec<Tiebreaker> = self
            .tiebreakers
            .values()
            .filter(|t| t.round_id == round)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        found
    }

    fn cas_tiebreaker(
        &mut self,
        id: TiebreakerId,
        expected: TiebreakerStatus,
        patch: &mut dyn FnMut(&mut Tiebreaker),
    ) -> Result<bool> {
        let tiebreaker = self
            .tiebreakers
            .get_mut(&id)
            .ok_or(DraftroomError::TiebreakerNotFound(id))?;
        if tiebreaker.status != expected {
            return Ok(false);
        }
        patch(tiebreaker);
        Ok(true)
    }

    fn insert_team_tiebreaker(&mut self, record: TeamTiebreaker) {
        self.team_tiebreakers
            .insert((record.tiebreaker_id, record.team_id), record);
    }

    fn team_tiebreakers(&self, id: TiebreakerId) -> Vec<TeamTiebreaker> {
        let mut found: Vec<TeamTiebreaker> = self
            .team_tiebreakers
            .values()
            .filter(|t| t.tiebreaker_id == id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.team_id.cmp(&b.team_id));
        found
    }

    fn update_team_tiebreaker(&mut self, record: TeamTiebreaker) -> Result<()> {
        let key = (record.tiebreaker_id, record.team_id);
        if !self.team_tiebreakers.contains_key(&key) {
            return Err(DraftroomError::TeamNotInTiebreaker {
                team: record.team_id,
                tiebreaker: record.tiebreaker_id,
            });
        }
        self.team_tiebreakers.insert(key, record);
        Ok(())
    }

    fn upsert_ownership(&mut self, record: OwnershipRecord) -> Result<()> {
        self.ownership.insert(record.conflict_key(), record);
        Ok(())
    }

    fn ownership_for_round(&self, round: RoundId) -> Vec<OwnershipRecord> {
        let mut found: Vec<OwnershipRecord> = self
            .ownership
            .values()
            .filter(|o| o.round_id == round)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.player_id.cmp(&b.player_id));
        found
    }

    fn ownership_for_season(&self, season: SeasonId) -> Vec<OwnershipRecord> {
        let mut found: Vec<OwnershipRecord> = self
            .ownership
            .values()
            .filter(|o| o.season_id == season)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.player_id.cmp(&b.player_id));
        found
    }

    fn insert_player(&mut self, player: PlayerRecord) {
        self.players.insert(player.id, player);
    }

    fn player(&self, id: PlayerId) -> Option<PlayerRecord> {
        self.players.get(&id).cloned()
    }

    fn update_player(&mut self, player: PlayerRecord) -> Result<()> {
        if !self.players.contains_key(&player.id) {
            return Err(DraftroomError::PlayerNotFound(player.id));
        }
        self.players.insert(player.id, player);
        Ok(())
    }

    fn unsold_players(&self, positions: &[String]) -> Vec<PlayerRecord> {
        let mut found: Vec<PlayerRecord> = self
            .players
            .values()
            .filter(|p| !p.sold && positions.iter().any(|pos| pos == &p.position))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }
}

/// In-memory document roster store with write-failure injection for
/// exercising the committer's best-effort path.
#[derive(Default)]
pub struct MemoryRoster {
    sheets: HashMap<TeamSeasonKey, TeamSheet>,
    fail_remaining_updates: u32,
}

impl MemoryRoster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` calls to `update_sheet` fail.
    pub fn fail_next_updates(&mut self, n: u32) {
        self.fail_remaining_updates = n;
    }
}

impl RosterStore for MemoryRoster {
    fn upsert_sheet(&mut self, sheet: TeamSheet) {
        self.sheets.insert(sheet.key(), sheet);
    }

    fn sheet(&self, key: &TeamSeasonKey) -> Option<TeamSheet> {
        self.sheets.get(key).cloned()
    }

    fn sheets_for_season(&self, season: SeasonId) -> Vec<TeamSheet> {
        let mut found: Vec<TeamSheet> = self
            .sheets
            .values()
            .filter(|s| s.season_id == season)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.team_id.cmp(&b.team_id));
        found
    }

    fn update_sheet(&mut self, sheet: TeamSheet) -> Result<()> {
        if self.fail_remaining_updates > 0 {
            self.fail_remaining_updates -= 1;
            return Err(DraftroomError::RosterWrite {
                reason: "injected write failure".to_string(),
            });
        }
        let key = sheet.key();
        if !self.sheets.contains_key(&key) {
            return Err(DraftroomError::TeamSheetNotFound {
                key: key.to_string(),
            });
        }
        self.sheets.insert(key, sheet);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use draftroom_types::{Round, SealedBid};

    use super::*;

    #[test]
    fn round_cas_only_succeeds_from_expected_status() {
        let mut ledger = MemoryLedger::new();
        let round = Round::new(SeasonId(16), 1, vec!["GK".into()], 1);
        let id = round.id;
        ledger.insert_round(round);

        assert!(
            ledger
                .cas_round_status(id, RoundStatus::Active, RoundStatus::Completed)
                .unwrap()
        );
        // Second swap from Active loses: status is already Completed.
        assert!(
            !ledger
                .cas_round_status(id, RoundStatus::Active, RoundStatus::TiebreakerPending)
                .unwrap()
        );
        assert_eq!(ledger.round(id).unwrap().status, RoundStatus::Completed);
    }

    #[test]
    fn cas_on_missing_round_is_not_found() {
        let mut ledger = MemoryLedger::new();
        let err = ledger
            .cas_round_status(RoundId::new(), RoundStatus::Active, RoundStatus::Completed)
            .unwrap_err();
        assert!(matches!(err, DraftroomError::RoundNotFound(_)));
    }

    #[test]
    fn active_bids_excludes_settled_ones() {
        let mut ledger = MemoryLedger::new();
        let round = Round::new(SeasonId(16), 1, vec!["GK".into()], 1);
        let round_id = round.id;
        ledger.insert_round(round);

        let won = SealedBid::new(round_id, TeamId::new(), "aa:bb:cc".into());
        let won_id = won.id;
        ledger.insert_bid(won);
        ledger.insert_bid(SealedBid::new(round_id, TeamId::new(), "dd:ee:ff".into()));

        ledger
            .mark_bid_won(won_id, BidPhase::Regular, None)
            .unwrap();
        assert_eq!(ledger.active_bids(round_id).len(), 1);
    }

    #[test]
    fn ownership_upsert_replaces_on_player_season() {
        use draftroom_types::ContractTerms;

        let mut ledger = MemoryLedger::new();
        let player = PlayerId::new();
        let season = SeasonId(16);
        let first = OwnershipRecord::new(
            player,
            season,
            TeamId::new(),
            RoundId::new(),
            Decimal::new(40, 0),
            ContractTerms::starting(season, 2),
        );
        let second = OwnershipRecord {
            price: Decimal::new(55, 0),
            ..first.clone()
        };

        ledger.upsert_ownership(first).unwrap();
        ledger.upsert_ownership(second).unwrap();

        let records = ledger.ownership_for_season(season);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].price, Decimal::new(55, 0));
    }

    #[test]
    fn unsold_players_filters_by_position_and_sold() {
        let mut ledger = MemoryLedger::new();
        let mut keeper = PlayerRecord::new("A. Keeper", "GK");
        let defender = PlayerRecord::new("B. Defender", "DEF");
        ledger.insert_player(defender);
        ledger.insert_player(PlayerRecord::new("C. Keeper", "GK"));

        keeper.mark_sold(TeamId::new(), Decimal::new(30, 0), SeasonId(16), RoundId::new());
        ledger.insert_player(keeper);

        let pool = ledger.unsold_players(&["GK".to_string()]);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].name, "C. Keeper");
    }

    #[test]
    fn roster_update_fails_after_injection() {
        let mut roster = MemoryRoster::new();
        let sheet = TeamSheet::new(TeamId::new(), SeasonId(16), "Rovers", Decimal::new(500, 0));
        roster.upsert_sheet(sheet.clone());

        roster.fail_next_updates(1);
        assert!(roster.update_sheet(sheet.clone()).is_err());
        assert!(roster.update_sheet(sheet).is_ok());
    }

    #[test]
    fn updating_missing_sheet_is_an_error() {
        let mut roster = MemoryRoster::new();
        let sheet = TeamSheet::new(TeamId::new(), SeasonId(16), "Rovers", Decimal::new(500, 0));
        let err = roster.update_sheet(sheet).unwrap_err();
        assert!(matches!(err, DraftroomError::TeamSheetNotFound { .. }));
    }
}
