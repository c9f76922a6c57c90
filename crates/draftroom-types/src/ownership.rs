//! Ownership records: the relational ledger of committed allocations.
//!
//! The upsert conflict key is (player, season) so a re-run after partial
//! failure updates in place rather than duplicating.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ContractTerms, PlayerId, RoundId, SeasonId, TeamId};

/// One committed (team, player, price) ownership row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipRecord {
    pub player_id: PlayerId,
    pub season_id: SeasonId,
    pub team_id: TeamId,
    pub round_id: RoundId,
    pub price: Decimal,
    pub contract: ContractTerms,
    pub acquired_at: DateTime<Utc>,
}

impl OwnershipRecord {
    #[must_use]
    pub fn new(
        player_id: PlayerId,
        season_id: SeasonId,
        team_id: TeamId,
        round_id: RoundId,
        price: Decimal,
        contract: ContractTerms,
    ) -> Self {
        Self {
            player_id,
            season_id,
            team_id,
            round_id,
            price,
            contract,
            acquired_at: Utc::now(),
        }
    }

    /// The (player, season) upsert conflict key.
    #[must_use]
    pub fn conflict_key(&self) -> (PlayerId, SeasonId) {
        (self.player_id, self.season_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_key_is_player_season() {
        let rec = OwnershipRecord::new(
            PlayerId::new(),
            SeasonId(16),
            TeamId::new(),
            RoundId::new(),
            Decimal::new(30, 0),
            ContractTerms::starting(SeasonId(16), 2),
        );
        assert_eq!(rec.conflict_key(), (rec.player_id, SeasonId(16)));
    }
}
