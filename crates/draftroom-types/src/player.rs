//! Auctionable player records, owned by the relational ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PlayerId, RoundId, SeasonId, TeamId};

/// One auctionable player row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub position: String,
    pub sold: bool,
    pub team_id: Option<TeamId>,
    pub acquisition_value: Option<Decimal>,
    pub season_id: Option<SeasonId>,
    pub round_id: Option<RoundId>,
}

impl PlayerRecord {
    /// A fresh unsold player at the given position.
    #[must_use]
    pub fn new(name: &str, position: &str) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.to_string(),
            position: position.to_string(),
            sold: false,
            team_id: None,
            acquisition_value: None,
            season_id: None,
            round_id: None,
        }
    }

    /// Mark the player sold to a team at a price in a given round.
    pub fn mark_sold(&mut self, team: TeamId, price: Decimal, season: SeasonId, round: RoundId) {
        self.sold = true;
        self.team_id = Some(team);
        self.acquisition_value = Some(price);
        self.season_id = Some(season);
        self.round_id = Some(round);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_is_unsold() {
        let player = PlayerRecord::new("A. Keeper", "GK");
        assert!(!player.sold);
        assert!(player.team_id.is_none());
    }

    #[test]
    fn mark_sold_fills_acquisition_fields() {
        let mut player = PlayerRecord::new("B. Defender", "DEF");
        let team = TeamId::new();
        let round = RoundId::new();
        player.mark_sold(team, Decimal::new(75, 0), SeasonId(16), round);

        assert!(player.sold);
        assert_eq!(player.team_id, Some(team));
        assert_eq!(player.acquisition_value, Some(Decimal::new(75, 0)));
        assert_eq!(player.season_id, Some(SeasonId(16)));
        assert_eq!(player.round_id, Some(round));
    }
}
