//! Bulk standoff: the last-team-standing tiebreak variant.
//!
//! Instead of one sealed re-bid per team, participants openly raise or
//! drop out until exactly one team remains. The survivor wins at its own
//! last raise (or the base price if it never raised). A decided standoff
//! is committed directly, bypassing round re-finalization.

use draftroom_types::{
    DraftroomError, PlayerId, Result, RoundId, SeasonId, TeamId, TiebreakerId,
};
use rust_decimal::Decimal;
use tracing::info;

/// Lifecycle of a standoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandoffStatus {
    Active,
    Decided,
}

/// One team's seat in a standoff.
#[derive(Debug, Clone)]
pub struct StandoffSeat {
    pub team_id: TeamId,
    pub active: bool,
    /// The team's highest raise so far, if any.
    pub last_raise: Option<Decimal>,
}

/// An open last-team-standing dispute over one player.
#[derive(Debug, Clone)]
pub struct BulkStandoff {
    pub id: TiebreakerId,
    pub round_id: RoundId,
    pub player_id: PlayerId,
    pub season_id: SeasonId,
    pub base_price: Decimal,
    status: StandoffStatus,
    seats: Vec<StandoffSeat>,
}

impl BulkStandoff {
    /// Open a standoff for the given teams at a base price.
    pub fn new(
        round_id: RoundId,
        player_id: PlayerId,
        season_id: SeasonId,
        base_price: Decimal,
        teams: &[TeamId],
    ) -> Result<Self> {
        if teams.len() < 2 {
            return Err(DraftroomError::NotEnoughTiedBids { count: teams.len() });
        }
        Ok(Self {
            id: TiebreakerId::new(),
            round_id,
            player_id,
            season_id,
            base_price,
            status: StandoffStatus::Active,
            seats: teams
                .iter()
                .map(|&team_id| StandoffSeat {
                    team_id,
                    active: true,
                    last_raise: None,
                })
                .collect(),
        })
    }

    #[must_use]
    pub fn status(&self) -> StandoffStatus {
        self.status
    }

    #[must_use]
    pub fn seats(&self) -> &[StandoffSeat] {
        &self.seats
    }

    /// Teams still standing.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.seats.iter().filter(|s| s.active).count()
    }

    /// The current price to beat: the highest raise among standing teams,
    /// or the base price if nobody has raised.
    #[must_use]
    pub fn current_price(&self) -> Decimal {
        self.seats
            .iter()
            .filter(|s| s.active)
            .filter_map(|s| s.last_raise)
            .max()
            .unwrap_or(self.base_price)
    }

    /// The winner and its price, once decided.
    #[must_use]
    pub fn winner(&self) -> Option<(TeamId, Decimal)> {
        if self.status != StandoffStatus::Decided {
            return None;
        }
        let survivor = self.seats.iter().find(|s| s.active)?;
        Some((
            survivor.team_id,
            survivor.last_raise.unwrap_or(self.base_price),
        ))
    }

    /// Raise the price. Must strictly beat the current price and come
    /// from a standing participant.
    pub fn raise(&mut self, team_id: TeamId, amount: Decimal) -> Result<()> {
        self.check_active()?;
        let floor = self.current_price();
        if amount <= floor {
            return Err(DraftroomError::InvalidStandoffMove {
                reason: format!("raise {amount} does not beat current price {floor}"),
            });
        }
        let seat = self.standing_seat(team_id)?;
        seat.last_raise = Some(amount);
        info!(id = %self.id, %team_id, %amount, "standoff raise");
        Ok(())
    }

    /// Leave the standoff. When exactly one team remains, the standoff
    /// is decided in its favor.
    pub fn drop_out(&mut self, team_id: TeamId) -> Result<Option<(TeamId, Decimal)>> {
        self.check_active()?;
        let seat = self.standing_seat(team_id)?;
        seat.active = false;
        info!(id = %self.id, %team_id, "standoff drop-out");

        if self.remaining() == 1 {
            self.status = StandoffStatus::Decided;
            let (winner, price) = self.winner().unwrap_or((team_id, self.base_price));
            info!(id = %self.id, %winner, %price, "standoff decided");
            return Ok(Some((winner, price)));
        }
        Ok(None)
    }

    fn check_active(&self) -> Result<()> {
        if self.status != StandoffStatus::Active {
            return Err(DraftroomError::InvalidStandoffMove {
                reason: "standoff is already decided".to_string(),
            });
        }
        Ok(())
    }

    fn standing_seat(&mut self, team_id: TeamId) -> Result<&mut StandoffSeat> {
        let id = self.id;
        self.seats
            .iter_mut()
            .find(|s| s.team_id == team_id && s.active)
            .ok_or(DraftroomError::InvalidStandoffMove {
                reason: format!("team {team_id} is not standing in standoff {id}"),
            })
    }
}
