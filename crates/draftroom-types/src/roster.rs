//! Team roster / balance state, owned by the document store.
//!
//! The engine only reads these as finalization input; only the committer
//! (and the reconciliation pass) mutates them.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{SeasonId, TeamId};

/// Document-store key: `{team_id}_{season_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamSeasonKey {
    pub team_id: TeamId,
    pub season_id: SeasonId,
}

impl TeamSeasonKey {
    #[must_use]
    pub fn new(team_id: TeamId, season_id: SeasonId) -> Self {
        Self { team_id, season_id }
    }
}

impl fmt::Display for TeamSeasonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.team_id.0, self.season_id.0)
    }
}

/// One team's per-season financial and roster document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSheet {
    pub team_id: TeamId,
    pub season_id: SeasonId,
    pub team_name: String,
    /// Season-start budget; the reconciliation pass re-derives `budget`
    /// from this minus the committed ownership ledger.
    pub initial_budget: Decimal,
    pub budget: Decimal,
    pub total_spent: Decimal,
    pub players_count: u32,
    /// Per-position roster counts (e.g. `{"GK": 2, "DEF": 7}`).
    pub position_counts: HashMap<String, u32>,
    pub updated_at: DateTime<Utc>,
}

impl TeamSheet {
    /// A fresh sheet with the full budget and an empty roster.
    #[must_use]
    pub fn new(team_id: TeamId, season_id: SeasonId, team_name: &str, budget: Decimal) -> Self {
        Self {
            team_id,
            season_id,
            team_name: team_name.to_string(),
            initial_budget: budget,
            budget,
            total_spent: Decimal::ZERO,
            players_count: 0,
            position_counts: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn key(&self) -> TeamSeasonKey {
        TeamSeasonKey::new(self.team_id, self.season_id)
    }

    /// Record an acquisition: charge the amount and bump the counts.
    pub fn record_acquisition(&mut self, amount: Decimal, position: Option<&str>) {
        self.budget -= amount;
        self.total_spent += amount;
        self.players_count += 1;
        if let Some(position) = position {
            *self.position_counts.entry(position.to_string()).or_insert(0) += 1;
        }
        self.updated_at = Utc::now();
    }
}
