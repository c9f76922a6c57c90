//! Player contract terms derived at commit time from the configured
//! contract length.

use serde::{Deserialize, Serialize};

use crate::SeasonId;

/// Contract metadata attached to a committed ownership record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub start_season: SeasonId,
    pub end_season: SeasonId,
    pub duration_seasons: u32,
}

impl ContractTerms {
    /// Terms starting at `start_season` for `duration_seasons` seasons
    /// inclusive: a 2-season contract starting in season 16 ends in 17.
    #[must_use]
    pub fn starting(start_season: SeasonId, duration_seasons: u32) -> Self {
        Self {
            start_season,
            end_season: start_season.plus(duration_seasons.saturating_sub(1)),
            duration_seasons,
        }
    }

    /// Whether the contract covers the given season.
    #[must_use]
    pub fn is_active(&self, season: SeasonId) -> bool {
        season >= self.start_season && season <= self.end_season
    }

    /// Whether the contract has already run out by the given season.
    #[must_use]
    pub fn is_expired(&self, season: SeasonId) -> bool {
        season > self.end_season
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_season_contract_span() {
        let terms = ContractTerms::starting(SeasonId(16), 2);
        assert_eq!(terms.end_season, SeasonId(17));
        assert!(terms.is_active(SeasonId(16)));
        assert!(terms.is_active(SeasonId(17)));
        assert!(!terms.is_active(SeasonId(18)));
        assert!(terms.is_expired(SeasonId(18)));
    }

    #[test]
    fn one_season_contract_ends_same_season() {
        let terms = ContractTerms::starting(SeasonId(20), 1);
        assert_eq!(terms.end_season, SeasonId(20));
        assert!(!terms.is_active(SeasonId(21)));
    }
}
