//! Globally unique identifiers used throughout Draftroom.
//!
//! All entity IDs use UUIDv7 for time-ordered lexicographic sorting,
//! except `SeasonId` which is a plain season number so contract
//! arithmetic (start season + duration) stays integral.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
        )]
        pub struct $name(pub Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            #[must_use]
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if $prefix.is_empty() {
                    write!(f, "{}", self.0)
                } else {
                    write!(f, "{}:{}", $prefix, self.0)
                }
            }
        }
    };
}

uuid_id!(
    /// Identifies one auction round (one position group, one season).
    RoundId,
    ""
);

uuid_id!(
    /// Identifies one sealed bid inside a round.
    BidId,
    ""
);

uuid_id!(
    /// Identifies a team (the bidding franchise, not its roster entry).
    TeamId,
    ""
);

uuid_id!(
    /// Identifies an auctionable player.
    PlayerId,
    ""
);

uuid_id!(
    /// Identifies a tiebreaker dispute over one (round, player) pair.
    TiebreakerId,
    "tb"
);

// ---------------------------------------------------------------------------
// SeasonId
// ---------------------------------------------------------------------------

/// Numeric season identifier (season 16, 17, ...).
///
/// Kept numeric rather than opaque so contract end seasons can be derived
/// as `start + duration - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SeasonId(pub u32);

impl SeasonId {
    /// The season `n` seasons after this one.
    #[must_use]
    pub fn plus(self, n: u32) -> Self {
        Self(self.0 + n)
    }
}

impl fmt::Display for SeasonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "season:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_id_uniqueness() {
        let a = RoundId::new();
        let b = RoundId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn bid_id_ordering() {
        // UUIDv7 embeds a timestamp, so later ids sort after earlier ones.
        let a = BidId::new();
        let b = BidId::new();
        assert!(a < b);
    }

    #[test]
    fn tiebreaker_id_display_prefix() {
        let id = TiebreakerId::new();
        assert!(id.to_string().starts_with("tb:"));
    }

    #[test]
    fn season_id_plus() {
        let s = SeasonId(16);
        assert_eq!(s.plus(2), SeasonId(18));
    }

    #[test]
    fn serde_roundtrips() {
        let tid = TeamId::new();
        let json = serde_json::to_string(&tid).unwrap();
        let back: TeamId = serde_json::from_str(&json).unwrap();
        assert_eq!(tid, back);

        let sid = SeasonId(42);
        let json = serde_json::to_string(&sid).unwrap();
        let back: SeasonId = serde_json::from_str(&json).unwrap();
        assert_eq!(sid, back);
    }
}
