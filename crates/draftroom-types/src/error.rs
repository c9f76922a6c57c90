//! Error types for the Draftroom auction engine.
//!
//! All errors use the `DR_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Round errors
//! - 2xx: Bid / sealing errors
//! - 3xx: Reserve / budget errors
//! - 4xx: Tiebreaker errors
//! - 5xx: Allocation errors
//! - 6xx: Commit / store errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{BidId, PlayerId, RoundId, RoundStatus, TeamId, TiebreakerId, TiebreakerStatus};

/// Central error enum for all Draftroom operations.
#[derive(Debug, Error)]
pub enum DraftroomError {
    // =================================================================
    // Round Errors (1xx)
    // =================================================================
    /// The requested round does not exist in the ledger.
    #[error("DR_ERR_100: Round not found: {0}")]
    RoundNotFound(RoundId),

    /// The round is in the wrong state for the attempted operation.
    #[error("DR_ERR_101: Round {round} is not finalizable in status {status}")]
    RoundNotFinalizable { round: RoundId, status: RoundStatus },

    /// A round status compare-and-swap lost the race to another caller.
    #[error("DR_ERR_102: Round {round} status changed concurrently (expected {expected})")]
    RoundStatusConflict {
        round: RoundId,
        expected: RoundStatus,
    },

    // =================================================================
    // Bid / Sealing Errors (2xx)
    // =================================================================
    /// A sealed bid token could not be decrypted or parsed.
    #[error("DR_ERR_200: Bid decryption failed: {reason}")]
    Decryption { reason: String },

    /// Sealing a bid payload failed.
    #[error("DR_ERR_201: Bid sealing failed: {reason}")]
    Sealing { reason: String },

    /// The requested bid was not found.
    #[error("DR_ERR_202: Bid not found: {0}")]
    BidNotFound(BidId),

    // =================================================================
    // Reserve / Budget Errors (3xx)
    // =================================================================
    /// The auction policy is missing or internally inconsistent.
    #[error("DR_ERR_300: Invalid auction policy: {reason}")]
    InvalidPolicy { reason: String },

    /// A bid exceeds what the team can afford under the reserve rules.
    #[error("DR_ERR_301: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    // =================================================================
    // Tiebreaker Errors (4xx)
    // =================================================================
    /// The requested tiebreaker does not exist.
    #[error("DR_ERR_400: Tiebreaker not found: {0}")]
    TiebreakerNotFound(TiebreakerId),

    /// The tiebreaker is not in the `Active` state.
    #[error("DR_ERR_401: Tiebreaker {id} is not active (status {status})")]
    TiebreakerNotActive {
        id: TiebreakerId,
        status: TiebreakerStatus,
    },

    /// Fewer than two tied bids were supplied at creation.
    #[error("DR_ERR_402: At least 2 tied bids are required, got {count}")]
    NotEnoughTiedBids { count: usize },

    /// An unresolved tiebreaker blocks round finalization.
    #[error("DR_ERR_403: Round {round} has an outstanding tiebreaker: {tiebreaker}")]
    TiebreakerOutstanding {
        round: RoundId,
        tiebreaker: TiebreakerId,
    },

    /// The team is not a participant of this tiebreaker.
    #[error("DR_ERR_404: Team {team} is not part of tiebreaker {tiebreaker}")]
    TeamNotInTiebreaker {
        team: TeamId,
        tiebreaker: TiebreakerId,
    },

    /// A standoff operation was attempted by or on an ineligible team.
    #[error("DR_ERR_405: Invalid standoff move: {reason}")]
    InvalidStandoffMove { reason: String },

    // =================================================================
    // Allocation Errors (5xx)
    // =================================================================
    /// The allocation set failed validation before commit.
    #[error("DR_ERR_500: Invalid allocation for player {player}: {reason}")]
    InvalidAllocation { player: PlayerId, reason: String },

    // =================================================================
    // Commit / Store Errors (6xx)
    // =================================================================
    /// The relational ledger rejected a write.
    #[error("DR_ERR_600: Ledger write failed: {reason}")]
    LedgerWrite { reason: String },

    /// The referenced player does not exist in the ledger.
    #[error("DR_ERR_601: Player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// The team's season document was not found in the roster store.
    #[error("DR_ERR_602: Team sheet not found: {key}")]
    TeamSheetNotFound { key: String },

    /// The document store rejected a roster update.
    #[error("DR_ERR_603: Roster update failed: {reason}")]
    RosterWrite { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("DR_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("DR_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (missing or mis-sized sealing key, etc.).
    #[error("DR_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, DraftroomError>;

impl From<serde_json::Error> for DraftroomError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = DraftroomError::RoundNotFound(RoundId::new());
        let msg = format!("{err}");
        assert!(msg.starts_with("DR_ERR_100"), "Got: {msg}");
    }

    #[test]
    fn insufficient_balance_display() {
        let err = DraftroomError::InsufficientBalance {
            needed: Decimal::new(100, 0),
            available: Decimal::new(50, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("DR_ERR_301"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn tiebreaker_not_active_display() {
        let err = DraftroomError::TiebreakerNotActive {
            id: TiebreakerId::new(),
            status: TiebreakerStatus::Resolved,
        };
        let msg = format!("{err}");
        assert!(msg.contains("DR_ERR_401"));
        assert!(msg.contains("RESOLVED"));
    }

    #[test]
    fn all_errors_have_dr_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(DraftroomError::Decryption {
                reason: "bad tag".into(),
            }),
            Box::new(DraftroomError::NotEnoughTiedBids { count: 1 }),
            Box::new(DraftroomError::InvalidPolicy {
                reason: "phase order".into(),
            }),
            Box::new(DraftroomError::Internal("test".into())),
            Box::new(DraftroomError::Configuration("missing key".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("DR_ERR_"),
                "Error missing DR_ERR_ prefix: {msg}"
            );
        }
    }
}
