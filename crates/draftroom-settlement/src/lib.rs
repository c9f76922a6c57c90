//! # draftroom-settlement
//!
//! **Finality Plane**: tiebreaker lifecycle, allocation commitment, and
//! the `AuctionEngine` facade over the two stores.
//!
//! ## Architecture
//!
//! The Finality Plane takes a [`FinalizationReport`] from AllocCore and:
//! 1. Creates and resolves tiebreakers for contested top bids
//! 2. Commits allocations: bid statuses, ownership ledger, player sales
//! 3. Applies best-effort roster updates, repaired by reconciliation
//! 4. Completes the round with a compare-and-swap status transition
//!
//! ## Commit Discipline
//!
//! - Relational writes (bids, ownership, players) must all succeed
//! - Roster document writes are best-effort; [`reconcile_roster`] rebuilds
//!   a season's sheets from the ownership ledger at any time
//! - Re-running a committed round is a no-op, not an error
//!
//! [`FinalizationReport`]: draftroom_types::FinalizationReport

pub mod bulk;
pub mod committer;
pub mod engine;
pub mod store;
pub mod tiebreaker;

pub use bulk::{BulkStandoff, StandoffSeat, StandoffStatus};
pub use committer::{apply_finalization, commit_standoff, reconcile_roster};
pub use engine::AuctionEngine;
pub use store::{LedgerStore, MemoryLedger, MemoryRoster, RosterStore};
pub use tiebreaker::{all_teams_submitted, create_tiebreaker, resolve, submit_rebid};
