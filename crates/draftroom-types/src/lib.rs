//! # draftroom-types
//!
//! Shared types, errors, and configuration for the **Draftroom** sealed-bid
//! auction allocation engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`RoundId`], [`BidId`], [`TeamId`], [`PlayerId`], [`TiebreakerId`], [`SeasonId`]
//! - **Round model**: [`Round`], [`RoundStatus`]
//! - **Bid model**: [`SealedBid`], [`UnsealedBid`], [`BidStatus`], [`BidPhase`]
//! - **Tiebreaker model**: [`Tiebreaker`], [`TeamTiebreaker`], [`TiebreakerStatus`], [`ResolutionMode`]
//! - **Allocation model**: [`Allocation`], [`AllocationPhase`], [`FinalizationReport`]
//! - **Reserve model**: [`AuctionPhase`], [`ReserveInfo`], [`ReserveBreakdown`], [`BidAssessment`]
//! - **Roster model**: [`TeamSheet`], [`TeamSeasonKey`]
//! - **Player / ownership model**: [`PlayerRecord`], [`OwnershipRecord`]
//! - **Contracts**: [`ContractTerms`]
//! - **Configuration**: [`AuctionPolicy`]
//! - **Errors**: [`DraftroomError`] with `DR_ERR_` prefix codes

pub mod allocation;
pub mod bid;
pub mod config;
pub mod constants;
pub mod contract;
pub mod error;
pub mod ids;
pub mod ownership;
pub mod player;
pub mod reserve;
pub mod roster;
pub mod round;
pub mod tiebreaker;

// Re-export all primary types at crate root for ergonomic imports:
//   use draftroom_types::{Round, SealedBid, Tiebreaker, ...};

pub use allocation::*;
pub use bid::*;
pub use config::*;
pub use contract::*;
pub use error::*;
pub use ids::*;
pub use ownership::*;
pub use player::*;
pub use reserve::*;
pub use roster::*;
pub use round::*;
pub use tiebreaker::*;

// Constants are accessed via `draftroom_types::constants::FOO`
// (not re-exported to avoid name collisions).
