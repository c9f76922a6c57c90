//! # draftroom-alloccore
//!
//! **Pure deterministic round allocation for Draftroom.**
//!
//! AllocCore is the compute plane -- it takes the unsealed working set of
//! a round's bids and produces the provisional allocation. It has:
//!
//! - **Zero side effects**: no store writes, no balance checks, no
//!   tiebreaker persistence
//! - **Deterministic output**: same bids -> same allocations (the fallback
//!   path takes its randomness as an injected `Rng`)
//! - **Tie halting**: a shared top (amount, player) pair stops allocation
//!   and surfaces the tied set instead of picking a silent winner

pub mod allocator;
pub mod fallback;

pub use allocator::{GreedyOutcome, allocate};
pub use fallback::{FallbackCandidate, fallback, mean_regular_amount};
