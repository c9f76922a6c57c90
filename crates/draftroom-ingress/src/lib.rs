//! # draftroom-ingress
//!
//! **Bid Envelope Plane**: bid sealing, reserve calculation, and bid
//! amount validation.
//!
//! ## Architecture
//!
//! The Bid Envelope sits between the API layer and the allocation core:
//! 1. **BidSealer**: encrypts `(player, amount)` payloads into opaque
//!    tokens at submission time and decrypts them at finalization
//! 2. **Reserve calculator**: pure functions computing the budget a team
//!    must keep unspent for future mandatory rounds
//! 3. **Bid validation**: phase-aware accept/reject/warn verdict on a
//!    proposed amount
//!
//! ## Bid Flow
//!
//! ```text
//! API → validate_bid() → BidSealer.seal() → SealedBid → ledger
//!     → (at finalization) BidSealer.unseal() → AllocCore
//! ```
//!
//! Bid contents stay opaque until the round finalizes; nothing between
//! submission and finalization can read a rival's amount.

pub mod reserve;
pub mod sealer;

pub use reserve::{Participation, can_participate, compute_reserve, summarize_reserve, validate_bid};
pub use sealer::BidSealer;
