//! Claim windows after a discard.
//!
//! When a seat discards, every other seat's legal claims are computed once
//! from the same frozen state and stored in a `ReactionContext`. Seats then
//! answer (claim or pass) in any order; when all have answered, the
//! `ReactionArbiter` picks a single winner by priority.
//!
//! ## Priority
//!
//! | Claim | Rank |
//! |-------|------|
//! | Win | 4 |
//! | Exposed kong | 3 |
//! | Pong | 2 |
//! | Chi | 1 |
//!
//! Ties go to the seat nearest the discarder clockwise.

pub mod arbiter;
pub mod claim;

pub use arbiter::{ReactionArbiter, ReactionContext};
pub use claim::{Claim, ClaimKind, ClaimOptions, Response};
