//! Outside collaborators: discard decisions for automated seats and hand
//! scoring.
//!
//! Both are traits so a table can be driven by anything from the built-in
//! greedy heuristic to a remote player or a trained policy.

pub mod provider;
pub mod scorer;

pub use provider::{DecisionProvider, DiscardRequest, GreedyDiscard};
pub use scorer::{NullScorer, ScoreRequest, ScoreSheet, Scorer};
