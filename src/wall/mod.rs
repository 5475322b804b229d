//! The wall and everything that feeds tiles into hands.
//!
//! ## Key Types
//!
//! - `Wall`: front draws, tail replacements, dealing
//! - `FlowerExchange`: replaces flowers with tail draws
//! - `decide_dealer`, `open_index`: the dice rolls that start a match and a hand

pub mod dice;
pub mod flower;
#[allow(clippy::module_inception)]
pub mod wall;

pub use dice::{decide_dealer, open_index, open_seat, DealerDraw};
pub use flower::{FlowerExchange, FlowerOutcome};
pub use wall::Wall;
