//! Core types: seats, tiles, state, RNG, configuration and errors.
//!
//! Everything else in the crate builds on these. Nothing in this module
//! knows about turn order beyond seat adjacency.

pub mod config;
pub mod error;
pub mod rng;
pub mod seat;
pub mod state;
pub mod tile;

pub use config::{ConfigError, RuleConfig};
pub use error::{EngineError, EngineResult};
pub use rng::{DiceRoll, GameRng, GameRngState};
pub use seat::{Seat, SeatMap, COUNTER_CLOCKWISE_RING, SEAT_COUNT};
pub use state::{RoundState, TableState};
pub use tile::{parse_tiles, Flower, Honor, ParseTileError, Suit, Tile, TileCounts, DISTINCT_TILES, TOTAL_TILES};
