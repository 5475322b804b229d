//! # mahjong-core
//!
//! Rule engine and turn/reaction state machine for 16-tile Mahjong.
//!
//! ## Design Principles
//!
//! 1. **One current phase**: a hand is a `RoundStateMachine` with exactly
//!    one `Phase`. Every request is checked against it; a rejected request
//!    changes nothing.
//!
//! 2. **Frozen decisions**: claim options are computed once, from the state
//!    at discard time. Automated seats decide from the same frozen view,
//!    however long their think delay.
//!
//! 3. **Every tile accounted for**: hands, melds, discards, set-aside
//!    flowers and the wall always total 144. A failed check aborts the hand.
//!
//! 4. **Seeded**: one seed reproduces a whole match, from the dealer
//!    roll-off to each think delay.
//!
//! ## Modules
//!
//! - `core`: seats, tiles, table state, RNG, rule configuration, errors
//! - `wall`: wall building, dealing, dice and flower exchange
//! - `rules`: melds, meld legality and win detection
//! - `reaction`: claim options and arbitration after a discard
//! - `round`: the per-hand state machine, events and dealer progression
//! - `agents`: decision provider and scorer collaborators
//! - `table`: match sessions, scheduled decisions and snapshots
//!
//! ## Example
//!
//! ```
//! use mahjong_core::core::parse_tiles;
//! use mahjong_core::rules::WinDetector;
//!
//! let hand = parse_tiles("1c 2c 3c 4c 5c 6c 7c 8c 9c 1c 2c 3c 9c 9c").unwrap();
//! assert!(WinDetector::default().is_winning(&hand, 0));
//! ```

pub mod agents;
pub mod core;
pub mod reaction;
pub mod round;
pub mod rules;
pub mod table;
pub mod wall;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, EngineError, EngineResult, GameRng, RoundState, RuleConfig, Seat, SeatMap, TableState, Tile,
};

pub use crate::rules::{Meld, MeldKind, MeldLegality, WinDetector, WinReport};

pub use crate::reaction::{Claim, ReactionArbiter, Response};

pub use crate::round::{
    MatchProgress, Phase, RoundOutcome, RoundStateMachine, SeatControl, SelfDecision, TableEvent, WinSource,
};

pub use crate::agents::{DecisionProvider, GreedyDiscard, Scorer};

pub use crate::table::{Table, TableBuilder, TableStatus};
