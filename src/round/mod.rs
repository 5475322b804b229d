//! One hand of play and the progression between hands.
//!
//! - `machine`: the turn/reaction state machine for a single hand
//! - `events`: push-only notifications of what happened at the table
//! - `progression`: dealer, hand and wind counters between hands
//! - `script`: hand-picked deals for replays and tests

pub mod events;
pub mod machine;
pub mod progression;
pub mod script;

pub use events::{DrawEnd, EventLog, EventSink, TableEvent};
pub use machine::{Phase, RoundOutcome, RoundStateMachine, SeatControl, SelfDecision, SelfTurn, WinSource};
pub use progression::MatchProgress;
pub use script::{DealScript, ScriptError};
