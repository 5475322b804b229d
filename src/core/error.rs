//! Engine error types.
//!
//! Every rejection is local: a transition that returns an error has not
//! mutated any state. The caller receives the structured reason.

use thiserror::Error;

use super::seat::Seat;
use super::tile::Tile;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A claim failed the meld or win rules at resolution time.
    #[error("{seat} cannot claim {claim}: {reason}")]
    IllegalClaim {
        seat: Seat,
        claim: &'static str,
        reason: &'static str,
    },

    /// Draw, discard or decision requested by the wrong seat or in the wrong phase.
    #[error("{seat} cannot act now: {reason}")]
    OutOfTurnAction { seat: Seat, reason: &'static str },

    /// A discard named a tile the seat does not hold.
    #[error("{seat} does not hold {tile}")]
    TileNotHeld { seat: Seat, tile: Tile },

    /// No drawable tile remains.
    #[error("wall exhausted")]
    WallExhausted,

    /// Tile conservation failed; the round cannot continue.
    #[error("tile conservation violated: counted {counted} of {expected}")]
    InvariantViolation { counted: usize, expected: usize },

    /// A scheduled decision whose ticket was cancelled or already used.
    #[error("decision ticket {ticket} is no longer pending")]
    StaleDecision { ticket: u64 },
}

impl EngineError {
    /// Shorthand for an out-of-turn rejection.
    pub(crate) fn out_of_turn(seat: Seat, reason: &'static str) -> Self {
        EngineError::OutOfTurnAction { seat, reason }
    }

    /// Shorthand for an illegal claim rejection.
    pub(crate) fn illegal(seat: Seat, claim: &'static str, reason: &'static str) -> Self {
        EngineError::IllegalClaim { seat, claim, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Suit;

    #[test]
    fn test_messages() {
        let err = EngineError::out_of_turn(Seat(2), "round is over");
        assert_eq!(err.to_string(), "Seat 2 cannot act now: round is over");

        let err = EngineError::TileNotHeld {
            seat: Seat(1),
            tile: Tile::suited(Suit::Bamboo, 4),
        };
        assert_eq!(err.to_string(), "Seat 1 does not hold 4b");

        let err = EngineError::InvariantViolation { counted: 143, expected: 144 };
        assert!(err.to_string().contains("143"));
    }
}
