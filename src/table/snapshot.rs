//! Replication snapshots.
//!
//! `PublicSnapshot` carries what every seat may see: discards, melds,
//! flowers, hand sizes and a drawable count in place of the wall, so draw
//! order never leaks. Concealed kongs lie face down, so only their count
//! is public. `SeatSnapshot` adds one seat's own hand and melds.
//!
//! ```
//! use mahjong_core::core::{GameRng, RoundState, RuleConfig, Seat, SeatMap};
//! use mahjong_core::round::{RoundStateMachine, SeatControl};
//! use mahjong_core::table::PublicSnapshot;
//!
//! let rng = GameRng::new(3);
//! let controls = SeatMap::with_value(SeatControl::Human);
//! let machine = RoundStateMachine::setup(
//!     RuleConfig::default(),
//!     RoundState::opening(Seat::new(0)),
//!     controls,
//!     &rng,
//! )
//! .unwrap();
//!
//! let snapshot = PublicSnapshot::capture(&machine);
//! let bytes = snapshot.encode().unwrap();
//! assert_eq!(PublicSnapshot::decode(&bytes).unwrap(), snapshot);
//! ```

use im::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Flower, RoundState, Seat, SeatMap, Tile};
use crate::round::{Phase, RoundStateMachine};
use crate::rules::{Meld, MeldKind};

/// Snapshot encoding failure.
#[derive(Debug, Error)]
#[error("snapshot encoding failed: {0}")]
pub struct SnapshotError(#[from] bincode::Error);

/// Table state visible to every seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSnapshot {
    pub round: RoundState,
    pub active: Seat,
    /// A decision is pending; draws and discards are refused.
    pub locked: bool,
    pub over: bool,
    pub drawable: usize,
    pub hand_sizes: SeatMap<usize>,
    pub discards: SeatMap<Vector<Tile>>,
    /// Face-up melds only.
    pub melds: SeatMap<Vector<Meld>>,
    pub concealed_kongs: SeatMap<usize>,
    pub flowers: SeatMap<Vector<Flower>>,
}

impl PublicSnapshot {
    #[must_use]
    pub fn capture(machine: &RoundStateMachine) -> Self {
        let state = machine.state();
        Self {
            round: state.round,
            active: state.active(),
            locked: machine.is_locked(),
            over: matches!(machine.phase(), Phase::RoundOver(_)),
            drawable: state.drawable(),
            hand_sizes: SeatMap::new(|seat| state.hand_size(seat)),
            discards: SeatMap::new(|seat| state.discards(seat).clone()),
            melds: SeatMap::new(|seat| {
                state
                    .melds(seat)
                    .iter()
                    .filter(|m| m.kind() != MeldKind::ConcealedKong)
                    .cloned()
                    .collect()
            }),
            concealed_kongs: SeatMap::new(|seat| {
                state
                    .melds(seat)
                    .iter()
                    .filter(|m| m.kind() == MeldKind::ConcealedKong)
                    .count()
            }),
            flowers: SeatMap::new(|seat| state.flowers(seat).clone()),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Public state plus one seat's concealed hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSnapshot {
    pub seat: Seat,
    pub hand: Vec<Tile>,
    /// The seat's own melds, concealed kongs included.
    pub melds: Vector<Meld>,
    pub public: PublicSnapshot,
}

impl SeatSnapshot {
    #[must_use]
    pub fn capture(machine: &RoundStateMachine, seat: Seat) -> Self {
        Self {
            seat,
            hand: machine.state().hand(seat).to_vec(),
            melds: machine.state().melds(seat).clone(),
            public: PublicSnapshot::capture(machine),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
