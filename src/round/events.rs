//! Round events pushed to the presentation and replication layer.
//!
//! Events are push-only: the engine never reads anything back from a sink.
//! A drawn tile is private to the drawer and a concealed kong is laid face
//! down, so [`TableEvent::redacted_for`] hides both from everyone else.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{DiceRoll, Flower, RoundState, Seat, Tile};
use crate::rules::{Meld, MeldKind};

use super::machine::RoundOutcome;

/// Which end of the wall a draw came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawEnd {
    /// Normal draw from the live front.
    Front,
    /// Kong or flower replacement from the tail.
    Tail,
}

/// Something that happened at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableEvent {
    /// A hand was dealt.
    RoundStarted {
        round: RoundState,
        dice: DiceRoll,
        open_index: usize,
    },

    /// A tile entered a hand from the wall. `tile` is `None` once redacted.
    TileDrawn {
        seat: Seat,
        tile: Option<Tile>,
        from: DrawEnd,
    },

    TileDiscarded { seat: Seat, tile: Tile },

    /// A meld was declared. `meld` is `None` once a concealed kong is
    /// redacted.
    MeldFormed { seat: Seat, meld: Option<Meld> },

    FlowersExchanged {
        seat: Seat,
        flowers: SmallVec<[Flower; 4]>,
    },

    RoundOver { outcome: RoundOutcome },
}

impl TableEvent {
    /// The event as `viewer` may see it.
    #[must_use]
    pub fn redacted_for(&self, viewer: Seat) -> Self {
        match self {
            TableEvent::TileDrawn { seat, from, .. } if *seat != viewer => TableEvent::TileDrawn {
                seat: *seat,
                tile: None,
                from: *from,
            },
            TableEvent::MeldFormed { seat, meld: Some(meld) }
                if *seat != viewer && meld.kind() == MeldKind::ConcealedKong =>
            {
                TableEvent::MeldFormed { seat: *seat, meld: None }
            }
            other => other.clone(),
        }
    }

    /// Seat the event concerns, if any.
    #[must_use]
    pub fn seat(&self) -> Option<Seat> {
        match self {
            TableEvent::TileDrawn { seat, .. }
            | TableEvent::TileDiscarded { seat, .. }
            | TableEvent::MeldFormed { seat, .. }
            | TableEvent::FlowersExchanged { seat, .. } => Some(*seat),
            TableEvent::RoundOver { outcome } => outcome.winner(),
            TableEvent::RoundStarted { .. } => None,
        }
    }
}

/// Receiver of table events.
pub trait EventSink {
    fn publish(&mut self, event: &TableEvent);
}

/// Sink that keeps every event.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vector<TableEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &Vector<TableEvent> {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The log as `viewer` may see it.
    #[must_use]
    pub fn for_seat(&self, viewer: Seat) -> Vec<TableEvent> {
        self.events.iter().map(|e| e.redacted_for(viewer)).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for EventLog {
    fn publish(&mut self, event: &TableEvent) {
        self.events.push_back(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction_hides_other_draws() {
        let tile: Tile = "7b".parse().unwrap();
        let event = TableEvent::TileDrawn {
            seat: Seat::new(1),
            tile: Some(tile),
            from: DrawEnd::Front,
        };

        assert_eq!(event.redacted_for(Seat::new(1)), event);
        assert_eq!(
            event.redacted_for(Seat::new(2)),
            TableEvent::TileDrawn {
                seat: Seat::new(1),
                tile: None,
                from: DrawEnd::Front
            }
        );
    }

    #[test]
    fn test_concealed_kong_face_down() {
        let kong = TableEvent::MeldFormed {
            seat: Seat::new(3),
            meld: Some(Meld::concealed_kong("Gd".parse().unwrap())),
        };
        assert_eq!(kong.redacted_for(Seat::new(3)), kong);
        assert_eq!(
            kong.redacted_for(Seat::new(0)),
            TableEvent::MeldFormed {
                seat: Seat::new(3),
                meld: None
            }
        );

        let pong = TableEvent::MeldFormed {
            seat: Seat::new(3),
            meld: Some(Meld::pong("Gd".parse().unwrap(), Seat::new(1))),
        };
        assert_eq!(pong.redacted_for(Seat::new(0)), pong);
    }

    #[test]
    fn test_discards_are_public() {
        let event = TableEvent::TileDiscarded {
            seat: Seat::new(0),
            tile: "N".parse().unwrap(),
        };
        assert_eq!(event.redacted_for(Seat::new(3)), event);
        assert_eq!(event.seat(), Some(Seat::new(0)));
    }

    #[test]
    fn test_event_log_collects() {
        let mut log = EventLog::new();
        log.publish(&TableEvent::RoundOver {
            outcome: RoundOutcome::Exhausted,
        });
        log.publish(&TableEvent::TileDrawn {
            seat: Seat::new(0),
            tile: Some("1c".parse().unwrap()),
            from: DrawEnd::Tail,
        });

        assert_eq!(log.len(), 2);
        let seen = log.for_seat(Seat::new(3));
        assert!(matches!(seen[1], TableEvent::TileDrawn { tile: None, .. }));
    }

    #[test]
    fn test_event_serialization() {
        let event = TableEvent::FlowersExchanged {
            seat: Seat::new(2),
            flowers: SmallVec::from_slice(&[Flower::Plum]),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: TableEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
