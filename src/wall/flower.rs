//! Flower exchange.
//!
//! Flowers never join a winning group. Whenever one is in a hand it is set
//! aside and replaced from the wall's tail, repeating until the hand holds
//! none or the wall runs out.

use smallvec::SmallVec;
use tracing::debug;

use crate::core::{Flower, Seat, Tile};

use super::Wall;

/// Result of one exchange pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowerOutcome {
    /// Flowers removed from the hand, in removal order.
    pub exchanged: SmallVec<[Flower; 4]>,
    /// Tail draws that replaced them, in draw order.
    pub replacements: SmallVec<[Tile; 4]>,
    /// The wall emptied before the hand was flower-free.
    pub exhausted: bool,
}

impl FlowerOutcome {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanged.is_empty()
    }

    /// The last replacement that stayed in the hand.
    #[must_use]
    pub fn kept_replacement(&self) -> Option<Tile> {
        self.replacements.iter().rev().find(|t| !t.is_flower()).copied()
    }
}

/// Swaps flowers out of a hand for tail replacements.
pub struct FlowerExchange;

impl FlowerExchange {
    /// Exchange every flower in `hand`.
    ///
    /// A hand without flowers is left untouched and the wall is not read.
    /// The hand is sorted afterwards when anything changed.
    ///
    /// ```
    /// use mahjong_core::core::parse_tiles;
    /// use mahjong_core::core::Seat;
    /// use mahjong_core::wall::{FlowerExchange, Wall};
    ///
    /// let mut hand = parse_tiles("1c F3 2c").unwrap();
    /// let mut wall = Wall::from_tiles(parse_tiles("9d F1 5b").unwrap(), 0);
    ///
    /// let outcome = FlowerExchange::exchange(Seat::new(0), &mut hand, &mut wall);
    /// assert_eq!(outcome.exchanged.len(), 1);
    /// assert_eq!(hand, parse_tiles("1c 2c 5b").unwrap());
    /// ```
    pub fn exchange(seat: Seat, hand: &mut Vec<Tile>, wall: &mut Wall) -> FlowerOutcome {
        let mut outcome = FlowerOutcome::default();

        while let Some(pos) = hand.iter().position(|t| t.is_flower()) {
            let removed = hand.remove(pos);
            if let Some(flower) = removed.flower() {
                outcome.exchanged.push(flower);
            }
            match wall.draw_replacement() {
                Ok(replacement) => {
                    outcome.replacements.push(replacement);
                    hand.push(replacement);
                }
                Err(_) => {
                    outcome.exhausted = true;
                    break;
                }
            }
        }

        if !outcome.is_empty() {
            hand.sort();
            debug!(
                seat = %seat,
                count = outcome.exchanged.len(),
                exhausted = outcome.exhausted,
                "flowers exchanged"
            );
        }
        outcome
    }
}
