//! Win detection.
//!
//! A complete hand is a set of groups (triplets or runs) plus one pair,
//! where declared melds count as groups, or the seven-pairs shape.
//!
//! ## Search
//!
//! For each tile value held at least twice, set two aside as the pair and
//! decompose the rest. The decomposition always takes the lowest remaining
//! tile and tries it first as a triplet, then as the bottom of a run. The
//! counts are a `Copy` array, so every branch owns its remainder and nothing
//! is undone on backtrack.
//!
//! ```
//! use mahjong_core::core::parse_tiles;
//! use mahjong_core::rules::WinDetector;
//!
//! let detector = WinDetector::default();
//! let hand = parse_tiles("1c 2c 3c 4c 5c 6c 7c 8c 9c 1c 2c 3c 9c 9c").unwrap();
//! assert!(detector.is_winning(&hand, 0));
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{RuleConfig, Suit, Tile, TileCounts};

use super::meld::Meld;

/// How a winning hand decomposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinShape {
    Standard,
    SevenPairs,
}

/// Suit composition of a winning hand, melds included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuitPurity {
    /// One numbered suit, no honors.
    Pure,
    /// One numbered suit plus honors.
    Mixed,
    Neither,
}

impl SuitPurity {
    /// Classify a set of tiles. Flowers are ignored.
    #[must_use]
    pub fn classify<'a>(tiles: impl IntoIterator<Item = &'a Tile>) -> Self {
        let mut suit: Option<Suit> = None;
        let mut honors = false;
        for tile in tiles {
            if tile.is_honor() {
                honors = true;
            } else if let Some(s) = tile.suit() {
                match suit {
                    None => suit = Some(s),
                    Some(seen) if seen != s => return SuitPurity::Neither,
                    Some(_) => {}
                }
            }
        }
        match (suit, honors) {
            (Some(_), false) => SuitPurity::Pure,
            (Some(_), true) => SuitPurity::Mixed,
            (None, _) => SuitPurity::Neither,
        }
    }
}

/// Structural attributes of a win, for the scoring collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinAttributes {
    pub self_draw: bool,
    pub winning_tile: Tile,
    pub seven_pairs: bool,
    /// No chi, pong, exposed kong or added kong declared.
    pub fully_concealed: bool,
    pub suit_purity: SuitPurity,
}

/// A confirmed win: the final hand, its melds and attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinReport {
    pub hand: Vec<Tile>,
    pub melds: Vec<Meld>,
    pub attributes: WinAttributes,
}

/// Decides whether tiles form a complete hand.
#[derive(Clone, Copy, Debug)]
pub struct WinDetector {
    groups_per_hand: usize,
    seven_pairs: bool,
}

impl Default for WinDetector {
    fn default() -> Self {
        Self::new(&RuleConfig::default())
    }
}

impl WinDetector {
    #[must_use]
    pub fn new(rules: &RuleConfig) -> Self {
        Self {
            groups_per_hand: rules.groups_per_hand,
            seven_pairs: rules.seven_pairs,
        }
    }

    /// Whether `tiles` (the concealed part) completes a hand with `exposed`
    /// declared melds.
    #[must_use]
    pub fn is_winning(&self, tiles: &[Tile], exposed: usize) -> bool {
        self.shape(tiles, exposed).is_some()
    }

    /// The winning shape, preferring the standard decomposition.
    #[must_use]
    pub fn shape(&self, tiles: &[Tile], exposed: usize) -> Option<WinShape> {
        let counts = TileCounts::from_tiles(tiles);
        if self.is_standard(&counts, exposed) {
            Some(WinShape::Standard)
        } else if self.is_seven_pairs(&counts, exposed) {
            Some(WinShape::SevenPairs)
        } else {
            None
        }
    }

    /// Full evaluation of a seat's hand with its winning tile included.
    ///
    /// Returns `None` if the hand is not complete.
    #[must_use]
    pub fn evaluate(&self, hand: &[Tile], melds: &[Meld], winning_tile: Tile, self_draw: bool) -> Option<WinReport> {
        let counts = TileCounts::from_tiles(hand);
        let standard = self.is_standard(&counts, melds.len());
        let seven_pairs = self.is_seven_pairs(&counts, melds.len());
        trace!(tile = %winning_tile, standard, seven_pairs, "win check");
        if !standard && !seven_pairs {
            return None;
        }

        let all_tiles = hand.iter().chain(melds.iter().flat_map(|m| m.tiles().iter()));
        let attributes = WinAttributes {
            self_draw,
            winning_tile,
            seven_pairs,
            fully_concealed: melds.iter().all(|m| !m.kind().is_exposed()),
            suit_purity: SuitPurity::classify(all_tiles),
        };
        Some(WinReport {
            hand: hand.to_vec(),
            melds: melds.to_vec(),
            attributes,
        })
    }

    fn is_standard(&self, counts: &TileCounts, exposed: usize) -> bool {
        let total = counts.total();
        if total < 2 || total % 3 != 2 {
            return false;
        }
        let needed = (total - 2) / 3;
        if needed + exposed > self.groups_per_hand {
            return false;
        }
        counts
            .iter()
            .filter(|&(tile, count)| count >= 2 && !tile.is_flower())
            .filter_map(|(tile, _)| counts.without(tile, 2))
            .any(|rest| decompose(rest, needed))
    }

    fn is_seven_pairs(&self, counts: &TileCounts, exposed: usize) -> bool {
        self.seven_pairs
            && exposed == 0
            && counts.total() == 14
            && counts.distinct() == 7
            && counts.iter().all(|(tile, count)| count == 2 && !tile.is_flower())
    }
}

/// Remove exactly `needed` groups from `counts`, leaving nothing.
fn decompose(counts: TileCounts, needed: usize) -> bool {
    let Some(lowest) = counts.lowest() else {
        return needed == 0;
    };
    if needed == 0 || lowest.is_flower() {
        return false;
    }

    if let Some(rest) = counts.without(lowest, 3) {
        if decompose(rest, needed - 1) {
            return true;
        }
    }

    let run = lowest
        .successor()
        .and_then(|second| second.successor().map(|third| (second, third)));
    if let Some((second, third)) = run {
        let rest = counts
            .without(lowest, 1)
            .and_then(|c| c.without(second, 1))
            .and_then(|c| c.without(third, 1));
        if let Some(rest) = rest {
            return decompose(rest, needed - 1);
        }
    }
    false
}
