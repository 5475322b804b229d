//! Discard decisions for automated seats.
//!
//! A `DecisionProvider` only names a tile; the table validates it against
//! the frozen request and applies the fallback when the answer is unusable.

use serde::{Deserialize, Serialize};

use crate::core::{Seat, Tile, TileCounts};
use crate::rules::Meld;

// =============================================================================
// Request
// =============================================================================

/// What an automated seat sees when asked to discard.
///
/// Frozen when the decision is scheduled; later table changes do not
/// reach it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardRequest {
    pub seat: Seat,
    /// The seat's concealed hand, sorted.
    pub hand: Vec<Tile>,
    pub melds: Vec<Meld>,
    /// Distinct tiles the seat may discard.
    pub legal_discards: Vec<Tile>,
    /// Most recent draw, used by the fallback.
    pub last_drawn: Option<Tile>,
}

impl DiscardRequest {
    /// Whether `tile` is an acceptable answer.
    #[must_use]
    pub fn accepts(&self, tile: Tile) -> bool {
        self.legal_discards.contains(&tile)
    }

    /// Discard used when the provider gives no usable answer: the last drawn
    /// tile if still held, else the last tile of the hand.
    #[must_use]
    pub fn fallback(&self) -> Option<Tile> {
        self.last_drawn
            .filter(|t| self.hand.contains(t))
            .or_else(|| self.hand.last().copied())
    }
}

// =============================================================================
// Provider
// =============================================================================

/// Chooses discards for automated seats.
pub trait DecisionProvider: Send + Sync {
    /// Pick a tile to discard, or `None` to take the fallback.
    fn choose_discard(&self, request: &DiscardRequest) -> Option<Tile>;
}

/// Heuristic discard: drop whatever helps the hand least.
///
/// Each tile is scored; the highest score is discarded.
///
/// | Tile                         | Score |
/// |------------------------------|-------|
/// | honor                        | +3    |
/// | lone honor                   | +2    |
/// | honor held three or more     | -2    |
/// | number with no neighbour     | +3    |
/// | number with a neighbour      | -2    |
/// | number held twice or more    | -1    |
///
/// Ties go to the highest tile in canonical order.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyDiscard;

impl GreedyDiscard {
    /// Score of discarding `tile` from a hand with `counts`.
    #[must_use]
    pub fn score(tile: Tile, counts: &TileCounts) -> i32 {
        let held = counts.count(tile);
        if tile.is_honor() {
            let mut score = 3;
            if held == 1 {
                score += 2;
            }
            if held >= 3 {
                score -= 2;
            }
            return score;
        }

        let Some(suit) = tile.suit() else {
            return 0;
        };
        let rank = i16::from(tile.rank().unwrap_or(0));
        let neighbour = [rank - 1, rank + 1]
            .into_iter()
            .filter_map(|r| Tile::try_suited(suit, r))
            .any(|t| counts.count(t) > 0);

        let mut score = if neighbour { -2 } else { 3 };
        if held >= 2 {
            score -= 1;
        }
        score
    }
}

impl DecisionProvider for GreedyDiscard {
    fn choose_discard(&self, request: &DiscardRequest) -> Option<Tile> {
        let counts = TileCounts::from_tiles(&request.hand);
        request
            .legal_discards
            .iter()
            .copied()
            .max_by(|&a, &b| {
                Self::score(a, &counts)
                    .cmp(&Self::score(b, &counts))
                    .then_with(|| a.cmp(&b))
            })
    }
}
