//! Meld legality predicates.
//!
//! Pure functions of a hand, its melds and seat adjacency. Nothing here
//! mutates state; the round machine applies whatever these predicates allow.
//!
//! ## Seat rules
//!
//! - Only the discarder's next seat may chi.
//! - With `forbid_predecessor_exposed_kong`, the discarder's immediate
//!   predecessor may pong the discard but never exposed-kong it.

use smallvec::SmallVec;
use tracing::trace;

use crate::core::{RuleConfig, Seat, Tile, TileCounts};

use super::meld::Meld;

/// A candidate run for a chi, sorted low to high. Includes the discard.
pub type ChiRun = [Tile; 3];

/// A kong a seat may declare on its own turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SelfKong {
    /// Upgrade an existing pong with the fourth copy.
    Added(Tile),
    /// Four copies held in hand.
    Concealed(Tile),
}

impl SelfKong {
    #[must_use]
    pub fn tile(self) -> Tile {
        match self {
            SelfKong::Added(t) | SelfKong::Concealed(t) => t,
        }
    }
}

/// Meld legality under a rule set.
#[derive(Clone, Copy, Debug)]
pub struct MeldLegality {
    forbid_predecessor_exposed_kong: bool,
}

impl Default for MeldLegality {
    fn default() -> Self {
        Self::new(&RuleConfig::default())
    }
}

impl MeldLegality {
    #[must_use]
    pub fn new(rules: &RuleConfig) -> Self {
        Self {
            forbid_predecessor_exposed_kong: rules.forbid_predecessor_exposed_kong,
        }
    }

    /// Runs the claimant could form with `discard`.
    ///
    /// Empty unless the claimant sits directly after the discarder and the
    /// discard is a numbered tile. Runs are ordered with the discard at the
    /// high, middle, then low position.
    ///
    /// ```
    /// use mahjong_core::core::{parse_tiles, Seat};
    /// use mahjong_core::rules::MeldLegality;
    ///
    /// let hand = parse_tiles("3c 4c 6c").unwrap();
    /// let discard = "5c".parse().unwrap();
    /// let legality = MeldLegality::default();
    ///
    /// assert_eq!(legality.chi_options(&hand, discard, Seat::new(0), Seat::new(1)).len(), 2);
    /// assert!(legality.chi_options(&hand, discard, Seat::new(0), Seat::new(2)).is_empty());
    /// ```
    pub fn chi_options(
        &self,
        hand: &[Tile],
        discard: Tile,
        discarder: Seat,
        claimant: Seat,
    ) -> SmallVec<[ChiRun; 3]> {
        let mut options = SmallVec::new();
        if claimant != discarder.next() {
            return options;
        }
        let (Some(suit), Some(rank)) = (discard.suit(), discard.rank()) else {
            return options;
        };

        let counts = TileCounts::from_tiles(hand);
        let rank = i16::from(rank);
        for low in [rank - 2, rank - 1, rank] {
            let run = (
                Tile::try_suited(suit, low),
                Tile::try_suited(suit, low + 1),
                Tile::try_suited(suit, low + 2),
            );
            let (Some(a), Some(b), Some(c)) = run else {
                continue;
            };
            let run = [a, b, c];
            let held = run
                .iter()
                .filter(|&&t| t != discard)
                .all(|&t| counts.count(t) >= 1);
            if held {
                options.push(run);
            }
        }
        trace!(seat = %claimant, tile = %discard, options = options.len(), "chi options");
        options
    }

    /// Whether `hand` can pong `discard`.
    #[must_use]
    pub fn can_pong(&self, hand: &[Tile], discard: Tile) -> bool {
        !discard.is_flower() && count_in(hand, discard) >= 2
    }

    /// Whether `claimant` can exposed-kong `discard` from `discarder`.
    ///
    /// Requires exactly three copies in hand.
    #[must_use]
    pub fn can_exposed_kong(&self, hand: &[Tile], discard: Tile, discarder: Seat, claimant: Seat) -> bool {
        if discarder == claimant || discard.is_flower() {
            return false;
        }
        if self.forbid_predecessor_exposed_kong && discarder == claimant.prev() {
            trace!(seat = %claimant, tile = %discard, "predecessor may not exposed-kong");
            return false;
        }
        count_in(hand, discard) == 3
    }

    /// Pongs in `melds` whose fourth copy is in `hand`.
    pub fn added_kong_options(&self, hand: &[Tile], melds: &[Meld]) -> SmallVec<[Tile; 4]> {
        let counts = TileCounts::from_tiles(hand);
        melds
            .iter()
            .filter_map(|m| m.set_tile().filter(|&t| m.is_pong_of(t)))
            .filter(|&t| counts.count(t) >= 1)
            .collect()
    }

    /// Tile values held four times.
    pub fn concealed_kong_options(&self, hand: &[Tile]) -> SmallVec<[Tile; 4]> {
        TileCounts::from_tiles(hand)
            .iter()
            .filter(|&(t, c)| c >= 4 && !t.is_flower())
            .map(|(t, _)| t)
            .collect()
    }

    /// Every kong available on a self-draw: added kongs first, then concealed.
    pub fn self_kong_options(&self, hand: &[Tile], melds: &[Meld]) -> SmallVec<[SelfKong; 4]> {
        let mut options: SmallVec<[SelfKong; 4]> = self
            .added_kong_options(hand, melds)
            .into_iter()
            .map(SelfKong::Added)
            .collect();
        options.extend(self.concealed_kong_options(hand).into_iter().map(SelfKong::Concealed));
        options
    }
}

fn count_in(hand: &[Tile], tile: Tile) -> usize {
    hand.iter().filter(|&&t| t == tile).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_tiles;

    fn tile(code: &str) -> Tile {
        code.parse().unwrap()
    }

    #[test]
    fn test_chi_enumerates_positions() {
        let legality = MeldLegality::default();
        let hand = parse_tiles("3b 4b 6b 7b").unwrap();
        let options = legality.chi_options(&hand, tile("5b"), Seat::new(3), Seat::new(0));

        let text: Vec<String> = options
            .iter()
            .map(|run| run.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "))
            .collect();
        assert_eq!(text, vec!["3b 4b 5b", "4b 5b 6b", "5b 6b 7b"]);
    }

    #[test]
    fn test_chi_edges_and_honors() {
        let legality = MeldLegality::default();
        let hand = parse_tiles("2d 3d 8d 9d E E").unwrap();

        assert_eq!(legality.chi_options(&hand, tile("1d"), Seat::new(0), Seat::new(1)).len(), 1);
        assert_eq!(legality.chi_options(&hand, tile("7d"), Seat::new(0), Seat::new(1)).len(), 1);
        assert!(legality.chi_options(&hand, tile("E"), Seat::new(0), Seat::new(1)).is_empty());
        // Same rank in another suit does not help.
        assert!(legality.chi_options(&hand, tile("1c"), Seat::new(0), Seat::new(1)).is_empty());
    }

    #[test]
    fn test_pong_needs_two() {
        let legality = MeldLegality::default();
        let hand = parse_tiles("Rd Rd 5c").unwrap();
        assert!(legality.can_pong(&hand, tile("Rd")));
        assert!(!legality.can_pong(&hand, tile("5c")));
    }

    #[test]
    fn test_exposed_kong_predecessor_rule() {
        let hand = parse_tiles("9c 9c 9c 1b").unwrap();
        let claimant = Seat::new(1);

        let strict = MeldLegality::default();
        assert!(!strict.can_exposed_kong(&hand, tile("9c"), Seat::new(0), claimant));
        assert!(strict.can_pong(&hand, tile("9c")));
        assert!(strict.can_exposed_kong(&hand, tile("9c"), Seat::new(2), claimant));
        assert!(strict.can_exposed_kong(&hand, tile("9c"), Seat::new(3), claimant));

        let relaxed = MeldLegality::new(&RuleConfig::default().with_predecessor_kong_restriction(false));
        assert!(relaxed.can_exposed_kong(&hand, tile("9c"), Seat::new(0), claimant));
    }

    #[test]
    fn test_exposed_kong_needs_exactly_three() {
        let legality = MeldLegality::default();
        let two = parse_tiles("9c 9c").unwrap();
        assert!(!legality.can_exposed_kong(&two, tile("9c"), Seat::new(2), Seat::new(0)));
    }

    #[test]
    fn test_self_kong_order() {
        let legality = MeldLegality::default();
        let hand = parse_tiles("1c 1c 1c 1c 5d W").unwrap();
        let melds = vec![Meld::pong(tile("W"), Seat::new(2)), Meld::pong(tile("3b"), Seat::new(2))];

        let options = legality.self_kong_options(&hand, &melds);
        assert_eq!(
            options.as_slice(),
            &[SelfKong::Added(tile("W")), SelfKong::Concealed(tile("1c"))]
        );
    }
}
