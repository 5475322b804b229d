//! Scripted deals.
//!
//! `DealScript` builds a `TableState` with chosen hands, front draws and
//! tail replacements. Tiles not named anywhere fill the middle of the wall,
//! so the table always holds the full 144-tile set. Useful for replaying a
//! reported hand and for exercising specific rule paths.
//!
//! ```
//! use mahjong_core::core::{RuleConfig, Seat};
//! use mahjong_core::round::DealScript;
//!
//! let state = DealScript::new(Seat::new(0))
//!     .hand(Seat::new(0), "1c 1c 1c 2c")
//!     .draws("9d")
//!     .build(&RuleConfig::default())
//!     .unwrap();
//!
//! assert_eq!(state.hand_size(Seat::new(0)), 4);
//! assert_eq!(state.wall().iter().next().map(|t| t.to_string()), Some("9d".to_string()));
//! assert!(state.check_conservation().is_ok());
//! ```

use thiserror::Error;

use crate::core::{parse_tiles, ParseTileError, RoundState, RuleConfig, Seat, SeatMap, TableState, Tile, TileCounts};
use crate::rules::Meld;
use crate::wall::Wall;

/// Why a script could not be built.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Parse(#[from] ParseTileError),

    #[error("script uses more copies of {0} than the set holds")]
    TooManyCopies(Tile),
}

/// Builder for a hand-picked table.
#[derive(Clone, Debug)]
pub struct DealScript {
    round: RoundState,
    hands: SeatMap<String>,
    melds: SeatMap<Vec<Meld>>,
    draws: String,
    replacements: String,
    live_wall: Option<usize>,
}

impl DealScript {
    /// Empty script for a first hand dealt by `dealer`.
    #[must_use]
    pub fn new(dealer: Seat) -> Self {
        Self {
            round: RoundState::opening(dealer),
            hands: SeatMap::with_default(),
            melds: SeatMap::with_default(),
            draws: String::new(),
            replacements: String::new(),
            live_wall: None,
        }
    }

    /// Use these round counters. The dealer comes from `round`.
    #[must_use]
    pub fn round(mut self, round: RoundState) -> Self {
        self.round = round;
        self
    }

    /// Concealed tiles for `seat`, in tile notation.
    #[must_use]
    pub fn hand(mut self, seat: Seat, tiles: &str) -> Self {
        self.hands[seat] = tiles.to_string();
        self
    }

    /// A meld `seat` has already exposed.
    #[must_use]
    pub fn meld(mut self, seat: Seat, meld: Meld) -> Self {
        self.melds[seat].push(meld);
        self
    }

    /// Front draws, in order.
    #[must_use]
    pub fn draws(mut self, tiles: &str) -> Self {
        self.draws = tiles.to_string();
        self
    }

    /// Tail replacements, in the order they will be drawn.
    #[must_use]
    pub fn replacements(mut self, tiles: &str) -> Self {
        self.replacements = tiles.to_string();
        self
    }

    /// Leave exactly `n` drawable tiles; the rest of the wall is dead.
    #[must_use]
    pub fn live_wall(mut self, n: usize) -> Self {
        self.live_wall = Some(n);
        self
    }

    /// Build the table state.
    pub fn build(&self, rules: &RuleConfig) -> Result<TableState, ScriptError> {
        let mut pool = TileCounts::from_tiles(&Tile::full_set());

        let mut hands: SeatMap<Vec<Tile>> = SeatMap::with_default();
        for seat in Seat::all() {
            let tiles = parse_tiles(&self.hands[seat])?;
            pool = take(pool, &tiles)?;
            hands[seat] = tiles;
        }
        for (_, melds) in self.melds.iter() {
            for meld in melds {
                pool = take(pool, meld.tiles())?;
            }
        }
        let draws = parse_tiles(&self.draws)?;
        pool = take(pool, &draws)?;
        let replacements = parse_tiles(&self.replacements)?;
        pool = take(pool, &replacements)?;

        // Flowers sit mid-wall so overrunning a scripted end stays quiet.
        let (flowers, plain): (Vec<Tile>, Vec<Tile>) = pool
            .iter()
            .flat_map(|(tile, n)| std::iter::repeat(tile).take(usize::from(n)))
            .partition(|t| t.is_flower());
        let half = plain.len() / 2;

        let mut tiles = draws;
        tiles.extend_from_slice(&plain[..half]);
        tiles.extend(flowers);
        tiles.extend_from_slice(&plain[half..]);
        tiles.extend(replacements.into_iter().rev());

        let dead = match self.live_wall {
            Some(live) => tiles.len().saturating_sub(live),
            None => rules.dead_wall_size,
        };

        let mut state = TableState::new(self.round, hands, Wall::from_tiles(tiles, dead));
        for (seat, melds) in self.melds.iter() {
            for meld in melds {
                state.push_meld(seat, meld.clone());
            }
        }
        Ok(state)
    }
}

fn take(pool: TileCounts, tiles: &[Tile]) -> Result<TileCounts, ScriptError> {
    tiles
        .iter()
        .try_fold(pool, |pool, &tile| pool.without(tile, 1).ok_or(ScriptError::TooManyCopies(tile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TOTAL_TILES;

    #[test]
    fn test_script_conserves_tiles() {
        let state = DealScript::new(Seat::new(2))
            .hand(Seat::new(1), "E E E 5b")
            .meld(Seat::new(3), Meld::pong("9c".parse().unwrap(), Seat::new(0)))
            .draws("3d 4d")
            .replacements("F1 7c")
            .build(&RuleConfig::default())
            .unwrap();

        assert_eq!(state.tile_count(), TOTAL_TILES);
        assert_eq!(state.active(), Seat::new(2));
        assert_eq!(state.melds(Seat::new(3)).len(), 1);
        let tail: Vec<String> = state.wall().iter().rev().take(2).map(ToString::to_string).collect();
        assert_eq!(tail, vec!["F1", "7c"]);
    }

    #[test]
    fn test_too_many_copies() {
        let err = DealScript::new(Seat::new(0))
            .hand(Seat::new(0), "N N N")
            .hand(Seat::new(1), "N N")
            .build(&RuleConfig::default())
            .unwrap_err();
        assert_eq!(err, ScriptError::TooManyCopies("N".parse().unwrap()));
    }

    #[test]
    fn test_live_wall_limit() {
        let state = DealScript::new(Seat::new(0))
            .live_wall(3)
            .build(&RuleConfig::default())
            .unwrap();
        assert_eq!(state.drawable(), 3);
    }

    #[test]
    fn test_bad_notation() {
        let err = DealScript::new(Seat::new(0))
            .draws("1c zz")
            .build(&RuleConfig::default())
            .unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }
}
