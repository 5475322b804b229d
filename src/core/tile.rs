//! Tile values and tile-count mappings.
//!
//! Tiles are values, not identities: two `Tile`s are equal when their suit
//! and rank (or symbol) match. The full set has 144 tiles:
//!
//! - 3 suits × 9 ranks × 4 copies = 108 numbered tiles
//! - 7 honors × 4 copies = 28 honor tiles
//! - 8 distinct flowers × 1 copy = 8 flower tiles
//!
//! ## Notation
//!
//! | Tile | Notation |
//! |------|----------|
//! | Characters | `1c` .. `9c` |
//! | Bamboo | `1b` .. `9b` |
//! | Circles | `1d` .. `9d` |
//! | Winds | `E` `S` `W` `N` |
//! | Dragons | `Rd` `Gd` `Wd` |
//! | Flowers | `F1` .. `F8` |
//!
//! ```
//! use mahjong_core::core::{parse_tiles, Suit, Tile};
//!
//! let tiles = parse_tiles("1c 2c 3c E F1").unwrap();
//! assert_eq!(tiles[0], Tile::suited(Suit::Character, 1));
//! assert!(tiles[3].is_honor());
//! assert!(tiles[4].is_flower());
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Number of distinct tile values (27 suited + 7 honors + 8 flowers).
pub const DISTINCT_TILES: usize = 42;

/// Total number of tiles in a full set.
pub const TOTAL_TILES: usize = 144;

/// Numbered suit. Ordering is the canonical hand order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Character,
    Bamboo,
    Circle,
}

impl Suit {
    pub const ALL: [Suit; 3] = [Suit::Character, Suit::Bamboo, Suit::Circle];

    const fn code(self) -> char {
        match self {
            Suit::Character => 'c',
            Suit::Bamboo => 'b',
            Suit::Circle => 'd',
        }
    }
}

/// Honor symbols: four winds and three dragons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Honor {
    East,
    South,
    West,
    North,
    Red,
    Green,
    White,
}

impl Honor {
    pub const ALL: [Honor; 7] = [
        Honor::East,
        Honor::South,
        Honor::West,
        Honor::North,
        Honor::Red,
        Honor::Green,
        Honor::White,
    ];

    const fn code(self) -> &'static str {
        match self {
            Honor::East => "E",
            Honor::South => "S",
            Honor::West => "W",
            Honor::North => "N",
            Honor::Red => "Rd",
            Honor::Green => "Gd",
            Honor::White => "Wd",
        }
    }
}

/// Flower symbols. One copy of each exists; none can join a winning group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Flower {
    Spring,
    Summer,
    Autumn,
    Winter,
    Plum,
    Orchid,
    Bamboo,
    Chrysanthemum,
}

impl Flower {
    pub const ALL: [Flower; 8] = [
        Flower::Spring,
        Flower::Summer,
        Flower::Autumn,
        Flower::Winter,
        Flower::Plum,
        Flower::Orchid,
        Flower::Bamboo,
        Flower::Chrysanthemum,
    ];
}

/// A tile value.
///
/// The derived ordering is the canonical hand order:
/// characters < bamboo < circles < honors < flowers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tile {
    Suited { suit: Suit, rank: u8 },
    Honor(Honor),
    Flower(Flower),
}

impl Tile {
    /// Create a numbered tile.
    ///
    /// Panics if `rank` is outside 1-9.
    #[must_use]
    pub fn suited(suit: Suit, rank: u8) -> Self {
        assert!((1..=9).contains(&rank), "Rank must be 1-9, got {}", rank);
        Tile::Suited { suit, rank }
    }

    /// Create a numbered tile, returning `None` for ranks outside 1-9.
    #[must_use]
    pub fn try_suited(suit: Suit, rank: i16) -> Option<Self> {
        if (1..=9).contains(&rank) {
            Some(Tile::Suited { suit, rank: rank as u8 })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn is_suited(self) -> bool {
        matches!(self, Tile::Suited { .. })
    }

    #[must_use]
    pub const fn is_honor(self) -> bool {
        matches!(self, Tile::Honor(_))
    }

    #[must_use]
    pub const fn is_flower(self) -> bool {
        matches!(self, Tile::Flower(_))
    }

    /// The numbered suit, if any.
    #[must_use]
    pub const fn suit(self) -> Option<Suit> {
        match self {
            Tile::Suited { suit, .. } => Some(suit),
            _ => None,
        }
    }

    /// The rank of a numbered tile, if any.
    #[must_use]
    pub const fn rank(self) -> Option<u8> {
        match self {
            Tile::Suited { rank, .. } => Some(rank),
            _ => None,
        }
    }

    /// The flower symbol, if this is a flower tile.
    #[must_use]
    pub const fn flower(self) -> Option<Flower> {
        match self {
            Tile::Flower(f) => Some(f),
            _ => None,
        }
    }

    /// The next rank in the same suit, or `None` past 9 and for non-suited tiles.
    #[must_use]
    pub fn successor(self) -> Option<Self> {
        match self {
            Tile::Suited { suit, rank } if rank < 9 => Some(Tile::Suited { suit, rank: rank + 1 }),
            _ => None,
        }
    }

    /// Dense index in `0..DISTINCT_TILES`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Tile::Suited { suit, rank } => suit as usize * 9 + (rank as usize - 1),
            Tile::Honor(h) => 27 + h as usize,
            Tile::Flower(f) => 34 + f as usize,
        }
    }

    /// Inverse of [`Tile::index`].
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0..=26 => Some(Tile::Suited {
                suit: Suit::ALL[index / 9],
                rank: (index % 9) as u8 + 1,
            }),
            27..=33 => Some(Tile::Honor(Honor::ALL[index - 27])),
            34..=41 => Some(Tile::Flower(Flower::ALL[index - 34])),
            _ => None,
        }
    }

    /// The complete 144-tile set in deterministic order.
    #[must_use]
    pub fn full_set() -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(TOTAL_TILES);
        for suit in Suit::ALL {
            for rank in 1..=9 {
                for _ in 0..4 {
                    tiles.push(Tile::Suited { suit, rank });
                }
            }
        }
        for honor in Honor::ALL {
            for _ in 0..4 {
                tiles.push(Tile::Honor(honor));
            }
        }
        for flower in Flower::ALL {
            tiles.push(Tile::Flower(flower));
        }
        tiles
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tile::Suited { suit, rank } => write!(f, "{}{}", rank, suit.code()),
            Tile::Honor(h) => write!(f, "{}", h.code()),
            Tile::Flower(fl) => write!(f, "F{}", *fl as usize + 1),
        }
    }
}

/// Error returned when tile notation cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unrecognised tile notation {0:?}")]
pub struct ParseTileError(pub String);

impl FromStr for Tile {
    type Err = ParseTileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTileError(s.to_string());

        if let Some(honor) = Honor::ALL.iter().find(|h| h.code() == s) {
            return Ok(Tile::Honor(*honor));
        }

        let mut chars = s.chars();
        let (first, second) = match (chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), None) => (a, b),
            _ => return Err(err()),
        };

        if first == 'F' {
            let n = second.to_digit(10).ok_or_else(err)? as usize;
            return match n {
                1..=8 => Ok(Tile::Flower(Flower::ALL[n - 1])),
                _ => Err(err()),
            };
        }

        let rank = first.to_digit(10).ok_or_else(err)? as u8;
        let suit = Suit::ALL
            .iter()
            .copied()
            .find(|s| s.code() == second)
            .ok_or_else(err)?;
        if !(1..=9).contains(&rank) {
            return Err(err());
        }
        Ok(Tile::Suited { suit, rank })
    }
}

/// Parse whitespace-separated tile notation.
pub fn parse_tiles(text: &str) -> Result<Vec<Tile>, ParseTileError> {
    text.split_whitespace().map(str::parse).collect()
}

/// Immutable mapping from tile value to count.
///
/// `Copy`, so recursive searches pass it by value and every branch works
/// on its own counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileCounts {
    counts: [u8; DISTINCT_TILES],
}

impl TileCounts {
    /// Count every tile in `tiles`.
    #[must_use]
    pub fn from_tiles(tiles: &[Tile]) -> Self {
        let mut counts = [0u8; DISTINCT_TILES];
        for tile in tiles {
            counts[tile.index()] += 1;
        }
        Self { counts }
    }

    /// Copies of `tile`.
    #[must_use]
    pub fn count(&self, tile: Tile) -> u8 {
        self.counts[tile.index()]
    }

    /// Total number of tiles counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    /// Number of distinct tile values present.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Lowest tile value present, in canonical order.
    #[must_use]
    pub fn lowest(&self) -> Option<Tile> {
        self.counts
            .iter()
            .position(|&c| c > 0)
            .and_then(Tile::from_index)
    }

    /// Iterate over (tile, count) pairs with a non-zero count.
    pub fn iter(&self) -> impl Iterator<Item = (Tile, u8)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .filter_map(|(i, &c)| Tile::from_index(i).map(|t| (t, c)))
    }

    /// A copy with `n` copies of `tile` removed, or `None` if too few remain.
    #[must_use]
    pub fn without(mut self, tile: Tile, n: u8) -> Option<Self> {
        let slot = &mut self.counts[tile.index()];
        if *slot < n {
            return None;
        }
        *slot -= n;
        Some(self)
    }
}
