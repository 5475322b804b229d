//! The tile wall.
//!
//! Normal draws come from the front. Kong and flower replacements come from
//! the tail. The last `dead_wall_size` tiles are never reached by a normal
//! draw, but replacements keep eating into them until the wall is empty.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::core::{EngineError, EngineResult, GameRng, RuleConfig, SeatMap, Tile};

/// Ordered wall of undealt tiles.
///
/// ## Usage
///
/// ```
/// use mahjong_core::core::{GameRng, RuleConfig};
/// use mahjong_core::wall::Wall;
///
/// let rules = RuleConfig::default();
/// let mut rng = GameRng::new(7);
/// let mut wall = Wall::shuffled(rules.dead_wall_size, &mut rng);
///
/// let hands = wall.deal(0, &rules);
/// assert_eq!(wall.len(), 80);
/// assert_eq!(wall.drawable(), 64);
/// assert!(hands.values().all(|h| h.len() == 16));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wall {
    tiles: VecDeque<Tile>,
    dead_wall_size: usize,
}

impl Wall {
    /// The full 144-tile set in canonical order.
    #[must_use]
    pub fn build(dead_wall_size: usize) -> Self {
        Self {
            tiles: Tile::full_set().into(),
            dead_wall_size,
        }
    }

    /// The full set, uniformly shuffled.
    #[must_use]
    pub fn shuffled(dead_wall_size: usize, rng: &mut GameRng) -> Self {
        let mut tiles = Tile::full_set();
        rng.shuffle(&mut tiles);
        Self {
            tiles: tiles.into(),
            dead_wall_size,
        }
    }

    /// A wall with an explicit tile order, front first.
    ///
    /// Used for scripted rounds; the tiles need not be a full set.
    #[must_use]
    pub fn from_tiles(tiles: Vec<Tile>, dead_wall_size: usize) -> Self {
        Self {
            tiles: tiles.into(),
            dead_wall_size,
        }
    }

    /// Tiles remaining, dead wall included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles a normal draw can still reach.
    #[must_use]
    pub fn drawable(&self) -> usize {
        self.tiles.len().saturating_sub(self.dead_wall_size)
    }

    #[must_use]
    pub fn dead_wall_size(&self) -> usize {
        self.dead_wall_size
    }

    /// Iterate the tiles front to tail.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Tile> + '_ {
        self.tiles.iter()
    }

    /// Rotate so `start` becomes the front.
    pub fn rotate_to(&mut self, start: usize) {
        if self.tiles.is_empty() {
            return;
        }
        let start = start % self.tiles.len();
        self.tiles.rotate_left(start);
    }

    /// Rotate to `start`, then deal `deal_rounds` rounds of `deal_batch`
    /// tiles to seats 0..3 in order.
    pub fn deal(&mut self, start: usize, rules: &RuleConfig) -> SeatMap<Vec<Tile>> {
        self.rotate_to(start);

        let mut hands: SeatMap<Vec<Tile>> = SeatMap::new(|_| Vec::with_capacity(rules.hand_size() + 1));
        for _ in 0..rules.deal_rounds {
            for (_, hand) in hands.iter_mut() {
                for _ in 0..rules.deal_batch {
                    if let Some(tile) = self.tiles.pop_front() {
                        hand.push(tile);
                    }
                }
            }
        }
        for (_, hand) in hands.iter_mut() {
            hand.sort();
        }

        debug!(start, remaining = self.tiles.len(), "dealt hands");
        hands
    }

    /// Take the next tile from the live front.
    pub fn draw(&mut self) -> EngineResult<Tile> {
        if self.drawable() == 0 {
            debug!(remaining = self.tiles.len(), "live wall exhausted");
            return Err(EngineError::WallExhausted);
        }
        let tile = self.tiles.pop_front().ok_or(EngineError::WallExhausted)?;
        trace!(tile = %tile, drawable = self.drawable(), "front draw");
        Ok(tile)
    }

    /// Take a kong or flower replacement from the tail.
    pub fn draw_replacement(&mut self) -> EngineResult<Tile> {
        let tile = self.tiles.pop_back().ok_or(EngineError::WallExhausted)?;
        trace!(tile = %tile, remaining = self.tiles.len(), "tail draw");
        Ok(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{parse_tiles, Seat, TileCounts};

    #[test]
    fn test_build_composition() {
        let wall = Wall::build(16);
        assert_eq!(wall.len(), 144);
        assert_eq!(wall.drawable(), 128);

        let tiles: Vec<Tile> = wall.iter().copied().collect();
        let counts = TileCounts::from_tiles(&tiles);
        assert_eq!(counts.distinct(), 42);
    }

    #[test]
    fn test_shuffle_is_deterministic_permutation() {
        let a = Wall::shuffled(16, &mut GameRng::new(3));
        let b = Wall::shuffled(16, &mut GameRng::new(3));
        assert_eq!(a, b);
        assert_ne!(a, Wall::build(16));

        let mut tiles: Vec<Tile> = a.iter().copied().collect();
        tiles.sort();
        assert_eq!(tiles, Tile::full_set());
    }

    #[test]
    fn test_deal_rotates_then_deals_in_batches() {
        let rules = RuleConfig::default();
        let mut wall = Wall::build(16);
        let original: Vec<Tile> = wall.iter().copied().collect();

        let hands = wall.deal(10, &rules);

        assert_eq!(wall.len(), 80);
        // Seat 0's first batch is the four tiles starting at the open index.
        let mut first_batch = original[10..14].to_vec();
        first_batch.sort();
        let seat0 = &hands[Seat::new(0)];
        assert!(first_batch.iter().all(|t| seat0.contains(t)));
        // After 64 dealt tiles the front is the 74th tile of the original order.
        assert_eq!(wall.iter().next(), Some(&original[74]));
    }

    #[test]
    fn test_draw_front_and_tail() {
        let tiles = parse_tiles("1c 2c 3c 4c 5c").unwrap();
        let mut wall = Wall::from_tiles(tiles, 2);

        assert_eq!(wall.draw().unwrap().to_string(), "1c");
        assert_eq!(wall.draw_replacement().unwrap().to_string(), "5c");
        assert_eq!(wall.drawable(), 1);
        assert_eq!(wall.draw().unwrap().to_string(), "2c");
        assert_eq!(wall.draw(), Err(EngineError::WallExhausted));

        // Replacements may still reach into the dead wall.
        assert!(wall.draw_replacement().is_ok());
        assert!(wall.draw_replacement().is_ok());
        assert_eq!(wall.draw_replacement(), Err(EngineError::WallExhausted));
    }

    #[test]
    fn test_rotate_to_wraps() {
        let mut wall = Wall::from_tiles(parse_tiles("1c 2c 3c").unwrap(), 0);
        wall.rotate_to(4);
        assert_eq!(wall.draw().unwrap().to_string(), "2c");
    }
}
