//! Table state: hands, melds, discards, flowers, the wall and round counters.
//!
//! ## RoundState
//!
//! Match-level counters that survive from hand to hand: prevailing wind,
//! hand number within the wind, dealer seat and consecutive dealer wins.
//!
//! ## TableState
//!
//! Everything one hand mutates. Hands are seat-private; melds, discards and
//! flowers are shared-readable and kept in `im` vectors so snapshots are
//! O(1). Every tile is somewhere: the 144-tile conservation check holds
//! after every completed transition.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};
use super::seat::{Seat, SeatMap};
use super::tile::{Flower, Tile, TOTAL_TILES};
use crate::rules::Meld;
use crate::wall::Wall;

/// Match-level progression counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundState {
    /// Prevailing wind: 0 = East .. 3 = North.
    pub wind_round: u8,
    /// Hand number within the wind (0-3).
    pub hand: u8,
    pub dealer_seat: Seat,
    /// Consecutive hands the current dealer has kept the deal.
    pub dealer_count: u32,
}

impl RoundState {
    /// First hand of a match with `dealer` dealing.
    #[must_use]
    pub fn opening(dealer: Seat) -> Self {
        Self {
            wind_round: 0,
            hand: 0,
            dealer_seat: dealer,
            dealer_count: 0,
        }
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::opening(Seat(0))
    }
}

/// Mutable state of one hand.
#[derive(Clone, Debug)]
pub struct TableState {
    // === Counters ===
    pub round: RoundState,

    // === Seat-private ===
    hands: SeatMap<Vec<Tile>>,

    // === Shared ===
    melds: SeatMap<Vector<Meld>>,
    discards: SeatMap<Vector<Tile>>,
    flowers: SeatMap<Vector<Flower>>,
    wall: Wall,

    // === Turn ===
    /// Seat whose turn it is.
    active: Seat,
    /// Tile most recently added to the active seat's hand by a draw.
    last_drawn: Option<Tile>,
}

impl TableState {
    /// State right after dealing. Hands are sorted here.
    #[must_use]
    pub fn new(round: RoundState, mut hands: SeatMap<Vec<Tile>>, wall: Wall) -> Self {
        for (_, hand) in hands.iter_mut() {
            hand.sort();
        }
        Self {
            active: round.dealer_seat,
            round,
            hands,
            melds: SeatMap::with_default(),
            discards: SeatMap::with_default(),
            flowers: SeatMap::with_default(),
            wall,
            last_drawn: None,
        }
    }

    // === Accessors ===

    /// A seat's concealed hand, sorted.
    #[must_use]
    pub fn hand(&self, seat: Seat) -> &[Tile] {
        &self.hands[seat]
    }

    #[must_use]
    pub fn hand_size(&self, seat: Seat) -> usize {
        self.hands[seat].len()
    }

    #[must_use]
    pub fn melds(&self, seat: Seat) -> &Vector<Meld> {
        &self.melds[seat]
    }

    #[must_use]
    pub fn discards(&self, seat: Seat) -> &Vector<Tile> {
        &self.discards[seat]
    }

    #[must_use]
    pub fn flowers(&self, seat: Seat) -> &Vector<Flower> {
        &self.flowers[seat]
    }

    #[must_use]
    pub fn wall(&self) -> &Wall {
        &self.wall
    }

    #[must_use]
    pub fn drawable(&self) -> usize {
        self.wall.drawable()
    }

    #[must_use]
    pub fn active(&self) -> Seat {
        self.active
    }

    #[must_use]
    pub fn last_drawn(&self) -> Option<Tile> {
        self.last_drawn
    }

    /// Melds declared by `seat`, as a slice-friendly vector.
    #[must_use]
    pub fn meld_list(&self, seat: Seat) -> Vec<Meld> {
        self.melds[seat].iter().cloned().collect()
    }

    #[must_use]
    pub fn holds(&self, seat: Seat, tile: Tile) -> bool {
        self.hands[seat].binary_search(&tile).is_ok()
    }

    /// Copies of `tile` in a seat's hand.
    #[must_use]
    pub fn count_in_hand(&self, seat: Seat, tile: Tile) -> usize {
        self.hands[seat].iter().filter(|&&t| t == tile).count()
    }

    // === Mutation ===

    pub(crate) fn set_active(&mut self, seat: Seat) {
        self.active = seat;
    }

    pub(crate) fn set_last_drawn(&mut self, tile: Option<Tile>) {
        self.last_drawn = tile;
    }

    pub(crate) fn wall_mut(&mut self) -> &mut Wall {
        &mut self.wall
    }

    /// Split borrow for flower exchange.
    pub(crate) fn hand_and_wall_mut(&mut self, seat: Seat) -> (&mut Vec<Tile>, &mut Wall) {
        (&mut self.hands[seat], &mut self.wall)
    }

    /// Insert keeping the hand sorted.
    pub(crate) fn add_to_hand(&mut self, seat: Seat, tile: Tile) {
        let hand = &mut self.hands[seat];
        let pos = hand.binary_search(&tile).unwrap_or_else(|p| p);
        hand.insert(pos, tile);
    }

    /// Remove `n` copies of `tile`. Callers check availability first.
    pub(crate) fn remove_from_hand(&mut self, seat: Seat, tile: Tile, n: usize) -> EngineResult<()> {
        if self.count_in_hand(seat, tile) < n {
            return Err(EngineError::TileNotHeld { seat, tile });
        }
        let hand = &mut self.hands[seat];
        for _ in 0..n {
            if let Ok(pos) = hand.binary_search(&tile) {
                hand.remove(pos);
            }
        }
        Ok(())
    }

    pub(crate) fn push_discard(&mut self, seat: Seat, tile: Tile) {
        self.discards[seat].push_back(tile);
    }

    /// Take back the most recent discard of `seat` for a claim.
    pub(crate) fn take_last_discard(&mut self, seat: Seat) -> Option<Tile> {
        self.discards[seat].pop_back()
    }

    pub(crate) fn push_meld(&mut self, seat: Seat, meld: Meld) {
        self.melds[seat].push_back(meld);
    }

    /// Upgrade the pong of `tile` held by `seat`. Returns `false` if none.
    pub(crate) fn upgrade_pong(&mut self, seat: Seat, tile: Tile) -> bool {
        let melds = &mut self.melds[seat];
        match melds.iter().position(|m| m.is_pong_of(tile)) {
            Some(index) => {
                let mut meld = melds[index].clone();
                let upgraded = meld.upgrade_to_added_kong(tile);
                melds.set(index, meld);
                upgraded
            }
            None => false,
        }
    }

    pub(crate) fn record_flowers(&mut self, seat: Seat, flowers: impl IntoIterator<Item = Flower>) {
        self.flowers[seat].extend(flowers);
    }

    // === Conservation ===

    /// Tiles accounted for across hands, melds, discards, flowers and wall.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        let hands: usize = self.hands.values().map(Vec::len).sum();
        let melds: usize = self
            .melds
            .values()
            .flat_map(|m| m.iter())
            .map(Meld::len)
            .sum();
        let discards: usize = self.discards.values().map(Vector::len).sum();
        let flowers: usize = self.flowers.values().map(Vector::len).sum();
        hands + melds + discards + flowers + self.wall.len()
    }

    /// Fail with `InvariantViolation` unless all 144 tiles are accounted for.
    pub fn check_conservation(&self) -> EngineResult<()> {
        let counted = self.tile_count();
        if counted != TOTAL_TILES {
            return Err(EngineError::InvariantViolation {
                counted,
                expected: TOTAL_TILES,
            });
        }
        Ok(())
    }
}
