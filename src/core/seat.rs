//! Seat identification and per-seat data storage.
//!
//! ## Seat
//!
//! Type-safe seat identifier for the four seats at the table. Turn order is
//! clockwise: `0 → 1 → 2 → 3 → 0`. The seat after `s` is the only seat that
//! may chi a discard from `s`; the seat before `s` is its predecessor.
//!
//! ## SeatMap
//!
//! Fixed four-entry storage with O(1) access, indexed by `Seat`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of seats at a table.
pub const SEAT_COUNT: usize = 4;

/// Counter-clockwise seating ring used when counting dice around the table.
pub const COUNTER_CLOCKWISE_RING: [Seat; SEAT_COUNT] = [Seat(0), Seat(3), Seat(2), Seat(1)];

/// Seat identifier (0-3).
///
/// Seat indices are 0-based: the first seat is `Seat(0)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seat(pub u8);

impl Seat {
    /// Create a new seat.
    ///
    /// Panics if `id` is not a valid seat index.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!((id as usize) < SEAT_COUNT, "Seat index must be 0-3");
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this names one of the four seats. `Seat` is a plain newtype,
    /// so deserialized or hand-built values may not.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < SEAT_COUNT
    }

    /// The seat that plays after this one.
    ///
    /// ```
    /// use mahjong_core::core::Seat;
    ///
    /// assert_eq!(Seat::new(0).next(), Seat::new(1));
    /// assert_eq!(Seat::new(3).next(), Seat::new(0));
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        self.offset(1)
    }

    /// The seat that plays before this one (the immediate predecessor).
    #[must_use]
    pub const fn prev(self) -> Self {
        self.offset(3)
    }

    /// The seat `steps` places further along in turn order.
    #[must_use]
    pub const fn offset(self, steps: usize) -> Self {
        Self(((self.0 as usize + steps) % SEAT_COUNT) as u8)
    }

    /// Clockwise distance from `from` to `self` (0 if equal).
    #[must_use]
    pub const fn distance_from(self, from: Seat) -> usize {
        (self.0 as usize + SEAT_COUNT - from.0 as usize) % SEAT_COUNT
    }

    /// Iterate over all four seats in turn order.
    pub fn all() -> impl Iterator<Item = Seat> {
        (0..SEAT_COUNT as u8).map(Seat)
    }

    /// Iterate over the other three seats, starting after `self`.
    pub fn others(self) -> impl Iterator<Item = Seat> {
        (1..SEAT_COUNT).map(move |step| self.offset(step))
    }

    /// The seat reached by stepping `steps` seats counter-clockwise.
    #[must_use]
    pub fn counter_clockwise(self, steps: usize) -> Self {
        let start = COUNTER_CLOCKWISE_RING
            .iter()
            .position(|&s| s == self)
            .unwrap_or(0);
        COUNTER_CLOCKWISE_RING[(start + steps) % SEAT_COUNT]
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use mahjong_core::core::{Seat, SeatMap};
///
/// let mut scores: SeatMap<i32> = SeatMap::new(|_| 0);
/// scores[Seat::new(1)] += 8;
/// assert_eq!(scores[Seat::new(1)], 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: [T; SEAT_COUNT],
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(mut factory: impl FnMut(Seat) -> T) -> Self {
        Self {
            data: [factory(Seat(0)), factory(Seat(1)), factory(Seat(2)), factory(Seat(3))],
        }
    }

    /// Create a new SeatMap with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new SeatMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        &self.data[seat.index()]
    }

    /// A seat's data, or `None` for an out-of-range seat.
    #[must_use]
    pub fn try_get(&self, seat: Seat) -> Option<&T> {
        self.data.get(seat.index())
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Iterate over (Seat, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over (Seat, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Seat, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over the values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Build a new map by transforming every entry.
    pub fn map<U>(&self, f: impl Fn(Seat, &T) -> U) -> SeatMap<U> {
        SeatMap::new(|seat| f(seat, self.get(seat)))
    }
}

impl<T: Default> Default for SeatMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_basics() {
        let s0 = Seat::new(0);
        assert_eq!(s0.index(), 0);
        assert_eq!(format!("{}", s0), "Seat 0");
    }

    #[test]
    #[should_panic(expected = "Seat index must be 0-3")]
    fn test_seat_out_of_range() {
        let _ = Seat::new(4);
    }

    #[test]
    fn test_next_and_prev_wrap() {
        assert_eq!(Seat::new(3).next(), Seat::new(0));
        assert_eq!(Seat::new(0).prev(), Seat::new(3));
        for seat in Seat::all() {
            assert_eq!(seat.next().prev(), seat);
        }
    }

    #[test]
    fn test_distance_from() {
        let discarder = Seat::new(2);
        assert_eq!(Seat::new(3).distance_from(discarder), 1);
        assert_eq!(Seat::new(0).distance_from(discarder), 2);
        assert_eq!(Seat::new(1).distance_from(discarder), 3);
        assert_eq!(discarder.distance_from(discarder), 0);
    }

    #[test]
    fn test_others_starts_after_self() {
        let others: Vec<_> = Seat::new(1).others().collect();
        assert_eq!(others, vec![Seat::new(2), Seat::new(3), Seat::new(0)]);
    }

    #[test]
    fn test_counter_clockwise_ring() {
        // Ring is [0, 3, 2, 1]
        assert_eq!(Seat::new(0).counter_clockwise(1), Seat::new(3));
        assert_eq!(Seat::new(0).counter_clockwise(2), Seat::new(2));
        assert_eq!(Seat::new(3).counter_clockwise(2), Seat::new(1));
        assert_eq!(Seat::new(1).counter_clockwise(1), Seat::new(0));
        assert_eq!(Seat::new(2).counter_clockwise(4), Seat::new(2));
    }

    #[test]
    fn test_seat_map_new() {
        let map: SeatMap<i32> = SeatMap::new(|s| s.index() as i32 * 10);
        assert_eq!(map[Seat::new(0)], 0);
        assert_eq!(map[Seat::new(3)], 30);
    }

    #[test]
    fn test_seat_map_mutation_and_iter() {
        let mut map: SeatMap<i32> = SeatMap::with_value(0);
        map[Seat::new(2)] = 7;

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[2], (Seat::new(2), &7));
    }

    #[test]
    fn test_seat_map_serialization() {
        let map: SeatMap<Vec<u8>> = SeatMap::new(|s| vec![s.0; 2]);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: SeatMap<Vec<u8>> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    fn test_out_of_range_seat() {
        let ghost = Seat(4);
        assert!(!ghost.is_valid());
        assert!(Seat::all().all(Seat::is_valid));

        let map: SeatMap<u8> = SeatMap::with_value(1);
        assert_eq!(map.try_get(ghost), None);
        assert_eq!(map.try_get(Seat::new(3)), Some(&1));
    }
}
