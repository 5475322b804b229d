//! Dice: dealer selection and the wall's opening position.

use tracing::debug;

use crate::core::{DiceRoll, GameRng, Seat, SeatMap, SEAT_COUNT};

/// Tiles per stack in the wall.
const STACK_HEIGHT: usize = 2;

/// Stacks along one side of the wall.
const STACKS_PER_SIDE: usize = 17;

/// Result of the dealer-selection roll-off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DealerDraw {
    pub dealer: Seat,
    /// Every roll-off round in order; all but the last ended in a tie.
    pub rounds: Vec<SeatMap<DiceRoll>>,
}

/// Every seat rolls three dice; the unique highest total deals.
///
/// Ties at the top reroll all four seats.
pub fn decide_dealer(rng: &mut GameRng) -> DealerDraw {
    let mut rounds = Vec::new();
    loop {
        let rolls = SeatMap::new(|_| rng.roll_dice());
        let best = rolls.values().map(DiceRoll::sum).max().unwrap_or(0);
        let leaders: Vec<Seat> = rolls
            .iter()
            .filter(|(_, roll)| roll.sum() == best)
            .map(|(seat, _)| seat)
            .collect();
        rounds.push(rolls);

        if let [dealer] = leaders[..] {
            debug!(dealer = %dealer, total = best, rerolls = rounds.len() - 1, "dealer decided");
            return DealerDraw { dealer, rounds };
        }
    }
}

/// Seat whose side of the wall is opened: `dice_sum` steps counter-clockwise
/// from the dealer.
#[must_use]
pub fn open_seat(dealer: Seat, dice_sum: usize) -> Seat {
    dealer.counter_clockwise(dice_sum)
}

/// Index into the wall where dealing starts.
///
/// The opened seat's side starts at `seat * wall_len / 4`; the stack offset
/// within that side is `((dice_sum - 1) % 17) * 2`.
///
/// ```
/// use mahjong_core::core::Seat;
/// use mahjong_core::wall::open_index;
///
/// // Dealer 0 rolling 4 lands back on seat 0; offset is stack 3.
/// assert_eq!(open_index(Seat::new(0), 4, 144), 6);
/// ```
#[must_use]
pub fn open_index(dealer: Seat, dice_sum: usize, wall_len: usize) -> usize {
    if wall_len == 0 {
        return 0;
    }
    let side = wall_len / SEAT_COUNT;
    let stack = (dice_sum.saturating_sub(1) % STACKS_PER_SIDE) * STACK_HEIGHT;
    (open_seat(dealer, dice_sum).index() * side + stack) % wall_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_seat_counts_counter_clockwise() {
        // Ring [0, 3, 2, 1]
        assert_eq!(open_seat(Seat::new(0), 1), Seat::new(3));
        assert_eq!(open_seat(Seat::new(0), 5), Seat::new(3));
        assert_eq!(open_seat(Seat::new(2), 3), Seat::new(3));
        assert_eq!(open_seat(Seat::new(1), 8), Seat::new(1));
    }

    #[test]
    fn test_open_index_offsets() {
        // Dealer 0, sum 3 -> seat 1 side (36), stack offset 4.
        assert_eq!(open_index(Seat::new(0), 3, 144), 40);
        // Sum 18 -> stack (17 % 17) = 0; ring lands on seat 2.
        assert_eq!(open_index(Seat::new(0), 18, 144), 72);
        // Always inside the wall.
        for dealer in Seat::all() {
            for sum in 3..=18 {
                assert!(open_index(dealer, sum, 144) < 144);
            }
        }
        assert_eq!(open_index(Seat::new(0), 3, 0), 0);
    }

    #[test]
    fn test_decide_dealer_unique_highest() {
        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            let draw = decide_dealer(&mut rng);
            let last = draw.rounds.last().unwrap();
            let best = last[draw.dealer].sum();
            assert!(last.iter().all(|(s, r)| s == draw.dealer || r.sum() < best));
        }
    }

    #[test]
    fn test_decide_dealer_is_seeded() {
        let a = decide_dealer(&mut GameRng::new(11));
        let b = decide_dealer(&mut GameRng::new(11));
        assert_eq!(a, b);
    }
}
