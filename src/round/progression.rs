//! Dealer, hand and wind progression between hands.
//!
//! A dealer win keeps the deal. Any other result (a non-dealer win or an
//! exhausted wall) passes the deal clockwise and counts a hand; every fourth
//! hand moves the prevailing wind on, stopping at North.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{RoundState, RuleConfig, Seat};

/// Last prevailing wind index (North).
const LAST_WIND: u8 = 3;

/// Hands per prevailing wind.
const HANDS_PER_WIND: u8 = 4;

const WIND_NAMES: [&str; 4] = ["East", "South", "West", "North"];

/// What follows a concluded hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchProgress {
    /// Play another hand with these counters.
    Continue(RoundState),
    /// The final hand has been played.
    Finished,
}

impl RoundState {
    /// Counters for the next hand given the winner (`None` for an exhausted wall).
    ///
    /// ```
    /// use mahjong_core::core::{RoundState, Seat};
    ///
    /// let round = RoundState::opening(Seat::new(0));
    ///
    /// let kept = round.advance(Some(Seat::new(0)));
    /// assert_eq!((kept.dealer_seat, kept.hand, kept.dealer_count), (Seat::new(0), 0, 1));
    ///
    /// let passed = round.advance(None);
    /// assert_eq!((passed.dealer_seat, passed.hand, passed.dealer_count), (Seat::new(1), 1, 0));
    /// ```
    #[must_use]
    pub fn advance(self, winner: Option<Seat>) -> Self {
        if winner == Some(self.dealer_seat) {
            return Self {
                dealer_count: self.dealer_count + 1,
                ..self
            };
        }

        let mut hand = self.hand + 1;
        let mut wind_round = self.wind_round;
        if hand >= HANDS_PER_WIND {
            hand = 0;
            wind_round = (wind_round + 1).min(LAST_WIND);
        }
        Self {
            wind_round,
            hand,
            dealer_seat: self.dealer_seat.next(),
            dealer_count: 0,
        }
    }

    /// Whether this is the last hand of the match.
    #[must_use]
    pub fn is_final_hand(&self, rules: &RuleConfig) -> bool {
        self.wind_round == rules.final_wind_round && self.dealer_seat == rules.final_dealer_seat
    }

    /// Conclude this hand: finish the match or produce the next counters.
    #[must_use]
    pub fn conclude(self, winner: Option<Seat>, rules: &RuleConfig) -> MatchProgress {
        if self.is_final_hand(rules) {
            info!(round = %self.label(), "match finished");
            return MatchProgress::Finished;
        }
        let next = self.advance(winner);
        info!(
            from = %self.label(),
            to = %next.label(),
            dealer_count = next.dealer_count,
            "round advanced"
        );
        MatchProgress::Continue(next)
    }

    /// Display name such as "East round, South dealer".
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} round, {} dealer",
            WIND_NAMES[usize::from(self.wind_round.min(LAST_WIND))],
            WIND_NAMES[self.dealer_seat.index()]
        )
    }
}
