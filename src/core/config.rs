//! Rule configuration.
//!
//! House rules that vary between tables live here rather than in the rule
//! code. Defaults describe the standard 16-tile game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::seat::Seat;
use super::tile::TOTAL_TILES;

/// Rule and pacing parameters for a table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Tiles at the wall's tail that normal draws never reach.
    pub dead_wall_size: usize,

    /// Dealing rounds; each round gives every seat `deal_batch` tiles.
    pub deal_rounds: usize,

    /// Tiles per seat per dealing round.
    pub deal_batch: usize,

    /// Groups (triplets or runs) a complete hand needs besides its pair.
    pub groups_per_hand: usize,

    /// Whether seven distinct pairs count as a complete hand.
    pub seven_pairs: bool,

    /// The discarder's immediate predecessor may pong but not exposed-kong.
    pub forbid_predecessor_exposed_kong: bool,

    /// Bounds of the cosmetic delay before an automated seat discards.
    pub think_delay_ms: (u64, u64),

    /// Longest a decision provider may take before the default discard is used.
    pub decision_timeout_ms: u64,

    /// Prevailing wind of the last hand of a match (0 = East .. 3 = North).
    pub final_wind_round: u8,

    /// Dealer seat of the last hand of a match.
    pub final_dealer_seat: Seat,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            dead_wall_size: 16,
            deal_rounds: 4,
            deal_batch: 4,
            groups_per_hand: 5,
            seven_pairs: true,
            forbid_predecessor_exposed_kong: true,
            think_delay_ms: (400, 1200),
            decision_timeout_ms: 2000,
            final_wind_round: 3,
            final_dealer_seat: Seat(3),
        }
    }
}

/// Invalid rule configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("dealt hand of {hand} tiles cannot form {groups} groups and a pair")]
    HandShape { hand: usize, groups: usize },

    #[error("dealing {dealt} tiles and reserving {dead} leaves no live wall")]
    WallTooSmall { dealt: usize, dead: usize },

    #[error("think delay bounds {0:?} are reversed")]
    DelayBounds((u64, u64)),

    #[error("final wind round {0} is out of range 0-3")]
    FinalWind(u8),

    #[error("final dealer {0} is not a seat at the table")]
    FinalDealer(Seat),
}

impl RuleConfig {
    /// Tiles dealt to each seat.
    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.deal_rounds * self.deal_batch
    }

    /// Check the configuration is internally consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // A dealt hand is one tile short of groups*3 + 2.
        if self.hand_size() + 1 != self.groups_per_hand * 3 + 2 {
            return Err(ConfigError::HandShape {
                hand: self.hand_size(),
                groups: self.groups_per_hand,
            });
        }
        let dealt = self.hand_size() * 4;
        if dealt + self.dead_wall_size >= TOTAL_TILES {
            return Err(ConfigError::WallTooSmall {
                dealt,
                dead: self.dead_wall_size,
            });
        }
        if self.think_delay_ms.0 > self.think_delay_ms.1 {
            return Err(ConfigError::DelayBounds(self.think_delay_ms));
        }
        if self.final_wind_round > 3 {
            return Err(ConfigError::FinalWind(self.final_wind_round));
        }
        if !self.final_dealer_seat.is_valid() {
            return Err(ConfigError::FinalDealer(self.final_dealer_seat));
        }
        Ok(())
    }

    /// Allow or forbid the predecessor exposed-kong restriction.
    pub fn with_predecessor_kong_restriction(mut self, forbid: bool) -> Self {
        self.forbid_predecessor_exposed_kong = forbid;
        self
    }

    /// Enable or disable seven pairs.
    pub fn with_seven_pairs(mut self, enabled: bool) -> Self {
        self.seven_pairs = enabled;
        self
    }

    /// Set the dead wall size.
    pub fn with_dead_wall(mut self, tiles: usize) -> Self {
        self.dead_wall_size = tiles;
        self
    }

    /// Set the automated-seat think delay bounds.
    pub fn with_think_delay(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.think_delay_ms = (min_ms, max_ms);
        self
    }

    /// Set the decision provider time limit.
    pub fn with_decision_timeout(mut self, ms: u64) -> Self {
        self.decision_timeout_ms = ms;
        self
    }

    /// Set the last hand of the match.
    pub fn with_final_hand(mut self, wind_round: u8, dealer: Seat) -> Self {
        self.final_wind_round = wind_round;
        self.final_dealer_seat = dealer;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuleConfig::default();
        assert_eq!(config.hand_size(), 16);
        assert_eq!(config.dead_wall_size, 16);
        assert!(config.forbid_predecessor_exposed_kong);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = RuleConfig::default()
            .with_predecessor_kong_restriction(false)
            .with_seven_pairs(false)
            .with_think_delay(0, 0)
            .with_final_hand(0, Seat(3));

        assert!(!config.forbid_predecessor_exposed_kong);
        assert!(!config.seven_pairs);
        assert_eq!(config.think_delay_ms, (0, 0));
        assert_eq!(config.final_wind_round, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let mut config = RuleConfig::default();
        config.groups_per_hand = 4;
        assert!(matches!(config.validate(), Err(ConfigError::HandShape { .. })));

        let config = RuleConfig::default().with_dead_wall(90);
        assert!(matches!(config.validate(), Err(ConfigError::WallTooSmall { .. })));

        let config = RuleConfig::default().with_think_delay(10, 5);
        assert_eq!(config.validate(), Err(ConfigError::DelayBounds((10, 5))));

        let mut config = RuleConfig::default();
        config.final_wind_round = 4;
        assert_eq!(config.validate(), Err(ConfigError::FinalWind(4)));
    }

    #[test]
    fn test_validate_rejects_missing_final_dealer() {
        let json = serde_json::to_string(&RuleConfig::default())
            .unwrap()
            .replace("\"final_dealer_seat\":3", "\"final_dealer_seat\":7");
        let config: RuleConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.final_dealer_seat, Seat(7));
        assert_eq!(config.validate(), Err(ConfigError::FinalDealer(Seat(7))));
    }

    #[test]
    fn test_serialization() {
        let config = RuleConfig::default().with_decision_timeout(50);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: RuleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
