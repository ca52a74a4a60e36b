//! Game configuration types.
//!
//! - `SeatSpec`: which agent module sits in a seat and how it is configured
//! - `GameConfig`: game id, seed, turn cap and the ordered seat list
//! - `Rules`: ruleset constants (starting cash, fines, quotas, pools)
//!
//! `GameConfig` is plain serde data so a host can load it from JSON.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSpec {
    /// Module path handed to the `ModuleResolver`.
    pub path: String,

    /// Opaque configuration string passed to the module constructor.
    #[serde(default)]
    pub config: String,

    /// Human-readable name (for logs and results).
    pub name: String,
}

impl SeatSpec {
    /// Create a seat spec with an empty configuration string.
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            config: String::new(),
            name: name.into(),
        }
    }

    /// Set the configuration string.
    #[must_use]
    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = config.into();
        self
    }
}

/// Configuration for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub game_id: u64,

    /// Seed for the single game RNG; also the root of every agent seed.
    pub seed: u64,

    /// Number of full rounds before the game ends without a winner.
    pub max_turns: u32,

    /// Seats in play order (2 or more).
    pub seats: Vec<SeatSpec>,

    /// Ruleset constants.
    #[serde(default)]
    pub rules: Rules,
}

impl GameConfig {
    /// Create a config with default rules.
    pub fn new(game_id: u64, seed: u64, max_turns: u32, seats: Vec<SeatSpec>) -> Self {
        Self {
            game_id,
            seed,
            max_turns,
            seats,
            rules: Rules::default(),
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check structural requirements.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats.len() < 2 {
            return Err(ConfigError::TooFewSeats(self.seats.len()));
        }
        if self.seats.len() > 255 {
            return Err(ConfigError::TooManySeats(self.seats.len()));
        }
        if self.max_turns == 0 {
            return Err(ConfigError::ZeroTurnCap);
        }
        Ok(())
    }

    /// Number of seats.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }
}

/// Ruleset constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub starting_cash: u32,
    pub go_bonus: u32,
    pub jail_fine: u32,

    /// Interest charged on top of the mortgage value to lift a mortgage (percent).
    pub unmortgage_interest_pct: u32,

    /// Penalty score added per illegal or malformed agent response.
    pub illegal_action_penalty: f64,

    /// Trade proposals a seat may make per turn.
    pub max_trade_offers_per_turn: u32,

    /// Confined turns served before an unconditional release.
    pub max_jail_turns: u8,

    /// Consecutive doubles that send a player to jail.
    pub doubles_to_jail: u8,

    pub house_pool: u32,
    pub hotel_pool: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_cash: 1500,
            go_bonus: 200,
            jail_fine: 50,
            unmortgage_interest_pct: 10,
            illegal_action_penalty: 0.5,
            max_trade_offers_per_turn: 10,
            max_jail_turns: 2,
            doubles_to_jail: 3,
            house_pool: 32,
            hotel_pool: 12,
        }
    }
}

impl Rules {
    /// Set the starting cash.
    #[must_use]
    pub fn with_starting_cash(mut self, cash: u32) -> Self {
        self.starting_cash = cash;
        self
    }

    /// Set the illegal-action penalty.
    #[must_use]
    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.illegal_action_penalty = penalty;
        self
    }

    /// Set the per-turn trade proposal quota.
    #[must_use]
    pub fn with_trade_quota(mut self, quota: u32) -> Self {
        self.max_trade_offers_per_turn = quota;
        self
    }

    /// Cost to lift a mortgage with the given mortgage value.
    #[must_use]
    pub fn unmortgage_cost(&self, mortgage_value: u32) -> u32 {
        mortgage_value + mortgage_value * self.unmortgage_interest_pct / 100
    }
}
