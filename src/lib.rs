//! # monopoly-arena
//!
//! A deterministic engine for the classic property-trading board game,
//! built to pit pluggable strategy agents against each other.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: one seeded RNG per game, consumed in a fixed
//!    order. The same seed and the same agent behaviour replay the same
//!    game.
//!
//! 2. **Untrusted Agents**: every agent answer is validated. Illegal or
//!    malformed answers accrue penalty score and never abort a game.
//!
//! 3. **N-Player First**: every API takes the seat count as context.
//!
//! ## Example
//!
//! ```
//! use monopoly_arena::{Engine, GameConfig, ModuleRegistry, SeatSpec};
//!
//! let seats = vec![
//!     SeatSpec::new("builtin:random", "alice"),
//!     SeatSpec::new("builtin:random", "bob"),
//! ];
//! let config = GameConfig::new(1, 42, 100, seats);
//!
//! let engine = Engine::new(config, &ModuleRegistry::with_builtins()).unwrap();
//! let outcome = engine.run().unwrap();
//! assert!(outcome.turns <= 100);
//! ```
//!
//! ## Modules
//!
//! - `core`: seats, state, actions, RNG, configuration, errors
//! - `board`: the immutable tile and asset catalog
//! - `cards`: Chance and Community Chest decks
//! - `economy`: rent, development, mortgages, distress liquidation
//! - `rules`: the `Engine` turn state machine, auctions, trades, bankruptcy
//! - `agents`: the strategy plugin boundary and reference strategies

pub mod agents;
pub mod board;
pub mod cards;
pub mod core;
pub mod economy;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Action, AgentError, Asset, AuctionView, ConfigError, DiceRoll, EngineError, EngineResult,
    GameConfig, GameRng, GameState, IllegalAction, JailStatus, Player, Rules, SeatId, SeatMap,
    SeatSpec, StateView, TradeBundle, TradeOffer,
};

pub use crate::board::{AssetId, AssetKind, Colour, TileKind};

pub use crate::cards::{CardDeck, CardEffect, DeckKind};

pub use crate::agents::{
    Agent, AgentModule, ModuleRegistry, ModuleResolver, PassiveAgent, ProcessModule, RandomAgent,
    RandomConfig, AGENT_ABI_VERSION,
};

pub use crate::rules::{Engine, GameOutcome, TurnFlow};
