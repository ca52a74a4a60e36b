//! Core engine types: seats, state, actions, RNG, configuration, errors.
//!
//! Everything here is plain data plus bookkeeping. Rules that decide how
//! the data may change live in `economy` and `rules`.

pub mod action;
pub mod config;
pub mod error;
pub mod rng;
pub mod seat;
pub mod state;
pub mod view;

pub use action::{Action, TradeBundle, TradeOffer};
pub use config::{GameConfig, Rules, SeatSpec};
pub use error::{AgentError, ConfigError, EngineError, EngineResult, IllegalAction};
pub use rng::{agent_seed, DiceRoll, GameRng, GameRngState};
pub use seat::{SeatId, SeatMap};
pub use state::{Asset, Bank, GameState, JailStatus, Obligation, Player, HOTEL_LEVEL};
pub use view::{AuctionView, StateView};
