//! Game rules: the turn state machine and everything that talks to agents.
//!
//! ## Key Types
//!
//! - `Engine`: owns one game (state, agents, penalty ledger) and runs it
//! - `TurnFlow`: whether the acting seat keeps control after an action
//! - `GameOutcome`: winner, penalties, scores and the final snapshot
//!
//! The `Engine` methods are split by concern:
//!
//! - `engine`: game loop, turn sequence, dice movement, jail release
//! - `landing`: tile resolution and card effects
//! - `dispatch`: validation and application of turn actions
//! - `auction`, `trade`, `bankruptcy`: multi-seat protocols
//! - `scoring`: final scores and the result

pub mod auction;
pub mod bankruptcy;
pub mod dispatch;
pub mod engine;
pub mod landing;
pub mod scoring;
pub mod trade;

pub use engine::{Engine, TurnFlow};
pub use scoring::{liquidation_value, score, GameOutcome, INCOME_WEIGHT};
