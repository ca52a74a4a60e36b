//! Error types.
//!
//! Only configuration and agent-loading problems abort a game, and they do
//! so before any state is created. Agent misbehaviour during play is never
//! an error: it is recorded as an `IllegalAction` and penalised.

use thiserror::Error;

use super::seat::SeatId;

/// Problems with a `GameConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid game config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("a game needs at least 2 seats, got {0}")]
    TooFewSeats(usize),

    #[error("at most 255 seats are supported, got {0}")]
    TooManySeats(usize),

    #[error("max_turns must be positive")]
    ZeroTurnCap,

    #[error("config lists {expected} seats but {found} agents were supplied")]
    AgentCount { expected: usize, found: usize },
}

/// Problems loading or talking to an agent module.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no agent module registered at `{0}`")]
    UnknownModule(String),

    #[error("agent module `{path}` reports ABI version {found}, expected {expected}")]
    VersionMismatch {
        path: String,
        found: u32,
        expected: u32,
    },

    #[error("agent module `{path}` failed to construct an instance: {reason}")]
    Construction { path: String, reason: String },

    #[error("agent transport failed: {0}")]
    Transport(#[from] std::io::Error),

    #[error("agent sent an undecodable message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("agent protocol violation: {0}")]
    Protocol(String),
}

/// Fatal engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load agent for {seat}: {source}")]
    AgentLoad {
        seat: SeatId,
        #[source]
        source: AgentError,
    },

    /// A resolver left the game in an impossible state. Indicates an
    /// engine bug, never agent misbehaviour.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Why an agent submission was rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IllegalAction {
    #[error("position {0} is not an ownable tile")]
    NotAnAsset(u32),

    #[error("asset is not owned by the acting seat")]
    NotOwner,

    #[error("no purchase decision is pending on this tile")]
    NoPendingPurchase,

    #[error("insufficient cash: need {needed}, have {available}")]
    InsufficientCash { needed: u32, available: u32 },

    #[error("asset is already mortgaged")]
    AlreadyMortgaged,

    #[error("asset is not mortgaged")]
    NotMortgaged,

    #[error("colour group has development")]
    GroupDeveloped,

    #[error("colour group is not an active monopoly")]
    NotActiveMonopoly,

    #[error("asset cannot be developed further")]
    FullyDeveloped,

    #[error("development must stay even across the colour group")]
    UnevenDevelopment,

    #[error("asset has no development to sell")]
    NothingToSell,

    #[error("the bank has no {0} left")]
    PoolExhausted(&'static str),

    #[error("seat is not in jail")]
    NotInJail,

    #[error("seat holds no get-out-of-jail card")]
    NoJailCard,

    #[error("double-roll already attempted this turn")]
    JailRollUsed,

    #[error("trade offer is invalid: {0}")]
    InvalidTrade(&'static str),

    #[error("trade offer quota exceeded")]
    TradeQuotaExceeded,

    #[error("{0} is only valid as a reply to a directed query")]
    UnpromptedReply(&'static str),

    #[error("expected a {expected} reply")]
    WrongReply { expected: &'static str },

    #[error("agent failed to answer: {0}")]
    NoAnswer(String),
}
