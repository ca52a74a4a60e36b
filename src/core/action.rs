//! Agent actions and trade offers.
//!
//! Every response an agent gives is an `Action`. The same type answers all
//! three queries (turn, bid, trade reply); the engine checks that the kind
//! matches the query and treats anything else as malformed.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::seat::SeatId;

/// One side of a trade.
///
/// Assets are named by board position, the same way agents address them in
/// every other action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeBundle {
    #[serde(default)]
    pub cash: u32,

    #[serde(default)]
    pub jail_cards: u32,

    #[serde(default)]
    pub assets: SmallVec<[u8; 4]>,
}

impl TradeBundle {
    /// A bundle of cash only.
    #[must_use]
    pub fn cash(amount: u32) -> Self {
        Self {
            cash: amount,
            ..Self::default()
        }
    }

    /// A bundle of assets only.
    #[must_use]
    pub fn assets(positions: &[u8]) -> Self {
        Self {
            assets: SmallVec::from_slice(positions),
            ..Self::default()
        }
    }

    /// Add cash to the bundle.
    #[must_use]
    pub fn with_cash(mut self, amount: u32) -> Self {
        self.cash = amount;
        self
    }

    /// Add jail-free cards to the bundle.
    #[must_use]
    pub fn with_jail_cards(mut self, count: u32) -> Self {
        self.jail_cards = count;
        self
    }

    /// Nothing of value in the bundle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cash == 0 && self.jail_cards == 0 && self.assets.is_empty()
    }
}

/// A trade proposal from the acting seat to a counterparty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeOffer {
    pub counterparty: SeatId,

    /// What the proposer gives.
    pub offered: TradeBundle,

    /// What the proposer asks for in return.
    pub demanded: TradeBundle,
}

impl TradeOffer {
    /// Create a trade offer.
    #[must_use]
    pub fn new(counterparty: SeatId, offered: TradeBundle, demanded: TradeBundle) -> Self {
        Self {
            counterparty,
            offered,
            demanded,
        }
    }
}

/// A single agent response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Buy (or decline, sending to auction) the unowned tile just landed on.
    BuyDecision { buy: bool },
    Trade(TradeOffer),
    /// Reply to a trade offer. Only valid when asked.
    TradeResponse { accept: bool },
    Mortgage { position: u32 },
    Unmortgage { position: u32 },
    Develop { position: u32 },
    Undevelop { position: u32 },
    /// Reply to an auction round. Only valid when asked.
    AuctionBid { amount: u32 },
    EndTurn,
    PayJailFine,
    UseJailCard,
    JailRollDouble,
}

impl Action {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::BuyDecision { .. } => "buy_decision",
            Action::Trade(_) => "trade",
            Action::TradeResponse { .. } => "trade_response",
            Action::Mortgage { .. } => "mortgage",
            Action::Unmortgage { .. } => "unmortgage",
            Action::Develop { .. } => "develop",
            Action::Undevelop { .. } => "undevelop",
            Action::AuctionBid { .. } => "auction_bid",
            Action::EndTurn => "end_turn",
            Action::PayJailFine => "pay_jail_fine",
            Action::UseJailCard => "use_jail_card",
            Action::JailRollDouble => "jail_roll_double",
        }
    }

    /// Jail-only actions.
    #[must_use]
    pub fn is_jail_action(&self) -> bool {
        matches!(self, Action::PayJailFine | Action::UseJailCard | Action::JailRollDouble)
    }
}
