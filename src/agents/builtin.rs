//! Reference strategies.
//!
//! - `PassiveAgent`: never buys, never bids, declines every trade
//! - `RandomAgent`: plays plausible moves at random from its private seed
//!
//! Both are registered by `ModuleRegistry::with_builtins` under
//! `builtin:passive` and `builtin:random`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use super::traits::{Agent, AgentModule, AGENT_ABI_VERSION};
use crate::board;
use crate::core::{
    Action, AgentError, AuctionView, Player, SeatId, StateView, TradeBundle, TradeOffer,
    HOTEL_LEVEL,
};

// =============================================================================
// Passive
// =============================================================================

/// Ends every turn immediately.
#[derive(Clone, Debug, Default)]
pub struct PassiveAgent;

impl Agent for PassiveAgent {
    fn take_turn(&mut self, _state: &StateView) -> Result<Action, AgentError> {
        Ok(Action::EndTurn)
    }

    fn bid(&mut self, _state: &StateView, _auction: &AuctionView) -> Result<Action, AgentError> {
        Ok(Action::AuctionBid { amount: 0 })
    }

    fn respond_to_trade(
        &mut self,
        _state: &StateView,
        _offer: &TradeOffer,
    ) -> Result<Action, AgentError> {
        Ok(Action::TradeResponse { accept: false })
    }
}

/// Module producing `PassiveAgent`s.
#[derive(Clone, Debug, Default)]
pub struct PassiveModule;

impl AgentModule for PassiveModule {
    fn abi_version(&self) -> u32 {
        AGENT_ABI_VERSION
    }

    fn create(&self, _config: &str) -> Result<Box<dyn Agent>, AgentError> {
        Ok(Box::new(PassiveAgent))
    }
}

// =============================================================================
// Random
// =============================================================================

/// Tuning for `RandomAgent`, parsed from the seat's config string.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    /// Chance of buying an affordable tile.
    pub buy_probability: f64,
    /// Chance of building when a build is available.
    pub build_probability: f64,
    /// Chance of raising in an auction round.
    pub bid_probability: f64,
    /// Chance of proposing a cash-for-asset trade once per turn.
    pub trade_probability: f64,
    /// Cash kept in reserve when spending voluntarily.
    pub reserve: u32,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            buy_probability: 0.8,
            build_probability: 0.5,
            bid_probability: 0.5,
            trade_probability: 0.1,
            reserve: 150,
        }
    }
}

/// Plays plausible (mostly legal) moves drawn from a private RNG.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    config: RandomConfig,
    seat: SeatId,
    rng: ChaCha8Rng,
}

impl RandomAgent {
    /// Create an agent with the given tuning. Reseeded by `game_start`.
    #[must_use]
    pub fn new(config: RandomConfig) -> Self {
        Self {
            config,
            seat: SeatId::new(0),
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    /// Bernoulli draw that tolerates out-of-range probabilities.
    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }

    fn spare_cash(&self, me: &Player) -> i64 {
        me.cash - i64::from(self.config.reserve)
    }

    fn jail_action(&mut self, me: &Player, fine: u32) -> Action {
        if me.jail_free_cards() > 0 && self.chance(0.5) {
            Action::UseJailCard
        } else if me.can_afford(fine) && self.chance(0.5) {
            Action::PayJailFine
        } else {
            Action::JailRollDouble
        }
    }

    /// Purchase decision for the tile under the player, if one is pending.
    fn purchase(&mut self, state: &StateView, me: &Player) -> Option<Action> {
        let id = board::asset_at(me.position)?;
        let asset = state.asset(id)?;
        if asset.owner.is_some() || asset.auctioned_this_landing {
            return None;
        }
        let price = board::asset(id).price;
        let buy = me.can_afford(price) && self.chance(self.config.buy_probability);
        Some(Action::BuyDecision { buy })
    }

    /// A build that satisfies the even-building rule, if affordable.
    fn build(&mut self, state: &StateView, me: &Player) -> Option<Action> {
        if !self.chance(self.config.build_probability) {
            return None;
        }
        let spare = self.spare_cash(me);
        let candidate = state.owned_by(self.seat).find(|asset| {
            let def = board::asset(asset.id);
            let Some(colour) = def.colour else {
                return false;
            };
            let members: Vec<_> = board::group(colour)
                .filter_map(|id| state.asset(id))
                .collect();
            let complete = members
                .iter()
                .all(|m| m.owner == Some(self.seat) && !m.mortgaged);
            let lowest = members.iter().map(|m| m.level).min().unwrap_or(0);
            let stock = if asset.level == HOTEL_LEVEL - 1 {
                state.hotels_remaining
            } else {
                state.houses_remaining
            };
            complete
                && stock > 0
                && asset.level == lowest
                && asset.level < HOTEL_LEVEL
                && spare >= i64::from(def.house_price)
        })?;
        Some(Action::Develop {
            position: u32::from(candidate.position),
        })
    }

    fn unmortgage(&self, state: &StateView, me: &Player) -> Option<Action> {
        let spare = self.spare_cash(me);
        let candidate = state.owned_by(self.seat).find(|asset| {
            let value = board::asset(asset.id).mortgage_value();
            asset.mortgaged && spare >= i64::from(value + value / 10)
        })?;
        Some(Action::Unmortgage {
            position: u32::from(candidate.position),
        })
    }

    /// Offer list price for a random opponent's asset.
    fn trade(&mut self, state: &StateView, me: &Player) -> Option<Action> {
        if me.trade_offers_this_turn > 0 || !self.chance(self.config.trade_probability) {
            return None;
        }
        let spare = self.spare_cash(me);
        let targets: Vec<_> = state
            .assets
            .iter()
            .filter(|a| {
                let undeveloped = board::asset(a.id).colour.map_or(true, |c| {
                    board::group(c).all(|id| state.asset(id).map_or(true, |m| m.level == 0))
                });
                a.owner.is_some_and(|o| o != self.seat)
                    && undeveloped
                    && spare >= i64::from(board::asset(a.id).price)
            })
            .collect();
        if targets.is_empty() {
            return None;
        }
        let target = targets[self.rng.gen_range(0..targets.len())];
        let owner = target.owner?;
        Some(Action::Trade(TradeOffer::new(
            owner,
            TradeBundle::cash(board::asset(target.id).price),
            TradeBundle::assets(&[target.position]),
        )))
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new(RandomConfig::default())
    }
}

impl Agent for RandomAgent {
    fn game_start(&mut self, seat: SeatId, seed: u64) -> Result<(), AgentError> {
        self.seat = seat;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        Ok(())
    }

    fn take_turn(&mut self, state: &StateView) -> Result<Action, AgentError> {
        let Some(me) = state.seat(self.seat).cloned() else {
            return Ok(Action::EndTurn);
        };

        if me.in_jail() && !me.jail_roll_attempted {
            return Ok(self.jail_action(&me, 50));
        }

        let action = self
            .purchase(state, &me)
            .or_else(|| self.build(state, &me))
            .or_else(|| self.unmortgage(state, &me))
            .or_else(|| self.trade(state, &me))
            .unwrap_or(Action::EndTurn);
        Ok(action)
    }

    fn bid(&mut self, state: &StateView, auction: &AuctionView) -> Result<Action, AgentError> {
        let Some(me) = state.seat(self.seat) else {
            return Ok(Action::AuctionBid { amount: 0 });
        };
        let price = board::asset(auction.asset).price;
        let Some(next) = auction.high_bid.checked_add(self.rng.gen_range(1..=20)) else {
            return Ok(Action::AuctionBid { amount: 0 });
        };

        let amount = if auction.high_bidder != Some(self.seat)
            && next <= price
            && me.can_afford(next)
            && self.chance(self.config.bid_probability)
        {
            next
        } else {
            0
        };
        Ok(Action::AuctionBid { amount })
    }

    fn respond_to_trade(
        &mut self,
        _state: &StateView,
        offer: &TradeOffer,
    ) -> Result<Action, AgentError> {
        let value = |bundle: &TradeBundle| -> u64 {
            let assets: u64 = bundle
                .assets
                .iter()
                .filter_map(|p| board::asset_at(*p))
                .map(|id| u64::from(board::asset(id).price))
                .sum();
            u64::from(bundle.cash) + u64::from(bundle.jail_cards) * 50 + assets
        };
        // The offer is phrased from the proposer's side.
        let accept = value(&offer.offered) >= value(&offer.demanded) && self.chance(0.5);
        Ok(Action::TradeResponse { accept })
    }
}

/// Module producing `RandomAgent`s. The config string is optional JSON
/// overriding `RandomConfig` fields.
#[derive(Clone, Debug, Default)]
pub struct RandomModule;

impl AgentModule for RandomModule {
    fn abi_version(&self) -> u32 {
        AGENT_ABI_VERSION
    }

    fn create(&self, config: &str) -> Result<Box<dyn Agent>, AgentError> {
        let config = if config.trim().is_empty() {
            RandomConfig::default()
        } else {
            serde_json::from_str(config).map_err(|e| AgentError::Construction {
                path: "builtin:random".to_string(),
                reason: e.to_string(),
            })?
        };
        Ok(Box::new(RandomAgent::new(config)))
    }
}
