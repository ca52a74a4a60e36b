//! Validation and application of turn actions.
//!
//! Every action is checked against the live state before anything changes.
//! An illegal action is penalised and ends the turn; the state is left as
//! it was.

use tracing::debug;

use crate::board::{self, AssetId};
use crate::core::{Action, EngineError, EngineResult, IllegalAction, JailStatus, SeatId};
use crate::economy::development;

use super::engine::{Engine, TurnFlow};

/// Why an action did not go through.
pub(crate) enum Rejection {
    Illegal(IllegalAction),
    Fatal(EngineError),
}

impl From<IllegalAction> for Rejection {
    fn from(e: IllegalAction) -> Self {
        Rejection::Illegal(e)
    }
}

impl From<EngineError> for Rejection {
    fn from(e: EngineError) -> Self {
        Rejection::Fatal(e)
    }
}

/// Map a board position from an agent to an asset id.
pub(crate) fn asset_at(position: u32) -> Result<AssetId, IllegalAction> {
    u8::try_from(position)
        .ok()
        .and_then(board::asset_at)
        .ok_or(IllegalAction::NotAnAsset(position))
}

impl Engine {
    /// Apply one action from the acting seat.
    ///
    /// Illegal actions are penalised and end the turn.
    pub fn dispatch(&mut self, seat: SeatId, action: Action) -> EngineResult<TurnFlow> {
        debug!(%seat, action = action.name(), "dispatch");
        match self.apply(seat, action) {
            Ok(flow) => Ok(flow),
            Err(Rejection::Illegal(reason)) => {
                self.penalize(seat, &reason);
                Ok(TurnFlow::EndTurn)
            }
            Err(Rejection::Fatal(e)) => Err(e),
        }
    }

    fn apply(&mut self, seat: SeatId, action: Action) -> Result<TurnFlow, Rejection> {
        match action {
            Action::BuyDecision { buy } => self.buy_decision(seat, buy),
            Action::Trade(offer) => {
                let quota = self.state.rules.max_trade_offers_per_turn;
                let player = self.state.player_mut(seat);
                player.trade_offers_this_turn += 1;
                if player.trade_offers_this_turn > quota {
                    return Err(IllegalAction::TradeQuotaExceeded.into());
                }
                self.propose_trade(seat, &offer)?;
                Ok(TurnFlow::Continue)
            }
            Action::TradeResponse { .. } => {
                Err(IllegalAction::UnpromptedReply("trade_response").into())
            }
            Action::AuctionBid { .. } => Err(IllegalAction::UnpromptedReply("auction_bid").into()),
            Action::Mortgage { position } => {
                development::mortgage(&mut self.state, seat, asset_at(position)?)?;
                Ok(TurnFlow::Continue)
            }
            Action::Unmortgage { position } => {
                development::unmortgage(&mut self.state, seat, asset_at(position)?)?;
                Ok(TurnFlow::Continue)
            }
            Action::Develop { position } => {
                development::build(&mut self.state, seat, asset_at(position)?)?;
                Ok(TurnFlow::Continue)
            }
            Action::Undevelop { position } => {
                development::sell(&mut self.state, seat, asset_at(position)?)?;
                Ok(TurnFlow::Continue)
            }
            Action::EndTurn => Ok(TurnFlow::EndTurn),
            Action::PayJailFine => self.pay_jail_fine(seat),
            Action::UseJailCard => self.use_jail_card(seat),
            Action::JailRollDouble => self.jail_roll_double(seat),
        }
    }

    // === Purchase ===

    fn buy_decision(&mut self, seat: SeatId, buy: bool) -> Result<TurnFlow, Rejection> {
        let position = self.state.player(seat).position;
        let id = board::asset_at(position).ok_or(IllegalAction::NoPendingPurchase)?;
        let asset = self.state.asset(id);
        if asset.owner.is_some() || asset.auctioned_this_landing {
            return Err(IllegalAction::NoPendingPurchase.into());
        }

        if !buy {
            debug!(%seat, asset = board::asset(id).name, "declined");
            self.state.asset_mut(id).auctioned_this_landing = true;
            self.auction(id)?;
            return Ok(TurnFlow::Continue);
        }

        let price = board::asset(id).price;
        let player = self.state.player(seat);
        if !player.can_afford(price) {
            return Err(IllegalAction::InsufficientCash {
                needed: price,
                available: player.available_cash(),
            }
            .into());
        }
        self.state.debit(seat, price);
        self.state.set_owner(id, Some(seat));
        debug!(%seat, asset = board::asset(id).name, price, "bought");
        Ok(TurnFlow::Continue)
    }

    // === Jail ===

    fn require_jailed(&self, seat: SeatId) -> Result<(), IllegalAction> {
        if self.state.player(seat).in_jail() {
            Ok(())
        } else {
            Err(IllegalAction::NotInJail)
        }
    }

    fn pay_jail_fine(&mut self, seat: SeatId) -> Result<TurnFlow, Rejection> {
        self.require_jailed(seat)?;
        let fine = self.state.rules.jail_fine;
        let player = self.state.player(seat);
        if !player.can_afford(fine) {
            return Err(IllegalAction::InsufficientCash {
                needed: fine,
                available: player.available_cash(),
            }
            .into());
        }

        self.state.debit(seat, fine);
        self.state.player_mut(seat).jail = JailStatus::Free;
        self.released_this_turn = true;
        debug!(%seat, fine, "paid jail fine");
        let roll = self.state.rng.roll_dice();
        Ok(self.move_by_roll(seat, roll, true)?)
    }

    fn use_jail_card(&mut self, seat: SeatId) -> Result<TurnFlow, Rejection> {
        self.require_jailed(seat)?;
        let player = self.state.player_mut(seat);
        let Some(deck) = player.jail_cards.pop() else {
            return Err(IllegalAction::NoJailCard.into());
        };
        player.jail = JailStatus::Free;
        self.released_this_turn = true;
        self.state.return_jail_card(deck);
        debug!(%seat, "used jail card");
        let roll = self.state.rng.roll_dice();
        Ok(self.move_by_roll(seat, roll, true)?)
    }

    fn jail_roll_double(&mut self, seat: SeatId) -> Result<TurnFlow, Rejection> {
        self.require_jailed(seat)?;
        let player = self.state.player_mut(seat);
        if player.jail_roll_attempted {
            return Err(IllegalAction::JailRollUsed.into());
        }
        player.jail_roll_attempted = true;

        let roll = self.state.rng.roll_dice();
        if !roll.is_double() {
            debug!(%seat, first = roll.first, second = roll.second, "no double");
            return Ok(TurnFlow::Continue);
        }
        self.state.player_mut(seat).jail = JailStatus::Free;
        self.released_this_turn = true;
        debug!(%seat, "rolled out of jail");
        Ok(self.move_by_roll(seat, roll, false)?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::agents::{Agent, PassiveAgent};
    use crate::cards::DeckKind;
    use crate::core::{
        AgentError, AuctionView, GameConfig, GameRng, SeatSpec, StateView, TradeBundle, TradeOffer,
    };

    /// Plays a fixed list of turn actions, then ends turns.
    struct Script(VecDeque<Action>);

    impl Agent for Script {
        fn take_turn(&mut self, _state: &StateView) -> Result<Action, AgentError> {
            Ok(self.0.pop_front().unwrap_or(Action::EndTurn))
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

    fn engine() -> Engine {
        let specs = (0..2)
            .map(|i| SeatSpec::new("builtin:passive", format!("p{i}")))
            .collect();
        let agents = (0..2)
            .map(|_| Box::new(PassiveAgent) as Box<dyn Agent>)
            .collect();
        Engine::with_agents(GameConfig::new(1, 3, 10, specs), agents).unwrap()
    }

    const A: SeatId = SeatId::new(0);
    const B: SeatId = SeatId::new(1);

    #[test]
    fn test_asset_at() {
        assert_eq!(asset_at(1), Ok(AssetId(0)));
        assert_eq!(asset_at(4), Err(IllegalAction::NotAnAsset(4)));
        assert_eq!(asset_at(400), Err(IllegalAction::NotAnAsset(400)));
    }

    #[test]
    fn test_buy_current_tile() {
        let mut engine = engine();
        engine.state.player_mut(A).position = 1;

        let flow = engine.dispatch(A, Action::BuyDecision { buy: true }).unwrap();
        assert_eq!(flow, TurnFlow::Continue);
        assert!(engine.state.asset(AssetId(0)).is_owned_by(A));
        assert_eq!(engine.state.player(A).cash, 1440);
        assert_eq!(engine.penalties()[A], 0.0);
    }

    #[test]
    fn test_buy_twice_is_illegal() {
        let mut engine = engine();
        engine.state.player_mut(A).position = 1;
        engine.dispatch(A, Action::BuyDecision { buy: true }).unwrap();

        let flow = engine.dispatch(A, Action::BuyDecision { buy: true }).unwrap();
        assert_eq!(flow, TurnFlow::EndTurn);
        assert_eq!(engine.penalties()[A], 0.5);
        assert_eq!(engine.state.player(A).cash, 1440);
    }

    #[test]
    fn test_buy_without_cash() {
        let mut engine = engine();
        engine.state.player_mut(A).position = 39;
        engine.state.player_mut(A).cash = 100;

        let flow = engine.dispatch(A, Action::BuyDecision { buy: true }).unwrap();
        assert_eq!(flow, TurnFlow::EndTurn);
        assert_eq!(engine.penalties()[A], 0.5);
        assert!(engine.state.asset(AssetId(27)).owner.is_none());
    }

    #[test]
    fn test_decline_auctions_once() {
        let mut engine = engine();
        engine.state.player_mut(A).position = 1;

        // Passive bidders never bid: the asset stays with the bank.
        engine.dispatch(A, Action::BuyDecision { buy: false }).unwrap();
        assert!(engine.state.asset(AssetId(0)).owner.is_none());
        assert!(engine.state.asset(AssetId(0)).auctioned_this_landing);

        let flow = engine.dispatch(A, Action::BuyDecision { buy: true }).unwrap();
        assert_eq!(flow, TurnFlow::EndTurn);
        assert_eq!(engine.penalties()[A], 0.5);
    }

    #[test]
    fn test_unprompted_replies_are_penalised() {
        let mut engine = engine();
        engine.dispatch(A, Action::TradeResponse { accept: true }).unwrap();
        engine.dispatch(A, Action::AuctionBid { amount: 10 }).unwrap();
        assert_eq!(engine.penalties()[A], 1.0);
    }

    #[test]
    fn test_mortgage_non_asset() {
        let mut engine = engine();
        let flow = engine.dispatch(A, Action::Mortgage { position: 0 }).unwrap();
        assert_eq!(flow, TurnFlow::EndTurn);
        assert_eq!(engine.penalties()[A], 0.5);
    }

    #[test]
    fn test_mortgage_and_unmortgage() {
        let mut engine = engine();
        engine.state.set_owner(AssetId(0), Some(A));

        engine.dispatch(A, Action::Mortgage { position: 1 }).unwrap();
        assert_eq!(engine.state.player(A).cash, 1530);
        engine.dispatch(A, Action::Unmortgage { position: 1 }).unwrap();
        assert_eq!(engine.state.player(A).cash, 1497);
        assert!(!engine.state.asset(AssetId(0)).mortgaged);
    }

    #[test]
    fn test_develop_needs_monopoly() {
        let mut engine = engine();
        engine.state.set_owner(AssetId(0), Some(A));

        engine.dispatch(A, Action::Develop { position: 1 }).unwrap();
        assert_eq!(engine.penalties()[A], 0.5);

        engine.state.set_owner(AssetId(1), Some(A));
        engine.dispatch(A, Action::Develop { position: 1 }).unwrap();
        assert_eq!(engine.state.asset(AssetId(0)).level, 1);
        assert_eq!(engine.penalties()[A], 0.5);
    }

    #[test]
    fn test_jail_actions_require_jail() {
        let mut engine = engine();
        for action in [Action::PayJailFine, Action::UseJailCard, Action::JailRollDouble] {
            assert_eq!(engine.dispatch(A, action).unwrap(), TurnFlow::EndTurn);
        }
        assert_eq!(engine.penalties()[A], 1.5);
    }

    #[test]
    fn test_pay_fine_releases() {
        let mut engine = engine();
        engine.send_to_jail(A);

        engine.dispatch(A, Action::PayJailFine).unwrap();
        let player = engine.state.player(A);
        assert_eq!(engine.penalties()[A], 0.0);
        // Fine paid; the roll from jail reaches at most a +200 card.
        assert!(player.cash <= 1450 + 200);
        assert!(player.position != board::JAIL_POSITION || player.in_jail());
    }

    #[test]
    fn test_use_card_returns_it_to_deck() {
        let mut engine = engine();
        engine.send_to_jail(A);
        // Simulate holding a Community Chest jail card.
        let drawn = std::iter::from_fn(|| engine.state.community_chest.draw())
            .take(16)
            .any(|c| c.effect == crate::cards::CardEffect::GetOutOfJailFree);
        assert!(drawn);
        engine.state.player_mut(A).jail_cards.push(DeckKind::CommunityChest);

        engine.dispatch(A, Action::UseJailCard).unwrap();
        assert_eq!(engine.state.player(A).jail_free_cards(), 0);
        assert_eq!(engine.state.community_chest.out_of_rotation(), 0);
        assert_eq!(engine.penalties()[A], 0.0);
    }

    #[test]
    fn test_single_jail_roll_per_turn() {
        let mut engine = engine();
        engine.send_to_jail(A);
        engine.state.player_mut(A).jail_roll_attempted = true;

        let flow = engine.dispatch(A, Action::JailRollDouble).unwrap();
        assert_eq!(flow, TurnFlow::EndTurn);
        assert_eq!(engine.penalties()[A], 0.5);
    }

    #[test]
    fn test_trade_quota() {
        let mut engine = engine();
        engine.state.rules.max_trade_offers_per_turn = 1;
        let offer = TradeOffer::new(B, TradeBundle::cash(10), TradeBundle::cash(5));

        // Passive counterparty declines; the first offer is legal.
        let flow = engine.dispatch(A, Action::Trade(offer.clone())).unwrap();
        assert_eq!(flow, TurnFlow::Continue);
        let flow = engine.dispatch(A, Action::Trade(offer)).unwrap();
        assert_eq!(flow, TurnFlow::EndTurn);
        assert_eq!(engine.penalties()[A], 0.5);
    }

    #[test]
    fn test_failed_jail_roll_keeps_the_turn() {
        let specs = (0..2)
            .map(|i| SeatSpec::new("builtin:passive", format!("p{i}")))
            .collect();
        let script = Script(VecDeque::from([
            Action::JailRollDouble,
            Action::Mortgage { position: 1 },
            Action::JailRollDouble,
        ]));
        let agents: Vec<Box<dyn Agent>> = vec![Box::new(script), Box::new(PassiveAgent)];
        let mut engine = Engine::with_agents(GameConfig::new(1, 3, 10, specs), agents).unwrap();

        let seed = (0..).find(|&seed| !GameRng::new(seed).roll_dice().is_double()).unwrap();
        engine.state.rng = GameRng::new(seed);
        engine.state.set_owner(AssetId(0), Some(A));
        engine.send_to_jail(A);

        engine.play_turn(A).unwrap();

        let player = engine.state.player(A);
        // The mortgage after the miss went through; the second roll did not.
        assert!(engine.state.asset(AssetId(0)).mortgaged);
        assert_eq!(player.cash, 1530);
        assert_eq!(player.position, board::JAIL_POSITION);
        assert_eq!(player.jail, JailStatus::Jailed { turns_served: 1 });
        assert_eq!(engine.penalties[A], 0.5);
    }
}
