//! Trade protocol.
//!
//! A trade offer is validated against both sides' real holdings before the
//! counterparty is asked. Acceptance swaps both bundles at once; ownership
//! changes go through `GameState::set_owner`, so cached rents follow any
//! monopoly the trade creates or breaks.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::board::AssetId;
use crate::core::{Action, IllegalAction, SeatId, StateView, TradeBundle, TradeOffer};
use crate::economy::rent;

use super::dispatch::asset_at;
use super::engine::Engine;

impl Engine {
    /// Validate an offer, ask the counterparty, and execute it if accepted.
    ///
    /// Returns whether the trade went through. An invalid offer is an
    /// `IllegalAction` of the proposer; a bad reply penalises the
    /// counterparty and counts as a decline.
    pub fn propose_trade(
        &mut self,
        proposer: SeatId,
        offer: &TradeOffer,
    ) -> Result<bool, IllegalAction> {
        let counterparty = offer.counterparty;
        if counterparty == proposer {
            return Err(IllegalAction::InvalidTrade("cannot trade with yourself"));
        }
        if !self.state.players.contains(counterparty) || !self.state.is_active(counterparty) {
            return Err(IllegalAction::InvalidTrade("counterparty is not in the game"));
        }
        if offer.offered.is_empty() || offer.demanded.is_empty() {
            return Err(IllegalAction::InvalidTrade("both sides must give something"));
        }
        let given = self.check_bundle(proposer, &offer.offered)?;
        let received = self.check_bundle(counterparty, &offer.demanded)?;

        let view = StateView::of(&self.state);
        let accept = match self.agents[counterparty].respond_to_trade(&view, offer) {
            Ok(Action::TradeResponse { accept }) => accept,
            Ok(_) => {
                self.penalize(
                    counterparty,
                    &IllegalAction::WrongReply { expected: "trade_response" },
                );
                false
            }
            Err(e) => {
                self.penalize(counterparty, &IllegalAction::NoAnswer(e.to_string()));
                false
            }
        };
        debug!(%proposer, %counterparty, accept, "trade answered");
        if !accept {
            return Ok(false);
        }

        self.transfer_bundle(proposer, counterparty, &offer.offered, &given);
        self.transfer_bundle(counterparty, proposer, &offer.demanded, &received);
        rent::refresh_rents(&mut self.state);
        Ok(true)
    }

    /// Check a side actually holds what it is listed as giving.
    fn check_bundle(
        &self,
        seat: SeatId,
        bundle: &TradeBundle,
    ) -> Result<Vec<AssetId>, IllegalAction> {
        let player = self.state.player(seat);
        if !player.can_afford(bundle.cash) {
            return Err(IllegalAction::InvalidTrade("not enough cash"));
        }
        if player.jail_free_cards() < bundle.jail_cards {
            return Err(IllegalAction::InvalidTrade("not enough jail cards"));
        }

        let mut seen = FxHashSet::default();
        let mut ids = Vec::with_capacity(bundle.assets.len());
        for &position in &bundle.assets {
            let id = asset_at(u32::from(position))
                .map_err(|_| IllegalAction::InvalidTrade("not an ownable tile"))?;
            if !seen.insert(id) {
                return Err(IllegalAction::InvalidTrade("asset listed twice"));
            }
            if !self.state.asset(id).is_owned_by(seat) {
                return Err(IllegalAction::InvalidTrade("asset not owned by its giver"));
            }
            if rent::group_has_development(&self.state.assets, id) {
                return Err(IllegalAction::InvalidTrade("colour group has development"));
            }
            ids.push(id);
        }
        Ok(ids)
    }

    fn transfer_bundle(&mut self, from: SeatId, to: SeatId, bundle: &TradeBundle, ids: &[AssetId]) {
        self.state.transfer_cash(from, to, bundle.cash);
        let giver = self.state.player_mut(from);
        let keep = giver.jail_cards.len() - bundle.jail_cards as usize;
        let cards: Vec<_> = giver.jail_cards.drain(keep..).collect();
        self.state.player_mut(to).jail_cards.extend(cards);
        for &id in ids {
            self.state.set_owner(id, Some(to));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{Agent, PassiveAgent};
    use crate::core::{AgentError, AuctionView, GameConfig, SeatSpec};

    struct Accepting;

    impl Agent for Accepting {
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
            Ok(Action::TradeResponse { accept: true })
        }
    }

    struct Confused;

    impl Agent for Confused {
        fn take_turn(&mut self, _state: &StateView) -> Result<Action, AgentError> {
            Ok(Action::EndTurn)
        }

        fn bid(&mut self, _state: &StateView, _auction: &AuctionView) -> Result<Action, AgentError> {
            Ok(Action::EndTurn)
        }

        fn respond_to_trade(
            &mut self,
            _state: &StateView,
            _offer: &TradeOffer,
        ) -> Result<Action, AgentError> {
            Ok(Action::EndTurn)
        }
    }

    const A: SeatId = SeatId::new(0);
    const B: SeatId = SeatId::new(1);

    fn engine(counterparty: Box<dyn Agent>) -> Engine {
        let specs = (0..2)
            .map(|i| SeatSpec::new("builtin:passive", format!("p{i}")))
            .collect();
        let agents: Vec<Box<dyn Agent>> = vec![Box::new(PassiveAgent), counterparty];
        Engine::with_agents(GameConfig::new(1, 5, 10, specs), agents).unwrap()
    }

    #[test]
    fn test_accepted_trade_swaps_and_forms_monopoly() {
        let mut engine = engine(Box::new(Accepting));
        engine.state.set_owner(AssetId(0), Some(A));
        engine.state.set_owner(AssetId(1), Some(B));

        let offer = TradeOffer::new(B, TradeBundle::cash(100), TradeBundle::assets(&[3]));
        assert_eq!(engine.propose_trade(A, &offer), Ok(true));

        assert!(engine.state.asset(AssetId(1)).is_owned_by(A));
        assert_eq!(engine.state.player(A).cash, 1400);
        assert_eq!(engine.state.player(B).cash, 1600);
        // Brown group now doubles: 2 -> 4.
        assert_eq!(engine.state.asset(AssetId(0)).current_rent, 4);
    }

    #[test]
    fn test_declined_trade_changes_nothing() {
        let mut engine = engine(Box::new(PassiveAgent));
        engine.state.set_owner(AssetId(1), Some(B));

        let offer = TradeOffer::new(B, TradeBundle::cash(100), TradeBundle::assets(&[3]));
        assert_eq!(engine.propose_trade(A, &offer), Ok(false));
        assert!(engine.state.asset(AssetId(1)).is_owned_by(B));
        assert_eq!(engine.state.player(A).cash, 1500);
    }

    #[test]
    fn test_demanded_bundle_checked_against_counterparty() {
        let mut engine = engine(Box::new(Accepting));
        // Nobody owns Baltic.
        let offer = TradeOffer::new(B, TradeBundle::cash(100), TradeBundle::assets(&[3]));
        assert_eq!(
            engine.propose_trade(A, &offer),
            Err(IllegalAction::InvalidTrade("asset not owned by its giver"))
        );

        let offer = TradeOffer::new(B, TradeBundle::cash(10), TradeBundle::cash(5000));
        assert_eq!(
            engine.propose_trade(A, &offer),
            Err(IllegalAction::InvalidTrade("not enough cash"))
        );
    }

    #[test]
    fn test_malformed_offers() {
        let mut engine = engine(Box::new(Accepting));
        let cases = [
            TradeOffer::new(A, TradeBundle::cash(1), TradeBundle::cash(1)),
            TradeOffer::new(SeatId::new(7), TradeBundle::cash(1), TradeBundle::cash(1)),
            TradeOffer::new(B, TradeBundle::default(), TradeBundle::cash(1)),
            TradeOffer::new(B, TradeBundle::default().with_jail_cards(1), TradeBundle::cash(1)),
            TradeOffer::new(B, TradeBundle::assets(&[0]), TradeBundle::cash(1)),
        ];
        for offer in &cases {
            assert!(engine.propose_trade(A, offer).is_err());
        }
    }

    #[test]
    fn test_duplicate_and_developed_assets_rejected() {
        let mut engine = engine(Box::new(Accepting));
        engine.state.set_owner(AssetId(0), Some(A));
        engine.state.set_owner(AssetId(1), Some(A));

        let offer = TradeOffer::new(B, TradeBundle::assets(&[1, 1]), TradeBundle::cash(1));
        assert_eq!(
            engine.propose_trade(A, &offer),
            Err(IllegalAction::InvalidTrade("asset listed twice"))
        );

        crate::economy::build(&mut engine.state, A, AssetId(0)).unwrap();
        let offer = TradeOffer::new(B, TradeBundle::assets(&[3]), TradeBundle::cash(1));
        assert_eq!(
            engine.propose_trade(A, &offer),
            Err(IllegalAction::InvalidTrade("colour group has development"))
        );
    }

    #[test]
    fn test_wrong_reply_penalises_counterparty() {
        let mut engine = engine(Box::new(Confused));
        let offer = TradeOffer::new(B, TradeBundle::cash(10), TradeBundle::cash(5));
        assert_eq!(engine.propose_trade(A, &offer), Ok(false));
        assert_eq!(engine.penalties()[B], 0.5);
        assert_eq!(engine.penalties()[A], 0.0);
    }
}
