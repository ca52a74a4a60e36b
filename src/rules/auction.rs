//! Auctions.
//!
//! Bidding runs in rounds. Each round asks every active seat once, in seat
//! order, for a bid on the asset; any bid above the current high bid is a
//! raise. A round without a raise closes the auction. A winner who cannot
//! raise the money is bankrupted without a creditor and bidding starts
//! over among the seats still in the game.

use tracing::debug;

use crate::board::{self, AssetId};
use crate::core::{
    Action, AuctionView, EngineResult, IllegalAction, Obligation, SeatId, StateView,
};
use crate::economy::raise_funds;

use super::engine::Engine;

impl Engine {
    /// Auction an unowned asset. It stays unowned if nobody bids.
    pub fn auction(&mut self, id: AssetId) -> EngineResult<()> {
        let name = board::asset(id).name;
        loop {
            let Some((winner, price)) = self.bidding(id) else {
                debug!(asset = name, "no bids");
                return Ok(());
            };
            debug!(asset = name, %winner, price, "auction won");

            let obligation = Obligation { debtor: winner, creditor: None, amount: price };
            let previous = self.state.obligation.replace(obligation);
            let solvent = raise_funds(&mut self.state, winner, price);
            self.state.obligation = previous;

            if solvent {
                self.state.debit(winner, price);
                self.state.set_owner(id, Some(winner));
                return Ok(());
            }
            self.bankrupt(winner, None)?;
        }
    }

    /// Run bidding rounds until one passes without a raise.
    fn bidding(&mut self, id: AssetId) -> Option<(SeatId, u32)> {
        let mut auction = AuctionView {
            asset: id,
            position: board::asset(id).position,
            high_bid: 0,
            high_bidder: None,
        };

        loop {
            let mut raised = false;
            for seat in self.state.active_seats() {
                let view = StateView::of(&self.state);
                match self.agents[seat].bid(&view, &auction) {
                    Ok(Action::AuctionBid { amount }) if amount > auction.high_bid => {
                        auction.high_bid = amount;
                        auction.high_bidder = Some(seat);
                        raised = true;
                    }
                    Ok(Action::AuctionBid { .. }) => {}
                    Ok(_) => {
                        self.penalize(seat, &IllegalAction::WrongReply { expected: "auction_bid" });
                    }
                    Err(e) => self.penalize(seat, &IllegalAction::NoAnswer(e.to_string())),
                }
            }
            if !raised {
                break;
            }
        }

        auction.high_bidder.map(|seat| (seat, auction.high_bid))
    }
}
