//! Read-only snapshots handed to agents.
//!
//! ## Key Types
//!
//! - `StateView`: public state (seats, assets, pools, pending obligation)
//! - `AuctionView`: the asset under the hammer and the current high bid
//!
//! Nothing in the game is hidden, so the view is the whole state minus the
//! RNG and the deck order. Lists are `im::Vector` so taking a snapshot per
//! query and storing one in the result is cheap.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::seat::SeatId;
use super::state::{Asset, GameState, Obligation, Player};
use crate::board::AssetId;

/// Public state snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateView {
    pub game_id: u64,
    pub turn: u32,
    pub acting_seat: SeatId,
    pub houses_remaining: u32,
    pub hotels_remaining: u32,

    /// Payment being settled when the snapshot was taken.
    pub obligation: Option<Obligation>,

    /// Seats in seat order.
    pub seats: Vector<Player>,

    /// Assets in board order.
    pub assets: Vector<Asset>,
}

impl StateView {
    /// Snapshot the current state.
    #[must_use]
    pub fn of(state: &GameState) -> Self {
        Self {
            game_id: state.game_id,
            turn: state.turn,
            acting_seat: state.acting_seat,
            houses_remaining: state.bank.houses,
            hotels_remaining: state.bank.hotels,
            obligation: state.obligation,
            seats: state.players.values().cloned().collect(),
            assets: state.assets.iter().cloned().collect(),
        }
    }

    /// Player in a seat, if it exists.
    #[must_use]
    pub fn seat(&self, seat: SeatId) -> Option<&Player> {
        self.seats.get(seat.index())
    }

    /// Asset by catalog ID.
    #[must_use]
    pub fn asset(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(id.index())
    }

    /// Assets owned by a seat, in board order.
    pub fn owned_by(&self, seat: SeatId) -> impl Iterator<Item = &Asset> {
        self.assets.iter().filter(move |a| a.owner == Some(seat))
    }

    /// Seats still in the game.
    pub fn active_seats(&self) -> impl Iterator<Item = SeatId> + '_ {
        self.seats.iter().filter(|p| !p.eliminated).map(|p| p.seat)
    }
}

/// Auction state shown to a bidder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionView {
    pub asset: AssetId,
    pub position: u8,
    pub high_bid: u32,
    pub high_bidder: Option<SeatId>,
}
