//! Game state: players, assets, the bank, decks and the RNG.
//!
//! ## GameState
//!
//! Complete mutable state of one game. Owned by the engine; agents only
//! ever see a `StateView` snapshot.
//!
//! ## Invariants (checked by `check_invariants`)
//!
//! - cash of every active seat is non-negative
//! - houses in play + houses in the bank = house pool; same for hotels
//! - development implies the colour group is an active monopoly
//! - a mortgaged asset carries zero rent
//! - held jail-free cards match the cards out of rotation

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::Rules;
use super::error::{EngineError, EngineResult};
use super::rng::GameRng;
use super::seat::{SeatId, SeatMap};
use crate::board::{self, AssetId, AssetKind};
use crate::cards::{CardDeck, DeckKind};
use crate::economy::rent;

/// Development level that represents a hotel.
pub const HOTEL_LEVEL: u8 = 5;

/// Jail state of a player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JailStatus {
    #[default]
    Free,
    Jailed {
        /// Full turns already spent confined.
        turns_served: u8,
    },
}

/// Per-seat player state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub seat: SeatId,
    pub cash: i64,
    pub position: u8,
    pub eliminated: bool,
    pub jail: JailStatus,
    /// Deck of origin of each held jail-free card.
    pub jail_cards: SmallVec<[DeckKind; 2]>,
    pub consecutive_doubles: u8,

    /// Cached ownership counts (railroads and utilities, mortgaged or not).
    pub railroads_owned: u8,
    pub utilities_owned: u8,

    // === Per-turn transients ===
    pub trade_offers_this_turn: u32,
    pub jail_roll_attempted: bool,
}

impl Player {
    /// Create a player at Go with the given cash.
    #[must_use]
    pub fn new(seat: SeatId, cash: u32) -> Self {
        Self {
            seat,
            cash: i64::from(cash),
            position: 0,
            eliminated: false,
            jail: JailStatus::Free,
            jail_cards: SmallVec::new(),
            consecutive_doubles: 0,
            railroads_owned: 0,
            utilities_owned: 0,
            trade_offers_this_turn: 0,
            jail_roll_attempted: false,
        }
    }

    /// Still in the game.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.eliminated
    }

    /// Currently confined.
    #[must_use]
    pub fn in_jail(&self) -> bool {
        matches!(self.jail, JailStatus::Jailed { .. })
    }

    /// Number of jail-free cards held.
    #[must_use]
    pub fn jail_free_cards(&self) -> u32 {
        self.jail_cards.len() as u32
    }

    /// Has at least `amount` in cash.
    #[must_use]
    pub fn can_afford(&self, amount: u32) -> bool {
        self.cash >= i64::from(amount)
    }

    /// Cash clamped into `u32` for reporting.
    #[must_use]
    pub fn available_cash(&self) -> u32 {
        u32::try_from(self.cash.max(0)).unwrap_or(u32::MAX)
    }

    /// Clear per-turn transient flags.
    pub fn reset_turn_flags(&mut self) {
        self.trade_offers_this_turn = 0;
        self.jail_roll_attempted = false;
    }
}

/// Live state of one ownable asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub position: u8,
    pub owner: Option<SeatId>,

    /// 0-4 houses, or `HOTEL_LEVEL` for a hotel.
    pub level: u8,
    pub mortgaged: bool,

    /// Rent a non-owner would pay now (utilities use the expected roll of 7).
    pub current_rent: u32,

    /// Set once the tile has gone to auction during the current landing.
    pub auctioned_this_landing: bool,
}

impl Asset {
    /// Create an unowned, undeveloped asset.
    #[must_use]
    pub fn new(id: AssetId) -> Self {
        Self {
            id,
            position: board::asset(id).position,
            owner: None,
            level: 0,
            mortgaged: false,
            current_rent: 0,
            auctioned_this_landing: false,
        }
    }

    /// Houses standing on the asset (a hotel counts as none).
    #[must_use]
    pub fn houses(&self) -> u8 {
        if self.level == HOTEL_LEVEL {
            0
        } else {
            self.level
        }
    }

    /// A hotel stands on the asset.
    #[must_use]
    pub fn has_hotel(&self) -> bool {
        self.level == HOTEL_LEVEL
    }

    /// Owned by the given seat.
    #[must_use]
    pub fn is_owned_by(&self, seat: SeatId) -> bool {
        self.owner == Some(seat)
    }
}

/// The bank's building stock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub houses: u32,
    pub hotels: u32,
}

/// A payment currently being settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obligation {
    pub debtor: SeatId,
    /// `None` when the bank is owed.
    pub creditor: Option<SeatId>,
    pub amount: u32,
}

/// Complete state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    pub game_id: u64,
    pub rules: Rules,
    pub players: SeatMap<Player>,
    pub assets: Vec<Asset>,
    pub bank: Bank,
    pub chance: CardDeck,
    pub community_chest: CardDeck,
    pub rng: GameRng,

    /// Current round (starts at 0).
    pub turn: u32,
    pub acting_seat: SeatId,
    pub obligation: Option<Obligation>,
}

impl GameState {
    /// Create the opening position.
    ///
    /// Consumes the RNG for the Community Chest shuffle, then Chance.
    #[must_use]
    pub fn new(game_id: u64, seat_count: usize, seed: u64, rules: Rules) -> Self {
        let mut rng = GameRng::new(seed);
        let community_chest = CardDeck::shuffled(DeckKind::CommunityChest, &mut rng);
        let chance = CardDeck::shuffled(DeckKind::Chance, &mut rng);

        Self {
            game_id,
            players: SeatMap::new(seat_count, |s| Player::new(s, rules.starting_cash)),
            assets: board::assets().iter().map(|def| Asset::new(def.id)).collect(),
            bank: Bank {
                houses: rules.house_pool,
                hotels: rules.hotel_pool,
            },
            rules,
            chance,
            community_chest,
            rng,
            turn: 0,
            acting_seat: SeatId::new(0),
            obligation: None,
        }
    }

    /// Number of seats, eliminated or not.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.players.seat_count()
    }

    // === Players ===

    /// Player in a seat.
    #[must_use]
    pub fn player(&self, seat: SeatId) -> &Player {
        &self.players[seat]
    }

    /// Mutable player in a seat.
    pub fn player_mut(&mut self, seat: SeatId) -> &mut Player {
        &mut self.players[seat]
    }

    /// Seat exists and is not eliminated.
    #[must_use]
    pub fn is_active(&self, seat: SeatId) -> bool {
        self.players.get(seat).is_some_and(Player::is_active)
    }

    /// Active seats in seat order.
    #[must_use]
    pub fn active_seats(&self) -> Vec<SeatId> {
        self.players
            .iter()
            .filter(|(_, p)| p.is_active())
            .map(|(s, _)| s)
            .collect()
    }

    /// Add cash to a seat.
    pub fn credit(&mut self, seat: SeatId, amount: u32) {
        self.players[seat].cash += i64::from(amount);
    }

    /// Remove cash from a seat. Callers raise funds first.
    pub fn debit(&mut self, seat: SeatId, amount: u32) {
        self.players[seat].cash -= i64::from(amount);
    }

    /// Move cash between seats.
    pub fn transfer_cash(&mut self, from: SeatId, to: SeatId, amount: u32) {
        self.debit(from, amount);
        self.credit(to, amount);
    }

    // === Assets ===

    /// Live asset state.
    #[must_use]
    pub fn asset(&self, id: AssetId) -> &Asset {
        &self.assets[id.index()]
    }

    /// Mutable live asset state.
    pub fn asset_mut(&mut self, id: AssetId) -> &mut Asset {
        &mut self.assets[id.index()]
    }

    /// Assets owned by a seat, in board order.
    #[must_use]
    pub fn owned_assets(&self, seat: SeatId) -> Vec<AssetId> {
        self.assets
            .iter()
            .filter(|a| a.is_owned_by(seat))
            .map(|a| a.id)
            .collect()
    }

    /// Change the owner of an asset, keeping cached counts and rents current.
    ///
    /// An asset returned to the bank comes back unmortgaged and any
    /// buildings on it go back into the pool.
    pub fn set_owner(&mut self, id: AssetId, owner: Option<SeatId>) {
        let previous = self.assets[id.index()].owner;
        if previous == owner {
            return;
        }

        let kind = board::asset(id).kind();
        if let Some(prev) = previous {
            adjust_family_count(&mut self.players[prev], kind, false);
        }
        if let Some(next) = owner {
            adjust_family_count(&mut self.players[next], kind, true);
        }

        let asset = &mut self.assets[id.index()];
        asset.owner = owner;
        if owner.is_none() {
            if asset.has_hotel() {
                self.bank.hotels += 1;
            } else {
                self.bank.houses += u32::from(asset.level);
            }
            asset.mortgaged = false;
            asset.level = 0;
        }
        rent::refresh_rents(self);
    }

    /// Put a held jail-free card back at the bottom of `deck`.
    ///
    /// Returns false if that deck has no card out of rotation.
    pub fn return_jail_card(&mut self, deck: DeckKind) -> bool {
        match deck {
            DeckKind::Chance => self.chance.return_jail_card(),
            DeckKind::CommunityChest => self.community_chest.return_jail_card(),
        }
    }

    /// Clear every asset's auctioned-this-landing flag.
    pub fn clear_landing_flags(&mut self) {
        for asset in &mut self.assets {
            asset.auctioned_this_landing = false;
        }
    }

    /// Houses and hotels standing on the board.
    #[must_use]
    pub fn buildings_in_play(&self) -> (u32, u32) {
        self.assets.iter().fold((0, 0), |(houses, hotels), a| {
            if a.has_hotel() {
                (houses, hotels + 1)
            } else {
                (houses + u32::from(a.level), hotels)
            }
        })
    }

    // === Invariants ===

    /// Verify the conserved quantities and structural invariants.
    pub fn check_invariants(&self) -> EngineResult<()> {
        for (seat, player) in self.players.iter() {
            if player.is_active() && player.cash < 0 {
                return Err(EngineError::InvariantViolation(format!(
                    "{seat} has negative cash {}",
                    player.cash
                )));
            }
        }

        let (houses, hotels) = self.buildings_in_play();
        if houses + self.bank.houses != self.rules.house_pool {
            return Err(EngineError::InvariantViolation(format!(
                "houses not conserved: {houses} in play + {} in bank != {}",
                self.bank.houses, self.rules.house_pool
            )));
        }
        if hotels + self.bank.hotels != self.rules.hotel_pool {
            return Err(EngineError::InvariantViolation(format!(
                "hotels not conserved: {hotels} in play + {} in bank != {}",
                self.bank.hotels, self.rules.hotel_pool
            )));
        }

        for asset in &self.assets {
            if asset.level > 0 && !rent::is_active_monopoly(&self.assets, asset.id) {
                return Err(EngineError::InvariantViolation(format!(
                    "{} is developed outside an active monopoly",
                    board::asset(asset.id).name
                )));
            }
            if asset.mortgaged && asset.current_rent != 0 {
                return Err(EngineError::InvariantViolation(format!(
                    "{} is mortgaged but carries rent {}",
                    board::asset(asset.id).name,
                    asset.current_rent
                )));
            }
            if let Some(owner) = asset.owner {
                if !self.players.contains(owner) {
                    return Err(EngineError::InvariantViolation(format!(
                        "{} is owned by unknown {owner}",
                        board::asset(asset.id).name
                    )));
                }
            }
        }

        for deck in [&self.chance, &self.community_chest] {
            let held = self
                .players
                .values()
                .flat_map(|p| p.jail_cards.iter())
                .filter(|&&kind| kind == deck.kind())
                .count();
            let out = deck.out_of_rotation();
            if held != out {
                return Err(EngineError::InvariantViolation(format!(
                    "{held} {:?} jail-free cards held but {out} out of rotation",
                    deck.kind()
                )));
            }
        }

        Ok(())
    }
}

fn adjust_family_count(player: &mut Player, kind: AssetKind, gained: bool) {
    let counter = match kind {
        AssetKind::Railroad => &mut player.railroads_owned,
        AssetKind::Utility => &mut player.utilities_owned,
        AssetKind::Street => return,
    };
    if gained {
        *counter += 1;
    } else {
        *counter = counter.saturating_sub(1);
    }
}
