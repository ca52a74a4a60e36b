//! Landing resolution and card effects.
//!
//! Every arrival on a tile resolves exactly once. Cards that move the
//! player resolve the destination once more; the card tables never chain
//! two movement cards, so this always terminates.

use tracing::debug;

use crate::board::{self, AssetKind, TileKind, TILE_COUNT};
use crate::cards::{Card, CardEffect, DeckKind};
use crate::core::{DiceRoll, EngineResult, SeatId};
use crate::economy::rent;

use super::engine::Engine;

impl Engine {
    /// Resolve the tile the seat now stands on.
    ///
    /// `roll` is the dice roll that brought the player here, if any;
    /// `max_rent` is set by the advance-to-nearest cards.
    pub(crate) fn resolve_landing(
        &mut self,
        seat: SeatId,
        roll: Option<DiceRoll>,
        max_rent: bool,
    ) -> EngineResult<()> {
        let position = self.state.player(seat).position;
        match board::tile_at(position).kind {
            TileKind::Asset(id) => self.land_on_asset(seat, id, roll, max_rent),
            TileKind::Tax(amount) => {
                debug!(%seat, amount, "tax");
                self.settle_debt(seat, None, amount).map(|_| ())
            }
            TileKind::Chance => self.draw_card(seat, DeckKind::Chance),
            TileKind::CommunityChest => self.draw_card(seat, DeckKind::CommunityChest),
            TileKind::GoToJail => {
                self.send_to_jail(seat);
                Ok(())
            }
            TileKind::Go | TileKind::Jail | TileKind::FreeParking => Ok(()),
        }
    }

    fn land_on_asset(
        &mut self,
        seat: SeatId,
        id: board::AssetId,
        roll: Option<DiceRoll>,
        max_rent: bool,
    ) -> EngineResult<()> {
        let asset = self.state.asset(id);
        let owner = match asset.owner {
            // Unowned: the agent may buy or decline on its next action.
            None => return Ok(()),
            Some(owner) if owner == seat => return Ok(()),
            Some(owner) => owner,
        };
        if asset.mortgaged || !self.state.is_active(owner) {
            return Ok(());
        }

        let total = match roll {
            Some(roll) => roll.total(),
            None if board::asset(id).kind() == AssetKind::Utility => {
                self.state.rng.roll_dice().total()
            }
            None => 0,
        };
        let due = rent::landing_rent(&self.state.assets, id, total, max_rent);
        debug!(%seat, %owner, asset = board::asset(id).name, due, "rent");
        if due > 0 {
            self.settle_debt(seat, Some(owner), due)?;
        }
        Ok(())
    }

    // === Cards ===

    fn draw_card(&mut self, seat: SeatId, deck: DeckKind) -> EngineResult<()> {
        let drawn = match deck {
            DeckKind::Chance => self.state.chance.draw(),
            DeckKind::CommunityChest => self.state.community_chest.draw(),
        };
        match drawn {
            Some(card) => self.apply_card(seat, card),
            // Every card is held by players.
            None => Ok(()),
        }
    }

    /// Apply a drawn card to the seat.
    pub(crate) fn apply_card(&mut self, seat: SeatId, card: &Card) -> EngineResult<()> {
        debug!(%seat, deck = ?card.deck, card = card.text, "card");

        match card.effect {
            CardEffect::AdvanceTo(target) => {
                self.advance_to(seat, target);
                self.resolve_landing(seat, None, false)
            }
            CardEffect::AdvanceToNearest(kind) => {
                let target = nearest(self.state.player(seat).position, kind);
                self.advance_to(seat, target);
                self.resolve_landing(seat, None, true)
            }
            CardEffect::MoveBack(steps) => {
                let player = self.state.player_mut(seat);
                player.position = (player.position + TILE_COUNT - steps) % TILE_COUNT;
                self.resolve_landing(seat, None, false)
            }
            CardEffect::Collect(amount) => {
                self.state.credit(seat, amount);
                Ok(())
            }
            CardEffect::Pay(amount) => self.settle_debt(seat, None, amount).map(|_| ()),
            CardEffect::CollectFromEachPlayer(amount) => {
                for payer in self.state.active_seats() {
                    if payer != seat {
                        self.settle_debt(payer, Some(seat), amount)?;
                    }
                }
                Ok(())
            }
            CardEffect::PayEachPlayer(amount) => {
                for payee in self.state.active_seats() {
                    if payee == seat {
                        continue;
                    }
                    if !self.settle_debt(seat, Some(payee), amount)? {
                        break;
                    }
                }
                Ok(())
            }
            CardEffect::Repairs { per_house, per_hotel } => {
                let (houses, hotels) = self
                    .state
                    .owned_assets(seat)
                    .into_iter()
                    .map(|id| self.state.asset(id))
                    .fold((0u32, 0u32), |(houses, hotels), a| {
                        if a.has_hotel() {
                            (houses, hotels + 1)
                        } else {
                            (houses + u32::from(a.level), hotels)
                        }
                    });
                let due = houses * per_house + hotels * per_hotel;
                if due > 0 {
                    self.settle_debt(seat, None, due)?;
                }
                Ok(())
            }
            CardEffect::GoToJail => {
                self.send_to_jail(seat);
                Ok(())
            }
            CardEffect::GetOutOfJailFree => {
                self.state.player_mut(seat).jail_cards.push(card.deck);
                Ok(())
            }
        }
    }
}

/// First tile of a kind strictly ahead of `position`, wrapping.
fn nearest(position: u8, kind: AssetKind) -> u8 {
    (1..=TILE_COUNT)
        .map(|step| (position + step) % TILE_COUNT)
        .find(|&p| board::asset_at(p).is_some_and(|id| board::asset(id).kind() == kind))
        .unwrap_or(position)
}
