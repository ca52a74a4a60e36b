//! Debt settlement and bankruptcy.
//!
//! Every payment a player cannot refuse (rent, tax, card fees, auction
//! prices) goes through `settle_debt`: the distress resolver raises cash,
//! and if that fails the debtor is bankrupted. A creditor seat inherits
//! the whole estate; without one, each asset is auctioned.

use tracing::{debug, info};

use crate::board;
use crate::core::{EngineResult, JailStatus, Obligation, SeatId};
use crate::economy::raise_funds;

use super::engine::Engine;

impl Engine {
    /// Make `debtor` pay `amount` to `creditor` (the bank if `None`).
    ///
    /// Returns false if the debtor went bankrupt instead.
    pub fn settle_debt(
        &mut self,
        debtor: SeatId,
        creditor: Option<SeatId>,
        amount: u32,
    ) -> EngineResult<bool> {
        if amount == 0 {
            return Ok(true);
        }
        let creditor = creditor.filter(|&seat| self.state.is_active(seat));

        let obligation = Obligation { debtor, creditor, amount };
        let previous = self.state.obligation.replace(obligation);
        let solvent = raise_funds(&mut self.state, debtor, amount);
        self.state.obligation = previous;

        if !solvent {
            self.bankrupt(debtor, creditor)?;
            return Ok(false);
        }
        match creditor {
            Some(creditor) => self.state.transfer_cash(debtor, creditor, amount),
            None => self.state.debit(debtor, amount),
        }
        Ok(true)
    }

    /// Eliminate `debtor` and hand over the estate.
    ///
    /// An active creditor takes remaining cash, jail cards and every asset
    /// as it stands. Otherwise jail cards go back to their decks and each
    /// asset is returned to the bank and auctioned.
    pub fn bankrupt(&mut self, debtor: SeatId, creditor: Option<SeatId>) -> EngineResult<()> {
        let estate = self.state.owned_assets(debtor);
        let player = self.state.player_mut(debtor);
        let cash = player.cash.max(0);
        let cards = std::mem::take(&mut player.jail_cards);

        player.eliminated = true;
        player.cash = 0;
        player.jail = JailStatus::Free;
        player.consecutive_doubles = 0;

        let creditor = creditor.filter(|&seat| seat != debtor && self.state.is_active(seat));
        info!(
            %debtor,
            creditor = ?creditor,
            cash,
            assets = estate.len(),
            jail_cards = cards.len(),
            "bankrupt"
        );

        match creditor {
            Some(creditor) => {
                let heir = self.state.player_mut(creditor);
                heir.cash += cash;
                heir.jail_cards.extend(cards);
                for id in estate {
                    self.state.set_owner(id, Some(creditor));
                }
            }
            None => {
                for deck in cards {
                    self.state.return_jail_card(deck);
                }
                for &id in &estate {
                    self.state.set_owner(id, None);
                }
                for id in estate {
                    // A nested bankruptcy may already have sold it.
                    if self.state.asset(id).owner.is_none() {
                        debug!(asset = board::asset(id).name, "estate auction");
                        self.auction(id)?;
                    }
                }
            }
        }
        Ok(())
    }
}
