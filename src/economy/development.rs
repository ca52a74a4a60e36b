//! Development operations: build, sell, mortgage, unmortgage.
//!
//! Every operation has a `check_*`/`plan_*` step that validates without
//! mutating and an applying step. Agent-initiated actions and the distress
//! resolver share the same code, so a liquidation can never do something
//! an agent could not.
//!
//! ## Selling a hotel
//!
//! A hotel normally sheds to 4 houses, taking 4 from the bank. When the
//! bank holds fewer than 4 houses the whole colour group is downgraded at
//! once: the bank's houses plus the houses standing on non-hotel members
//! are spread as evenly as possible over the group (the highest board
//! position gives up the remainder first), every hotel goes back to the
//! bank, and the bank keeps whatever is left over.

use smallvec::SmallVec;
use tracing::debug;

use super::rent;
use crate::board::{self, AssetId, Colour};
use crate::core::{Asset, GameState, IllegalAction, SeatId, HOTEL_LEVEL};

/// A validated sale of development, ready to apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SalePlan {
    pub seat: SeatId,
    pub target: AssetId,

    /// New level of every asset the sale touches.
    pub levels: SmallVec<[(AssetId, u8); 3]>,

    /// Bank stock after the sale.
    pub bank_houses: u32,
    pub bank_hotels: u32,

    pub proceeds: u32,
}

impl SalePlan {
    /// Apply the new levels to a scratch copy of the assets.
    pub fn apply_levels(&self, assets: &mut [Asset]) {
        for &(id, level) in &self.levels {
            assets[id.index()].level = level;
        }
    }
}

fn owned_by<'a>(state: &'a GameState, seat: SeatId, id: AssetId) -> Result<&'a Asset, IllegalAction> {
    let asset = state.asset(id);
    if asset.is_owned_by(seat) {
        Ok(asset)
    } else {
        Err(IllegalAction::NotOwner)
    }
}

/// Lowest and highest development level in a colour group.
#[must_use]
pub fn group_levels(assets: &[Asset], colour: Colour) -> (u8, u8) {
    board::group(colour).fold((HOTEL_LEVEL, 0), |(lo, hi), id| {
        let level = assets[id.index()].level;
        (lo.min(level), hi.max(level))
    })
}

fn require_cash(state: &GameState, seat: SeatId, amount: u32) -> Result<(), IllegalAction> {
    let player = state.player(seat);
    if player.can_afford(amount) {
        Ok(())
    } else {
        Err(IllegalAction::InsufficientCash {
            needed: amount,
            available: player.available_cash(),
        })
    }
}

// =============================================================================
// Build
// =============================================================================

/// Validate building one level on a street.
pub fn check_build(state: &GameState, seat: SeatId, id: AssetId) -> Result<(), IllegalAction> {
    let asset = owned_by(state, seat, id)?;
    let def = board::asset(id);
    let Some(colour) = def.colour else {
        return Err(IllegalAction::NotActiveMonopoly);
    };
    if !rent::is_active_monopoly(&state.assets, id) {
        return Err(IllegalAction::NotActiveMonopoly);
    }
    if asset.level >= HOTEL_LEVEL {
        return Err(IllegalAction::FullyDeveloped);
    }
    if asset.level != group_levels(&state.assets, colour).0 {
        return Err(IllegalAction::UnevenDevelopment);
    }
    require_cash(state, seat, def.house_price)?;

    if asset.level == HOTEL_LEVEL - 1 {
        if state.bank.hotels == 0 {
            return Err(IllegalAction::PoolExhausted("hotels"));
        }
    } else if state.bank.houses == 0 {
        return Err(IllegalAction::PoolExhausted("houses"));
    }
    Ok(())
}

/// Build one house (or convert 4 houses to a hotel). Returns the cost paid.
pub fn build(state: &mut GameState, seat: SeatId, id: AssetId) -> Result<u32, IllegalAction> {
    check_build(state, seat, id)?;

    let cost = board::asset(id).house_price;
    let level = state.asset(id).level;
    if level == HOTEL_LEVEL - 1 {
        state.bank.hotels -= 1;
        state.bank.houses += u32::from(level);
    } else {
        state.bank.houses -= 1;
    }
    state.asset_mut(id).level = level + 1;
    state.debit(seat, cost);
    rent::refresh_rents(state);

    debug!(%seat, asset = board::asset(id).name, level = level + 1, cost, "built");
    Ok(cost)
}

// =============================================================================
// Sell
// =============================================================================

/// Plan selling one level of development from a street.
pub fn plan_sale(state: &GameState, seat: SeatId, id: AssetId) -> Result<SalePlan, IllegalAction> {
    let asset = owned_by(state, seat, id)?;
    let def = board::asset(id);
    let Some(colour) = def.colour else {
        return Err(IllegalAction::NothingToSell);
    };
    if asset.level == 0 {
        return Err(IllegalAction::NothingToSell);
    }
    if asset.level != group_levels(&state.assets, colour).1 {
        return Err(IllegalAction::UnevenDevelopment);
    }

    let half = def.house_price / 2;
    let mut plan = SalePlan {
        seat,
        target: id,
        levels: SmallVec::new(),
        bank_houses: state.bank.houses,
        bank_hotels: state.bank.hotels,
        proceeds: half,
    };

    if !asset.has_hotel() {
        plan.levels.push((id, asset.level - 1));
        plan.bank_houses += 1;
    } else if state.bank.houses >= u32::from(HOTEL_LEVEL - 1) {
        plan.levels.push((id, HOTEL_LEVEL - 1));
        plan.bank_houses -= u32::from(HOTEL_LEVEL - 1);
        plan.bank_hotels += 1;
    } else {
        plan_redistribution(state, colour, &mut plan);
    }
    Ok(plan)
}

/// Downgrade every hotel in a group when the bank cannot supply 4 houses.
fn plan_redistribution(state: &GameState, colour: Colour, plan: &mut SalePlan) {
    let members: SmallVec<[AssetId; 3]> = board::group(colour).collect();
    let count = members.len() as u32;

    let mut pool = state.bank.houses
        + members
            .iter()
            .map(|id| u32::from(state.asset(*id).houses()))
            .sum::<u32>();
    let ceiling = pool.div_ceil(count);

    plan.proceeds = 0;
    for (i, id) in members.iter().enumerate().rev() {
        let remaining = i as u32 + 1;
        let houses = if pool < remaining * ceiling {
            ceiling - 1
        } else {
            ceiling
        };
        pool -= houses;

        let asset = state.asset(*id);
        if asset.has_hotel() {
            plan.bank_hotels += 1;
        }
        let shed = u32::from(asset.level).saturating_sub(houses);
        plan.proceeds += shed * board::asset(*id).house_price / 2;
        // houses <= 4 < HOTEL_LEVEL
        plan.levels.push((*id, houses as u8));
    }
    plan.levels.reverse();
    plan.bank_houses = pool;
}

/// Apply a sale plan: new levels, bank stock, proceeds to the seller.
pub fn apply_sale(state: &mut GameState, plan: &SalePlan) {
    plan.apply_levels(&mut state.assets);
    state.bank.houses = plan.bank_houses;
    state.bank.hotels = plan.bank_hotels;
    state.credit(plan.seat, plan.proceeds);
    rent::refresh_rents(state);

    debug!(
        seat = %plan.seat,
        asset = board::asset(plan.target).name,
        proceeds = plan.proceeds,
        "sold development"
    );
}

/// Sell one level of development. Returns the proceeds.
pub fn sell(state: &mut GameState, seat: SeatId, id: AssetId) -> Result<u32, IllegalAction> {
    let plan = plan_sale(state, seat, id)?;
    apply_sale(state, &plan);
    Ok(plan.proceeds)
}

// =============================================================================
// Mortgage
// =============================================================================

/// Validate mortgaging an asset.
pub fn check_mortgage(state: &GameState, seat: SeatId, id: AssetId) -> Result<(), IllegalAction> {
    let asset = owned_by(state, seat, id)?;
    if asset.mortgaged {
        return Err(IllegalAction::AlreadyMortgaged);
    }
    if rent::group_has_development(&state.assets, id) {
        return Err(IllegalAction::GroupDeveloped);
    }
    Ok(())
}

/// Mortgage an asset. Returns the cash raised.
pub fn mortgage(state: &mut GameState, seat: SeatId, id: AssetId) -> Result<u32, IllegalAction> {
    check_mortgage(state, seat, id)?;

    let value = board::asset(id).mortgage_value();
    state.asset_mut(id).mortgaged = true;
    state.credit(seat, value);
    rent::refresh_rents(state);

    debug!(%seat, asset = board::asset(id).name, value, "mortgaged");
    Ok(value)
}

/// Cost to lift the mortgage on an asset.
#[must_use]
pub fn unmortgage_cost(state: &GameState, id: AssetId) -> u32 {
    state.rules.unmortgage_cost(board::asset(id).mortgage_value())
}

/// Validate lifting a mortgage.
pub fn check_unmortgage(state: &GameState, seat: SeatId, id: AssetId) -> Result<(), IllegalAction> {
    let asset = owned_by(state, seat, id)?;
    if !asset.mortgaged {
        return Err(IllegalAction::NotMortgaged);
    }
    require_cash(state, seat, unmortgage_cost(state, id))
}

/// Lift a mortgage. Returns the cost paid.
pub fn unmortgage(state: &mut GameState, seat: SeatId, id: AssetId) -> Result<u32, IllegalAction> {
    check_unmortgage(state, seat, id)?;

    let cost = unmortgage_cost(state, id);
    state.asset_mut(id).mortgaged = false;
    state.debit(seat, cost);
    rent::refresh_rents(state);

    debug!(%seat, asset = board::asset(id).name, cost, "unmortgaged");
    Ok(cost)
}
