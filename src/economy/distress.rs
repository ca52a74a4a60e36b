//! Financial distress resolver.
//!
//! `raise_funds` turns a cash shortfall into a sequence of liquidations,
//! cheapest first by lost future income. It never pays the debt; it only
//! reports whether the debtor can now cover it.
//!
//! ## Ordering
//!
//! - Phase A mortgages undeveloped, unmortgaged assets one at a time,
//!   choosing the asset whose mortgage loses the least probability-weighted
//!   rent across the debtor's holdings (railroad and utility tiers included).
//!   A street whose colour group carries any development is skipped.
//! - Phase B sells development one level at a time (top-down within each
//!   group), choosing the sale with the lowest lost rent per unit of cash
//!   raised. A sale that clears a group's last development re-runs Phase A
//!   on that group before continuing.
//!
//! Impact is measured by recomputing rents on a scratch copy of the assets,
//! so it always agrees with the rent evaluator. Ties keep the first
//! candidate in board order.

use tracing::debug;

use super::development::{self, SalePlan};
use super::rent;
use crate::board::{self, AssetId, Colour};
use crate::core::{Asset, GameState, SeatId};

/// Raise cash until the seat holds at least `owed`.
///
/// Returns true if the seat can now pay.
pub fn raise_funds(state: &mut GameState, seat: SeatId, owed: u32) -> bool {
    if state.player(seat).can_afford(owed) {
        return true;
    }
    debug!(%seat, owed, cash = state.player(seat).cash, "raising funds");

    if mortgage_phase(state, seat, owed, None) {
        return true;
    }

    while let Some(plan) = cheapest_sale(state, seat) {
        development::apply_sale(state, &plan);
        if state.player(seat).can_afford(owed) {
            return true;
        }

        let freed = board::asset(plan.target).colour;
        if let Some(colour) = freed {
            let (_, top) = development::group_levels(&state.assets, colour);
            if top == 0 && mortgage_phase(state, seat, owed, Some(colour)) {
                return true;
            }
        }
    }

    let solvent = state.player(seat).can_afford(owed);
    if !solvent {
        debug!(%seat, owed, cash = state.player(seat).cash, "liquidation exhausted");
    }
    solvent
}

/// Income lost by the seat if `change` is applied to its assets.
fn income_loss(state: &GameState, seat: SeatId, change: impl FnOnce(&mut [Asset])) -> f64 {
    let before = rent::expected_income(&state.assets, seat);
    let mut scratch = state.assets.clone();
    change(&mut scratch);
    rent::recompute(&mut scratch);
    before - rent::expected_income(&scratch, seat)
}

/// Mortgage impact of an asset, or `None` if it cannot be mortgaged now.
#[must_use]
pub fn mortgage_impact(state: &GameState, seat: SeatId, id: AssetId) -> Option<f64> {
    development::check_mortgage(state, seat, id).ok()?;
    Some(income_loss(state, seat, |assets| {
        assets[id.index()].mortgaged = true;
    }))
}

/// Phase A. Mortgage until solvent or nothing eligible remains.
///
/// With `only` set, candidates are restricted to that colour group.
fn mortgage_phase(state: &mut GameState, seat: SeatId, owed: u32, only: Option<Colour>) -> bool {
    loop {
        if state.player(seat).can_afford(owed) {
            return true;
        }

        let candidates = state
            .owned_assets(seat)
            .into_iter()
            .filter(|&id| only.is_none() || board::asset(id).colour == only)
            .filter_map(|id| Some((id, mortgage_impact(state, seat, id)?)));

        let Some((id, impact)) = lowest_impact(candidates) else {
            return false;
        };
        if development::mortgage(state, seat, id).is_err() {
            return false;
        }
        debug!(%seat, asset = board::asset(id).name, impact, "liquidation: mortgage");
    }
}

/// Impact of a planned sale: lost income per unit of cash raised.
#[must_use]
pub fn sale_impact(state: &GameState, plan: &SalePlan) -> f64 {
    let lost = income_loss(state, plan.seat, |assets| plan.apply_levels(assets));
    if plan.proceeds == 0 {
        f64::INFINITY
    } else {
        lost / f64::from(plan.proceeds)
    }
}

/// Phase B candidate with the lowest impact.
fn cheapest_sale(state: &GameState, seat: SeatId) -> Option<SalePlan> {
    let candidates = state
        .owned_assets(seat)
        .into_iter()
        .filter(|&id| state.asset(id).level > 0)
        .filter_map(|id| development::plan_sale(state, seat, id).ok())
        .map(|plan| {
            let impact = sale_impact(state, &plan);
            (plan, impact)
        });

    lowest_impact(candidates).map(|(plan, impact)| {
        debug!(%seat, asset = board::asset(plan.target).name, impact, "liquidation: sale");
        plan
    })
}

/// Candidate with the strictly lowest impact; ties keep the earliest.
fn lowest_impact<T>(candidates: impl IntoIterator<Item = (T, f64)>) -> Option<(T, f64)> {
    let mut best: Option<(T, f64)> = None;
    for (candidate, impact) in candidates {
        if best.as_ref().map_or(true, |(_, lowest)| impact < *lowest) {
            best = Some((candidate, impact));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rules, HOTEL_LEVEL};

    fn state() -> GameState {
        GameState::new(1, 2, 11, Rules::default())
    }

    fn give(state: &mut GameState, seat: SeatId, ids: &[AssetId]) {
        for id in ids {
            state.set_owner(*id, Some(seat));
        }
    }

    fn build_to(state: &mut GameState, ids: &[AssetId], level: u8) {
        for id in ids {
            state.asset_mut(*id).level = level;
            if level == HOTEL_LEVEL {
                state.bank.hotels -= 1;
            } else {
                state.bank.houses -= u32::from(level);
            }
        }
        rent::refresh_rents(state);
    }

    #[test]
    fn test_solvent_does_nothing() {
        let mut state = state();
        let seat = SeatId::new(0);
        give(&mut state, seat, &[AssetId(0)]);

        assert!(raise_funds(&mut state, seat, 1500));
        assert!(!state.asset(AssetId(0)).mortgaged);
    }

    #[test]
    fn test_nothing_to_liquidate() {
        let mut state = state();
        let seat = SeatId::new(0);
        state.player_mut(seat).cash = 1;

        assert!(!raise_funds(&mut state, seat, 2));
        assert_eq!(state.player(seat).cash, 1);
    }

    #[test]
    fn test_mortgages_cheapest_first() {
        let mut state = state();
        let seat = SeatId::new(0);
        // Mediterranean earns 2, Boardwalk 50: Mediterranean goes first.
        give(&mut state, seat, &[AssetId(0), AssetId(27)]);
        state.player_mut(seat).cash = 0;

        assert!(raise_funds(&mut state, seat, 30));
        assert!(state.asset(AssetId(0)).mortgaged);
        assert!(!state.asset(AssetId(27)).mortgaged);
        assert_eq!(state.player(seat).cash, 30);
    }

    #[test]
    fn test_continues_until_solvent() {
        let mut state = state();
        let seat = SeatId::new(0);
        give(&mut state, seat, &[AssetId(0), AssetId(27)]);
        state.player_mut(seat).cash = 0;

        assert!(raise_funds(&mut state, seat, 200));
        assert!(state.asset(AssetId(0)).mortgaged);
        assert!(state.asset(AssetId(27)).mortgaged);
        assert_eq!(state.player(seat).cash, 230);
    }

    #[test]
    fn test_railroad_impact_counts_siblings() {
        let mut state = state();
        let seat = SeatId::new(0);
        give(&mut state, seat, &board::RAILROADS[..2]);

        // Losing one of two railroads drops both rents from 50 to (0, 25).
        let impact = mortgage_impact(&state, seat, board::RAILROADS[0]).unwrap();
        let p0 = board::asset_probability(board::RAILROADS[0]) / 100.0;
        let p1 = board::asset_probability(board::RAILROADS[1]) / 100.0;
        let expected = p0 * 50.0 + p1 * 25.0;
        assert!((impact - expected).abs() < 1e-9);
    }

    #[test]
    fn test_developed_group_is_not_mortgaged() {
        let mut state = state();
        let seat = SeatId::new(0);
        let brown: Vec<AssetId> = board::group(Colour::Brown).collect();
        give(&mut state, seat, &brown);
        build_to(&mut state, &brown[1..], 1);

        assert_eq!(mortgage_impact(&state, seat, brown[0]), None);
    }

    #[test]
    fn test_sells_houses_then_mortgages_freed_group() {
        let mut state = state();
        let seat = SeatId::new(0);
        let brown: Vec<AssetId> = board::group(Colour::Brown).collect();
        give(&mut state, seat, &brown);
        build_to(&mut state, &brown, 1);
        state.player_mut(seat).cash = 0;

        // Two houses sell for 25 each, then a 30 mortgage covers the rest.
        assert!(raise_funds(&mut state, seat, 70));
        assert_eq!(state.asset(brown[0]).level, 0);
        assert_eq!(state.asset(brown[1]).level, 0);
        assert!(state.asset(brown[0]).mortgaged);
        assert!(!state.asset(brown[1]).mortgaged);
        assert_eq!(state.player(seat).cash, 80);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_sale_prefers_lowest_impact_per_cash() {
        let mut state = state();
        let seat = SeatId::new(0);
        let brown: Vec<AssetId> = board::group(Colour::Brown).collect();
        let dark: Vec<AssetId> = board::group(Colour::DarkBlue).collect();
        give(&mut state, seat, &brown);
        give(&mut state, seat, &dark);
        build_to(&mut state, &brown, 3);
        build_to(&mut state, &dark, 3);
        state.player_mut(seat).cash = 0;

        assert!(raise_funds(&mut state, seat, 20));
        let brown_levels: Vec<u8> = brown.iter().map(|id| state.asset(*id).level).collect();
        let dark_levels: Vec<u8> = dark.iter().map(|id| state.asset(*id).level).collect();
        // A brown house loses ~60-140 rent for 25; a dark blue house loses
        // 600-800 rent for 100.
        assert_eq!(dark_levels, vec![3, 3]);
        assert_eq!(brown_levels.iter().filter(|l| **l == 2).count(), 1);
        assert_eq!(state.player(seat).cash, 25);
    }

    #[test]
    fn test_equal_impact_keeps_scan_order() {
        let picked = lowest_impact([("vermont", 4.0), ("oriental", 4.0), ("baltic", 4.0)]);
        assert_eq!(picked, Some(("vermont", 4.0)));

        let picked = lowest_impact([("vermont", 4.0), ("oriental", 1.5), ("baltic", 1.5)]);
        assert_eq!(picked, Some(("oriental", 1.5)));

        assert_eq!(lowest_impact(Vec::<(u8, f64)>::new()), None);
    }

    #[test]
    fn test_liquidates_everything_before_failing() {
        let mut state = state();
        let seat = SeatId::new(0);
        let pink: Vec<AssetId> = board::group(Colour::Pink).collect();
        give(&mut state, seat, &pink);
        give(&mut state, seat, &[board::RAILROADS[0]]);
        build_to(&mut state, &pink, HOTEL_LEVEL);
        state.player_mut(seat).cash = 0;

        assert!(!raise_funds(&mut state, seat, 100_000));
        for id in &pink {
            assert_eq!(state.asset(*id).level, 0);
            assert!(state.asset(*id).mortgaged);
        }
        assert!(state.asset(board::RAILROADS[0]).mortgaged);
        // 3 hotels sold (5 levels x 50 each) + 3 pink mortgages + railroad.
        assert_eq!(state.player(seat).cash, 3 * 5 * 50 + 70 + 70 + 80 + 100);
        assert!(state.check_invariants().is_ok());
    }
}
