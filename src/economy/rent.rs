//! Rent and monopoly evaluator.
//!
//! Derives monopoly status and rent from the catalog plus live asset state.
//! Functions take the asset slice rather than the whole `GameState` so the
//! distress resolver can evaluate hypothetical liquidations on a scratch
//! copy.
//!
//! ## Rent rules
//!
//! - unowned or mortgaged: 0
//! - street: tier lookup by level; an undeveloped street in a group owned
//!   entirely by one seat pays double base rent (mortgaged members do not
//!   break the doubling)
//! - railroad: 25 / 50 / 100 / 200 by the owner's unmortgaged railroads
//! - utility: roll total x 4, or x 10 when the owner holds both unmortgaged;
//!   the cached value uses the expected roll of 7

use crate::board::{self, AssetId, AssetKind, Colour, RentTable};
use crate::core::{Asset, GameState, SeatId};

/// Expected total of two dice, used for cached utility rent.
pub const EXPECTED_ROLL: u32 = 7;

/// Seat owning every member of a colour group, if any.
#[must_use]
pub fn monopoly_owner(assets: &[Asset], colour: Colour) -> Option<SeatId> {
    let mut members = board::group(colour);
    let owner = assets[members.next()?.index()].owner?;
    members
        .all(|id| assets[id.index()].owner == Some(owner))
        .then_some(owner)
}

/// Every member of the asset's colour group shares one owner.
///
/// Always false for railroads and utilities.
#[must_use]
pub fn is_monopoly(assets: &[Asset], id: AssetId) -> bool {
    board::asset(id)
        .colour
        .is_some_and(|c| monopoly_owner(assets, c).is_some())
}

/// Monopoly with no member mortgaged.
#[must_use]
pub fn is_active_monopoly(assets: &[Asset], id: AssetId) -> bool {
    is_monopoly(assets, id)
        && board::siblings(id)
            .iter()
            .all(|s| !assets[s.index()].mortgaged)
}

/// Any member of the asset's colour group has houses or a hotel.
#[must_use]
pub fn group_has_development(assets: &[Asset], id: AssetId) -> bool {
    match board::asset(id).colour {
        Some(colour) => board::group(colour).any(|s| assets[s.index()].level > 0),
        None => false,
    }
}

/// Unmortgaged assets of the same family (railroads or utilities) the seat holds.
fn active_family_count(assets: &[Asset], owner: SeatId, kind: AssetKind) -> usize {
    let family: &[AssetId] = match kind {
        AssetKind::Railroad => &board::RAILROADS,
        AssetKind::Utility => &board::UTILITIES,
        AssetKind::Street => return 0,
    };
    family
        .iter()
        .filter(|id| {
            let a = &assets[id.index()];
            a.owner == Some(owner) && !a.mortgaged
        })
        .count()
}

/// Utility dice multiplier for the owner's current holdings.
#[must_use]
pub fn utility_multiplier(assets: &[Asset], id: AssetId) -> u32 {
    let asset = &assets[id.index()];
    let (Some(owner), RentTable::Utility(table)) = (asset.owner, board::asset(id).rent) else {
        return 0;
    };
    match active_family_count(assets, owner, AssetKind::Utility) {
        0 => 0,
        n => table[(n - 1).min(table.len() - 1)],
    }
}

/// Rent a non-owner would pay on the asset right now.
///
/// Utilities are valued at the expected roll.
#[must_use]
pub fn rent_for(assets: &[Asset], id: AssetId) -> u32 {
    let asset = &assets[id.index()];
    let Some(owner) = asset.owner else {
        return 0;
    };
    if asset.mortgaged {
        return 0;
    }

    let def = board::asset(id);
    match def.rent {
        RentTable::Street(table) => {
            if asset.level == 0 && is_monopoly(assets, id) {
                table[0] * 2
            } else {
                def.street_rent(asset.level)
            }
        }
        RentTable::Railroad(table) => {
            match active_family_count(assets, owner, AssetKind::Railroad) {
                0 => 0,
                n => table[(n - 1).min(table.len() - 1)],
            }
        }
        RentTable::Utility(_) => EXPECTED_ROLL * utility_multiplier(assets, id),
    }
}

/// Recompute the cached rent of every asset.
pub fn recompute(assets: &mut [Asset]) {
    let rents: Vec<u32> = assets.iter().map(|a| rent_for(assets, a.id)).collect();
    for (asset, rent) in assets.iter_mut().zip(rents) {
        asset.current_rent = rent;
    }
}

/// Recompute cached rents after any ownership, mortgage or development change.
pub fn refresh_rents(state: &mut GameState) {
    recompute(&mut state.assets);
}

/// Rent owed by a player landing on the asset.
///
/// `roll` is the dice total that brought the player here (utilities only).
/// `max_rent` is set by the advance-to-nearest cards: railroads charge
/// double and utilities use the top multiplier.
#[must_use]
pub fn landing_rent(assets: &[Asset], id: AssetId, roll: u32, max_rent: bool) -> u32 {
    let asset = &assets[id.index()];
    if asset.owner.is_none() || asset.mortgaged {
        return 0;
    }
    match board::asset(id).rent {
        RentTable::Utility(table) => {
            let multiplier = if max_rent {
                table[table.len() - 1]
            } else {
                utility_multiplier(assets, id)
            };
            roll * multiplier
        }
        RentTable::Railroad(_) if max_rent => asset.current_rent * 2,
        _ => asset.current_rent,
    }
}

/// Probability-weighted rent income of a seat: the expected rent it
/// collects per opponent turn, in cash units.
#[must_use]
pub fn expected_income(assets: &[Asset], seat: SeatId) -> f64 {
    assets
        .iter()
        .filter(|a| a.owner == Some(seat))
        .map(|a| board::asset_probability(a.id) / 100.0 * f64::from(a.current_rent))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Rules;

    fn state() -> GameState {
        GameState::new(1, 3, 7, Rules::default())
    }

    fn orange() -> Vec<AssetId> {
        board::group(Colour::Orange).collect()
    }

    #[test]
    fn test_orange_group_ids() {
        // St. James, Tennessee, New York sit at 16, 18, 19.
        let ids = orange();
        assert_eq!(ids, vec![AssetId(11), AssetId(12), AssetId(13)]);
        for id in ids {
            assert_eq!(board::asset(id).colour, Some(Colour::Orange));
        }
    }

    #[test]
    fn test_monopoly_doubles_base_rent() {
        let mut state = state();
        let seat = SeatId::new(0);
        let ids = orange();

        state.set_owner(ids[0], Some(seat));
        state.set_owner(ids[1], Some(seat));
        let base = board::asset(ids[0]).street_rent(0);
        assert_eq!(state.asset(ids[0]).current_rent, base);
        assert!(!is_monopoly(&state.assets, ids[0]));

        state.set_owner(ids[2], Some(seat));
        assert!(is_monopoly(&state.assets, ids[0]));
        for id in &ids {
            let base = board::asset(*id).street_rent(0);
            assert_eq!(state.asset(*id).current_rent, base * 2);
            assert_eq!(landing_rent(&state.assets, *id, 8, false), base * 2);
        }
    }

    #[test]
    fn test_mortgaged_member_keeps_doubling() {
        let mut state = state();
        let seat = SeatId::new(0);
        let ids = orange();
        for id in &ids {
            state.set_owner(*id, Some(seat));
        }
        state.asset_mut(ids[0]).mortgaged = true;
        refresh_rents(&mut state);

        assert_eq!(state.asset(ids[0]).current_rent, 0);
        assert!(is_monopoly(&state.assets, ids[1]));
        assert!(!is_active_monopoly(&state.assets, ids[1]));
        assert_eq!(
            state.asset(ids[1]).current_rent,
            board::asset(ids[1]).street_rent(0) * 2
        );
    }

    #[test]
    fn test_developed_rent_uses_tier() {
        let mut state = state();
        let seat = SeatId::new(1);
        let ids = orange();
        for id in &ids {
            state.set_owner(*id, Some(seat));
        }
        state.asset_mut(ids[2]).level = 3;
        refresh_rents(&mut state);

        assert_eq!(state.asset(ids[2]).current_rent, board::asset(ids[2]).street_rent(3));
    }

    #[test]
    fn test_railroad_steps() {
        let mut state = state();
        let seat = SeatId::new(2);

        state.set_owner(board::RAILROADS[0], Some(seat));
        assert_eq!(state.asset(board::RAILROADS[0]).current_rent, 25);

        state.set_owner(board::RAILROADS[3], Some(seat));
        assert_eq!(state.asset(board::RAILROADS[0]).current_rent, 50);
        assert_eq!(state.asset(board::RAILROADS[3]).current_rent, 50);

        state.set_owner(board::RAILROADS[1], Some(seat));
        state.set_owner(board::RAILROADS[2], Some(seat));
        assert_eq!(state.asset(board::RAILROADS[2]).current_rent, 200);

        state.asset_mut(board::RAILROADS[2]).mortgaged = true;
        refresh_rents(&mut state);
        assert_eq!(state.asset(board::RAILROADS[0]).current_rent, 100);
        assert_eq!(landing_rent(&state.assets, board::RAILROADS[0], 5, true), 200);
    }

    #[test]
    fn test_utility_rent() {
        let mut state = state();
        let seat = SeatId::new(0);
        let electric = board::UTILITIES[0];

        state.set_owner(electric, Some(seat));
        assert_eq!(state.asset(electric).current_rent, 28);
        assert_eq!(landing_rent(&state.assets, electric, 9, false), 36);
        assert_eq!(landing_rent(&state.assets, electric, 9, true), 90);

        state.set_owner(board::UTILITIES[1], Some(seat));
        assert_eq!(state.asset(electric).current_rent, 70);
        assert_eq!(landing_rent(&state.assets, electric, 3, false), 30);
    }

    #[test]
    fn test_unowned_pays_nothing() {
        let state = state();
        for asset in &state.assets {
            assert_eq!(asset.current_rent, 0);
            assert_eq!(landing_rent(&state.assets, asset.id, 12, true), 0);
        }
    }

    #[test]
    fn test_expected_income_weights_by_probability() {
        let mut state = state();
        let seat = SeatId::new(0);
        let boardwalk = board::asset_at(39).unwrap();
        state.set_owner(boardwalk, Some(seat));

        let expected = board::probability(39) / 100.0 * 50.0;
        assert!((expected_income(&state.assets, seat) - expected).abs() < 1e-9);
        assert_eq!(expected_income(&state.assets, SeatId::new(1)), 0.0);
    }
}
