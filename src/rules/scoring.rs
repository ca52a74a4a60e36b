//! Final scores and the game result.
//!
//! A seat's score is `cash + liquidation value + 4 × expected income`,
//! where the liquidation value of an asset is what the bank would pay for
//! it (half price plus half the cost of its development; nothing if
//! mortgaged) and expected income is the probability-weighted rent from
//! `economy::expected_income`.

use serde::Serialize;

use crate::board;
use crate::core::{GameState, SeatId, SeatMap, StateView, HOTEL_LEVEL};
use crate::economy::expected_income;

use super::engine::Engine;

/// Weight of expected per-turn income in the final score.
pub const INCOME_WEIGHT: f64 = 4.0;

/// Result of a finished game.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameOutcome {
    pub game_id: u64,
    /// Full rounds played.
    pub turns: u32,
    /// The last seat standing, if the game ended by elimination.
    pub winner: Option<SeatId>,
    pub penalties: SeatMap<f64>,
    pub scores: SeatMap<f64>,
    pub final_state: StateView,
}

/// Cash the bank would pay for everything a seat owns.
#[must_use]
pub fn liquidation_value(state: &GameState, seat: SeatId) -> u32 {
    state
        .owned_assets(seat)
        .into_iter()
        .map(|id| {
            let asset = state.asset(id);
            if asset.mortgaged {
                return 0;
            }
            let def = board::asset(id);
            let level = u32::from(asset.level.min(HOTEL_LEVEL));
            def.price / 2 + level * def.house_price / 2
        })
        .sum()
}

/// Composite ranking score of a seat.
#[must_use]
pub fn score(state: &GameState, seat: SeatId) -> f64 {
    let player = state.player(seat);
    player.cash as f64
        + f64::from(liquidation_value(state, seat))
        + INCOME_WEIGHT * expected_income(&state.assets, seat)
}

impl Engine {
    /// Snapshot the result as things stand.
    #[must_use]
    pub fn outcome(&self) -> GameOutcome {
        let active = self.state.active_seats();
        let winner = match active.as_slice() {
            [only] => Some(*only),
            _ => None,
        };
        GameOutcome {
            game_id: self.state.game_id,
            turns: self.state.turn,
            winner,
            penalties: self.penalties.clone(),
            scores: SeatMap::new(self.state.seat_count(), |seat| score(&self.state, seat)),
            final_state: StateView::of(&self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::AssetId;
    use crate::core::Rules;

    #[test]
    fn test_liquidation_value() {
        let mut state = GameState::new(1, 2, 0, Rules::default());
        let seat = SeatId::new(0);
        state.set_owner(AssetId(0), Some(seat));
        state.set_owner(AssetId(1), Some(seat));
        state.set_owner(AssetId(2), Some(seat));
        state.asset_mut(AssetId(0)).level = 2;
        state.asset_mut(AssetId(2)).mortgaged = true;

        // Mediterranean 30 + 2 × 25, Baltic 30, Reading mortgaged.
        assert_eq!(liquidation_value(&state, seat), 110);
    }

    #[test]
    fn test_score_of_empty_seat_is_cash() {
        let state = GameState::new(1, 2, 0, Rules::default());
        assert_eq!(score(&state, SeatId::new(1)), 1500.0);
    }

    #[test]
    fn test_score_counts_income() {
        let mut state = GameState::new(1, 2, 0, Rules::default());
        let seat = SeatId::new(0);
        state.set_owner(AssetId(2), Some(seat));
        let income = expected_income(&state.assets, seat);
        assert!(income > 0.0);
        assert_eq!(score(&state, seat), 1500.0 + 100.0 + 4.0 * income);
    }
}
