//! Economy: rent evaluation, development, and liquidation under distress.
//!
//! ## Key Types
//!
//! - `SalePlan`: a validated one-step sale of development
//!
//! These functions mutate `GameState` directly and never talk to agents.
//! Auctions, trades and bankruptcy need agent queries and live in `rules`.

pub mod development;
pub mod distress;
pub mod rent;

pub use development::{
    apply_sale, build, check_build, check_mortgage, check_unmortgage, group_levels, mortgage,
    plan_sale, sell, unmortgage, unmortgage_cost, SalePlan,
};
pub use distress::{mortgage_impact, raise_funds, sale_impact};
pub use rent::{
    expected_income, group_has_development, is_active_monopoly, is_monopoly, landing_rent,
    monopoly_owner, refresh_rents, rent_for, EXPECTED_ROLL,
};
