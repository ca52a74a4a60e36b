//! Board catalog: tiles, ownable assets, colour groups, landing probabilities.
//!
//! ## Key Types
//!
//! - `Tile` / `TileKind`: what sits on each of the 40 positions
//! - `AssetDef`: price, house price and rent schedule of an ownable tile
//! - `AssetId`: catalog index of an ownable tile (board order)
//! - `Colour`: street colour groups
//!
//! The catalog is immutable and shared by every game in the process.

pub mod catalog;
pub mod tiles;

pub use catalog::{
    asset, asset_at, asset_probability, assets, group, probability, siblings, tile_at, tiles,
    ASSET_COUNT, JAIL_POSITION, RAILROADS, TILE_COUNT, UTILITIES,
};
pub use tiles::{AssetDef, AssetId, AssetKind, Colour, RentTable, Tile, TileKind};
