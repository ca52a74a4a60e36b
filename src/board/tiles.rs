//! Tile and asset definitions - static board data.
//!
//! `AssetDef` holds the immutable properties of an ownable tile (price,
//! rent schedule, colour). Live ownership and development state is stored
//! separately in `crate::core::Asset`.

use serde::{Deserialize, Serialize};

/// Identifier of an ownable asset (index into the asset catalog, 0..28).
///
/// Assets are numbered in board order, so scanning by `AssetId` visits
/// tiles from Go onwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub u8);

impl AssetId {
    /// Create a new asset ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw catalog index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Asset({})", self.0)
    }
}

/// Street colour groups in board order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Colour {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
}

impl Colour {
    /// All colours in board order.
    pub const ALL: [Colour; 8] = [
        Colour::Brown,
        Colour::LightBlue,
        Colour::Pink,
        Colour::Orange,
        Colour::Red,
        Colour::Yellow,
        Colour::Green,
        Colour::DarkBlue,
    ];

    /// Board positions of the group members, lowest first.
    #[must_use]
    pub const fn positions(self) -> &'static [u8] {
        match self {
            Colour::Brown => &[1, 3],
            Colour::LightBlue => &[6, 8, 9],
            Colour::Pink => &[11, 13, 14],
            Colour::Orange => &[16, 18, 19],
            Colour::Red => &[21, 23, 24],
            Colour::Yellow => &[26, 27, 29],
            Colour::Green => &[31, 32, 34],
            Colour::DarkBlue => &[37, 39],
        }
    }
}

/// Rent schedule of an ownable asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RentTable {
    /// Base, 1-4 houses, hotel.
    Street([u32; 6]),
    /// Rent by number of railroads held (1-4).
    Railroad([u32; 4]),
    /// Dice multiplier by number of utilities held (1-2).
    Utility([u32; 2]),
}

/// Broad kind of an ownable asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Street,
    Railroad,
    Utility,
}

/// Static definition of an ownable tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetDef {
    pub id: AssetId,
    pub position: u8,
    pub name: &'static str,
    pub colour: Option<Colour>,
    pub price: u32,
    /// Cost of one house (streets only, 0 otherwise).
    pub house_price: u32,
    pub rent: RentTable,
}

impl AssetDef {
    /// Kind derived from the rent schedule.
    #[must_use]
    pub const fn kind(&self) -> AssetKind {
        match self.rent {
            RentTable::Street(_) => AssetKind::Street,
            RentTable::Railroad(_) => AssetKind::Railroad,
            RentTable::Utility(_) => AssetKind::Utility,
        }
    }

    /// Cash received for mortgaging.
    #[must_use]
    pub const fn mortgage_value(&self) -> u32 {
        self.price / 2
    }

    /// Street rent for a development level (0 = base, 5 = hotel).
    ///
    /// Returns 0 for non-street assets.
    #[must_use]
    pub fn street_rent(&self, level: u8) -> u32 {
        match self.rent {
            RentTable::Street(table) => table[usize::from(level.min(5))],
            _ => 0,
        }
    }
}

/// Kind of a board tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Go,
    Asset(AssetId),
    Tax(u32),
    Chance,
    CommunityChest,
    Jail,
    FreeParking,
    GoToJail,
}

/// Static definition of a board tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub position: u8,
    pub name: &'static str,
    pub kind: TileKind,
    /// Long-run probability (percent) that a turn ends here.
    pub probability: f64,
}
