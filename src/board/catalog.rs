//! The immutable board catalog.
//!
//! Process-wide constant tables for the 40 tiles and the 28 ownable assets,
//! plus the long-run landing probabilities used to weigh liquidation and
//! scoring decisions. Nothing here is ever mutated.

use super::tiles::{AssetDef, AssetId, AssetKind, Colour, RentTable, Tile, TileKind};

/// Number of tiles on the board.
pub const TILE_COUNT: u8 = 40;

/// Number of ownable assets.
pub const ASSET_COUNT: usize = 28;

/// Position of the jail / just-visiting tile.
pub const JAIL_POSITION: u8 = 10;

/// Railroads in board order.
pub const RAILROADS: [AssetId; 4] = [AssetId(2), AssetId(10), AssetId(17), AssetId(25)];

/// Utilities in board order.
pub const UTILITIES: [AssetId; 2] = [AssetId(7), AssetId(20)];

const RAILROAD_RENT: RentTable = RentTable::Railroad([25, 50, 100, 200]);
const UTILITY_RENT: RentTable = RentTable::Utility([4, 10]);

const fn street(
    id: u8,
    position: u8,
    name: &'static str,
    colour: Colour,
    price: u32,
    house_price: u32,
    rent: [u32; 6],
) -> AssetDef {
    AssetDef {
        id: AssetId(id),
        position,
        name,
        colour: Some(colour),
        price,
        house_price,
        rent: RentTable::Street(rent),
    }
}

const fn railroad(id: u8, position: u8, name: &'static str) -> AssetDef {
    AssetDef {
        id: AssetId(id),
        position,
        name,
        colour: None,
        price: 200,
        house_price: 0,
        rent: RAILROAD_RENT,
    }
}

const fn utility(id: u8, position: u8, name: &'static str) -> AssetDef {
    AssetDef {
        id: AssetId(id),
        position,
        name,
        colour: None,
        price: 150,
        house_price: 0,
        rent: UTILITY_RENT,
    }
}

static ASSETS: [AssetDef; ASSET_COUNT] = [
    street(0, 1, "Mediterranean Avenue", Colour::Brown, 60, 50, [2, 10, 30, 90, 160, 250]),
    street(1, 3, "Baltic Avenue", Colour::Brown, 60, 50, [4, 20, 60, 180, 320, 450]),
    railroad(2, 5, "Reading Railroad"),
    street(3, 6, "Oriental Avenue", Colour::LightBlue, 100, 50, [6, 30, 90, 270, 400, 550]),
    street(4, 8, "Vermont Avenue", Colour::LightBlue, 100, 50, [6, 30, 90, 270, 400, 550]),
    street(5, 9, "Connecticut Avenue", Colour::LightBlue, 120, 50, [8, 40, 100, 300, 450, 600]),
    street(6, 11, "St. Charles Place", Colour::Pink, 140, 100, [10, 50, 150, 450, 625, 750]),
    utility(7, 12, "Electric Company"),
    street(8, 13, "States Avenue", Colour::Pink, 140, 100, [10, 50, 150, 450, 625, 750]),
    street(9, 14, "Virginia Avenue", Colour::Pink, 160, 100, [12, 60, 180, 500, 700, 900]),
    railroad(10, 15, "Pennsylvania Railroad"),
    street(11, 16, "St. James Place", Colour::Orange, 180, 100, [14, 70, 200, 550, 750, 950]),
    street(12, 18, "Tennessee Avenue", Colour::Orange, 180, 100, [14, 70, 200, 550, 750, 950]),
    street(13, 19, "New York Avenue", Colour::Orange, 200, 100, [16, 80, 220, 600, 800, 1000]),
    street(14, 21, "Kentucky Avenue", Colour::Red, 220, 150, [18, 90, 250, 700, 875, 1050]),
    street(15, 23, "Indiana Avenue", Colour::Red, 220, 150, [18, 90, 250, 700, 875, 1050]),
    street(16, 24, "Illinois Avenue", Colour::Red, 240, 150, [20, 100, 300, 750, 925, 1100]),
    railroad(17, 25, "B. & O. Railroad"),
    street(18, 26, "Atlantic Avenue", Colour::Yellow, 260, 150, [22, 110, 330, 800, 975, 1150]),
    street(19, 27, "Ventnor Avenue", Colour::Yellow, 260, 150, [22, 110, 330, 800, 975, 1150]),
    utility(20, 28, "Water Works"),
    street(21, 29, "Marvin Gardens", Colour::Yellow, 280, 150, [24, 120, 360, 850, 1025, 1200]),
    street(22, 31, "Pacific Avenue", Colour::Green, 300, 200, [26, 130, 390, 900, 1100, 1275]),
    street(23, 32, "North Carolina Avenue", Colour::Green, 300, 200, [26, 130, 390, 900, 1100, 1275]),
    street(24, 34, "Pennsylvania Avenue", Colour::Green, 320, 200, [28, 150, 450, 1000, 1200, 1400]),
    railroad(25, 35, "Short Line"),
    street(26, 37, "Park Place", Colour::DarkBlue, 350, 200, [35, 175, 500, 1100, 1300, 1500]),
    street(27, 39, "Boardwalk", Colour::DarkBlue, 400, 200, [50, 200, 600, 1400, 1700, 2000]),
];

const fn tile(position: u8, name: &'static str, kind: TileKind, probability: f64) -> Tile {
    Tile { position, name, kind, probability }
}

const fn owned(id: u8) -> TileKind {
    TileKind::Asset(AssetId(id))
}

static TILES: [Tile; TILE_COUNT as usize] = [
    tile(0, "Go", TileKind::Go, 3.0961),
    tile(1, "Mediterranean Avenue", owned(0), 2.1314),
    tile(2, "Community Chest", TileKind::CommunityChest, 1.8849),
    tile(3, "Baltic Avenue", owned(1), 2.1624),
    tile(4, "Income Tax", TileKind::Tax(200), 2.3285),
    tile(5, "Reading Railroad", owned(2), 2.9631),
    tile(6, "Oriental Avenue", owned(3), 2.2621),
    tile(7, "Chance", TileKind::Chance, 0.8650),
    tile(8, "Vermont Avenue", owned(4), 2.3210),
    tile(9, "Connecticut Avenue", owned(5), 2.3003),
    tile(10, "Just Visiting / In Jail", TileKind::Jail, 6.2194),
    tile(11, "St. Charles Place", owned(6), 2.7017),
    tile(12, "Electric Company", owned(7), 2.6040),
    tile(13, "States Avenue", owned(8), 2.3721),
    tile(14, "Virginia Avenue", owned(9), 2.4649),
    tile(15, "Pennsylvania Railroad", owned(10), 2.9200),
    tile(16, "St. James Place", owned(11), 2.7924),
    tile(17, "Community Chest", TileKind::CommunityChest, 2.5945),
    tile(18, "Tennessee Avenue", owned(12), 2.9356),
    tile(19, "New York Avenue", owned(13), 3.0852),
    tile(20, "Free Parking", TileKind::FreeParking, 2.8836),
    tile(21, "Kentucky Avenue", owned(14), 2.8358),
    tile(22, "Chance", TileKind::Chance, 1.0480),
    tile(23, "Indiana Avenue", owned(15), 2.7357),
    tile(24, "Illinois Avenue", owned(16), 3.1858),
    tile(25, "B. & O. Railroad", owned(17), 3.0659),
    tile(26, "Atlantic Avenue", owned(18), 2.7072),
    tile(27, "Ventnor Avenue", owned(19), 2.6789),
    tile(28, "Water Works", owned(20), 2.8074),
    tile(29, "Marvin Gardens", owned(21), 2.5861),
    tile(30, "Go To Jail", TileKind::GoToJail, 0.0),
    tile(31, "Pacific Avenue", owned(22), 2.6774),
    tile(32, "North Carolina Avenue", owned(23), 2.6252),
    tile(33, "Community Chest", TileKind::CommunityChest, 2.3661),
    tile(34, "Pennsylvania Avenue", owned(24), 2.5006),
    tile(35, "Short Line", owned(25), 2.4326),
    tile(36, "Chance", TileKind::Chance, 0.8669),
    tile(37, "Park Place", owned(26), 2.1864),
    tile(38, "Luxury Tax", TileKind::Tax(100), 2.1799),
    tile(39, "Boardwalk", owned(27), 2.6260),
];

/// Tile at a board position (wrapped modulo 40).
#[must_use]
pub fn tile_at(position: u8) -> &'static Tile {
    &TILES[usize::from(position % TILE_COUNT)]
}

/// All tiles in board order.
#[must_use]
pub fn tiles() -> &'static [Tile] {
    &TILES
}

/// Asset definition by ID.
///
/// Panics on an ID outside the catalog; IDs only come from the catalog itself.
#[must_use]
pub fn asset(id: AssetId) -> &'static AssetDef {
    &ASSETS[id.index()]
}

/// All asset definitions in board order.
#[must_use]
pub fn assets() -> &'static [AssetDef] {
    &ASSETS
}

/// Ownable asset on a board position, if any.
#[must_use]
pub fn asset_at(position: u8) -> Option<AssetId> {
    if position >= TILE_COUNT {
        return None;
    }
    match TILES[usize::from(position)].kind {
        TileKind::Asset(id) => Some(id),
        _ => None,
    }
}

/// Landing probability (percent) of a board position.
#[must_use]
pub fn probability(position: u8) -> f64 {
    tile_at(position).probability
}

/// Landing probability (percent) of an asset's tile.
#[must_use]
pub fn asset_probability(id: AssetId) -> f64 {
    probability(asset(id).position)
}

/// Members of a colour group in board order.
pub fn group(colour: Colour) -> impl Iterator<Item = AssetId> {
    colour.positions().iter().filter_map(|&p| asset_at(p))
}

/// Every asset of the same family as `id`: colour group for streets,
/// all railroads or all utilities otherwise.
#[must_use]
pub fn siblings(id: AssetId) -> Vec<AssetId> {
    let def = asset(id);
    match def.kind() {
        AssetKind::Street => def.colour.map(|c| group(c).collect()).unwrap_or_default(),
        AssetKind::Railroad => RAILROADS.to_vec(),
        AssetKind::Utility => UTILITIES.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_are_in_board_order() {
        for (i, def) in assets().iter().enumerate() {
            assert_eq!(def.id.index(), i);
            assert_eq!(asset_at(def.position), Some(def.id));
            assert_eq!(tile_at(def.position).name, def.name);
        }
    }

    #[test]
    fn test_tile_positions_match_indices() {
        for (i, t) in tiles().iter().enumerate() {
            assert_eq!(usize::from(t.position), i);
        }
    }

    #[test]
    fn test_colour_groups() {
        let total: usize = Colour::ALL.iter().map(|c| group(*c).count()).sum();
        assert_eq!(total, 22);

        let orange: Vec<_> = group(Colour::Orange).collect();
        assert_eq!(orange, vec![AssetId(11), AssetId(12), AssetId(13)]);
        assert_eq!(group(Colour::DarkBlue).count(), 2);

        for c in Colour::ALL {
            for id in group(c) {
                assert_eq!(asset(id).colour, Some(c));
            }
        }
    }

    #[test]
    fn test_railroads_and_utilities() {
        for id in RAILROADS {
            assert_eq!(asset(id).kind(), AssetKind::Railroad);
        }
        for id in UTILITIES {
            assert_eq!(asset(id).kind(), AssetKind::Utility);
        }
        assert_eq!(asset(UTILITIES[1]).position, 28);
    }

    #[test]
    fn test_probabilities_sum_to_roughly_one_hundred() {
        let total: f64 = tiles().iter().map(|t| t.probability).sum();
        assert!((total - 100.0).abs() < 0.5, "total = {total}");
        assert_eq!(probability(30), 0.0);
    }

    #[test]
    fn test_non_asset_tiles() {
        assert_eq!(asset_at(0), None);
        assert_eq!(asset_at(JAIL_POSITION), None);
        assert_eq!(asset_at(40), None);
        assert_eq!(tile_at(4).kind, TileKind::Tax(200));
        assert_eq!(tile_at(38).kind, TileKind::Tax(100));
    }

    #[test]
    fn test_street_rent_lookup() {
        let boardwalk = asset(AssetId(27));
        assert_eq!(boardwalk.street_rent(0), 50);
        assert_eq!(boardwalk.street_rent(5), 2000);
        assert_eq!(boardwalk.mortgage_value(), 200);
        assert_eq!(asset(RAILROADS[0]).street_rent(2), 0);
    }
}
