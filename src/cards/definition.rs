//! Card definitions - the two fixed 16-card tables.
//!
//! A card is an identifier (its index within its deck) plus the effect it
//! applies to the player who draws it. Effects are interpreted by the
//! turn engine; this module only describes them.

use serde::{Deserialize, Serialize};

use crate::board::AssetKind;

/// Cards per deck.
pub const DECK_SIZE: u8 = 16;

/// Which of the two decks a card belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckKind {
    Chance,
    CommunityChest,
}

/// Index of a card within its deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// What happens to the player who draws a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardEffect {
    /// Move forward to a fixed position, collecting the Go bonus on wrap.
    AdvanceTo(u8),
    /// Move forward to the nearest asset of a kind; rent there is charged
    /// at the maximum rate.
    AdvanceToNearest(AssetKind),
    /// Move backwards without passing Go.
    MoveBack(u8),
    Collect(u32),
    Pay(u32),
    CollectFromEachPlayer(u32),
    PayEachPlayer(u32),
    Repairs { per_house: u32, per_hotel: u32 },
    GoToJail,
    /// Kept by the player; leaves rotation until used or returned.
    GetOutOfJailFree,
}

/// Static card definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Card {
    pub deck: DeckKind,
    pub id: CardId,
    pub text: &'static str,
    pub effect: CardEffect,
}

const fn chance(id: u8, text: &'static str, effect: CardEffect) -> Card {
    Card { deck: DeckKind::Chance, id: CardId(id), text, effect }
}

const fn community(id: u8, text: &'static str, effect: CardEffect) -> Card {
    Card { deck: DeckKind::CommunityChest, id: CardId(id), text, effect }
}

static CHANCE: [Card; DECK_SIZE as usize] = [
    chance(0, "Advance to Boardwalk", CardEffect::AdvanceTo(39)),
    chance(1, "Advance to Go", CardEffect::AdvanceTo(0)),
    chance(2, "Advance to Illinois Avenue", CardEffect::AdvanceTo(24)),
    chance(3, "Advance to St. Charles Place", CardEffect::AdvanceTo(11)),
    chance(4, "Advance to the nearest Railroad", CardEffect::AdvanceToNearest(AssetKind::Railroad)),
    chance(5, "Advance to the nearest Railroad", CardEffect::AdvanceToNearest(AssetKind::Railroad)),
    chance(6, "Advance to the nearest Utility", CardEffect::AdvanceToNearest(AssetKind::Utility)),
    chance(7, "Bank pays you dividend of $50", CardEffect::Collect(50)),
    chance(8, "Get Out of Jail Free", CardEffect::GetOutOfJailFree),
    chance(9, "Go back three spaces", CardEffect::MoveBack(3)),
    chance(10, "Go to Jail", CardEffect::GoToJail),
    chance(11, "Make general repairs on all your property", CardEffect::Repairs { per_house: 25, per_hotel: 100 }),
    chance(12, "Speeding fine $15", CardEffect::Pay(15)),
    chance(13, "Take a trip to Reading Railroad", CardEffect::AdvanceTo(5)),
    chance(14, "You have been elected Chairman of the Board", CardEffect::PayEachPlayer(50)),
    chance(15, "Your building loan matures", CardEffect::Collect(150)),
];

static COMMUNITY_CHEST: [Card; DECK_SIZE as usize] = [
    community(0, "Advance to Go", CardEffect::AdvanceTo(0)),
    community(1, "Bank error in your favour", CardEffect::Collect(200)),
    community(2, "Doctor's fee", CardEffect::Pay(50)),
    community(3, "From sale of stock you get $50", CardEffect::Collect(50)),
    community(4, "Get Out of Jail Free", CardEffect::GetOutOfJailFree),
    community(5, "Go to Jail", CardEffect::GoToJail),
    community(6, "Grand Opera Night", CardEffect::CollectFromEachPlayer(50)),
    community(7, "Holiday fund matures", CardEffect::Collect(100)),
    community(8, "Income tax refund", CardEffect::Collect(20)),
    community(9, "It is your birthday", CardEffect::CollectFromEachPlayer(10)),
    community(10, "Life insurance matures", CardEffect::Collect(100)),
    community(11, "Hospital fees", CardEffect::Pay(50)),
    community(12, "School fees", CardEffect::Pay(50)),
    community(13, "Receive $25 consultancy fee", CardEffect::Collect(25)),
    community(14, "You are assessed for street repairs", CardEffect::Repairs { per_house: 40, per_hotel: 115 }),
    community(15, "Second prize in a beauty contest", CardEffect::Collect(10)),
];

/// Look up a card definition.
#[must_use]
pub fn card(deck: DeckKind, id: CardId) -> &'static Card {
    let table = match deck {
        DeckKind::Chance => &CHANCE,
        DeckKind::CommunityChest => &COMMUNITY_CHEST,
    };
    &table[usize::from(id.0 % DECK_SIZE)]
}
