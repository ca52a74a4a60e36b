//! Chance and Community Chest cards.
//!
//! ## Key Types
//!
//! - `Card` / `CardEffect`: static card tables
//! - `CardDeck`: draw queue with an out-of-rotation set for jail-free cards
//! - `DeckKind`: which deck a card belongs to

pub mod deck;
pub mod definition;

pub use deck::CardDeck;
pub use definition::{card, Card, CardEffect, CardId, DeckKind, DECK_SIZE};
