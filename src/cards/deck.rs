//! Card decks: a draw queue plus an out-of-rotation set.
//!
//! Cards are drawn from the front and recycled to the back. A
//! get-out-of-jail card leaves rotation when drawn and only re-enters the
//! queue (at the back) once a player uses it or loses it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::definition::{card, Card, CardEffect, CardId, DeckKind, DECK_SIZE};
use crate::core::rng::GameRng;

/// One of the two card decks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDeck {
    kind: DeckKind,
    queue: VecDeque<CardId>,
    out_of_rotation: Vec<CardId>,
}

impl CardDeck {
    /// Create a deck in table order (unshuffled).
    #[must_use]
    pub fn ordered(kind: DeckKind) -> Self {
        Self {
            kind,
            queue: (0..DECK_SIZE).map(CardId).collect(),
            out_of_rotation: Vec::new(),
        }
    }

    /// Create a deck shuffled with the game RNG.
    #[must_use]
    pub fn shuffled(kind: DeckKind, rng: &mut GameRng) -> Self {
        let mut ids: Vec<CardId> = (0..DECK_SIZE).map(CardId).collect();
        rng.shuffle(&mut ids);
        Self {
            kind,
            queue: ids.into(),
            out_of_rotation: Vec::new(),
        }
    }

    /// Create a deck with an explicit draw order.
    ///
    /// Useful for reproducing a specific sequence of draws.
    #[must_use]
    pub fn with_order(kind: DeckKind, order: impl IntoIterator<Item = u8>) -> Self {
        Self {
            kind,
            queue: order.into_iter().map(CardId).collect(),
            out_of_rotation: Vec::new(),
        }
    }

    /// Which deck this is.
    #[must_use]
    pub fn kind(&self) -> DeckKind {
        self.kind
    }

    /// Draw the front card.
    ///
    /// Regular cards go straight to the back of the queue; jail-free cards
    /// move to the out-of-rotation set.
    pub fn draw(&mut self) -> Option<&'static Card> {
        let id = self.queue.pop_front()?;
        let drawn = card(self.kind, id);
        if drawn.effect == CardEffect::GetOutOfJailFree {
            self.out_of_rotation.push(id);
        } else {
            self.queue.push_back(id);
        }
        Some(drawn)
    }

    /// Put one held jail-free card back at the bottom of the deck.
    ///
    /// Returns false if none of this deck's cards are out of rotation.
    pub fn return_jail_card(&mut self) -> bool {
        match self.out_of_rotation.pop() {
            Some(id) => {
                self.queue.push_back(id);
                true
            }
            None => false,
        }
    }

    /// Number of cards currently held by players.
    #[must_use]
    pub fn out_of_rotation(&self) -> usize {
        self.out_of_rotation.len()
    }

    /// Number of cards in the draw queue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if the draw queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Peek at the draw order without drawing.
    pub fn upcoming(&self) -> impl Iterator<Item = CardId> + '_ {
        self.queue.iter().copied()
    }
}
