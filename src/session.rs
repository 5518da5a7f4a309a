// Copyright 2026 the cardbattle authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The deck/pile state machine: a shuffled deck, a cursor over it, the two
//! terminal piles, and the currently drawn card.

use crate::deck::Card;
use crate::rng::TinyRng;
use crate::rng::shuffle;

/// Where a committed card goes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decision {
    Known,
    Repeat,
}

/// One study session. The deck order is fixed at shuffle time; drawing only
/// advances the cursor. Piles are append-only within a session, and
/// `commit` is their sole mutator.
///
/// Invariants: `card_index <= deck.len()`; while no card is drawn,
/// `known.len() + repeat.len() + (deck.len() - card_index) == deck.len()`.
pub struct Session {
    deck: Vec<Card>,
    card_index: usize,
    known_pile: Vec<Card>,
    repeat_pile: Vec<Card>,
    current_card: Option<Card>,
}

impl Session {
    /// An empty, not-yet-started session.
    pub fn new() -> Self {
        Session {
            deck: Vec::new(),
            card_index: 0,
            known_pile: Vec::new(),
            repeat_pile: Vec::new(),
            current_card: None,
        }
    }

    /// Begin a session over a fresh shuffle of `cards`: cursor to zero,
    /// piles cleared, nothing drawn. Starting with zero cards is a no-op;
    /// the caller guards against presenting an empty session.
    pub fn start(&mut self, cards: Vec<Card>, rng: &mut TinyRng) {
        if cards.is_empty() {
            return;
        }
        self.deck = shuffle(cards, rng);
        self.card_index = 0;
        self.known_pile.clear();
        self.repeat_pile.clear();
        self.current_card = None;
    }

    /// Draw the card under the cursor. No-op if a card is already drawn or
    /// the deck is exhausted.
    pub fn draw(&mut self) {
        if self.current_card.is_none() && self.card_index < self.deck.len() {
            self.current_card = Some(self.deck[self.card_index].clone());
        }
    }

    /// Move the drawn card into the chosen pile and advance the cursor.
    /// No-op when nothing is drawn.
    pub fn commit(&mut self, decision: Decision) {
        let Some(card) = self.current_card.take() else {
            return;
        };
        match decision {
            Decision::Known => self.known_pile.push(card),
            Decision::Repeat => self.repeat_pile.push(card),
        }
        self.card_index += 1;
    }

    pub fn is_exhausted(&self) -> bool {
        self.card_index >= self.deck.len() && self.current_card.is_none()
    }

    /// Study again from scratch: re-shuffle the original full deck, not the
    /// remaining piles.
    pub fn restart(&mut self, rng: &mut TinyRng) {
        let cards = std::mem::take(&mut self.deck);
        self.start(cards, rng);
    }

    /// Study only the cards marked "repeat" last time. No-op when the
    /// repeat pile is empty: there is nothing to repeat.
    pub fn repeat_errors(&mut self, rng: &mut TinyRng) {
        if self.repeat_pile.is_empty() {
            return;
        }
        let cards = std::mem::take(&mut self.repeat_pile);
        self.start(cards, rng);
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current_card.as_ref()
    }

    pub fn card_index(&self) -> usize {
        self.card_index
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    /// Cards still waiting under the cursor, the drawn one excluded.
    pub fn remaining(&self) -> usize {
        let drawn = if self.current_card.is_some() { 1 } else { 0 };
        self.deck.len() - self.card_index - drawn
    }

    pub fn known_pile(&self) -> &[Card] {
        &self.known_pile
    }

    pub fn repeat_pile(&self) -> &[Card] {
        &self.repeat_pile
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
