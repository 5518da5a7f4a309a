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

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;

/// A single flashcard. Immutable once added to a deck; the `id` is assigned
/// by the editor and never reused within a workbench.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Optional illustration, stored as a self-contained data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub question: String,
    pub category: String,
    pub id: u64,
}

/// The on-disk deck format: a JSON array of card objects.
pub fn parse_deck(text: &str) -> Fallible<Vec<Card>> {
    let cards: Vec<Card> = serde_json::from_str(text)?;
    for card in cards.iter() {
        if card.question.trim().is_empty() {
            return fail(format!("card {} has an empty question", card.id));
        }
        if card.category.trim().is_empty() {
            return fail(format!("card {} has an empty category", card.id));
        }
    }
    Ok(cards)
}

/// Serialize a deck for export. Pretty-printed, the way the `deck.json`
/// download expects it.
pub fn export_deck(cards: &[Card]) -> Fallible<String> {
    Ok(serde_json::to_string_pretty(cards)?)
}

#[cfg(test)]
pub fn make_card(id: u64, question: &str, category: &str) -> Card {
    Card {
        image: None,
        question: question.to_string(),
        category: category.to_string(),
        id,
    }
}
