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

//! End-of-session statistics, recomputed on demand from the two piles.

use crate::deck::Card;

/// Aggregate results for one finished session. Derived data; owns nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub correct: usize,
    /// Categories classified as mastered. The classifying ratio divides a
    /// category's known-count by that category's occurrences within the
    /// known pile alone, so any category with at least one known card
    /// qualifies. Kept as-is for compatibility with the exported behavior.
    pub strong_sides: Vec<String>,
}

impl Statistics {
    /// Accuracy as a whole percentage. A session with zero reviewed cards
    /// is degenerate and reports zero rather than dividing by it.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.correct as f64 / self.total as f64 * 100.0).round() as u32
    }
}

pub fn compute(known_pile: &[Card], repeat_pile: &[Card]) -> Statistics {
    let total = known_pile.len() + repeat_pile.len();
    let correct = known_pile.len();

    let mut categories: Vec<(String, usize)> = Vec::new();
    for card in known_pile {
        match categories.iter_mut().find(|(cat, _)| *cat == card.category) {
            Some((_, count)) => *count += 1,
            None => categories.push((card.category.clone(), 1)),
        }
    }
    let strong_sides = categories
        .into_iter()
        .filter(|(cat, count)| {
            let in_known = known_pile.iter().filter(|c| &c.category == cat).count();
            *count as f64 / in_known as f64 > 0.5
        })
        .map(|(cat, _)| cat)
        .collect();

    Statistics {
        total,
        correct,
        strong_sides,
    }
}

/// Distinct categories appearing anywhere in the repeat pile, in first-seen
/// order. These are the ones to study again.
pub fn needs_attention(repeat_pile: &[Card]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for card in repeat_pile {
        if !categories.contains(&card.category) {
            categories.push(card.category.clone());
        }
    }
    categories
}
