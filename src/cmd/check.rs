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

use std::fs::read_to_string;

use crate::deck::parse_deck;
use crate::error::Fallible;
use crate::error::fail;
use crate::stats::needs_attention;

/// Parse a deck file and print a short summary, or the reason it failed.
pub fn check_deck(path: &str) -> Fallible<()> {
    let text = match read_to_string(path) {
        Ok(text) => text,
        Err(_) => return fail(format!("cannot read deck file: {path}")),
    };
    let cards = parse_deck(&text)?;
    // Distinct categories in first-seen order, same rule as the results
    // screen uses.
    let categories = needs_attention(&cards);
    println!("{path}: {} cards, {} categories", cards.len(), categories.len());
    for category in categories {
        let count = cards.iter().filter(|c| c.category == category).count();
        println!("  {category}: {count}");
    }
    let with_images = cards.iter().filter(|c| c.image.is_some()).count();
    if with_images > 0 {
        println!("  ({with_images} cards carry images)");
    }
    Ok(())
}
