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

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// A minimal, zero-dependency, completely insecure PRNG to shuffle the cards.
pub struct TinyRng {
    state: u64,
}

const A: u64 = 6364136223846793005;
const C: u64 = 1442695040888963407;

impl TinyRng {
    /// Initialize the RNG from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Initialize the RNG from the system clock.
    pub fn from_entropy() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::from_seed(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        let new = self.state.wrapping_mul(A).wrapping_add(C);
        self.state = new;
        (new >> 32) as u32
    }

    // Generate random number in range [0, max], inclusive. Rejection
    // sampling keeps the distribution uniform rather than modulo-biased.
    fn below(&mut self, max: usize) -> usize {
        let bound = max as u32 + 1;
        let zone = (u32::MAX / bound) * bound;
        loop {
            let v = self.next_u32();
            if v < zone {
                return (v % bound) as usize;
            }
        }
    }
}

/// Fisher-Yates shuffle: walks `i` from the last index down to 1, swapping
/// with a random `j` in `[0, i]`. Every permutation is equally likely.
pub fn shuffle<T>(v: Vec<T>, rng: &mut TinyRng) -> Vec<T> {
    let mut v = v;
    for i in (1..v.len()).rev() {
        let j = rng.below(i);
        v.swap(i, j);
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = TinyRng::from_seed(42);
        let input: Vec<u32> = (0..100).collect();
        let mut shuffled = shuffle(input.clone(), &mut rng);
        shuffled.sort();
        assert_eq!(shuffled, input);
    }

    #[test]
    fn test_shuffle_empty_and_singleton() {
        let mut rng = TinyRng::from_seed(1);
        let empty: Vec<u32> = Vec::new();
        assert_eq!(shuffle(empty, &mut rng), Vec::<u32>::new());
        assert_eq!(shuffle(vec![7], &mut rng), vec![7]);
    }

    #[test]
    fn test_shuffle_is_deterministic_for_a_seed() {
        let input: Vec<u32> = (0..20).collect();
        let a = shuffle(input.clone(), &mut TinyRng::from_seed(99));
        let b = shuffle(input, &mut TinyRng::from_seed(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_below_covers_the_full_range_evenly() {
        let mut rng = TinyRng::from_seed(5);
        let mut counts = [0usize; 3];
        for _ in 0..300 {
            counts[rng.below(2)] += 1;
        }
        // Each of 0, 1, 2 lands well away from zero; a modulo-biased or
        // truncated generator would skew these badly.
        for count in counts {
            assert!(count > 60, "counts: {counts:?}");
        }
    }

    #[test]
    fn test_shuffle_moves_something_eventually() {
        // With 52 elements, the identity permutation is astronomically
        // unlikely across ten seeds.
        let input: Vec<u32> = (0..52).collect();
        let moved = (0..10).any(|seed| {
            let out = shuffle(input.clone(), &mut TinyRng::from_seed(seed));
            out != input
        });
        assert!(moved);
    }
}
