//! Shared letter supply with draw and refill policy
//!
//! The supply is drawn from the front. Whenever a draw leaves ten or fewer
//! letters a whole new shuffled set is appended behind the remainder, so the
//! number of tiles in circulation keeps growing over a long game.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::Letter;
use std::collections::VecDeque;

/// Copies of each letter in one full set
pub const TILE_DISTRIBUTION: [(char, usize); 26] = [
    ('A', 9),
    ('B', 2),
    ('C', 2),
    ('D', 4),
    ('E', 12),
    ('F', 2),
    ('G', 3),
    ('H', 2),
    ('I', 9),
    ('J', 1),
    ('K', 1),
    ('L', 4),
    ('M', 2),
    ('N', 6),
    ('O', 8),
    ('P', 2),
    ('Q', 1),
    ('R', 6),
    ('S', 4),
    ('T', 6),
    ('U', 4),
    ('V', 2),
    ('W', 2),
    ('X', 1),
    ('Y', 2),
    ('Z', 1),
];

/// Tiles in one full set
pub const POOL_SIZE: usize = 98;

/// A draw leaving this many letters or fewer triggers a refill
pub const REFILL_THRESHOLD: usize = 10;

/// Builds one full set of tiles in uniformly random order
pub fn fresh_pool<R: Rng + ?Sized>(rng: &mut R) -> Vec<Letter> {
    let mut pool: Vec<Letter> = TILE_DISTRIBUTION
        .iter()
        .filter_map(|(c, count)| Letter::new(*c).map(|letter| (letter, *count)))
        .flat_map(|(letter, count)| std::iter::repeat(letter).take(count))
        .collect();
    pool.shuffle(rng);
    pool
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LetterSupply {
    letters: VecDeque<Letter>,
}

impl LetterSupply {
    pub fn fresh<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            letters: fresh_pool(rng).into(),
        }
    }

    pub fn from_letters(letters: impl IntoIterator<Item = Letter>) -> Self {
        Self {
            letters: letters.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Next letters to be drawn, front first
    pub fn peek(&self, n: usize) -> impl Iterator<Item = &Letter> {
        self.letters.iter().take(n)
    }

    /// Removes the first `n` letters and refills if the remainder runs low
    pub fn draw<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Vec<Letter> {
        let take = n.min(self.letters.len());
        let drawn: Vec<Letter> = self.letters.drain(..take).collect();

        if self.letters.len() <= REFILL_THRESHOLD {
            self.letters.extend(fresh_pool(rng));
        }

        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn counts(letters: &[Letter]) -> HashMap<char, usize> {
        let mut counts = HashMap::new();
        for letter in letters {
            *counts.entry(letter.as_char()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_distribution_totals() {
        let total: usize = TILE_DISTRIBUTION.iter().map(|(_, count)| count).sum();
        assert_eq!(total, POOL_SIZE);
    }

    #[test]
    fn test_fresh_pool_matches_distribution() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let pool = fresh_pool(&mut rng);
            assert_eq!(pool.len(), POOL_SIZE);

            let counts = counts(&pool);
            for (c, expected) in TILE_DISTRIBUTION {
                assert_eq!(counts.get(&c).copied().unwrap_or(0), expected, "letter {}", c);
            }
        }
    }

    #[test]
    fn test_fresh_pool_is_shuffled() {
        let mut rng = StdRng::seed_from_u64(42);
        let first = fresh_pool(&mut rng);
        let second = fresh_pool(&mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn test_draw_takes_from_front() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut supply = LetterSupply::fresh(&mut rng);
        let expected: Vec<Letter> = supply.peek(7).copied().collect();

        let drawn = supply.draw(7, &mut rng);
        assert_eq!(drawn, expected);
        assert_eq!(supply.len(), POOL_SIZE - 7);
    }

    #[test]
    fn test_refill_appends_behind_remainder() {
        let mut rng = StdRng::seed_from_u64(3);
        let letters: Vec<Letter> = "ABCDEFGHIJKLMNOP".chars().filter_map(Letter::new).collect();
        let mut supply = LetterSupply::from_letters(letters.clone());

        let drawn = supply.draw(6, &mut rng);
        assert_eq!(drawn, letters[..6].to_vec());
        assert_eq!(supply.len(), 10 + POOL_SIZE);

        // the old remainder is kept in front of the new set
        let front: Vec<Letter> = supply.peek(10).copied().collect();
        assert_eq!(front, letters[6..].to_vec());
    }

    #[test]
    fn test_no_refill_above_threshold() {
        let mut rng = StdRng::seed_from_u64(3);
        let letters: Vec<Letter> = "ABCDEFGHIJKLMNOPQ".chars().filter_map(Letter::new).collect();
        let mut supply = LetterSupply::from_letters(letters);

        supply.draw(6, &mut rng);
        assert_eq!(supply.len(), 11);
    }

    #[test]
    fn test_supply_invariant_over_many_draws() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut supply = LetterSupply::fresh(&mut rng);

        for round in 0..200 {
            let n = round % 8;
            let before = supply.len();
            let drawn = supply.draw(n, &mut rng);
            assert_eq!(drawn.len(), n);

            let after = supply.len();
            if before - n <= REFILL_THRESHOLD {
                assert_eq!(after, before - n + POOL_SIZE);
            } else {
                assert_eq!(after, before - n);
            }
            assert!(after > REFILL_THRESHOLD);
        }
    }

    #[test]
    fn test_draw_more_than_available() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut supply = LetterSupply::from_letters("AB".chars().filter_map(Letter::new));
        let drawn = supply.draw(7, &mut rng);
        assert_eq!(drawn.len(), 2);
        assert_eq!(supply.len(), POOL_SIZE);
    }
}
