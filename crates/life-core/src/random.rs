//! Randomness helpers.
//!
//! Every probabilistic choice in the engine draws from the session's
//! [`SimRng`](crate::SimRng) through these helpers, so a seed fully determines
//! a run.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Returns true with probability `p`. Values outside `[0, 1]` saturate.
pub fn chance<R: Rng>(rng: &mut R, p: f64) -> bool {
    if p <= 0.0 {
        return false;
    }
    if p >= 1.0 {
        return true;
    }
    rng.gen::<f64>() < p
}

/// Uniform pick from a slice; `None` when empty.
pub fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    items.choose(rng)
}

/// Uniform integer in `[low, high]`. Swapped bounds are tolerated.
pub fn range_inclusive<R: Rng>(rng: &mut R, low: i32, high: i32) -> i32 {
    let (lo, hi) = if low <= high { (low, high) } else { (high, low) };
    rng.gen_range(lo..=hi)
}

/// Perform weighted random selection over `(item, weight)` pairs.
///
/// Non-positive weights never win. Returns `None` for an empty slice or when
/// no candidate has positive weight.
pub fn weighted_choice<'a, T, R: Rng>(rng: &mut R, candidates: &'a [(T, f64)]) -> Option<&'a T> {
    let total_weight: f64 = candidates
        .iter()
        .map(|(_, w)| w.max(0.0))
        .sum();

    if total_weight <= 0.0 {
        return None;
    }

    // Generate random value in [0, total_weight)
    let mut roll: f64 = rng.gen::<f64>() * total_weight;

    for (item, weight) in candidates {
        if *weight <= 0.0 {
            continue;
        }
        roll -= weight;
        if roll < 0.0 {
            return Some(item);
        }
    }

    // Floating point slack: fall back to the last positive candidate
    candidates
        .iter()
        .rev()
        .find(|(_, w)| *w > 0.0)
        .map(|(item, _)| item)
}

/// Standard polyhedral dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Die {
    D4,
    D6,
    D8,
    D10,
    D12,
    #[default]
    D20,
    D100,
}

impl Die {
    pub fn sides(self) -> i32 {
        match self {
            Die::D4 => 4,
            Die::D6 => 6,
            Die::D8 => 8,
            Die::D10 => 10,
            Die::D12 => 12,
            Die::D20 => 20,
            Die::D100 => 100,
        }
    }

    /// Rolls the die, returning a value in `1..=sides`.
    pub fn roll<R: Rng>(self, rng: &mut R) -> i32 {
        rng.gen_range(1..=self.sides())
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

impl FromStr for Die {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "d4" => Ok(Die::D4),
            "d6" => Ok(Die::D6),
            "d8" => Ok(Die::D8),
            "d10" => Ok(Die::D10),
            "d12" => Ok(Die::D12),
            "d20" => Ok(Die::D20),
            "d100" => Ok(Die::D100),
            other => Err(format!("unknown die: '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_weighted_choice_respects_weights() {
        let mut rng = SmallRng::seed_from_u64(12345);
        let candidates = vec![("low", 0.1), ("high", 0.9)];

        let mut low = 0;
        let mut high = 0;
        for _ in 0..1000 {
            match *weighted_choice(&mut rng, &candidates).unwrap() {
                "low" => low += 1,
                _ => high += 1,
            }
        }

        // High should be selected ~90% of the time
        assert!(high > low * 5);
    }

    #[test]
    fn test_weighted_choice_skips_zero_weights() {
        let mut rng = SmallRng::seed_from_u64(7);
        let candidates = vec![("never", 0.0), ("always", 2.0), ("nope", -1.0)];
        for _ in 0..200 {
            assert_eq!(*weighted_choice(&mut rng, &candidates).unwrap(), "always");
        }
    }

    #[test]
    fn test_weighted_choice_empty() {
        let mut rng = SmallRng::seed_from_u64(7);
        let empty: Vec<(u8, f64)> = Vec::new();
        assert!(weighted_choice(&mut rng, &empty).is_none());
        assert!(weighted_choice(&mut rng, &[(1u8, 0.0)]).is_none());
    }

    #[test]
    fn test_chance_saturates() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(!chance(&mut rng, 0.0));
            assert!(!chance(&mut rng, -0.5));
            assert!(chance(&mut rng, 1.0));
            assert!(chance(&mut rng, 3.0));
        }
    }

    #[test]
    fn test_dice_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(99);
        for die in [Die::D4, Die::D6, Die::D8, Die::D10, Die::D12, Die::D20, Die::D100] {
            for _ in 0..200 {
                let value = die.roll(&mut rng);
                assert!((1..=die.sides()).contains(&value));
            }
        }
    }

    #[test]
    fn test_die_parse() {
        assert_eq!("d12".parse::<Die>().unwrap(), Die::D12);
        assert_eq!("D100".parse::<Die>().unwrap(), Die::D100);
        assert!("d7".parse::<Die>().is_err());
        assert_eq!(Die::D20.to_string(), "d20");
    }

    #[test]
    fn test_range_inclusive_tolerates_swapped_bounds() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..50 {
            let v = range_inclusive(&mut rng, 5, 2);
            assert!((2..=5).contains(&v));
        }
        assert_eq!(range_inclusive(&mut rng, 0, 0), 0);
    }
}
