//! Weighted random selection over parallel item/weight slices.
//!
//! Used for sampling the extra daily quests (uniform weights) and usable by
//! any other "pick one of N by weight" roll. Callers pass the RNG in, so
//! tests can use a seeded `StdRng`.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Weight as seen by the sampler: non-finite and negative weights count as 0.
fn usable(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// Pick an index from `weights` with probability proportional to its weight.
///
/// Non-positive and non-finite weights are never picked. Returns `None` when
/// no weight is positive.
pub fn pick_weighted<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    let dist = WeightedIndex::new(weights.iter().map(|w| usable(*w))).ok()?;
    Some(dist.sample(rng))
}

/// Pick one item from `items` with the parallel `weights`.
///
/// Only the first `min(items.len(), weights.len())` entries take part.
pub fn choose_weighted<'a, T, R: Rng + ?Sized>(
    rng: &mut R,
    items: &'a [T],
    weights: &[f64],
) -> Option<&'a T> {
    let n = items.len().min(weights.len());
    pick_weighted(rng, &weights[..n]).map(|i| &items[i])
}

/// Draw up to `count` distinct items, each draw weighted by the remaining
/// items' weights. When `count` exceeds the number of pickable items the
/// whole pickable pool is returned (in draw order).
pub fn sample_weighted<T: Clone, R: Rng + ?Sized>(
    rng: &mut R,
    items: &[T],
    weights: &[f64],
    count: usize,
) -> Vec<T> {
    let n = items.len().min(weights.len());
    let mut remaining: Vec<f64> = weights[..n].iter().map(|w| usable(*w)).collect();

    let mut picked = Vec::with_capacity(count.min(n));
    while picked.len() < count {
        let Some(i) = pick_weighted(rng, &remaining) else {
            break;
        };
        remaining[i] = 0.0;
        picked.push(items[i].clone());
    }
    picked
}

/// Draw up to `count` distinct items uniformly at random.
pub fn sample_uniform<T: Clone, R: Rng + ?Sized>(rng: &mut R, items: &[T], count: usize) -> Vec<T> {
    items.choose_multiple(rng, count).cloned().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    // -- pick_weighted --------------------------------------------------------

    #[test]
    fn empty_weights_pick_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_weighted(&mut rng, &[]), None);
    }

    #[test]
    fn all_zero_weights_pick_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_weighted(&mut rng, &[0.0, 0.0, -3.0]), None);
    }

    #[test]
    fn zero_weight_is_never_picked() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let i = pick_weighted(&mut rng, &[0.0, 1.0, 0.0, 2.0]).unwrap();
            assert!(i == 1 || i == 3, "picked zero-weight index {i}");
        }
    }

    #[test]
    fn nan_weight_is_ignored() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            assert_eq!(pick_weighted(&mut rng, &[f64::NAN, 5.0]), Some(1));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let weights = [60.0, 30.0, 10.0];
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let seq_a: Vec<_> = (0..50).map(|_| pick_weighted(&mut a, &weights)).collect();
        let seq_b: Vec<_> = (0..50).map(|_| pick_weighted(&mut b, &weights)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn heavier_weight_is_picked_more_often() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts = [0usize; 2];
        for _ in 0..10_000 {
            counts[pick_weighted(&mut rng, &[90.0, 10.0]).unwrap()] += 1;
        }
        assert!(counts[0] > counts[1] * 4, "counts: {counts:?}");
    }

    #[test]
    fn choose_weighted_returns_item() {
        let mut rng = StdRng::seed_from_u64(5);
        let items = ["common", "rare", "epic"];
        let picked = choose_weighted(&mut rng, &items, &[0.0, 0.0, 1.0]);
        assert_eq!(picked, Some(&"epic"));
    }

    // -- sample -----------------------------------------------------------------

    #[test]
    fn sample_returns_distinct_items() {
        let mut rng = StdRng::seed_from_u64(11);
        let items: Vec<u32> = (0..6).collect();
        let mut picked = sample_uniform(&mut rng, &items, 4);
        assert_eq!(picked.len(), 4);
        picked.sort();
        picked.dedup();
        assert_eq!(picked.len(), 4);
    }

    #[test]
    fn sample_larger_than_pool_takes_whole_pool() {
        let mut rng = StdRng::seed_from_u64(11);
        let items = ["a", "b", "c"];
        let mut picked = sample_uniform(&mut rng, &items, 10);
        picked.sort();
        assert_eq!(picked, vec!["a", "b", "c"]);
    }

    #[test]
    fn sample_zero_returns_nothing() {
        let mut rng = StdRng::seed_from_u64(11);
        assert!(sample_uniform(&mut rng, &[1, 2, 3], 0).is_empty());
    }

    #[test]
    fn sample_skips_zero_weight_items() {
        let mut rng = StdRng::seed_from_u64(2);
        let picked = sample_weighted(&mut rng, &["x", "y", "z"], &[1.0, 0.0, 1.0], 3);
        assert_eq!(picked.len(), 2);
        assert!(!picked.contains(&"y"));
    }

    #[test]
    fn infinite_weight_is_ignored() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            assert_eq!(pick_weighted(&mut rng, &[f64::INFINITY, 2.0]), Some(1));
        }
    }
}
