//! Batch selection and delay rolling.
//!
//! A batch prefers distinct customer locations: the first pass takes at most
//! one order per location, the second pass fills the remaining quota from
//! whatever is left. The pool is visited in a random order so repeated
//! batches do not always favour the orders loaded first.

use std::collections::BTreeSet;

use greenhaul_types::{LocationKey, OrderRecord};
use rand::Rng;

/// Choose up to `batch_size` orders from `pool`.
///
/// Returns indices into `pool` in selection order. Never returns more than
/// `min(batch_size, pool.len())` indices and never repeats one.
pub fn select_batch(pool: &[OrderRecord], batch_size: usize, rng: &mut impl Rng) -> Vec<usize> {
    let quota = batch_size.min(pool.len());
    if quota == 0 {
        return Vec::new();
    }

    // Full Fisher-Yates over (index, location) pairs gives the visit order.
    let mut visit: Vec<(usize, &LocationKey)> = pool
        .iter()
        .enumerate()
        .map(|(i, order)| (i, &order.location))
        .collect();
    let len = visit.len();
    for i in 0..len {
        let j = rng.random_range(i..len);
        visit.swap(i, j);
    }

    let mut selected: Vec<usize> = Vec::with_capacity(quota);
    let mut locations: BTreeSet<&LocationKey> = BTreeSet::new();

    for &(index, location) in &visit {
        if selected.len() >= quota {
            break;
        }
        if locations.insert(location) {
            selected.push(index);
        }
    }

    for &(index, _) in &visit {
        if selected.len() >= quota {
            break;
        }
        if !selected.contains(&index) {
            selected.push(index);
        }
    }

    selected
}

/// Roll a visibility delay uniformly from `[base_delay / 2, base_delay]`.
///
/// A zero, negative or non-finite base delay yields zero: the order becomes
/// visible on the next tick.
pub fn roll_delay(base_delay: f64, rng: &mut impl Rng) -> f64 {
    if !base_delay.is_finite() || base_delay <= 0.0 {
        return 0.0;
    }
    rng.random_range(base_delay / 2.0..=base_delay)
}
