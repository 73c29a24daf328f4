//! Round-scoped distance memoization
//!
//! Built fresh at the start of every round, passed explicitly into snapshot
//! computation, dropped when the round ends. Never read across rounds; a
//! pure optimization with no observable semantics.

use ahash::AHashMap;

use crate::battle::unit::Unit;

/// Memoized symmetric pairwise distances for one round
#[derive(Debug, Default)]
pub struct DistanceCache {
    distances: AHashMap<(usize, usize), f32>,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance between roster entries `a` and `b`, computed at most once
    pub fn distance(&mut self, a: usize, b: usize, units: &[Unit]) -> f32 {
        let key = if a <= b { (a, b) } else { (b, a) };
        *self
            .distances
            .entry(key)
            .or_insert_with(|| units[a].coords.distance(&units[b].coords))
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}
