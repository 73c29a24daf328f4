//! The round coordinator
//!
//! Owns the roster and drives the three-phase round: outlook computation,
//! a read-only (and parallel) decision phase, then one sequential apply of
//! the concatenated action batch. Deferring every mutation to the apply
//! phase guarantees no unit observes another unit's same-round action.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::battle::action::DeferredAction;
use crate::battle::cache::DistanceCache;
use crate::battle::snapshot::compute_outlooks;
use crate::battle::unit::Unit;
use crate::core::types::Tick;

/// A battle in progress: the full unit roster plus the round RNG
#[derive(Debug, Clone)]
pub struct Battle {
    units: Vec<Unit>,
    rng: ChaCha8Rng,
    round: Tick,
}

impl Battle {
    /// Seeded for reproducible runs; the RNG only feeds apply-phase rolls
    pub fn new(seed: u64) -> Self {
        Self {
            units: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            round: 0,
        }
    }

    /// Append-only roster: dead units stay in place so indices remain stable
    pub fn push(&mut self, unit: Unit) {
        self.units.push(unit);
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    pub fn round(&self) -> Tick {
        self.round
    }

    /// One atomic round: snapshot, decide everywhere, apply everything.
    pub fn update(&mut self) {
        // Phase 1: fresh cache, all outlooks from the same roster state
        let mut cache = DistanceCache::new();
        let outlooks = compute_outlooks(&self.units, &mut cache);

        // Phase 2: read-only decisions, safely parallel; collect keeps
        // roster order so the fold below stays deterministic
        let actions: Vec<DeferredAction> = self
            .units
            .par_iter()
            .enumerate()
            .map(|(idx, unit)| unit.decide(idx, &outlooks[idx]))
            .collect();

        let batch = actions
            .into_iter()
            .fold(DeferredAction::noop(), DeferredAction::then);

        // Phase 3: strictly sequential application of the whole batch
        batch.apply(&mut self.units, &mut self.rng);
        self.round += 1;
        tracing::debug!(round = self.round, units = self.units.len(), "round applied");
    }

    /// True once either army's living health totals zero
    pub fn is_finished(&self) -> bool {
        let mut army_health = [0.0f32; 2];
        for unit in &self.units {
            // Overkill leaves health negative; a wiped side still totals zero
            army_health[unit.side.index()] += unit.health.max(0.0);
        }
        army_health.iter().any(|&h| h == 0.0)
    }
}
