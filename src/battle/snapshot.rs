//! Per-unit battlefield outlook
//!
//! The read-only aggregate view a unit decides against. All outlooks for a
//! round are computed before any unit decides, from the same roster state,
//! which is what makes the decision phase snapshot-pure.

use crate::battle::cache::DistanceCache;
use crate::battle::unit::Unit;
use crate::core::types::Vec2;

/// What a unit knows about one living enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySighting {
    /// Roster index, the handle deferred effects are bound to
    pub index: usize,
    pub coords: Vec2,
    pub health: f32,
}

/// The frozen aggregates one unit sees during one round's decision
#[derive(Debug, Clone, PartialEq)]
pub struct UnitOutlook {
    /// Living opposing units, in roster order (possibly empty)
    pub enemies: Vec<EnemySighting>,
    /// Total health over `enemies`
    pub sum_health: f32,
    /// Total self-to-enemy distance, the criterion normalizer
    pub sum_distances: f32,
    /// Position of the nearest living friendly centurion, if any
    pub centurion: Option<Vec2>,
    /// Normalized distance from the enemy army in [0, 1]: 0 for the friendly
    /// unit nearest the enemies, 1 for the most remote one
    pub remote: f32,
    /// Living enemy count over living own-side count
    pub ratio: f32,
    /// Centroid of the own side's living units
    pub barycenter: Vec2,
}

impl UnitOutlook {
    /// The view of a dead unit or an emptied field: nothing to act on
    pub fn empty() -> Self {
        Self {
            enemies: Vec::new(),
            sum_health: 0.0,
            sum_distances: 0.0,
            centurion: None,
            remote: 0.0,
            ratio: 0.0,
            barycenter: Vec2::default(),
        }
    }
}

/// Compute every unit's outlook for the coming round.
///
/// Dead units receive an empty outlook and are invisible to everyone else.
/// Pairwise distances go through the round-scoped cache.
pub fn compute_outlooks(units: &[Unit], cache: &mut DistanceCache) -> Vec<UnitOutlook> {
    let mut living: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
    for (idx, unit) in units.iter().enumerate() {
        if !unit.is_dead() {
            living[unit.side.index()].push(idx);
        }
    }

    let barycenters = [centroid(&living[0], units), centroid(&living[1], units)];

    // Mean self-to-enemy distance, then its per-side span, for remoteness
    let mut mean_enemy_dist = vec![0.0f32; units.len()];
    let mut spans = [(0.0f32, 0.0f32); 2];
    for side in 0..2 {
        let foes = &living[1 - side];
        if foes.is_empty() {
            continue;
        }
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for &i in &living[side] {
            let total: f32 = foes.iter().map(|&j| cache.distance(i, j, units)).sum();
            let mean = total / foes.len() as f32;
            mean_enemy_dist[i] = mean;
            lo = lo.min(mean);
            hi = hi.max(mean);
        }
        spans[side] = (lo, hi);
    }

    units
        .iter()
        .enumerate()
        .map(|(i, unit)| {
            if unit.is_dead() {
                return UnitOutlook::empty();
            }
            let side = unit.side.index();
            let own = &living[side];
            let foes = &living[1 - side];

            let enemies: Vec<EnemySighting> = foes
                .iter()
                .map(|&j| EnemySighting {
                    index: j,
                    coords: units[j].coords,
                    health: units[j].health,
                })
                .collect();
            let sum_health = enemies.iter().map(|e| e.health).sum();
            let sum_distances = foes.iter().map(|&j| cache.distance(i, j, units)).sum();

            let centurion = own
                .iter()
                .filter(|&&j| j != i && units[j].centurion)
                .min_by(|&&a, &&b| {
                    let da = cache.distance(i, a, units);
                    let db = cache.distance(i, b, units);
                    da.total_cmp(&db)
                })
                .map(|&j| units[j].coords);

            let (lo, hi) = spans[side];
            let remote = if enemies.is_empty() || hi - lo <= f32::EPSILON {
                0.0
            } else {
                (mean_enemy_dist[i] - lo) / (hi - lo)
            };

            let ratio = foes.len() as f32 / own.len() as f32;

            UnitOutlook {
                enemies,
                sum_health,
                sum_distances,
                centurion,
                remote,
                ratio,
                barycenter: barycenters[side],
            }
        })
        .collect()
}

fn centroid(indices: &[usize], units: &[Unit]) -> Vec2 {
    if indices.is_empty() {
        return Vec2::default();
    }
    let sum = indices
        .iter()
        .fold(Vec2::default(), |acc, &i| acc + units[i].coords);
    sum * (1.0 / indices.len() as f32)
}
