//! The battle unit: attributes, fail-fast construction, decision logic
//!
//! A unit is a single concrete entity; per-unit behavior differences come
//! from plain data fields (`closer`/`weaker` targeting weights), not from
//! dispatch. `decide` reads only the unit and its frozen outlook and returns
//! a deferred action, so the whole decision phase is side-effect free.

use serde::{Deserialize, Serialize};

use crate::battle::action::{DeferredAction, UnitEffect};
use crate::battle::constants::{
    CENTURION_RALLY_RANGE, MORALE_FLEE_THRESHOLD, MORALE_MAX, MORALE_PROXIMITY_GAIN,
    MORALE_PROXIMITY_LOSS, MORALE_RATIO_GAIN, MORALE_RATIO_LOSS,
};
use crate::battle::snapshot::{EnemySighting, UnitOutlook};
use crate::core::error::{Result, SimError};
use crate::core::types::{Side, Vec2};

/// A single soldier on the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub side: Side,
    pub coords: Vec2,
    /// Dead when <= 0; attacks may drive it negative, nothing clamps it back
    pub health: f32,
    /// Damage dealt per strike
    pub strength: f32,
    /// Displacement magnitude per move
    pub speed: f32,
    /// Maximum distance at which striking is preferred over closing in
    pub reach: f32,
    /// Morale in [0, MORALE_MAX]; fleeing below MORALE_FLEE_THRESHOLD
    pub braveness: i32,
    /// Targeting weight on proximity
    pub closer: f32,
    /// Targeting weight on frailty
    pub weaker: f32,
    /// Consecutive rounds spent fleeing; fatal at FLEE_DEATH_ROUNDS
    pub time_fleeing: u32,
    /// Leaders rally nearby friends to full morale
    pub centurion: bool,
}

impl Unit {
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Derived from braveness every round, never stored independently
    pub fn is_fleeing(&self) -> bool {
        self.braveness < MORALE_FLEE_THRESHOLD
    }

    /// Full morale reset; also ends the current flee streak
    pub fn rally(&mut self) {
        self.braveness = MORALE_MAX;
        self.time_fleeing = 0;
    }

    pub fn distance(&self, other: &Unit) -> f32 {
        self.coords.distance(&other.coords)
    }

    /// Per-round decision: flee or engage, after adjusting morale.
    ///
    /// `self_idx` is this unit's roster position, bound into every effect.
    /// Returns a composed deferred action; nothing mutates until the
    /// coordinator applies the round's whole batch.
    pub fn decide(&self, self_idx: usize, outlook: &UnitOutlook) -> DeferredAction {
        if self.is_dead() || outlook.enemies.is_empty() {
            return DeferredAction::noop();
        }

        let action = self.morale_update(self_idx, outlook);
        if self.is_fleeing() {
            action + self.flee(self_idx, outlook.barycenter)
        } else {
            action + self.focus(self_idx, outlook)
        }
    }

    /// A nearby centurion restores morale outright; otherwise morale shifts
    /// with proximity to the enemy and the balance of the two armies.
    fn morale_update(&self, self_idx: usize, outlook: &UnitOutlook) -> DeferredAction {
        if let Some(centurion) = outlook.centurion {
            if self.coords.distance(&centurion) < CENTURION_RALLY_RANGE {
                return DeferredAction::of(UnitEffect::RallyToCenturion { unit: self_idx });
            }
        }

        let proximity_span = MORALE_PROXIMITY_GAIN + MORALE_PROXIMITY_LOSS;
        let proximity = (-proximity_span * outlook.remote + MORALE_PROXIMITY_GAIN) as i32;

        let ratio_span = MORALE_RATIO_GAIN + MORALE_RATIO_LOSS;
        let decay = MORALE_RATIO_GAIN / ratio_span;
        let force = (MORALE_RATIO_GAIN - ratio_span * decay.powf(outlook.ratio)) as i32;

        DeferredAction::of(UnitEffect::ChangeMorale {
            unit: self_idx,
            delta: proximity + force,
        })
    }

    /// Run away from the army's own barycenter, with a slim chance the rout
    /// turns into an adrenaline surge instead
    fn flee(&self, self_idx: usize, barycenter: Vec2) -> DeferredAction {
        let away = -self.coords.direction_to(&barycenter);
        DeferredAction::of(UnitEffect::AdrenalineRoll { unit: self_idx })
            + DeferredAction::of(UnitEffect::Displace {
                unit: self_idx,
                direction: away,
            })
    }

    /// Pick a target by the weighted closer/weaker criterion, then strike it
    /// if within reach or close the distance otherwise
    fn focus(&self, self_idx: usize, outlook: &UnitOutlook) -> DeferredAction {
        let mut target = &outlook.enemies[0];
        let mut best = self.focus_score(target, outlook);
        for sighting in &outlook.enemies[1..] {
            let score = self.focus_score(sighting, outlook);
            // Strict inequality keeps the first minimal element on ties
            if score < best {
                best = score;
                target = sighting;
            }
        }

        if self.coords.distance(&target.coords) <= self.reach {
            DeferredAction::of(UnitEffect::Strike {
                attacker: self_idx,
                target: target.index,
            })
        } else {
            DeferredAction::of(UnitEffect::Displace {
                unit: self_idx,
                direction: self.coords.direction_to(&target.coords),
            })
        }
    }

    fn focus_score(&self, sighting: &EnemySighting, outlook: &UnitOutlook) -> f32 {
        let close = self.closer * self.coords.distance(&sighting.coords) / outlook.sum_distances;
        let weak = self.weaker * sighting.health / outlook.sum_health;
        close + weak
    }
}

/// Fail-fast unit construction: every supplied value is validated once, so
/// no partially valid `Unit` can reach the roster.
#[derive(Debug, Clone)]
pub struct UnitBuilder {
    side: Side,
    coords: Vec2,
    health: f32,
    strength: f32,
    speed: f32,
    reach: f32,
    braveness: i32,
    closer: f32,
    weaker: f32,
    centurion: bool,
}

impl UnitBuilder {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            coords: Vec2::default(),
            health: 100.0,
            strength: 10.0,
            speed: 1.0,
            reach: 1.0,
            braveness: MORALE_MAX,
            closer: 1.0,
            weaker: 1.0,
            centurion: false,
        }
    }

    pub fn coords(mut self, x: f32, y: f32) -> Self {
        self.coords = Vec2::new(x, y);
        self
    }

    pub fn health(mut self, health: f32) -> Self {
        self.health = health;
        self
    }

    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn reach(mut self, reach: f32) -> Self {
        self.reach = reach;
        self
    }

    pub fn braveness(mut self, braveness: i32) -> Self {
        self.braveness = braveness;
        self
    }

    pub fn weights(mut self, closer: f32, weaker: f32) -> Self {
        self.closer = closer;
        self.weaker = weaker;
        self
    }

    pub fn centurion(mut self, centurion: bool) -> Self {
        self.centurion = centurion;
        self
    }

    pub fn build(self) -> Result<Unit> {
        check("coords.x", self.coords.x, self.coords.x.is_finite(), "must be finite")?;
        check("coords.y", self.coords.y, self.coords.y.is_finite(), "must be finite")?;
        check(
            "health",
            self.health,
            self.health.is_finite() && self.health >= 0.0,
            "must be finite and non-negative",
        )?;
        check(
            "strength",
            self.strength,
            self.strength.is_finite() && self.strength >= 0.0,
            "must be finite and non-negative",
        )?;
        check(
            "speed",
            self.speed,
            self.speed.is_finite() && self.speed >= 0.0,
            "must be finite and non-negative",
        )?;
        check(
            "reach",
            self.reach,
            self.reach.is_finite() && self.reach >= 0.0,
            "must be finite and non-negative",
        )?;
        check(
            "closer",
            self.closer,
            self.closer.is_finite() && self.closer >= 0.0,
            "must be finite and non-negative",
        )?;
        check(
            "weaker",
            self.weaker,
            self.weaker.is_finite() && self.weaker >= 0.0,
            "must be finite and non-negative",
        )?;
        check(
            "braveness",
            self.braveness as f32,
            (0..=MORALE_MAX).contains(&self.braveness),
            "must lie in [0, MORALE_MAX]",
        )?;

        Ok(Unit {
            side: self.side,
            coords: self.coords,
            health: self.health,
            strength: self.strength,
            speed: self.speed,
            reach: self.reach,
            braveness: self.braveness,
            closer: self.closer,
            weaker: self.weaker,
            time_fleeing: 0,
            centurion: self.centurion,
        })
    }
}

fn check(field: &'static str, value: f32, ok: bool, reason: &'static str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(SimError::InvalidUnit { field, value, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outlook_with(enemies: Vec<EnemySighting>) -> UnitOutlook {
        let sum_health = enemies.iter().map(|e| e.health).sum();
        UnitOutlook {
            sum_health,
            sum_distances: 1.0,
            centurion: None,
            remote: 0.0,
            ratio: 1.0,
            barycenter: Vec2::default(),
            enemies,
        }
    }

    fn sighting(index: usize, x: f32, y: f32, health: f32) -> EnemySighting {
        EnemySighting { index, coords: Vec2::new(x, y), health }
    }

    fn soldier() -> Unit {
        UnitBuilder::new(Side::Red).health(10.0).build().unwrap()
    }

    #[test]
    fn test_builder_rejects_negative_health() {
        let err = UnitBuilder::new(Side::Red).health(-1.0).build();
        assert!(matches!(err, Err(SimError::InvalidUnit { field: "health", .. })));
    }

    #[test]
    fn test_builder_rejects_nan_coords() {
        let err = UnitBuilder::new(Side::Blue).coords(f32::NAN, 0.0).build();
        assert!(matches!(err, Err(SimError::InvalidUnit { field: "coords.x", .. })));
    }

    #[test]
    fn test_builder_rejects_braveness_out_of_range() {
        let err = UnitBuilder::new(Side::Red).braveness(MORALE_MAX + 1).build();
        assert!(matches!(err, Err(SimError::InvalidUnit { field: "braveness", .. })));
    }

    #[test]
    fn test_dead_unit_decides_noop() {
        let mut unit = soldier();
        unit.health = 0.0;
        let outlook = outlook_with(vec![sighting(1, 0.0, 1.0, 10.0)]);
        assert!(unit.decide(0, &outlook).is_noop());
    }

    #[test]
    fn test_no_enemies_decides_noop() {
        let unit = soldier();
        assert!(unit.decide(0, &outlook_with(vec![])).is_noop());
    }

    #[test]
    fn test_strikes_when_target_within_reach() {
        let unit = soldier();
        let outlook = outlook_with(vec![sighting(3, 0.0, 1.0, 10.0)]);
        let action = unit.decide(0, &outlook);
        assert!(action
            .effects()
            .contains(&UnitEffect::Strike { attacker: 0, target: 3 }));
    }

    #[test]
    fn test_closes_distance_when_out_of_reach() {
        let unit = soldier();
        let outlook = outlook_with(vec![sighting(1, 0.0, 5.0, 10.0)]);
        let action = unit.decide(0, &outlook);
        let expected = UnitEffect::Displace {
            unit: 0,
            direction: Vec2::new(0.0, 1.0),
        };
        assert!(action.effects().contains(&expected));
    }

    #[test]
    fn test_fleeing_unit_runs_from_barycenter() {
        let mut unit = soldier();
        unit.braveness = 0;
        let mut outlook = outlook_with(vec![sighting(1, 0.0, 5.0, 10.0)]);
        outlook.barycenter = Vec2::new(0.0, 1.0);

        let effects = unit.decide(0, &outlook);
        let effects = effects.effects();
        // Morale update first, then the roll, then the move away
        assert!(matches!(effects[0], UnitEffect::ChangeMorale { .. }));
        assert_eq!(effects[1], UnitEffect::AdrenalineRoll { unit: 0 });
        assert_eq!(
            effects[2],
            UnitEffect::Displace { unit: 0, direction: Vec2::new(0.0, -1.0) }
        );
    }

    #[test]
    fn test_centurion_in_range_rallies() {
        let unit = soldier();
        let mut outlook = outlook_with(vec![sighting(1, 0.0, 5.0, 10.0)]);
        outlook.centurion = Some(Vec2::new(0.0, 2.0));
        let action = unit.decide(0, &outlook);
        assert_eq!(action.effects()[0], UnitEffect::RallyToCenturion { unit: 0 });
    }

    #[test]
    fn test_centurion_out_of_range_is_ignored() {
        let unit = soldier();
        let mut outlook = outlook_with(vec![sighting(1, 0.0, 5.0, 10.0)]);
        outlook.centurion = Some(Vec2::new(0.0, 4.0));
        let action = unit.decide(0, &outlook);
        assert!(matches!(action.effects()[0], UnitEffect::ChangeMorale { .. }));
    }

    #[test]
    fn test_morale_delta_spans_proximity_term() {
        let unit = soldier();
        // Adjacent to the enemy line, balanced armies: +10 + 0
        let mut outlook = outlook_with(vec![sighting(1, 0.0, 5.0, 10.0)]);
        outlook.remote = 0.0;
        outlook.ratio = 1.0;
        let action = unit.decide(0, &outlook);
        assert_eq!(action.effects()[0], UnitEffect::ChangeMorale { unit: 0, delta: 10 });

        // Most remote unit of its side: -10 + 0
        outlook.remote = 1.0;
        let action = unit.decide(0, &outlook);
        assert_eq!(action.effects()[0], UnitEffect::ChangeMorale { unit: 0, delta: -10 });
    }

    #[test]
    fn test_morale_ratio_term_spans_minus_ten_to_plus_ten() {
        let unit = soldier();
        let mut outlook = outlook_with(vec![sighting(1, 0.0, 5.0, 10.0)]);
        outlook.remote = 0.5; // proximity term truncates to 0

        outlook.ratio = 0.0;
        let action = unit.decide(0, &outlook);
        assert_eq!(action.effects()[0], UnitEffect::ChangeMorale { unit: 0, delta: -10 });

        outlook.ratio = 30.0;
        let action = unit.decide(0, &outlook);
        assert_eq!(action.effects()[0], UnitEffect::ChangeMorale { unit: 0, delta: 9 });
    }

    #[test]
    fn test_focus_prefers_weaker_target_under_weaker_weight() {
        let unit = UnitBuilder::new(Side::Red)
            .weights(0.0, 1.0)
            .reach(100.0)
            .build()
            .unwrap();
        let outlook = outlook_with(vec![
            sighting(1, 0.0, 1.0, 10.0),
            sighting(2, 0.0, 2.0, 2.0),
        ]);
        let action = unit.decide(0, &outlook);
        assert!(action
            .effects()
            .contains(&UnitEffect::Strike { attacker: 0, target: 2 }));
    }

    #[test]
    fn test_focus_prefers_closer_target_under_closer_weight() {
        let unit = UnitBuilder::new(Side::Red)
            .weights(1.0, 0.0)
            .reach(100.0)
            .build()
            .unwrap();
        let outlook = outlook_with(vec![
            sighting(1, 0.0, 4.0, 2.0),
            sighting(2, 0.0, 1.0, 50.0),
        ]);
        let action = unit.decide(0, &outlook);
        assert!(action
            .effects()
            .contains(&UnitEffect::Strike { attacker: 0, target: 2 }));
    }

    #[test]
    fn test_targeting_deterministic_across_repeated_calls() {
        let unit = soldier();
        let outlook = outlook_with(vec![
            sighting(1, 0.0, 1.0, 10.0),
            sighting(2, 1.0, 0.0, 10.0),
        ]);
        let first = unit.decide(0, &outlook);
        for _ in 0..10 {
            assert_eq!(unit.decide(0, &outlook), first);
        }
    }

    #[test]
    fn test_tie_keeps_first_minimal_enemy() {
        let unit = soldier();
        // Two identical candidates: the earlier roster entry must win
        let outlook = outlook_with(vec![
            sighting(5, 0.0, 1.0, 10.0),
            sighting(9, 0.0, -1.0, 10.0),
        ]);
        let action = unit.decide(0, &outlook);
        assert!(action
            .effects()
            .contains(&UnitEffect::Strike { attacker: 0, target: 5 }));
    }
}
