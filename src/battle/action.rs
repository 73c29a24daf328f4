//! Deferred, composable unit effects
//!
//! Decisions never mutate the field directly. Each decision returns a
//! `DeferredAction`: an ordered batch of captured effects (operation plus
//! bound roster indices) applied in one pass after every unit has decided.
//! Concatenation is associative with `noop` as identity, so the coordinator
//! can fold all decisions into a single action and apply it exactly once.

use rand::Rng;

use crate::battle::constants::{ADRENALINE_CHANCE, FLEE_DEATH_ROUNDS, MORALE_MAX};
use crate::battle::unit::Unit;
use crate::core::types::Vec2;

/// A single captured mutation, bound to roster indices at decision time
#[derive(Debug, Clone, PartialEq)]
pub enum UnitEffect {
    /// Add a (possibly negative) morale delta, clamped to `[0, MORALE_MAX]`
    ChangeMorale { unit: usize, delta: i32 },
    /// Full morale reset from a nearby centurion
    RallyToCenturion { unit: usize },
    /// Target loses health equal to the attacker's strength at apply time
    Strike { attacker: usize, target: usize },
    /// Displace along a unit direction, scaled by speed at apply time
    Displace { unit: usize, direction: Vec2 },
    /// Fleeing round: small chance of a surge, otherwise panic deepens
    AdrenalineRoll { unit: usize },
}

/// An ordered batch of deferred effects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeferredAction {
    effects: Vec<UnitEffect>,
}

impl DeferredAction {
    /// Identity element: applying it mutates nothing
    pub fn noop() -> Self {
        Self::default()
    }

    /// Wrap one captured effect
    pub fn of(effect: UnitEffect) -> Self {
        Self { effects: vec![effect] }
    }

    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn effects(&self) -> &[UnitEffect] {
        &self.effects
    }

    /// Order-preserving concatenation: `self`'s effects apply before `other`'s
    pub fn then(mut self, other: Self) -> Self {
        self.effects.extend(other.effects);
        self
    }

    /// Execute every captured effect in composition order.
    ///
    /// Consumes the action: a round's batch is applied exactly once, by the
    /// coordinator, after the whole decision phase has finished.
    pub fn apply<R: Rng>(self, units: &mut [Unit], rng: &mut R) {
        for effect in self.effects {
            apply_effect(effect, units, rng);
        }
    }
}

impl std::ops::Add for DeferredAction {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.then(rhs)
    }
}

fn apply_effect<R: Rng>(effect: UnitEffect, units: &mut [Unit], rng: &mut R) {
    match effect {
        UnitEffect::ChangeMorale { unit, delta } => {
            let unit = &mut units[unit];
            unit.braveness = (unit.braveness + delta).clamp(0, MORALE_MAX);
        }
        UnitEffect::RallyToCenturion { unit } => {
            units[unit].rally();
        }
        UnitEffect::Strike { attacker, target } => {
            // Strength read here, not at decision time: a same-round surge
            // already applied earlier in the batch lands at doubled strength
            let strength = units[attacker].strength;
            units[target].health -= strength;
        }
        UnitEffect::Displace { unit, direction } => {
            let unit = &mut units[unit];
            unit.coords = unit.coords + direction * unit.speed;
        }
        UnitEffect::AdrenalineRoll { unit } => {
            let roll: f32 = rng.gen();
            let idx = unit;
            let unit = &mut units[unit];
            if roll < ADRENALINE_CHANCE {
                tracing::debug!(unit = idx, "adrenaline surge while fleeing");
                unit.rally();
                unit.speed *= 2.0;
                unit.strength *= 2.0;
            } else {
                unit.time_fleeing += 1;
                if unit.time_fleeing == FLEE_DEATH_ROUNDS {
                    tracing::debug!(unit = idx, "collapsed from exhaustion while fleeing");
                    unit.health = 0.0;
                }
            }
        }
    }
}
