//! Battle tunables - all fixed design parameters in one place

/// Morale ceiling; a centurion rally restores braveness to this value
pub const MORALE_MAX: i32 = 100;

/// A unit whose braveness drops below this is fleeing
pub const MORALE_FLEE_THRESHOLD: i32 = 20;

/// Morale gained per round by the unit closest to the enemy line
pub const MORALE_PROXIMITY_GAIN: f32 = 10.0;

/// Morale lost per round by the unit most remote from the enemy line
pub const MORALE_PROXIMITY_LOSS: f32 = 10.0;

/// Asymptotic morale gain from the army-ratio term
pub const MORALE_RATIO_GAIN: f32 = 10.0;

/// Asymptotic morale loss from the army-ratio term
pub const MORALE_RATIO_LOSS: f32 = 10.0;

/// Radius within which a friendly centurion rallies a unit
pub const CENTURION_RALLY_RANGE: f32 = 3.0;

/// Chance per fleeing round of an adrenaline surge instead of deeper panic
pub const ADRENALINE_CHANCE: f32 = 0.05;

/// Consecutive fleeing rounds a unit survives before dying of exhaustion
pub const FLEE_DEATH_ROUNDS: u32 = 20;
