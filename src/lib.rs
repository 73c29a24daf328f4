//! Phalanx - two-sided battle simulation with atomic round resolution

pub mod battle;
pub mod core;
