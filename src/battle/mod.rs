//! Battle simulation - atomic per-round decision and resolution
//!
//! Each round runs three strictly ordered phases: compute every unit's
//! outlook from the roster, let every unit decide against that frozen view,
//! then apply the single concatenated batch of deferred effects. No decision
//! in a round can observe another decision's outcome.

pub mod action;
pub mod cache;
pub mod constants;
pub mod export;
pub mod grid;
pub mod round;
pub mod snapshot;
pub mod unit;

pub use action::{DeferredAction, UnitEffect};
pub use cache::DistanceCache;
pub use constants::*;
pub use export::export_state;
pub use grid::render_grid;
pub use round::Battle;
pub use snapshot::{compute_outlooks, EnemySighting, UnitOutlook};
pub use unit::{Unit, UnitBuilder};
