//! Plain text battle state export
//!
//! Append-mode dump of the full roster, dead units included: a count line,
//! then `side x y health strength braveness` per unit with health and
//! strength truncated to integers. Appending lets one file accumulate a
//! round-by-round history of the battle.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::battle::round::Battle;
use crate::core::error::Result;

pub fn export_state(battle: &Battle, path: &Path) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{}", battle.units().len())?;
    for unit in battle.units() {
        writeln!(
            out,
            "{} {} {} {} {} {}",
            unit.side.index(),
            unit.coords.x,
            unit.coords.y,
            unit.health as i64,
            unit.strength as i64,
            unit.braveness,
        )?;
    }
    out.flush()?;
    Ok(())
}
