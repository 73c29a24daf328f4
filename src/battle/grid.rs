//! Integer-grid text rendering of the field
//!
//! Living units are rounded to integer positions and drawn as their side
//! digit on a grid sized to the maximum rounded coordinates. A unit landing
//! outside the grid means the size estimate is wrong; that is a bug, so the
//! error carries the attempted coordinates and grid shape and is never
//! recovered from.

use crate::battle::round::Battle;
use crate::battle::unit::Unit;
use crate::core::error::{Result, SimError};

pub fn render_grid(battle: &Battle) -> Result<String> {
    let living: Vec<&Unit> = battle.units().iter().filter(|u| !u.is_dead()).collect();
    if living.is_empty() {
        return Ok(String::new());
    }

    let rounded = |value: f32| value.round() as i64;
    let height = living.iter().map(|u| rounded(u.coords.x)).max().unwrap_or(0) + 1;
    let width = living.iter().map(|u| rounded(u.coords.y)).max().unwrap_or(0) + 1;
    let (height, width) = (height.max(1) as usize, width.max(1) as usize);

    let mut grid = vec![vec![" ".to_string(); width]; height];
    for unit in living {
        let row = rounded(unit.coords.x);
        let col = rounded(unit.coords.y);
        if row < 0 || col < 0 || row as usize >= height || col as usize >= width {
            return Err(SimError::OutOfGrid { row, col, height, width });
        }
        grid[row as usize][col as usize] = unit.side.index().to_string();
    }

    Ok(grid
        .iter()
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::unit::UnitBuilder;
    use crate::core::types::Side;

    fn unit_at(side: Side, x: f32, y: f32) -> Unit {
        UnitBuilder::new(side).coords(x, y).build().unwrap()
    }

    #[test]
    fn test_renders_side_digits_at_rounded_positions() {
        let mut battle = Battle::new(0);
        battle.push(unit_at(Side::Red, 0.0, 0.0));
        battle.push(unit_at(Side::Blue, 1.2, 2.1));

        let text = render_grid(&battle).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "0    ");
        assert_eq!(lines[1], "    1");
    }

    #[test]
    fn test_dead_units_are_not_drawn() {
        let mut battle = Battle::new(0);
        battle.push(unit_at(Side::Red, 0.0, 0.0));
        battle.push(unit_at(Side::Blue, 3.0, 3.0));
        battle.units_mut()[1].health = 0.0;

        let text = render_grid(&battle).unwrap();
        assert_eq!(text, "0");
    }

    #[test]
    fn test_empty_field_renders_empty() {
        assert_eq!(render_grid(&Battle::new(0)).unwrap(), "");
    }

    #[test]
    fn test_out_of_grid_error_carries_diagnostics() {
        let mut battle = Battle::new(0);
        battle.push(unit_at(Side::Red, 2.0, 2.0));
        // A drifted unit with negative coordinates cannot be placed
        battle.units_mut()[0].coords.x = -1.4;

        match render_grid(&battle) {
            Err(SimError::OutOfGrid { row, col, height, width }) => {
                assert_eq!(row, -1);
                assert_eq!(col, 2);
                assert_eq!(height, 1);
                assert_eq!(width, 3);
            }
            other => panic!("expected OutOfGrid, got {:?}", other),
        }
    }
}
