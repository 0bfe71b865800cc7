//! Randomised start, goal and enemy spawn selection.
//!
//! Every selector performs rejection sampling over uniformly drawn cells, so
//! the grid must contain at least one acceptable cell. The goal selector
//! checks that upfront and reports `None` instead of spinning forever.

use maze_chase_core::{Cell, CellCoord, EnemyLabel};
use rand::Rng;

use crate::Grid;

/// Label and cell chosen for a single enemy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemySpawn {
    /// Presentation label taken from the roster.
    pub label: EnemyLabel,
    /// Dot cell the enemy starts on.
    pub cell: CellCoord,
}

/// Draws uniform cells until one holds a dot.
pub fn choose_start<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> CellCoord {
    loop {
        let cell = sample_cell(grid, rng);
        if grid.cell_at(cell) == Ok(Cell::Dot) {
            return cell;
        }
    }
}

/// Draws uniform cells until one is a dot at least `min_distance` away from `start`.
///
/// Returns `None` when no dot on the grid is far enough from `start`.
pub fn choose_goal<R: Rng + ?Sized>(
    grid: &Grid,
    start: CellCoord,
    min_distance: u32,
    rng: &mut R,
) -> Option<CellCoord> {
    if !grid
        .dot_cells()
        .any(|cell| cell.manhattan_distance(start) >= min_distance)
    {
        return None;
    }

    loop {
        let cell = sample_cell(grid, rng);
        if grid.cell_at(cell) == Ok(Cell::Dot) && cell.manhattan_distance(start) >= min_distance {
            return Some(cell);
        }
    }
}

/// Picks one dot cell per roster label, never on the player's cell.
///
/// Spawns are drawn independently, so two enemies may start on the same cell.
pub fn choose_enemy_spawns<R: Rng + ?Sized>(
    grid: &Grid,
    player: CellCoord,
    names: &[&str],
    rng: &mut R,
) -> Vec<EnemySpawn> {
    names
        .iter()
        .map(|name| {
            let cell = loop {
                let cell = sample_cell(grid, rng);
                if cell != player && grid.cell_at(cell) == Ok(Cell::Dot) {
                    break cell;
                }
            };
            EnemySpawn {
                label: EnemyLabel::new(*name),
                cell,
            }
        })
        .collect()
}

/// Reports whether any pair of dots lies at least `min_distance` apart.
#[must_use]
pub fn goal_feasible(grid: &Grid, min_distance: u32) -> bool {
    let dots: Vec<CellCoord> = grid.dot_cells().collect();
    dots.iter().any(|start| {
        dots.iter()
            .any(|goal| start.manhattan_distance(*goal) >= min_distance)
    })
}

fn sample_cell<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> CellCoord {
    CellCoord::new(rng.gen_range(0..grid.columns()), rng.gen_range(0..grid.rows()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{GOAL_MIN_DISTANCE, TEMPLATE_COLUMNS, TEMPLATE_ROWS};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn template_grid() -> Grid {
        Grid::from_template(TEMPLATE_COLUMNS, TEMPLATE_ROWS).expect("template")
    }

    #[test]
    fn start_always_lands_on_a_dot() {
        let grid = template_grid();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..64 {
            let start = choose_start(&grid, &mut rng);
            assert_eq!(grid.cell_at(start), Ok(Cell::Dot));
        }
    }

    #[test]
    fn goal_respects_minimum_distance() {
        let grid = template_grid();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let start = CellCoord::new(1, 1);
        for _ in 0..32 {
            let goal = choose_goal(&grid, start, GOAL_MIN_DISTANCE, &mut rng).expect("goal");
            assert_eq!(grid.cell_at(goal), Ok(Cell::Dot));
            assert!(goal.manhattan_distance(start) >= GOAL_MIN_DISTANCE);
        }
    }

    #[test]
    fn goal_is_none_from_the_centre_of_the_board() {
        let grid = template_grid();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(
            choose_goal(&grid, CellCoord::new(13, 5), GOAL_MIN_DISTANCE, &mut rng),
            None
        );
    }

    #[test]
    fn enemy_spawns_avoid_the_player() {
        let grid = Grid::from_codes(2, 1, &[0, 0]).expect("grid");
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let player = CellCoord::new(0, 0);
        let spawns = choose_enemy_spawns(&grid, player, &["red", "pink", "cyan"], &mut rng);

        assert_eq!(spawns.len(), 3);
        for spawn in &spawns {
            assert_eq!(spawn.cell, CellCoord::new(1, 0));
        }
        assert_eq!(spawns[1].label.as_str(), "pink");
    }

    #[test]
    fn same_seed_produces_same_placement() {
        let grid = template_grid();
        let mut first = ChaCha8Rng::seed_from_u64(99);
        let mut second = ChaCha8Rng::seed_from_u64(99);
        assert_eq!(choose_start(&grid, &mut first), choose_start(&grid, &mut second));
    }

    #[test]
    fn feasibility_detects_small_boards() {
        assert!(goal_feasible(&template_grid(), GOAL_MIN_DISTANCE));
        let tiny = Grid::from_codes(3, 1, &[0, 1, 0]).expect("grid");
        assert!(goal_feasible(&tiny, 2));
        assert!(!goal_feasible(&tiny, 3));
    }
}
