#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic enemy behaviour system that proposes one step per enemy per turn.
//!
//! Easy worlds let enemies wander in a random open direction. Hard worlds make
//! them pursue the player along the dominant axis while keeping one enemy per
//! cell.

use log::trace;
use maze_chase_core::{
    CellCoord, Command, Difficulty, Direction, EnemyId, EnemySnapshot, EnemyView, Event,
};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Stream used by the behaviour generator so it never shares draws with placement.
const BEHAVIOUR_STREAM: u64 = 1;

/// Configuration for the movement system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    seed: u64,
}

impl Config {
    /// Creates a configuration whose wandering draws derive from `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed feeding the wandering generator.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Geometry the planners consult while choosing steps.
pub struct MazeView<'a, F>
where
    F: Fn(CellCoord) -> bool,
{
    columns: u32,
    rows: u32,
    is_wall: &'a F,
}

impl<'a, F> MazeView<'a, F>
where
    F: Fn(CellCoord) -> bool,
{
    /// Wraps the board dimensions and a wall predicate.
    pub fn new(columns: u32, rows: u32, is_wall: &'a F) -> Self {
        Self {
            columns,
            rows,
            is_wall,
        }
    }

    fn open_step(&self, from: CellCoord, direction: Direction) -> Option<CellCoord> {
        let to = from.wrapped_step(direction, self.columns, self.rows)?;
        if (self.is_wall)(to) {
            None
        } else {
            Some(to)
        }
    }
}

/// Pure system that reacts to player moves and emits enemy step commands.
#[derive(Debug)]
pub struct Movement {
    rng: ChaCha8Rng,
}

impl Movement {
    /// Creates a movement system seeded from the configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed());
        rng.set_stream(BEHAVIOUR_STREAM);
        Self { rng }
    }

    /// Consumes world events and immutable views to emit enemy step commands.
    ///
    /// Nothing is emitted unless the events contain a completed player move
    /// that left the game running.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        enemy_view: &EnemyView,
        player: CellCoord,
        difficulty: Difficulty,
        maze: &MazeView<'_, F>,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        let moved = events
            .iter()
            .any(|event| matches!(event, Event::PlayerMoved { .. }));
        let finished = events.iter().any(|event| {
            matches!(event, Event::GameStateChanged { state } if state.is_terminal())
        });
        if !moved || finished {
            return;
        }

        match difficulty {
            Difficulty::Easy => self.wander(enemy_view, maze, out),
            Difficulty::Hard => pursue(enemy_view, player, maze, out),
        }
    }

    fn wander<F>(&mut self, enemy_view: &EnemyView, maze: &MazeView<'_, F>, out: &mut Vec<Command>)
    where
        F: Fn(CellCoord) -> bool,
    {
        for enemy in enemy_view.iter() {
            let mut directions = Direction::CARDINALS;
            directions.shuffle(&mut self.rng);

            let chosen = directions
                .into_iter()
                .find(|direction| maze.open_step(enemy.cell, *direction).is_some());
            match chosen {
                Some(direction) => out.push(Command::StepEnemy {
                    enemy: enemy.id,
                    direction,
                }),
                None => trace!("enemy {} boxed in at {:?}", enemy.id.get(), enemy.cell),
            }
        }
    }
}

fn pursue<F>(
    enemy_view: &EnemyView,
    player: CellCoord,
    maze: &MazeView<'_, F>,
    out: &mut Vec<Command>,
) where
    F: Fn(CellCoord) -> bool,
{
    let mut planned: Vec<(EnemyId, CellCoord)> = enemy_view
        .iter()
        .map(|enemy| (enemy.id, enemy.cell))
        .collect();

    for index in 0..planned.len() {
        let (enemy, from) = planned[index];
        let chosen = preference_order(from, player).into_iter().find_map(|direction| {
            let to = maze.open_step(from, direction)?;
            cell_available_for(to, enemy, &planned).then_some((direction, to))
        });

        match chosen {
            Some((direction, to)) => {
                planned[index].1 = to;
                out.push(Command::StepEnemy { enemy, direction });
            }
            None => trace!("enemy {} has no free step from {from:?}", enemy.get()),
        }
    }
}

/// Directions a pursuing enemy tries, most preferred first.
///
/// The axis with the larger gap to the player comes first, ties favouring the
/// vertical axis. The remaining cardinal directions follow in the fixed order
/// left, right, down, up.
fn preference_order(from: CellCoord, player: CellCoord) -> Vec<Direction> {
    let dx = i64::from(player.column()) - i64::from(from.column());
    let dy = i64::from(player.row()) - i64::from(from.row());

    let horizontal = if dx > 0 {
        Direction::Right
    } else {
        Direction::Left
    };
    let vertical = if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    };

    let preferred = if dx.abs() > dy.abs() {
        [horizontal, vertical]
    } else {
        [vertical, horizontal]
    };

    let mut order = Vec::with_capacity(Direction::CARDINALS.len());
    for direction in preferred.into_iter().chain([
        Direction::Left,
        Direction::Right,
        Direction::Down,
        Direction::Up,
    ]) {
        if !order.contains(&direction) {
            order.push(direction);
        }
    }
    order
}

fn cell_available_for(cell: CellCoord, enemy: EnemyId, planned: &[(EnemyId, CellCoord)]) -> bool {
    planned
        .iter()
        .all(|(other, occupied)| *other == enemy || *occupied != cell)
}

/// Cell an enemy would reach by following a step command.
#[must_use]
pub fn destination(
    snapshot: &EnemySnapshot,
    direction: Direction,
    columns: u32,
    rows: u32,
) -> Option<CellCoord> {
    snapshot.cell.wrapped_step(direction, columns, rows)
}
