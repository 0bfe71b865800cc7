#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.

mod grid;
pub mod placement;
mod rules;
pub mod template;
mod views;

use log::{debug, info, trace};
use maze_chase_core::{
    CellCoord, Command, Difficulty, Direction, EnemyId, EnemyLabel, Event, GameState, Outcome,
    StepRejection, WorldObserver,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use grid::Grid;

use views::ViewRegistry;

/// Errors raised while building a world.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// The requested dimensions differ from the built-in template.
    #[error("maze template is {expected_columns}x{expected_rows}, requested {columns}x{rows}")]
    DimensionMismatch {
        /// Columns declared by the template.
        expected_columns: u32,
        /// Rows declared by the template.
        expected_rows: u32,
        /// Columns requested by the caller.
        columns: u32,
        /// Rows requested by the caller.
        rows: u32,
    },
    /// The number of template codes does not match the dimensions.
    #[error("maze template holds {actual} cells, expected {expected}")]
    TemplateLength {
        /// Cells implied by the dimensions.
        expected: usize,
        /// Cells actually supplied.
        actual: usize,
    },
    /// A template code is not one of `0`, `1` or `2`.
    #[error("unknown cell code {code} at ({column}, {row})")]
    UnknownCellCode {
        /// Offending code.
        code: u8,
        /// Column holding the code.
        column: u32,
        /// Row holding the code.
        row: u32,
    },
    /// The template contains no dot cell to place anything on.
    #[error("maze template contains no dot cells")]
    NoDotCells,
    /// No two dots are far enough apart to host a start and a goal.
    #[error("no pair of dot cells is at least {min_distance} steps apart")]
    NoGoalCandidates {
        /// Required Manhattan distance between start and goal.
        min_distance: u32,
    },
}

/// Parameters used to build a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Number of columns; must match the template.
    pub columns: u32,
    /// Number of rows; must match the template.
    pub rows: u32,
    /// Enemy behaviour for the first round.
    pub difficulty: Difficulty,
    /// Seed for start, goal and spawn placement.
    pub seed: u64,
}

impl WorldConfig {
    /// Creates a configuration for the built-in template.
    #[must_use]
    pub const fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            columns: template::TEMPLATE_COLUMNS,
            rows: template::TEMPLATE_ROWS,
            difficulty,
            seed,
        }
    }
}

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    pristine: Grid,
    grid: Grid,
    start: CellCoord,
    goal: CellCoord,
    player: Player,
    enemies: Vec<Enemy>,
    difficulty: Difficulty,
    next_difficulty: Difficulty,
    state: GameState,
    previous_outcome: Option<Outcome>,
    views: ViewRegistry,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new world from the built-in template.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        let grid = Grid::from_template(config.columns, config.rows)?;
        Self::from_grid(grid, config.difficulty, config.seed)
    }

    /// Creates a new world on an explicit grid.
    pub fn from_grid(grid: Grid, difficulty: Difficulty, seed: u64) -> Result<Self, WorldError> {
        if !placement::goal_feasible(&grid, template::GOAL_MIN_DISTANCE) {
            return Err(WorldError::NoGoalCandidates {
                min_distance: template::GOAL_MIN_DISTANCE,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let round = Round::build(&grid, &mut rng);
        Ok(Self {
            grid: grid.clone(),
            pristine: grid,
            start: round.start,
            goal: round.goal,
            player: Player::at(round.start),
            enemies: round.enemies,
            difficulty,
            next_difficulty: difficulty,
            state: GameState::Playing,
            previous_outcome: None,
            views: ViewRegistry::default(),
            rng,
        })
    }

    fn rebuild(&mut self, outcome: Option<Outcome>) {
        let round = Round::build(&self.pristine, &mut self.rng);
        self.grid = self.pristine.clone();
        self.start = round.start;
        self.goal = round.goal;
        self.player = Player::at(round.start);
        self.enemies = round.enemies;
        self.difficulty = self.next_difficulty;
        self.state = GameState::Playing;
        self.previous_outcome = outcome;
        info!(
            "world rebuilt after {:?}: start {:?}, goal {:?}, {:?}",
            outcome, self.start, self.goal, self.difficulty
        );
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|candidate| candidate.id == enemy)
    }

    fn move_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.state.is_terminal() {
            return;
        }

        let from = self.player.cell;
        let Some(to) = from.wrapped_step(direction, self.grid.columns(), self.grid.rows()) else {
            return;
        };

        if self.grid.is_wall(to) {
            trace!("player blocked moving {direction:?} from {from:?}");
            out_events.push(Event::PlayerBlocked { direction });
            return;
        }

        self.player.facing = direction;
        if self.grid.clear(from) == Some(maze_chase_core::Cell::Dot) {
            out_events.push(Event::DotCollected { cell: from });
        }
        self.player.cell = to;
        out_events.push(Event::PlayerMoved {
            from,
            to,
            facing: direction,
        });

        let state = rules::after_player_move(
            self.player.cell,
            self.goal,
            self.enemies.iter().map(|enemy| enemy.cell),
        );
        self.transition(state, out_events);
    }

    fn step_enemy(&mut self, enemy: EnemyId, direction: Direction, out_events: &mut Vec<Event>) {
        if self.state.is_terminal() {
            return;
        }

        let rejection = |reason| Event::EnemyStepRejected {
            enemy,
            direction,
            reason,
        };

        if !direction.is_cardinal() {
            out_events.push(rejection(StepRejection::NoMovement));
            return;
        }

        let Some(index) = self.enemy_index(enemy) else {
            out_events.push(rejection(StepRejection::UnknownEnemy));
            return;
        };

        let from = self.enemies[index].cell;
        let Some(to) = from.wrapped_step(direction, self.grid.columns(), self.grid.rows()) else {
            return;
        };

        if self.grid.is_wall(to) {
            debug!("enemy {} refused: wall at {to:?}", enemy.get());
            out_events.push(rejection(StepRejection::Wall));
            return;
        }

        if self.difficulty.is_hard()
            && self
                .enemies
                .iter()
                .any(|other| other.id != enemy && other.cell == to)
        {
            debug!("enemy {} refused: {to:?} already occupied", enemy.get());
            out_events.push(rejection(StepRejection::Occupied));
            return;
        }

        self.enemies[index].cell = to;
        out_events.push(Event::EnemyMoved { enemy, from, to });

        let state = rules::after_enemy_move(self.player.cell, to);
        self.transition(state, out_events);
    }

    fn transition(&mut self, state: GameState, out_events: &mut Vec<Event>) {
        if state == self.state {
            return;
        }

        self.state = state;
        out_events.push(Event::GameStateChanged { state });
        if let Some(outcome) = state.outcome() {
            info!("round finished: {outcome:?}");
            out_events.push(Event::RestartRequested {
                outcome: Some(outcome),
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MovePlayer { direction } => world.move_player(direction, out_events),
        Command::StepEnemy { enemy, direction } => world.step_enemy(enemy, direction, out_events),
        Command::ConfigureDifficulty { difficulty } => {
            world.next_difficulty = difficulty;
            out_events.push(Event::DifficultyConfigured { difficulty });
        }
        Command::Restart { outcome } => {
            world.rebuild(outcome);
            out_events.push(Event::WorldRebuilt { outcome });
        }
    }
}

/// Registers a view and immediately hands it the current snapshot.
pub fn register_view(world: &mut World, view: Box<dyn WorldObserver>) {
    let snapshot = query::snapshot(world);
    world.views.register(view, &snapshot);
}

/// Pushes a fresh snapshot to every registered view, in registration order.
pub fn notify_views(world: &mut World) {
    if world.views.is_empty() {
        return;
    }

    let snapshot = query::snapshot(world);
    world.views.notify_all(&snapshot);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Grid, World};
    use maze_chase_core::{
        Cell, CellCoord, Difficulty, EnemySnapshot, EnemyView, GameState, GridError, Outcome,
        PlayerSnapshot, WorldSnapshot,
    };

    /// Provides read-only access to the world's grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.grid.columns(), world.grid.rows())
    }

    /// Cell stored at the provided coordinate.
    pub fn cell_at(world: &World, cell: CellCoord) -> Result<Cell, GridError> {
        world.grid.cell_at(cell)
    }

    /// Reports whether the cell blocks movement.
    #[must_use]
    pub fn is_wall(world: &World, cell: CellCoord) -> bool {
        world.grid.is_wall(cell)
    }

    /// Cell the player started from.
    #[must_use]
    pub fn start(world: &World) -> CellCoord {
        world.start
    }

    /// Cell the player must reach.
    #[must_use]
    pub fn goal(world: &World) -> CellCoord {
        world.goal
    }

    /// Player position and facing.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player.cell,
            facing: world.player.facing,
        }
    }

    /// Captures a read-only view of the enemies inhabiting the maze.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    label: enemy.label.clone(),
                    cell: enemy.cell,
                })
                .collect(),
        )
    }

    /// Enemy behaviour active for this world.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// Current state of the game state machine.
    #[must_use]
    pub fn state(world: &World) -> GameState {
        world.state
    }

    /// Outcome that ended the previous round, if any.
    #[must_use]
    pub fn previous_outcome(world: &World) -> Option<Outcome> {
        world.previous_outcome
    }

    /// Number of views registered with the world.
    #[must_use]
    pub fn view_count(world: &World) -> usize {
        world.views.len()
    }

    /// Captures an owned copy of everything a view needs to present a frame.
    #[must_use]
    pub fn snapshot(world: &World) -> WorldSnapshot {
        WorldSnapshot {
            columns: world.grid.columns(),
            rows: world.grid.rows(),
            cells: world.grid.cells().to_vec(),
            start: world.start,
            goal: world.goal,
            player: player(world),
            enemies: enemy_view(world),
            difficulty: world.difficulty,
            state: world.state,
            previous_outcome: world.previous_outcome,
        }
    }
}

/// Direct construction helpers for tests that need exact positions.
#[cfg(any(test, feature = "scaffolding"))]
pub mod scaffolding {
    use super::{Enemy, World};
    use maze_chase_core::{CellCoord, EnemyId, EnemyLabel};

    /// Moves the player without running any rules.
    pub fn place_player(world: &mut World, cell: CellCoord) {
        world.player.cell = cell;
    }

    /// Moves the goal without running any rules.
    pub fn place_goal(world: &mut World, cell: CellCoord) {
        world.goal = cell;
    }

    /// Replaces the roster; identifiers follow the order of `enemies`.
    pub fn replace_enemies(world: &mut World, enemies: &[(&str, CellCoord)]) {
        world.enemies = enemies
            .iter()
            .enumerate()
            .map(|(index, (label, cell))| Enemy {
                id: EnemyId::new(index as u32),
                label: EnemyLabel::new(*label),
                cell: *cell,
            })
            .collect();
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    cell: CellCoord,
    facing: Direction,
}

impl Player {
    fn at(cell: CellCoord) -> Self {
        Self {
            cell,
            facing: Direction::Right,
        }
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    label: EnemyLabel,
    cell: CellCoord,
}

struct Round {
    start: CellCoord,
    goal: CellCoord,
    enemies: Vec<Enemy>,
}

impl Round {
    fn build(grid: &Grid, rng: &mut ChaCha8Rng) -> Self {
        let (start, goal) = loop {
            let start = placement::choose_start(grid, rng);
            match placement::choose_goal(grid, start, template::GOAL_MIN_DISTANCE, rng) {
                Some(goal) => break (start, goal),
                None => debug!("no goal far enough from {start:?}, redrawing start"),
            }
        };

        let enemies = placement::choose_enemy_spawns(grid, start, &template::ENEMY_ROSTER, rng)
            .into_iter()
            .enumerate()
            .map(|(index, spawn)| Enemy {
                id: EnemyId::new(index as u32),
                label: spawn.label,
                cell: spawn.cell,
            })
            .collect();

        Self {
            start,
            goal,
            enemies,
        }
    }
}
