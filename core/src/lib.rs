#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches. Views registered
//! with the world receive owned [`WorldSnapshot`] copies through the
//! [`WorldObserver`] trait.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player step once in the provided direction.
    MovePlayer {
        /// Direction of travel; [`Direction::None`] keeps the player in place.
        direction: Direction,
    },
    /// Requests that an enemy advance a single step in the specified direction.
    StepEnemy {
        /// Identifier of the enemy attempting to move.
        enemy: EnemyId,
        /// Cardinal direction of travel for the attempted step.
        direction: Direction,
    },
    /// Selects the enemy behaviour used by the next rebuilt world.
    ConfigureDifficulty {
        /// Difficulty applied at the next restart.
        difficulty: Difficulty,
    },
    /// Discards the current world and builds a fresh one from the template.
    Restart {
        /// Outcome that ended the previous round, or `None` for a manual reset.
        outcome: Option<Outcome>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player committed a move.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after the move.
        to: CellCoord,
        /// Facing applied by the move.
        facing: Direction,
    },
    /// Reports that the requested player move ran into a wall.
    PlayerBlocked {
        /// Direction that was requested.
        direction: Direction,
    },
    /// Reports that the player cleared a dot from the cell it vacated.
    DotCollected {
        /// Cell that transitioned from dot to empty.
        cell: CellCoord,
    },
    /// Confirms that an enemy moved between two cells.
    EnemyMoved {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// Cell the enemy occupied before moving.
        from: CellCoord,
        /// Cell the enemy occupies after moving.
        to: CellCoord,
    },
    /// Reports that an enemy step was refused by the world.
    EnemyStepRejected {
        /// Identifier of the enemy whose step was refused.
        enemy: EnemyId,
        /// Direction that was requested.
        direction: Direction,
        /// Specific reason the step failed.
        reason: StepRejection,
    },
    /// Announces a transition of the game state machine.
    GameStateChanged {
        /// State that became active.
        state: GameState,
    },
    /// Asks the session owner to rebuild the world after a terminal outcome.
    RestartRequested {
        /// Terminal outcome that triggered the request.
        outcome: Option<Outcome>,
    },
    /// Confirms that the difficulty for the next rebuild was recorded.
    DifficultyConfigured {
        /// Difficulty that will be applied at the next restart.
        difficulty: Difficulty,
    },
    /// Confirms that the world was rebuilt from the template.
    WorldRebuilt {
        /// Outcome that ended the previous round, if any.
        outcome: Option<Outcome>,
    },
}

/// Reasons an enemy step may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepRejection {
    /// The destination cell is a wall.
    Wall,
    /// Another enemy occupies the destination while pursuit mode is active.
    Occupied,
    /// No enemy with the provided identifier exists.
    UnknownEnemy,
    /// The direction carries no movement.
    NoMovement,
}

/// Enemy behaviour selected once when a world is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Enemies wander in a random legal direction each turn.
    #[default]
    Easy,
    /// Enemies greedily pursue the player and never share a cell.
    Hard,
}

impl Difficulty {
    /// Maps the boolean hard-mode flag used by session owners onto a difficulty.
    #[must_use]
    pub const fn from_hard_flag(hard: bool) -> Self {
        if hard {
            Self::Hard
        } else {
            Self::Easy
        }
    }

    /// Reports whether enemies pursue the player.
    #[must_use]
    pub const fn is_hard(self) -> bool {
        matches!(self, Self::Hard)
    }
}

/// States of the per-world game state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// The round is in progress.
    #[default]
    Playing,
    /// The player reached the goal.
    Won,
    /// An enemy caught the player.
    Lost,
}

impl GameState {
    /// Reports whether the state ends the current world instance.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }

    /// Terminal outcome carried by the state, if any.
    #[must_use]
    pub const fn outcome(self) -> Option<Outcome> {
        match self {
            Self::Playing => None,
            Self::Won => Some(Outcome::Won),
            Self::Lost => Some(Outcome::Lost),
        }
    }
}

/// Terminal result of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The player reached the goal.
    Won,
    /// An enemy caught the player.
    Lost,
}

/// Classification of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Walkable space without a dot.
    Empty,
    /// Impassable maze wall.
    Wall,
    /// Walkable space holding a dot; the only legal spawn surface.
    Dot,
}

impl Cell {
    /// Decodes a template code: `1` is a wall, `0` a dot and `2` empty space.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Dot),
            1 => Some(Self::Wall),
            2 => Some(Self::Empty),
            _ => None,
        }
    }

    /// Reports whether the cell blocks movement.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// Movement directions understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// No movement; still a legal facing for the player.
    None,
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// The four directions that carry movement, in declaration order.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Column and row offsets applied by a single step.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::None => (0, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Reports whether the direction moves at all.
    #[must_use]
    pub const fn is_cardinal(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Unique identifier assigned to an enemy, following roster order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Presentation-only name attached to an enemy (for example `red`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyLabel(String);

impl EnemyLabel {
    /// Creates a new label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Borrows the label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell reached by one step in `direction` on a toroidal board.
    ///
    /// Leaving the board on one edge re-enters on the opposite edge. Returns
    /// `None` only when the board has no columns or rows.
    #[must_use]
    pub fn wrapped_step(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        if columns == 0 || rows == 0 {
            return None;
        }

        let (dx, dy) = direction.delta();
        let column = (i64::from(self.column) + dx).rem_euclid(i64::from(columns));
        let row = (i64::from(self.row) + dy).rem_euclid(i64::from(rows));
        Some(CellCoord::new(
            u32::try_from(column).ok()?,
            u32::try_from(row).ok()?,
        ))
    }
}

/// Errors reported by grid queries.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The requested coordinate lies outside the declared dimensions.
    #[error("cell ({column}, {row}) lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Requested column.
        column: u32,
        /// Requested row.
        row: u32,
        /// Declared grid width.
        columns: u32,
        /// Declared grid height.
        rows: u32,
    },
}

/// Computes the row-major index of a cell, failing when it lies outside the grid.
pub fn cell_index(cell: CellCoord, columns: u32, rows: u32) -> Result<usize, GridError> {
    let out_of_bounds = GridError::OutOfBounds {
        column: cell.column(),
        row: cell.row(),
        columns,
        rows,
    };
    if cell.column() >= columns || cell.row() >= rows {
        return Err(out_of_bounds);
    }

    let row = usize::try_from(cell.row()).map_err(|_| out_of_bounds)?;
    let column = usize::try_from(cell.column()).map_err(|_| out_of_bounds)?;
    let width = usize::try_from(columns).map_err(|_| out_of_bounds)?;
    Ok(row * width + column)
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Grid cell currently occupied by the player.
    pub cell: CellCoord,
    /// Direction the player last moved in.
    pub facing: Direction,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Presentation label of the enemy.
    pub label: EnemyLabel,
    /// Grid cell currently occupied by the enemy.
    pub cell: CellCoord,
}

/// Read-only snapshot describing all enemies within the maze.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Owned copy of everything a view needs to present a frame.
///
/// Snapshots are detached from the world, so a renderer may hold on to one
/// while the simulation keeps mutating its own state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Number of columns in the grid.
    pub columns: u32,
    /// Number of rows in the grid.
    pub rows: u32,
    /// Row-major cell contents.
    pub cells: Vec<Cell>,
    /// Cell the player started from.
    pub start: CellCoord,
    /// Cell the player must reach.
    pub goal: CellCoord,
    /// Player position and facing.
    pub player: PlayerSnapshot,
    /// Enemies in stable roster order.
    pub enemies: EnemyView,
    /// Enemy behaviour active for this world.
    pub difficulty: Difficulty,
    /// Current game state.
    pub state: GameState,
    /// Outcome that ended the previous round, if the world was rebuilt after one.
    pub previous_outcome: Option<Outcome>,
}

impl WorldSnapshot {
    /// Cell stored at the provided coordinate.
    pub fn cell_at(&self, cell: CellCoord) -> Result<Cell, GridError> {
        let index = cell_index(cell, self.columns, self.rows)?;
        self.cells.get(index).copied().ok_or(GridError::OutOfBounds {
            column: cell.column(),
            row: cell.row(),
            columns: self.columns,
            rows: self.rows,
        })
    }

    /// Enemies standing on the provided cell.
    pub fn enemies_at(&self, cell: CellCoord) -> impl Iterator<Item = &EnemySnapshot> {
        self.enemies.iter().filter(move |enemy| enemy.cell == cell)
    }
}

/// Capability implemented by anything that presents world state.
pub trait WorldObserver {
    /// Receives a fresh snapshot after the world changed.
    fn on_update(&mut self, snapshot: &WorldSnapshot);
}
