#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn orchestration for Maze Chase.
//!
//! A [`Session`] owns the authoritative world and the enemy behaviour system.
//! Each call to [`Session::move_player`] plays one full turn: the player move,
//! the state check, the enemy pass, and a single view notification. Terminal
//! outcomes surface as a [`RestartRequest`] that the owner decides on.

use log::{debug, info};
use maze_chase_core::{
    CellCoord, Command, Difficulty, Direction, Event, GameState, Outcome, WorldObserver,
    WorldSnapshot,
};
use maze_chase_system_movement::{Config as MovementConfig, MazeView, Movement};
use maze_chase_world::{
    self as world, query,
    template::{TEMPLATE_COLUMNS, TEMPLATE_ROWS},
    World, WorldConfig, WorldError,
};

/// Parameters for a new session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Number of columns; must match the built-in template.
    pub columns: u32,
    /// Number of rows; must match the built-in template.
    pub rows: u32,
    /// Enemy behaviour for the first round.
    pub difficulty: Difficulty,
    /// Seed shared by placement and enemy behaviour.
    pub seed: u64,
}

impl SessionConfig {
    /// Creates a configuration for the built-in 28 by 30 maze.
    #[must_use]
    pub const fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            columns: TEMPLATE_COLUMNS,
            rows: TEMPLATE_ROWS,
            difficulty,
            seed,
        }
    }
}

/// Request to rebuild the world, raised when a round ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestartRequest {
    outcome: Option<Outcome>,
}

impl RestartRequest {
    /// Creates a request for a round that ended with `outcome`.
    #[must_use]
    pub const fn new(outcome: Option<Outcome>) -> Self {
        Self { outcome }
    }

    /// Outcome that ended the round.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}

/// Result of a single [`Session::move_player`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    /// The move hit a wall; nothing changed and no view was notified.
    Blocked,
    /// The round is already over; the move was ignored.
    Ignored,
    /// The turn ran to completion and left the game in this state.
    Played(GameState),
}

/// Owns one world and drives it turn by turn.
#[derive(Debug)]
pub struct Session {
    world: World,
    movement: Movement,
    pending_restart: Option<RestartRequest>,
}

impl Session {
    /// Builds a world from the configuration and prepares the behaviour system.
    pub fn new(config: SessionConfig) -> Result<Self, WorldError> {
        let world = World::new(WorldConfig {
            columns: config.columns,
            rows: config.rows,
            difficulty: config.difficulty,
            seed: config.seed,
        })?;
        info!(
            "session started: {:?}, seed {:#x}",
            config.difficulty, config.seed
        );
        Ok(Self::with_world(world, config.seed))
    }

    /// Wraps an already constructed world.
    #[must_use]
    pub fn with_world(world: World, seed: u64) -> Self {
        Self {
            world,
            movement: Movement::new(MovementConfig::new(seed)),
            pending_restart: None,
        }
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access for callers that drive the world directly.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Current state of the game state machine.
    #[must_use]
    pub fn state(&self) -> GameState {
        query::state(&self.world)
    }

    /// Owned copy of the current world state.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        query::snapshot(&self.world)
    }

    /// Registers a view; it receives the current snapshot straight away.
    pub fn register_view(&mut self, view: Box<dyn WorldObserver>) {
        world::register_view(&mut self.world, view);
    }

    /// Plays one turn in the requested direction.
    pub fn move_player(&mut self, direction: Direction) -> Turn {
        if self.state().is_terminal() {
            return Turn::Ignored;
        }

        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::MovePlayer { direction },
            &mut events,
        );
        if !events
            .iter()
            .any(|event| matches!(event, Event::PlayerMoved { .. }))
        {
            return Turn::Blocked;
        }

        let mut commands = Vec::new();
        let (columns, rows) = query::dimensions(&self.world);
        {
            let grid = query::grid(&self.world);
            let is_wall = |cell: CellCoord| grid.is_wall(cell);
            let maze = MazeView::new(columns, rows, &is_wall);
            self.movement.handle(
                &events,
                &query::enemy_view(&self.world),
                query::player(&self.world).cell,
                query::difficulty(&self.world),
                &maze,
                &mut commands,
            );
        }

        let proposed = commands.len();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let state = self.state();
        debug!(
            "turn {direction:?}: player at {:?}, {proposed} enemy steps proposed, {state:?}",
            query::player(&self.world).cell
        );
        self.capture_restart_request(&events);
        world::notify_views(&mut self.world);
        Turn::Played(state)
    }

    /// Rebuilds the world, keeping registered views, and notifies them once.
    pub fn restart(&mut self, outcome: Option<Outcome>) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Restart { outcome }, &mut events);
        self.pending_restart = None;
        world::notify_views(&mut self.world);
    }

    /// Chooses the difficulty used by the next restart.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::ConfigureDifficulty { difficulty },
            &mut events,
        );
    }

    /// Hands over the pending restart request, if the round has ended.
    pub fn take_restart_request(&mut self) -> Option<RestartRequest> {
        self.pending_restart.take()
    }

    fn capture_restart_request(&mut self, events: &[Event]) {
        for event in events {
            if let Event::RestartRequested { outcome } = event {
                self.pending_restart = Some(RestartRequest::new(*outcome));
            }
        }
    }
}
