#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text views that present Maze Chase snapshots on any writer.

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use log::warn;
use maze_chase_core::{
    Cell, CellCoord, Difficulty, Direction, EnemySnapshot, GameState, Outcome, WorldObserver,
    WorldSnapshot,
};

/// Glyph drawn for a wall cell.
pub const WALL_GLYPH: char = '#';
/// Glyph drawn for a dot cell.
pub const DOT_GLYPH: char = '.';
/// Glyph drawn for an empty cell.
pub const EMPTY_GLYPH: char = ' ';
/// Glyph drawn for the goal while nothing stands on it.
pub const GOAL_GLYPH: char = 'G';

/// Renders the snapshot as a status line followed by one text row per grid row.
#[must_use]
pub fn render_frame(snapshot: &WorldSnapshot) -> String {
    let width = usize::try_from(snapshot.columns).unwrap_or(0);
    let height = usize::try_from(snapshot.rows).unwrap_or(0);
    let mut frame = String::with_capacity((width + 1) * (height + 1) + 32);

    frame.push_str(&status_line(snapshot));
    frame.push('\n');
    for row in 0..snapshot.rows {
        for column in 0..snapshot.columns {
            frame.push(glyph_at(snapshot, CellCoord::new(column, row)));
        }
        frame.push('\n');
    }
    frame
}

/// Short human readable summary of difficulty and state.
#[must_use]
pub fn status_line(snapshot: &WorldSnapshot) -> String {
    let difficulty = match snapshot.difficulty {
        Difficulty::Easy => "easy",
        Difficulty::Hard => "hard",
    };
    let state = match snapshot.state {
        GameState::Playing => "playing",
        GameState::Won => "you won!",
        GameState::Lost => "you were caught!",
    };
    match snapshot.previous_outcome {
        Some(Outcome::Won) => format!("[{difficulty}] {state} (last round: won)"),
        Some(Outcome::Lost) => format!("[{difficulty}] {state} (last round: caught)"),
        None => format!("[{difficulty}] {state}"),
    }
}

fn glyph_at(snapshot: &WorldSnapshot, cell: CellCoord) -> char {
    if snapshot.player.cell == cell {
        return player_glyph(snapshot.player.facing);
    }
    if let Some(enemy) = snapshot.enemies_at(cell).next() {
        return enemy_glyph(enemy);
    }
    if snapshot.goal == cell {
        return GOAL_GLYPH;
    }
    match snapshot.cell_at(cell) {
        Ok(Cell::Wall) => WALL_GLYPH,
        Ok(Cell::Dot) => DOT_GLYPH,
        Ok(Cell::Empty) | Err(_) => EMPTY_GLYPH,
    }
}

fn player_glyph(facing: Direction) -> char {
    match facing {
        Direction::Right => '>',
        Direction::Left => '<',
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::None => 'O',
    }
}

fn enemy_glyph(enemy: &EnemySnapshot) -> char {
    enemy
        .label
        .as_str()
        .chars()
        .next()
        .map_or('E', |first| first.to_ascii_uppercase())
}

/// Observer that writes an ASCII frame for every snapshot.
#[derive(Debug)]
pub struct ConsoleView<W: Write> {
    out: W,
}

impl<W: Write> ConsoleView<W> {
    /// Creates a view writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the view, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, snapshot: &WorldSnapshot) -> AnyResult<()> {
        self.out
            .write_all(render_frame(snapshot).as_bytes())
            .context("failed to write frame")?;
        self.out.flush().context("failed to flush frame")
    }
}

impl<W: Write> WorldObserver for ConsoleView<W> {
    fn on_update(&mut self, snapshot: &WorldSnapshot) {
        if let Err(error) = self.write_frame(snapshot) {
            warn!("console view dropped a frame: {error:#}");
        }
    }
}

/// Observer that writes every snapshot as one JSON document per line.
#[derive(Debug)]
pub struct JsonLinesView<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesView<W> {
    /// Creates a view writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the view, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, snapshot: &WorldSnapshot) -> AnyResult<()> {
        serde_json::to_writer(&mut self.out, snapshot).context("failed to encode snapshot")?;
        self.out
            .write_all(b"\n")
            .context("failed to terminate snapshot line")?;
        self.out.flush().context("failed to flush snapshot")
    }
}

impl<W: Write> WorldObserver for JsonLinesView<W> {
    fn on_update(&mut self, snapshot: &WorldSnapshot) {
        if let Err(error) = self.write_line(snapshot) {
            warn!("json view dropped a snapshot: {error:#}");
        }
    }
}
