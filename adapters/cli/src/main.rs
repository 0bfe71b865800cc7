#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Maze Chase in the terminal.

mod config;
mod input;

use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, LevelFilter};
use maze_chase_console::{ConsoleView, JsonLinesView};
use maze_chase_core::{Outcome, WELCOME_BANNER};
use maze_chase_session::{RestartRequest, Session, SessionConfig, Turn};

use config::{FileConfig, Overrides};
use input::{MenuChoice, PlayAction};

#[derive(Debug, Parser)]
#[command(name = "maze-chase")]
#[command(about = "Guide the player to the goal before the enemies catch up")]
#[command(version)]
struct Cli {
    /// Enemies pursue the player instead of wandering
    #[arg(long)]
    hard: bool,

    /// Seed for placement and enemy behaviour (random when absent)
    #[arg(long)]
    seed: Option<u64>,

    /// Optional TOML file with `hard`, `seed`, `log_level` and `json` keys
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); overrides the file and RUST_LOG
    #[arg(long)]
    log_level: Option<String>,

    /// Stream snapshots as JSON lines instead of drawing the board
    #[arg(long)]
    json: bool,
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = config::resolve(
        Overrides {
            hard: cli.hard,
            seed: cli.seed,
            log_level: cli.log_level,
            json: cli.json,
        },
        file,
        rand::random,
    )?;
    init_logging(settings.log_level);
    info!(
        "starting maze-chase: {:?}, seed {}",
        settings.difficulty, settings.seed
    );

    let mut session = Session::new(SessionConfig::new(settings.difficulty, settings.seed))
        .context("failed to build the maze")?;

    if settings.json {
        eprintln!("{WELCOME_BANNER}");
        session.register_view(Box::new(JsonLinesView::new(io::stdout())));
    } else {
        println!("{WELCOME_BANNER}");
        eprintln!("Move with w/a/s/d or h/j/k/l, `.` to wait, `r` to restart, `q` to quit.");
        session.register_view(Box::new(ConsoleView::new(io::stdout())));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    run(&mut session, &mut lines)
}

fn init_logging(level: Option<LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        let _ = builder.filter_level(level);
    }
    let _ = builder.target(env_logger::Target::Stderr);
    builder.init();
}

fn run<I>(session: &mut Session, lines: &mut I) -> Result<()>
where
    I: Iterator<Item = io::Result<String>>,
{
    loop {
        if let Some(request) = session.take_restart_request() {
            match read_menu_choice(request, lines)? {
                MenuChoice::Replay(difficulty) => {
                    session.set_difficulty(difficulty);
                    session.restart(request.outcome());
                    continue;
                }
                MenuChoice::Quit => return Ok(()),
            }
        }

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("failed to read input")?;

        match input::parse_play(&line) {
            Some(PlayAction::Move(direction)) => match session.move_player(direction) {
                Turn::Blocked => debug!("bumped into a wall moving {direction:?}"),
                Turn::Ignored | Turn::Played(_) => {}
            },
            Some(PlayAction::Restart) => session.restart(None),
            Some(PlayAction::Quit) => return Ok(()),
            None => eprintln!("Unrecognised input `{}`.", line.trim()),
        }
    }
}

fn read_menu_choice<I>(request: RestartRequest, lines: &mut I) -> Result<MenuChoice>
where
    I: Iterator<Item = io::Result<String>>,
{
    let status = match request.outcome() {
        Some(Outcome::Won) => "You won!",
        Some(Outcome::Lost) => "You were caught!",
        None => "Round over.",
    };
    eprintln!("{status} Play again: `e` easy, `h` hard, `q` quit.");

    for line in lines {
        let line = line.context("failed to read input")?;
        match input::parse_menu(&line) {
            Some(choice) => return Ok(choice),
            None => eprintln!("Choose `e`, `h` or `q`."),
        }
    }
    Ok(MenuChoice::Quit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{CellCoord, Difficulty, GameState};
    use maze_chase_world::scaffolding;

    fn script(lines: &[&str]) -> impl Iterator<Item = io::Result<String>> {
        lines
            .iter()
            .map(|line| Ok((*line).to_owned()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut session =
            Session::new(SessionConfig::new(Difficulty::Easy, 1)).expect("session");
        let mut lines = script(&["q", "d"]);
        run(&mut session, &mut lines).expect("run");
        assert_eq!(lines.count(), 1, "input after quit stays unread");
    }

    #[test]
    fn manual_restart_rebuilds_the_board() {
        let mut session =
            Session::new(SessionConfig::new(Difficulty::Easy, 2)).expect("session");
        let before = session.snapshot();
        let mut lines = script(&["r"]);
        run(&mut session, &mut lines).expect("run");

        let after = session.snapshot();
        assert_eq!(after.state, GameState::Playing);
        assert_eq!(after.previous_outcome, None);
        assert_eq!(after.player.cell, after.start);
        assert_eq!(before.cells, after.cells);
    }

    #[test]
    fn menu_skips_unknown_input_and_reads_h_as_hard() {
        let mut lines = script(&["hmm", "h"]);
        let choice =
            read_menu_choice(RestartRequest::new(Some(Outcome::Lost)), &mut lines).expect("menu");
        assert_eq!(choice, MenuChoice::Replay(Difficulty::Hard));
    }

    #[test]
    fn menu_defaults_to_quit_at_end_of_input() {
        let mut lines = script(&[]);
        let choice = read_menu_choice(RestartRequest::new(None), &mut lines).expect("menu");
        assert_eq!(choice, MenuChoice::Quit);
    }

    #[test]
    fn finished_round_restarts_with_the_chosen_difficulty() {
        let mut session =
            Session::new(SessionConfig::new(Difficulty::Easy, 3)).expect("session");
        scaffolding::place_player(session.world_mut(), CellCoord::new(1, 1));
        scaffolding::place_goal(session.world_mut(), CellCoord::new(2, 1));
        scaffolding::replace_enemies(session.world_mut(), &[("red", CellCoord::new(26, 28))]);

        let mut lines = script(&["d", "x", "h", "q"]);
        run(&mut session, &mut lines).expect("run");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, GameState::Playing);
        assert_eq!(snapshot.difficulty, Difficulty::Hard);
        assert_eq!(snapshot.previous_outcome, Some(Outcome::Won));
        assert_eq!(lines.count(), 0);
    }
}
