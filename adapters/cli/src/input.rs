use maze_chase_core::{Difficulty, Direction};

/// Action requested while a round is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayAction {
    Move(Direction),
    Restart,
    Quit,
}

/// Choice offered once a round has ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MenuChoice {
    Replay(Difficulty),
    Quit,
}

/// Maps a line typed during play to an action.
pub(crate) fn parse_play(line: &str) -> Option<PlayAction> {
    let action = match line.trim().to_ascii_lowercase().as_str() {
        "w" | "k" | "up" => PlayAction::Move(Direction::Up),
        "s" | "j" | "down" => PlayAction::Move(Direction::Down),
        "a" | "h" | "left" => PlayAction::Move(Direction::Left),
        "d" | "l" | "right" => PlayAction::Move(Direction::Right),
        "." | "wait" => PlayAction::Move(Direction::None),
        "r" | "restart" => PlayAction::Restart,
        "q" | "quit" | "esc" => PlayAction::Quit,
        _ => return None,
    };
    Some(action)
}

/// Maps a line typed at the end-of-round menu to a choice.
pub(crate) fn parse_menu(line: &str) -> Option<MenuChoice> {
    let choice = match line.trim().to_ascii_lowercase().as_str() {
        "e" | "easy" => MenuChoice::Replay(Difficulty::Easy),
        "h" | "hard" => MenuChoice::Replay(Difficulty::Hard),
        "q" | "quit" | "esc" => MenuChoice::Quit,
        _ => return None,
    };
    Some(choice)
}
