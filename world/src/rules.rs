//! Win and loss detection evaluated inline with movement.

use maze_chase_core::{CellCoord, GameState};

/// State reached once the player's move has committed.
///
/// Reaching the goal wins even when an enemy shares the goal cell.
pub(crate) fn after_player_move<I>(player: CellCoord, goal: CellCoord, enemies: I) -> GameState
where
    I: IntoIterator<Item = CellCoord>,
{
    if player == goal {
        return GameState::Won;
    }

    if enemies.into_iter().any(|enemy| enemy == player) {
        GameState::Lost
    } else {
        GameState::Playing
    }
}

/// State reached once a single enemy has moved.
pub(crate) fn after_enemy_move(player: CellCoord, enemy: CellCoord) -> GameState {
    if enemy == player {
        GameState::Lost
    } else {
        GameState::Playing
    }
}
