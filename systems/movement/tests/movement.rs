use std::collections::HashSet;

use maze_chase_core::{CellCoord, Command, Difficulty, Direction, Event, GameState, StepRejection};
use maze_chase_system_movement::{destination, Config, MazeView, Movement};
use maze_chase_world::{self as world, query, scaffolding, World, WorldConfig};

#[test]
fn pursuit_closes_in_from_both_sides() {
    let mut world = build_world(Difficulty::Hard);
    let player = CellCoord::new(10, 5);
    scaffolding::place_player(&mut world, player);
    scaffolding::place_goal(&mut world, CellCoord::new(26, 28));
    scaffolding::replace_enemies(
        &mut world,
        &[("red", CellCoord::new(7, 5)), ("pink", CellCoord::new(13, 5))],
    );

    let mut movement = Movement::new(Config::new(17));
    let events = vec![Event::PlayerMoved {
        from: player,
        to: player,
        facing: Direction::None,
    }];
    let commands = plan(&world, &mut movement, &events);
    assert_eq!(commands.len(), 2);
    apply_all(&mut world, commands);

    let enemies = query::enemy_view(&world).into_vec();
    assert_eq!(enemies[0].cell, CellCoord::new(8, 5));
    assert_eq!(enemies[1].cell, CellCoord::new(12, 5));
    for enemy in &enemies {
        assert_eq!(enemy.cell.manhattan_distance(player), 2);
    }
    assert_ne!(enemies[0].cell, enemies[1].cell);
    assert_eq!(query::state(&world), GameState::Playing);
}

#[test]
fn pursuit_never_stacks_enemies() {
    let mut world = build_world(Difficulty::Hard);
    scaffolding::place_player(&mut world, CellCoord::new(1, 28));
    scaffolding::place_goal(&mut world, CellCoord::new(26, 1));
    scaffolding::replace_enemies(
        &mut world,
        &[
            ("red", CellCoord::new(26, 5)),
            ("pink", CellCoord::new(25, 5)),
            ("cyan", CellCoord::new(24, 5)),
            ("orange", CellCoord::new(26, 8)),
        ],
    );

    let mut movement = Movement::new(Config::new(5));
    for _ in 0..40 {
        let events = move_player(&mut world, Direction::None);
        let commands = plan(&world, &mut movement, &events);
        let step_events = apply_all(&mut world, commands);

        assert!(
            !step_events.iter().any(|event| matches!(
                event,
                Event::EnemyStepRejected {
                    reason: StepRejection::Occupied,
                    ..
                }
            )),
            "planner proposed an occupied cell"
        );

        let cells: HashSet<_> = query::enemy_view(&world)
            .iter()
            .map(|enemy| enemy.cell)
            .collect();
        assert_eq!(cells.len(), 4, "two enemies share a cell");

        if query::state(&world) != GameState::Playing {
            break;
        }
    }
}

#[test]
fn wandering_ignores_other_enemies() {
    let mut world = build_world(Difficulty::Easy);
    scaffolding::place_player(&mut world, CellCoord::new(1, 28));
    scaffolding::place_goal(&mut world, CellCoord::new(26, 1));
    let shared = CellCoord::new(5, 5);
    scaffolding::replace_enemies(
        &mut world,
        &[
            ("red", shared),
            ("pink", shared),
            ("cyan", shared),
            ("orange", shared),
        ],
    );

    let mut movement = Movement::new(Config::new(23));
    let events = move_player(&mut world, Direction::None);
    let commands = plan(&world, &mut movement, &events);
    assert_eq!(commands.len(), 4, "every enemy steps regardless of company");

    let step_events = apply_all(&mut world, commands);
    assert!(!step_events
        .iter()
        .any(|event| matches!(event, Event::EnemyStepRejected { .. })));
}

#[test]
fn wandering_never_walks_into_walls() {
    let mut world = build_world(Difficulty::Easy);
    scaffolding::place_player(&mut world, CellCoord::new(1, 28));
    scaffolding::place_goal(&mut world, CellCoord::new(26, 1));
    scaffolding::replace_enemies(
        &mut world,
        &[("red", CellCoord::new(6, 14)), ("pink", CellCoord::new(21, 14))],
    );
    let (columns, rows) = query::dimensions(&world);

    let mut movement = Movement::new(Config::new(41));
    for _ in 0..60 {
        let events = move_player(&mut world, Direction::None);
        let enemies = query::enemy_view(&world);
        let commands = plan(&world, &mut movement, &events);

        for command in &commands {
            let Command::StepEnemy { enemy, direction } = command else {
                panic!("unexpected command {command:?}");
            };
            let snapshot = enemies
                .iter()
                .find(|snapshot| snapshot.id == *enemy)
                .expect("missing enemy snapshot");
            let target =
                destination(snapshot, *direction, columns, rows).expect("non-empty board");
            assert!(!query::is_wall(&world, target), "stepped into {target:?}");
        }

        let _ = apply_all(&mut world, commands);
        if query::state(&world) != GameState::Playing {
            break;
        }
    }
}

#[test]
fn no_commands_without_a_player_move() {
    let world = build_world(Difficulty::Hard);
    let mut movement = Movement::new(Config::new(1));
    let blocked = [Event::PlayerBlocked {
        direction: Direction::Up,
    }];
    assert!(plan(&world, &mut movement, &blocked).is_empty());
    assert!(plan(&world, &mut movement, &[]).is_empty());
}

#[test]
fn no_commands_after_the_round_ends() {
    let world = build_world(Difficulty::Hard);
    let mut movement = Movement::new(Config::new(1));
    let cell = query::player(&world).cell;
    let events = [
        Event::PlayerMoved {
            from: cell,
            to: cell,
            facing: Direction::None,
        },
        Event::GameStateChanged {
            state: GameState::Won,
        },
    ];
    assert!(plan(&world, &mut movement, &events).is_empty());
}

fn build_world(difficulty: Difficulty) -> World {
    World::new(WorldConfig::new(difficulty, 0xdead_beef)).expect("world")
}

fn move_player(world: &mut World, direction: Direction) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::MovePlayer { direction }, &mut events);
    events
}

fn plan(world: &World, movement: &mut Movement, events: &[Event]) -> Vec<Command> {
    let (columns, rows) = query::dimensions(world);
    let is_wall = |cell: CellCoord| query::is_wall(world, cell);
    let maze = MazeView::new(columns, rows, &is_wall);
    let mut commands = Vec::new();
    movement.handle(
        events,
        &query::enemy_view(world),
        query::player(world).cell,
        query::difficulty(world),
        &maze,
        &mut commands,
    );
    commands
}

fn apply_all(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}
