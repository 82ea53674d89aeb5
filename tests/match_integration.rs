//! End-to-end match scenarios.
//!
//! These tests drive a match the way a front end would: ready signal,
//! clock ticks, touches and physics contacts, then check the board,
//! the scores and the emitted events.
//!
//! Run with: cargo test --release match_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use colhex::game::{
    ACTIVATION_TICK, CellId, Color, ContactOutcome, Match, MatchConfig, MatchEvent, Participant,
    Phase, Point, Rejection, TERMINAL_TICK, check_invariants,
};
use colhex::physics::frame_contacts;
use colhex::sim::{SimConfig, run_match};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn config(participants: Vec<Participant>) -> MatchConfig {
    MatchConfig {
        columns: 10,
        rows: 8,
        starting_cells: 4,
        ..MatchConfig::with_participants(participants)
    }
}

fn humans(colors: &[Color]) -> Match<ChaCha8Rng> {
    let participants = colors.iter().copied().map(Participant::human).collect();
    Match::new(config(participants), ChaCha8Rng::seed_from_u64(2024)).unwrap()
}

fn start_play(game: &mut Match<ChaCha8Rng>) {
    assert!(game.on_ready());
    while game.phase() != Phase::Active {
        game.on_clock_tick();
    }
    assert_eq!(game.countdown(), ACTIVATION_TICK);
}

fn cells_of(game: &Match<ChaCha8Rng>, color: Color) -> Vec<CellId> {
    game.registry()
        .get(color)
        .unwrap()
        .owned()
        .iter()
        .copied()
        .collect()
}

/// A neutral cell that sits on the 60 degree ray of a cell `color` owns.
fn neutral_neighbour_on_diagonal(game: &Match<ChaCha8Rng>, color: Color) -> Option<(Point, CellId)> {
    let grid = game.grid();
    for id in cells_of(game, color) {
        let origin = grid.cell(id).unwrap();
        for n in grid.neighbors(id) {
            let cell = grid.cell(n).unwrap();
            if cell.is_neutral() && (cell.center.y - origin.center.y).abs() > 1.0 {
                return Some((origin.center, n));
            }
        }
    }
    None
}

#[test]
fn test_simple_capture() {
    let mut game = humans(&[Color::Red, Color::Blue]);
    start_play(&mut game);
    let blue_before = game.score(Color::Blue).unwrap();

    let (center, target) = neutral_neighbour_on_diagonal(&game, Color::Red).unwrap();
    let outcome = game.on_contact(Color::Red, center, target).unwrap();

    assert_eq!(outcome, ContactOutcome::Captured);
    assert_eq!(game.owner(target), Some(Color::Red));
    assert_eq!(game.score(Color::Red), Some(5));
    assert_eq!(game.score(Color::Blue), Some(blue_before));
    assert!(game.drain_events().contains(&MatchEvent::CellCaptured {
        cell: target,
        from: None,
        to: Color::Red,
    }));
}

#[test]
fn test_steal_reduces_giver() {
    let mut game = humans(&[Color::Red, Color::Blue, Color::Green]);
    start_play(&mut game);

    let target = cells_of(&game, Color::Blue)[0];
    let center = game.grid().cell(target).unwrap().center;
    let pulse = Point::new(center.x + 60.0, center.y);

    let outcome = game.on_contact(Color::Red, pulse, target).unwrap();
    assert_eq!(
        outcome,
        ContactOutcome::Stolen {
            from: Color::Blue,
            eliminated: false
        }
    );
    assert_eq!(game.score(Color::Red), Some(5));
    assert_eq!(game.score(Color::Blue), Some(3));
    assert_eq!(game.score(Color::Green), Some(4));
    assert_eq!(game.scoreboard().zero_score_count(), 0);
}

#[test]
fn test_tangential_contact_leaves_board_unchanged() {
    let mut game = humans(&[Color::Red, Color::Blue]);
    start_play(&mut game);

    let target = cells_of(&game, Color::Blue)[0];
    let center = game.grid().cell(target).unwrap().center;
    // Pulse at (0, 0) relative, cell at (10, 3): about 16.7 degrees.
    let pulse = Point::new(center.x - 10.0, center.y - 3.0);

    let outcome = game.on_contact(Color::Red, pulse, target).unwrap();
    assert_eq!(outcome, ContactOutcome::Rejected(Rejection::OffAxis));
    assert_eq!(game.owner(target), Some(Color::Blue));
    assert_eq!(game.score(Color::Red), Some(4));
    assert_eq!(game.score(Color::Blue), Some(4));
}

#[test]
fn test_own_cell_contact_is_idempotent() {
    let mut game = humans(&[Color::Red, Color::Blue]);
    start_play(&mut game);

    let own = cells_of(&game, Color::Red)[0];
    let center = game.grid().cell(own).unwrap().center;
    for _ in 0..3 {
        assert_eq!(
            game.on_contact(Color::Red, center, own),
            Some(ContactOutcome::OwnCell)
        );
    }
    assert_eq!(game.score(Color::Red), Some(4));
    assert_eq!(game.captures(), 0);
}

#[test]
fn test_three_players_two_eliminated_ends_immediately() {
    let mut game = humans(&[Color::Red, Color::Blue, Color::Green]);
    start_play(&mut game);
    game.on_clock_tick();
    let tick_before = game.countdown();

    for victim in [Color::Blue, Color::Green] {
        for cell in cells_of(&game, victim) {
            let center = game.grid().cell(cell).unwrap().center;
            let pulse = Point::new(center.x - 200.0, center.y);
            game.on_contact(Color::Red, pulse, cell).unwrap();
        }
    }

    assert_eq!(game.scoreboard().zero_score_count(), 2);
    assert_eq!(game.phase(), Phase::Finished);
    assert!(game.ended_early());
    assert_eq!(game.countdown(), tick_before);
    assert!(game.grid().iter().all(|c| !c.active));

    let ranking = game.ranking();
    assert_eq!(ranking[0].color, Color::Red);
    assert_eq!(ranking[0].score, 12);
    // Blue and Green tie at zero and keep registry order.
    assert_eq!(ranking[1].color, Color::Blue);
    assert_eq!(ranking[2].color, Color::Green);
}

/// Contact along the cell's own row, which is always on axis.
fn same_row_contact(game: &mut Match<ChaCha8Rng>, color: Color, cell: CellId) -> ContactOutcome {
    let center = game.grid().cell(cell).unwrap().center;
    let pulse = Point::new(center.x - 300.0, center.y);
    game.on_contact(color, pulse, cell).unwrap()
}

fn capture_neutral(game: &mut Match<ChaCha8Rng>, color: Color) {
    let cell = game.grid().iter().find(|c| c.is_neutral()).unwrap().id;
    assert_eq!(same_row_contact(game, color, cell), ContactOutcome::Captured);
}

#[test]
fn test_four_players_one_eliminated_keeps_playing() {
    let participants = [Color::Yellow, Color::Orange, Color::Red, Color::Blue]
        .into_iter()
        .map(Participant::human)
        .collect();
    let setup = MatchConfig {
        starting_cells: 2,
        ..config(participants)
    };
    let mut game = Match::new(setup, ChaCha8Rng::seed_from_u64(7)).unwrap();
    start_play(&mut game);

    capture_neutral(&mut game, Color::Yellow);
    capture_neutral(&mut game, Color::Red);
    capture_neutral(&mut game, Color::Blue);
    capture_neutral(&mut game, Color::Blue);

    let orange = cells_of(&game, Color::Orange);
    assert_eq!(
        same_row_contact(&mut game, Color::Yellow, orange[0]),
        ContactOutcome::Stolen {
            from: Color::Orange,
            eliminated: false
        }
    );
    assert_eq!(
        same_row_contact(&mut game, Color::Yellow, orange[1]),
        ContactOutcome::Stolen {
            from: Color::Orange,
            eliminated: true
        }
    );

    let scores: Vec<u32> = game.registry().iter().map(|p| p.score()).collect();
    assert_eq!(scores, vec![5, 0, 3, 4]);
    assert_eq!(game.scoreboard().zero_score_count(), 1);
    assert!(game.scoreboard().is_at_zero(Color::Orange));
    assert_eq!(game.phase(), Phase::Active);
    assert!(game.drain_events().contains(&MatchEvent::PlayerEliminated {
        color: Color::Orange
    }));
}

#[test]
fn test_contacts_after_end_are_ignored() {
    let mut game = humans(&[Color::Red, Color::Blue]);
    start_play(&mut game);
    while game.phase() != Phase::Finished {
        game.on_clock_tick();
    }
    assert_eq!(game.countdown(), TERMINAL_TICK);

    let target = cells_of(&game, Color::Blue)[0];
    let center = game.grid().cell(target).unwrap().center;
    assert_eq!(game.on_contact(Color::Red, center, target), None);
    assert_eq!(game.owner(target), Some(Color::Blue));
}

#[test]
fn test_pause_resume_across_play() {
    let mut game = humans(&[Color::Red, Color::Blue]);
    start_play(&mut game);
    while game.countdown() != 10 {
        game.on_clock_tick();
    }

    game.on_pause();
    for _ in 0..5 {
        game.on_clock_tick();
    }
    assert_eq!(game.phase(), Phase::Active);
    game.on_resume();
    game.on_clock_tick();
    assert_eq!(game.countdown(), 9);
}

#[test]
fn test_touch_then_physics_captures_neighbours() {
    let mut game = humans(&[Color::Red, Color::Blue]);
    start_play(&mut game);

    let origin = cells_of(&game, Color::Red)[0];
    assert!(game.on_touch(Color::Red, origin));
    game.on_gesture_end();

    for _ in 0..120 {
        for contact in frame_contacts(&game) {
            game.on_contact(contact.color, contact.pulse_center, contact.cell);
        }
        game.on_frame(1.0 / 60.0);
    }

    assert!(game.score(Color::Red).unwrap() > 4);
    for n in game.grid().neighbors(origin) {
        assert_eq!(game.owner(n), Some(Color::Red), "neighbour {n}");
    }
    assert!(check_invariants(game.grid(), game.registry()).is_empty());
}

#[test]
fn test_simulated_matches_keep_invariants() {
    for seed in 0..5 {
        let config = SimConfig::with_colors(&[Color::Yellow, Color::Red, Color::Blue, Color::Green]);
        let result = run_match(seed, &config).unwrap();
        assert_eq!(result.ranking.len(), 4);
        let scores: Vec<u32> = result.ranking.iter().map(|s| s.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }
}
