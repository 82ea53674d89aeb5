#![no_main]

use arbitrary::Arbitrary;
use colhex::game::{Color, Match, MatchConfig, Participant, Phase, Point, check_invariants};
use colhex::physics::frame_contacts;
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A front-end signal delivered to the match.
#[derive(Arbitrary, Debug)]
enum Signal {
    Ready,
    Tick,
    Pause,
    Resume,
    Restart,
    GestureEnd,
    Frame,
    Touch { player: u8, cell: u32 },
    Contact { player: u8, cell: u32, dx: i8, dy: i8 },
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    seed: u64,
    /// Bit per color: set means computer.
    computers: u8,
    /// Number of players, folded into 2..=6.
    players: u8,
    signals: Vec<Signal>,
}

fuzz_target!(|input: FuzzInput| {
    let players = usize::from(input.players % 5) + 2;
    let participants = Color::ALL[..players]
        .iter()
        .enumerate()
        .map(|(i, &color)| Participant {
            color,
            is_computer: input.computers & (1 << i) != 0,
        })
        .collect();
    let config = MatchConfig {
        columns: 8,
        rows: 6,
        starting_cells: 3,
        ..MatchConfig::with_participants(participants)
    };
    let Ok(mut game) = Match::new(config, ChaCha8Rng::seed_from_u64(input.seed)) else {
        return;
    };

    for signal in input.signals.iter().take(2048) {
        let previous_phase = game.phase();
        match *signal {
            Signal::Ready => {
                game.on_ready();
            }
            Signal::Tick => game.on_clock_tick(),
            Signal::Pause => {
                game.on_pause();
            }
            Signal::Resume => {
                game.on_resume();
            }
            Signal::Restart => {
                if game.restart().is_err() {
                    return;
                }
            }
            Signal::GestureEnd => game.on_gesture_end(),
            Signal::Frame => {
                for contact in frame_contacts(&game) {
                    game.on_contact(contact.color, contact.pulse_center, contact.cell);
                }
                game.on_frame(1.0 / 60.0);
            }
            Signal::Touch { player, cell } => {
                let color = Color::ALL[usize::from(player) % players];
                game.on_touch(color, cell);
            }
            Signal::Contact { player, cell, dx, dy } => {
                let color = Color::ALL[usize::from(player) % players];
                let center = game
                    .grid()
                    .cell(cell)
                    .map_or(Point::new(0.0, 0.0), |c| c.center);
                let pulse = Point::new(center.x + f64::from(dx), center.y + f64::from(dy));
                game.on_contact(color, pulse, cell);
            }
        }

        let violations = check_invariants(game.grid(), game.registry());
        assert!(violations.is_empty(), "violations: {violations:?}");

        // Finished only moves back to setup through restart
        if previous_phase == Phase::Finished && !matches!(signal, Signal::Restart) {
            assert_eq!(game.phase(), Phase::Finished);
        }
        if game.phase() != Phase::Active {
            assert_eq!(game.pulses().count(), 0);
        }
    }
});
