//! Property-based tests for match mechanics.
//!
//! These tests verify the board invariants hold under arbitrary contact
//! streams, and check the axis rule for every angle.
//! Run with: cargo test --release prop_match

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use colhex::game::{
    Color, ContactOutcome, HexGrid, Match, MatchConfig, Participant, Phase, PlayerRegistry, Point,
    check_invariants, is_valid_axis, resolve_contact,
};

fn color_strategy() -> impl Strategy<Value = Color> {
    prop::sample::select(Color::ALL.to_vec())
}

fn active_match(players: usize, seed: u64) -> Match<ChaCha8Rng> {
    let participants = Color::ALL[..players]
        .iter()
        .copied()
        .map(Participant::human)
        .collect();
    let config = MatchConfig {
        columns: 9,
        rows: 7,
        starting_cells: 3,
        ..MatchConfig::with_participants(participants)
    };
    let mut game = Match::new(config, ChaCha8Rng::seed_from_u64(seed)).unwrap();
    game.on_ready();
    while game.phase() != Phase::Active {
        game.on_clock_tick();
    }
    game
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Exact multiples of 60 degrees are always accepted.
    #[test]
    fn prop_axis_multiples_accepted(k in -12i32..=12) {
        prop_assert!(is_valid_axis(f64::from(k * 60)));
    }

    /// Angles well away from every axis are rejected.
    #[test]
    fn prop_off_axis_rejected(k in -6i32..6, offset in 0.2f64..59.8) {
        let angle = f64::from(k * 60) + offset;
        prop_assert!(!is_valid_axis(angle));
    }

    /// The rule is symmetric in the sign of the angle.
    #[test]
    fn prop_axis_symmetric(angle in -360.0f64..360.0) {
        prop_assert_eq!(is_valid_axis(angle), is_valid_axis(-angle));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Scores equal territory and ownership stays exclusive under any
    /// stream of contacts, valid or not.
    #[test]
    fn prop_contacts_preserve_invariants(
        players in 2usize..=6,
        seed in any::<u64>(),
        contacts in prop::collection::vec((0usize..6, 0u32..80, -40.0f64..40.0, -40.0f64..40.0), 1..200)
    ) {
        let mut game = active_match(players, seed);
        let total_before: u64 = game.registry().total_score();

        for (who, cell, dx, dy) in contacts {
            let color = Color::ALL[who % players];
            let center = game
                .grid()
                .cell(cell)
                .map_or(Point::new(dx, dy), |c| Point::new(c.center.x + dx, c.center.y + dy));
            let outcome = game.on_contact(color, center, cell);

            if let Some(ContactOutcome::Captured) = outcome {
                prop_assert_eq!(game.owner(cell), Some(color));
            }
            prop_assert!(check_invariants(game.grid(), game.registry()).is_empty());
            if game.phase() == Phase::Finished {
                break;
            }
        }

        // Steals move cells, captures only add.
        prop_assert!(game.registry().total_score() >= total_before);
        let owned = game.grid().len() - game.grid().neutral_count();
        prop_assert_eq!(game.registry().total_score(), owned as u64);
    }

    /// A resolved contact never changes more than one cell.
    #[test]
    fn prop_single_cell_changes(
        taker in color_strategy(),
        other in color_strategy(),
        col in 0u16..7,
        row in 0u16..6,
    ) {
        prop_assume!(taker != other);
        let mut grid = HexGrid::new(8, 6, 20.0).unwrap();
        grid.activate_all();
        let mut registry = PlayerRegistry::new();
        registry.register(taker, false).unwrap();
        registry.register(other, false).unwrap();

        let id = grid.cell_id_at(col, row).unwrap();
        registry.add_cell(other, id).unwrap();
        grid.set_owner(id, Some(other)).unwrap();

        let before: Vec<_> = grid.iter().map(|c| c.owner).collect();
        let center = grid.cell(id).unwrap().center;
        let pulse = Point::new(center.x - 20.0, center.y);
        resolve_contact(&mut grid, &mut registry, taker, pulse, id).unwrap();

        let changed = grid
            .iter()
            .zip(&before)
            .filter(|(cell, owner)| cell.owner != **owner)
            .count();
        prop_assert_eq!(changed, 1);
        prop_assert_eq!(registry.score(taker), Some(1));
        prop_assert_eq!(registry.score(other), Some(0));
    }
}
