#![no_main]

use arbitrary::Arbitrary;
use colhex::game::{
    Color, ContactOutcome, HexGrid, PlayerRegistry, Point, check_invariants, resolve_contact,
};
use libfuzzer_sys::fuzz_target;

/// One contact against a small board.
#[derive(Arbitrary, Debug)]
struct ContactInput {
    /// Index into the registered players.
    taker: u8,
    /// Target cell id, possibly out of range.
    cell: u32,
    /// Pulse offset from the target center.
    dx: i16,
    /// Pulse offset from the target center.
    dy: i16,
    /// Deactivate the grid first.
    inactive: bool,
}

/// Starting ownership plus a stream of contacts.
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// Number of players, folded into 2..=6.
    players: u8,
    /// Initial owners by cell, folded into player indexes (or neutral).
    owners: Vec<u8>,
    /// Contacts to resolve in order.
    contacts: Vec<ContactInput>,
}

fuzz_target!(|input: FuzzInput| {
    let players = usize::from(input.players % 5) + 2;
    let Ok(mut grid) = HexGrid::new(6, 5, 10.0) else {
        return;
    };
    let mut registry = PlayerRegistry::new();
    for &color in &Color::ALL[..players] {
        if registry.register(color, false).is_err() {
            return;
        }
    }

    for (cell, owner) in grid.iter().map(|c| c.id).collect::<Vec<_>>().into_iter().zip(&input.owners) {
        let index = usize::from(*owner) % (players + 1);
        if index == players {
            continue;
        }
        let color = Color::ALL[index];
        if registry.add_cell(color, cell).is_ok() {
            let _ = grid.set_owner(cell, Some(color));
        }
    }
    grid.activate_all();
    assert!(check_invariants(&grid, &registry).is_empty());

    for contact in input.contacts.iter().take(256) {
        let taker = Color::ALL[usize::from(contact.taker) % players];
        if contact.inactive {
            grid.deactivate_all();
        } else {
            grid.activate_all();
        }
        let center = grid
            .cell(contact.cell)
            .map_or(Point::new(0.0, 0.0), |c| c.center);
        let pulse = Point::new(
            center.x + f64::from(contact.dx) / 16.0,
            center.y + f64::from(contact.dy) / 16.0,
        );

        let before = grid.cell(contact.cell).and_then(|c| c.owner);
        match resolve_contact(&mut grid, &mut registry, taker, pulse, contact.cell) {
            Ok(ContactOutcome::Captured | ContactOutcome::Stolen { .. }) => {
                assert_eq!(grid.cell(contact.cell).and_then(|c| c.owner), Some(taker));
            }
            Ok(_) | Err(_) => {
                assert_eq!(grid.cell(contact.cell).and_then(|c| c.owner), before);
            }
        }

        // Rejected and failed contacts must leave the board consistent too
        let violations = check_invariants(&grid, &registry);
        assert!(violations.is_empty(), "violations: {violations:?}");
    }
});
