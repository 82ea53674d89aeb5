//! Headless contact detection.
//!
//! Stands in for the physics engine of a graphical front end: after each
//! frame it reports which cells a growing pulse has just started to
//! overlap. It knows nothing about axes or ownership; filtering those is
//! the engine's job.

use rand::Rng;

use crate::game::{CellId, Color, HexGrid, Match, Point, Pulse};

/// A contact reported for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Owner of the pulse.
    pub color: Color,
    /// Center of the pulse.
    pub pulse_center: Point,
    /// Cell being touched.
    pub cell: CellId,
}

/// Cells whose contact circle began overlapping `pulse` during its last
/// growth step, nearest first.
///
/// A pulse that has not grown yet reports every cell it overlaps,
/// including the one it sits on.
#[must_use]
pub fn contacts_for_step(pulse: &Pulse, grid: &HexGrid, cell_radius: f64) -> Vec<CellId> {
    let mut hits: Vec<(f64, CellId)> = grid
        .iter()
        .filter_map(|cell| {
            let dist = pulse.origin.distance(cell.center);
            let gap = dist - cell_radius;
            let entered = if pulse.is_fresh() {
                gap <= pulse.radius
            } else {
                pulse.prev_radius < gap && gap <= pulse.radius
            };
            entered.then_some((dist, cell.id))
        })
        .collect();
    hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    hits.into_iter().map(|(_, id)| id).collect()
}

/// Every contact for the current frame, players in registry order.
#[must_use]
pub fn frame_contacts<R: Rng>(game: &Match<R>) -> Vec<Contact> {
    let cell_radius = game.cell_contact_radius();
    let mut contacts = Vec::new();
    for (color, pulse) in game.pulses() {
        contacts.extend(
            contacts_for_step(&pulse, game.grid(), cell_radius)
                .into_iter()
                .map(|cell| Contact {
                    color,
                    pulse_center: pulse.origin,
                    cell,
                }),
        );
    }
    contacts
}
