//! Contact resolution between a pulse and a cell.
//!
//! A hex grid has six directions of legitimate expansion from any point,
//! 60° apart. The physics layer reports every overlap between a pulse and a
//! cell, including tangential ones; only those on one of the six rays are
//! allowed to change ownership.

use log::debug;
use serde::Serialize;

use crate::error::{MatchError, MatchResult};
use crate::game::{CellId, Color, HexGrid, Point, PlayerRegistry};

/// Angle between two neighbouring expansion rays, in degrees.
pub const AXIS_STEP_DEG: f64 = 60.0;

/// Allowed deviation from a ray, in degrees.
pub const AXIS_TOLERANCE_DEG: f64 = 0.1;

/// Absolute angle in degrees of the line from `pulse` to `cell`.
#[must_use]
pub fn contact_angle(pulse: Point, cell: Point) -> f64 {
    (cell.y - pulse.y).atan2(cell.x - pulse.x).to_degrees().abs()
}

/// Whether an angle lies within tolerance of a multiple of 60°.
#[must_use]
pub fn is_valid_axis(angle_deg: f64) -> bool {
    let offset = angle_deg.abs() % AXIS_STEP_DEG;
    offset <= AXIS_TOLERANCE_DEG || offset >= AXIS_STEP_DEG - AXIS_TOLERANCE_DEG
}

/// Whether a cell center lies on one of the pulse's six rays.
///
/// Centers on exactly the same row always qualify.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_on_axis(pulse: Point, cell: Point) -> bool {
    cell.y == pulse.y || is_valid_axis(contact_angle(pulse, cell))
}

/// Why a reported contact left the board untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The cell is not on one of the pulse's rays.
    OffAxis,
    /// The cell does not accept contact right now.
    Inactive,
}

/// Result of resolving one contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Nothing changed.
    Rejected(Rejection),
    /// The pulse reached a cell its owner already holds.
    OwnCell,
    /// A neutral cell joined the taker.
    Captured,
    /// A cell moved from another player to the taker.
    Stolen {
        /// Previous owner.
        from: Color,
        /// Whether the previous owner's score just reached zero.
        eliminated: bool,
    },
}

impl ContactOutcome {
    /// Whether ownership changed.
    #[must_use]
    pub const fn changed_owner(self) -> bool {
        matches!(self, Self::Captured | Self::Stolen { .. })
    }
}

/// Resolve a contact between `taker`'s pulse centered at `pulse_center` and
/// the cell `cell_id`.
///
/// Grid ownership and both players' scores change together or not at all.
///
/// # Errors
///
/// Returns `UnknownPlayer` or `UnknownCell` for ids outside the match, and
/// `InvariantViolation` if the grid and the registry disagree about who
/// owns the cell. Nothing is mutated when an error is returned.
pub fn resolve_contact(
    grid: &mut HexGrid,
    registry: &mut PlayerRegistry,
    taker: Color,
    pulse_center: Point,
    cell_id: CellId,
) -> MatchResult<ContactOutcome> {
    if !registry.contains(taker) {
        return Err(MatchError::UnknownPlayer(taker));
    }
    let cell = *grid.cell(cell_id).ok_or(MatchError::UnknownCell(cell_id))?;

    if !is_on_axis(pulse_center, cell.center) {
        debug!(
            "{taker} contact with cell {cell_id} rejected at {:.2} degrees",
            contact_angle(pulse_center, cell.center)
        );
        return Ok(ContactOutcome::Rejected(Rejection::OffAxis));
    }
    if !cell.active {
        debug!("{taker} contact with inactive cell {cell_id} ignored");
        return Ok(ContactOutcome::Rejected(Rejection::Inactive));
    }

    match cell.owner {
        Some(giver) if giver == taker => Ok(ContactOutcome::OwnCell),
        None => {
            check_can_take(registry, taker, cell_id)?;
            registry.add_cell(taker, cell_id)?;
            grid.set_owner(cell_id, Some(taker))?;
            debug!("{taker} captured neutral cell {cell_id}");
            Ok(ContactOutcome::Captured)
        }
        Some(giver) => {
            check_can_take(registry, taker, cell_id)?;
            let giver_player = registry.get(giver).ok_or_else(|| {
                MatchError::invariant(format!("cell {cell_id} owned by unregistered {giver}"))
            })?;
            if !giver_player.owns(cell_id) || giver_player.score() == 0 {
                return Err(MatchError::invariant(format!(
                    "grid says {giver} owns cell {cell_id} but its territory disagrees"
                )));
            }

            registry.remove_cell(giver, cell_id)?;
            registry.add_cell(taker, cell_id)?;
            grid.set_owner(cell_id, Some(taker))?;

            let eliminated = registry.score(giver) == Some(0);
            debug!("{taker} took cell {cell_id} from {giver}");
            Ok(ContactOutcome::Stolen {
                from: giver,
                eliminated,
            })
        }
    }
}

/// Ensure the taker's territory does not already list the cell.
fn check_can_take(registry: &PlayerRegistry, taker: Color, cell_id: CellId) -> MatchResult<()> {
    if registry.get(taker).is_some_and(|p| p.owns(cell_id)) {
        return Err(MatchError::invariant(format!(
            "{taker} already lists cell {cell_id} it does not own on the grid"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (HexGrid, PlayerRegistry) {
        let mut grid = HexGrid::new(6, 6, 10.0).unwrap();
        grid.activate_all();
        let mut registry = PlayerRegistry::new();
        registry.register(Color::Red, false).unwrap();
        registry.register(Color::Blue, false).unwrap();
        (grid, registry)
    }

    fn give(grid: &mut HexGrid, registry: &mut PlayerRegistry, color: Color, id: CellId) {
        registry.add_cell(color, id).unwrap();
        grid.set_owner(id, Some(color)).unwrap();
    }

    #[test]
    fn test_axis_boundaries() {
        assert!(is_valid_axis(0.0));
        assert!(is_valid_axis(60.0));
        assert!(is_valid_axis(59.95));
        assert!(is_valid_axis(120.05));
        assert!(is_valid_axis(180.0));
        assert!(is_valid_axis(-60.0));
        assert!(!is_valid_axis(60.15));
        assert!(!is_valid_axis(30.0));
        assert!(!is_valid_axis(16.7));
    }

    #[test]
    fn test_same_row_always_on_axis() {
        assert!(is_on_axis(Point::new(0.0, 5.0), Point::new(-40.0, 5.0)));
        assert!(is_on_axis(Point::new(0.0, 5.0), Point::new(0.0, 5.0)));
    }

    #[test]
    fn test_tangential_contact_rejected() {
        let pulse = Point::new(0.0, 0.0);
        let cell = Point::new(10.0, 3.0);
        assert!((contact_angle(pulse, cell) - 16.7).abs() < 0.1);
        assert!(!is_on_axis(pulse, cell));
    }

    #[test]
    fn test_capture_neutral_cell() {
        let (mut grid, mut registry) = setup();
        let origin = grid.cell_id_at(2, 2).unwrap();
        let target = grid.cell_id_at(2, 3).unwrap();
        give(&mut grid, &mut registry, Color::Red, origin);
        let center = grid.cell(origin).unwrap().center;

        let outcome =
            resolve_contact(&mut grid, &mut registry, Color::Red, center, target).unwrap();
        assert_eq!(outcome, ContactOutcome::Captured);
        assert_eq!(grid.cell(target).unwrap().owner, Some(Color::Red));
        assert_eq!(registry.score(Color::Red), Some(2));
        assert_eq!(registry.score(Color::Blue), Some(0));
    }

    #[test]
    fn test_steal_and_eliminate() {
        let (mut grid, mut registry) = setup();
        let origin = grid.cell_id_at(2, 2).unwrap();
        let target = grid.cell_id_at(3, 2).unwrap();
        give(&mut grid, &mut registry, Color::Red, origin);
        give(&mut grid, &mut registry, Color::Blue, target);
        let center = grid.cell(origin).unwrap().center;

        let outcome =
            resolve_contact(&mut grid, &mut registry, Color::Red, center, target).unwrap();
        assert_eq!(
            outcome,
            ContactOutcome::Stolen {
                from: Color::Blue,
                eliminated: true
            }
        );
        assert_eq!(grid.cell(target).unwrap().owner, Some(Color::Red));
        assert_eq!(registry.score(Color::Red), Some(2));
        assert_eq!(registry.score(Color::Blue), Some(0));
        assert!(!registry.get(Color::Blue).unwrap().owns(target));
    }

    #[test]
    fn test_own_cell_is_noop() {
        let (mut grid, mut registry) = setup();
        let origin = grid.cell_id_at(1, 1).unwrap();
        give(&mut grid, &mut registry, Color::Blue, origin);
        let center = grid.cell(origin).unwrap().center;

        let outcome =
            resolve_contact(&mut grid, &mut registry, Color::Blue, center, origin).unwrap();
        assert_eq!(outcome, ContactOutcome::OwnCell);
        assert!(!outcome.changed_owner());
        assert_eq!(registry.score(Color::Blue), Some(1));
    }

    #[test]
    fn test_inactive_cell_rejected() {
        let (mut grid, mut registry) = setup();
        grid.deactivate_all();
        let target = grid.cell_id_at(2, 2).unwrap();
        let origin = grid.cell_id_at(1, 2).unwrap();
        let center = grid.cell(origin).unwrap().center;

        let outcome =
            resolve_contact(&mut grid, &mut registry, Color::Red, center, target).unwrap();
        assert_eq!(outcome, ContactOutcome::Rejected(Rejection::Inactive));
        assert!(grid.cell(target).unwrap().is_neutral());
    }

    #[test]
    fn test_off_axis_rejected() {
        let (mut grid, mut registry) = setup();
        let target = grid.cell_id_at(3, 3).unwrap();
        let cell_center = grid.cell(target).unwrap().center;
        let pulse = Point::new(cell_center.x - 10.0, cell_center.y - 3.0);

        let outcome =
            resolve_contact(&mut grid, &mut registry, Color::Red, pulse, target).unwrap();
        assert_eq!(outcome, ContactOutcome::Rejected(Rejection::OffAxis));
        assert_eq!(registry.score(Color::Red), Some(0));
    }

    #[test]
    fn test_unknown_ids() {
        let (mut grid, mut registry) = setup();
        let p = Point::default();
        assert_eq!(
            resolve_contact(&mut grid, &mut registry, Color::Green, p, 0),
            Err(MatchError::UnknownPlayer(Color::Green))
        );
        assert_eq!(
            resolve_contact(&mut grid, &mut registry, Color::Red, p, 10_000),
            Err(MatchError::UnknownCell(10_000))
        );
    }

    #[test]
    fn test_desync_detected_without_mutation() {
        let (mut grid, mut registry) = setup();
        let origin = grid.cell_id_at(2, 2).unwrap();
        let target = grid.cell_id_at(3, 2).unwrap();
        // Grid says Blue, but Blue's territory is empty.
        grid.set_owner(target, Some(Color::Blue)).unwrap();
        let center = grid.cell(origin).unwrap().center;

        let result = resolve_contact(&mut grid, &mut registry, Color::Red, center, target);
        assert!(matches!(result, Err(MatchError::InvariantViolation(_))));
        assert_eq!(grid.cell(target).unwrap().owner, Some(Color::Blue));
        assert_eq!(registry.score(Color::Red), Some(0));
    }
}
