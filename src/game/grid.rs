//! Hex grid topology and cell ownership.

// Grid coordinates are u16 and positions are f64 by construction
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use serde::Serialize;

use crate::error::{MatchError, MatchResult};
use crate::game::Color;

/// Stable identifier of a cell, assigned at grid construction.
pub type CellId = u32;

/// Ratio between a hexagon's height and its width.
pub const HEX_HEIGHT_WIDTH_RATIO: f64 = 1.154_700_538_379_251_5; // 2 / sqrt(3)

/// Vertical distance between two rows, as a fraction of the hex height.
pub const ROW_STRIDE_FACTOR: f64 = 0.75;

/// A position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Coord {
    /// Column.
    pub col: u16,
    /// Row.
    pub row: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }

    /// Whether this coordinate sits on a shifted (odd) row.
    #[must_use]
    pub const fn is_odd_row(self) -> bool {
        self.row % 2 == 1
    }
}

/// A point in continuous board space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A single hexagonal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Identifier, unique within the grid.
    pub id: CellId,
    /// Grid position.
    pub coord: Coord,
    /// Center used for geometric contact tests.
    pub center: Point,
    /// Owning color (None = neutral).
    pub owner: Option<Color>,
    /// Whether the cell currently accepts contact.
    pub active: bool,
}

impl Cell {
    /// Whether nobody owns this cell.
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        self.owner.is_none()
    }
}

/// The board: fixed topology plus current ownership.
///
/// Rows are offset: odd rows are shifted right by half a hex and have one
/// cell fewer, so every interior cell has six neighbours lying on the 0°,
/// ±60°, ±120° and 180° rays from its center.
#[derive(Debug, Clone)]
pub struct HexGrid {
    /// Number of columns on even rows.
    columns: u16,
    /// Number of rows.
    rows: u16,
    /// Width of one hexagon in board units.
    hex_width: f64,
    /// Cells indexed by id.
    cells: Vec<Cell>,
    /// Row-major lookup from coordinate to id.
    index: Vec<Option<CellId>>,
}

impl HexGrid {
    /// Build a grid of `columns` x `rows` hexagons `hex_width` units wide.
    ///
    /// Ids are handed out column by column, so they run from `0` to `len() - 1`.
    /// Every cell starts neutral and inactive.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGrid` for zero dimensions or a non-positive width.
    pub fn new(columns: u16, rows: u16, hex_width: f64) -> MatchResult<Self> {
        if columns == 0 || rows == 0 {
            return Err(MatchError::InvalidGrid(format!(
                "dimensions must be non-zero, got {columns}x{rows}"
            )));
        }
        if !hex_width.is_finite() || hex_width <= 0.0 {
            return Err(MatchError::InvalidGrid(format!(
                "hex width must be positive, got {hex_width}"
            )));
        }

        let hex_height = hex_width * HEX_HEIGHT_WIDTH_RATIO;
        let mut cells = Vec::with_capacity(usize::from(columns) * usize::from(rows));
        let mut index = vec![None; usize::from(columns) * usize::from(rows)];

        for col in 0..columns {
            for row in 0..rows {
                let coord = Coord::new(col, row);
                if coord.is_odd_row() && col + 1 == columns {
                    continue;
                }

                let x = if coord.is_odd_row() {
                    f64::from(col) * hex_width + hex_width
                } else {
                    f64::from(col) * hex_width + hex_width / 2.0
                };
                let y = f64::from(row) * hex_height * ROW_STRIDE_FACTOR + hex_height / 2.0;

                let id = cells.len() as CellId;
                index[usize::from(row) * usize::from(columns) + usize::from(col)] = Some(id);
                cells.push(Cell {
                    id,
                    coord,
                    center: Point::new(x, y),
                    owner: None,
                    active: false,
                });
            }
        }

        if cells.is_empty() {
            return Err(MatchError::InvalidGrid("grid has no cells".to_string()));
        }

        Ok(Self {
            columns,
            rows,
            hex_width,
            cells,
            index,
        })
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u16 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Width of one hexagon.
    #[must_use]
    pub const fn hex_width(&self) -> f64 {
        self.hex_width
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; a grid holds at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cell at a grid position, or `None` outside the grid.
    #[must_use]
    pub fn cell_at(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.columns || row >= self.rows {
            return None;
        }
        self.index[usize::from(row) * usize::from(self.columns) + usize::from(col)]
            .map(|id| &self.cells[id as usize])
    }

    /// The id of the cell at a grid position.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRangeCoordinate` if no cell exists there.
    pub fn cell_id_at(&self, col: u16, row: u16) -> MatchResult<CellId> {
        self.cell_at(col, row)
            .map(|cell| cell.id)
            .ok_or(MatchError::OutOfRangeCoordinate { col, row })
    }

    /// The cell with the given id.
    #[must_use]
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id as usize)
    }

    /// Reassign ownership of a cell, returning the previous owner.
    ///
    /// Keeping the player registry in sync is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCell` if the id was never issued.
    pub fn set_owner(&mut self, id: CellId, owner: Option<Color>) -> MatchResult<Option<Color>> {
        let cell = self
            .cells
            .get_mut(id as usize)
            .ok_or(MatchError::UnknownCell(id))?;
        Ok(std::mem::replace(&mut cell.owner, owner))
    }

    /// Make every cell neutral and inactive.
    pub fn reset_all(&mut self) {
        for cell in &mut self.cells {
            cell.owner = None;
            cell.active = false;
        }
    }

    /// Let every cell accept contact.
    pub fn activate_all(&mut self) {
        for cell in &mut self.cells {
            cell.active = true;
        }
    }

    /// Stop every cell from accepting contact.
    pub fn deactivate_all(&mut self) {
        for cell in &mut self.cells {
            cell.active = false;
        }
    }

    /// Iterate over all cells in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Number of cells nobody owns.
    #[must_use]
    pub fn neutral_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_neutral()).count()
    }

    /// Number of cells owned by a color.
    #[must_use]
    pub fn count_owned_by(&self, color: Color) -> usize {
        self.cells.iter().filter(|c| c.owner == Some(color)).count()
    }

    /// Ids of the (up to six) cells adjacent to `id`.
    #[must_use]
    pub fn neighbors(&self, id: CellId) -> Vec<CellId> {
        let Some(cell) = self.cell(id) else {
            return Vec::new();
        };
        let col = i32::from(cell.coord.col);
        let row = i32::from(cell.coord.row);

        // Columns of the two touching cells on the rows above and below.
        let (left, right) = if cell.coord.is_odd_row() {
            (col, col + 1)
        } else {
            (col - 1, col)
        };

        let candidates = [
            (col - 1, row),
            (col + 1, row),
            (left, row - 1),
            (right, row - 1),
            (left, row + 1),
            (right, row + 1),
        ];

        candidates
            .into_iter()
            .filter_map(|(c, r)| {
                let c = u16::try_from(c).ok()?;
                let r = u16::try_from(r).ok()?;
                self.cell_at(c, r).map(|n| n.id)
            })
            .collect()
    }
}
