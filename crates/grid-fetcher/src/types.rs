use std::fmt;

use alloy_primitives::U256;
use grid_rpc_client::RawCell;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{DEFAULT_COLS, DEFAULT_ROWS};
use crate::error::{CellConversionError, GridError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    rows: usize,
    cols: usize,
}

impl GridDimensions {
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of positions.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Row-major index of `position`, or `None` when it lies outside the grid.
    pub fn index_of(&self, position: Position) -> Option<usize> {
        (position.row < self.rows && position.col < self.cols).then(|| position.row * self.cols + position.col)
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.len()).map(move |index| Position::new(index / cols, index % cols))
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self { rows: DEFAULT_ROWS, cols: DEFAULT_COLS }
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// State of one grid position as written to the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub content: String,
    /// Kept as a 256-bit integer, emitted as a decimal string.
    #[serde(serialize_with = "serialize_decimal", deserialize_with = "deserialize_decimal")]
    pub value: U256,
    pub last_updater: String,
    pub locked_until: u64,
}

fn serialize_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn deserialize_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    let decimal = String::deserialize(deserializer)?;
    U256::from_str_radix(&decimal, 10).map_err(serde::de::Error::custom)
}

impl TryFrom<RawCell> for Cell {
    type Error = CellConversionError;

    fn try_from(raw: RawCell) -> Result<Self, Self::Error> {
        let locked_until =
            u64::try_from(raw.locked_until).map_err(|_| CellConversionError::LockedUntilOverflow(raw.locked_until))?;

        Ok(Self { content: raw.content, value: raw.value, last_updater: raw.last_updater, locked_until })
    }
}

/// A fully resolved grid. `None` marks a position whose read failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    dimensions: GridDimensions,
    cells: Vec<Option<Cell>>,
}

impl Grid {
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// `None` when `position` is outside the grid, `Some(None)` when the cell is missing.
    pub fn get(&self, position: Position) -> Option<Option<&Cell>> {
        self.dimensions.index_of(position).map(|index| self.cells[index].as_ref())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<Cell>]> {
        self.cells.chunks(self.dimensions.cols())
    }

    pub fn missing_positions(&self) -> Vec<Position> {
        self.dimensions.positions().zip(&self.cells).filter(|(_, cell)| cell.is_none()).map(|(pos, _)| pos).collect()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

/// Collects exactly one result per position before yielding an immutable [`Grid`].
#[derive(Debug)]
pub struct GridBuilder {
    dimensions: GridDimensions,
    slots: Vec<Option<Option<Cell>>>,
}

impl GridBuilder {
    pub fn new(dimensions: GridDimensions) -> Self {
        Self { dimensions, slots: vec![None; dimensions.len()] }
    }

    pub fn record(&mut self, position: Position, cell: Option<Cell>) -> Result<(), GridError> {
        let index = self.dimensions.index_of(position).ok_or(GridError::OutOfBounds(position))?;
        let slot = &mut self.slots[index];
        if slot.is_some() {
            return Err(GridError::AlreadyRecorded(position));
        }
        *slot = Some(cell);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn finish(self) -> Result<Grid, GridError> {
        let mut cells = Vec::with_capacity(self.slots.len());
        for (position, slot) in self.dimensions.positions().zip(self.slots) {
            cells.push(slot.ok_or(GridError::Unresolved(position))?);
        }
        Ok(Grid { dimensions: self.dimensions, cells })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn cell(content: &str) -> Cell {
        Cell { content: content.to_string(), value: U256::from(1), last_updater: "0x01".to_string(), locked_until: 0 }
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(GridDimensions::new(0, 8), Err(GridError::InvalidDimensions { rows: 0, cols: 8 })));
        assert!(matches!(GridDimensions::new(8, 0), Err(GridError::InvalidDimensions { rows: 8, cols: 0 })));
    }

    #[test]
    fn positions_are_row_major() {
        let dimensions = GridDimensions::new(2, 3).unwrap();
        let positions: Vec<_> = dimensions.positions().map(|p| (p.row, p.col)).collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
        assert_eq!(dimensions.index_of(Position::new(1, 2)), Some(5));
        assert_eq!(dimensions.index_of(Position::new(2, 0)), None);
    }

    #[test]
    fn builder_places_cells_by_position() {
        let dimensions = GridDimensions::new(2, 2).unwrap();
        let mut builder = GridBuilder::new(dimensions);
        builder.record(Position::new(1, 1), Some(cell("d"))).unwrap();
        builder.record(Position::new(0, 1), None).unwrap();
        builder.record(Position::new(1, 0), Some(cell("c"))).unwrap();
        assert!(!builder.is_complete());
        builder.record(Position::new(0, 0), Some(cell("a"))).unwrap();
        assert!(builder.is_complete());

        let grid = builder.finish().unwrap();

        assert_eq!(grid.get(Position::new(0, 0)), Some(Some(&cell("a"))));
        assert_eq!(grid.get(Position::new(0, 1)), Some(None));
        assert_eq!(grid.get(Position::new(5, 5)), None);
        assert_eq!(grid.missing_positions(), vec![Position::new(0, 1)]);
        assert_eq!(grid.missing_count(), 1);
    }

    #[test]
    fn builder_rejects_duplicates_and_out_of_bounds() {
        let mut builder = GridBuilder::new(GridDimensions::new(1, 2).unwrap());
        builder.record(Position::new(0, 0), None).unwrap();

        assert!(matches!(builder.record(Position::new(0, 0), Some(cell("x"))), Err(GridError::AlreadyRecorded(_))));
        assert!(matches!(builder.record(Position::new(1, 0), None), Err(GridError::OutOfBounds(_))));
    }

    #[test]
    fn builder_refuses_to_finish_with_unresolved_positions() {
        let mut builder = GridBuilder::new(GridDimensions::new(1, 2).unwrap());
        builder.record(Position::new(0, 0), None).unwrap();

        match builder.finish() {
            Err(GridError::Unresolved(position)) => assert_eq!(position, Position::new(0, 1)),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn locked_until_must_fit_u64() {
        let raw = RawCell {
            content: String::new(),
            value: U256::ZERO,
            last_updater: "0x00".to_string(),
            locked_until: U256::from(u64::MAX) + U256::from(1),
        };
        assert!(matches!(Cell::try_from(raw), Err(CellConversionError::LockedUntilOverflow(_))));
    }

    #[test]
    fn cell_round_trips_through_json() {
        let value = U256::from(2u64).pow(U256::from(200));
        let original = Cell { value, ..cell("big") };

        let encoded = serde_json::to_value(&original).unwrap();
        assert_eq!(
            encoded,
            json!({
                "content": "big",
                "value": value.to_string(),
                "lastUpdater": "0x01",
                "lockedUntil": 0,
            })
        );
        assert_eq!(serde_json::from_value::<Cell>(encoded).unwrap(), original);
    }
}
