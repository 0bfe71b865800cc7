//! Dense cell storage for the maze.

use maze_chase_core::{cell_index, Cell, CellCoord, GridError};

use crate::{template, WorldError};

/// Fixed-size maze of cells stored in row-major order.
///
/// The layout never changes after construction except that a dot turns into
/// empty space once the player walks off it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds the grid from the built-in maze template.
    ///
    /// The requested dimensions must match the template.
    pub fn from_template(columns: u32, rows: u32) -> Result<Self, WorldError> {
        if columns != template::TEMPLATE_COLUMNS || rows != template::TEMPLATE_ROWS {
            return Err(WorldError::DimensionMismatch {
                expected_columns: template::TEMPLATE_COLUMNS,
                expected_rows: template::TEMPLATE_ROWS,
                columns,
                rows,
            });
        }

        Self::from_codes(columns, rows, &template::template_codes())
    }

    /// Builds a grid from row-major template codes (`1` wall, `0` dot, `2` empty).
    pub fn from_codes(columns: u32, rows: u32, codes: &[u8]) -> Result<Self, WorldError> {
        let expected = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(usize::MAX);
        if codes.len() != expected {
            return Err(WorldError::TemplateLength {
                expected,
                actual: codes.len(),
            });
        }

        let width = usize::try_from(columns).unwrap_or(usize::MAX).max(1);
        let mut cells = Vec::with_capacity(codes.len());
        for (index, &code) in codes.iter().enumerate() {
            let Some(cell) = Cell::from_code(code) else {
                return Err(WorldError::UnknownCellCode {
                    code,
                    column: (index % width) as u32,
                    row: (index / width) as u32,
                });
            };
            cells.push(cell);
        }

        if !cells.contains(&Cell::Dot) {
            return Err(WorldError::NoDotCells);
        }

        Ok(Self {
            columns,
            rows,
            cells,
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cell stored at the provided coordinate.
    ///
    /// Coordinates are not wrapped; callers must apply toroidal adjustment first.
    pub fn cell_at(&self, cell: CellCoord) -> Result<Cell, GridError> {
        let index = cell_index(cell, self.columns, self.rows)?;
        Ok(self.cells[index])
    }

    /// Dense cell contents in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterates over every dot cell in row-major order.
    pub fn dot_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX).max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Dot)
            .map(move |(index, _)| CellCoord::new((index % width) as u32, (index / width) as u32))
    }

    /// Reports whether the cell blocks movement. Cells outside the grid block.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.cell_at(cell).map_or(true, Cell::is_wall)
    }

    /// Turns the cell into empty space, returning what it held before.
    pub(crate) fn clear(&mut self, cell: CellCoord) -> Option<Cell> {
        let index = cell_index(cell, self.columns, self.rows).ok()?;
        let slot = self.cells.get_mut(index)?;
        Some(std::mem::replace(slot, Cell::Empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{TEMPLATE_COLUMNS, TEMPLATE_ROWS};

    #[test]
    fn template_builds_with_declared_dimensions() {
        let grid = Grid::from_template(TEMPLATE_COLUMNS, TEMPLATE_ROWS).expect("template");
        assert_eq!(grid.columns(), 28);
        assert_eq!(grid.rows(), 30);
        assert_eq!(grid.cells().len(), 28 * 30);
        assert_eq!(grid.cell_at(CellCoord::new(0, 0)), Ok(Cell::Wall));
        assert_eq!(grid.cell_at(CellCoord::new(1, 1)), Ok(Cell::Dot));
        assert_eq!(grid.cell_at(CellCoord::new(0, 14)), Ok(Cell::Empty));
    }

    #[test]
    fn template_rejects_other_dimensions() {
        assert!(matches!(
            Grid::from_template(20, 20),
            Err(WorldError::DimensionMismatch { columns: 20, rows: 20, .. })
        ));
    }

    #[test]
    fn cell_at_reports_out_of_bounds() {
        let grid = Grid::from_template(TEMPLATE_COLUMNS, TEMPLATE_ROWS).expect("template");
        assert_eq!(
            grid.cell_at(CellCoord::new(28, 0)),
            Err(GridError::OutOfBounds {
                column: 28,
                row: 0,
                columns: 28,
                rows: 30,
            })
        );
        assert!(grid.cell_at(CellCoord::new(0, 30)).is_err());
    }

    #[test]
    fn malformed_codes_are_rejected() {
        assert!(matches!(
            Grid::from_codes(2, 2, &[0, 1, 1]),
            Err(WorldError::TemplateLength {
                expected: 4,
                actual: 3
            })
        ));
        assert!(matches!(
            Grid::from_codes(2, 2, &[0, 1, 7, 1]),
            Err(WorldError::UnknownCellCode {
                code: 7,
                column: 0,
                row: 1
            })
        ));
        assert!(matches!(
            Grid::from_codes(2, 2, &[1, 1, 2, 1]),
            Err(WorldError::NoDotCells)
        ));
    }

    #[test]
    fn clear_turns_dots_into_empty_space() {
        let mut grid = Grid::from_codes(2, 1, &[0, 1]).expect("grid");
        assert_eq!(grid.clear(CellCoord::new(0, 0)), Some(Cell::Dot));
        assert_eq!(grid.cell_at(CellCoord::new(0, 0)), Ok(Cell::Empty));
        assert_eq!(grid.clear(CellCoord::new(5, 0)), None);
    }

    #[test]
    fn dot_cells_walk_in_row_major_order() {
        let grid = Grid::from_codes(3, 2, &[0, 1, 2, 1, 0, 0]).expect("grid");
        let dots: Vec<_> = grid.dot_cells().collect();
        assert_eq!(
            dots,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 1),
                CellCoord::new(2, 1)
            ]
        );
    }
}
