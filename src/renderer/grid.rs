use std::fmt;

use super::cell::Cell;
use crate::core::{Coordinate, ScanProgress};

pub const DEFAULT_GRID_COLUMNS: usize = 48;

/// Coarse occupancy grid, stored row-major.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AsciiGrid {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl AsciiGrid {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![Cell::Empty; columns * rows],
        }
    }

    /// `ceil(columns * height / width)`, keeping the source aspect ratio.
    pub fn rows_for(columns: usize, width: u32, height: u32) -> usize {
        if width == 0 {
            return 0;
        }
        let numerator = columns as u64 * height as u64;
        numerator.div_ceil(width as u64) as usize
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, column: usize, row: usize) -> Cell {
        self.cells[row * self.columns + column]
    }

    /// Marking an already filled cell is a no-op.
    pub fn mark(&mut self, column: usize, row: usize) {
        self.cells[row * self.columns + column] = Cell::Filled;
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_filled()).count()
    }
}

impl fmt::Display for AsciiGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.columns.max(1)).enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
        }
        Ok(())
    }
}

/// Downsample coordinates of a `width` x `height` image onto a grid with
/// `columns` columns. Several pixels may land in the same cell.
pub fn rasterize(coords: &[Coordinate], width: u32, height: u32, columns: usize) -> AsciiGrid {
    let rows = AsciiGrid::rows_for(columns, width, height);
    let mut grid = AsciiGrid::new(columns, rows);
    if columns == 0 || rows == 0 || height == 0 {
        return grid;
    }

    let (cols, rows_u64) = (columns as u64, rows as u64);
    for c in coords {
        let gx = (c.x as u64 * cols / width as u64).min(cols - 1) as usize;
        let gy = (c.y as u64 * rows_u64 / height as u64).min(rows_u64 - 1) as usize;
        grid.mark(gx, gy);
    }
    grid
}

/// Progress bar shaped like the result grid.
///
/// This does not reflect pixel positions: it fills the fraction of cells
/// equal to the fraction of pixels scanned, column by column, top to bottom.
pub fn progress_grid(progress: ScanProgress, columns: usize, rows: usize) -> AsciiGrid {
    let mut grid = AsciiGrid::new(columns, rows);
    let total_cells = (columns * rows) as u64;
    if total_cells == 0 || progress.total == 0 {
        return grid;
    }

    let filled = (progress.processed.min(progress.total) as u128 * total_cells as u128
        / progress.total as u128) as u64;
    for i in 0..filled.min(total_cells) as usize {
        grid.mark(i / rows, i % rows);
    }
    grid
}
