use anyhow::Result;
use crossterm::{
    cursor,
    style::Print,
    terminal::{self, ClearType},
    QueueableCommand,
};
use std::io::{Stdout, Write};
use std::time::Instant;

use super::grid::{progress_grid, AsciiGrid};
use super::report;
use crate::core::{ImageMeta, ScanProgress};

/// Redraws the scan progress block in place on stdout.
pub struct StatusDisplay {
    stdout: Stdout,
    columns: usize,
    rows: usize,
    started: Instant,
    drawn: bool,
}

impl StatusDisplay {
    pub fn new(meta: &ImageMeta, columns: usize) -> Self {
        Self {
            stdout: std::io::stdout(),
            columns,
            rows: AsciiGrid::rows_for(columns, meta.width, meta.height),
            started: Instant::now(),
            drawn: false,
        }
    }

    pub fn render(&mut self, progress: ScanProgress) -> Result<()> {
        let grid = progress_grid(progress, self.columns, self.rows);
        let status = report::progress_status(progress, self.started.elapsed(), &grid);

        if self.drawn {
            self.stdout.queue(cursor::MoveUp(self.block_height()))?;
            self.stdout.queue(cursor::MoveToColumn(0))?;
        }
        self.stdout.queue(terminal::Clear(ClearType::FromCursorDown))?;
        for line in status.lines() {
            self.stdout.queue(Print(line))?;
            self.stdout.queue(Print("\r\n"))?;
        }
        self.stdout.flush()?;
        self.drawn = true;
        Ok(())
    }

    fn block_height(&self) -> u16 {
        redraw_height(self.rows, terminal::size().ok().map(|(_, h)| h))
    }

    /// Remove the progress block so the final report starts on a clean line.
    pub fn clear(&mut self) -> Result<()> {
        if self.drawn {
            self.stdout.queue(cursor::MoveUp(self.block_height()))?;
            self.stdout.queue(cursor::MoveToColumn(0))?;
            self.stdout.queue(terminal::Clear(ClearType::FromCursorDown))?;
            self.stdout.flush()?;
            self.drawn = false;
        }
        Ok(())
    }
}

/// Lines to move back over: headline plus grid rows, never past the top of
/// the terminal.
fn redraw_height(grid_rows: usize, terminal_rows: Option<u16>) -> u16 {
    let lines = u16::try_from(grid_rows.saturating_add(1)).unwrap_or(u16::MAX);
    match terminal_rows {
        Some(h) if h > 0 => lines.min(h),
        _ => lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redraw_height_counts_headline() {
        assert_eq!(redraw_height(24, Some(50)), 25);
        assert_eq!(redraw_height(0, None), 1);
    }

    #[test]
    fn test_redraw_height_is_clamped() {
        assert_eq!(redraw_height(65_535, None), u16::MAX);
        assert_eq!(redraw_height(usize::MAX, None), u16::MAX);
        assert_eq!(redraw_height(1_000, Some(40)), 40);
        assert_eq!(redraw_height(1_000, Some(0)), 1_001);
    }
}
