pub mod cell;
pub mod display;
pub mod grid;
pub mod report;

pub use display::StatusDisplay;
pub use grid::{progress_grid, rasterize, AsciiGrid};
