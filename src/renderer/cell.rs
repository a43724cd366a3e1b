/// One cell of an ASCII occupancy grid
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled,
}

impl Cell {
    pub const EMPTY_GLYPH: char = '-';
    pub const FILLED_GLYPH: char = '#';

    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => Self::EMPTY_GLYPH,
            Cell::Filled => Self::FILLED_GLYPH,
        }
    }

    pub fn is_filled(self) -> bool {
        self == Cell::Filled
    }
}
