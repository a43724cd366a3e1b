/// Errors produced by the color index engine.
///
/// Every variant is recoverable: the caller decides how to show it and the
/// installed index is never touched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Color input is not six hexadecimal digits.
    #[error("Invalid format. Hexadecimal: (XXXXXX), got {0:?}")]
    InvalidColorFormat(String),

    /// Coordinate input is not `x,y`.
    #[error("Invalid coordinate format {0:?}, expected x,y")]
    InvalidCoordinateFormat(String),

    /// Rectangle minimum exceeds its maximum on some axis.
    #[error("Min > Max: ({min_x},{min_y}) > ({max_x},{max_y}). re-enter your range.")]
    InvalidRange {
        min_x: u32,
        min_y: u32,
        max_x: u32,
        max_y: u32,
    },

    #[error("Color {0} does not occur in the analyzed image")]
    ColorNotFound(String),

    #[error("Analyze an image or import data first.")]
    NoIndexAvailable,

    /// Imported data failed structural validation.
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Pixel data cannot be indexed (zero dimension or short buffer).
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Scan worker terminated before finishing")]
    ScanPanicked,
}
