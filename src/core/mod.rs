pub mod color_index;
pub mod color_key;
pub mod error;
pub mod progress;
pub mod region_query;
pub mod scanner;
pub mod session;
pub mod snapshot;

pub use color_index::{ColorIndex, Coordinate, ImageMeta};
pub use color_key::ColorKey;
pub use error::IndexError;
pub use progress::ScanProgress;
pub use region_query::{QueryOutcome, Rectangle, RegionBounds, RegionQuery};
pub use scanner::ScanWorker;
pub use session::Session;
pub use snapshot::{IndexSnapshot, SnapshotRecord};
