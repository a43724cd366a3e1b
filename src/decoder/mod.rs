pub mod image_file;
pub mod pixel_source;

pub use pixel_source::{DecodedImage, PixelSource};
