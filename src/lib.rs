//! Color-location index: scan an image into a map from `#RRGGBB` to every
//! pixel of that color, then query, rasterize and persist it.

pub mod config;
pub mod core;
pub mod decoder;
pub mod renderer;
pub mod storage;
pub mod utils;
