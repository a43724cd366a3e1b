use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use super::color_index::{ColorIndex, ImageMeta};
use super::error::IndexError;
use super::progress::{ProgressThrottle, ScanProgress};
use crate::decoder::PixelSource;

/// Exchange record handed to persistence: no invariants are assumed on the
/// way in, see [`IndexSnapshot::from_record`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub color_map: ColorIndex,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

/// A finished color index together with the image it describes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRecord", into = "SnapshotRecord")]
pub struct IndexSnapshot {
    index: ColorIndex,
    meta: ImageMeta,
}

impl IndexSnapshot {
    pub fn scan<S: PixelSource + ?Sized>(source: &S) -> Self {
        Self {
            index: ColorIndex::build(source),
            meta: ImageMeta::of(source),
        }
    }

    pub fn scan_with_progress<S, F>(source: &S, interval: Duration, on_progress: F) -> Self
    where
        S: PixelSource + ?Sized,
        F: FnMut(ScanProgress),
    {
        Self::scan_throttled(source, ProgressThrottle::new(interval), on_progress)
    }

    pub(crate) fn scan_throttled<S, F>(source: &S, throttle: ProgressThrottle, on_progress: F) -> Self
    where
        S: PixelSource + ?Sized,
        F: FnMut(ScanProgress),
    {
        Self {
            index: ColorIndex::build_throttled(source, throttle, on_progress),
            meta: ImageMeta::of(source),
        }
    }

    pub fn index(&self) -> &ColorIndex {
        &self.index
    }

    pub fn meta(&self) -> &ImageMeta {
        &self.meta
    }

    pub fn to_record(&self) -> SnapshotRecord {
        SnapshotRecord {
            color_map: self.index.clone(),
            width: self.meta.width,
            height: self.meta.height,
            channels: self.meta.channels,
        }
    }

    /// Validate an imported record. The record must describe a complete
    /// index: positive dimensions, every coordinate inside the image and
    /// every pixel listed exactly once.
    pub fn from_record(record: SnapshotRecord) -> Result<Self, IndexError> {
        let SnapshotRecord { color_map, width, height, channels } = record;
        let malformed = |msg: String| -> Result<Self, IndexError> { Err(IndexError::MalformedSnapshot(msg)) };

        if width == 0 || height == 0 {
            return malformed(format!("image dimensions must be positive, got {width}x{height}"));
        }
        if channels == 0 {
            return malformed("channel count must be positive".to_string());
        }

        let meta = ImageMeta { width, height, channels };
        let expected = meta.pixel_count();
        let listed = color_map.pixel_count();
        if listed != expected {
            return malformed(format!(
                "{listed} coordinates listed, {width}x{height} image has {expected} pixels"
            ));
        }

        let mut seen = HashSet::with_capacity(listed as usize);
        for (key, coords) in color_map.iter() {
            for c in coords {
                if c.x >= width || c.y >= height {
                    return malformed(format!("{key} lists {c} outside {width}x{height}"));
                }
                if !seen.insert(*c) {
                    return malformed(format!("{c} appears more than once"));
                }
            }
        }

        Ok(Self { index: color_map, meta })
    }
}

impl TryFrom<SnapshotRecord> for IndexSnapshot {
    type Error = IndexError;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

impl From<IndexSnapshot> for SnapshotRecord {
    fn from(snapshot: IndexSnapshot) -> Self {
        SnapshotRecord {
            color_map: snapshot.index,
            width: snapshot.meta.width,
            height: snapshot.meta.height,
            channels: snapshot.meta.channels,
        }
    }
}
