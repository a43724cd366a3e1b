use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::color_key::ColorKey;
use super::error::IndexError;
use super::progress::{ProgressThrottle, ScanProgress, CLOCK_CHECK_STRIDE};
use crate::decoder::PixelSource;

/// Pixel position, serialized as `[x, y]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Coordinate {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

impl From<Coordinate> for (u32, u32) {
    fn from(c: Coordinate) -> Self {
        (c.x, c.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Parses `x,y`; whitespace around either component is ignored.
impl FromStr for Coordinate {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IndexError::InvalidCoordinateFormat(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse::<u32>().map_err(|_| invalid())?;
        let y = y.trim().parse::<u32>().map_err(|_| invalid())?;
        Ok(Self { x, y })
    }
}

/// Dimensions of the indexed image.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ImageMeta {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl ImageMeta {
    pub fn of<S: PixelSource + ?Sized>(source: &S) -> Self {
        Self {
            width: source.width(),
            height: source.height(),
            channels: source.channels(),
        }
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn bit_depth(&self) -> u32 {
        self.channels as u32 * 8
    }
}

/// Color key to every coordinate of that color.
///
/// Colors keep their first-discovery order and each coordinate list is
/// append-only, so lists stay in scan order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorIndex {
    slots: HashMap<ColorKey, usize>,
    entries: Vec<(ColorKey, Vec<Coordinate>)>,
}

impl ColorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full column-major scan: x outer, y inner.
    pub fn build<S: PixelSource + ?Sized>(source: &S) -> Self {
        let mut index = Self::new();
        for x in 0..source.width() {
            for y in 0..source.height() {
                index.push(ColorKey::from(source.pixel_at(x, y)), Coordinate::new(x, y));
            }
        }
        index
    }

    /// Same scan as [`ColorIndex::build`], calling `on_progress` at most once
    /// per `interval` (one second at the least). The callback cannot
    /// influence the result.
    pub fn build_with_progress<S, F>(source: &S, interval: Duration, on_progress: F) -> Self
    where
        S: PixelSource + ?Sized,
        F: FnMut(ScanProgress),
    {
        Self::build_throttled(source, ProgressThrottle::new(interval), on_progress)
    }

    pub(crate) fn build_throttled<S, F>(source: &S, mut throttle: ProgressThrottle, mut on_progress: F) -> Self
    where
        S: PixelSource + ?Sized,
        F: FnMut(ScanProgress),
    {
        let total = ImageMeta::of(source).pixel_count();
        let mut processed = 0u64;
        let mut index = Self::new();

        for x in 0..source.width() {
            for y in 0..source.height() {
                index.push(ColorKey::from(source.pixel_at(x, y)), Coordinate::new(x, y));
                processed += 1;

                if processed % CLOCK_CHECK_STRIDE == 0 && throttle.ready() {
                    on_progress(ScanProgress { processed, total });
                }
            }
        }
        index
    }

    pub(crate) fn push(&mut self, key: ColorKey, coord: Coordinate) {
        match self.slots.get(&key) {
            Some(&slot) => self.entries[slot].1.push(coord),
            None => {
                self.slots.insert(key, self.entries.len());
                self.entries.push((key, vec![coord]));
            }
        }
    }

    /// Adds a color with a whole coordinate list; returns false if the key
    /// was already present.
    pub(crate) fn insert_list(&mut self, key: ColorKey, coords: Vec<Coordinate>) -> bool {
        if self.slots.contains_key(&key) {
            return false;
        }
        self.slots.insert(key, self.entries.len());
        self.entries.push((key, coords));
        true
    }

    pub fn get(&self, key: &ColorKey) -> Option<&[Coordinate]> {
        self.slots.get(key).map(|&slot| self.entries[slot].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColorKey, &[Coordinate])> {
        self.entries.iter().map(|(key, coords)| (key, coords.as_slice()))
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total coordinates across all colors.
    pub fn pixel_count(&self) -> u64 {
        self.entries.iter().map(|(_, coords)| coords.len() as u64).sum()
    }
}

impl Serialize for ColorIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, coords) in &self.entries {
            map.serialize_entry(key, coords)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ColorIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IndexVisitor;

        impl<'de> Visitor<'de> for IndexVisitor {
            type Value = ColorIndex;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from #RRGGBB keys to [x, y] coordinate lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut index = ColorIndex::new();
                while let Some((key, coords)) = access.next_entry::<ColorKey, Vec<Coordinate>>()? {
                    if !index.insert_list(key, coords) {
                        return Err(serde::de::Error::custom(format!("duplicate color key {key}")));
                    }
                }
                Ok(index)
            }
        }

        deserializer.deserialize_map(IndexVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecodedImage;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const RED: [u8; 3] = [255, 0, 0];
    const BLUE: [u8; 3] = [0, 0, 255];

    fn red_over_blue() -> DecodedImage {
        DecodedImage::from_fn(2, 2, |_, y| if y == 0 { RED } else { BLUE }).unwrap()
    }

    #[test]
    fn test_two_by_two_example() {
        let index = ColorIndex::build(&red_over_blue());
        let red = ColorKey::parse("FF0000").unwrap();
        let blue = ColorKey::parse("0000FF").unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&red).unwrap(), &[Coordinate::new(0, 0), Coordinate::new(1, 0)]);
        assert_eq!(index.get(&blue).unwrap(), &[Coordinate::new(0, 1), Coordinate::new(1, 1)]);
    }

    #[test]
    fn test_scan_is_column_major() {
        let img = DecodedImage::from_fn(3, 2, |_, _| [9, 9, 9]).unwrap();
        let index = ColorIndex::build(&img);
        let coords: Vec<(u32, u32)> = index
            .get(&ColorKey::from_rgb(9, 9, 9))
            .unwrap()
            .iter()
            .map(|&c| c.into())
            .collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn test_colors_keep_discovery_order() {
        let img = DecodedImage::from_fn(2, 2, |x, y| match (x, y) {
            (0, 0) => [3, 3, 3],
            (0, 1) => [1, 1, 1],
            _ => [2, 2, 2],
        })
        .unwrap();
        let keys: Vec<String> = ColorIndex::build(&img).iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["#030303", "#010101", "#020202"]);
    }

    #[test]
    fn test_progress_does_not_change_result() {
        let img = DecodedImage::from_fn(64, 64, |x, y| [(x % 5) as u8, (y % 3) as u8, 0]).unwrap();
        let mut reports = Vec::new();
        let throttle = ProgressThrottle::with_exact_interval(Duration::ZERO);
        let with_progress = ColorIndex::build_throttled(&img, throttle, |p| reports.push(p));

        assert_eq!(with_progress, ColorIndex::build(&img));
        let processed: Vec<u64> = reports.iter().map(|p| p.processed).collect();
        assert_eq!(processed, vec![1024, 2048, 3072, 4096]);
        assert!(reports.iter().all(|p| p.total == 4096));
    }

    #[test]
    fn test_progress_is_throttled() {
        let img = DecodedImage::from_fn(64, 64, |_, _| [0, 0, 0]).unwrap();
        let mut calls = 0;
        ColorIndex::build_with_progress(&img, Duration::from_secs(3600), |_| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_zero_interval_still_waits_a_second() {
        let img = DecodedImage::from_fn(64, 64, |_, _| [0, 0, 0]).unwrap();
        let started = std::time::Instant::now();
        let mut calls = 0;
        ColorIndex::build_with_progress(&img, Duration::ZERO, |_| calls += 1);
        if started.elapsed() < Duration::from_secs(1) {
            assert_eq!(calls, 0);
        }
    }

    #[test]
    fn test_coordinate_parse() {
        assert_eq!(" 3 , 4 ".parse::<Coordinate>().unwrap(), Coordinate::new(3, 4));
        for bad in ["3", "3,", "a,b", "-1,2", "1,2,3", ""] {
            assert!(
                matches!(bad.parse::<Coordinate>(), Err(IndexError::InvalidCoordinateFormat(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ColorIndex::build(&red_over_blue())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "#FF0000": [[0, 0], [1, 0]], "#0000FF": [[0, 1], [1, 1]] })
        );
    }

    #[test]
    fn test_deserialize_rejects_duplicate_keys() {
        let text = r##"{"#FF0000": [[0, 0]], "#ff0000": [[1, 0]]}"##;
        assert!(serde_json::from_str::<ColorIndex>(text).is_err());
    }

    proptest! {
        #[test]
        fn prop_index_covers_every_pixel_once(
            width in 1u32..12,
            height in 1u32..12,
            seed in any::<u64>(),
        ) {
            let img = DecodedImage::from_fn(width, height, |x, y| {
                let v = seed.wrapping_mul(31).wrapping_add((x * 7 + y * 13) as u64) % 4;
                [v as u8, 0, 0]
            })
            .unwrap();
            let index = ColorIndex::build(&img);

            let mut seen = HashSet::new();
            for (_, coords) in index.iter() {
                for c in coords {
                    prop_assert!(c.x < width && c.y < height);
                    prop_assert!(seen.insert(*c));
                }
            }
            prop_assert_eq!(seen.len() as u64, (width * height) as u64);
            prop_assert_eq!(index.pixel_count(), (width * height) as u64);
        }
    }
}
