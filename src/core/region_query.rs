use rayon::prelude::*;

use super::color_index::{Coordinate, ImageMeta};
use super::color_key::ColorKey;
use super::error::IndexError;
use super::snapshot::IndexSnapshot;

pub const DEFAULT_DISPLAY_LIMIT: usize = 50;

// Below this many coordinates a sequential filter beats rayon's split cost.
const PARALLEL_FILTER_THRESHOLD: usize = 16 * 1024;

/// Inclusive axis-aligned bounds with `min <= max` on both axes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rectangle {
    min: Coordinate,
    max: Coordinate,
}

impl Rectangle {
    pub fn new(min: Coordinate, max: Coordinate) -> Result<Self, IndexError> {
        if min.x > max.x || min.y > max.y {
            return Err(IndexError::InvalidRange {
                min_x: min.x,
                min_y: min.y,
                max_x: max.x,
                max_y: max.y,
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Coordinate {
        self.min
    }

    pub fn max(&self) -> Coordinate {
        self.max
    }

    #[inline]
    pub fn contains(&self, c: &Coordinate) -> bool {
        self.min.x <= c.x && c.x <= self.max.x && self.min.y <= c.y && c.y <= self.max.y
    }
}

/// Bounds as entered by the user. Either side may be left out.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RegionBounds {
    pub min: Option<Coordinate>,
    pub max: Option<Coordinate>,
}

impl RegionBounds {
    pub fn is_unspecified(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Missing min is `(0, 0)`, missing max is `(width, height)`.
    pub fn resolve(&self, meta: &ImageMeta) -> Result<Rectangle, IndexError> {
        let min = self.min.unwrap_or(Coordinate::new(0, 0));
        let max = self.max.unwrap_or(Coordinate::new(meta.width, meta.height));
        Rectangle::new(min, max)
    }
}

/// Lookup of one color's coordinates, optionally restricted to a region.
#[derive(Clone, Debug)]
pub struct RegionQuery {
    color: String,
    bounds: RegionBounds,
    include_all: bool,
    display_limit: usize,
}

impl RegionQuery {
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            bounds: RegionBounds::default(),
            include_all: false,
            display_limit: DEFAULT_DISPLAY_LIMIT,
        }
    }

    pub fn bounds(mut self, bounds: RegionBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn include_all(mut self, include_all: bool) -> Self {
        self.include_all = include_all;
        self
    }

    /// Cap on the listed coordinates when no bounds were entered.
    pub fn display_limit(mut self, limit: usize) -> Self {
        self.display_limit = limit;
        self
    }

    /// Both the color and the bounds are validated before anything is looked
    /// up, even when `include_all` makes the bounds irrelevant.
    pub fn run(&self, snapshot: &IndexSnapshot) -> Result<QueryOutcome, IndexError> {
        let color = ColorKey::parse(&self.color)?;
        let rect = self.bounds.resolve(snapshot.meta())?;

        let coords = snapshot
            .index()
            .get(&color)
            .ok_or_else(|| IndexError::ColorNotFound(color.to_string()))?;

        let matches = if self.include_all {
            coords.to_vec()
        } else {
            filter_region(coords, &rect)
        };

        let shown = if !self.include_all && self.bounds.is_unspecified() {
            matches.len().min(self.display_limit)
        } else {
            matches.len()
        };

        log::debug!(
            "query {color}: {} of {} coordinates match, {shown} shown",
            matches.len(),
            coords.len()
        );

        Ok(QueryOutcome { color, matches, shown })
    }
}

fn filter_region(coords: &[Coordinate], rect: &Rectangle) -> Vec<Coordinate> {
    if coords.len() < PARALLEL_FILTER_THRESHOLD {
        coords.iter().copied().filter(|c| rect.contains(c)).collect()
    } else {
        coords.par_iter().copied().filter(|c| rect.contains(c)).collect()
    }
}

/// Result of a [`RegionQuery`]: the full filtered set plus how much of it
/// is meant for listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryOutcome {
    color: ColorKey,
    matches: Vec<Coordinate>,
    shown: usize,
}

impl QueryOutcome {
    pub fn color(&self) -> ColorKey {
        self.color
    }

    /// Every matching coordinate in scan order. Counting and rasterization
    /// use this, never the displayed prefix.
    pub fn matches(&self) -> &[Coordinate] {
        &self.matches
    }

    pub fn count(&self) -> usize {
        self.matches.len()
    }

    pub fn displayed(&self) -> &[Coordinate] {
        &self.matches[..self.shown]
    }

    pub fn is_truncated(&self) -> bool {
        self.shown < self.matches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecodedImage;

    fn red_over_blue() -> IndexSnapshot {
        let img = DecodedImage::from_fn(2, 2, |_, y| if y == 0 { [255, 0, 0] } else { [0, 0, 255] })
            .unwrap();
        IndexSnapshot::scan(&img)
    }

    fn solid(width: u32, height: u32) -> IndexSnapshot {
        IndexSnapshot::scan(&DecodedImage::from_fn(width, height, |_, _| [7, 7, 7]).unwrap())
    }

    fn at(x: u32, y: u32) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn test_default_bounds_return_everything() {
        let outcome = RegionQuery::new("FF0000").run(&red_over_blue()).unwrap();
        assert_eq!(outcome.color().to_string(), "#FF0000");
        assert_eq!(outcome.count(), 2);
        assert_eq!(outcome.displayed(), &[at(0, 0), at(1, 0)]);
        assert!(!outcome.is_truncated());
    }

    #[test]
    fn test_unknown_color_is_not_found() {
        let result = RegionQuery::new("123456").run(&red_over_blue());
        assert_eq!(result, Err(IndexError::ColorNotFound("#123456".to_string())));
    }

    #[test]
    fn test_bad_color_format() {
        let result = RegionQuery::new("FF00").run(&red_over_blue());
        assert!(matches!(result, Err(IndexError::InvalidColorFormat(_))));
    }

    #[test]
    fn test_hash_prefixed_color_is_rejected() {
        let result = RegionQuery::new("#FF0000").run(&red_over_blue());
        assert_eq!(result, Err(IndexError::InvalidColorFormat("#FF0000".to_string())));
    }

    #[test]
    fn test_inverted_rectangle() {
        let bounds = RegionBounds { min: Some(at(5, 5)), max: Some(at(2, 2)) };
        let result = RegionQuery::new("FF0000").bounds(bounds).run(&red_over_blue());
        assert!(matches!(result, Err(IndexError::InvalidRange { .. })));
    }

    #[test]
    fn test_range_checked_before_lookup_and_with_include_all() {
        let bounds = RegionBounds { min: Some(at(5, 5)), max: Some(at(2, 2)) };
        let unknown = RegionQuery::new("123456").bounds(bounds).run(&red_over_blue());
        assert!(matches!(unknown, Err(IndexError::InvalidRange { .. })));

        let all = RegionQuery::new("FF0000").bounds(bounds).include_all(true).run(&red_over_blue());
        assert!(matches!(all, Err(IndexError::InvalidRange { .. })));
    }

    #[test]
    fn test_partial_bounds_default_other_side() {
        let snapshot = red_over_blue();
        let bounds = RegionBounds { min: Some(at(1, 0)), max: None };
        let outcome = RegionQuery::new("0000ff").bounds(bounds).run(&snapshot).unwrap();
        assert_eq!(outcome.matches(), &[at(1, 1)]);

        let bounds = RegionBounds { min: None, max: Some(at(0, 1)) };
        let outcome = RegionQuery::new("0000ff").bounds(bounds).run(&snapshot).unwrap();
        assert_eq!(outcome.matches(), &[at(0, 1)]);
    }

    #[test]
    fn test_single_point_rectangle() {
        let snapshot = solid(5, 5);
        let bounds = RegionBounds { min: Some(at(3, 2)), max: Some(at(3, 2)) };
        let outcome = RegionQuery::new("070707").bounds(bounds).run(&snapshot).unwrap();
        assert_eq!(outcome.matches(), &[at(3, 2)]);
    }

    #[test]
    fn test_default_view_caps_display_only() {
        let snapshot = solid(10, 10);
        let outcome = RegionQuery::new("070707").run(&snapshot).unwrap();
        assert_eq!(outcome.count(), 100);
        assert_eq!(outcome.displayed().len(), DEFAULT_DISPLAY_LIMIT);
        assert_eq!(outcome.displayed(), &outcome.matches()[..DEFAULT_DISPLAY_LIMIT]);
        assert!(outcome.is_truncated());
    }

    #[test]
    fn test_explicit_bounds_are_not_capped() {
        let snapshot = solid(10, 10);
        let bounds = RegionBounds { min: Some(at(0, 0)), max: None };
        let outcome = RegionQuery::new("070707").bounds(bounds).run(&snapshot).unwrap();
        assert_eq!(outcome.displayed().len(), 100);
        assert!(!outcome.is_truncated());
    }

    #[test]
    fn test_include_all_ignores_bounds_and_cap() {
        let snapshot = solid(10, 10);
        let bounds = RegionBounds { min: Some(at(0, 0)), max: Some(at(1, 1)) };
        let outcome = RegionQuery::new("070707")
            .bounds(bounds)
            .include_all(true)
            .run(&snapshot)
            .unwrap();
        assert_eq!(outcome.count(), 100);
        assert!(!outcome.is_truncated());

        let unbounded = RegionQuery::new("070707").include_all(true).run(&snapshot).unwrap();
        assert_eq!(unbounded.displayed().len(), 100);
    }

    #[test]
    fn test_filter_preserves_scan_order() {
        let snapshot = solid(200, 200);
        let bounds = RegionBounds { min: Some(at(10, 20)), max: Some(at(150, 180)) };
        let outcome = RegionQuery::new("070707").bounds(bounds).run(&snapshot).unwrap();

        let expected: Vec<Coordinate> = (10..=150)
            .flat_map(|x| (20..=180).map(move |y| at(x, y)))
            .collect();
        assert_eq!(outcome.matches(), expected.as_slice());
    }

    #[test]
    fn test_query_is_repeatable() {
        let snapshot = solid(30, 30);
        let query = RegionQuery::new("070707").bounds(RegionBounds {
            min: Some(at(2, 2)),
            max: Some(at(9, 20)),
        });
        assert_eq!(query.run(&snapshot).unwrap(), query.run(&snapshot).unwrap());
    }
}
