//! Grid layout system - declarative 2D layouts with rows, columns, and cell placement
//!
//! A CSS Grid-inspired solver used for the bento board. Key features:
//! - Define all rows and columns upfront (no nesting required)
//! - Zone placement via GridArea (cell coordinates and spanning)
//! - Automatic space distribution with Fixed, Flex, and Percent sizing
//! - Fail-fast validation (bounds checking, overlap detection)
//!
//! # Example
//! ```no_run
//! use bento_folio::layout::grid::{GridLayout, GridSize, GridArea};
//!
//! let mut grid = GridLayout::new();
//!
//! grid.add_col(GridSize::flex(1))
//!     .add_col(GridSize::flex(2))
//!     .add_col(GridSize::flex(1));
//!
//! grid.add_row(GridSize::flex(1))
//!     .add_row(GridSize::flex(2))
//!     .add_row(GridSize::flex(1));
//!
//! grid.place("projects", GridArea::span_cols(0, 0..2))?;
//! grid.place("dsa", GridArea::cell(0, 2))?;
//! # Ok::<(), bento_folio::layout::grid::GridError>(())
//! ```

use crate::{Rect, Size};
use std::collections::HashMap;
use std::num::{NonZeroU16, NonZeroU8};
use std::ops::Range;

use thiserror::Error;

/// Zone identifier
pub type ZoneId = String;

/// Defines how a column or row should be sized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSize {
    /// Fixed size in terminal cells
    Fixed(u16),

    /// Flexible size (proportional units, like CSS 'fr')
    /// Flex(2) takes 2x the space of Flex(1)
    /// Must be non-zero - zero would create a track that absorbs no space
    Flex(NonZeroU16),

    /// Percentage of available space (1-100)
    /// If total percentages exceed 100%, they will be normalized proportionally
    /// If total is less than 100%, remaining space goes to Flex tracks
    Percent(NonZeroU8),
}

impl GridSize {
    /// Create Flex variant
    ///
    /// # Panics
    /// Panics if n is zero
    pub fn flex(n: u16) -> Self {
        Self::try_flex(n).expect("Flex size must be non-zero")
    }

    /// Create Percent variant
    ///
    /// # Panics
    /// Panics if n is zero or greater than 100
    pub fn percent(n: u8) -> Self {
        assert!(n > 0 && n <= 100, "Percent must be 1-100");
        Self::try_percent(n).expect("percent already checked")
    }

    pub fn try_flex(n: u16) -> Result<Self, GridError> {
        NonZeroU16::new(n)
            .map(Self::Flex)
            .ok_or(GridError::InvalidTrack("flex weight must be non-zero"))
    }

    pub fn try_percent(n: u8) -> Result<Self, GridError> {
        NonZeroU8::new(n)
            .filter(|pct| pct.get() <= 100)
            .map(Self::Percent)
            .ok_or(GridError::InvalidTrack("percent must be 1-100"))
    }
}

/// Rectangular block of grid cells, as half-open row and column ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridArea {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl GridArea {
    pub fn new(rows: Range<usize>, cols: Range<usize>) -> Self {
        Self { rows, cols }
    }

    /// A single cell.
    pub fn cell(row: usize, col: usize) -> Self {
        Self::new(row..row + 1, col..col + 1)
    }

    /// One row spanning several columns.
    pub fn span_cols(row: usize, cols: Range<usize>) -> Self {
        Self::new(row..row + 1, cols)
    }

    /// One column spanning several rows.
    pub fn span_rows(rows: Range<usize>, col: usize) -> Self {
        Self::new(rows, col..col + 1)
    }

    fn overlaps(&self, other: &GridArea) -> bool {
        self.rows.start < other.rows.end
            && other.rows.start < self.rows.end
            && self.cols.start < other.cols.end
            && other.cols.start < self.cols.end
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no {0} defined")]
    NoTracks(&'static str),
    #[error("invalid track size: {0}")]
    InvalidTrack(&'static str),
    #[error("zone `{0}` has an empty row or column span")]
    EmptySpan(ZoneId),
    #[error("zone `{zone}` exceeds the grid ({rows} rows x {cols} cols)")]
    OutOfBounds {
        zone: ZoneId,
        rows: usize,
        cols: usize,
    },
    #[error("zone `{zone}` overlaps zone `{other}`")]
    Overlap { zone: ZoneId, other: ZoneId },
    #[error("zone `{0}` is already placed")]
    DuplicateZone(ZoneId),
}

/// Row/column track definitions plus zone placements.
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    cols: Vec<GridSize>,
    rows: Vec<GridSize>,
    gap: u16,
    areas: Vec<(ZoneId, GridArea)>,
}

impl GridLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_col(&mut self, size: GridSize) -> &mut Self {
        self.cols.push(size);
        self
    }

    pub fn add_row(&mut self, size: GridSize) -> &mut Self {
        self.rows.push(size);
        self
    }

    /// Gap in cells between adjacent tracks, applied on both axes.
    pub fn with_gap(&mut self, gap: u16) -> &mut Self {
        self.gap = gap;
        self
    }

    pub fn gap(&self) -> u16 {
        self.gap
    }

    /// Place a zone. Fails fast when the area is empty, out of bounds, or
    /// overlaps a zone that is already placed.
    pub fn place(&mut self, zone: impl Into<ZoneId>, area: GridArea) -> Result<(), GridError> {
        let zone = zone.into();
        if self.rows.is_empty() {
            return Err(GridError::NoTracks("rows"));
        }
        if self.cols.is_empty() {
            return Err(GridError::NoTracks("columns"));
        }
        if area.rows.is_empty() || area.cols.is_empty() {
            return Err(GridError::EmptySpan(zone));
        }
        if area.rows.end > self.rows.len() || area.cols.end > self.cols.len() {
            return Err(GridError::OutOfBounds {
                zone,
                rows: self.rows.len(),
                cols: self.cols.len(),
            });
        }
        for (existing, placed) in &self.areas {
            if *existing == zone {
                return Err(GridError::DuplicateZone(zone));
            }
            if placed.overlaps(&area) {
                return Err(GridError::Overlap {
                    zone,
                    other: existing.clone(),
                });
            }
        }
        self.areas.push((zone, area));
        Ok(())
    }

    pub fn zones(&self) -> impl Iterator<Item = &str> {
        self.areas.iter().map(|(id, _)| id.as_str())
    }

    /// Solve the grid for a terminal size, returning rects keyed by zone id.
    pub fn solve(&self, size: Size) -> Result<HashMap<ZoneId, Rect>, GridError> {
        self.solve_in(Rect::from_size(size))
    }

    /// Solve the grid inside `area`; returned rects are absolute.
    pub fn solve_in(&self, area: Rect) -> Result<HashMap<ZoneId, Rect>, GridError> {
        if self.rows.is_empty() {
            return Err(GridError::NoTracks("rows"));
        }
        if self.cols.is_empty() {
            return Err(GridError::NoTracks("columns"));
        }

        let col_offsets = track_offsets(&self.cols, area.width, self.gap);
        let row_offsets = track_offsets(&self.rows, area.height, self.gap);

        let mut rects = HashMap::with_capacity(self.areas.len());
        for (zone, placed) in &self.areas {
            let (x, width) = span_extent(&col_offsets, &placed.cols);
            let (y, height) = span_extent(&row_offsets, &placed.rows);
            rects.insert(
                zone.clone(),
                Rect::new(area.x + x, area.y + y, width, height),
            );
        }
        Ok(rects)
    }
}

/// (start, length) of every track along one axis.
fn track_offsets(tracks: &[GridSize], available: u16, gap: u16) -> Vec<(u16, u16)> {
    let gap_total = gap.saturating_mul(tracks.len().saturating_sub(1) as u16);
    let lengths = distribute(tracks, available.saturating_sub(gap_total));

    let mut cursor = 0u16;
    lengths
        .into_iter()
        .map(|len| {
            let start = cursor;
            cursor = cursor.saturating_add(len).saturating_add(gap);
            (start, len)
        })
        .collect()
}

fn span_extent(offsets: &[(u16, u16)], span: &Range<usize>) -> (u16, u16) {
    let (start, _) = offsets[span.start];
    let (last_start, last_len) = offsets[span.end - 1];
    (start, last_start + last_len - start)
}

fn distribute(tracks: &[GridSize], space: u16) -> Vec<u16> {
    let space = space as u32;
    let mut lengths = vec![0u32; tracks.len()];

    let mut used = 0u32;
    for (len, track) in lengths.iter_mut().zip(tracks) {
        if let GridSize::Fixed(value) = track {
            *len = (*value as u32).min(space.saturating_sub(used));
            used += *len;
        }
    }

    let after_fixed = space.saturating_sub(used);
    let pct_total: u32 = tracks
        .iter()
        .filter_map(|track| match track {
            GridSize::Percent(pct) => Some(pct.get() as u32),
            _ => None,
        })
        .sum();
    let pct_scale = pct_total.max(100);
    for (len, track) in lengths.iter_mut().zip(tracks) {
        if let GridSize::Percent(pct) = track {
            *len = after_fixed * pct.get() as u32 / pct_scale;
            used += *len;
        }
    }

    let mut remaining = space.saturating_sub(used);
    let flex_total: u32 = tracks
        .iter()
        .filter_map(|track| match track {
            GridSize::Flex(weight) => Some(weight.get() as u32),
            _ => None,
        })
        .sum();
    if flex_total > 0 {
        let pool = remaining;
        for (len, track) in lengths.iter_mut().zip(tracks) {
            if let GridSize::Flex(weight) = track {
                *len = pool * weight.get() as u32 / flex_total;
                remaining -= *len;
            }
        }
        // Rounding leftovers go to flex tracks front to back.
        let flex_indices: Vec<usize> = tracks
            .iter()
            .enumerate()
            .filter(|(_, track)| matches!(track, GridSize::Flex(_)))
            .map(|(idx, _)| idx)
            .collect();
        let mut cursor = 0;
        while remaining > 0 {
            lengths[flex_indices[cursor % flex_indices.len()]] += 1;
            remaining -= 1;
            cursor += 1;
        }
    }

    lengths.into_iter().map(|len| len as u16).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size_fixed() {
        let size = GridSize::Fixed(20);
        assert_eq!(size, GridSize::Fixed(20));
    }

    #[test]
    fn test_grid_size_flex() {
        let size = GridSize::flex(2);
        match size {
            GridSize::Flex(n) => assert_eq!(n.get(), 2),
            _ => panic!("Expected Flex variant"),
        }
    }

    #[test]
    #[should_panic(expected = "Flex size must be non-zero")]
    fn test_grid_size_flex_zero_panics() {
        GridSize::flex(0);
    }

    #[test]
    #[should_panic(expected = "Percent must be 1-100")]
    fn test_grid_size_percent_over_100_panics() {
        GridSize::percent(101);
    }

    #[test]
    fn fallible_constructors_reject_bad_tracks() {
        assert_eq!(GridSize::try_flex(3), Ok(GridSize::flex(3)));
        assert!(matches!(GridSize::try_flex(0), Err(GridError::InvalidTrack(_))));
        assert_eq!(GridSize::try_percent(100), Ok(GridSize::percent(100)));
        assert!(matches!(GridSize::try_percent(0), Err(GridError::InvalidTrack(_))));
        assert!(matches!(GridSize::try_percent(101), Err(GridError::InvalidTrack(_))));
    }

    fn bento() -> GridLayout {
        let mut grid = GridLayout::new();
        grid.add_col(GridSize::flex(1))
            .add_col(GridSize::flex(2))
            .add_col(GridSize::flex(1));
        grid.add_row(GridSize::flex(1))
            .add_row(GridSize::flex(2))
            .add_row(GridSize::flex(1));
        grid
    }

    #[test]
    fn flex_tracks_split_proportionally() {
        let mut grid = bento();
        grid.place("left", GridArea::cell(1, 0)).unwrap();
        grid.place("middle", GridArea::cell(1, 1)).unwrap();
        grid.place("right", GridArea::cell(1, 2)).unwrap();

        let rects = grid.solve(Size::new(40, 20)).unwrap();
        assert_eq!(rects["left"], Rect::new(0, 5, 10, 10));
        assert_eq!(rects["middle"], Rect::new(10, 5, 20, 10));
        assert_eq!(rects["right"], Rect::new(30, 5, 10, 10));
    }

    #[test]
    fn spans_include_gaps() {
        let mut grid = bento();
        grid.with_gap(1);
        grid.place("top", GridArea::span_cols(0, 0..2)).unwrap();
        grid.place("corner", GridArea::cell(0, 2)).unwrap();

        // 42 columns minus 2 gaps leaves 40: tracks of 10, 20, 10.
        let rects = grid.solve(Size::new(42, 10)).unwrap();
        assert_eq!(rects["top"].x, 0);
        assert_eq!(rects["top"].width, 31);
        assert_eq!(rects["corner"].x, 32);
        assert_eq!(rects["corner"].width, 10);
    }

    #[test]
    fn solve_in_offsets_rects() {
        let mut grid = bento();
        grid.place("cell", GridArea::cell(0, 0)).unwrap();
        let rects = grid.solve_in(Rect::new(5, 2, 40, 20)).unwrap();
        assert_eq!(rects["cell"].x, 5);
        assert_eq!(rects["cell"].y, 2);
    }

    #[test]
    fn leftover_cells_are_not_lost() {
        let mut grid = bento();
        grid.place("row", GridArea::span_cols(0, 0..3)).unwrap();
        let rects = grid.solve(Size::new(41, 7)).unwrap();
        assert_eq!(rects["row"].width, 41);
    }

    #[test]
    fn mixed_fixed_and_percent() {
        let mut grid = GridLayout::new();
        grid.add_col(GridSize::Fixed(10))
            .add_col(GridSize::percent(50))
            .add_col(GridSize::flex(1));
        grid.add_row(GridSize::flex(1));
        grid.place("a", GridArea::cell(0, 0)).unwrap();
        grid.place("b", GridArea::cell(0, 1)).unwrap();
        grid.place("c", GridArea::cell(0, 2)).unwrap();

        let rects = grid.solve(Size::new(50, 4)).unwrap();
        assert_eq!(rects["a"].width, 10);
        assert_eq!(rects["b"].width, 20);
        assert_eq!(rects["c"].width, 20);
    }

    #[test]
    fn place_rejects_overlap_and_bounds() {
        let mut grid = bento();
        grid.place("a", GridArea::span_cols(0, 0..2)).unwrap();
        assert_eq!(
            grid.place("b", GridArea::cell(0, 1)),
            Err(GridError::Overlap {
                zone: "b".into(),
                other: "a".into()
            })
        );
        assert!(matches!(
            grid.place("c", GridArea::cell(3, 0)),
            Err(GridError::OutOfBounds { .. })
        ));
        assert_eq!(
            grid.place("a", GridArea::cell(2, 2)),
            Err(GridError::DuplicateZone("a".into()))
        );
        assert_eq!(
            grid.place("d", GridArea::new(1..1, 0..1)),
            Err(GridError::EmptySpan("d".into()))
        );
    }

    #[test]
    fn solve_without_tracks_fails() {
        let grid = GridLayout::new();
        assert_eq!(
            grid.solve(Size::new(10, 10)),
            Err(GridError::NoTracks("rows"))
        );
    }
}
