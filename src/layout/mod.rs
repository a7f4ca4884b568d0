//! Layout module orchestrator.
//!
//! The board and the panel import layout types from here; the track solver
//! lives in `grid`.

pub mod grid;

pub use grid::{GridArea, GridError, GridLayout, GridSize, ZoneId};
