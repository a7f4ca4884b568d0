//! Terminal rendition of a bento-grid portfolio.
//!
//! Seven tiles sit in a 3x3 grid. Activating one expands it into a detail
//! panel; Escape, the close control or a press on the backdrop collapse it
//! again. [`TileGridController`] owns the only piece of state that matters,
//! the optional active tile, and everything else is derived from it.

pub mod board;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod panel;
pub mod render;
pub mod runtime;
pub mod tile;
pub mod transition;
pub mod width;

pub use board::{BentoBoard, BoardSettings, BoardStats, Reaction, TileVisual};
pub use config::{FolioConfig, ProfileStyle};
pub use content::ContentRecord;
pub use controller::{DismissToken, GridState, SelectionChange, TileGridController};
pub use error::{FolioError, Result};
pub use focus::FocusRing;
pub use geometry::{Rect, Size};
pub use layout::{GridArea, GridError, GridLayout, GridSize};
pub use logging::{FileSink, LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult, MemorySink};
pub use metrics::{MetricSnapshot, RuntimeMetrics};
pub use panel::{ExpandedPanel, LinkSpec, PanelIntent, PanelTarget, PanelView, panel_view};
pub use render::{AnsiRenderer, Canvas, RendererSettings};
pub use runtime::diagnostics::LifecycleLoggerPlugin;
pub use runtime::driver::cli::{CliDriver, CliDriverError, DriverResult};
pub use runtime::{EventFlow, FolioPlugin, FolioRuntime, RuntimeConfig, RuntimeContext, RuntimeEvent};
pub use tile::TileId;
pub use transition::{Lerp, Tween};
pub use width::display_width;
