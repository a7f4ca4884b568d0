pub mod canvas;
pub mod compose;
mod core;

pub use canvas::{Border, CONTINUATION, Canvas, Cell, CellStyle, Tone};
pub use compose::{Emphasis, Line, Span, SpanKind, TileFace, layout_blocks};
pub use self::core::{AnsiRenderer, RendererSettings};
