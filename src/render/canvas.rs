//! Off-screen cell buffer that every frame is composed into.

use unicode_width::UnicodeWidthChar;

use crate::width::strip_ansi;
use crate::{Rect, Size};

/// Second half of a double-width glyph.
pub const CONTINUATION: char = '\0';

/// Semantic palette; the renderer maps tones onto terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Tone {
    #[default]
    Default = 0,
    Foreground,
    Secondary,
    Accent,
    Muted,
    Surface,
    OnAccent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Tone,
    pub bg: Tone,
    pub bold: bool,
    pub dim: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl CellStyle {
    pub const fn fg(tone: Tone) -> Self {
        Self {
            fg: tone,
            bg: Tone::Default,
            bold: false,
            dim: false,
            underline: false,
            reverse: false,
        }
    }

    pub const fn on(mut self, bg: Tone) -> Self {
        self.bg = bg;
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub const fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    Rounded,
    Dotted,
}

impl Border {
    // top-left, top-right, bottom-left, bottom-right, horizontal, vertical
    fn glyphs(self) -> [char; 6] {
        match self {
            Border::Rounded => ['╭', '╮', '╰', '╯', '─', '│'],
            Border::Dotted => ['┌', '┐', '└', '┘', '┄', '┆'],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Canvas {
    size: Size,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cells: vec![Cell::default(); size.width as usize * size.height as usize],
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    pub fn resize(&mut self, size: Size) {
        if size != self.size {
            *self = Self::new(size);
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.size.height {
            return &[];
        }
        let start = y as usize * self.size.width as usize;
        &self.cells[start..start + self.size.width as usize]
    }

    /// Visible text of one row, without continuation cells.
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .iter()
            .filter(|cell| cell.ch != CONTINUATION)
            .map(|cell| cell.ch)
            .collect()
    }

    pub fn set(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell { ch, style };
        }
    }

    /// Write `text` from `(x, y)` using at most `max_width` columns.
    /// Returns the number of columns written.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: CellStyle, max_width: u16) -> u16 {
        if y >= self.size.height {
            return 0;
        }
        let limit = max_width.min(self.size.width.saturating_sub(x));
        let mut used = 0u16;
        for ch in strip_ansi(text).chars() {
            let width = ch.width().unwrap_or(0) as u16;
            if width == 0 {
                continue;
            }
            if used + width > limit {
                break;
            }
            self.set(x + used, y, ch, style);
            if width == 2 {
                self.set(x + used + 1, y, CONTINUATION, style);
            }
            used += width;
        }
        used
    }

    pub fn fill(&mut self, rect: Rect, ch: char, style: CellStyle) {
        let rect = self.clip(rect);
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.set(x, y, ch, style);
            }
        }
    }

    pub fn draw_border(&mut self, rect: Rect, border: Border, style: CellStyle) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let [tl, tr, bl, br, h, v] = border.glyphs();
        let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);
        for x in rect.x + 1..right {
            self.set(x, rect.y, h, style);
            self.set(x, bottom, h, style);
        }
        for y in rect.y + 1..bottom {
            self.set(rect.x, y, v, style);
            self.set(right, y, v, style);
        }
        self.set(rect.x, rect.y, tl, style);
        self.set(right, rect.y, tr, style);
        self.set(rect.x, bottom, bl, style);
        self.set(right, bottom, br, style);
    }

    /// Restyle every cell in `rect`, keeping its glyph.
    pub fn restyle(&mut self, rect: Rect, mut f: impl FnMut(&mut CellStyle)) {
        let rect = self.clip(rect);
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if let Some(idx) = self.index(x, y) {
                    f(&mut self.cells[idx].style);
                }
            }
        }
    }

    /// Approximate reduced opacity with terminal attributes.
    pub fn fade(&mut self, rect: Rect, opacity: f32) {
        if opacity >= 0.85 {
            return;
        }
        self.restyle(rect, |style| {
            style.dim = true;
            if opacity < 0.55 {
                style.bold = false;
                if style.fg != Tone::Default {
                    style.fg = Tone::Muted;
                }
            }
        });
    }

    fn clip(&self, rect: Rect) -> Rect {
        let x = rect.x.min(self.size.width);
        let y = rect.y.min(self.size.height);
        Rect::new(
            x,
            y,
            rect.right().min(self.size.width) - x,
            rect.bottom().min(self.size.height) - y,
        )
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.size.width && y < self.size.height {
            Some(y as usize * self.size.width as usize + x as usize)
        } else {
            None
        }
    }
}
