use std::io::Write;

use blake3::Hash;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};

use super::canvas::{CONTINUATION, Canvas, Cell, CellStyle, Tone};
use crate::error::Result;

/// Renderer runtime parameters.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Use 24-bit colors; otherwise fall back to the 16 named colors.
    pub truecolor: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self { truecolor: true }
    }
}

/// ANSI escape code renderer writing directly to a terminal handle.
///
/// Every row of the canvas is hashed; only rows whose hash changed since the
/// previous frame are written.
pub struct AnsiRenderer {
    settings: RendererSettings,
    row_hashes: Vec<Option<Hash>>,
}

impl AnsiRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            settings,
            row_hashes: Vec::new(),
        }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    /// Forget what is on screen so the next frame is written in full.
    pub fn invalidate(&mut self) {
        self.row_hashes.clear();
    }

    /// Flush changed rows. Returns how many rows were written.
    pub fn render(&mut self, writer: &mut impl Write, canvas: &Canvas) -> Result<usize> {
        let height = canvas.size().height as usize;
        if self.row_hashes.len() != height {
            self.row_hashes = vec![None; height];
        }

        let mut flushed = 0;
        for y in 0..canvas.size().height {
            let row = canvas.row(y);
            let hash = hash_row(row);
            if self.row_hashes[y as usize] == Some(hash) {
                continue;
            }
            move_to(writer, y, 0)?;
            self.write_row(writer, row)?;
            self.row_hashes[y as usize] = Some(hash);
            flushed += 1;
        }

        if flushed > 0 {
            queue!(writer, SetAttribute(Attribute::Reset))?;
        }
        writer.flush()?;
        Ok(flushed)
    }

    fn write_row(&self, writer: &mut impl Write, row: &[Cell]) -> Result<()> {
        let mut current: Option<CellStyle> = None;
        let mut run = String::new();
        for cell in row {
            if cell.ch == CONTINUATION {
                continue;
            }
            if current != Some(cell.style) {
                if !run.is_empty() {
                    queue!(writer, Print(&run))?;
                    run.clear();
                }
                self.apply_style(writer, cell.style)?;
                current = Some(cell.style);
            }
            run.push(cell.ch);
        }
        if !run.is_empty() {
            queue!(writer, Print(&run))?;
        }
        Ok(())
    }

    fn apply_style(&self, writer: &mut impl Write, style: CellStyle) -> Result<()> {
        queue!(
            writer,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(self.color(style.fg)),
            SetBackgroundColor(self.color(style.bg))
        )?;
        if style.bold {
            queue!(writer, SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            queue!(writer, SetAttribute(Attribute::Dim))?;
        }
        if style.underline {
            queue!(writer, SetAttribute(Attribute::Underlined))?;
        }
        if style.reverse {
            queue!(writer, SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }

    fn color(&self, tone: Tone) -> Color {
        if self.settings.truecolor {
            match tone {
                Tone::Default => Color::Reset,
                Tone::Foreground => Color::Rgb { r: 17, g: 24, b: 39 },
                Tone::Secondary => Color::Rgb { r: 75, g: 85, b: 99 },
                Tone::Accent => Color::Rgb { r: 214, g: 51, b: 132 },
                Tone::Muted => Color::Rgb { r: 156, g: 163, b: 175 },
                Tone::Surface => Color::Rgb { r: 249, g: 250, b: 251 },
                Tone::OnAccent => Color::Rgb { r: 255, g: 255, b: 255 },
            }
        } else {
            match tone {
                Tone::Default => Color::Reset,
                Tone::Foreground => Color::White,
                Tone::Secondary => Color::Grey,
                Tone::Accent => Color::Magenta,
                Tone::Muted => Color::DarkGrey,
                Tone::Surface => Color::Black,
                Tone::OnAccent => Color::White,
            }
        }
    }
}

fn move_to(writer: &mut impl Write, row: u16, col: u16) -> Result<()> {
    write!(writer, "\x1b[{};{}H", row + 1, col + 1)?;
    Ok(())
}

fn hash_row(row: &[Cell]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; 4];
    for cell in row {
        hasher.update(cell.ch.encode_utf8(&mut buf).as_bytes());
        let style = cell.style;
        hasher.update(&[
            style.fg as u8,
            style.bg as u8,
            style.bold as u8 | (style.dim as u8) << 1 | (style.underline as u8) << 2 | (style.reverse as u8) << 3,
        ]);
    }
    hasher.finalize()
}
