/// Integer size measured in terminal character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Rectangle area anchored within the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the cell at `(column, row)` lies inside the rectangle.
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x && column < self.right() && row >= self.y && row < self.bottom()
    }

    /// Shrink the rectangle by `dx` columns and `dy` rows on every side.
    pub fn inset(&self, dx: u16, dy: u16) -> Rect {
        let width = self.width.saturating_sub(dx.saturating_mul(2));
        let height = self.height.saturating_sub(dy.saturating_mul(2));
        Rect::new(
            self.x.saturating_add(dx.min(self.width / 2)),
            self.y.saturating_add(dy.min(self.height / 2)),
            width,
            height,
        )
    }

    /// Offset the rectangle by the origin of `outer`.
    pub fn offset_by(&self, outer: Rect) -> Rect {
        Rect::new(
            self.x.saturating_add(outer.x),
            self.y.saturating_add(outer.y),
            self.width,
            self.height,
        )
    }

    /// A `width` x `height` rectangle centered inside `self`, clamped to it.
    pub fn centered(&self, width: u16, height: u16) -> Rect {
        let width = width.min(self.width);
        let height = height.min(self.height);
        Rect::new(
            self.x + (self.width - width) / 2,
            self.y + (self.height - height) / 2,
            width,
            height,
        )
    }

    /// Largest centered rectangle whose cells keep a `cols:rows` ratio.
    ///
    /// Terminal cells are roughly twice as tall as they are wide, so a
    /// `2:1` ratio reads as a square on screen.
    pub fn fit_aspect(&self, cols: u16, rows: u16) -> Rect {
        if cols == 0 || rows == 0 || self.is_empty() {
            return *self;
        }
        let by_height = (self.height as u32 * cols as u32 / rows as u32).min(u16::MAX as u32) as u16;
        if by_height <= self.width {
            self.centered(by_height, self.height)
        } else {
            let by_width = (self.width as u32 * rows as u32 / cols as u32) as u16;
            self.centered(self.width, by_width)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(2, 3, 4, 2);
        assert!(rect.contains(2, 3));
        assert!(rect.contains(5, 4));
        assert!(!rect.contains(6, 4));
        assert!(!rect.contains(5, 5));
        assert!(!rect.contains(1, 3));
    }

    #[test]
    fn inset_never_underflows() {
        let rect = Rect::new(0, 0, 3, 2);
        let inner = rect.inset(4, 4);
        assert_eq!(inner.width, 0);
        assert_eq!(inner.height, 0);
    }

    #[test]
    fn centered_clamps_to_outer() {
        let outer = Rect::new(10, 5, 20, 10);
        assert_eq!(outer.centered(10, 4), Rect::new(15, 8, 10, 4));
        assert_eq!(outer.centered(40, 40), outer);
    }

    #[test]
    fn fit_aspect_prefers_full_height() {
        let outer = Rect::new(0, 0, 100, 20);
        assert_eq!(outer.fit_aspect(2, 1), Rect::new(30, 0, 40, 20));

        let narrow = Rect::new(0, 0, 20, 30);
        assert_eq!(narrow.fit_aspect(2, 1), Rect::new(0, 10, 20, 10));
    }
}
