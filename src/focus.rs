/// Ordered set of focusable targets with at most one focused entry.
///
/// Movement wraps around, so a ring built over a modal surface traps focus
/// inside it.
#[derive(Debug, Clone)]
pub struct FocusRing<T> {
    items: Vec<T>,
    index: Option<usize>,
}

impl<T> Default for FocusRing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: None,
        }
    }
}

impl<T: Copy + PartialEq> FocusRing<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, index: None }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current(&self) -> Option<T> {
        self.index.map(|idx| self.items[idx])
    }

    /// Focus `item`; returns false when it is not part of the ring.
    pub fn focus(&mut self, item: T) -> bool {
        match self.items.iter().position(|entry| *entry == item) {
            Some(idx) => {
                self.index = Some(idx);
                true
            }
            None => false,
        }
    }

    pub fn next(&mut self) -> Option<T> {
        self.step(1)
    }

    pub fn prev(&mut self) -> Option<T> {
        self.step(-1)
    }

    pub fn clear(&mut self) {
        self.index = None;
    }

    fn step(&mut self, delta: isize) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let len = self.items.len() as isize;
        let next = match self.index {
            Some(idx) => (idx as isize + delta).rem_euclid(len),
            None if delta >= 0 => 0,
            None => len - 1,
        };
        self.index = Some(next as usize);
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_wraps_both_ways() {
        let mut ring = FocusRing::new(vec!['a', 'b', 'c']);
        assert_eq!(ring.current(), None);
        assert_eq!(ring.next(), Some('a'));
        assert_eq!(ring.prev(), Some('c'));
        assert_eq!(ring.next(), Some('a'));
        assert_eq!(ring.next(), Some('b'));
    }

    #[test]
    fn prev_from_nothing_lands_on_last() {
        let mut ring = FocusRing::new(vec![1, 2, 3]);
        assert_eq!(ring.prev(), Some(3));
    }

    #[test]
    fn focus_unknown_item_is_rejected() {
        let mut ring = FocusRing::new(vec![1, 2]);
        assert!(ring.focus(2));
        assert!(!ring.focus(9));
        assert_eq!(ring.current(), Some(2));
        ring.clear();
        assert_eq!(ring.current(), None);
    }

    #[test]
    fn empty_ring_never_focuses() {
        let mut ring: FocusRing<u8> = FocusRing::default();
        assert_eq!(ring.next(), None);
        assert_eq!(ring.current(), None);
    }
}
