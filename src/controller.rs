//! Tile grid controller: the single owner of the active selection.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::tile::TileId;

/// The application's only state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridState {
    #[default]
    Collapsed,
    Expanded(TileId),
}

/// What a controller call did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Unchanged,
    Opened(TileId),
    /// `Expanded(from)` went through `Collapsed` to `Expanded(to)`.
    Switched { from: TileId, to: TileId },
    Closed(TileId),
}

impl SelectionChange {
    pub fn is_change(&self) -> bool {
        !matches!(self, SelectionChange::Unchanged)
    }
}

/// Proof that a dismissal gesture was issued against one specific expansion.
///
/// Each expansion gets a fresh epoch; a token only closes the expansion it
/// was minted for, and only once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissToken {
    epoch: u64,
}

impl DismissToken {
    pub(crate) fn new(epoch: u64) -> Self {
        Self { epoch }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[derive(Debug, Default)]
pub struct TileGridController {
    active: Option<TileId>,
    epoch: u64,
}

impl TileGridController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<TileId> {
        self.active
    }

    pub fn state(&self) -> GridState {
        match self.active {
            Some(tile) => GridState::Expanded(tile),
            None => GridState::Collapsed,
        }
    }

    /// Identifies the current expansion; bumps on every entry into `Expanded`.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_active(&self, tile: TileId) -> bool {
        self.active == Some(tile)
    }

    /// Non-active, non-inert tiles fade while another tile is expanded.
    pub fn is_dimmed(&self, tile: TileId) -> bool {
        match self.active {
            Some(active) => active != tile && !tile.is_inert(),
            None => false,
        }
    }

    pub fn open(&mut self, tile: TileId) -> SelectionChange {
        if tile.is_inert() {
            return SelectionChange::Unchanged;
        }
        match self.active {
            Some(active) if active == tile => SelectionChange::Unchanged,
            Some(active) => {
                self.close();
                self.expand(tile);
                SelectionChange::Switched {
                    from: active,
                    to: tile,
                }
            }
            None => {
                self.expand(tile);
                SelectionChange::Opened(tile)
            }
        }
    }

    pub fn close(&mut self) -> SelectionChange {
        match self.active.take() {
            Some(tile) => SelectionChange::Closed(tile),
            None => SelectionChange::Unchanged,
        }
    }

    /// Close on behalf of a dismissal gesture. Stale or reused tokens are
    /// ignored.
    pub fn dismiss(&mut self, token: DismissToken) -> SelectionChange {
        if self.active.is_none() || token.epoch != self.epoch {
            return SelectionChange::Unchanged;
        }
        self.close()
    }

    /// Global key listener: Escape closes whatever is open.
    pub fn handle_key(&mut self, key: &KeyEvent) -> SelectionChange {
        if key.kind != KeyEventKind::Press {
            return SelectionChange::Unchanged;
        }
        match key.code {
            KeyCode::Esc => self.close(),
            _ => SelectionChange::Unchanged,
        }
    }

    fn expand(&mut self, tile: TileId) {
        self.epoch = self.epoch.wrapping_add(1);
        self.active = Some(tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn esc() -> KeyEvent {
        KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)
    }

    #[test]
    fn open_sets_selection_for_every_interactive_tile() {
        for tile in TileId::interactive() {
            let mut controller = TileGridController::new();
            assert_eq!(controller.open(tile), SelectionChange::Opened(tile));
            assert_eq!(controller.active(), Some(tile));
            assert_eq!(controller.state(), GridState::Expanded(tile));
        }
    }

    #[test]
    fn profile_never_becomes_active() {
        let mut controller = TileGridController::new();
        assert_eq!(controller.open(TileId::Profile), SelectionChange::Unchanged);
        assert_eq!(controller.active(), None);

        controller.open(TileId::Tech);
        assert_eq!(controller.open(TileId::Profile), SelectionChange::Unchanged);
        assert_eq!(controller.active(), Some(TileId::Tech));
    }

    #[test]
    fn close_is_idempotent() {
        let mut controller = TileGridController::new();
        assert_eq!(controller.close(), SelectionChange::Unchanged);
        controller.open(TileId::Resume);
        assert_eq!(controller.close(), SelectionChange::Closed(TileId::Resume));
        assert_eq!(controller.close(), SelectionChange::Unchanged);
        assert_eq!(controller.state(), GridState::Collapsed);
    }

    #[test]
    fn redundant_open_is_a_self_loop() {
        let mut controller = TileGridController::new();
        controller.open(TileId::Dsa);
        let epoch = controller.epoch();
        assert_eq!(controller.open(TileId::Dsa), SelectionChange::Unchanged);
        assert_eq!(controller.epoch(), epoch);
    }

    #[test]
    fn opening_another_tile_switches() {
        let mut controller = TileGridController::new();
        controller.open(TileId::Dsa);
        assert_eq!(
            controller.open(TileId::Tech),
            SelectionChange::Switched {
                from: TileId::Dsa,
                to: TileId::Tech
            }
        );
        assert_eq!(controller.active(), Some(TileId::Tech));
    }

    #[test]
    fn rapid_batch_ends_collapsed() {
        let mut controller = TileGridController::new();
        controller.open(TileId::Dsa);
        controller.open(TileId::Tech);
        controller.close();
        assert_eq!(controller.active(), None);
    }

    #[test]
    fn escape_closes_and_is_noop_when_collapsed() {
        let mut controller = TileGridController::new();
        assert_eq!(controller.handle_key(&esc()), SelectionChange::Unchanged);
        controller.open(TileId::Contact);
        assert_eq!(
            controller.handle_key(&esc()),
            SelectionChange::Closed(TileId::Contact)
        );
    }

    #[test]
    fn dismiss_token_closes_once() {
        let mut controller = TileGridController::new();
        controller.open(TileId::Projects);
        let token = DismissToken::new(controller.epoch());
        assert!(controller.dismiss(token).is_change());
        assert!(!controller.dismiss(token).is_change());
    }

    #[test]
    fn stale_token_cannot_close_a_newer_expansion() {
        let mut controller = TileGridController::new();
        controller.open(TileId::Projects);
        let stale = DismissToken::new(controller.epoch());
        controller.close();
        controller.open(TileId::Projects);
        assert_eq!(controller.dismiss(stale), SelectionChange::Unchanged);
        assert_eq!(controller.active(), Some(TileId::Projects));
    }

    #[test]
    fn dimming_skips_active_and_inert_tiles() {
        let mut controller = TileGridController::new();
        assert!(TileId::ALL.iter().all(|t| !controller.is_dimmed(*t)));
        controller.open(TileId::Basic);
        assert!(!controller.is_dimmed(TileId::Basic));
        assert!(!controller.is_dimmed(TileId::Profile));
        assert!(controller.is_dimmed(TileId::Projects));
        let active = TileId::ALL.iter().filter(|t| controller.is_active(**t)).count();
        assert_eq!(active, 1);
    }
}
