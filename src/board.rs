//! The bento board: tile grid, expanded surface and the transitions between
//! them, wired into the runtime as a plugin.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use serde_json::json;

use crate::config::{FolioConfig, ProfileStyle};
use crate::content::ContentRecord;
use crate::controller::{SelectionChange, TileGridController};
use crate::focus::FocusRing;
use crate::layout::GridLayout;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::panel::{ExpandedPanel, LinkSpec, PanelHitMap, PanelIntent};
use crate::render::Canvas;
use crate::render::compose::{
    Emphasis, TileFace, paint_backdrop, paint_footer, paint_ghost, paint_profile, paint_surface, paint_tile,
};
use crate::runtime::{EventFlow, FolioPlugin, RuntimeContext, RuntimeEvent};
use crate::tile::{TileId, bento_grid};
use crate::transition::Tween;
use crate::{Rect, Result, Size};

const TARGET: &str = "folio::board";
const WHEEL_STEP: i32 = 3;
const PANEL_MAX_WIDTH: u32 = 100;

const GRID_HINTS: &str = "tab/arrows move · enter open · q quit";
const PANEL_HINTS: &str = "tab focus · enter activate · ↑↓ scroll · esc close";

/// Presentation settings taken from [`FolioConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSettings {
    pub transition: Duration,
    pub fade: Duration,
    pub dimmed_opacity: f32,
    pub gap: u16,
    pub padding_x: u16,
    pub padding_y: u16,
    pub profile_style: ProfileStyle,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self::from(&FolioConfig::default())
    }
}

impl From<&FolioConfig> for BoardSettings {
    fn from(config: &FolioConfig) -> Self {
        Self {
            transition: config.transition(),
            fade: config.fade(),
            dimmed_opacity: config.dimmed_opacity,
            gap: config.gap,
            padding_x: config.padding_x,
            padding_y: config.padding_y,
            profile_style: config.profile_style,
        }
    }
}

/// Counters for selection transitions. A switch counts as one close and
/// one open since it passes through the collapsed state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardStats {
    pub opens: u32,
    pub closes: u32,
    pub links_followed: u32,
}

/// What the runtime should do after an input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reaction {
    pub redraw: bool,
    pub exit: bool,
}

impl Reaction {
    fn redraw() -> Self {
        Self {
            redraw: true,
            exit: false,
        }
    }

    fn exit() -> Self {
        Self {
            redraw: false,
            exit: true,
        }
    }
}

/// How a tile currently looks, for callers that do not want to inspect cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileVisual {
    pub emphasis: Emphasis,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy)]
struct SurfaceMorph {
    tile: TileId,
    tween: Tween<Rect>,
    /// Shrinking back into the tile after the panel was unmounted.
    closing: bool,
}

pub struct BentoBoard {
    content: ContentRecord,
    settings: BoardSettings,
    grid: GridLayout,
    controller: TileGridController,
    panel: ExpandedPanel,
    tile_focus: FocusRing<TileId>,
    rects: [Rect; TileId::ALL.len()],
    viewport: Size,
    footer: Rect,
    surface: Option<SurfaceMorph>,
    opacity: [Tween<f32>; TileId::ALL.len()],
    last_link: Option<LinkSpec>,
    logger: Option<Logger>,
    stats: BoardStats,
}

impl BentoBoard {
    pub fn new(content: ContentRecord, settings: BoardSettings) -> Result<Self> {
        let grid = bento_grid(settings.gap)?;
        Ok(Self {
            content,
            settings,
            grid,
            controller: TileGridController::new(),
            panel: ExpandedPanel::new(),
            tile_focus: FocusRing::new(TileId::interactive().collect()),
            rects: [Rect::default(); TileId::ALL.len()],
            viewport: Size::default(),
            footer: Rect::default(),
            surface: None,
            opacity: [Tween::settled(1.0); TileId::ALL.len()],
            last_link: None,
            logger: None,
            stats: BoardStats::default(),
        })
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn controller(&self) -> &TileGridController {
        &self.controller
    }

    pub fn panel(&self) -> &ExpandedPanel {
        &self.panel
    }

    pub fn active(&self) -> Option<TileId> {
        self.controller.active()
    }

    pub fn stats(&self) -> BoardStats {
        self.stats
    }

    pub fn last_link(&self) -> Option<&LinkSpec> {
        self.last_link.as_ref()
    }

    pub fn focused_tile(&self) -> Option<TileId> {
        self.tile_focus.current()
    }

    pub fn tile_rect(&self, tile: TileId) -> Rect {
        self.rects[tile.index()]
    }

    /// Where the surface is drawn right now, if anywhere.
    pub fn surface_rect(&self) -> Option<Rect> {
        self.surface.map(|surface| surface.tween.current())
    }

    /// Resting place of the expanded surface.
    pub fn panel_rect(&self) -> Rect {
        let area = Rect::new(0, 0, self.viewport.width, self.footer.y.min(self.viewport.height));
        let width = (area.width as u32 * 4 / 5)
            .max(area.width.min(40) as u32)
            .min(PANEL_MAX_WIDTH);
        let height = (area.height as u32 * 4 / 5).max(area.height.min(12) as u32);
        area.centered(width as u16, height as u16)
    }

    pub fn tile_visual(&self, tile: TileId) -> TileVisual {
        let emphasis = if self.controller.is_active(tile) {
            Emphasis::Promoted
        } else if !self.panel.is_mounted() && self.tile_focus.current() == Some(tile) {
            Emphasis::Focused
        } else {
            Emphasis::Idle
        };
        TileVisual {
            emphasis,
            opacity: self.opacity[tile.index()].current(),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.surface.is_some_and(|surface| !surface.tween.is_settled() || surface.closing)
            || self.opacity.iter().any(|tween| !tween.is_settled())
    }

    pub fn open(&mut self, tile: TileId) -> SelectionChange {
        let change = self.controller.open(tile);
        self.apply_change(change);
        change
    }

    pub fn close(&mut self) -> SelectionChange {
        let change = self.controller.close();
        self.apply_change(change);
        change
    }

    /// Recompute geometry for a new viewport. Running transitions jump to
    /// their end state.
    pub fn layout(&mut self, size: Size) -> Result<()> {
        self.viewport = size;
        let body_height = if size.height > 1 { size.height - 1 } else { size.height };
        self.footer = if size.height > 1 {
            Rect::new(0, size.height - 1, size.width, 1)
        } else {
            Rect::new(0, size.height, size.width, 0)
        };

        let page = Rect::new(0, 0, size.width, body_height).inset(self.settings.padding_x, self.settings.padding_y);
        let frame = page.fit_aspect(2, 1);
        let solved = self.grid.solve_in(frame)?;
        for tile in TileId::ALL {
            self.rects[tile.index()] = solved.get(tile.zone_id()).copied().unwrap_or_default();
        }

        self.surface = match self.surface {
            Some(surface) if !surface.closing => {
                let mut surface = surface;
                surface.tween.snap(self.panel_rect());
                Some(surface)
            }
            _ => None,
        };
        for tween in self.opacity.iter_mut() {
            tween.snap(tween.target());
        }

        self.log(
            LogLevel::Debug,
            "layout_solved",
            [
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
                json_kv("frame_width", json!(frame.width)),
                json_kv("frame_height", json!(frame.height)),
            ],
        );
        Ok(())
    }

    /// Advance transitions. Returns true when the frame needs repainting.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let mut changed = false;
        if let Some(surface) = self.surface.as_mut() {
            changed |= surface.tween.advance(dt);
            if surface.closing && surface.tween.is_settled() {
                self.surface = None;
                changed = true;
            }
        }
        for tween in self.opacity.iter_mut() {
            changed |= tween.advance(dt);
        }
        changed
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Reaction {
        if key.kind == KeyEventKind::Release {
            return Reaction::default();
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Reaction::exit();
        }

        if self.panel.is_mounted() {
            let intent = self.panel.handle_key(key);
            if intent != PanelIntent::Ignored {
                return self.apply_intent(intent);
            }
        } else {
            match key.code {
                KeyCode::Tab | KeyCode::Right | KeyCode::Down => {
                    self.tile_focus.next();
                    return Reaction::redraw();
                }
                KeyCode::BackTab | KeyCode::Left | KeyCode::Up => {
                    self.tile_focus.prev();
                    return Reaction::redraw();
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let Some(tile) = self.tile_focus.current() else {
                        return Reaction::default();
                    };
                    return Reaction {
                        redraw: self.open(tile).is_change(),
                        exit: false,
                    };
                }
                _ => {}
            }
        }

        if key.code == KeyCode::Char('q') {
            return Reaction::exit();
        }

        let change = self.controller.handle_key(key);
        self.apply_change(change);
        Reaction {
            redraw: change.is_change(),
            exit: false,
        }
    }

    pub fn handle_mouse(&mut self, mouse: &MouseEvent) -> Reaction {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.press(mouse.column, mouse.row),
            MouseEventKind::ScrollUp => {
                let intent = self.panel.scroll_by(-WHEEL_STEP);
                self.apply_intent(intent)
            }
            MouseEventKind::ScrollDown => {
                let intent = self.panel.scroll_by(WHEEL_STEP);
                self.apply_intent(intent)
            }
            _ => Reaction::default(),
        }
    }

    fn press(&mut self, column: u16, row: u16) -> Reaction {
        if self.panel.is_mounted() {
            let intent = self.panel.handle_press(column, row);
            return self.apply_intent(intent);
        }
        // The closing outline does not take input.
        let hit = TileId::interactive().find(|tile| self.tile_rect(*tile).contains(column, row));
        match hit {
            Some(tile) => {
                self.tile_focus.focus(tile);
                self.open(tile);
                Reaction::redraw()
            }
            None => Reaction::default(),
        }
    }

    fn apply_intent(&mut self, intent: PanelIntent) -> Reaction {
        match intent {
            PanelIntent::Ignored => Reaction::default(),
            PanelIntent::Handled => Reaction::redraw(),
            PanelIntent::Dismiss(token) => {
                let change = self.controller.dismiss(token);
                self.apply_change(change);
                Reaction::redraw()
            }
            PanelIntent::FollowLink(link) => {
                self.follow_link(link);
                Reaction::redraw()
            }
        }
    }

    fn follow_link(&mut self, link: LinkSpec) {
        self.stats.links_followed += 1;
        self.log(
            LogLevel::Info,
            "link_followed",
            [
                json_kv("label", json!(link.label)),
                json_kv("target", json!(link.target)),
            ],
        );
        self.last_link = Some(link);
    }

    fn apply_change(&mut self, change: SelectionChange) {
        match change {
            SelectionChange::Unchanged => return,
            SelectionChange::Opened(tile) => {
                self.stats.opens += 1;
                self.log(LogLevel::Info, "tile_opened", [json_kv("tile", json!(tile.as_str()))]);
                self.start_opening(tile);
            }
            SelectionChange::Switched { from, to } => {
                self.stats.closes += 1;
                self.stats.opens += 1;
                self.log(
                    LogLevel::Info,
                    "tile_switched",
                    [
                        json_kv("from", json!(from.as_str())),
                        json_kv("to", json!(to.as_str())),
                    ],
                );
                self.start_opening(to);
            }
            SelectionChange::Closed(tile) => {
                self.stats.closes += 1;
                self.log(LogLevel::Info, "tile_closed", [json_kv("tile", json!(tile.as_str()))]);
                self.start_closing(tile);
                self.tile_focus.focus(tile);
            }
        }

        self.panel
            .sync(self.controller.active(), self.controller.epoch(), &self.content);
        if let Some(surface) = self.surface.filter(|surface| !surface.closing) {
            self.panel.set_hits(PanelHitMap {
                surface: surface.tween.current(),
                ..PanelHitMap::default()
            });
        }
        for tile in TileId::ALL {
            let target = if self.controller.is_dimmed(tile) {
                self.settings.dimmed_opacity
            } else {
                1.0
            };
            self.opacity[tile.index()].retarget(target, self.settings.fade);
        }
    }

    /// Reopening a tile whose outline is still shrinking grows from that outline.
    fn start_opening(&mut self, tile: TileId) {
        let from = self
            .surface
            .filter(|surface| surface.tile == tile && surface.closing)
            .map(|surface| surface.tween.current())
            .unwrap_or_else(|| self.tile_rect(tile));
        self.surface = Some(SurfaceMorph {
            tile,
            tween: Tween::new(from, self.panel_rect(), self.settings.transition),
            closing: false,
        });
    }

    /// The panel is gone already; only an outline shrinks back into the tile.
    fn start_closing(&mut self, tile: TileId) {
        let from = self
            .surface_rect()
            .filter(|_| self.surface.is_some_and(|surface| surface.tile == tile))
            .unwrap_or_else(|| self.panel_rect());
        self.surface = Some(SurfaceMorph {
            tile,
            tween: Tween::new(from, self.tile_rect(tile), self.settings.transition),
            closing: true,
        });
    }

    pub fn paint(&mut self, canvas: &mut Canvas) {
        for tile in TileId::ALL {
            let rect = self.tile_rect(tile);
            if tile.is_inert() {
                paint_profile(canvas, rect, &self.content.profile, self.settings.profile_style);
            } else {
                let visual = self.tile_visual(tile);
                paint_tile(
                    canvas,
                    rect,
                    TileFace {
                        tile,
                        teaser: tile.teaser(&self.content),
                        emphasis: visual.emphasis,
                    },
                );
            }
            canvas.fade(rect, self.opacity[tile.index()].current());
        }

        if self.panel.is_mounted() {
            paint_backdrop(canvas);
        }

        if let Some(surface) = self.surface {
            let rect = surface.tween.current();
            if surface.closing {
                paint_ghost(canvas, rect);
            } else {
                let hits = {
                    let body = self
                        .panel
                        .view()
                        .filter(|_| surface.tween.is_settled())
                        .map(|view| (view, self.panel.focused(), self.panel.scroll()));
                    paint_surface(canvas, rect, surface.tile, body)
                };
                self.panel.set_hits(hits);
            }
        }

        let note = self
            .last_link
            .as_ref()
            .map(|link| format!("→ {}: {}", link.label, link.target));
        let hints = if self.panel.is_mounted() {
            PANEL_HINTS
        } else {
            GRID_HINTS
        };
        paint_footer(canvas, self.footer, hints, note.as_deref());
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, TARGET, message, fields));
        }
    }
}

impl FolioPlugin for BentoBoard {
    fn name(&self) -> &str {
        "bento_board"
    }

    fn init(&mut self, ctx: &mut RuntimeContext) -> Result<()> {
        self.layout(ctx.viewport())?;
        ctx.request_render();
        Ok(())
    }

    fn on_event(&mut self, ctx: &mut RuntimeContext, event: &RuntimeEvent) -> Result<EventFlow> {
        let reaction = match event {
            RuntimeEvent::Key(key) => self.handle_key(key),
            RuntimeEvent::Mouse(mouse) => self.handle_mouse(mouse),
            RuntimeEvent::Resize(size) => {
                self.layout(*size)?;
                Reaction::redraw()
            }
            RuntimeEvent::Tick { elapsed } => Reaction {
                redraw: self.advance(*elapsed),
                exit: false,
            },
            RuntimeEvent::FocusGained => Reaction::redraw(),
            RuntimeEvent::Paste(_) | RuntimeEvent::FocusLost => Reaction::default(),
        };
        if reaction.redraw {
            ctx.request_render();
        }
        if reaction.exit {
            ctx.request_exit();
        }
        Ok(EventFlow::Continue)
    }

    fn paint(&mut self, canvas: &mut Canvas) -> Result<()> {
        BentoBoard::paint(self, canvas);
        Ok(())
    }
}
