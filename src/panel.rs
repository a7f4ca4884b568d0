//! Expanded panel: detail views for the active tile, focus trap, dismissal.
//!
//! The panel never writes the selection. It reads the active tile from the
//! controller through [`ExpandedPanel::sync`] and hands dismissal requests
//! back as [`DismissToken`]s.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::Rect;
use crate::content::ContentRecord;
use crate::controller::DismissToken;
use crate::focus::FocusRing;
use crate::tile::TileId;

const DSA_BLURB: &str = "Consistent problem solving practice with a bias toward data-structures, algorithms, and patterns that show up in real systems.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkVariant {
    Solid,
    Outline,
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    pub label: String,
    pub target: String,
    pub variant: LinkVariant,
}

impl LinkSpec {
    fn new(label: impl Into<String>, target: impl Into<String>, variant: LinkVariant) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
            variant,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTone {
    Primary,
    Secondary,
}

/// Renderer-neutral building blocks of a detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Paragraph {
        text: String,
        tone: TextTone,
    },
    Card {
        title: String,
        /// Small-caps caption instead of a bold name.
        caption: bool,
        body: Option<String>,
        tags: Vec<String>,
        links: Vec<LinkSpec>,
    },
    Field {
        label: String,
        value: String,
        link: Option<LinkSpec>,
    },
    Image {
        src: String,
        alt: String,
    },
    Links(Vec<LinkSpec>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub tile: TileId,
    pub blocks: Vec<Block>,
}

impl PanelView {
    /// Links in focus order. Renderers number links in this same order.
    pub fn links(&self) -> Vec<&LinkSpec> {
        let mut links = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Card { links: card, .. } => links.extend(card.iter()),
                Block::Field {
                    link: Some(link), ..
                } => links.push(link),
                Block::Links(list) => links.extend(list.iter()),
                _ => {}
            }
        }
        links
    }
}

/// Detail view for the selection, or `None` when nothing expandable is active.
pub fn panel_view(active: Option<TileId>, content: &ContentRecord) -> Option<PanelView> {
    let tile = active?;
    let blocks = blocks_for(tile, content)?;
    Some(PanelView { tile, blocks })
}

fn blocks_for(tile: TileId, content: &ContentRecord) -> Option<Vec<Block>> {
    let blocks = match tile {
        TileId::Profile => return None,
        TileId::Projects => {
            let mut blocks = vec![Block::Heading("Projects".into())];
            blocks.extend(content.projects.iter().map(|project| Block::Card {
                title: project.name.clone(),
                caption: false,
                body: Some(project.description.clone()),
                tags: project.tech.clone(),
                links: vec![
                    LinkSpec::new("Live Demo", &project.demo_url, LinkVariant::Solid),
                    LinkSpec::new("GitHub", &project.github_url, LinkVariant::Outline),
                ],
            }));
            blocks
        }
        TileId::Dsa => vec![
            Block::Heading("DSA".into()),
            Block::Paragraph {
                text: DSA_BLURB.into(),
                tone: TextTone::Secondary,
            },
            Block::Links(
                content
                    .dsa_profiles
                    .iter()
                    .map(|profile| {
                        LinkSpec::new(
                            format!("{} Profile", profile.platform),
                            &profile.href,
                            LinkVariant::Solid,
                        )
                    })
                    .collect(),
            ),
        ],
        TileId::Resume => vec![
            Block::Heading("Resume".into()),
            Block::Image {
                src: content.resume.preview_image.clone(),
                alt: "Resume preview".into(),
            },
            Block::Links(vec![LinkSpec::new(
                "Download Resume",
                &content.resume.download_url,
                LinkVariant::Solid,
            )]),
        ],
        TileId::Tech => {
            let mut blocks = vec![Block::Heading("Tech Stack".into())];
            blocks.extend(content.tech_stack.iter().map(|category| Block::Card {
                title: category.label.to_uppercase(),
                caption: true,
                body: None,
                tags: category.items.clone(),
                links: Vec::new(),
            }));
            blocks
        }
        TileId::Contact => {
            let mut blocks = vec![Block::Heading("Contact".into())];
            blocks.extend(content.contact.iter().map(|item| Block::Field {
                label: item.label.clone(),
                value: item.value.clone(),
                link: item
                    .href
                    .as_ref()
                    .map(|href| LinkSpec::new(&item.value, href, LinkVariant::Inline)),
            }));
            blocks
        }
        TileId::Basic => vec![
            Block::Heading("About".into()),
            Block::Paragraph {
                text: content.basic_info.headline.clone(),
                tone: TextTone::Secondary,
            },
            Block::Paragraph {
                text: content.basic_info.intro.clone(),
                tone: TextTone::Primary,
            },
            Block::Paragraph {
                text: content.basic_info.subheadline.clone(),
                tone: TextTone::Secondary,
            },
        ],
    };
    Some(blocks)
}

/// Focusable elements inside the panel surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTarget {
    Dismiss,
    Link(usize),
}

/// Where things landed on screen during the last paint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelHitMap {
    pub surface: Rect,
    pub dismiss: Option<Rect>,
    /// Visible link rectangles by link index.
    pub links: Vec<(usize, Rect)>,
    /// Content row of every link, visible or not.
    pub link_rows: Vec<(usize, u16)>,
    pub content_rows: u16,
    pub visible_rows: u16,
}

impl PanelHitMap {
    fn max_scroll(&self) -> u16 {
        self.content_rows.saturating_sub(self.visible_rows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelIntent {
    Ignored,
    /// Consumed without touching the selection (focus move, scroll, contained press).
    Handled,
    Dismiss(DismissToken),
    FollowLink(LinkSpec),
}

#[derive(Debug)]
struct MountedPanel {
    view: PanelView,
    epoch: u64,
    focus: FocusRing<PanelTarget>,
    scroll: u16,
    dismissed: bool,
    hits: PanelHitMap,
}

impl MountedPanel {
    fn new(view: PanelView, epoch: u64) -> Self {
        let mut targets = vec![PanelTarget::Dismiss];
        targets.extend((0..view.links().len()).map(PanelTarget::Link));
        let mut focus = FocusRing::new(targets);
        focus.focus(PanelTarget::Dismiss);
        Self {
            view,
            epoch,
            focus,
            scroll: 0,
            dismissed: false,
            hits: PanelHitMap::default(),
        }
    }

    /// One dismissal per expansion, however many gestures arrive.
    fn dismiss(&mut self) -> PanelIntent {
        if self.dismissed {
            return PanelIntent::Ignored;
        }
        self.dismissed = true;
        PanelIntent::Dismiss(DismissToken::new(self.epoch))
    }

    fn activate(&mut self) -> PanelIntent {
        match self.focus.current() {
            Some(PanelTarget::Link(idx)) => self.follow(idx),
            Some(PanelTarget::Dismiss) | None => self.dismiss(),
        }
    }

    fn follow(&mut self, idx: usize) -> PanelIntent {
        match self.view.links().get(idx) {
            Some(link) => {
                let link = (*link).clone();
                self.focus.focus(PanelTarget::Link(idx));
                PanelIntent::FollowLink(link)
            }
            None => PanelIntent::Ignored,
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = self.hits.max_scroll() as i32;
        self.scroll = (self.scroll as i32 + delta).clamp(0, max.max(0)) as u16;
    }

    fn reveal_focus(&mut self) {
        let Some(PanelTarget::Link(idx)) = self.focus.current() else {
            return;
        };
        let Some(&(_, row)) = self.hits.link_rows.iter().find(|(link, _)| *link == idx) else {
            return;
        };
        let visible = self.hits.visible_rows.max(1);
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + visible {
            self.scroll = row + 1 - visible;
        }
    }
}

#[derive(Debug, Default)]
pub struct ExpandedPanel {
    mounted: Option<MountedPanel>,
}

impl ExpandedPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount, remount or unmount to follow the controller. Returns true when
    /// the mounted view changed.
    pub fn sync(&mut self, active: Option<TileId>, epoch: u64, content: &ContentRecord) -> bool {
        let Some(view) = panel_view(active, content) else {
            return self.mounted.take().is_some();
        };
        match &self.mounted {
            Some(mounted) if mounted.view.tile == view.tile && mounted.epoch == epoch => false,
            _ => {
                // Focus lands on the dismiss control of every fresh mount.
                self.mounted = Some(MountedPanel::new(view, epoch));
                true
            }
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn tile(&self) -> Option<TileId> {
        self.mounted.as_ref().map(|mounted| mounted.view.tile)
    }

    pub fn view(&self) -> Option<&PanelView> {
        self.mounted.as_ref().map(|mounted| &mounted.view)
    }

    pub fn focused(&self) -> Option<PanelTarget> {
        self.mounted
            .as_ref()
            .and_then(|mounted| mounted.focus.current())
    }

    pub fn scroll(&self) -> u16 {
        self.mounted.as_ref().map_or(0, |mounted| mounted.scroll)
    }

    pub fn hits(&self) -> Option<&PanelHitMap> {
        self.mounted.as_ref().map(|mounted| &mounted.hits)
    }

    /// Record the latest paint. Keeps the scroll offset within the content.
    pub fn set_hits(&mut self, hits: PanelHitMap) {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.hits = hits;
            mounted.scroll = mounted.scroll.min(mounted.hits.max_scroll());
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> PanelIntent {
        if key.kind != KeyEventKind::Press {
            return PanelIntent::Ignored;
        }
        let Some(mounted) = self.mounted.as_mut() else {
            return PanelIntent::Ignored;
        };

        let page = mounted.hits.visible_rows.max(1) as i32;
        match key.code {
            KeyCode::Esc => mounted.dismiss(),
            KeyCode::Enter | KeyCode::Char(' ') => mounted.activate(),
            KeyCode::Tab => {
                mounted.focus.next();
                mounted.reveal_focus();
                PanelIntent::Handled
            }
            KeyCode::BackTab => {
                mounted.focus.prev();
                mounted.reveal_focus();
                PanelIntent::Handled
            }
            KeyCode::Up => {
                mounted.scroll_by(-1);
                PanelIntent::Handled
            }
            KeyCode::Down => {
                mounted.scroll_by(1);
                PanelIntent::Handled
            }
            KeyCode::PageUp => {
                mounted.scroll_by(-page);
                PanelIntent::Handled
            }
            KeyCode::PageDown => {
                mounted.scroll_by(page);
                PanelIntent::Handled
            }
            KeyCode::Home => {
                mounted.scroll = 0;
                PanelIntent::Handled
            }
            KeyCode::End => {
                mounted.scroll = mounted.hits.max_scroll();
                PanelIntent::Handled
            }
            _ => PanelIntent::Ignored,
        }
    }

    /// Primary-button press at a terminal cell. Presses inside the surface
    /// are contained; presses on the backdrop dismiss.
    pub fn handle_press(&mut self, column: u16, row: u16) -> PanelIntent {
        let Some(mounted) = self.mounted.as_mut() else {
            return PanelIntent::Ignored;
        };

        if mounted
            .hits
            .dismiss
            .is_some_and(|rect| rect.contains(column, row))
        {
            mounted.focus.focus(PanelTarget::Dismiss);
            return mounted.dismiss();
        }

        let hit_link = mounted
            .hits
            .links
            .iter()
            .find(|(_, rect)| rect.contains(column, row))
            .map(|(idx, _)| *idx);
        if let Some(idx) = hit_link {
            return mounted.follow(idx);
        }

        if mounted.hits.surface.contains(column, row) {
            PanelIntent::Handled
        } else {
            mounted.dismiss()
        }
    }

    pub fn scroll_by(&mut self, delta: i32) -> PanelIntent {
        match self.mounted.as_mut() {
            Some(mounted) => {
                mounted.scroll_by(delta);
                PanelIntent::Handled
            }
            None => PanelIntent::Ignored,
        }
    }
}
