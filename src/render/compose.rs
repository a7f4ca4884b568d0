//! Painters for the board: tile faces, the expanded surface and the footer.

use unicode_width::UnicodeWidthStr;

use super::canvas::{Border, Canvas, CellStyle, Tone};
use crate::Rect;
use crate::config::ProfileStyle;
use crate::content::Profile;
use crate::panel::{Block, LinkSpec, LinkVariant, PanelHitMap, PanelTarget, PanelView, TextTone};
use crate::tile::TileId;
use crate::width::{display_width, truncate_to_width, wrap_words};

const CLOSE_LABEL: &str = "[ Close ]";

const CARD: CellStyle = CellStyle::fg(Tone::Foreground).on(Tone::Surface);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Idle,
    /// Holds keyboard focus in the grid.
    Focused,
    /// Sits under the expanded surface.
    Promoted,
}

#[derive(Debug, Clone, Copy)]
pub struct TileFace<'a> {
    pub tile: TileId,
    pub teaser: &'a str,
    pub emphasis: Emphasis,
}

pub fn paint_tile(canvas: &mut Canvas, rect: Rect, face: TileFace<'_>) {
    if rect.is_empty() {
        return;
    }
    canvas.fill(rect, ' ', CARD);
    let border = match face.emphasis {
        Emphasis::Idle => CellStyle::fg(Tone::Muted).on(Tone::Surface),
        Emphasis::Focused => CellStyle::fg(Tone::Accent).on(Tone::Surface).bold(),
        Emphasis::Promoted => CellStyle::fg(Tone::Accent).on(Tone::Surface),
    };
    canvas.draw_border(rect, Border::Rounded, border);

    let inner = rect.inset(2, 1);
    if inner.is_empty() {
        return;
    }
    let label_style = match face.emphasis {
        Emphasis::Focused => CellStyle::fg(Tone::Accent).on(Tone::Surface).bold(),
        _ => CARD.bold(),
    };
    let label = face.tile.label().to_uppercase();
    canvas.put_str(inner.x, inner.y, &label, label_style, inner.width);

    let teaser = wrap_words(face.teaser, inner.width as usize);
    let room = inner.height.saturating_sub(2) as usize;
    for (offset, line) in teaser.iter().take(room).enumerate() {
        canvas.put_str(
            inner.x,
            inner.y + 2 + offset as u16,
            line,
            CellStyle::fg(Tone::Secondary).on(Tone::Surface),
            inner.width,
        );
    }

    if face.emphasis == Emphasis::Focused && inner.height >= 2 {
        let hint = "open ›";
        let width = hint.width() as u16;
        if width <= inner.width {
            canvas.put_str(
                inner.right() - width,
                inner.bottom() - 1,
                hint,
                CellStyle::fg(Tone::Accent).on(Tone::Surface),
                width,
            );
        }
    }
}

/// The decorative profile tile.
pub fn paint_profile(canvas: &mut Canvas, rect: Rect, profile: &Profile, style: ProfileStyle) {
    if rect.is_empty() {
        return;
    }
    let frame = CellStyle::fg(Tone::Muted).on(Tone::Surface);
    canvas.fill(rect, ' ', CARD);
    canvas.draw_border(rect, Border::Rounded, frame);
    let inner = rect.inset(1, 1);
    if inner.is_empty() {
        return;
    }
    let initials = profile.initials();

    match style {
        ProfileStyle::Portrait => {
            // Image fills the tile; the caption sits over its lower edge.
            canvas.fill(inner, '░', CellStyle::fg(Tone::Muted).on(Tone::Surface));
            let mid = inner.y + inner.height.saturating_sub(3) / 2;
            center_str(canvas, inner, mid, &initials, CARD.bold());
            if inner.height >= 3 {
                let name_row = inner.bottom() - 2;
                let band = Rect::new(inner.x, name_row, inner.width, 2);
                canvas.fill(band, ' ', CARD);
                center_str(canvas, inner, name_row, &profile.name, CARD.bold());
                center_str(
                    canvas,
                    inner,
                    name_row + 1,
                    &profile.role,
                    CellStyle::fg(Tone::Secondary).on(Tone::Surface),
                );
            }
        }
        ProfileStyle::Avatar => {
            let avatar_width = (initials.width() as u16 + 4).min(inner.width);
            let top = inner.y + inner.height.saturating_sub(5) / 2;
            let avatar = Rect::new(
                inner.x + (inner.width - avatar_width) / 2,
                top,
                avatar_width,
                3.min(inner.height),
            );
            canvas.draw_border(avatar, Border::Rounded, CellStyle::fg(Tone::Accent).on(Tone::Surface));
            center_str(canvas, inner, top + 1, &initials, CARD.bold());
            center_str(canvas, inner, top + 3, &profile.name, CARD.bold());
            center_str(
                canvas,
                inner,
                top + 4,
                &profile.role,
                CellStyle::fg(Tone::Secondary).on(Tone::Surface),
            );
        }
    }
}

/// Dim everything behind the expanded surface.
pub fn paint_backdrop(canvas: &mut Canvas) {
    let bounds = canvas.bounds();
    canvas.fade(bounds, 0.7);
}

/// Outline left behind by a surface shrinking back into its tile.
pub fn paint_ghost(canvas: &mut Canvas, rect: Rect) {
    canvas.draw_border(rect, Border::Dotted, CellStyle::fg(Tone::Accent));
}

/// Paint the expanded surface. `body` is omitted while the surface is still
/// morphing out of its tile.
pub fn paint_surface(
    canvas: &mut Canvas,
    rect: Rect,
    tile: TileId,
    body: Option<(&PanelView, Option<PanelTarget>, u16)>,
) -> PanelHitMap {
    let mut hits = PanelHitMap {
        surface: rect,
        ..PanelHitMap::default()
    };
    if rect.width < 4 || rect.height < 3 {
        return hits;
    }

    canvas.fill(rect, ' ', CARD);
    canvas.draw_border(rect, Border::Rounded, CellStyle::fg(Tone::Accent).on(Tone::Surface));
    let title = format!(" {} ", tile.label());
    canvas.put_str(
        rect.x + 2,
        rect.y,
        &title,
        CellStyle::fg(Tone::Accent).on(Tone::Surface).bold(),
        rect.width.saturating_sub(4),
    );

    let Some((view, focus, scroll)) = body else {
        return hits;
    };

    let close_width = CLOSE_LABEL.width() as u16;
    if rect.width >= close_width + 4 {
        let close = Rect::new(rect.right() - 2 - close_width, rect.y + 1, close_width, 1);
        let style = if focus == Some(PanelTarget::Dismiss) {
            CellStyle::fg(Tone::Accent).on(Tone::Surface).bold().reverse()
        } else {
            CellStyle::fg(Tone::Secondary).on(Tone::Surface)
        };
        canvas.put_str(close.x, close.y, CLOSE_LABEL, style, close.width);
        hits.dismiss = Some(close);
    }

    let area = Rect::new(
        rect.x + 2,
        rect.y + 2,
        rect.width.saturating_sub(4),
        rect.height.saturating_sub(3),
    );
    let lines = layout_blocks(&view.blocks, area.width);
    hits.content_rows = lines.len() as u16;
    hits.visible_rows = area.height;
    for (row, line) in lines.iter().enumerate() {
        for span in &line.spans {
            if let Some(idx) = span.link {
                hits.link_rows.push((idx, row as u16));
            }
        }
    }

    for (offset, line) in lines
        .iter()
        .skip(scroll as usize)
        .take(area.height as usize)
        .enumerate()
    {
        let y = area.y + offset as u16;
        let mut x = area.x + line.indent;
        for span in &line.spans {
            let remaining = area.right().saturating_sub(x);
            let mut style = span.kind.style();
            if span.link.is_some() && focus == span.link.map(PanelTarget::Link) {
                style = style.reverse();
            }
            let written = canvas.put_str(x, y, &span.text, style, remaining);
            if let Some(idx) = span.link {
                if written > 0 {
                    hits.links.push((idx, Rect::new(x, y, written, 1)));
                }
            }
            x += written;
        }
    }

    let marker = CellStyle::fg(Tone::Accent).on(Tone::Surface);
    let marker_x = rect.right() - 2;
    if scroll > 0 {
        canvas.set(marker_x, area.y, '▴', marker);
    }
    if (scroll as usize + area.height as usize) < lines.len() {
        canvas.set(marker_x, area.bottom().saturating_sub(1), '▾', marker);
    }

    hits
}

/// Bottom status row: an optional note on the left, key hints on the right.
pub fn paint_footer(canvas: &mut Canvas, rect: Rect, hints: &str, note: Option<&str>) {
    if rect.is_empty() {
        return;
    }
    canvas.fill(rect, ' ', CellStyle::default());
    let mut used = 0;
    if let Some(note) = note {
        used = canvas.put_str(rect.x + 1, rect.y, note, CellStyle::fg(Tone::Accent), rect.width.saturating_sub(1)) + 2;
    }
    let hint_width = display_width(hints) as u16;
    if used + hint_width + 1 <= rect.width {
        canvas.put_str(
            rect.right() - hint_width - 1,
            rect.y,
            hints,
            CellStyle::fg(Tone::Muted),
            hint_width,
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Heading,
    Title,
    Caption,
    Body,
    Secondary,
    Label,
    Tag,
    Image,
    Link(LinkVariant),
}

impl SpanKind {
    fn style(self) -> CellStyle {
        match self {
            SpanKind::Heading => CellStyle::fg(Tone::Accent).on(Tone::Surface).bold().underline(),
            SpanKind::Title => CARD.bold(),
            SpanKind::Caption | SpanKind::Label => CellStyle::fg(Tone::Muted).on(Tone::Surface).bold(),
            SpanKind::Body => CARD,
            SpanKind::Secondary | SpanKind::Image => CellStyle::fg(Tone::Secondary).on(Tone::Surface),
            SpanKind::Tag => CellStyle::fg(Tone::Secondary).on(Tone::Surface),
            SpanKind::Link(LinkVariant::Solid) => CellStyle::fg(Tone::OnAccent).on(Tone::Accent).bold(),
            SpanKind::Link(LinkVariant::Outline) => CellStyle::fg(Tone::Accent).on(Tone::Surface).bold(),
            SpanKind::Link(LinkVariant::Inline) => CellStyle::fg(Tone::Accent).on(Tone::Surface).underline(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub kind: SpanKind,
    pub link: Option<usize>,
}

impl Span {
    fn plain(text: impl Into<String>, kind: SpanKind) -> Self {
        Self {
            text: text.into(),
            kind,
            link: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub indent: u16,
    pub spans: Vec<Span>,
}

impl Line {
    fn new(indent: u16, spans: Vec<Span>) -> Self {
        Self { indent, spans }
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Lay panel blocks out as rows of `width` columns. Link indices follow
/// [`PanelView::links`].
pub fn layout_blocks(blocks: &[Block], width: u16) -> Vec<Line> {
    let mut lines = Vec::new();
    if width == 0 {
        return lines;
    }
    let mut next_link = 0usize;
    let inner = width.saturating_sub(2);

    for block in blocks {
        match block {
            Block::Heading(text) => {
                lines.push(Line::new(
                    0,
                    vec![Span::plain(truncate_to_width(text, width as usize), SpanKind::Heading)],
                ));
            }
            Block::Paragraph { text, tone } => {
                let kind = match tone {
                    TextTone::Primary => SpanKind::Body,
                    TextTone::Secondary => SpanKind::Secondary,
                };
                lines.extend(
                    wrap_words(text, width as usize)
                        .into_iter()
                        .map(|row| Line::new(0, vec![Span::plain(row, kind)])),
                );
            }
            Block::Card {
                title,
                caption,
                body,
                tags,
                links,
            } => {
                let kind = if *caption { SpanKind::Caption } else { SpanKind::Title };
                lines.push(Line::new(
                    0,
                    vec![Span::plain(truncate_to_width(title, width as usize), kind)],
                ));
                if let Some(body) = body {
                    lines.extend(
                        wrap_words(body, inner as usize)
                            .into_iter()
                            .map(|row| Line::new(2, vec![Span::plain(row, SpanKind::Body)])),
                    );
                }
                let chips = tags
                    .iter()
                    .map(|tag| Span::plain(format!("[{tag}]"), SpanKind::Tag))
                    .collect();
                lines.extend(flow(chips, 2, inner, " "));
                let buttons = links
                    .iter()
                    .map(|link| link_span(link, &mut next_link))
                    .collect();
                lines.extend(flow(buttons, 2, inner, "  "));
            }
            Block::Field { label, value, link } => {
                lines.push(Line::new(
                    0,
                    vec![Span::plain(truncate_to_width(label, width as usize), SpanKind::Label)],
                ));
                let span = match link {
                    Some(link) => link_span(link, &mut next_link),
                    None => Span::plain(value.clone(), SpanKind::Body),
                };
                lines.extend(flow(vec![span], 2, inner, ""));
            }
            Block::Image { src, alt } => {
                let frame = inner.min(40).max(4);
                let bar = "─".repeat(frame as usize - 2);
                let caption = truncate_to_width(alt, frame as usize - 4);
                let pad = (frame as usize - 4).saturating_sub(caption.width());
                lines.push(Line::new(0, vec![Span::plain(format!("╭{bar}╮"), SpanKind::Image)]));
                lines.push(Line::new(
                    0,
                    vec![Span::plain(format!("│ {caption}{} │", " ".repeat(pad)), SpanKind::Image)],
                ));
                lines.push(Line::new(0, vec![Span::plain(format!("╰{bar}╯"), SpanKind::Image)]));
                lines.push(Line::new(
                    0,
                    vec![Span::plain(truncate_to_width(src, width as usize), SpanKind::Secondary)],
                ));
            }
            Block::Links(links) => {
                let buttons = links
                    .iter()
                    .map(|link| link_span(link, &mut next_link))
                    .collect();
                lines.extend(flow(buttons, 0, width, "  "));
            }
        }
        lines.push(Line::default());
    }

    while lines.last().is_some_and(|line| line.spans.is_empty()) {
        lines.pop();
    }
    lines
}

fn link_span(link: &LinkSpec, next: &mut usize) -> Span {
    let text = match link.variant {
        LinkVariant::Solid => format!("[ {} ]", link.label),
        LinkVariant::Outline => format!("‹ {} ›", link.label),
        LinkVariant::Inline => link.label.clone(),
    };
    let idx = *next;
    *next += 1;
    Span {
        text,
        kind: SpanKind::Link(link.variant),
        link: Some(idx),
    }
}

/// Pack spans left to right, starting a new row when the next one does not
/// fit. Oversized spans are truncated rather than split.
fn flow(spans: Vec<Span>, indent: u16, width: u16, sep: &str) -> Vec<Line> {
    let width = width as usize;
    let sep_width = sep.width();
    let mut lines = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut used = 0usize;

    for mut span in spans {
        if width == 0 {
            break;
        }
        let mut span_width = span.text.width();
        if span_width > width {
            span.text = truncate_to_width(&span.text, width);
            span_width = span.text.width();
        }
        if !current.is_empty() && used + sep_width + span_width > width {
            lines.push(Line::new(indent, std::mem::take(&mut current)));
            used = 0;
        }
        if !current.is_empty() {
            current.push(Span::plain(sep, SpanKind::Body));
            used += sep_width;
        }
        used += span_width;
        current.push(span);
    }
    if !current.is_empty() {
        lines.push(Line::new(indent, current));
    }
    lines
}

fn center_str(canvas: &mut Canvas, area: Rect, row: u16, text: &str, style: CellStyle) {
    if row >= area.bottom() {
        return;
    }
    let text = truncate_to_width(text, area.width as usize);
    let width = text.width() as u16;
    canvas.put_str(area.x + (area.width - width) / 2, row, &text, style, width);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Size;
    use crate::content::ContentRecord;
    use crate::panel::panel_view;

    fn view(tile: TileId) -> PanelView {
        panel_view(Some(tile), &ContentRecord::builtin()).unwrap()
    }

    #[test]
    fn link_indices_match_focus_order() {
        let view = view(TileId::Projects);
        let lines = layout_blocks(&view.blocks, 60);
        let linked: Vec<_> = lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .filter_map(|span| span.link.map(|idx| (idx, span.text.clone())))
            .collect();
        let expected = view.links();
        assert_eq!(linked.len(), expected.len());
        for (idx, text) in linked {
            assert!(text.contains(&expected[idx].label));
        }
    }

    #[test]
    fn link_variants_are_decorated() {
        let view = view(TileId::Projects);
        let lines = layout_blocks(&view.blocks, 60);
        let all: Vec<String> = lines.iter().map(Line::text).collect();
        assert!(all.iter().any(|line| line.contains("[ Live Demo ]  ‹ GitHub ›")));
    }

    #[test]
    fn layout_never_exceeds_width() {
        for tile in TileId::interactive() {
            let view = view(tile);
            for width in [12u16, 30, 80] {
                for line in layout_blocks(&view.blocks, width) {
                    assert!(
                        line.indent as usize + line.text().width() <= width as usize,
                        "{tile} overflowed {width}: {:?}",
                        line.text()
                    );
                }
            }
        }
    }

    #[test]
    fn tech_captions_are_uppercase() {
        let lines = layout_blocks(&view(TileId::Tech).blocks, 60);
        assert!(lines.iter().any(|line| line.text() == "LANGUAGES"));
    }

    #[test]
    fn surface_reports_dismiss_and_links() {
        let mut canvas = Canvas::new(Size::new(60, 20));
        let view = view(TileId::Dsa);
        let hits = paint_surface(
            &mut canvas,
            Rect::new(5, 2, 50, 16),
            TileId::Dsa,
            Some((&view, Some(PanelTarget::Dismiss), 0)),
        );
        let close = hits.dismiss.unwrap();
        assert_eq!(close.y, 3);
        assert_eq!(close.right(), 53);
        assert_eq!(hits.links.len(), 2);
        assert!(canvas.row_text(3).contains(CLOSE_LABEL));
        assert!(canvas.row_text(2).contains(" DSA "));
        assert!(hits.surface.contains(close.x, close.y));
    }

    #[test]
    fn scrolled_content_hides_early_links() {
        let mut canvas = Canvas::new(Size::new(40, 12));
        let view = view(TileId::Projects);
        let rect = Rect::new(0, 0, 40, 10);
        let top = paint_surface(&mut canvas, rect, TileId::Projects, Some((&view, None, 0)));
        assert!(top.content_rows > top.visible_rows);
        assert_eq!(top.link_rows.len(), 4);

        let end = top.content_rows - top.visible_rows;
        let bottom = paint_surface(&mut canvas, rect, TileId::Projects, Some((&view, None, end)));
        assert!(bottom.links.iter().all(|(idx, _)| *idx >= 2));
        assert!(canvas.row_text(2).contains('▴'));
    }

    #[test]
    fn morphing_surface_has_no_controls() {
        let mut canvas = Canvas::new(Size::new(20, 8));
        let hits = paint_surface(&mut canvas, Rect::new(2, 2, 12, 4), TileId::Resume, None);
        assert_eq!(hits.dismiss, None);
        assert!(hits.links.is_empty());
    }

    #[test]
    fn tile_face_shows_label_and_teaser() {
        let mut canvas = Canvas::new(Size::new(30, 8));
        paint_tile(
            &mut canvas,
            Rect::new(0, 0, 30, 8),
            TileFace {
                tile: TileId::Contact,
                teaser: "Let's talk",
                emphasis: Emphasis::Focused,
            },
        );
        assert!(canvas.row_text(1).contains("CONTACT ME"));
        assert!(canvas.row_text(3).contains("Let's talk"));
        assert!(canvas.row_text(6).contains("open ›"));
    }

    #[test]
    fn profile_styles_show_the_name() {
        let content = ContentRecord::builtin();
        for style in [ProfileStyle::Portrait, ProfileStyle::Avatar] {
            let mut canvas = Canvas::new(Size::new(30, 12));
            let bounds = canvas.bounds();
            paint_profile(&mut canvas, bounds, &content.profile, style);
            let text: String = (0..12).map(|y| canvas.row_text(y)).collect();
            assert!(text.contains(&content.profile.name), "{style:?}");
        }
    }

    #[test]
    fn footer_prefers_note_over_hints() {
        let mut canvas = Canvas::new(Size::new(20, 1));
        let bounds = canvas.bounds();
        paint_footer(&mut canvas, bounds, "a long list of hints", Some("→ GitHub"));
        assert!(canvas.row_text(0).contains("→ GitHub"));
        assert!(!canvas.row_text(0).contains("hints"));
    }
}
