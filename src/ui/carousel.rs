//! The simulated browser viewport: page landmarks plus the carousel box,
//! projected from CSS pixels onto terminal cells.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::core::{
    controller::{CarouselController, CarouselFrame},
    frame::LayoutProbe,
    index::SlideTransform,
    layout::{Placement, Position},
    media::{MediaElement, SimulatedMedia},
    page::VirtualPage,
    phase::{Phase, Viewport},
};

use super::spinner::PlaybackIndicator;
use super::theme::Theme;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

// ───────────────────────────────────────── projection ────────

/// Maps viewport pixels onto a letterboxed screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Screen cells covered by the viewport.
    pub screen: Rect,
    px_per_col: f64,
    px_per_row: f64,
}

impl Projection {
    /// Largest aspect-correct fit of `viewport` inside `area`.
    pub fn fit(area: Rect, viewport: Viewport) -> Option<Self> {
        if area.width == 0 || area.height == 0 || !(viewport.width > 0.0 && viewport.height > 0.0) {
            return None;
        }
        let px_per_col = (viewport.width / f64::from(area.width))
            .max(viewport.height / (f64::from(area.height) * CELL_ASPECT));
        let px_per_row = px_per_col * CELL_ASPECT;
        let cols = ((viewport.width / px_per_col).round() as u16).clamp(1, area.width);
        let rows = ((viewport.height / px_per_row).round() as u16).clamp(1, area.height);
        Some(Self {
            screen: Rect::new(
                area.x + (area.width - cols) / 2,
                area.y + (area.height - rows) / 2,
                cols,
                rows,
            ),
            px_per_col,
            px_per_row,
        })
    }

    /// Screen row of viewport `y`, if on screen.
    pub fn row(&self, y: f64) -> Option<u16> {
        let row = (y / self.px_per_row).floor();
        (row >= 0.0 && row < f64::from(self.screen.height)).then(|| self.screen.y + row as u16)
    }

    /// Screen cell of a viewport point, if on screen.
    pub fn point(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let col = (x / self.px_per_col).floor();
        if col < 0.0 || col >= f64::from(self.screen.width) {
            return None;
        }
        Some((self.screen.x + col as u16, self.row(y)?))
    }

    /// Visible part of a box.  Boxes smaller than a cell collapse onto the
    /// cell under their centre.
    pub fn rect(&self, p: &Placement) -> Option<Rect> {
        let x0 = (p.left / self.px_per_col).round().max(0.0);
        let y0 = (p.top / self.px_per_row).round().max(0.0);
        let x1 = ((p.left + p.width) / self.px_per_col)
            .round()
            .min(f64::from(self.screen.width));
        let y1 = ((p.top + p.height) / self.px_per_row)
            .round()
            .min(f64::from(self.screen.height));
        if x1 - x0 < 1.0 || y1 - y0 < 1.0 {
            let (x, y) = self.point(p.left + p.width / 2.0, p.top + p.height / 2.0)?;
            return Some(Rect::new(x, y, 1, 1));
        }
        Some(Rect::new(
            self.screen.x + x0 as u16,
            self.screen.y + y0 as u16,
            (x1 - x0) as u16,
            (y1 - y0) as u16,
        ))
    }
}

/// One glyph per clip: the showing clip, its folded neighbours, the rest.
pub fn accordion_strip(transforms: &[SlideTransform]) -> String {
    transforms
        .iter()
        .map(|t| {
            if t.opacity >= 1.0 {
                "●"
            } else if t.translate_x_pct.abs() == 50.0 {
                "○"
            } else {
                "·"
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ───────────────────────────────────────── widget ────────────

/// Created fresh each frame.
pub struct CarouselView<'a> {
    page: &'a VirtualPage,
    controller: &'a CarouselController<SimulatedMedia>,
    block: Option<Block<'a>>,
}

impl<'a> CarouselView<'a> {
    pub fn new(page: &'a VirtualPage, controller: &'a CarouselController<SimulatedMedia>) -> Self {
        Self {
            page,
            controller,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn render_page(&self, proj: &Projection, phase: Phase, buf: &mut Buffer) {
        let scroll_y = self.page.scroll_y();
        let heading_y = self.page.config().lead_in_px * 0.5 - scroll_y;
        centered(buf, proj, heading_y, "H A P P Y   B I R T H D A Y", Theme::heading_style());

        if let Some(geometry) = self.page.geometry() {
            let top = geometry.metrics.container_top;
            let bottom = top + geometry.metrics.container_height;
            centered(buf, proj, top, "┄┄┄┄ wishes ┄┄┄┄", Theme::landmark_style());
            centered(buf, proj, bottom, "┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄", Theme::landmark_style());
        }

        if phase == Phase::ScaleDown {
            if let Some((x, y)) = self
                .page
                .badge_anchor()
                .and_then(|a| proj.point(a.x, a.y))
            {
                buf.set_string(x, y, "•", Theme::anchor_style());
            }
        }
    }

    fn render_carousel(&self, frame: &CarouselFrame, proj: &Projection, buf: &mut Buffer) {
        let layout = &frame.layout;
        let placement = layout.placement(frame.geometry.carousel_top, frame.geometry.viewport);
        let Some(rect) = proj.rect(&placement) else {
            return;
        };

        if rect.width < 4 || rect.height < 3 {
            let style = if layout.silhouette {
                Theme::anchor_style()
            } else {
                Theme::caption_style()
            };
            buf.set_string(rect.x + rect.width / 2, rect.y + rect.height / 2, "●", style);
            return;
        }

        let body = if layout.silhouette {
            Theme::silhouette_style()
        } else {
            Theme::carousel_style()
        };
        let border_type = if layout.border_radius_px > 0.0 {
            BorderType::Rounded
        } else {
            BorderType::Plain
        };
        let video = self.controller.videos().get(frame.active);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(Theme::carousel_border_style(layout.position == Position::Fixed))
            .style(body);
        if let (Some(video), false) = (video, layout.silhouette) {
            block = block
                .title(format!(" {} ", video.caption))
                .title_style(Theme::title_style());
        }
        let inner = block.inner(rect);
        Clear.render(rect, buf);
        block.render(rect, buf);

        if layout.silhouette {
            return;
        }

        if let Some(element) = self.controller.pool().element(frame.active) {
            PlaybackIndicator {
                playing: !element.is_paused(),
                muted: element.is_muted(),
                position: element.current_time(),
                duration: element.duration(),
            }
            .render(rect, buf);
        }

        let mut lines = Vec::new();
        if let Some(video) = video {
            if let Some(byline) = video.byline() {
                lines.push(Line::styled(byline, Theme::caption_style()));
            }
            lines.push(Line::styled(video.media_url_for(frame.device).to_string(), Theme::dim_style()));
        }
        lines.push(Line::default());
        lines.push(Line::styled(
            accordion_strip(&self.controller.slide_transforms()),
            Theme::caption_style(),
        ));

        let used = (lines.len() as u16).min(inner.height);
        let text_area = Rect {
            y: inner.y + (inner.height - used) / 2,
            height: used,
            ..inner
        };
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(text_area, buf);
    }
}

impl Widget for CarouselView<'_> {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block.take() {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        let Some(proj) = Projection::fit(inner, self.page.viewport()) else {
            return;
        };
        buf.set_style(proj.screen, Theme::viewport_style());

        let frame = self.controller.last_frame();
        let phase = frame.map_or(Phase::ScaleUp, |f| f.sample.phase);
        // Pinned boxes stack above the page; in-flow ones sit under it.
        let pinned = frame.is_some_and(|f| f.layout.z_index.is_some());
        if pinned {
            self.render_page(&proj, phase, buf);
        }
        if let Some(frame) = frame {
            self.render_carousel(frame, &proj, buf);
        }
        if !pinned {
            self.render_page(&proj, phase, buf);
        }
    }
}

/// Write `text` centred on the screen row of viewport `y`.
fn centered(buf: &mut Buffer, proj: &Projection, y: f64, text: &str, style: Style) {
    let Some(row) = proj.row(y) else {
        return;
    };
    let width = Line::from(text).width() as u16;
    let width = width.min(proj.screen.width);
    let x = proj.screen.x + (proj.screen.width - width) / 2;
    buf.set_stringn(x, row, text, usize::from(width), style);
}
