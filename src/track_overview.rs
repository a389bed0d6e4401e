//! Full-chromosome minimap with the draggable viewport indicator.
//!
//! The overview projects every gene onto the fixed full-extent scale; its
//! projection never changes with zoom, only the indicator rectangle does.
//! Sub-pixel genes stay selectable through oversized invisible hit targets.

use crate::chromosome::{Chromosome, Gene};
use crate::gene_index::GeneIndex;
use crate::interaction::InteractionState;
use crate::viewport::Margins;
use crate::zoom::ZoomController;
use eframe::egui::{
    self, Align2, Color32, CornerRadius, FontFamily, FontId, Pos2, Rect, Sense, Stroke,
    StrokeKind, Vec2,
};
use std::time::Instant;

pub const TRACK_HEIGHT: f32 = 64.0;
/// Minimum width of a gene's invisible hit target.
pub const HIT_MIN_WIDTH_PX: f32 = 10.0;
/// Vertical padding of the hit target beyond the glyph.
pub const HIT_PAD_PX: f32 = 5.0;

const MARGIN_PX: f64 = 12.0;
const BAR_HEIGHT: f32 = 16.0;

/// Widens a glyph rect into its pointer target: at least
/// [`HIT_MIN_WIDTH_PX`] wide and padded vertically by [`HIT_PAD_PX`], so a
/// sub-pixel gene still takes clicks.
pub fn expanded_hit(rect: Rect) -> Rect {
    let extra_w = (HIT_MIN_WIDTH_PX - rect.width()).max(0.0) / 2.0;
    rect.expand2(Vec2::new(extra_w, HIT_PAD_PX))
}

#[derive(Clone, Debug)]
struct GlyphHit {
    index: usize,
    rect: Rect,
    hit: Rect,
}

#[derive(Debug)]
pub struct OverviewTrack {
    area: Rect,
    glyphs: Vec<GlyphHit>,
    dragging_indicator: bool,
}

impl OverviewTrack {
    pub fn new() -> Self {
        Self {
            area: Rect::NOTHING,
            glyphs: vec![],
            dragging_indicator: false,
        }
    }

    pub fn render(
        &mut self,
        ui: &mut egui::Ui,
        chromosome: &Chromosome,
        genes: &[Gene],
        index: &GeneIndex,
        zoom: &mut ZoomController,
        interaction: &mut InteractionState,
    ) {
        let width = ui.available_width();
        let (response, painter) =
            ui.allocate_painter(Vec2::new(width, TRACK_HEIGHT), Sense::click_and_drag());
        self.area = response.rect;

        let margins = Margins::new(MARGIN_PX, MARGIN_PX);
        // Fixed full-extent scale: the overview never zooms.
        let scale = margins.span(width as f64) / zoom.length();
        let left = self.area.left() + margins.left as f32;
        let bar = Rect::from_center_size(
            Pos2::new(self.area.center().x, self.area.center().y),
            Vec2::new(margins.span(width as f64) as f32, BAR_HEIGHT),
        );

        painter.rect_filled(
            bar,
            CornerRadius::same(8),
            Color32::from_rgb(0xe8, 0xe4, 0xdc),
        );
        painter.rect_stroke(
            bar,
            CornerRadius::same(8),
            Stroke::new(1.0, Color32::from_rgb(0xa0, 0x9a, 0x90)),
            StrokeKind::Inside,
        );
        painter.text(
            Pos2::new(left, self.area.top() + 2.0),
            Align2::LEFT_TOP,
            &chromosome.name,
            FontId {
                size: 10.0,
                family: FontFamily::Proportional,
            },
            Color32::from_rgb(0x60, 0x60, 0x60),
        );

        self.layout_glyphs(genes, left, scale, bar);
        for glyph in &self.glyphs {
            let gene = &genes[glyph.index];
            let visual = interaction.visual_for(&gene.id, index.color_of(&gene.id));
            painter.rect_filled(glyph.rect, CornerRadius::ZERO, visual.fill);
            if visual.stroke != Stroke::NONE {
                painter.rect_stroke(
                    glyph.rect.expand(1.0),
                    CornerRadius::ZERO,
                    visual.stroke,
                    StrokeKind::Outside,
                );
            }
        }

        // Viewport indicator: the committed region on the overview scale.
        let region = zoom.region();
        let full_view = zoom.model().is_full_view();
        let indicator = Rect::from_min_max(
            Pos2::new(
                left + (region.start * scale) as f32,
                self.area.top() + 4.0,
            ),
            Pos2::new(
                left + (region.end * scale) as f32,
                self.area.bottom() - 4.0,
            ),
        );
        painter.rect_filled(
            indicator,
            CornerRadius::same(3),
            Color32::from_rgba_unmultiplied(0x4a, 0x72, 0xb8, 40),
        );
        painter.rect_stroke(
            indicator,
            CornerRadius::same(3),
            Stroke::new(1.5, Color32::from_rgb(0x4a, 0x72, 0xb8)),
            StrokeKind::Inside,
        );

        // Indicator drag: same-width region translated through the fixed
        // overview scale. Disabled in full view, where the indicator spans
        // the whole bar anyway.
        if response.drag_started() {
            self.dragging_indicator = !full_view
                && response
                    .interact_pointer_pos()
                    .is_some_and(|pos| indicator.contains(pos));
        }
        if response.drag_stopped() {
            self.dragging_indicator = false;
        }
        if self.dragging_indicator && response.dragged() {
            let delta_bp = response.drag_delta().x as f64 / scale;
            zoom.pan_bp(delta_bp);
        }

        if !self.dragging_indicator {
            let target = response.hover_pos().and_then(|pos| self.glyph_at(pos));
            let target_id = target.map(|i| genes[i].id.as_str());
            interaction.set_hovered(target_id, Instant::now());
        }

        if response.clicked() {
            match response
                .interact_pointer_pos()
                .and_then(|pos| self.glyph_at(pos))
            {
                // Glyph click selects; it never falls through to the
                // background handler below.
                Some(i) => interaction.select(&genes[i].id),
                None => interaction.clear_selection(),
            }
        }
    }

    fn layout_glyphs(&mut self, genes: &[Gene], left: f32, scale: f64, bar: Rect) {
        self.glyphs.clear();
        for (index, gene) in genes.iter().enumerate() {
            let x0 = left + (gene.start * scale) as f32;
            let x1 = left + (gene.end * scale) as f32;
            let rect = Rect::from_min_max(
                Pos2::new(x0, bar.top() + 2.0),
                Pos2::new(x1.max(x0 + 1.0), bar.bottom() - 2.0),
            );
            self.glyphs.push(GlyphHit {
                index,
                rect,
                hit: expanded_hit(rect),
            });
        }
    }

    fn glyph_at(&self, pos: Pos2) -> Option<usize> {
        self.glyphs
            .iter()
            .find(|glyph| glyph.hit.contains(pos))
            .map(|glyph| glyph.index)
    }
}

impl Default for OverviewTrack {
    fn default() -> Self {
        Self::new()
    }
}
