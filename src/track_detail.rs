//! Zoomed detail track: chromosome bar, strand lanes with directional gene
//! glyphs, tick/scale band with brush selection, and per-base letters at
//! deep zoom.
//!
//! All drawing derives from the committed region each frame; the pan and
//! brush gestures keep their own short-lived records created at gesture
//! start and dropped at gesture end.

use crate::chromosome::{Chromosome, Gene, Strand};
use crate::gene_index::{GeneIndex, VISIBILITY_BUFFER};
use crate::interaction::InteractionState;
use crate::ticks;
use crate::viewport::{Margins, ViewportRegion};
use crate::zoom::ZoomController;
use eframe::egui::{
    self, Align2, Color32, CornerRadius, FontFamily, FontId, Pos2, Rect, Sense, Shape, Stroke,
    StrokeKind, Vec2,
};
use std::time::Instant;

/// Below this projected width a glyph degenerates to a plain segment;
/// arrowhead geometry is unreadable smaller than this.
pub const ARROW_MIN_PX: f32 = 12.0;
/// Labels render only above this projected width.
pub const LABEL_MIN_PX: f32 = 20.0;
/// Per-base letters render when `region_bp / viewport_px` is at most this
/// (≥ 5 px per base).
pub const LETTERS_MAX_BP_PER_PX: f64 = 0.2;
/// Scale-band drags at or below this many pixels are accidental.
pub const BRUSH_MIN_PX: f32 = 5.0;

pub const MARGIN_PX: f64 = 12.0;
const LANE_HEIGHT: f32 = 30.0;
const GLYPH_HEIGHT: f32 = 14.0;
const BAR_HEIGHT: f32 = 24.0;
const SCALE_BAND_HEIGHT: f32 = 30.0;
const END_CAP_RADIUS: u8 = 10;

#[inline(always)]
pub fn glyph_has_arrow(width_px: f32) -> bool {
    width_px >= ARROW_MIN_PX
}

/// The label for a glyph of the given projected width. Below the threshold
/// the empty string is still laid out, keeping layout stable instead of
/// toggling visibility.
pub fn label_text(name: &str, width_px: f32) -> &str {
    if width_px > LABEL_MIN_PX { name } else { "" }
}

#[inline(always)]
pub fn letters_visible(region_width_bp: f64, viewport_px: f64) -> bool {
    viewport_px > 0.0 && region_width_bp / viewport_px <= LETTERS_MAX_BP_PER_PX
}

/// Rounded corners only where the region boundary coincides with the true
/// chromosome ends; a plain edge means the chromosome continues past it.
pub fn end_cap_radii(region: ViewportRegion, length: f64) -> CornerRadius {
    let left = if region.start <= 1e-9 { END_CAP_RADIUS } else { 0 };
    let right = if region.end >= length - 1e-9 {
        END_CAP_RADIUS
    } else {
        0
    };
    CornerRadius {
        nw: left,
        sw: left,
        ne: right,
        se: right,
    }
}

/// Directional glyph outline: a segment with a triangular cap on the 3′
/// end, cap direction flipped by strand.
pub fn arrow_points(rect: Rect, strand: Strand) -> Vec<Pos2> {
    let head = (rect.width() * 0.45).min(8.0);
    let mid_y = rect.center().y;
    match strand {
        Strand::Forward => vec![
            Pos2::new(rect.left(), rect.top()),
            Pos2::new(rect.right() - head, rect.top()),
            Pos2::new(rect.right(), mid_y),
            Pos2::new(rect.right() - head, rect.bottom()),
            Pos2::new(rect.left(), rect.bottom()),
        ],
        Strand::Reverse => vec![
            Pos2::new(rect.right(), rect.top()),
            Pos2::new(rect.left() + head, rect.top()),
            Pos2::new(rect.left(), mid_y),
            Pos2::new(rect.left() + head, rect.bottom()),
            Pos2::new(rect.right(), rect.bottom()),
        ],
    }
}

#[derive(Clone, Debug)]
struct DetailGlyph {
    index: usize,
    hit: Rect,
}

/// Pan gesture record; the scale is captured once at drag start so a long
/// drag cannot drift as the region it shifts keeps moving.
#[derive(Clone, Copy, Debug)]
struct PanDrag {
    px_per_bp: f64,
}

#[derive(Clone, Copy, Debug)]
struct BrushDrag {
    origin_x: f32,
    current_x: f32,
}

#[derive(Debug)]
pub struct DetailTrack {
    area: Rect,
    glyphs: Vec<DetailGlyph>,
    pan: Option<PanDrag>,
    brush: Option<BrushDrag>,
}

impl DetailTrack {
    pub fn new() -> Self {
        Self {
            area: Rect::NOTHING,
            glyphs: vec![],
            pan: None,
            brush: None,
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
        let height = ui
            .available_height()
            .max(2.0 * LANE_HEIGHT + BAR_HEIGHT + SCALE_BAND_HEIGHT);
        let (response, painter) =
            ui.allocate_painter(Vec2::new(width, height), Sense::click());
        self.area = response.rect;

        let margins = Margins::new(MARGIN_PX, MARGIN_PX);
        let span = margins.span(width as f64);
        let region = zoom.region();
        let px_per_bp = span / region.width();
        let left = self.area.left() + margins.left as f32;
        let right = left + span as f32;
        let bp_to_x = |bp: f64| left + ((bp - region.start) * px_per_bp) as f32;

        // Band layout, top to bottom: forward lane, bar, reverse lane, scale.
        let lanes_top = self.area.top()
            + (self.area.height() - (2.0 * LANE_HEIGHT + BAR_HEIGHT + SCALE_BAND_HEIGHT)) / 2.0;
        let forward_lane = Rect::from_min_size(
            Pos2::new(left, lanes_top),
            Vec2::new(span as f32, LANE_HEIGHT),
        );
        let bar_rect = Rect::from_min_size(
            Pos2::new(left, forward_lane.bottom()),
            Vec2::new(span as f32, BAR_HEIGHT),
        );
        let reverse_lane = Rect::from_min_size(
            Pos2::new(left, bar_rect.bottom()),
            Vec2::new(span as f32, LANE_HEIGHT),
        );
        let scale_band = Rect::from_min_size(
            Pos2::new(left, reverse_lane.bottom()),
            Vec2::new(span as f32, SCALE_BAND_HEIGHT),
        );

        self.draw_bar(&painter, chromosome, zoom, region, bar_rect, span, bp_to_x);
        self.layout_and_draw_glyphs(
            &painter,
            genes,
            index,
            interaction,
            region,
            forward_lane,
            reverse_lane,
            left,
            right,
            px_per_bp,
        );
        self.draw_scale_band(&painter, region, scale_band, bp_to_x);

        // Wheel/pinch zoom anchored at the pointer.
        if response.hovered() {
            let factor = ui.input(|i| i.zoom_delta()) as f64;
            if factor != 1.0 {
                if let Some(pos) = response.hover_pos() {
                    let anchor_bp =
                        region.start + ((pos.x - left) as f64) / px_per_bp;
                    zoom.zoom_about(factor, anchor_bp, width as f64, margins);
                }
            }
        }

        self.handle_brush(ui, zoom, region, scale_band, left, px_per_bp, &painter);
        self.handle_pan(ui, zoom, bar_rect, px_per_bp);

        let gesture_active = self.pan.is_some() || self.brush.is_some();
        if !gesture_active {
            let target = response.hover_pos().and_then(|pos| self.glyph_at(pos));
            let target_id = target.map(|i| genes[i].id.as_str());
            interaction.set_hovered(target_id, Instant::now());
        }

        if response.clicked() {
            match response
                .interact_pointer_pos()
                .and_then(|pos| self.glyph_at(pos))
            {
                Some(i) => interaction.select(&genes[i].id),
                None => interaction.clear_selection(),
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_bar(
        &self,
        painter: &egui::Painter,
        chromosome: &Chromosome,
        zoom: &ZoomController,
        region: ViewportRegion,
        bar_rect: Rect,
        span: f64,
        bp_to_x: impl Fn(f64) -> f32,
    ) {
        let caps = end_cap_radii(region, zoom.length());
        painter.rect_filled(bar_rect, caps, Color32::from_rgb(0xde, 0xd9, 0xd0));
        painter.rect_stroke(
            bar_rect,
            caps,
            Stroke::new(1.0, Color32::from_rgb(0x9a, 0x94, 0x8a)),
            StrokeKind::Inside,
        );

        // Per-base letters, bounded by visible pixels. Painter shapes take
        // no pointer input, so the letters never intercept events.
        if letters_visible(region.width(), span) && chromosome.sequence.is_some() {
            let font = FontId {
                size: 13.0,
                family: FontFamily::Monospace,
            };
            let first = region.start.floor().max(0.0) as u64;
            let last = region.end.ceil().min(zoom.length()) as u64;
            for pos in first..last {
                let Some(base) = chromosome.base_at(pos) else {
                    continue;
                };
                painter.text(
                    Pos2::new(bp_to_x(pos as f64 + 0.5), bar_rect.center().y),
                    Align2::CENTER_CENTER,
                    base,
                    font.clone(),
                    crate::base_color(base),
                );
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_and_draw_glyphs(
        &mut self,
        painter: &egui::Painter,
        genes: &[Gene],
        index: &GeneIndex,
        interaction: &InteractionState,
        region: ViewportRegion,
        forward_lane: Rect,
        reverse_lane: Rect,
        left: f32,
        right: f32,
        px_per_bp: f64,
    ) {
        self.glyphs.clear();
        let label_font = FontId {
            size: 10.0,
            family: FontFamily::Proportional,
        };
        for i in index.visible_indices(genes, region, VISIBILITY_BUFFER) {
            let gene = &genes[i];
            let x0 = (left + ((gene.start - region.start) * px_per_bp) as f32).max(left - 1.0);
            let x1 = (left + ((gene.end - region.start) * px_per_bp) as f32).min(right + 1.0);
            let lane = match gene.strand {
                Strand::Forward => forward_lane,
                Strand::Reverse => reverse_lane,
            };
            let rect = Rect::from_min_max(
                Pos2::new(x0, lane.center().y - GLYPH_HEIGHT / 2.0),
                Pos2::new(x1.max(x0 + 1.0), lane.center().y + GLYPH_HEIGHT / 2.0),
            );
            let visual = interaction.visual_for(&gene.id, index.color_of(&gene.id));
            if glyph_has_arrow(rect.width()) {
                let points = arrow_points(rect, gene.strand);
                painter.add(Shape::convex_polygon(points, visual.fill, visual.stroke));
            } else {
                painter.rect_filled(rect, CornerRadius::ZERO, visual.fill);
                if visual.stroke != Stroke::NONE {
                    painter.rect_stroke(
                        rect.expand(1.0),
                        CornerRadius::ZERO,
                        visual.stroke,
                        StrokeKind::Outside,
                    );
                }
            }
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                label_text(gene.display_name(), rect.width()),
                label_font.clone(),
                Color32::from_rgb(0x18, 0x18, 0x18),
            );
            self.glyphs.push(DetailGlyph {
                index: i,
                hit: rect.expand(2.0),
            });
        }
    }

    fn draw_scale_band(
        &self,
        painter: &egui::Painter,
        region: ViewportRegion,
        band: Rect,
        bp_to_x: impl Fn(f64) -> f32,
    ) {
        let target = ((band.width() / 90.0) as usize).clamp(2, 12);
        let ladder = ticks::ladder(region.start, region.end, target);
        let tick_color = Color32::from_rgb(0x55, 0x55, 0x55);
        let label_font = FontId {
            size: 9.0,
            family: FontFamily::Monospace,
        };
        for &minor in &ladder.minors {
            let x = bp_to_x(minor);
            painter.line_segment(
                [
                    Pos2::new(x, band.top()),
                    Pos2::new(x, band.top() + 4.0),
                ],
                Stroke::new(1.0, tick_color),
            );
        }
        for &major in &ladder.majors {
            let x = bp_to_x(major);
            painter.line_segment(
                [
                    Pos2::new(x, band.top()),
                    Pos2::new(x, band.top() + 9.0),
                ],
                Stroke::new(1.0, tick_color),
            );
            painter.text(
                Pos2::new(x, band.top() + 11.0),
                Align2::CENTER_TOP,
                ticks::format_bp(major),
                label_font.clone(),
                tick_color,
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_brush(
        &mut self,
        ui: &mut egui::Ui,
        zoom: &mut ZoomController,
        region: ViewportRegion,
        band: Rect,
        left: f32,
        px_per_bp: f64,
        painter: &egui::Painter,
    ) {
        let response = ui.interact(band, ui.id().with("scale_brush"), Sense::drag());
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.brush = Some(BrushDrag {
                    origin_x: pos.x,
                    current_x: pos.x,
                });
            }
        }
        if let Some(brush) = &mut self.brush {
            if response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    brush.current_x = pos.x;
                }
            }
            let lo = brush.origin_x.min(brush.current_x);
            let hi = brush.origin_x.max(brush.current_x);
            painter.rect_filled(
                Rect::from_min_max(Pos2::new(lo, band.top()), Pos2::new(hi, band.bottom())),
                CornerRadius::ZERO,
                Color32::from_rgba_unmultiplied(0x4a, 0x72, 0xb8, 50),
            );
        }
        if response.drag_stopped() {
            // Taking the record clears the brush visual on the next frame.
            if let Some(brush) = self.brush.take() {
                let extent = (brush.current_x - brush.origin_x).abs();
                if extent > BRUSH_MIN_PX {
                    let lo = brush.origin_x.min(brush.current_x);
                    let hi = brush.origin_x.max(brush.current_x);
                    let start = region.start + ((lo - left) as f64) / px_per_bp;
                    let end = region.start + ((hi - left) as f64) / px_per_bp;
                    zoom.set_region(ViewportRegion::new(start, end));
                }
            }
        }
    }

    fn handle_pan(
        &mut self,
        ui: &mut egui::Ui,
        zoom: &mut ZoomController,
        bar_rect: Rect,
        px_per_bp: f64,
    ) {
        let response = ui.interact(bar_rect, ui.id().with("bar_pan"), Sense::drag());
        if response.drag_started() {
            self.pan = Some(PanDrag { px_per_bp });
        }
        if let Some(pan) = self.pan {
            if response.dragged() {
                let delta_px = response.drag_delta().x as f64;
                // Dragging the bar right moves the view left.
                zoom.pan_bp(-delta_px / pan.px_per_bp);
            }
        }
        if response.drag_stopped() {
            self.pan = None;
        }
    }

    fn glyph_at(&self, pos: Pos2) -> Option<usize> {
        self.glyphs
            .iter()
            .find(|glyph| glyph.hit.contains(pos))
            .map(|glyph| glyph.index)
    }

    /// Width of the last rendered pass, for zoom-limit computations that
    /// happen outside the track (the inspector's slider).
    pub fn viewport_px(&self) -> Option<f64> {
        let width = self.area.width();
        (width.is_finite() && width > 0.0).then_some(width as f64)
    }
}

pub fn margins() -> Margins {
    Margins::new(MARGIN_PX, MARGIN_PX)
}

impl Default for DetailTrack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_threshold() {
        assert!(!glyph_has_arrow(11.9));
        assert!(glyph_has_arrow(12.0));
        assert!(glyph_has_arrow(300.0));
    }

    #[test]
    fn test_label_threshold_keeps_layout_stable() {
        assert_eq!(label_text("BRCA2", 20.0), "");
        assert_eq!(label_text("BRCA2", 20.1), "BRCA2");
    }

    #[test]
    fn test_letters_visible_ratio() {
        // 600 px viewport: 120 bp shows letters, 121 bp does not.
        assert!(letters_visible(120.0, 600.0));
        assert!(!letters_visible(121.0, 600.0));
        assert!(!letters_visible(120.0, 0.0));
    }

    #[test]
    fn test_arrow_points_follow_strand() {
        let rect = Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(40.0, 10.0));
        let forward = arrow_points(rect, Strand::Forward);
        let tip = forward
            .iter()
            .max_by(|a, b| a.x.total_cmp(&b.x))
            .unwrap();
        assert_eq!(*tip, Pos2::new(40.0, 5.0));

        let reverse = arrow_points(rect, Strand::Reverse);
        let tip = reverse
            .iter()
            .min_by(|a, b| a.x.total_cmp(&b.x))
            .unwrap();
        assert_eq!(*tip, Pos2::new(0.0, 5.0));
    }

    #[test]
    fn test_end_caps_only_at_chromosome_ends() {
        let length = 1_000_000.0;
        let full = end_cap_radii(ViewportRegion::new(0.0, length), length);
        assert!(full.nw > 0 && full.ne > 0);

        let interior = end_cap_radii(ViewportRegion::new(1_000.0, 2_000.0), length);
        assert_eq!((interior.nw, interior.ne), (0, 0));

        let left_edge = end_cap_radii(ViewportRegion::new(0.0, 2_000.0), length);
        assert!(left_edge.nw > 0);
        assert_eq!(left_edge.ne, 0);
    }
}
