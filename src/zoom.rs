//! Translates interaction input — gesture transforms, wheel/pinch factors,
//! the log-scale zoom slider, pan drags and the manual position form — into
//! [`CoordinateModel`] updates.
//!
//! All channels funnel through the model's repair/commit pipeline, so the
//! invariants hold no matter which widget produced the candidate region.
//! Boundary overflow is compensated by shifting the opposite bound rather
//! than clamping, so a pan or zoom keeps its width wherever the chromosome
//! is long enough to allow it.

use crate::viewport::{CoordinateModel, Margins, Transform, ViewportRegion};

#[derive(Clone, Debug)]
pub struct ZoomController {
    model: CoordinateModel,
}

impl ZoomController {
    pub fn new(length: u64) -> Self {
        Self {
            model: CoordinateModel::new(length),
        }
    }

    #[inline(always)]
    pub fn model(&self) -> &CoordinateModel {
        &self.model
    }

    #[inline(always)]
    pub fn region(&self) -> ViewportRegion {
        self.model.region()
    }

    #[inline(always)]
    pub fn length(&self) -> f64 {
        self.model.length()
    }

    pub fn set_region(&mut self, candidate: ViewportRegion) -> ViewportRegion {
        self.model.set_region(candidate)
    }

    /// Region + identity gesture transform.
    pub fn reset(&mut self) {
        self.model.reset();
    }

    /// Places a width-preserving candidate: overflow at either end shifts
    /// the whole window back inside `[0, length]` instead of shrinking it.
    fn place(&mut self, start: f64, width: f64) -> ViewportRegion {
        let width = width.min(self.model.length());
        let mut start = start;
        if start < 0.0 {
            start = 0.0;
        } else if start + width > self.model.length() {
            start = self.model.length() - width;
        }
        self.model.set_region(ViewportRegion::new(start, start + width))
    }

    /// Log-scale slider input: zoom factor `z ≥ 1`, new width `length / z`,
    /// centered on the current midpoint.
    pub fn slider_zoom(&mut self, z: f64) -> ViewportRegion {
        let z = z.max(1.0);
        let width = self.model.length() / z;
        let start = self.model.region().midpoint() - width / 2.0;
        self.place(start, width)
    }

    /// Wheel/pinch zoom anchored at `anchor_bp`: the base under the pointer
    /// keeps its screen position while the width scales by `factor`
    /// (`> 1` zooms in). The width floor tracks the current viewport so the
    /// maximum-zoom pixel ratio holds for this track size.
    pub fn zoom_about(
        &mut self,
        factor: f64,
        anchor_bp: f64,
        viewport_px: f64,
        margins: Margins,
    ) -> ViewportRegion {
        if factor <= 0.0 || !factor.is_finite() {
            return self.model.region();
        }
        let region = self.model.region();
        let min_width = self.model.length() / self.model.max_zoom(viewport_px, margins);
        let width = (region.width() / factor).clamp(min_width, self.model.length());
        let frac = ((anchor_bp - region.start) / region.width()).clamp(0.0, 1.0);
        self.place(anchor_bp - frac * width, width)
    }

    /// Pan by a bp delta, width preserved where possible.
    pub fn pan_bp(&mut self, delta_bp: f64) -> ViewportRegion {
        let region = self.model.region();
        self.place(region.start + delta_bp, region.width())
    }

    /// Re-derives a region from a gesture-library transform and runs it
    /// through the commit gate. A transform that merely re-encodes the
    /// committed region does not move anything — that is the guard against
    /// mutual gesture/region update loops.
    pub fn apply_transform(
        &mut self,
        transform: Transform,
        viewport_px: f64,
        margins: Margins,
    ) -> ViewportRegion {
        let candidate = self.model.transform_to_region(transform, viewport_px, margins);
        self.model.set_region(candidate)
    }

    /// Manual start/end form submission. Either field falling to parse
    /// keeps its committed value; the pair then goes through the ordinary
    /// swap/clamp/minimum-width repair.
    pub fn apply_position_form(&mut self, start_text: &str, end_text: &str) -> ViewportRegion {
        let region = self.model.region();
        let start = parse_bp(start_text).unwrap_or(region.start);
        let end = parse_bp(end_text).unwrap_or(region.end);
        self.model.set_region(ViewportRegion::new(start, end))
    }
}

/// Parses a bp coordinate typed by the user: integer with optional
/// thousands separators (`1,234,567`, `1_234_567`, `1.234.567`) and
/// surrounding whitespace. Returns `None` on anything else.
pub fn parse_bp(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | '.' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<i64>().ok().map(|v| v as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::MIN_REGION_BP;

    #[test]
    fn test_slider_zoom_centers_on_midpoint() {
        let mut zoom = ZoomController::new(1_000_000);
        let region = zoom.slider_zoom(10.0);
        assert_eq!(region, ViewportRegion::new(450_000.0, 550_000.0));
    }

    #[test]
    fn test_slider_zoom_shifts_instead_of_clamping() {
        let mut zoom = ZoomController::new(1_000_000);
        zoom.set_region(ViewportRegion::new(0.0, 20_000.0));
        // Midpoint 10,000, requested width 100,000: naive start is -40,000.
        let region = zoom.slider_zoom(10.0);
        assert_eq!(region, ViewportRegion::new(0.0, 100_000.0));

        zoom.set_region(ViewportRegion::new(980_000.0, 1_000_000.0));
        let region = zoom.slider_zoom(10.0);
        assert_eq!(region, ViewportRegion::new(900_000.0, 1_000_000.0));
    }

    #[test]
    fn test_zoom_about_keeps_anchor_fraction() {
        let mut zoom = ZoomController::new(1_000_000);
        zoom.set_region(ViewportRegion::new(400_000.0, 600_000.0));
        // Anchor at 25% of the window.
        let region = zoom.zoom_about(2.0, 450_000.0, 1_000.0, Margins::default());
        assert!((region.width() - 100_000.0).abs() < 1e-6);
        let frac = (450_000.0 - region.start) / region.width();
        assert!((frac - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_about_respects_max_zoom_floor() {
        let mut zoom = ZoomController::new(1_000_000);
        zoom.set_region(ViewportRegion::new(500_000.0, 501_000.0));
        let region = zoom.zoom_about(1_000.0, 500_500.0, 1_000.0, Margins::default());
        // 1000 px / 1.25 px-per-bp = 800 bp floor for this viewport.
        assert!(region.width() >= 800.0 - 1e-9);
        assert!(region.width() >= MIN_REGION_BP);
    }

    #[test]
    fn test_pan_preserves_width_at_boundaries() {
        let mut zoom = ZoomController::new(1_000_000);
        zoom.set_region(ViewportRegion::new(10_000.0, 30_000.0));
        let region = zoom.pan_bp(-50_000.0);
        assert_eq!(region, ViewportRegion::new(0.0, 20_000.0));
        let region = zoom.pan_bp(2_000_000.0);
        assert_eq!(region, ViewportRegion::new(980_000.0, 1_000_000.0));
    }

    #[test]
    fn test_position_form_parses_and_repairs() {
        let mut zoom = ZoomController::new(1_000_000);
        zoom.apply_position_form("200,000", "100 000");
        // Inverted input swaps.
        assert_eq!(zoom.region(), ViewportRegion::new(100_000.0, 200_000.0));

        // Garbage start falls back to the committed start.
        zoom.apply_position_form("abc", "300_000");
        assert_eq!(zoom.region(), ViewportRegion::new(100_000.0, 300_000.0));

        // Garbage everywhere leaves the region alone.
        let before = zoom.region();
        zoom.apply_position_form("", "12x4");
        assert_eq!(zoom.region(), before);
    }

    #[test]
    fn test_parse_bp_variants() {
        assert_eq!(parse_bp(" 1,234,567 "), Some(1_234_567.0));
        assert_eq!(parse_bp("1.234.567"), Some(1_234_567.0));
        assert_eq!(parse_bp("1_000"), Some(1_000.0));
        assert_eq!(parse_bp("-5"), Some(-5.0));
        assert_eq!(parse_bp(""), None);
        assert_eq!(parse_bp("12e4"), None);
    }

    #[test]
    fn test_transform_feedback_does_not_cycle() {
        let mut zoom = ZoomController::new(1_000_000);
        zoom.set_region(ViewportRegion::new(250_000.0, 750_000.0));
        let margins = Margins::new(10.0, 10.0);
        let committed = zoom.region();
        // Re-deriving the transform from the committed region and feeding it
        // back must be a fixed point.
        let transform = zoom.model().region_to_transform(committed, 800.0, margins);
        let after = zoom.apply_transform(transform, 800.0, margins);
        assert_eq!(after, committed);
    }

    #[test]
    fn test_reset_restores_full_view() {
        let mut zoom = ZoomController::new(42_000);
        zoom.slider_zoom(100.0);
        zoom.reset();
        assert_eq!(zoom.region(), ViewportRegion::new(0.0, 42_000.0));
    }
}
