//! Viewport region model and bp↔pixel projection.
//!
//! One `CoordinateModel` owns the committed region for the whole engine.
//! Every candidate region, whatever interaction channel produced it, goes
//! through the same repair pipeline (clamp, swap, minimum width, full-view
//! snap) and the same epsilon-gated commit that keeps gesture-transform
//! feedback from cycling forever.

/// Smallest committable region width in bp.
pub const MIN_REGION_BP: f64 = 10.0;

/// Bounds within this many bp of the chromosome ends snap to the full view.
pub const SNAP_BP: f64 = 1.0;

/// A candidate region is only committed when a bound moves by more than
/// this; re-derived regions that differ by floating-point noise are dropped.
pub const COMMIT_EPSILON_BP: f64 = 0.5;

/// Pixels per base pair at maximum zoom (1 bp never narrower than 1.25 px).
pub const MAX_ZOOM_PX_PER_BP: f64 = 1.25;

/// The `[start, end]` bp interval currently displayed in the detail track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportRegion {
    pub start: f64,
    pub end: f64,
}

impl ViewportRegion {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[inline(always)]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    #[inline(always)]
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    #[inline(always)]
    pub fn contains(&self, bp: f64) -> bool {
        self.start <= bp && bp <= self.end
    }
}

/// Horizontal margins of a track's drawing area, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
}

impl Margins {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Usable pixel span between the margins.
    pub fn span(&self, viewport_px: f64) -> f64 {
        (viewport_px - self.left - self.right).max(1.0)
    }
}

/// Derived projection of a region into pixel space. Never a second source
/// of truth: always recomputable from the region and vice versa.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub k: f64,
    pub tx: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { k: 1.0, tx: 0.0 };
}

#[derive(Clone, Debug)]
pub struct CoordinateModel {
    length: f64,
    region: ViewportRegion,
}

impl CoordinateModel {
    /// The caller (engine construction) has already rejected `length == 0`.
    pub fn new(length: u64) -> Self {
        let length = length as f64;
        Self {
            length,
            region: ViewportRegion::new(0.0, length),
        }
    }

    #[inline(always)]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[inline(always)]
    pub fn region(&self) -> ViewportRegion {
        self.region
    }

    pub fn is_full_view(&self) -> bool {
        self.region.start == 0.0 && self.region.end == self.length
    }

    /// Deterministic repair of an arbitrary candidate: clamp both bounds
    /// into `[0, length]`, swap if inverted, widen to the minimum width,
    /// then snap to the full view when both bounds sit within `SNAP_BP` of
    /// the chromosome ends.
    pub fn repair(&self, candidate: ViewportRegion) -> ViewportRegion {
        let mut start = candidate.start.clamp(0.0, self.length);
        let mut end = candidate.end.clamp(0.0, self.length);
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }
        if end - start < MIN_REGION_BP {
            end = (start + MIN_REGION_BP).min(self.length);
            if end - start < MIN_REGION_BP {
                start = (end - MIN_REGION_BP).max(0.0);
            }
        }
        if start <= SNAP_BP && end >= self.length - SNAP_BP {
            start = 0.0;
            end = self.length;
        }
        ViewportRegion::new(start, end)
    }

    /// Repairs the candidate and stores it, but only when a bound actually
    /// moved by more than `COMMIT_EPSILON_BP`. Returns the committed region
    /// either way, so callers always observe the single source of truth.
    pub fn set_region(&mut self, candidate: ViewportRegion) -> ViewportRegion {
        let repaired = self.repair(candidate);
        let moved = (repaired.start - self.region.start).abs() > COMMIT_EPSILON_BP
            || (repaired.end - self.region.end).abs() > COMMIT_EPSILON_BP;
        if moved {
            self.region = repaired;
        }
        self.region
    }

    pub fn reset(&mut self) {
        self.region = ViewportRegion::new(0.0, self.length);
    }

    /// `k` is the zoom factor relative to the full view; `tx` places the
    /// region start at the left margin.
    pub fn region_to_transform(
        &self,
        region: ViewportRegion,
        viewport_px: f64,
        margins: Margins,
    ) -> Transform {
        let span = margins.span(viewport_px);
        let k = self.length / region.width();
        let tx = margins.left - k * (region.start / self.length) * span;
        Transform { k, tx }
    }

    /// Inverse of [`Self::region_to_transform`]; the result still needs
    /// [`Self::set_region`] for clamping and snapping before it is trusted.
    pub fn transform_to_region(
        &self,
        transform: Transform,
        viewport_px: f64,
        margins: Margins,
    ) -> ViewportRegion {
        let span = margins.span(viewport_px);
        let start = (margins.left - transform.tx) * self.length / (transform.k * span);
        let width = self.length / transform.k;
        ViewportRegion::new(start, start + width)
    }

    /// Maximum zoom factor: the smallest allowed region still maps every
    /// base pair to at least `MAX_ZOOM_PX_PER_BP` pixels. Minimum zoom is 1
    /// (full chromosome).
    pub fn max_zoom(&self, viewport_px: f64, margins: Margins) -> f64 {
        let span = margins.span(viewport_px);
        let min_width = (span / MAX_ZOOM_PX_PER_BP).max(MIN_REGION_BP);
        (self.length / min_width).max(1.0)
    }

    /// Current zoom factor of the committed region.
    pub fn zoom(&self) -> f64 {
        self.length / self.region.width()
    }

    /// Pixels per bp for a region drawn between the margins.
    pub fn px_per_bp(&self, region: ViewportRegion, viewport_px: f64, margins: Margins) -> f64 {
        margins.span(viewport_px) / region.width()
    }

    /// Projects a bp coordinate to an absolute pixel x for the given region.
    pub fn bp_to_px(
        &self,
        bp: f64,
        region: ViewportRegion,
        viewport_px: f64,
        margins: Margins,
    ) -> f64 {
        margins.left + (bp - region.start) * self.px_per_bp(region, viewport_px, margins)
    }

    /// Inverse of [`Self::bp_to_px`].
    pub fn px_to_bp(
        &self,
        px: f64,
        region: ViewportRegion,
        viewport_px: f64,
        margins: Margins,
    ) -> f64 {
        region.start + (px - margins.left) / self.px_per_bp(region, viewport_px, margins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> CoordinateModel {
        CoordinateModel::new(1_000_000)
    }

    #[test]
    fn test_initial_region_is_full_view() {
        let model = model();
        assert_eq!(model.region(), ViewportRegion::new(0.0, 1_000_000.0));
        assert!(model.is_full_view());
        assert_eq!(model.zoom(), 1.0);
    }

    #[test]
    fn test_repair_clamps_and_swaps() {
        let model = model();
        let region = model.repair(ViewportRegion::new(2_000_000.0, -5.0));
        assert_eq!(region, ViewportRegion::new(0.0, 1_000_000.0));

        let region = model.repair(ViewportRegion::new(5_000.0, 2_000.0));
        assert_eq!(region, ViewportRegion::new(2_000.0, 5_000.0));
    }

    #[test]
    fn test_repair_enforces_minimum_width() {
        let model = model();
        let region = model.repair(ViewportRegion::new(500.0, 502.0));
        assert_eq!(region.start, 500.0);
        assert_eq!(region.width(), MIN_REGION_BP);

        // At the right edge the start retreats instead.
        let region = model.repair(ViewportRegion::new(999_998.0, 999_999.0));
        assert_eq!(region.end, 1_000_000.0);
        assert_eq!(region.width(), MIN_REGION_BP);
    }

    #[test]
    fn test_repair_snaps_to_full_view() {
        let model = model();
        let region = model.repair(ViewportRegion::new(0.4, 999_999.2));
        assert_eq!(region, ViewportRegion::new(0.0, 1_000_000.0));
        // Outside the snap distance nothing happens.
        let region = model.repair(ViewportRegion::new(1.5, 999_999.2));
        assert_eq!(region.start, 1.5);
    }

    #[test]
    fn test_commit_requires_movement_beyond_epsilon() {
        let mut model = model();
        model.set_region(ViewportRegion::new(10_000.0, 20_000.0));
        assert_eq!(model.region(), ViewportRegion::new(10_000.0, 20_000.0));

        // Floating-point noise from a re-derived transform must not commit.
        let committed = model.set_region(ViewportRegion::new(10_000.3, 20_000.4));
        assert_eq!(committed, ViewportRegion::new(10_000.0, 20_000.0));

        // A real move does.
        let committed = model.set_region(ViewportRegion::new(10_001.0, 20_000.0));
        assert_eq!(committed.start, 10_001.0);
    }

    #[test]
    fn test_reset_restores_full_view_and_identity_transform() {
        let mut model = model();
        model.set_region(ViewportRegion::new(100.0, 200.0));
        model.reset();
        assert!(model.is_full_view());
        let transform =
            model.region_to_transform(model.region(), 800.0, Margins::default());
        assert!((transform.k - 1.0).abs() < 1e-12);
        assert!(transform.tx.abs() < 1e-9);
    }

    #[test]
    fn test_transform_round_trip() {
        let model = model();
        let margins = Margins::new(12.0, 8.0);
        for region in [
            ViewportRegion::new(0.0, 1_000_000.0),
            ViewportRegion::new(123.0, 456_789.0),
            ViewportRegion::new(990_000.0, 1_000_000.0),
            ViewportRegion::new(500_000.0, 500_010.0),
        ] {
            let transform = model.region_to_transform(region, 640.0, margins);
            let back = model.transform_to_region(transform, 640.0, margins);
            assert!(
                (back.start - region.start).abs() <= 0.5,
                "start drifted: {} vs {}",
                back.start,
                region.start
            );
            assert!((back.end - region.end).abs() <= 0.5);
        }
    }

    #[test]
    fn test_transform_places_start_at_left_margin() {
        let model = model();
        let margins = Margins::new(20.0, 10.0);
        let region = ViewportRegion::new(250_000.0, 750_000.0);
        let px = model.bp_to_px(region.start, region, 630.0, margins);
        assert!((px - 20.0).abs() < 1e-9);
        let bp = model.px_to_bp(20.0, region, 630.0, margins);
        assert!((bp - 250_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_zoom_respects_pixel_floor() {
        let model = model();
        let margins = Margins::default();
        let max = model.max_zoom(1_000.0, margins);
        let min_width = model.length() / max;
        // At max zoom one bp spans at least 1.25 px.
        assert!(margins.span(1_000.0) / min_width >= MAX_ZOOM_PX_PER_BP - 1e-9);
    }

    #[test]
    fn test_short_chromosome_never_panics() {
        let model = CoordinateModel::new(4);
        let region = model.repair(ViewportRegion::new(1.0, 3.0));
        // Shorter than MIN_REGION_BP: the whole chromosome is the region.
        assert_eq!(region, ViewportRegion::new(0.0, 4.0));
    }
}
