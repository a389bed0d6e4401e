//! Hover and selection state shared by both tracks.
//!
//! Pointer-move events arrive far more often than the highlight needs to
//! change, so hover transitions are throttled; clicks are immediate. The
//! clock is injected so tests control time.

use eframe::egui::{Color32, Stroke};
use std::time::{Duration, Instant};

/// Minimum interval between applied hover transitions.
pub const HOVER_THROTTLE: Duration = Duration::from_millis(50);

#[derive(Debug, Default)]
pub struct InteractionState {
    hovered: Option<String>,
    selected: Option<String>,
    hover_applied_at: Option<Instant>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Effective display rule for the inspector: selection wins.
    pub fn active(&self) -> Option<&str> {
        self.selected.as_deref().or(self.hovered.as_deref())
    }

    /// Throttled hover transition. A target equal to the current hover is a
    /// no-op; a different target (or a clear) applies only when the last
    /// applied transition is at least [`HOVER_THROTTLE`] old. Replacing the
    /// option clears the previous gene and sets the new one in one step, so
    /// two genes are never hovered at once.
    ///
    /// Returns whether the transition was applied.
    pub fn set_hovered(&mut self, target: Option<&str>, now: Instant) -> bool {
        if self.hovered.as_deref() == target {
            return false;
        }
        if let Some(applied_at) = self.hover_applied_at {
            if now.duration_since(applied_at) < HOVER_THROTTLE {
                return false;
            }
        }
        self.hovered = target.map(str::to_string);
        self.hover_applied_at = Some(now);
        true
    }

    /// Immediate, unthrottled selection. Clears any current hover so the
    /// inspector never shows a hover highlight for one gene while another
    /// is being selected.
    pub fn select(&mut self, id: &str) {
        self.selected = Some(id.to_string());
        self.hovered = None;
    }

    /// Background click: clears the selection unconditionally.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Collection replacement: nothing survives.
    pub fn clear(&mut self) {
        self.hovered = None;
        self.selected = None;
        self.hover_applied_at = None;
    }

    /// Final visual attributes for one glyph, computed fresh each redraw.
    /// Hover brightens the fill and adds a thin stroke, selection a heavier
    /// one; repeated hover/unhover cannot strand partial highlight state
    /// because nothing is patched incrementally.
    pub fn visual_for(&self, id: &str, base: Color32) -> GlyphVisual {
        let selected = self.selected.as_deref() == Some(id);
        let hovered = self.hovered.as_deref() == Some(id);
        let fill = if selected || hovered {
            brighten(base)
        } else {
            base
        };
        let stroke = if selected {
            Stroke::new(2.5, Color32::from_rgb(0x20, 0x20, 0x20))
        } else if hovered {
            Stroke::new(1.5, Color32::from_rgb(0x50, 0x50, 0x50))
        } else {
            Stroke::NONE
        };
        GlyphVisual { fill, stroke }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphVisual {
    pub fill: Color32,
    pub stroke: Stroke,
}

fn brighten(color: Color32) -> Color32 {
    let lift = |c: u8| c.saturating_add(((255 - c as u16) / 3) as u8);
    Color32::from_rgb(lift(color.r()), lift(color.g()), lift(color.b()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_throttle_collapses_fast_updates() {
        let mut state = InteractionState::new();
        let t0 = Instant::now();
        assert!(state.set_hovered(Some("a"), t0));
        // 10 ms later: dropped.
        assert!(!state.set_hovered(Some("b"), t0 + Duration::from_millis(10)));
        assert_eq!(state.hovered(), Some("a"));
        // 60 ms later: applied.
        assert!(state.set_hovered(Some("b"), t0 + Duration::from_millis(60)));
        assert_eq!(state.hovered(), Some("b"));
    }

    #[test]
    fn test_hover_same_target_is_a_noop() {
        let mut state = InteractionState::new();
        let t0 = Instant::now();
        assert!(state.set_hovered(Some("a"), t0));
        // Re-hovering the same gene does not consume the throttle window.
        assert!(!state.set_hovered(Some("a"), t0 + Duration::from_millis(100)));
        assert!(state.set_hovered(None, t0 + Duration::from_millis(120)));
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn test_selection_clears_hover_and_background_clears_selection() {
        let mut state = InteractionState::new();
        state.set_hovered(Some("b"), Instant::now());
        state.select("a");
        assert_eq!(state.selected(), Some("a"));
        assert_eq!(state.hovered(), None);
        assert_eq!(state.active(), Some("a"));

        state.clear_selection();
        assert_eq!(state.active(), None);
    }

    #[test]
    fn test_selection_wins_over_hover() {
        let mut state = InteractionState::new();
        state.select("a");
        let later = Instant::now() + Duration::from_millis(100);
        state.set_hovered(Some("b"), later);
        assert_eq!(state.active(), Some("a"));
    }

    #[test]
    fn test_visual_pass_is_pure_and_idempotent() {
        let mut state = InteractionState::new();
        let base = Color32::from_rgb(100, 50, 200);
        let plain = state.visual_for("a", base);
        assert_eq!(plain.fill, base);
        assert_eq!(plain.stroke, Stroke::NONE);

        state.set_hovered(Some("a"), Instant::now());
        let hovered = state.visual_for("a", base);
        assert_ne!(hovered.fill, base);
        assert!(hovered.stroke.width > 0.0);
        // Same inputs, same output: nothing accumulates between passes.
        assert_eq!(hovered, state.visual_for("a", base));

        state.select("a");
        let selected = state.visual_for("a", base);
        assert!(selected.stroke.width > hovered.stroke.width);
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut state = InteractionState::new();
        state.select("a");
        state.set_hovered(Some("b"), Instant::now());
        state.clear();
        assert_eq!(state.selected(), None);
        assert_eq!(state.hovered(), None);
    }
}
