//! Tick ladder for the detail track's scale band.
//!
//! Major ticks land on "nice" 1-2-5 multiples; each adjacent pair of majors
//! gets 4 evenly spaced minor ticks interpolated between them.

use itertools::Itertools;

pub const MINORS_PER_GAP: usize = 4;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickLadder {
    pub step: f64,
    pub majors: Vec<f64>,
    pub minors: Vec<f64>,
}

/// Nice step for `target` divisions of `span`: a power of ten times 1, 2
/// or 5, never below 1 bp.
pub fn nice_step(span: f64, target: usize) -> f64 {
    if span <= 0.0 {
        return 1.0;
    }
    let raw = span / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    (factor * magnitude).max(1.0)
}

/// Majors on step multiples within `[start, end]`, minors interpolated
/// between each adjacent major pair.
pub fn ladder(start: f64, end: f64, target: usize) -> TickLadder {
    if end <= start {
        return TickLadder::default();
    }
    let step = nice_step(end - start, target);
    let mut majors = Vec::new();
    let mut multiple = (start / step).ceil();
    loop {
        let tick = multiple * step;
        if tick > end {
            break;
        }
        majors.push(tick);
        multiple += 1.0;
    }
    let minor_spacing = step / (MINORS_PER_GAP + 1) as f64;
    let minors = majors
        .iter()
        .tuple_windows()
        .flat_map(|(lo, _hi)| {
            (1..=MINORS_PER_GAP).map(move |i| lo + i as f64 * minor_spacing)
        })
        .collect();
    TickLadder {
        step,
        majors,
        minors,
    }
}

/// Formats a bp coordinate with thousands separators for tick labels and
/// the view-range readout.
pub fn format_bp(bp: f64) -> String {
    let value = bp.round() as i64;
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_step_progression() {
        assert_eq!(nice_step(1_000.0, 10), 100.0);
        assert_eq!(nice_step(1_300.0, 10), 200.0);
        assert_eq!(nice_step(4_000.0, 10), 500.0);
        assert_eq!(nice_step(70_000.0, 10), 10_000.0);
        // Never below one bp even for tiny spans.
        assert_eq!(nice_step(0.5, 10), 1.0);
    }

    #[test]
    fn test_ladder_majors_on_step_multiples() {
        let ladder = ladder(0.0, 1_000.0, 10);
        assert_eq!(ladder.step, 100.0);
        assert_eq!(ladder.majors.first(), Some(&0.0));
        assert_eq!(ladder.majors.last(), Some(&1_000.0));
        for major in &ladder.majors {
            assert_eq!(major % ladder.step, 0.0);
        }
    }

    #[test]
    fn test_ladder_has_four_minors_per_gap() {
        let ladder = ladder(0.0, 1_000.0, 10);
        let gaps = ladder.majors.len() - 1;
        assert_eq!(ladder.minors.len(), gaps * MINORS_PER_GAP);
        // Minors between the first pair are evenly spaced at step/5.
        assert_eq!(&ladder.minors[..4], &[20.0, 40.0, 60.0, 80.0]);
    }

    #[test]
    fn test_ladder_offset_window() {
        let ladder = ladder(123_456.0, 234_567.0, 10);
        assert!(ladder.majors.iter().all(|&t| t >= 123_456.0 && t <= 234_567.0));
        assert!(!ladder.majors.is_empty());
    }

    #[test]
    fn test_empty_ladder_for_degenerate_span() {
        assert_eq!(ladder(10.0, 10.0, 10), TickLadder::default());
    }

    #[test]
    fn test_format_bp() {
        assert_eq!(format_bp(0.0), "0");
        assert_eq!(format_bp(999.0), "999");
        assert_eq!(format_bp(1_000.0), "1,000");
        assert_eq!(format_bp(1_234_567.4), "1,234,567");
        assert_eq!(format_bp(-1_234.0), "-1,234");
    }
}
