//! Slur rendering (single quadratic curve per legato span).

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::model::NoteEvent;
use super::constants::*;
use super::layout::LegatoSpan;
use super::notes::head_y;
use super::svg_builder::SvgBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlurCurve {
    pub start: (f64, f64),
    pub control: (f64, f64),
    pub end: (f64, f64),
    /// Drawn above the heads.
    pub above: bool,
}

impl SlurCurve {
    fn path_data(&self) -> String {
        format!(
            "M{:.1},{:.1} Q{:.1},{:.1} {:.1},{:.1}",
            self.start.0, self.start.1, self.control.0, self.control.1, self.end.0, self.end.1
        )
    }
}

/// Curve for a span whose outer heads are at `first` and `last`. `heads_y`
/// are the head positions of every event in the span; the slur goes above
/// when their mid-range is above the middle line (stems down).
pub fn slur_curve(first: (f64, f64), last: (f64, f64), heads_y: &[f64], middle_y: f64) -> SlurCurve {
    let (lo, hi) = heads_y
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &y| (lo.min(y), hi.max(y)));
    let mid_range = if heads_y.is_empty() { middle_y } else { (lo + hi) / 2.0 };
    let above = mid_range < middle_y;

    // +1 pushes down (below the heads), -1 pushes up
    let dir = if above { -1.0 } else { 1.0 };

    let start = (first.0 + SLUR_END_INSET_X, first.1 + dir * SLUR_HEAD_CLEARANCE);
    let end = (last.0 - SLUR_END_INSET_X, last.1 + dir * SLUR_HEAD_CLEARANCE);

    let curvature = ((last.0 - first.0).abs() / 4.0).min(SLUR_MAX_CURVATURE);
    let control = (
        (start.0 + end.0) / 2.0,
        (first.1 + last.1) / 2.0 + dir * curvature,
    );

    SlurCurve { start, control, end, above }
}

/// Draw one slur per legato span. Returns the curves in span order.
pub(super) fn render_legato_slurs(
    svg: &mut SvgBuilder,
    events: &[NoteEvent],
    positions: &[f64],
    spans: &[LegatoSpan],
    config: &LayoutConfig,
) -> Vec<SlurCurve> {
    let mut curves = Vec::with_capacity(spans.len());

    for span in spans {
        if span.len() < 2 {
            continue;
        }
        let heads: Vec<f64> = events[span.first..=span.last]
            .iter()
            .map(|e| head_y(e, config))
            .collect();
        let first = (positions[span.first], heads[0]);
        let last = (positions[span.last], heads[heads.len() - 1]);

        let curve = slur_curve(first, last, &heads, config.middle_line_y());
        svg.path(&curve.path_data(), "none", NOTE_COLOR, SLUR_WIDTH);
        curves.push(curve);
    }

    curves
}
