//! Beam geometry: group stem direction, least-squares beam line, minimum
//! stem length, and secondary beams.

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::model::NoteEvent;
use super::constants::*;
use super::layout::BeamGroup;
use super::notes::{head_y, render_beamed_head, stem_x};
use super::svg_builder::SvgBuilder;

/// The fitted beam of one group, `y = slope * x + intercept` over note-head x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeamGeometry {
    pub stem_up: bool,
    pub slope: f64,
    pub intercept: f64,
    /// Position within the group of the member whose stem is exactly the
    /// minimum stem length.
    pub extreme: usize,
}

impl BeamGeometry {
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a beam over `(x, y)` note-head points.
///
/// Stems go up when the mean head y is on or below `middle_y`. The slope is
/// the least-squares fit clamped to `±max_slope` (zero when every x is the
/// same). The intercept is then shifted so the stem of the extreme member
/// (lowest head for stems up, highest for stems down) is exactly `min_stem`.
pub fn fit_beam(points: &[(f64, f64)], middle_y: f64, min_stem: f64, max_slope: f64) -> Option<BeamGeometry> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let (sum_x, sum_y, sum_xx, sum_xy) = points.iter().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxx, sxy), &(x, y)| (sx + x, sy + y, sxx + x * x, sxy + x * y),
    );

    let stem_up = sum_y / n >= middle_y;

    let denom = n * sum_xx - sum_x * sum_x;
    let slope = if denom.abs() < 1e-9 {
        0.0
    } else {
        ((n * sum_xy - sum_x * sum_y) / denom).clamp(-max_slope, max_slope)
    };

    let mut extreme = 0;
    for (i, &(_, y)) in points.iter().enumerate().skip(1) {
        let further = if stem_up { y > points[extreme].1 } else { y < points[extreme].1 };
        if further {
            extreme = i;
        }
    }

    let (ex, ey) = points[extreme];
    let intercept = if stem_up {
        ey - slope * ex - min_stem
    } else {
        ey - slope * ex + min_stem
    };

    Some(BeamGeometry { stem_up, slope, intercept, extreme })
}

/// Beams a member needs, from its duration class (the same count a lone
/// note draws as flags).
pub(super) fn beam_levels(event: &NoteEvent) -> usize {
    event.duration().beam_count().max(1)
}

/// A beam beyond the primary one. Indices are positions within the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SecondaryBeam {
    /// Full beam across a run of members that all need this level.
    Span { level: usize, from: usize, to: usize },
    /// Short stub on a member whose neighbours need fewer beams.
    Stub { level: usize, member: usize, toward_right: bool },
}

/// Plan secondary beams from each member's beam count. A run of adjacent
/// members needing a level shares one beam; a lone member gets a stub
/// pointing into the group.
pub(super) fn plan_secondary_beams(levels: &[usize]) -> Vec<SecondaryBeam> {
    let mut planned = Vec::new();
    let max_level = levels.iter().copied().max().unwrap_or(1);
    let last = levels.len().saturating_sub(1);

    for level in 2..=max_level {
        let mut i = 0;
        while i < levels.len() {
            if levels[i] < level {
                i += 1;
                continue;
            }
            let start = i;
            while i + 1 < levels.len() && levels[i + 1] >= level {
                i += 1;
            }
            if i > start {
                planned.push(SecondaryBeam::Span { level, from: start, to: i });
            } else {
                planned.push(SecondaryBeam::Stub { level, member: start, toward_right: start != last });
            }
            i += 1;
        }
    }

    planned
}

/// Draw a whole beam group: heads and their decorations, stems to the beam,
/// the primary beam and any secondary beams.
pub(super) fn render_beam_group(
    svg: &mut SvgBuilder,
    events: &[NoteEvent],
    positions: &[f64],
    group: &BeamGroup,
    config: &LayoutConfig,
) -> Option<BeamGeometry> {
    let points: Vec<(f64, f64)> = group
        .members
        .iter()
        .map(|&i| (positions[i], head_y(&events[i], config)))
        .collect();

    let beam = fit_beam(
        &points,
        config.middle_line_y(),
        config.min_stem_length,
        config.max_beam_slope,
    )?;

    for (&i, &(x, y)) in group.members.iter().zip(&points) {
        render_beamed_head(svg, &events[i], x, y, beam.stem_up, config);
        let sx = stem_x(x, beam.stem_up);
        svg.line(sx, y, sx, beam.y_at(x), NOTE_COLOR, STEM_WIDTH);
    }

    let (first_x, _) = points[0];
    let (last_x, _) = points[points.len() - 1];
    svg.beam_line(
        stem_x(first_x, beam.stem_up),
        beam.y_at(first_x),
        stem_x(last_x, beam.stem_up),
        beam.y_at(last_x),
        BEAM_THICKNESS,
    );

    let levels: Vec<usize> = group.members.iter().map(|&i| beam_levels(&events[i])).collect();
    let toward_head = if beam.stem_up { 1.0 } else { -1.0 };

    for secondary in plan_secondary_beams(&levels) {
        match secondary {
            SecondaryBeam::Span { level, from, to } => {
                let off = toward_head * BEAM_LEVEL_STEP * (level - 1) as f64;
                let (x1, x2) = (points[from].0, points[to].0);
                svg.beam_line(
                    stem_x(x1, beam.stem_up),
                    beam.y_at(x1) + off,
                    stem_x(x2, beam.stem_up),
                    beam.y_at(x2) + off,
                    BEAM_THICKNESS,
                );
            }
            SecondaryBeam::Stub { level, member, toward_right } => {
                let off = toward_head * BEAM_LEVEL_STEP * (level - 1) as f64;
                let x = points[member].0;
                let dx = if toward_right { BEAM_STUB_LENGTH } else { -BEAM_STUB_LENGTH };
                let sx = stem_x(x, beam.stem_up);
                svg.beam_line(
                    sx,
                    beam.y_at(x) + off,
                    sx + dx,
                    beam.y_at(x + dx) + off,
                    BEAM_THICKNESS,
                );
            }
        }
    }

    Some(beam)
}
