//! Staff renderer. Lays out a note sequence on a single treble staff and
//! draws it as SVG.
//!
//! A render pass is a pure function of the [`Sequence`] and the
//! [`LayoutConfig`]: identical inputs always produce identical geometry and
//! byte-identical SVG.

mod constants;
mod svg_builder;
mod layout;
mod beams;
mod notes;
mod slurs;
mod staff;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::LayoutConfig;
use crate::model::{normalize, Sequence};
use constants::BACKGROUND_COLOR;
use svg_builder::SvgBuilder;
use staff::*;

pub use beams::{fit_beam, BeamGeometry};
pub use layout::{
    bar_line_positions, compute_layout, find_beam_groups, find_legato_spans, note_positions,
    BeamGroup, LegatoSpan, StaffLayout,
};
pub use notes::ledger_line_ys;
pub use slurs::{slur_curve, SlurCurve};

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedStaff {
    pub width: f64,
    pub height: f64,
    pub layout: StaffLayout,
    /// Fitted beam per entry of `layout.beam_groups`.
    pub beams: Vec<BeamGeometry>,
    pub slurs: Vec<SlurCurve>,
    #[serde(skip)]
    svg: String,
}

impl RenderedStaff {
    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn into_svg(self) -> String {
        self.svg
    }
}

/// Render a raw entry map (the shared-state object).
pub fn render_entries(entries: &Map<String, Value>, config: &LayoutConfig) -> RenderedStaff {
    render_sequence(&normalize(entries), config)
}

/// Render a sequence onto a surface sized for its event count.
///
/// Order: background, staff, clef, time signature, beam groups, remaining
/// notes and rests, bar lines, slurs.
pub fn render_sequence(sequence: &Sequence, config: &LayoutConfig) -> RenderedStaff {
    let events = sequence.events();
    let (width, height) = config.surface_size(events.len());

    let mut svg = SvgBuilder::new(width, height);
    svg.rect(0.0, 0.0, width, height, BACKGROUND_COLOR, "none", 0.0);

    render_staff_lines(&mut svg, width, config);
    render_clef(&mut svg, config);
    render_time_signature(&mut svg, config);

    let layout = compute_layout(events, config);

    let mut consumed = vec![false; events.len()];
    let mut beams = Vec::with_capacity(layout.beam_groups.len());
    for group in &layout.beam_groups {
        if let Some(beam) = beams::render_beam_group(&mut svg, events, &layout.positions, group, config) {
            beams.push(beam);
        }
        for &i in &group.members {
            consumed[i] = true;
        }
    }

    for (i, event) in events.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        let x = layout.positions[i];
        if event.is_rest() {
            notes::render_rest(&mut svg, event, x, config);
        } else {
            notes::render_note(&mut svg, event, x, config);
        }
    }

    render_bar_lines(&mut svg, &layout.bar_lines, config);

    let slurs = slurs::render_legato_slurs(&mut svg, events, &layout.positions, &layout.legato_spans, config);

    log::debug!(
        "rendered {} events: {} bar lines, {} beam groups, {} slurs ({}x{})",
        events.len(),
        layout.bar_lines.len(),
        layout.beam_groups.len(),
        slurs.len(),
        width,
        height
    );

    RenderedStaff {
        width,
        height,
        layout,
        beams,
        slurs,
        svg: svg.build(),
    }
}
