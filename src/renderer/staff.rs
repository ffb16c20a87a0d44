//! Staff, clef, time signature, and barline rendering.

use crate::config::LayoutConfig;
use super::constants::*;
use super::svg_builder::SvgBuilder;

// ═══════════════════════════════════════════════════════════════════════
// Staff rendering
// ═══════════════════════════════════════════════════════════════════════

/// Staff lines from the left margin to `width - margin_right`, an opening
/// line, and a thin + thick closing pair.
pub(super) fn render_staff_lines(svg: &mut SvgBuilder, width: f64, config: &LayoutConfig) {
    let left = config.margin_left;
    let end_x = width - config.margin_right;
    let top = config.staff_top();
    let bottom = config.staff_bottom();

    for i in 0..config.staff_lines {
        let y = top + i as f64 * config.staff_line_spacing;
        svg.line(left, y, end_x, y, STAFF_COLOR, STAFF_LINE_WIDTH);
    }

    svg.line(left, top, left, bottom, STAFF_COLOR, STAFF_LINE_WIDTH);
    svg.line(end_x - STAFF_END_GAP, top, end_x - STAFF_END_GAP, bottom, BARLINE_COLOR, STAFF_END_THIN_WIDTH);
    svg.line(end_x, top, end_x, bottom, BARLINE_COLOR, STAFF_END_THICK_WIDTH);
}

// ═══════════════════════════════════════════════════════════════════════
// Clef & time signature
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn render_clef(svg: &mut SvgBuilder, config: &LayoutConfig) {
    // the G line is the second line from the bottom
    let g_line_y = config.staff_top() + 3.0 * config.staff_line_spacing;
    svg.treble_clef(config.margin_left + CLEF_OFFSET_X, g_line_y, config.staff_line_spacing);
}

/// Numerator centred on the second line, denominator on the fourth.
pub(super) fn render_time_signature(svg: &mut SvgBuilder, config: &LayoutConfig) {
    let x = config.margin_left + TIME_SIG_OFFSET_X;
    let top = config.staff_top();
    let sp = config.staff_line_spacing;
    let ts = config.time_signature;

    svg.styled_text(x, top + sp, &ts.numerator.to_string(), TIME_SIG_FONT_SIZE, "bold", "normal", NOTE_COLOR, true);
    svg.styled_text(x, top + 3.0 * sp, &ts.denominator.to_string(), TIME_SIG_FONT_SIZE, "bold", "normal", NOTE_COLOR, true);
}

// ═══════════════════════════════════════════════════════════════════════
// Barline rendering
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn render_bar_lines(svg: &mut SvgBuilder, bar_lines: &[f64], config: &LayoutConfig) {
    let top = config.staff_top();
    let bottom = config.staff_bottom();
    for &x in bar_lines {
        svg.line(x, top, x, bottom, BARLINE_COLOR, BARLINE_WIDTH);
    }
}
