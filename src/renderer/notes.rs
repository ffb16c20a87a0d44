//! Note, rest, flag, dot, accidental, ledger line and articulation rendering.

use crate::config::LayoutConfig;
use crate::model::{Articulation, Duration, NoteEvent};
use crate::pitch::{parse_pitch, staff_offset_or_middle, Accidental};
use super::constants::*;
use super::svg_builder::SvgBuilder;

// ── Positions ───────────────────────────────────────────────────────

/// Note-head y of an event. Rests and unmappable pitches sit on the middle
/// line.
pub(super) fn head_y(event: &NoteEvent, config: &LayoutConfig) -> f64 {
    match event.pitch() {
        Some(pitch) => config.offset_to_y(staff_offset_or_middle(pitch)),
        None => config.middle_line_y(),
    }
}

/// Stems go up for heads on or below the middle line.
pub(super) fn stem_up_for(y: f64, config: &LayoutConfig) -> bool {
    y >= config.middle_line_y()
}

pub(super) fn stem_x(x: f64, stem_up: bool) -> f64 {
    if stem_up { x + STEM_X_OFFSET } else { x - STEM_X_OFFSET }
}

fn accidental_of(event: &NoteEvent) -> Option<Accidental> {
    event.pitch().and_then(|p| parse_pitch(p).ok()).and_then(|p| p.accidental)
}

// ── Lone notes ──────────────────────────────────────────────────────

/// Draw an event that is not part of a beam group.
pub(super) fn render_note(svg: &mut SvgBuilder, event: &NoteEvent, x: f64, config: &LayoutConfig) {
    let y = head_y(event, config);
    let duration = event.duration();
    let stem_up = stem_up_for(y, config);

    render_ledger_lines(svg, x, y, config);
    if let Some(acc) = accidental_of(event) {
        render_accidental(svg, x - ACCIDENTAL_OFFSET_X, y, acc);
    }

    svg.notehead(x, y, duration.is_filled());

    if duration.has_stem() {
        let end_y = render_stem(svg, x, y, stem_up, config.min_stem_length);
        let flags = duration.beam_count();
        if flags > 0 {
            render_flags(svg, stem_x(x, stem_up), end_y, stem_up, flags);
        }
    }

    if event.dotted {
        render_dot(svg, x + NOTE_DOT_OFFSET_X, y, config);
    }

    if let Some(art) = event.articulation_kind() {
        render_articulation(svg, x, y, art, stem_up, config);
    }
}

/// Draw the decorations of a beamed member: everything except its stem.
pub(super) fn render_beamed_head(
    svg: &mut SvgBuilder,
    event: &NoteEvent,
    x: f64,
    y: f64,
    stem_up: bool,
    config: &LayoutConfig,
) {
    render_ledger_lines(svg, x, y, config);
    if let Some(acc) = accidental_of(event) {
        render_accidental(svg, x - ACCIDENTAL_OFFSET_X, y, acc);
    }
    svg.notehead(x, y, true);
    if event.dotted {
        render_dot(svg, x + NOTE_DOT_OFFSET_X, y, config);
    }
    if let Some(art) = event.articulation_kind() {
        render_articulation(svg, x, y, art, stem_up, config);
    }
}

/// Returns the y of the stem's free end.
pub(super) fn render_stem(svg: &mut SvgBuilder, x: f64, y: f64, stem_up: bool, length: f64) -> f64 {
    let sx = stem_x(x, stem_up);
    let end_y = if stem_up { y - length } else { y + length };
    svg.line(sx, y, sx, end_y, NOTE_COLOR, STEM_WIDTH);
    end_y
}

/// One curved stroke per flag, stacked from the stem end toward the head.
fn render_flags(svg: &mut SvgBuilder, stem_x: f64, stem_end_y: f64, stem_up: bool, count: usize) {
    for i in 0..count {
        let step = i as f64 * FLAG_SPACING;
        let d = if stem_up {
            let fy = stem_end_y + step;
            format!(
                "M{:.1},{:.1} C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
                stem_x, fy, stem_x + 15.0, fy + 5.0, stem_x + 15.0, fy + 10.0, stem_x, fy + 12.0
            )
        } else {
            let fy = stem_end_y - step;
            format!(
                "M{:.1},{:.1} C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
                stem_x, fy, stem_x - 15.0, fy - 5.0, stem_x - 15.0, fy - 10.0, stem_x, fy - 12.0
            )
        };
        svg.path(&d, "none", NOTE_COLOR, FLAG_WIDTH);
    }
}

// ── Dots ────────────────────────────────────────────────────────────

fn sits_on_line(y: f64, config: &LayoutConfig) -> bool {
    let rel = (y - config.staff_top()) / config.staff_line_spacing;
    (rel - rel.round()).abs() < 0.01
}

/// Augmentation dot; moved up into the space when the head is on a line.
fn render_dot(svg: &mut SvgBuilder, dot_x: f64, y: f64, config: &LayoutConfig) {
    let dot_y = if sits_on_line(y, config) {
        y - config.staff_line_spacing / 2.0
    } else {
        y
    };
    svg.circle(dot_x, dot_y, DOT_RADIUS, NOTE_COLOR);
}

// ── Rest rendering ──────────────────────────────────────────────────

pub(super) fn render_rest(svg: &mut SvgBuilder, event: &NoteEvent, x: f64, config: &LayoutConfig) {
    let top = config.staff_top();
    let sp = config.staff_line_spacing;
    let c = config.middle_line_y();

    if let Some(bars) = event.multi_bar_count() {
        render_multi_bar_rest(svg, x, c, bars);
        return;
    }

    match event.duration() {
        Duration::Whole => {
            // hangs from the fourth line
            svg.rect(x - 6.0, top + sp, 12.0, 6.0, REST_COLOR, "none", 0.0);
        }
        Duration::Half => {
            svg.rect(x - 6.0, c - 6.0, 12.0, 6.0, REST_COLOR, "none", 0.0);
        }
        Duration::Quarter => {
            let d = format!(
                "M{:.1},{:.1} Q{:.1},{:.1} {:.1},{:.1} Q{:.1},{:.1} {:.1},{:.1} L{:.1},{:.1} Q{:.1},{:.1} {:.1},{:.1}",
                x - 4.0, c - 12.0,
                x + 2.0, c - 8.0, x - 2.0, c - 4.0,
                x - 6.0, c, x + 4.0, c + 4.0,
                x + 2.0, c + 8.0,
                x - 4.0, c + 10.0, x - 3.0, c + 14.0,
            );
            svg.path(&d, "none", REST_COLOR, 2.0);
            svg.circle(x - 3.0, c + 14.0, DOT_RADIUS, REST_COLOR);
        }
        Duration::Eighth => {
            svg.line(x, c + 8.0, x, c - 4.0, REST_COLOR, 2.5);
            rest_flag(svg, x, c);
            svg.circle(x, c + 6.0, DOT_RADIUS, REST_COLOR);
        }
        // thirty-seconds share the sixteenth glyph
        Duration::Sixteenth | Duration::ThirtySecond => {
            svg.line(x, c + 12.0, x, c - 4.0, REST_COLOR, 2.5);
            rest_flag(svg, x, c - 2.0);
            svg.circle(x, c + 3.0, DOT_RADIUS, REST_COLOR);
            rest_flag(svg, x, c + 4.0);
            svg.circle(x, c + 9.0, DOT_RADIUS, REST_COLOR);
        }
    }

    if event.dotted {
        render_dot(svg, x + REST_DOT_OFFSET_X, c, config);
    }
}

/// Lower half-disc of radius 4 centred on (x, y).
fn rest_flag(svg: &mut SvgBuilder, x: f64, y: f64) {
    let d = format!("M{:.1},{:.1} A4,4 0 0 1 {:.1},{:.1} Z", x + 4.0, y, x - 4.0, y);
    svg.path(&d, REST_COLOR, "none", 0.0);
}

/// Thick bar with end posts and the bar count above.
fn render_multi_bar_rest(svg: &mut SvgBuilder, x: f64, c: f64, bars: u32) {
    svg.rect(x - 20.0, c - 4.0, 40.0, 8.0, REST_COLOR, "none", 0.0);
    svg.rect(x - 20.0, c - 10.0, 3.0, 20.0, REST_COLOR, "none", 0.0);
    svg.rect(x + 17.0, c - 10.0, 3.0, 20.0, REST_COLOR, "none", 0.0);
    svg.text(x, c - 15.0, &bars.to_string(), 16.0, "bold", REST_COLOR, "middle");
}

// ── Accidental rendering ────────────────────────────────────────────

/// Vector accidental centred on (x, y).
fn render_accidental(svg: &mut SvgBuilder, x: f64, y: f64, accidental: Accidental) {
    match accidental {
        Accidental::Sharp => {
            svg.line(x - 2.5, y - 11.0, x - 2.5, y + 13.0, NOTE_COLOR, 1.2);
            svg.line(x + 2.5, y - 13.0, x + 2.5, y + 11.0, NOTE_COLOR, 1.2);
            svg.line(x - 6.0, y - 2.0, x + 6.0, y - 6.0, NOTE_COLOR, 3.0);
            svg.line(x - 6.0, y + 6.0, x + 6.0, y + 2.0, NOTE_COLOR, 3.0);
        }
        Accidental::Flat => {
            svg.line(x - 4.0, y - 16.0, x - 4.0, y + 5.0, NOTE_COLOR, 1.5);
            let d = format!(
                "M{:.1},{:.1} C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1} L{:.1},{:.1}",
                x - 4.0, y - 1.0,
                x + 1.0, y - 6.0,
                x + 7.0, y - 3.0,
                x + 4.0, y + 1.0,
                x - 4.0, y + 5.0,
            );
            svg.path(&d, "none", NOTE_COLOR, 1.8);
        }
    }
}

// ── Ledger lines ────────────────────────────────────────────────────

/// Y of every ledger line a head at `note_y` needs, stepping outward from
/// the nearest staff edge one line spacing at a time.
pub fn ledger_line_ys(note_y: f64, config: &LayoutConfig) -> Vec<f64> {
    const EPS: f64 = 0.01;
    let sp = config.staff_line_spacing;
    let top = config.staff_top();
    let bottom = config.staff_bottom();
    let mut ys = Vec::new();

    if note_y < top {
        let mut y = top - sp;
        while y >= note_y - EPS {
            ys.push(y);
            y -= sp;
        }
    } else if note_y > bottom {
        let mut y = bottom + sp;
        while y <= note_y + EPS {
            ys.push(y);
            y += sp;
        }
    }

    ys
}

fn render_ledger_lines(svg: &mut SvgBuilder, x: f64, note_y: f64, config: &LayoutConfig) {
    for y in ledger_line_ys(note_y, config) {
        svg.line(
            x - LEDGER_HALF_WIDTH,
            y,
            x + LEDGER_HALF_WIDTH,
            y,
            STAFF_COLOR,
            LEDGER_LINE_WIDTH,
        );
    }
}

// ── Articulations ───────────────────────────────────────────────────

/// Marks go on the side opposite the stem; string techniques go above the
/// staff. Legato tags draw nothing here (slurs are drawn per span).
fn render_articulation(
    svg: &mut SvgBuilder,
    x: f64,
    y: f64,
    articulation: Articulation,
    stem_up: bool,
    config: &LayoutConfig,
) {
    let ay = if stem_up { y + ARTICULATION_OFFSET_Y } else { y - ARTICULATION_OFFSET_Y };
    // +1 when the mark is below the head, -1 when above
    let side = if stem_up { 1.0 } else { -1.0 };

    match articulation {
        Articulation::Staccato => {
            svg.circle(x, ay, DOT_RADIUS, NOTE_COLOR);
        }
        Articulation::Accent => {
            // points toward the note
            svg.polyline(
                &[(x - 8.0, ay + 3.0 * side), (x, ay - 3.0 * side), (x + 8.0, ay + 3.0 * side)],
                NOTE_COLOR,
                2.0,
            );
        }
        Articulation::Marcato => {
            // points away from the note
            svg.polyline(
                &[(x - 6.0, ay - 4.0 * side), (x, ay + 4.0 * side), (x + 6.0, ay - 4.0 * side)],
                NOTE_COLOR,
                2.0,
            );
        }
        Articulation::Tenuto => {
            svg.line(x - 8.0, ay, x + 8.0, ay, NOTE_COLOR, 2.0);
        }
        Articulation::Pizzicato => {
            let ty = config.staff_top() - TECHNIQUE_TEXT_GAP;
            svg.styled_text(x, ty, "pizz.", 11.0, "normal", "italic", NOTE_COLOR, false);
        }
        Articulation::Arco => {
            let ty = config.staff_top() - TECHNIQUE_TEXT_GAP;
            svg.styled_text(x, ty, "arco", 11.0, "normal", "italic", NOTE_COLOR, false);
        }
        Articulation::Sforzando => {
            svg.styled_text(x, ay, "sfz", 12.0, "bold", "italic", NOTE_COLOR, true);
        }
        Articulation::Tremolo => render_tremolo(svg, x, y, stem_up),
        Articulation::Legato | Articulation::LegatoStart | Articulation::LegatoEnd => {}
    }
}

/// Three slashes across the stem.
fn render_tremolo(svg: &mut SvgBuilder, x: f64, y: f64, stem_up: bool) {
    let sx = stem_x(x, stem_up);
    let start_y = if stem_up { y - TREMOLO_START } else { y + TREMOLO_START };

    for i in 0..TREMOLO_SLASHES {
        let step = i as f64 * TREMOLO_STEP;
        let sy = if stem_up { start_y - step } else { start_y + step };
        svg.line(sx - 6.0, sy, sx + 6.0, sy - 4.0, NOTE_COLOR, 2.5);
    }
}
