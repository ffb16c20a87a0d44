//! Glyph dimensions for the staff renderer (all in SVG user units).
//!
//! Layout-level distances (margins, spacing, stem length) live in
//! [`crate::config::LayoutConfig`]; these are the fixed shapes drawn at
//! those positions.

// ── Note heads & stems ──────────────────────────────────────────────
pub(super) const NOTEHEAD_RX: f64 = 7.0;
pub(super) const NOTEHEAD_RY: f64 = 5.0;
pub(super) const NOTEHEAD_ROTATION_DEG: f64 = -17.19; // -0.3 rad
pub(super) const NOTEHEAD_HOLLOW_STROKE: f64 = 2.0;
pub(super) const STEM_X_OFFSET: f64 = 7.0; // stem sits on the head's edge
pub(super) const STEM_WIDTH: f64 = 2.0;
pub(super) const FLAG_SPACING: f64 = 8.0;
pub(super) const FLAG_WIDTH: f64 = 2.0;

// ── Beams ───────────────────────────────────────────────────────────
pub(super) const BEAM_THICKNESS: f64 = 4.0;
pub(super) const BEAM_LEVEL_STEP: f64 = 5.0; // secondary beams, toward the head
pub(super) const BEAM_STUB_LENGTH: f64 = 15.0;
pub(super) const MAX_BEAM_GROUP: usize = 4;

// ── Staff ───────────────────────────────────────────────────────────
pub(super) const STAFF_LINE_WIDTH: f64 = 1.5;
pub(super) const STAFF_END_THIN_WIDTH: f64 = 2.0;
pub(super) const STAFF_END_THICK_WIDTH: f64 = 4.0;
pub(super) const STAFF_END_GAP: f64 = 5.0;
pub(super) const BARLINE_WIDTH: f64 = 2.0;
pub(super) const LEDGER_HALF_WIDTH: f64 = 10.0;
pub(super) const LEDGER_LINE_WIDTH: f64 = 1.5;
pub(super) const CLEF_OFFSET_X: f64 = 10.0;
pub(super) const TIME_SIG_OFFSET_X: f64 = 65.0;
pub(super) const TIME_SIG_FONT_SIZE: f64 = 28.0;

// ── Dots, accidentals, articulations ────────────────────────────────
pub(super) const DOT_RADIUS: f64 = 2.5;
pub(super) const NOTE_DOT_OFFSET_X: f64 = 15.0;
pub(super) const REST_DOT_OFFSET_X: f64 = 12.0;
pub(super) const ACCIDENTAL_OFFSET_X: f64 = 20.0;
pub(super) const ARTICULATION_OFFSET_Y: f64 = 20.0;
pub(super) const TECHNIQUE_TEXT_GAP: f64 = 5.0; // pizz./arco above the staff
pub(super) const TREMOLO_START: f64 = 15.0;
pub(super) const TREMOLO_STEP: f64 = 4.0;
pub(super) const TREMOLO_SLASHES: usize = 3;

// ── Slurs ───────────────────────────────────────────────────────────
pub(super) const SLUR_END_INSET_X: f64 = 8.0;
pub(super) const SLUR_HEAD_CLEARANCE: f64 = 12.0;
pub(super) const SLUR_MAX_CURVATURE: f64 = 25.0;
pub(super) const SLUR_WIDTH: f64 = 1.5;

// ── Colors ──────────────────────────────────────────────────────────
pub(super) const BACKGROUND_COLOR: &str = "#ffffff";
pub(super) const NOTE_COLOR: &str = "#000000";
pub(super) const STAFF_COLOR: &str = "#000000";
pub(super) const BARLINE_COLOR: &str = "#000000";
pub(super) const REST_COLOR: &str = "#000000";
