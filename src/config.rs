//! Layout constants for one render pass.
//!
//! All distances are in surface units (SVG user units, one pixel when
//! rasterized at 1:1).

use serde::{Deserialize, Serialize};

use crate::error::StaffError;

/// Time signature used for bar-line and beam-group detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

impl TimeSignature {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self { numerator, denominator }
    }

    /// Bar length in quarter-note beats: `numerator * (4 / denominator)`.
    pub fn beats_per_bar(&self) -> f64 {
        self.numerator as f64 * (4.0 / self.denominator as f64)
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub staff_line_spacing: f64,
    pub staff_lines: u32,
    pub note_spacing: f64,
    pub margin_left: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    /// Space between the left margin and the first event (clef + time signature).
    pub lead_in: f64,
    pub min_stem_length: f64,
    pub max_beam_slope: f64,
    pub time_signature: TimeSignature,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            staff_line_spacing: 12.0,
            staff_lines: 5,
            note_spacing: 60.0,
            margin_left: 80.0,
            margin_top: 80.0,
            margin_right: 40.0,
            margin_bottom: 40.0,
            lead_in: 100.0,
            min_stem_length: 35.0,
            max_beam_slope: 0.2,
            time_signature: TimeSignature::default(),
        }
    }
}

impl LayoutConfig {
    /// Load a config from a (possibly partial) JSON object. Missing fields
    /// keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, StaffError> {
        let config: LayoutConfig =
            serde_json::from_str(json).map_err(|e| StaffError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_time_signature(mut self, numerator: u32, denominator: u32) -> Self {
        self.time_signature = TimeSignature::new(numerator, denominator);
        self
    }

    pub fn validate(&self) -> Result<(), StaffError> {
        let positive = [
            ("staff_line_spacing", self.staff_line_spacing),
            ("note_spacing", self.note_spacing),
            ("min_stem_length", self.min_stem_length),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(StaffError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if self.staff_lines == 0 {
            return Err(StaffError::Config("staff_lines must be at least 1".into()));
        }
        if !(self.max_beam_slope.is_finite() && self.max_beam_slope >= 0.0) {
            return Err(StaffError::Config(format!(
                "max_beam_slope must be non-negative, got {}",
                self.max_beam_slope
            )));
        }
        let ts = self.time_signature;
        if ts.numerator == 0 || ts.denominator == 0 {
            return Err(StaffError::Config(format!(
                "time signature {}/{} is invalid",
                ts.numerator, ts.denominator
            )));
        }
        Ok(())
    }

    /// Y of the top staff line.
    pub fn staff_top(&self) -> f64 {
        self.margin_top
    }

    /// Y of the bottom staff line.
    pub fn staff_bottom(&self) -> f64 {
        self.margin_top + (self.staff_lines.saturating_sub(1)) as f64 * self.staff_line_spacing
    }

    /// Y of the middle staff line (offset 0).
    pub fn middle_line_y(&self) -> f64 {
        self.margin_top + 2.0 * self.staff_line_spacing
    }

    /// Note-head y for a staff offset.
    pub fn offset_to_y(&self, offset: i32) -> f64 {
        self.middle_line_y() + offset as f64 * (self.staff_line_spacing / 2.0)
    }

    /// Surface size for `count` events.
    pub fn surface_size(&self, count: usize) -> (f64, f64) {
        let width = self.margin_left + self.margin_right + count as f64 * self.note_spacing + 100.0;
        let height = self.margin_top
            + self.margin_bottom
            + self.staff_lines as f64 * self.staff_line_spacing
            + 100.0;
        (width, height)
    }
}
