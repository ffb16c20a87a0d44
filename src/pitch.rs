//! Pitch spelling → vertical staff offset.
//!
//! Offsets are counted in half line-spacings from the middle staff line
//! (B4 = 0). Higher pitches are more negative so that they land higher on
//! the page. Even offsets sit on lines, odd offsets in spaces.

use std::fmt;

use thiserror::Error;

/// Lowest and highest octave the staff map covers.
pub const MIN_OCTAVE: i32 = 2;
pub const MAX_OCTAVE: i32 = 6;

/// Reference pitch sitting on the middle staff line.
const REFERENCE_OCTAVE: i32 = 4;
const REFERENCE_STEP: i32 = 6; // B

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PitchError {
    #[error("unparseable pitch spelling `{0}`")]
    Unparseable(String),
    #[error("pitch `{spelling}` is outside the supported octave range 2..=6")]
    OctaveOutOfRange { spelling: String, octave: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accidental {
    Sharp,
    Flat,
}

/// A parsed pitch spelling such as `C4`, `F#5` or `Bb3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    pub letter: char,
    pub accidental: Option<Accidental>,
    pub octave: i32,
}

impl Pitch {
    /// Diatonic step within the octave (C = 0 … B = 6).
    pub fn step(&self) -> i32 {
        match self.letter {
            'C' => 0,
            'D' => 1,
            'E' => 2,
            'F' => 3,
            'G' => 4,
            'A' => 5,
            _ => 6,
        }
    }

    /// Staff offset relative to the middle line. Accidentals do not move
    /// the note head.
    pub fn staff_offset(&self) -> i32 {
        let diatonic = (self.octave - REFERENCE_OCTAVE) * 7 + (self.step() - REFERENCE_STEP);
        -diatonic
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let acc = match self.accidental {
            Some(Accidental::Sharp) => "#",
            Some(Accidental::Flat) => "b",
            None => "",
        };
        write!(f, "{}{}{}", self.letter, acc, self.octave)
    }
}

/// Parse `<Letter A-G><optional # or b><octave digit>`.
///
/// Only the shape is checked here; see [`staff_offset`] for the octave
/// range check.
pub fn parse_pitch(spelling: &str) -> Result<Pitch, PitchError> {
    let unparseable = || PitchError::Unparseable(spelling.to_string());

    let mut chars = spelling.chars();
    let letter = chars.next().ok_or_else(unparseable)?;
    if !('A'..='G').contains(&letter) {
        return Err(unparseable());
    }

    let rest: Vec<char> = chars.collect();
    let (accidental, digits) = match rest.as_slice() {
        ['#', d] => (Some(Accidental::Sharp), *d),
        ['b', d] => (Some(Accidental::Flat), *d),
        [d] => (None, *d),
        _ => return Err(unparseable()),
    };

    let octave = digits.to_digit(10).ok_or_else(unparseable)? as i32;

    Ok(Pitch { letter, accidental, octave })
}

/// Map a spelling to its staff offset.
///
/// Fails on a malformed spelling or an octave outside
/// [`MIN_OCTAVE`]..=[`MAX_OCTAVE`].
pub fn staff_offset(spelling: &str) -> Result<i32, PitchError> {
    let pitch = parse_pitch(spelling)?;
    if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&pitch.octave) {
        return Err(PitchError::OctaveOutOfRange {
            spelling: spelling.to_string(),
            octave: pitch.octave,
        });
    }
    Ok(pitch.staff_offset())
}

/// Staff offset with the renderer's fallback: anything that does not map
/// is placed on the middle line and logged.
pub fn staff_offset_or_middle(spelling: &str) -> i32 {
    match staff_offset(spelling) {
        Ok(offset) => offset,
        Err(err) => {
            log::warn!("{err}; placing on the middle line");
            0
        }
    }
}
