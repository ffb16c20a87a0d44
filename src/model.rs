//! Data model for a single-voice note sequence.
//!
//! The persisted/shareable form is a JSON object mapping integer order keys
//! to arrays: `[pitch | "rest", duration, articulation?, dotted?, multiBar?]`.
//! [`normalize`] turns that into a [`Sequence`] sorted by order key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StaffError;

/// Rhythmic value class of an event, used for glyph selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Duration {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl Duration {
    /// Classify a raw duration value (in quarter-note beats). Values outside
    /// the six supported ones are drawn as thirty-seconds.
    pub fn from_value(value: f64) -> Self {
        const TABLE: [(f64, Duration); 6] = [
            (4.0, Duration::Whole),
            (2.0, Duration::Half),
            (1.0, Duration::Quarter),
            (0.5, Duration::Eighth),
            (0.25, Duration::Sixteenth),
            (0.125, Duration::ThirtySecond),
        ];
        TABLE
            .iter()
            .find(|(v, _)| (v - value).abs() < 1e-9)
            .map(|&(_, d)| d)
            .unwrap_or(Duration::ThirtySecond)
    }

    pub fn value(&self) -> f64 {
        match self {
            Duration::Whole => 4.0,
            Duration::Half => 2.0,
            Duration::Quarter => 1.0,
            Duration::Eighth => 0.5,
            Duration::Sixteenth => 0.25,
            Duration::ThirtySecond => 0.125,
        }
    }

    /// Number of flags on a lone note, or beams in a beam group.
    pub fn beam_count(&self) -> usize {
        match self {
            Duration::Whole | Duration::Half | Duration::Quarter => 0,
            Duration::Eighth => 1,
            Duration::Sixteenth => 2,
            Duration::ThirtySecond => 3,
        }
    }

    /// Whole and half notes have hollow heads.
    pub fn is_filled(&self) -> bool {
        !matches!(self, Duration::Whole | Duration::Half)
    }

    pub fn has_stem(&self) -> bool {
        *self != Duration::Whole
    }
}

/// Closed articulation vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Articulation {
    Staccato,
    Accent,
    Legato,
    LegatoStart,
    LegatoEnd,
    Pizzicato,
    Arco,
    Tremolo,
    Sforzando,
    Marcato,
    Tenuto,
}

impl Articulation {
    /// Case-insensitive lookup. Unknown tags yield `None` and draw nothing.
    pub fn parse(tag: &str) -> Option<Self> {
        let art = match tag.trim().to_lowercase().as_str() {
            "staccato" => Articulation::Staccato,
            "accent" => Articulation::Accent,
            "legato" => Articulation::Legato,
            "legato-start" => Articulation::LegatoStart,
            "legato-end" => Articulation::LegatoEnd,
            "pizzicato" | "pizz" | "pizz." => Articulation::Pizzicato,
            "arco" => Articulation::Arco,
            "tremolo" => Articulation::Tremolo,
            "sforzando" | "sfz" => Articulation::Sforzando,
            "marcato" => Articulation::Marcato,
            "tenuto" => Articulation::Tenuto,
            _ => return None,
        };
        Some(art)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Articulation::Staccato => "staccato",
            Articulation::Accent => "accent",
            Articulation::Legato => "legato",
            Articulation::LegatoStart => "legato-start",
            Articulation::LegatoEnd => "legato-end",
            Articulation::Pizzicato => "pizzicato",
            Articulation::Arco => "arco",
            Articulation::Tremolo => "tremolo",
            Articulation::Sforzando => "sforzando",
            Articulation::Marcato => "marcato",
            Articulation::Tenuto => "tenuto",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A pitched note. The spelling is kept verbatim; it is resolved to a
    /// staff position at layout time.
    Note { pitch: String },
    /// A rest, optionally spanning several whole bars.
    Rest { multi_bar: Option<u32> },
}

/// One entry of the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Order key from the input map (unique, not necessarily contiguous).
    pub order: i64,
    pub kind: EventKind,
    /// Raw duration value in quarter-note beats.
    pub duration_value: f64,
    pub dotted: bool,
    /// Articulation tag as entered.
    pub articulation: Option<String>,
}

impl NoteEvent {
    pub fn note(order: i64, pitch: &str, duration_value: f64) -> Self {
        Self {
            order,
            kind: EventKind::Note { pitch: pitch.to_string() },
            duration_value,
            dotted: false,
            articulation: None,
        }
    }

    pub fn rest(order: i64, duration_value: f64) -> Self {
        Self {
            order,
            kind: EventKind::Rest { multi_bar: None },
            duration_value,
            dotted: false,
            articulation: None,
        }
    }

    pub fn dotted(mut self) -> Self {
        self.dotted = true;
        self
    }

    pub fn with_articulation(mut self, tag: &str) -> Self {
        self.articulation = Some(tag.to_string());
        self
    }

    /// Turn a rest into a multi-bar rest. Ignored for notes.
    pub fn multi_bar(mut self, bars: u32) -> Self {
        if let EventKind::Rest { ref mut multi_bar } = self.kind {
            *multi_bar = (bars > 1).then_some(bars);
        }
        self
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.kind, EventKind::Rest { .. })
    }

    pub fn pitch(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Note { pitch } => Some(pitch),
            EventKind::Rest { .. } => None,
        }
    }

    pub fn multi_bar_count(&self) -> Option<u32> {
        match self.kind {
            EventKind::Rest { multi_bar } => multi_bar,
            EventKind::Note { .. } => None,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_value(self.duration_value)
    }

    /// Duration used for bar arithmetic: 1.5× when dotted.
    pub fn effective_duration(&self) -> f64 {
        if self.dotted {
            self.duration_value * 1.5
        } else {
            self.duration_value
        }
    }

    /// Eighths and shorter, not rests.
    pub fn is_beamable(&self) -> bool {
        !self.is_rest() && self.duration_value < 1.0
    }

    pub fn articulation_kind(&self) -> Option<Articulation> {
        self.articulation.as_deref().and_then(Articulation::parse)
    }

    /// Any tag containing "legato" (case-insensitive) joins a slur span.
    pub fn is_legato(&self) -> bool {
        self.articulation
            .as_deref()
            .is_some_and(|a| a.to_lowercase().contains("legato"))
    }

    pub fn is_legato_end(&self) -> bool {
        self.articulation
            .as_deref()
            .is_some_and(|a| a.trim().eq_ignore_ascii_case("legato-end"))
    }
}

/// Events in ascending order-key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    events: Vec<NoteEvent>,
}

impl Sequence {
    /// Build a sequence, sorting by order key.
    pub fn from_events(mut events: Vec<NoteEvent>) -> Self {
        events.sort_by_key(|e| e.order);
        Self { events }
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteEvent> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a NoteEvent;
    type IntoIter = std::slice::Iter<'a, NoteEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Raw entry normalization
// ═══════════════════════════════════════════════════════════════════════

fn is_rest_token(token: &str) -> bool {
    let lower = token.to_lowercase();
    lower == "rest" || lower.starts_with('r')
}

/// Convert one raw entry. Returns `None` for entries that fail the shape check.
fn parse_entry(key: &str, value: &Value) -> Option<NoteEvent> {
    let order: i64 = key.trim().parse().ok()?;
    let items = value.as_array()?;
    if items.len() < 2 {
        return None;
    }

    let token = items[0].as_str()?;
    let duration_value = items[1].as_f64()?;
    let articulation = items.get(2).and_then(Value::as_str).map(str::to_string);
    let dotted = items.get(3).and_then(Value::as_bool).unwrap_or(false);

    let kind = if is_rest_token(token) {
        let multi_bar = items
            .get(4)
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite())
            .map(|n| n.trunc())
            .filter(|&n| n > 1.0 && n <= u32::MAX as f64)
            .map(|n| n as u32);
        EventKind::Rest { multi_bar }
    } else {
        EventKind::Note { pitch: token.to_string() }
    };

    Some(NoteEvent { order, kind, duration_value, dotted, articulation })
}

/// Normalize a raw entry map into a sorted [`Sequence`].
///
/// Entries that are not arrays of at least two elements (string, number)
/// or whose key is not an integer are dropped.
pub fn normalize(entries: &Map<String, Value>) -> Sequence {
    let events = entries
        .iter()
        .filter_map(|(key, value)| {
            let event = parse_entry(key, value);
            if event.is_none() {
                log::debug!("dropping malformed entry {key}: {value}");
            }
            event
        })
        .collect();
    Sequence::from_events(events)
}

/// Decode the shared-state JSON (already URL-decoded) into a sequence.
pub fn decode_shared_state(json: &str) -> Result<Sequence, StaffError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| StaffError::SharedState(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(normalize(&map)),
        other => Err(StaffError::SharedState(format!(
            "expected a JSON object of entries, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Encode a sequence in the shared-state format. Trailing fields are only
/// written when needed, with `null`/`false` placeholders in front of them.
pub fn encode_shared_state(sequence: &Sequence) -> String {
    let mut map = Map::new();
    for event in sequence {
        let token = match &event.kind {
            EventKind::Note { pitch } => pitch.clone(),
            EventKind::Rest { .. } => "rest".to_string(),
        };
        let mut items = vec![Value::from(token), Value::from(event.duration_value)];
        let multi_bar = event.multi_bar_count();

        match &event.articulation {
            Some(tag) => items.push(Value::from(tag.clone())),
            None if event.dotted || multi_bar.is_some() => items.push(Value::Null),
            None => {}
        }
        if event.dotted || multi_bar.is_some() {
            items.push(Value::from(event.dotted));
        }
        if let Some(bars) = multi_bar {
            items.push(Value::from(bars));
        }
        map.insert(event.order.to_string(), Value::Array(items));
    }
    Value::Object(map).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn duration_classes() {
        assert_eq!(Duration::from_value(4.0), Duration::Whole);
        assert_eq!(Duration::from_value(0.125), Duration::ThirtySecond);
        assert_eq!(Duration::from_value(3.0), Duration::ThirtySecond);
        assert_eq!(Duration::Sixteenth.beam_count(), 2);
        assert!(!Duration::Half.is_filled());
        assert!(!Duration::Whole.has_stem());
    }

    #[test]
    fn articulation_aliases() {
        assert_eq!(Articulation::parse("SFZ"), Some(Articulation::Sforzando));
        assert_eq!(Articulation::parse("pizz."), Some(Articulation::Pizzicato));
        assert_eq!(Articulation::parse("Legato-End"), Some(Articulation::LegatoEnd));
        assert_eq!(Articulation::parse("fermata"), None);
    }

    #[test]
    fn rest_detection_is_prefix_based() {
        let seq = normalize(&entries(json!({
            "1": ["REST", 1],
            "2": ["r", 0.5],
            "3": ["C4", 1]
        })));
        let rests: Vec<bool> = seq.iter().map(NoteEvent::is_rest).collect();
        assert_eq!(rests, vec![true, true, false]);
    }

    #[test]
    fn multi_bar_only_for_rests() {
        let seq = normalize(&entries(json!({
            "1": ["rest", 1, null, false, 3],
            "2": ["C4", 1, null, false, 3],
            "3": ["rest", 1, null, false, 1]
        })));
        let counts: Vec<Option<u32>> = seq.iter().map(NoteEvent::multi_bar_count).collect();
        assert_eq!(counts, vec![Some(3), None, None]);
    }

    #[test]
    fn multi_bar_accepts_any_number() {
        let seq = normalize(&entries(json!({
            "1": ["rest", 1, null, false, 3.0],
            "2": ["rest", 1, null, false, 4.5],
            "3": ["rest", 1, null, false, 1.5],
            "4": ["rest", 1, null, false, "3"]
        })));
        let counts: Vec<Option<u32>> = seq.iter().map(NoteEvent::multi_bar_count).collect();
        assert_eq!(counts, vec![Some(3), Some(4), None, None]);
    }

    #[test]
    fn null_and_omitted_fields_are_equivalent() {
        let a = normalize(&entries(json!({"1": ["C4", 1]})));
        let b = normalize(&entries(json!({"1": ["C4", 1, null, null]})));
        assert_eq!(a, b);
    }

    #[test]
    fn legato_tags() {
        let e = NoteEvent::note(1, "C4", 1.0).with_articulation("Legato-End");
        assert!(e.is_legato());
        assert!(e.is_legato_end());
        let e = NoteEvent::note(1, "C4", 1.0).with_articulation(" legato-end ");
        assert!(e.is_legato_end());
        assert_eq!(e.articulation_kind(), Some(Articulation::LegatoEnd));
        let e = NoteEvent::note(1, "C4", 1.0).with_articulation("staccato");
        assert!(!e.is_legato());
    }

    #[test]
    fn effective_duration_of_dotted() {
        assert_eq!(NoteEvent::note(1, "C4", 2.0).dotted().effective_duration(), 3.0);
        assert_eq!(NoteEvent::rest(1, 0.5).effective_duration(), 0.5);
    }

    #[test]
    fn encode_matches_ui_format() {
        let seq = Sequence::from_events(vec![
            NoteEvent::note(1, "C4", 1.0).with_articulation("legato"),
            NoteEvent::note(2, "C5", 2.0).dotted(),
            NoteEvent::rest(3, 1.0).multi_bar(3),
        ]);
        let encoded: Value = serde_json::from_str(&encode_shared_state(&seq)).unwrap();
        assert_eq!(
            encoded,
            json!({
                "1": ["C4", 1.0, "legato"],
                "2": ["C5", 2.0, null, true],
                "3": ["rest", 1.0, null, false, 3]
            })
        );
        assert_eq!(decode_shared_state(&encoded.to_string()).unwrap(), seq);
    }
}
