//! Layout computation: horizontal positions, bar lines, beam groups and
//! legato spans for one sequence.
//!
//! Everything here is recomputed per render pass from the sequence and the
//! layout constants; nothing is cached between calls.

use serde::Serialize;

use crate::config::{LayoutConfig, TimeSignature};
use crate::model::NoteEvent;
use super::constants::MAX_BEAM_GROUP;

// ═══════════════════════════════════════════════════════════════════════
// Layout structures
// ═══════════════════════════════════════════════════════════════════════

/// Consecutive beamable events joined by one beam (2..=4 members).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeamGroup {
    /// Sequence indices, ascending and contiguous.
    pub members: Vec<usize>,
}

/// A run of legato events that gets one slur (at least two events).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegatoSpan {
    pub first: usize,
    pub last: usize,
}

impl LegatoSpan {
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffLayout {
    /// Note-head x for each event.
    pub positions: Vec<f64>,
    /// Bar line x positions, left to right.
    pub bar_lines: Vec<f64>,
    pub beam_groups: Vec<BeamGroup>,
    pub legato_spans: Vec<LegatoSpan>,
}

// ═══════════════════════════════════════════════════════════════════════
// Main layout computation
// ═══════════════════════════════════════════════════════════════════════

pub fn compute_layout(events: &[NoteEvent], config: &LayoutConfig) -> StaffLayout {
    let positions = note_positions(events.len(), config);
    let bar_lines = bar_line_positions(events, &positions, config);
    let beam_groups = find_beam_groups(events, config.time_signature);
    let legato_spans = find_legato_spans(events);

    StaffLayout {
        positions,
        bar_lines,
        beam_groups,
        legato_spans,
    }
}

/// Uniform spacing: `x(i) = margin_left + lead_in + i * note_spacing`.
/// Rhythmic value does not affect spacing.
pub fn note_positions(count: usize, config: &LayoutConfig) -> Vec<f64> {
    let start = config.margin_left + config.lead_in;
    (0..count)
        .map(|i| start + i as f64 * config.note_spacing)
        .collect()
}

/// Index of the bar that `cumulative` beats fall into.
fn bar_index(cumulative: f64, beats_per_bar: f64) -> i64 {
    (cumulative / beats_per_bar).floor() as i64
}

/// Place a bar line between event `i` and `i + 1` whenever event `i` carries
/// the running total into a new bar. No bar line follows the last event,
/// and a line closer than half a note spacing to the previous one is
/// suppressed.
pub fn bar_line_positions(events: &[NoteEvent], positions: &[f64], config: &LayoutConfig) -> Vec<f64> {
    let beats_per_bar = config.time_signature.beats_per_bar();
    let min_gap = config.note_spacing / 2.0;

    let mut bar_lines = Vec::new();
    let mut cumulative = 0.0;
    let mut last_x: Option<f64> = None;

    for (i, event) in events.iter().enumerate() {
        let dur = event.effective_duration();
        let current_bar = bar_index(cumulative, beats_per_bar);
        let next_bar = bar_index(cumulative + dur, beats_per_bar);

        if next_bar > current_bar {
            if let (Some(&x), Some(&next_x)) = (positions.get(i), positions.get(i + 1)) {
                let bx = (x + next_x) / 2.0;
                if last_x.map_or(true, |prev| bx - prev > min_gap) {
                    bar_lines.push(bx);
                    last_x = Some(bx);
                }
            }
        }

        cumulative += dur;
    }

    bar_lines
}

/// Group consecutive beamable events. A group closes when the bar index
/// (taken before the current event) advances, when it reaches
/// [`MAX_BEAM_GROUP`] members, at a non-beamable event, or at the end.
/// Closed groups with fewer than two members are dropped; those events are
/// drawn with flags instead.
pub fn find_beam_groups(events: &[NoteEvent], time_signature: TimeSignature) -> Vec<BeamGroup> {
    let beats_per_bar = time_signature.beats_per_bar();

    let mut groups: Vec<BeamGroup> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut cumulative = 0.0;
    let mut last_bar = 0;

    let flush = |groups: &mut Vec<BeamGroup>, current: &mut Vec<usize>| {
        if current.len() >= 2 {
            groups.push(BeamGroup { members: std::mem::take(current) });
        } else {
            current.clear();
        }
    };

    for (i, event) in events.iter().enumerate() {
        let bar = bar_index(cumulative, beats_per_bar);

        if event.is_beamable() {
            if bar > last_bar || current.len() >= MAX_BEAM_GROUP {
                flush(&mut groups, &mut current);
            }
            current.push(i);
        } else {
            flush(&mut groups, &mut current);
        }

        last_bar = bar;
        cumulative += event.effective_duration();
    }
    flush(&mut groups, &mut current);

    groups
}

/// Single forward scan for runs of legato-tagged events. A run ends at a
/// non-legato event, at an explicit `legato-end`, or at the end of the
/// sequence. Runs shorter than two events are discarded.
pub fn find_legato_spans(events: &[NoteEvent]) -> Vec<LegatoSpan> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, event) in events.iter().enumerate() {
        if !event.is_legato() {
            start = None;
            continue;
        }

        let first = *start.get_or_insert(i);
        let next_is_legato = events.get(i + 1).is_some_and(NoteEvent::is_legato);

        if event.is_legato_end() || !next_is_legato {
            if i > first {
                spans.push(LegatoSpan { first, last: i });
            }
            start = None;
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteEvent;

    fn eighths(n: usize) -> Vec<NoteEvent> {
        (0..n).map(|i| NoteEvent::note(i as i64, "C4", 0.5)).collect()
    }

    #[test]
    fn positions_are_uniform() {
        let cfg = LayoutConfig::default();
        assert_eq!(note_positions(3, &cfg), vec![180.0, 240.0, 300.0]);
    }

    #[test]
    fn groups_cap_at_four() {
        let groups = find_beam_groups(&eighths(8), TimeSignature::default());
        let members: Vec<Vec<usize>> = groups.into_iter().map(|g| g.members).collect();
        assert_eq!(members, vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]]);
    }

    #[test]
    fn groups_break_at_bar() {
        // 3/4: six eighths fill a bar, the seventh starts bar two.
        let groups = find_beam_groups(&eighths(8), TimeSignature::new(3, 4));
        let members: Vec<Vec<usize>> = groups.into_iter().map(|g| g.members).collect();
        assert_eq!(members, vec![vec![0, 1, 2, 3], vec![4, 5], vec![6, 7]]);
    }

    #[test]
    fn singleton_before_bar_is_not_carried_over() {
        // The dotted eighth starts at beat 3.5 and is alone in bar one; the
        // eighths that follow start bar two and must not join it.
        let mut events: Vec<NoteEvent> = (0..3).map(|i| NoteEvent::note(i, "C4", 1.0)).collect();
        events.push(NoteEvent::rest(3, 0.5));
        events.push(NoteEvent::note(4, "D4", 0.5).dotted());
        events.push(NoteEvent::note(5, "E4", 0.5));
        events.push(NoteEvent::note(6, "F4", 0.5));
        let groups = find_beam_groups(&events, TimeSignature::default());
        assert_eq!(groups, vec![BeamGroup { members: vec![5, 6] }]);
    }

    #[test]
    fn rests_and_quarters_break_groups() {
        let events = vec![
            NoteEvent::note(1, "C4", 0.5),
            NoteEvent::rest(2, 0.5),
            NoteEvent::note(3, "C4", 0.5),
            NoteEvent::note(4, "C4", 0.25),
            NoteEvent::note(5, "C4", 1.0),
            NoteEvent::note(6, "C4", 0.5),
        ];
        let groups = find_beam_groups(&events, TimeSignature::default());
        assert_eq!(groups, vec![BeamGroup { members: vec![2, 3] }]);
    }

    #[test]
    fn bar_lines_between_bars_only() {
        let cfg = LayoutConfig::default();
        let events: Vec<NoteEvent> = (0..8).map(|i| NoteEvent::note(i, "C4", 1.0)).collect();
        let positions = note_positions(events.len(), &cfg);
        // Bar boundary after the fourth quarter; the closing boundary after
        // the last event gets no line.
        assert_eq!(bar_line_positions(&events, &positions, &cfg), vec![390.0]);
    }

    #[test]
    fn dotted_notes_count_one_and_a_half() {
        let cfg = LayoutConfig::default().with_time_signature(3, 4);
        let events = vec![
            NoteEvent::note(1, "C4", 2.0).dotted(),
            NoteEvent::note(2, "C4", 1.0),
        ];
        let positions = note_positions(events.len(), &cfg);
        assert_eq!(bar_line_positions(&events, &positions, &cfg), vec![210.0]);
    }

    #[test]
    fn legato_spans() {
        let events = vec![
            NoteEvent::note(1, "C4", 1.0).with_articulation("legato-start"),
            NoteEvent::note(2, "D4", 1.0).with_articulation("legato"),
            NoteEvent::note(3, "E4", 1.0).with_articulation("legato-end"),
            NoteEvent::note(4, "F4", 1.0).with_articulation("legato"),
            NoteEvent::note(5, "G4", 1.0),
            NoteEvent::note(6, "A4", 1.0).with_articulation("legato"),
            NoteEvent::note(7, "B4", 1.0).with_articulation("LEGATO"),
        ];
        assert_eq!(
            find_legato_spans(&events),
            vec![LegatoSpan { first: 0, last: 2 }, LegatoSpan { first: 5, last: 6 }]
        );
    }
}
