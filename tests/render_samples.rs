//! Rendering tests: render sample note maps to SVG.

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use stafflib::{
    decode_shared_state, render_json_to_svg, render_sequence, BeamGroup, LayoutConfig,
    LegatoSpan, RenderedStaff, StaffError,
};

fn output_dir() -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_output");
    std::fs::create_dir_all(&dir).ok();
    dir
}

fn render(json: &str) -> RenderedStaff {
    let seq = decode_shared_state(json).expect("valid shared state");
    render_sequence(&seq, &LayoutConfig::default())
}

fn count(svg: &str, needle: &str) -> usize {
    svg.matches(needle).count()
}

#[test]
fn legato_quarters_get_one_slur_and_no_beams() {
    let staff = render(r#"{"1":["C4",1,"legato"],"2":["E4",1,"legato"],"3":["G4",1,"legato"]}"#);

    assert_eq!(staff.layout.legato_spans, vec![LegatoSpan { first: 0, last: 2 }]);
    assert!(staff.layout.beam_groups.is_empty());
    assert_eq!(staff.slurs.len(), 1);
    assert_eq!(count(staff.svg(), "<ellipse"), 3);
    assert_eq!(count(staff.svg(), " Q"), 1);
}

#[test]
fn four_eighths_form_one_beam_group() {
    let staff = render(r#"{"1":["C4",0.5],"2":["D4",0.5],"3":["E4",0.5],"4":["F4",0.5]}"#);

    assert_eq!(staff.layout.beam_groups, vec![BeamGroup { members: vec![0, 1, 2, 3] }]);
    assert!(staff.layout.bar_lines.is_empty());
    assert_eq!(staff.beams.len(), 1);
    assert!(staff.beams[0].stem_up);

    // Beamed notes carry no flags.
    assert!(!staff.svg().contains(" C"));
}

#[test]
fn whole_rest_alone() {
    let staff = render(r#"{"1":["rest",4]}"#);

    assert_eq!((staff.width, staff.height), (280.0, 280.0));
    assert!(staff.svg().contains(r#"viewBox="0 0 280 280""#));
    // hangs from the fourth line
    assert!(staff.svg().contains(r##"<rect x="174.0" y="92.0" width="12.0" height="6.0" fill="#000000"/>"##));
    assert_eq!(count(staff.svg(), "<ellipse"), 0);
}

#[test]
fn multi_bar_rest_shows_count() {
    let staff = render(r#"{"1":["rest",1,null,false,3]}"#);
    let svg = staff.svg();

    assert!(svg.contains(">3</text>"));
    assert!(svg.contains(r#"width="40.0" height="8.0""#));
    // no quarter-rest dot
    assert_eq!(count(svg, "<circle"), 0);
}

#[test]
fn invalid_pitch_does_not_break_layout() {
    let staff = render(r#"{"1":["H4",1],"2":["C4",1],"3":["E4",1]}"#);

    assert_eq!(staff.layout.positions, vec![180.0, 240.0, 300.0]);
    assert_eq!(count(staff.svg(), "<ellipse"), 3);
    // H4 falls back to the middle line
    assert!(staff.svg().contains(r#"cx="180.0" cy="104.0""#));
}

#[test]
fn rendering_is_deterministic() {
    let json = r#"{"1":["C4",0.5,"staccato"],"2":["D5",0.25],"3":["F#4",0.25,"accent"],"4":["rest",1],"5":["Bb4",2,null,true],"6":["A5",1,"legato"],"7":["G5",1,"legato-end"]}"#;
    let a = render(json);
    let b = render(json);
    assert_eq!(a.svg(), b.svg());
    assert_eq!(a, b);
}

#[test]
fn key_order_in_input_does_not_matter() {
    let a = decode_shared_state(r#"{"10":["E4",1],"2":["C4",1],"7":["D4",1]}"#).unwrap();
    let b = decode_shared_state(r#"{"2":["C4",1],"7":["D4",1],"10":["E4",1]}"#).unwrap();
    assert_eq!(a, b);

    let pitches: Vec<&str> = a.iter().filter_map(|e| e.pitch()).collect();
    assert_eq!(pitches, vec!["C4", "D4", "E4"]);
}

#[test]
fn malformed_shared_state_is_an_error() {
    let result = render_json_to_svg("{not json", &LayoutConfig::default());
    assert!(matches!(result, Err(StaffError::SharedState(_))));

    let result = render_json_to_svg("[1,2,3]", &LayoutConfig::default());
    assert!(matches!(result, Err(StaffError::SharedState(_))));
}

#[test]
fn malformed_entries_are_skipped() {
    let staff = render(r#"{"1":["C4"],"2":"D4","x":["E4",1],"3":["F4",1]}"#);
    assert_eq!(staff.layout.positions.len(), 1);
}

#[test]
fn middle_c_gets_a_ledger_line() {
    let staff = render(r#"{"1":["C4",1]}"#);
    assert!(staff.svg().contains(r#"<line x1="170.0" y1="140.0" x2="190.0" y2="140.0""#));
}

#[test]
fn dot_sits_in_a_space() {
    // C5 is in the third space; dot stays level with the head.
    let staff = render(r#"{"1":["C5",2,null,true]}"#);
    assert!(staff.svg().contains(r#"<circle cx="195.0" cy="98.0""#));

    // B4 is on the middle line; dot moves up half a space.
    let staff = render(r#"{"1":["B4",2,null,true]}"#);
    assert!(staff.svg().contains(r#"<circle cx="195.0" cy="98.0""#));
}

#[test]
fn bar_lines_follow_time_signature() {
    let seq = decode_shared_state(r#"{"1":["C4",1],"2":["C4",1],"3":["C4",1],"4":["C4",1],"5":["C4",1],"6":["C4",1]}"#).unwrap();

    let four = render_sequence(&seq, &LayoutConfig::default());
    assert_eq!(four.layout.bar_lines, vec![390.0]);

    let three = render_sequence(&seq, &LayoutConfig::default().with_time_signature(3, 4));
    assert_eq!(three.layout.bar_lines, vec![330.0]);
    assert!(three.svg().contains(">3</text>"));
}

#[test]
fn write_sample_for_inspection() {
    let json = r#"{"1":["C4",0.5],"2":["E4",0.5],"3":["G4",0.25],"4":["C5",0.25],"5":["rest",1],"6":["D5",1,"tenuto"],"7":["F#5",2,"legato"],"8":["A5",1,"legato"],"9":["rest",4,null,false,2],"10":["Eb4",0.5,"tremolo"]}"#;
    let svg = render_json_to_svg(json, &LayoutConfig::default()).expect("render sample");

    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>\n"));

    let out = output_dir().join("sample.svg");
    std::fs::write(&out, &svg).expect("Failed to write SVG");
    println!("✓ Rendered sample.svg ({} bytes)", svg.len());
    println!("  Output: {}", out.display());
}
