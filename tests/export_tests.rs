//! PNG export tests.

use pretty_assertions::assert_eq;
use stafflib::{
    decode_shared_state, render_json_to_png, render_sequence, CropRect, ImageCrop, LayoutConfig,
    RenderedStaff, StaffError,
};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Width and height from the IHDR chunk.
fn png_size(png: &[u8]) -> (u32, u32) {
    assert_eq!(&png[..8], &PNG_SIGNATURE[..]);
    assert_eq!(&png[12..16], b"IHDR");
    let w = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let h = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    (w, h)
}

fn staff(json: &str) -> RenderedStaff {
    render_sequence(&decode_shared_state(json).unwrap(), &LayoutConfig::default())
}

#[test]
fn full_export_matches_surface() {
    let png = staff(r#"{"1":["C4",1]}"#).to_png(ImageCrop::Full).unwrap();
    assert_eq!(png_size(&png), (280, 280));
}

#[test]
fn crop_rect_sets_output_size() {
    let rect = CropRect { x: 60, y: 40, width: 100, height: 50 };
    let png = staff(r#"{"1":["C4",1]}"#).to_png(ImageCrop::Rect(rect)).unwrap();
    assert_eq!(png_size(&png), (100, 50));

    // Extends past the surface: still the requested size.
    let rect = CropRect { x: 250, y: 250, width: 64, height: 64 };
    let png = staff(r#"{"1":["C4",1]}"#).to_png(ImageCrop::Rect(rect)).unwrap();
    assert_eq!(png_size(&png), (64, 64));
}

#[test]
fn empty_crop_is_rejected() {
    let rect = CropRect { x: 0, y: 0, width: 0, height: 10 };
    let result = staff(r#"{"1":["C4",1]}"#).to_png(ImageCrop::Rect(rect));
    assert!(matches!(result, Err(StaffError::EmptyCrop { .. })));
}

#[test]
fn auto_trim_is_smaller_than_surface() {
    let s = staff(r#"{"1":["C4",0.5],"2":["E4",0.5],"3":["G4",1]}"#);
    let (w, h) = png_size(&s.to_png(ImageCrop::AutoTrim).unwrap());

    // staff spans x = 80..360 of 400, y = 80..128 of 280
    assert!(w < s.width as u32 && h < s.height as u32, "{w}x{h}");
    assert!(w >= 160 && h >= 48, "{w}x{h}");
}

#[test]
fn json_entry_point_trims_by_default() {
    let json = r#"{"1":["rest",4]}"#;
    let trimmed = render_json_to_png(json, None).unwrap();
    let cropped = render_json_to_png(json, Some(CropRect { x: 0, y: 0, width: 30, height: 20 })).unwrap();

    let (w, _) = png_size(&trimmed);
    assert!(w < 280);
    assert_eq!(png_size(&cropped), (30, 20));
}

#[test]
fn export_is_deterministic() {
    let json = r#"{"1":["C4",0.25],"2":["D4",0.25],"3":["rest",1,null,false,4]}"#;
    assert_eq!(
        render_json_to_png(json, None).unwrap(),
        render_json_to_png(json, None).unwrap()
    );
}
