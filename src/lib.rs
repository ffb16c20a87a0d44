//! stafflib: single-staff music notation layout and rendering.
//!
//! Takes the shared-state note map (`{"1": ["C4", 0.5], "2": ["rest", 1], ...}`),
//! lays it out on one treble staff and renders SVG or PNG.
//!
//! # Example
//! ```no_run
//! use stafflib::{decode_shared_state, render_sequence, ImageCrop, LayoutConfig};
//!
//! let seq = decode_shared_state(r#"{"1":["C4",0.5],"2":["E4",0.5]}"#).unwrap();
//! let staff = render_sequence(&seq, &LayoutConfig::default());
//! println!("{}x{}, {} beam groups", staff.width, staff.height, staff.layout.beam_groups.len());
//! let png = staff.to_png(ImageCrop::AutoTrim).unwrap();
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod model;
pub mod pitch;
pub mod raster;
pub mod renderer;

pub use assets::{content_type_for, read_asset, Asset};
pub use config::{LayoutConfig, TimeSignature};
pub use error::StaffError;
pub use model::*;
pub use pitch::{parse_pitch, staff_offset, Accidental, Pitch, PitchError};
pub use raster::{CropRect, ImageCrop};
pub use renderer::{
    render_entries, render_sequence, BeamGeometry, BeamGroup, LegatoSpan, RenderedStaff,
    SlurCurve, StaffLayout,
};

/// Decode shared-state JSON and render it to SVG.
pub fn render_json_to_svg(json: &str, config: &LayoutConfig) -> Result<String, StaffError> {
    let sequence = decode_shared_state(json)?;
    Ok(render_sequence(&sequence, config).into_svg())
}

/// Decode shared-state JSON and render it to PNG with the default layout.
///
/// `crop` of `None` trims to the drawn content.
pub fn render_json_to_png(json: &str, crop: Option<CropRect>) -> Result<Vec<u8>, StaffError> {
    let sequence = decode_shared_state(json)?;
    render_sequence(&sequence, &LayoutConfig::default()).to_png(crop.into())
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI for native hosts (static library / cdylib)
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Render shared-state JSON and return SVG as a C string.
/// The caller must free the returned string with `stafflib_free_string`.
/// Returns null on invalid input.
///
/// # Safety
/// `json` must be a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn stafflib_render_json(json: *const c_char) -> *mut c_char {
    if json.is_null() {
        return std::ptr::null_mut();
    }
    let c_str = unsafe { CStr::from_ptr(json) };
    let json_str = match c_str.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };

    match render_json_to_svg(json_str, &LayoutConfig::default()) {
        Ok(svg) => CString::new(svg).unwrap_or_default().into_raw(),
        Err(err) => {
            log::warn!("stafflib_render_json: {err}");
            std::ptr::null_mut()
        }
    }
}

/// Free a string previously returned by stafflib functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a stafflib function, or null.
#[no_mangle]
pub unsafe extern "C" fn stafflib_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
