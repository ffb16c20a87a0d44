//! PNG export of a rendered staff.
//!
//! The SVG is rasterized at 1:1 scale with `resvg`. Callers either take the
//! whole surface, a caller-supplied rectangle, or let the exporter trim to
//! the drawn content.

use std::sync::Arc;

use once_cell::sync::Lazy;
use resvg::tiny_skia::{Pixmap, PixmapPaint, Transform};
use resvg::usvg::{self, fontdb};

use crate::error::StaffError;
use crate::renderer::RenderedStaff;

/// Padding kept around the content when auto-trimming.
pub const TRIM_PADDING: u32 = 10;

static FONTS: Lazy<Arc<fontdb::Database>> = Lazy::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    log::debug!("loaded {} system font faces", db.len());
    Arc::new(db)
});

/// A crop rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCrop {
    /// The whole surface.
    Full,
    /// Exactly this rectangle; pixels outside the surface are transparent.
    Rect(CropRect),
    /// The bounding box of non-white pixels plus [`TRIM_PADDING`].
    AutoTrim,
}

impl From<Option<CropRect>> for ImageCrop {
    fn from(crop: Option<CropRect>) -> Self {
        match crop {
            Some(rect) => ImageCrop::Rect(rect),
            None => ImageCrop::AutoTrim,
        }
    }
}

impl RenderedStaff {
    /// Rasterize and encode as PNG.
    pub fn to_png(&self, crop: ImageCrop) -> Result<Vec<u8>, StaffError> {
        let full = rasterize(self.svg())?;

        let out = match crop {
            ImageCrop::Full => full,
            ImageCrop::Rect(rect) => crop_pixmap(&full, rect)?,
            ImageCrop::AutoTrim => match content_bounds(&full) {
                Some(rect) => crop_pixmap(&full, rect)?,
                None => full,
            },
        };

        out.encode_png().map_err(|e| StaffError::Raster(e.to_string()))
    }
}

fn rasterize(svg: &str) -> Result<Pixmap, StaffError> {
    let mut opt = usvg::Options::default();
    opt.fontdb = Arc::clone(&FONTS);

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| StaffError::Raster(e.to_string()))?;
    let size = tree.size().to_int_size();

    let mut pixmap = Pixmap::new(size.width(), size.height()).ok_or_else(|| {
        StaffError::Raster(format!("cannot allocate {}x{} pixmap", size.width(), size.height()))
    })?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Copy `rect` out of `src`. Areas outside `src` stay transparent.
fn crop_pixmap(src: &Pixmap, rect: CropRect) -> Result<Pixmap, StaffError> {
    let mut out = Pixmap::new(rect.width, rect.height).ok_or(StaffError::EmptyCrop {
        width: rect.width,
        height: rect.height,
    })?;
    out.draw_pixmap(
        -rect.x,
        -rect.y,
        src.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    Ok(out)
}

/// Bounding box of every pixel that is not opaque white, padded and clamped
/// to the surface. `None` when nothing was drawn.
fn content_bounds(pixmap: &Pixmap) -> Option<CropRect> {
    let width = pixmap.width();
    let height = pixmap.height();

    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut found = false;

    for (i, px) in pixmap.pixels().iter().enumerate() {
        let is_background = px.alpha() == 255 && px.red() == 255 && px.green() == 255 && px.blue() == 255;
        if is_background {
            continue;
        }
        let x = i as u32 % width;
        let y = i as u32 / width;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
        found = true;
    }

    if !found {
        return None;
    }

    let left = min_x.saturating_sub(TRIM_PADDING);
    let top = min_y.saturating_sub(TRIM_PADDING);
    let right = (max_x + TRIM_PADDING + 1).min(width);
    let bottom = (max_y + TRIM_PADDING + 1).min(height);

    Some(CropRect {
        x: left as i32,
        y: top as i32,
        width: right - left,
        height: bottom - top,
    })
}
