//! Static file retrieval by relative name.

use std::path::{Component, Path};

use crate::error::StaffError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Content type from the file extension, case-insensitive.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") => "image/jpg",
        Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Read `name` relative to `root`.
pub fn read_asset<P: AsRef<Path>>(root: P, name: &str) -> Result<Asset, StaffError> {
    if name.trim().is_empty() {
        return Err(StaffError::EmptyFilename);
    }

    let relative = Path::new(name);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(StaffError::InvalidAssetPath(name.to_string()));
    }

    let path = root.as_ref().join(relative);
    let bytes = std::fs::read(&path).map_err(|e| {
        log::debug!("asset {} unavailable: {e}", path.display());
        StaffError::AssetNotFound(name.to_string())
    })?;

    Ok(Asset {
        bytes,
        content_type: content_type_for(name),
    })
}
