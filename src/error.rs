//! Error type shared by the public API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StaffError {
    /// The shared-state JSON could not be decoded. Reported to the caller
    /// instead of rendering a default staff.
    #[error("shared state could not be decoded: {0}")]
    SharedState(String),

    #[error("invalid layout config: {0}")]
    Config(String),

    #[error("failed to rasterize staff: {0}")]
    Raster(String),

    #[error("crop rectangle {width}x{height} is empty")]
    EmptyCrop { width: u32, height: u32 },

    #[error("no file specified")]
    EmptyFilename,

    #[error("invalid asset path `{0}`")]
    InvalidAssetPath(String),

    #[error("file not found: {0}")]
    AssetNotFound(String),
}
