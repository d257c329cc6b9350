//! Lazy Canvas
//!
//! Offscreen 2D raster surface backed by tiny-skia, with PNG data URL
//! export.

mod color;
mod context2d;
mod offscreen;
pub mod data_url;

pub use color::Color;
pub use context2d::CanvasRenderingContext2D;
pub use offscreen::OffscreenCanvas;
pub use data_url::{decode_png_data_url, encode_data_url};

/// Re-exported so callers can inspect decoded pixels
pub use tiny_skia::Pixmap;

/// Canvas errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("PNG decoding failed: {0}")]
    Decode(String),
}
