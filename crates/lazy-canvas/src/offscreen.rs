//! OffscreenCanvas
//!
//! Canvas that is never attached to a document; used to synthesize images.

use crate::context2d::CanvasRenderingContext2D;
use crate::data_url::encode_data_url;
use crate::CanvasError;

/// OffscreenCanvas - canvas for off-document rendering
#[derive(Debug)]
pub struct OffscreenCanvas {
    width: u32,
    height: u32,
    context: Option<CanvasRenderingContext2D>,
}

impl OffscreenCanvas {
    /// Create new offscreen canvas. Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            context: None,
        })
    }

    /// Get width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get 2D context, creating the backing surface on first use
    pub fn get_context_2d(&mut self) -> Result<&mut CanvasRenderingContext2D, CanvasError> {
        let ctx = match self.context.take() {
            Some(ctx) => ctx,
            None => CanvasRenderingContext2D::new(self.width, self.height)?,
        };
        Ok(self.context.insert(ctx))
    }

    /// Encode as PNG. A canvas that was never drawn encodes as fully
    /// transparent.
    pub fn to_png(&self) -> Result<Vec<u8>, CanvasError> {
        match &self.context {
            Some(ctx) => ctx.to_png(),
            None => CanvasRenderingContext2D::new(self.width, self.height)?.to_png(),
        }
    }

    /// `canvas.toDataURL()` - PNG as a base64 data URL
    pub fn to_data_url(&self) -> Result<String, CanvasError> {
        let png = self.to_png()?;
        tracing::trace!("Encoded {}x{} canvas ({} PNG bytes)", self.width, self.height, png.len());
        Ok(encode_data_url("image/png", &png))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_png_data_url, Color};

    #[test]
    fn test_data_url_round_trip() {
        let mut canvas = OffscreenCanvas::new(3, 2).unwrap();
        let ctx = canvas.get_context_2d().unwrap();
        assert!(ctx.set_fill_style(&Color::rgba(110, 150, 190, 255).to_css()));
        ctx.fill_rect(0.0, 0.0, 3.0, 2.0);

        let url = canvas.to_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let pixmap = decode_png_data_url(&url).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (3, 2));
        let p = pixmap.pixel(2, 1).unwrap().demultiply();
        assert_eq!((p.red(), p.green(), p.blue(), p.alpha()), (110, 150, 190, 255));
    }

    #[test]
    fn test_blank_canvas_encodes() {
        let canvas = OffscreenCanvas::new(1, 1).unwrap();
        let pixmap = decode_png_data_url(&canvas.to_data_url().unwrap()).unwrap();
        assert_eq!(pixmap.pixel(0, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn test_zero_size() {
        assert!(matches!(
            OffscreenCanvas::new(0, 0),
            Err(CanvasError::InvalidSize { width: 0, height: 0 })
        ));
    }
}
