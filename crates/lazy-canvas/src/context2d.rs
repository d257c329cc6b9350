//! Canvas 2D Rendering Context
//!
//! The fill subset of CanvasRenderingContext2D, rasterized with tiny-skia.

use tiny_skia::{Paint, Pixmap, Rect, Transform};

use crate::{CanvasError, Color};

/// Canvas 2D rendering context
#[derive(Debug)]
pub struct CanvasRenderingContext2D {
    /// Backing surface (premultiplied RGBA)
    pixmap: Pixmap,
    /// Current fill color
    fill_style: Color,
}

impl CanvasRenderingContext2D {
    /// Create a new 2D context with a transparent surface
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        let pixmap = Pixmap::new(width, height).ok_or(CanvasError::InvalidSize { width, height })?;
        Ok(Self {
            pixmap,
            fill_style: Color::BLACK,
        })
    }

    /// Get canvas width
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Get canvas height
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Backing surface
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Set `fillStyle` from a CSS color string. Unparsable values are
    /// ignored and leave the previous style in place; returns whether the
    /// value was accepted.
    pub fn set_fill_style(&mut self, style: &str) -> bool {
        match Color::parse(style) {
            Some(color) => {
                self.fill_style = color;
                true
            }
            None => {
                tracing::trace!("Ignoring invalid fillStyle {:?}", style);
                false
            }
        }
    }

    /// Fill a rectangle with the current fill style. Negative sizes fill
    /// towards the origin; empty or non-finite rectangles draw nothing.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        // Also rejects NaN sizes
        if !(width > 0.0 && height > 0.0) {
            return;
        }

        let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            return;
        };

        let mut paint = Paint::default();
        let Color { r, g, b, a } = self.fill_style;
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = false;

        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Read back a pixel (straight alpha)
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        // tiny-skia indexes linearly, so an out-of-range x would wrap rows
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(p.red(), p.green(), p.blue(), p.alpha()))
    }

    /// Encode the surface as PNG
    pub fn to_png(&self) -> Result<Vec<u8>, CanvasError> {
        self.pixmap
            .encode_png()
            .map_err(|e| CanvasError::Encode(e.to_string()))
    }
}
