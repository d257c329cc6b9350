//! Placeholder Synthesizer
//!
//! Solid pastel rasters shown in place of the real asset, and the
//! `data-*` side channel that holds the real source until it is needed.

use lazy_canvas::{CanvasError, Color, OffscreenCanvas};
use lazy_dom::{DomTree, NodeId};
use rand::Rng;

use crate::LoaderError;

/// Dataset key holding an image's deferred `src`
pub const PENDING_SRC: &str = "src";
/// Dataset key holding a source's deferred `srcset`
pub const PENDING_SRCSET: &str = "srcset";

/// Channel values are drawn from this range
const CHANNEL_MIN: u8 = 100;
const CHANNEL_MAX: u8 = 199;

/// Largest placeholder area, in pixels (browser canvas area limit)
pub const MAX_PLACEHOLDER_PIXELS: u64 = 268_435_456;

/// Random opaque pastel color
pub fn random_color() -> Color {
    let mut rng = rand::thread_rng();
    Color::rgba(
        rng.gen_range(CHANNEL_MIN..=CHANNEL_MAX),
        rng.gen_range(CHANNEL_MIN..=CHANNEL_MAX),
        rng.gen_range(CHANNEL_MIN..=CHANNEL_MAX),
        255,
    )
}

/// Placeholder dimensions: the real size, or 1x1 when either side is
/// unknown or the area exceeds [`MAX_PLACEHOLDER_PIXELS`]
pub fn placeholder_size(width: u32, height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (1, 1);
    }
    if u64::from(width) * u64::from(height) > MAX_PLACEHOLDER_PIXELS {
        tracing::warn!("Placeholder {}x{} too large, using 1x1", width, height);
        return (1, 1);
    }
    (width, height)
}

fn render(width: u32, height: u32, color: Color) -> Result<String, CanvasError> {
    let mut canvas = OffscreenCanvas::new(width, height)?;
    let ctx = canvas.get_context_2d()?;
    let style = color.to_css();
    if !ctx.set_fill_style(&style) {
        tracing::warn!("Rejected placeholder fillStyle {}", style);
    }
    ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
    canvas.to_data_url()
}

/// Synthesize a placeholder PNG data URL. A fresh color is drawn on every
/// call. Oversized areas and sizes the raster backend rejects fall back
/// to 1x1.
pub fn create_placeholder_url(width: u32, height: u32) -> Result<String, LoaderError> {
    let (width, height) = placeholder_size(width, height);
    let color = random_color();

    match render(width, height, color) {
        Ok(url) => Ok(url),
        Err(CanvasError::InvalidSize { .. }) if (width, height) != (1, 1) => {
            tracing::warn!("Placeholder {}x{} too large, using 1x1", width, height);
            Ok(render(1, 1, color)?)
        }
        Err(e) => Err(e.into()),
    }
}

/// Parse a dimension attribute: leading ASCII digits, anything else is 0
fn parse_dimension(value: Option<&str>) -> u32 {
    let Some(value) = value else {
        return 0;
    };
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Intrinsic size declared on an image element (`width` / `height`)
pub fn intrinsic_size(tree: &DomTree, img: NodeId) -> (u32, u32) {
    (
        parse_dimension(tree.get_attribute(img, "width")),
        parse_dimension(tree.get_attribute(img, "height")),
    )
}

/// Move an image's `src` into the side channel and show a placeholder.
/// Returns the placeholder URL.
pub fn install_image_placeholder(tree: &mut DomTree, img: NodeId) -> Result<String, LoaderError> {
    let (width, height) = intrinsic_size(tree, img);
    let src = tree.get_attribute(img, "src").unwrap_or_default().to_string();
    let placeholder = create_placeholder_url(width, height)?;

    tree.dataset_set(img, PENDING_SRC, &src)?;
    tree.set_attribute(img, "src", &placeholder)?;

    tracing::debug!("Deferred image src {:?} ({}x{})", src, width, height);
    Ok(placeholder)
}

/// Move every source's `srcset` into its side channel. All sources share
/// one placeholder sized from the nested image. Returns the placeholder URL.
pub fn install_picture_placeholder(
    tree: &mut DomTree,
    img: NodeId,
    sources: &[NodeId],
) -> Result<String, LoaderError> {
    let (width, height) = intrinsic_size(tree, img);
    let placeholder = create_placeholder_url(width, height)?;

    for &source in sources {
        let srcset = tree.get_attribute(source, "srcset").unwrap_or_default().to_string();
        tree.dataset_set(source, PENDING_SRCSET, &srcset)?;
        tree.set_attribute(source, "srcset", &placeholder)?;
    }

    tracing::debug!("Deferred {} picture source(s) ({}x{})", sources.len(), width, height);
    Ok(placeholder)
}
