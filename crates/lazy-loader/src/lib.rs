//! Lazy Loader
//!
//! A `<lazy-loader>` element wraps one slotted `<img>` or `<picture>`,
//! shows a generated pastel placeholder right away and swaps in the real
//! source the first time the image becomes visible.
//!
//! # Example
//! ```rust,ignore
//! use lazy_loader::{define, LazyLoaderElement, LoaderConfig, LoaderEvent};
//!
//! define(&mut registry)?;
//! let mut element = LazyLoaderElement::new(&mut tree, host, LoaderConfig::default())?;
//! element.connected_callback(&mut tree)?;
//! element.process(&mut tree)?;                  // placeholder installed, observer armed
//! element.update_visibility(viewport, &rects, now);
//! element.process(&mut tree)?;                  // real src restored
//! element.queue(LoaderEvent::ImageLoaded(img));
//! element.process(&mut tree)?;                  // loaded
//! ```

pub mod config;
pub mod threshold;
pub mod placeholder;
pub mod media;
pub mod event;
pub mod loader;
pub mod effect;
mod element;
mod registry;

pub use config::{LoaderConfig, PlaceholderEffect, PulseConfig};
pub use element::LazyLoaderElement;
pub use event::LoaderEvent;
pub use loader::LoadState;
pub use media::MediaVariant;
pub use registry::{define, upgrade, TAG_NAME};

pub use lazy_canvas as canvas;
pub use lazy_dom as dom;

/// Loader error
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("DOM error: {0}")]
    Dom(#[from] lazy_dom::DomError),

    #[error("Canvas error: {0}")]
    Canvas(#[from] lazy_canvas::CanvasError),

    #[error("Registration failed: {0}")]
    Registry(#[from] lazy_dom::CustomElementError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
