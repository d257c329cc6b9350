//! Variant Classifier
//!
//! Decides what kind of media node was slotted into the host.

use lazy_dom::{DomTree, NodeId};

/// A slotted media node the loader knows how to defer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaVariant {
    /// `<img>`
    Image { img: NodeId },
    /// `<picture>` with its nested `<img>` and `<source>` alternates
    Picture {
        picture: NodeId,
        img: NodeId,
        sources: Vec<NodeId>,
    },
}

impl MediaVariant {
    /// The image element whose visibility and load completion drive loading
    pub fn image(&self) -> NodeId {
        match self {
            MediaVariant::Image { img } | MediaVariant::Picture { img, .. } => *img,
        }
    }

    /// The slotted node itself
    pub fn root(&self) -> NodeId {
        match self {
            MediaVariant::Image { img } => *img,
            MediaVariant::Picture { picture, .. } => *picture,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MediaVariant::Image { .. } => "image",
            MediaVariant::Picture { .. } => "picture",
        }
    }
}

/// Classify a slotted node. Anything that is neither an `<img>` nor a
/// `<picture>` containing an `<img>` is left alone (`None`).
pub fn classify(tree: &DomTree, node: NodeId) -> Option<MediaVariant> {
    match tree.tag_name(node)? {
        "img" => Some(MediaVariant::Image { img: node }),
        "picture" => {
            let img = tree.query_selector(node, "img")?;
            let sources = tree.query_selector_all(node, "source");
            Some(MediaVariant::Picture { picture: node, img, sources })
        }
        _ => None,
    }
}
