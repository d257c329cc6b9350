//! Lazy DOM - Document Object Model
//!
//! Arena-based DOM tree plus the platform pieces a custom element needs:
//! shadow roots with slots, a custom element registry, intersection
//! observers and element animations.

mod node;
mod tree;
mod attributes;
mod dataset;
pub mod shadow;
pub mod custom_elements;
pub mod geometry;
pub mod observer;
pub mod animation;

pub use node::{Node, NodeData, ElementData};
pub use tree::DomTree;
pub use attributes::{Attr, NamedNodeMap};
pub use dataset::{to_attribute_name, to_camel_case};
pub use shadow::{ShadowError, ShadowRoot, ShadowRootInit, ShadowRootMode, Slot};
pub use custom_elements::{CustomElementDefinition, CustomElementError, CustomElementOptions, CustomElementRegistry};
pub use geometry::DOMRect;
pub use observer::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverOptions};
pub use animation::{Animation, AnimationPlayState, AnimationTiming, Keyframe};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this id refers to a node
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Raw arena index
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// DOM errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0:?}")]
    NotFound(NodeId),

    #[error("Node is not an element: {0:?}")]
    NotAnElement(NodeId),

    #[error("Hierarchy request error: cannot insert {child:?} into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error(transparent)]
    Shadow(#[from] ShadowError),
}
