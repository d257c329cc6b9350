//! Element event queue
//!
//! Platform notifications are delivered as messages and handled one at a
//! time, in arrival order, on the thread that owns the element.

use std::collections::VecDeque;

use lazy_dom::{IntersectionObserverEntry, NodeId};

/// Platform notification for a lazy loader element
#[derive(Debug, Clone)]
pub enum LoaderEvent {
    /// Slotted content assignment changed
    SlotChange,
    /// Intersection observer callback
    Intersection(Vec<IntersectionObserverEntry>),
    /// An image finished loading and decoding
    ImageLoaded(NodeId),
    /// An image failed to load
    ImageError(NodeId),
}

/// FIFO queue of pending events
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<LoaderEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: LoaderEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<LoaderEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
