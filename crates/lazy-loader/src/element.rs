//! `<lazy-loader>` host element
//!
//! Owns the shadow content (a single passthrough `<slot>`), classifies the
//! first slotted node, installs placeholders and drives the loader. All
//! state lives on this struct; the guards make rendering and
//! classification happen at most once per instance.

use std::collections::HashMap;

use lazy_dom::{Animation, DOMRect, DomTree, NodeId, ShadowRootInit, ShadowRootMode};
use smol::channel::{Receiver, Sender};

use crate::LoaderError;
use crate::config::LoaderConfig;
use crate::effect::start_pulse;
use crate::event::{EventQueue, LoaderEvent};
use crate::loader::{LoadState, VisibilityLoader};
use crate::media::{MediaVariant, classify};
use crate::placeholder::{install_image_placeholder, install_picture_placeholder};
use crate::threshold::parse_threshold;

/// Lazy loader custom element instance
#[derive(Debug)]
pub struct LazyLoaderElement {
    host: NodeId,
    config: LoaderConfig,
    has_rendered: bool,
    has_slot_changed: bool,
    loader: Option<VisibilityLoader>,
    placeholder_animation: Option<Animation>,
    queue: EventQueue,
    /// Waiters for load completion
    loaded_waiters: Vec<Sender<NodeId>>,
    /// Timeline position in milliseconds
    current_time: f64,
}

impl LazyLoaderElement {
    /// Construct the element for `host`, attaching an open shadow root
    pub fn new(tree: &mut DomTree, host: NodeId, config: LoaderConfig) -> Result<Self, LoaderError> {
        tree.attach_shadow(
            host,
            ShadowRootInit {
                mode: ShadowRootMode::Open,
                ..Default::default()
            },
        )?;

        Ok(Self {
            host,
            config,
            has_rendered: false,
            has_slot_changed: false,
            loader: None,
            placeholder_animation: None,
            queue: EventQueue::new(),
            loaded_waiters: Vec::new(),
            current_time: 0.0,
        })
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Effective threshold list, read from the `threshold` attribute
    pub fn threshold(&self, tree: &DomTree) -> Vec<f64> {
        parse_threshold(tree.get_attribute(self.host, "threshold"))
    }

    pub fn has_rendered(&self) -> bool {
        self.has_rendered
    }

    // --- Host lifecycle ---

    /// The element was inserted into a document
    pub fn connected_callback(&mut self, tree: &mut DomTree) -> Result<(), LoaderError> {
        if !self.has_rendered {
            self.render(tree)?;
        }
        self.children_changed(tree)
    }

    /// Replace the shadow content with a fresh passthrough slot
    pub fn render(&mut self, tree: &mut DomTree) -> Result<(), LoaderError> {
        let slot = tree.create_element("slot");
        tree.set_shadow_children(self.host, vec![slot])?;
        self.has_rendered = true;
        tracing::debug!("Rendered <lazy-loader> {:?}", self.host);
        Ok(())
    }

    /// Light-DOM children changed: redistribute and queue a slotchange for
    /// every slot whose assignment changed.
    pub fn children_changed(&mut self, tree: &mut DomTree) -> Result<(), LoaderError> {
        if !self.has_rendered {
            return Ok(());
        }
        for slot in tree.assign_slottables(self.host)? {
            tracing::trace!("slotchange on {:?} slot {:?}", self.host, slot);
            self.queue.push(LoaderEvent::SlotChange);
        }
        Ok(())
    }

    // --- Events ---

    /// Queue a platform notification
    pub fn queue(&mut self, event: LoaderEvent) {
        self.queue.push(event);
    }

    /// Number of queued events
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Handle queued events in order until the queue is empty
    pub fn process(&mut self, tree: &mut DomTree) -> Result<(), LoaderError> {
        while let Some(event) = self.queue.pop() {
            self.handle_event(tree, event)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, tree: &mut DomTree, event: LoaderEvent) -> Result<(), LoaderError> {
        match event {
            LoaderEvent::SlotChange => self.on_slot_change(tree),
            LoaderEvent::Intersection(entries) => {
                if let Some(loader) = self.loader.as_mut() {
                    loader.handle_intersection(tree, &entries)?;
                }
                Ok(())
            }
            LoaderEvent::ImageLoaded(target) => {
                if let Some(loader) = self.loader.as_mut() {
                    if loader.handle_loaded(target) {
                        self.on_loaded(target);
                    }
                }
                Ok(())
            }
            LoaderEvent::ImageError(target) => {
                if let Some(loader) = self.loader.as_ref() {
                    loader.handle_error(target);
                }
                Ok(())
            }
        }
    }

    // --- Variant classifier ---

    fn on_slot_change(&mut self, tree: &mut DomTree) -> Result<(), LoaderError> {
        if self.has_slot_changed {
            tracing::trace!("Ignoring repeated slotchange on {:?}", self.host);
            return Ok(());
        }
        self.has_slot_changed = true;

        let slotted = tree
            .shadow_root(self.host)
            .and_then(|shadow| shadow.assigned_elements("").first().copied());
        let Some(slotted) = slotted else {
            tracing::debug!("Nothing slotted into {:?}", self.host);
            return Ok(());
        };

        match classify(tree, slotted) {
            Some(variant) => self.handle_media(tree, variant),
            None => {
                tracing::debug!(
                    "Leaving unrecognized <{}> in {:?} untouched",
                    tree.tag_name(slotted).unwrap_or("#text"),
                    self.host
                );
                Ok(())
            }
        }
    }

    fn handle_media(&mut self, tree: &mut DomTree, variant: MediaVariant) -> Result<(), LoaderError> {
        let effect = match &variant {
            MediaVariant::Image { img } => {
                install_image_placeholder(tree, *img)?;
                self.config.image_effect
            }
            MediaVariant::Picture { img, sources, .. } => {
                install_picture_placeholder(tree, *img, sources)?;
                self.config.picture_effect
            }
        };

        if effect.is_enabled() {
            self.placeholder_animation = Some(start_pulse(variant.image(), &self.config.pulse, self.current_time));
        }

        let threshold = self.threshold(tree);
        self.loader = Some(VisibilityLoader::arm(variant, threshold, &self.config.root_margin));
        Ok(())
    }

    // --- Visibility ---

    /// Run the element's observer against the current layout and queue the
    /// resulting callback, if any.
    pub fn update_visibility(&mut self, viewport: DOMRect, rects: &HashMap<NodeId, DOMRect>, time: f64) {
        self.current_time = time;
        let Some(loader) = self.loader.as_mut() else {
            return;
        };

        let observer = loader.observer_mut();
        observer.check_intersections(viewport, rects, time);
        if observer.has_pending() {
            let entries = observer.take_entries();
            self.queue.push(LoaderEvent::Intersection(entries));
        }
    }

    /// Advance the timeline used to start animations
    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = time;
    }

    // --- Load completion ---

    fn on_loaded(&mut self, target: NodeId) {
        if let Some(animation) = self.placeholder_animation.as_mut() {
            animation.cancel();
        }
        for waiter in self.loaded_waiters.drain(..) {
            if waiter.try_send(target).is_err() {
                tracing::trace!("Load waiter for {:?} went away", target);
            }
        }
    }

    /// Receiver that yields the loaded image once loading completes. If the
    /// node already loaded, the value is available immediately.
    pub fn loaded(&mut self) -> Receiver<NodeId> {
        let (tx, rx) = smol::channel::bounded(1);
        match self.loader.as_ref() {
            Some(loader) if loader.state() == LoadState::Loaded => {
                if tx.try_send(loader.variant().image()).is_err() {
                    tracing::trace!("Load waiter dropped before completion");
                }
            }
            _ => self.loaded_waiters.push(tx),
        }
        rx
    }

    // --- Inspection ---

    pub fn load_state(&self) -> LoadState {
        self.loader.as_ref().map(VisibilityLoader::state).unwrap_or_default()
    }

    /// The classified media node, once handled
    pub fn media(&self) -> Option<&MediaVariant> {
        self.loader.as_ref().map(VisibilityLoader::variant)
    }

    pub fn loader(&self) -> Option<&VisibilityLoader> {
        self.loader.as_ref()
    }

    pub fn placeholder_animation(&self) -> Option<&Animation> {
        self.placeholder_animation.as_ref()
    }

    pub fn placeholder_animation_mut(&mut self) -> Option<&mut Animation> {
        self.placeholder_animation.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaceholderEffect;
    use lazy_dom::AnimationPlayState;

    fn host_with_image(tree: &mut DomTree, src: &str) -> (NodeId, NodeId) {
        let host = tree.create_element("lazy-loader");
        let img = tree.create_element("img");
        tree.set_attribute(img, "src", src).unwrap();
        tree.append_child(tree.root(), host).unwrap();
        tree.append_child(host, img).unwrap();
        (host, img)
    }

    #[test]
    fn test_render_once() {
        let mut tree = DomTree::new();
        let (host, _) = host_with_image(&mut tree, "a.jpg");
        let mut element = LazyLoaderElement::new(&mut tree, host, LoaderConfig::default()).unwrap();

        element.connected_callback(&mut tree).unwrap();
        let first = tree.shadow_root(host).unwrap().children().to_vec();
        element.connected_callback(&mut tree).unwrap();
        let second = tree.shadow_root(host).unwrap().children().to_vec();

        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
        assert_eq!(tree.tag_name(first[0]), Some("slot"));
    }

    #[test]
    fn test_double_construction_fails() {
        let mut tree = DomTree::new();
        let (host, _) = host_with_image(&mut tree, "a.jpg");
        LazyLoaderElement::new(&mut tree, host, LoaderConfig::default()).unwrap();
        assert!(matches!(
            LazyLoaderElement::new(&mut tree, host, LoaderConfig::default()),
            Err(LoaderError::Dom(_))
        ));
    }

    #[test]
    fn test_threshold_attribute() {
        let mut tree = DomTree::new();
        let (host, _) = host_with_image(&mut tree, "a.jpg");
        let element = LazyLoaderElement::new(&mut tree, host, LoaderConfig::default()).unwrap();
        assert_eq!(element.threshold(&tree), vec![0.0]);

        tree.set_attribute(host, "threshold", "0.75").unwrap();
        assert_eq!(element.threshold(&tree), vec![0.75]);

        tree.set_attribute(host, "threshold", "abc").unwrap();
        assert!(element.threshold(&tree)[0].is_nan());
    }

    #[test]
    fn test_slot_change_classifies_once() {
        let mut tree = DomTree::new();
        let (host, img) = host_with_image(&mut tree, "a.jpg");
        let mut element = LazyLoaderElement::new(&mut tree, host, LoaderConfig::default()).unwrap();
        element.connected_callback(&mut tree).unwrap();
        assert_eq!(element.pending_events(), 1);

        element.queue(LoaderEvent::SlotChange);
        element.queue(LoaderEvent::SlotChange);
        element.process(&mut tree).unwrap();

        let placeholder = tree.get_attribute(img, "src").unwrap().to_string();
        assert!(placeholder.starts_with("data:image/png;base64,"));
        assert_eq!(tree.dataset_get(img, "src"), Some("a.jpg"));
        assert_eq!(element.load_state(), LoadState::Armed);
        assert_eq!(element.media(), Some(&MediaVariant::Image { img }));

        // A later slotchange is ignored as well
        element.queue(LoaderEvent::SlotChange);
        element.process(&mut tree).unwrap();
        assert_eq!(tree.get_attribute(img, "src"), Some(placeholder.as_str()));
        assert_eq!(tree.dataset_get(img, "src"), Some("a.jpg"));
    }

    #[test]
    fn test_unrecognized_content_untouched() {
        let mut tree = DomTree::new();
        let host = tree.create_element("lazy-loader");
        let video = tree.create_element("video");
        tree.set_attribute(video, "src", "clip.mp4").unwrap();
        tree.append_child(host, video).unwrap();

        let mut element = LazyLoaderElement::new(&mut tree, host, LoaderConfig::default()).unwrap();
        element.connected_callback(&mut tree).unwrap();
        element.process(&mut tree).unwrap();

        assert_eq!(tree.get_attribute(video, "src"), Some("clip.mp4"));
        assert!(!tree.has_attribute(video, "data-src"));
        assert_eq!(element.load_state(), LoadState::Idle);
        assert!(element.placeholder_animation().is_none());
    }

    #[test]
    fn test_effect_flag() {
        let mut tree = DomTree::new();
        let (host, _) = host_with_image(&mut tree, "a.jpg");
        let config = LoaderConfig::default().with_image_effect(PlaceholderEffect::Disabled);
        let mut element = LazyLoaderElement::new(&mut tree, host, config).unwrap();
        element.connected_callback(&mut tree).unwrap();
        element.process(&mut tree).unwrap();

        assert_eq!(element.load_state(), LoadState::Armed);
        assert!(element.placeholder_animation().is_none());
    }

    #[test]
    fn test_load_cancels_pulse() {
        let mut tree = DomTree::new();
        let (host, img) = host_with_image(&mut tree, "a.jpg");
        let mut element = LazyLoaderElement::new(&mut tree, host, LoaderConfig::default()).unwrap();
        element.connected_callback(&mut tree).unwrap();
        element.process(&mut tree).unwrap();
        assert!(element.placeholder_animation().unwrap().is_running());

        let mut rects = HashMap::new();
        rects.insert(img, DOMRect::new(0.0, 0.0, 100.0, 100.0));
        element.update_visibility(DOMRect::new(0.0, 0.0, 800.0, 600.0), &rects, 16.0);
        element.process(&mut tree).unwrap();
        assert_eq!(element.load_state(), LoadState::Loading);
        assert!(element.placeholder_animation().unwrap().is_running());

        let waiter = element.loaded();
        element.queue(LoaderEvent::ImageLoaded(img));
        element.process(&mut tree).unwrap();

        assert_eq!(element.load_state(), LoadState::Loaded);
        assert_eq!(
            element.placeholder_animation().map(Animation::play_state),
            Some(AnimationPlayState::Idle)
        );
        assert_eq!(waiter.try_recv(), Ok(img));
        assert_eq!(element.loaded().try_recv(), Ok(img));
    }
}
