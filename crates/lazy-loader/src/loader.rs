//! Visibility-Triggered Loader
//!
//! ```text
//! Armed --(first intersecting entry: unobserve, restore sources)--> Loading
//! Loading --(image load signal)--> Loaded
//! ```
//!
//! The observer is unsubscribed synchronously inside the intersection
//! handler, so any further entries already queued for the same target are
//! ignored. Non-intersecting entries never consume the trigger.

use lazy_dom::{DomTree, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverOptions, NodeId};

use crate::LoaderError;
use crate::media::MediaVariant;
use crate::placeholder::{PENDING_SRC, PENDING_SRCSET};

/// Load lifecycle of a handled media node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing classified yet (or nothing recognizable slotted)
    #[default]
    Idle,
    /// Placeholder installed, waiting for visibility
    Armed,
    /// Real sources restored, waiting for the image to load
    Loading,
    /// Terminal
    Loaded,
}

/// One-shot loader for a single media node
#[derive(Debug)]
pub struct VisibilityLoader {
    variant: MediaVariant,
    observer: IntersectionObserver,
    state: LoadState,
}

impl VisibilityLoader {
    /// Create the observer and start watching the variant's image.
    /// Placeholders must already be installed.
    pub fn arm(variant: MediaVariant, threshold: Vec<f64>, root_margin: &str) -> Self {
        let mut observer = IntersectionObserver::new(IntersectionObserverOptions {
            root_margin: root_margin.to_string(),
            threshold,
        });
        observer.observe(variant.image());

        tracing::debug!(
            "Armed {} loader on {:?} (threshold {:?})",
            variant.kind(),
            variant.image(),
            observer.thresholds()
        );

        Self {
            variant,
            observer,
            state: LoadState::Armed,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn variant(&self) -> &MediaVariant {
        &self.variant
    }

    pub fn observer(&self) -> &IntersectionObserver {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut IntersectionObserver {
        &mut self.observer
    }

    /// Handle an observer callback. Returns true when this callback
    /// triggered loading.
    pub fn handle_intersection(
        &mut self,
        tree: &mut DomTree,
        entries: &[IntersectionObserverEntry],
    ) -> Result<bool, LoaderError> {
        let target = self.variant.image();

        for entry in entries.iter().filter(|e| e.target == target) {
            if !entry.is_intersecting {
                tracing::trace!("{:?} not intersecting (ratio {})", target, entry.intersection_ratio);
                continue;
            }
            if !self.observer.is_observing(target) {
                tracing::trace!("Ignoring entry for {:?}: already triggered", target);
                continue;
            }

            self.observer.unobserve(target);
            restore_sources(tree, &self.variant)?;
            self.state = LoadState::Loading;

            tracing::debug!(
                "Triggered {} load for {:?} at ratio {}",
                self.variant.kind(),
                target,
                entry.intersection_ratio
            );
            return Ok(true);
        }

        Ok(false)
    }

    /// Handle an image load signal. Returns true on the transition to
    /// `Loaded`; signals for other nodes or in other states are ignored.
    pub fn handle_loaded(&mut self, target: NodeId) -> bool {
        if target != self.variant.image() || self.state != LoadState::Loading {
            tracing::trace!("Ignoring load signal for {:?} in {:?}", target, self.state);
            return false;
        }
        self.state = LoadState::Loaded;
        tracing::debug!("Loaded {} {:?}", self.variant.kind(), target);
        true
    }

    /// Handle an image error signal. The node stays in `Loading`: there is
    /// no failure transition.
    pub fn handle_error(&self, target: NodeId) {
        if target == self.variant.image() && self.state == LoadState::Loading {
            tracing::warn!("Image {:?} failed to load; load will not complete", target);
        }
    }
}

/// Move deferred values back into their visible attributes
pub fn restore_sources(tree: &mut DomTree, variant: &MediaVariant) -> Result<(), LoaderError> {
    match variant {
        MediaVariant::Image { img } => restore(tree, *img, PENDING_SRC, "src"),
        MediaVariant::Picture { sources, .. } => {
            for &source in sources {
                restore(tree, source, PENDING_SRCSET, "srcset")?;
            }
            Ok(())
        }
    }
}

fn restore(tree: &mut DomTree, node: NodeId, key: &str, attribute: &str) -> Result<(), LoaderError> {
    match tree.dataset_remove(node, key)? {
        Some(value) => tree.set_attribute(node, attribute, &value)?,
        None => tracing::warn!("No deferred {} on {:?}", attribute, node),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::install_image_placeholder;
    use lazy_dom::DOMRect;

    fn entry(target: NodeId, is_intersecting: bool) -> IntersectionObserverEntry {
        IntersectionObserverEntry {
            target,
            bounding_client_rect: DOMRect::default(),
            intersection_rect: DOMRect::default(),
            root_bounds: None,
            intersection_ratio: if is_intersecting { 1.0 } else { 0.0 },
            is_intersecting,
            time: 0.0,
        }
    }

    fn armed_image() -> (DomTree, NodeId, VisibilityLoader) {
        let mut tree = DomTree::new();
        let img = tree.create_element("img");
        tree.set_attribute(img, "src", "a.jpg").unwrap();
        install_image_placeholder(&mut tree, img).unwrap();
        let loader = VisibilityLoader::arm(MediaVariant::Image { img }, vec![0.0], "0px");
        (tree, img, loader)
    }

    #[test]
    fn test_arm_observes_image() {
        let (_, img, loader) = armed_image();
        assert_eq!(loader.state(), LoadState::Armed);
        assert!(loader.observer().is_observing(img));
    }

    #[test]
    fn test_non_intersecting_is_noop() {
        let (mut tree, img, mut loader) = armed_image();
        assert!(!loader.handle_intersection(&mut tree, &[entry(img, false)]).unwrap());
        assert_eq!(loader.state(), LoadState::Armed);
        assert!(loader.observer().is_observing(img));
    }

    #[test]
    fn test_trigger_once() {
        let (mut tree, img, mut loader) = armed_image();
        let entries = [entry(img, true), entry(img, true)];

        assert!(loader.handle_intersection(&mut tree, &entries).unwrap());
        assert_eq!(loader.state(), LoadState::Loading);
        assert!(!loader.observer().is_observing(img));
        assert_eq!(tree.get_attribute(img, "src"), Some("a.jpg"));
        assert_eq!(tree.dataset_get(img, PENDING_SRC), None);

        // Simulate the platform changing src again; a late entry must not restore
        tree.set_attribute(img, "src", "other.jpg").unwrap();
        assert!(!loader.handle_intersection(&mut tree, &entries).unwrap());
        assert_eq!(tree.get_attribute(img, "src"), Some("other.jpg"));
    }

    #[test]
    fn test_load_signal_only_while_loading() {
        let (mut tree, img, mut loader) = armed_image();
        assert!(!loader.handle_loaded(img));

        loader.handle_intersection(&mut tree, &[entry(img, true)]).unwrap();
        loader.handle_error(img);
        assert_eq!(loader.state(), LoadState::Loading);

        let other = tree.create_element("img");
        assert!(!loader.handle_loaded(other));
        assert!(loader.handle_loaded(img));
        assert_eq!(loader.state(), LoadState::Loaded);
        assert!(!loader.handle_loaded(img));
    }
}
