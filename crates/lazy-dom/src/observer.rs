//! Intersection Observer API
//!
//! Observe element visibility and intersection with the viewport.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::NodeId;
use crate::geometry::DOMRect;

/// Intersection observer options
#[derive(Debug, Clone)]
pub struct IntersectionObserverOptions {
    /// Root margin (`"0px"`, `"200px"`)
    pub root_margin: String,
    /// Thresholds to trigger callback
    pub threshold: Vec<f64>,
}

impl Default for IntersectionObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: "0px".to_string(),
            threshold: vec![0.0],
        }
    }
}

/// Intersection observer entry
#[derive(Debug, Clone)]
pub struct IntersectionObserverEntry {
    pub target: NodeId,
    pub bounding_client_rect: DOMRect,
    pub intersection_rect: DOMRect,
    pub root_bounds: Option<DOMRect>,
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
    pub time: f64,
}

/// Last reported state of an observed target
#[derive(Debug, Clone, Copy, PartialEq)]
struct Observation {
    threshold_index: usize,
    is_intersecting: bool,
}

/// Intersection observer
#[derive(Debug)]
pub struct IntersectionObserver {
    id: u64,
    root_margin: f64,
    thresholds: Vec<f64>,
    observed: Vec<(NodeId, Option<Observation>)>,
    pending_entries: Vec<IntersectionObserverEntry>,
}

static NEXT_INTERSECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Parse a single-length root margin such as `"200px"`
fn parse_root_margin(margin: &str) -> Option<f64> {
    let margin = margin.trim();
    let value = margin.strip_suffix("px").unwrap_or(margin).trim();
    if value.is_empty() {
        return Some(0.0);
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl IntersectionObserver {
    pub fn new(options: IntersectionObserverOptions) -> Self {
        let root_margin = parse_root_margin(&options.root_margin).unwrap_or_else(|| {
            tracing::warn!("Ignoring unsupported rootMargin {:?}", options.root_margin);
            0.0
        });
        let thresholds = if options.threshold.is_empty() {
            vec![0.0]
        } else {
            options.threshold
        };

        Self {
            id: NEXT_INTERSECTION_ID.fetch_add(1, Ordering::Relaxed),
            root_margin,
            thresholds,
            observed: Vec::new(),
            pending_entries: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Thresholds as supplied (not validated)
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Observe an element
    pub fn observe(&mut self, target: NodeId) {
        if !self.is_observing(target) {
            self.observed.push((target, None));
        }
    }

    /// Stop observing
    pub fn unobserve(&mut self, target: NodeId) {
        self.observed.retain(|(node, _)| *node != target);
    }

    /// Check if a target is observed
    pub fn is_observing(&self, target: NodeId) -> bool {
        self.observed.iter().any(|(node, _)| *node == target)
    }

    /// Check intersections, queueing an entry on first observation and
    /// whenever a target crosses a threshold.
    pub fn check_intersections(
        &mut self,
        viewport: DOMRect,
        element_rects: &HashMap<NodeId, DOMRect>,
        time: f64,
    ) {
        let root = viewport.inflate(self.root_margin);

        for (node, last) in &mut self.observed {
            let Some(rect) = element_rects.get(node) else {
                continue;
            };

            let intersection = rect.intersect(&root);
            let ratio = match intersection {
                Some(i) if rect.area() > 0.0 => i.area() / rect.area(),
                Some(_) => 1.0,
                None => 0.0,
            };

            // NaN thresholds never compare true, so they never count as reached
            let threshold_index = self.thresholds.iter().filter(|&&t| ratio >= t).count();
            let is_intersecting = intersection.is_some() && threshold_index > 0;
            let observation = Observation { threshold_index, is_intersecting };

            if *last == Some(observation) {
                continue;
            }
            *last = Some(observation);

            self.pending_entries.push(IntersectionObserverEntry {
                target: *node,
                bounding_client_rect: *rect,
                intersection_rect: intersection.unwrap_or_default(),
                root_bounds: Some(root),
                intersection_ratio: ratio,
                is_intersecting,
                time,
            });
        }
    }

    /// Take pending entries
    pub fn take_entries(&mut self) -> Vec<IntersectionObserverEntry> {
        std::mem::take(&mut self.pending_entries)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_entries.is_empty()
    }
}
