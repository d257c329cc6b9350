//! Shadow DOM v1
//!
//! Shadow root, slots, and slotchange tracking.
//!
//! Slot assignment follows the named-slot algorithm: the default slot
//! (empty name) receives every slottable without a `slot` attribute, a named
//! slot receives slottables whose `slot` attribute matches. The first slot
//! with a given name wins.

use crate::NodeId;

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

/// Shadow root initialization options
#[derive(Debug, Clone, Default)]
pub struct ShadowRootInit {
    pub mode: ShadowRootMode,
    pub delegates_focus: bool,
}

/// Shadow root
#[derive(Debug, Clone)]
pub struct ShadowRoot {
    /// Host element
    pub host: NodeId,
    /// Mode (open/closed)
    pub mode: ShadowRootMode,
    /// Whether focus is delegated to the first focusable element
    pub delegates_focus: bool,
    /// Top-level shadow content
    children: Vec<NodeId>,
    /// Slots in this shadow root
    slots: Vec<Slot>,
}

/// Slot element with slotchange tracking
#[derive(Debug, Clone)]
pub struct Slot {
    /// Slot name (empty string for default slot)
    pub name: String,
    /// Node ID of the slot element
    pub node_id: NodeId,
    /// Assigned nodes (light DOM children with matching slot attribute)
    pub assigned_nodes: Vec<NodeId>,
    /// Previous assigned nodes (for slotchange detection)
    prev_assigned: Vec<NodeId>,
}

impl ShadowRoot {
    /// Create a new shadow root
    pub fn new(host: NodeId, mode: ShadowRootMode) -> Self {
        Self::from_init(host, ShadowRootInit { mode, delegates_focus: false })
    }

    /// Create from init options
    pub fn from_init(host: NodeId, init: ShadowRootInit) -> Self {
        Self {
            host,
            mode: init.mode,
            delegates_focus: init.delegates_focus,
            children: Vec::new(),
            slots: Vec::new(),
        }
    }

    // --- Child management ---

    /// Get children
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Replace all shadow content
    pub fn replace_children(&mut self, children: Vec<NodeId>) {
        self.children = children;
    }

    // --- Slot management ---

    /// Replace the slot list. Nodes previously assigned to a slot of the
    /// same name count as its previous assignment, so rebuilding an
    /// unchanged structure does not produce slotchange notifications.
    /// Only the first slot of each name is kept.
    pub fn replace_slots(&mut self, slots: Vec<Slot>) {
        let old = std::mem::take(&mut self.slots);
        for mut slot in slots {
            if self.slots.iter().any(|s| s.name == slot.name) {
                continue;
            }
            if let Some(previous) = old.iter().find(|s| s.name == slot.name) {
                slot.prev_assigned = previous.prev_assigned.clone();
            }
            self.slots.push(slot);
        }
    }

    /// Get all slots
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Get assigned nodes for a slot
    pub fn assigned_nodes(&self, slot_name: &str) -> Vec<NodeId> {
        self.slots
            .iter()
            .find(|s| s.name == slot_name)
            .map(|s| s.assigned_nodes.clone())
            .unwrap_or_default()
    }

    /// Get assigned elements. Only elements are ever distributed, so this
    /// is the same list as `assigned_nodes`.
    pub fn assigned_elements(&self, slot_name: &str) -> Vec<NodeId> {
        self.assigned_nodes(slot_name)
    }

    /// Assign `(node, slot attribute)` pairs to slots and return the names
    /// of slots whose assignment changed.
    pub fn distribute(&mut self, slottables: &[(NodeId, String)]) -> Vec<String> {
        for slot in &mut self.slots {
            slot.clear_assigned();
            for (node, target) in slottables {
                if *target == slot.name {
                    slot.assign(*node);
                }
            }
        }

        self.slots
            .iter_mut()
            .filter_map(|slot| slot.check_slotchange().then(|| slot.name.clone()))
            .collect()
    }
}

impl Slot {
    /// Create a new named slot
    pub fn new(name: impl Into<String>, node_id: NodeId) -> Self {
        Self {
            name: name.into(),
            node_id,
            assigned_nodes: Vec::new(),
            prev_assigned: Vec::new(),
        }
    }

    /// Create the default (unnamed) slot
    pub fn default_slot(node_id: NodeId) -> Self {
        Self::new("", node_id)
    }

    /// Assign a node to this slot
    pub fn assign(&mut self, node: NodeId) -> bool {
        if !self.assigned_nodes.contains(&node) {
            self.assigned_nodes.push(node);
            true
        } else {
            false
        }
    }

    /// Clear all assigned nodes
    pub fn clear_assigned(&mut self) {
        self.assigned_nodes.clear();
    }

    /// Check if slotchange should fire
    pub fn check_slotchange(&mut self) -> bool {
        let changed = self.assigned_nodes != self.prev_assigned;
        if changed {
            self.prev_assigned = self.assigned_nodes.clone();
        }
        changed
    }
}

/// Shadow DOM errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShadowError {
    #[error("Element already has a shadow root")]
    AlreadyAttached,

    #[error("Element has no shadow root")]
    NotAttached,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadow_root() {
        let mut shadow = ShadowRoot::new(NodeId(1), ShadowRootMode::Open);
        shadow.replace_children(vec![NodeId(2), NodeId(3)]);
        assert_eq!(shadow.children().len(), 2);

        shadow.replace_children(vec![NodeId(4)]);
        assert_eq!(shadow.children(), &[NodeId(4)]);
    }

    #[test]
    fn test_slot() {
        let mut slot = Slot::new("header", NodeId(5));
        slot.assign(NodeId(10));
        slot.assign(NodeId(11));

        assert_eq!(slot.assigned_nodes.len(), 2);
        assert!(!slot.assign(NodeId(10))); // Duplicate
    }

    #[test]
    fn test_slotchange_detection() {
        let mut slot = Slot::new("test", NodeId(5));

        // No change initially
        assert!(!slot.check_slotchange());

        slot.assign(NodeId(10));
        assert!(slot.check_slotchange());
        assert!(!slot.check_slotchange());

        slot.assign(NodeId(11));
        assert!(slot.check_slotchange());
    }

    #[test]
    fn test_distribute_named_and_default() {
        let mut shadow = ShadowRoot::new(NodeId(1), ShadowRootMode::Open);
        shadow.replace_slots(vec![
            Slot::default_slot(NodeId(2)),
            Slot::new("caption", NodeId(3)),
            Slot::new("caption", NodeId(4)),
        ]);
        assert_eq!(shadow.slots().len(), 2);

        let slottables = vec![
            (NodeId(10), String::new()),
            (NodeId(11), "caption".to_string()),
            (NodeId(12), "missing".to_string()),
        ];
        let changed = shadow.distribute(&slottables);

        assert_eq!(changed, vec![String::new(), "caption".to_string()]);
        assert_eq!(shadow.assigned_elements(""), vec![NodeId(10)]);
        assert_eq!(shadow.assigned_elements("caption"), vec![NodeId(11)]);
        assert!(shadow.distribute(&slottables).is_empty());
    }

    #[test]
    fn test_replace_slots_keeps_history() {
        let mut shadow = ShadowRoot::new(NodeId(1), ShadowRootMode::Open);
        shadow.replace_slots(vec![Slot::default_slot(NodeId(2))]);
        shadow.distribute(&[(NodeId(10), String::new())]);

        shadow.replace_slots(vec![Slot::default_slot(NodeId(3))]);
        assert!(shadow.distribute(&[(NodeId(10), String::new())]).is_empty());
        assert_eq!(shadow.slots()[0].node_id, NodeId(3));
        assert_eq!(shadow.assigned_nodes(""), vec![NodeId(10)]);
    }
}
