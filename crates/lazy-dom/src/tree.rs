//! DOM Tree (arena-based allocation)

use std::collections::HashMap;

use crate::dataset::to_attribute_name;
use crate::shadow::{ShadowError, ShadowRoot, ShadowRootInit, Slot};
use crate::{DomError, Node, NodeId};

/// Arena-based DOM tree for memory efficiency
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    /// Shadow roots keyed by host element
    shadow_roots: HashMap<NodeId, ShadowRoot>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            shadow_roots: HashMap::new(),
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.push(Node::element(tag_name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.get_mut(id).ok_or(DomError::NotFound(id))
    }

    /// Check whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = self.get(current).map(|n| n.parent).unwrap_or(NodeId::NONE);
        }
        false
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child)?;

        let last = self.node(parent)?.last_child;
        {
            let node = self.node_mut(child)?;
            node.parent = parent;
            node.prev_sibling = last;
        }
        if last.is_valid() {
            self.node_mut(last)?.next_sibling = child;
        } else {
            self.node_mut(parent)?.first_child = child;
        }
        self.node_mut(parent)?.last_child = child;
        Ok(())
    }

    fn detach(&mut self, child: NodeId) -> Result<(), DomError> {
        let (parent, prev, next) = {
            let node = self.node(child)?;
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return Ok(());
        }

        if prev.is_valid() {
            self.node_mut(prev)?.next_sibling = next;
        } else {
            self.node_mut(parent)?.first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next)?.prev_sibling = prev;
        } else {
            self.node_mut(parent)?.last_child = prev;
        }

        let node = self.node_mut(child)?;
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        Ok(())
    }

    /// Iterate direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let next = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children { tree: self, next }
    }

    /// Direct children that are elements
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(child, _)| child)
            .collect()
    }

    /// All descendants of `root` in document order (excluding `root`)
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).map(|(id, _)| id).collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut kids: Vec<NodeId> = self.children(id).map(|(c, _)| c).collect();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// Lowercased tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.tag_name.as_str())
    }

    /// Check the tag name of an element
    pub fn is_element_named(&self, id: NodeId, tag_name: &str) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .map(|e| e.is(tag_name))
            .unwrap_or(false)
    }

    // --- Attributes ---

    /// Get an attribute value
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.attrs.get_attribute(name)
    }

    /// Check if an attribute exists
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let element = self
            .node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))?;
        element.attrs.set_attribute(name, value);
        Ok(())
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let element = self
            .node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))?;
        Ok(element.attrs.remove_named_item(name).map(|a| a.value))
    }

    // --- Dataset (data-* attributes) ---

    /// `element.dataset[key]`
    pub fn dataset_get(&self, id: NodeId, key: &str) -> Option<&str> {
        self.get_attribute(id, &to_attribute_name(key))
    }

    /// `element.dataset[key] = value`
    pub fn dataset_set(&mut self, id: NodeId, key: &str, value: &str) -> Result<(), DomError> {
        self.set_attribute(id, &to_attribute_name(key), value)
    }

    /// `delete element.dataset[key]`
    pub fn dataset_remove(&mut self, id: NodeId, key: &str) -> Result<Option<String>, DomError> {
        self.remove_attribute(id, &to_attribute_name(key))
    }

    // --- Queries (simple tag selectors) ---

    /// First descendant with the given tag name
    pub fn query_selector(&self, root: NodeId, tag_name: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.is_element_named(id, tag_name))
    }

    /// All descendants with the given tag name, in document order
    pub fn query_selector_all(&self, root: NodeId, tag_name: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.is_element_named(id, tag_name))
            .collect()
    }

    // --- Shadow DOM ---

    /// Attach a shadow root to an element
    pub fn attach_shadow(&mut self, host: NodeId, init: ShadowRootInit) -> Result<&mut ShadowRoot, DomError> {
        if !self.node(host)?.is_element() {
            return Err(DomError::NotAnElement(host));
        }
        if self.shadow_roots.contains_key(&host) {
            return Err(ShadowError::AlreadyAttached.into());
        }
        Ok(self
            .shadow_roots
            .entry(host)
            .or_insert_with(|| ShadowRoot::from_init(host, init)))
    }

    /// Shadow root of a host element
    pub fn shadow_root(&self, host: NodeId) -> Option<&ShadowRoot> {
        self.shadow_roots.get(&host)
    }

    /// Shadow root of a host element (mutable)
    pub fn shadow_root_mut(&mut self, host: NodeId) -> Option<&mut ShadowRoot> {
        self.shadow_roots.get_mut(&host)
    }

    /// Replace the shadow content of `host` and rebuild its slot list
    /// from the `<slot>` elements found in the new content.
    pub fn set_shadow_children(&mut self, host: NodeId, children: Vec<NodeId>) -> Result<(), DomError> {
        let mut slots = Vec::new();
        for &child in &children {
            let mut candidates = vec![child];
            candidates.extend(self.descendants(child));
            for id in candidates {
                if self.is_element_named(id, "slot") {
                    let name = self.get_attribute(id, "name").unwrap_or("");
                    slots.push(Slot::new(name, id));
                }
            }
        }

        let shadow = self
            .shadow_roots
            .get_mut(&host)
            .ok_or(DomError::Shadow(ShadowError::NotAttached))?;
        shadow.replace_children(children);
        shadow.replace_slots(slots);
        Ok(())
    }

    /// Distribute the host's element children into its shadow slots.
    ///
    /// Returns the names of slots whose assigned nodes changed; each one
    /// corresponds to a `slotchange` notification.
    pub fn assign_slottables(&mut self, host: NodeId) -> Result<Vec<String>, DomError> {
        let slottables: Vec<(NodeId, String)> = self
            .element_children(host)
            .into_iter()
            .map(|child| {
                let slot = self.get_attribute(child, "slot").unwrap_or("").to_string();
                (child, slot)
            })
            .collect();

        let shadow = self
            .shadow_roots
            .get_mut(&host)
            .ok_or(DomError::Shadow(ShadowError::NotAttached))?;
        Ok(shadow.distribute(&slottables))
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}
