//! Text-only document model the page components render into.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Removing a node or
//! clearing a parent releases the detached subtree and its slots are reused by
//! later allocations, so ids of removed nodes must not be kept. Queries walk from
//! the root. There is no way to assign markup: text is always stored as text
//! nodes and escaped when rendered.

mod render;

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: Vec<(String, String)>,
    value: String,
    checked: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Document {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    location: String,
    cookie: String,
}

impl Document {
    pub(crate) fn new(location: &str) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            location: location.to_string(),
            cookie: String::new(),
        };
        doc.root = doc.create_element("html");
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.head);
        doc.append_child(doc.root, doc.body);
        doc
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn head(&self) -> NodeId {
        self.head
    }

    pub(crate) fn body(&self) -> NodeId {
        self.body
    }

    /// Path portion of the page location, without query or fragment.
    pub(crate) fn pathname(&self) -> &str {
        let end = self.location.find(['?', '#']).unwrap_or(self.location.len());
        &self.location[..end]
    }

    pub(crate) fn cookie(&self) -> &str {
        &self.cookie
    }

    pub(crate) fn set_cookie(&mut self, cookie: &str) {
        self.cookie = cookie.to_string();
    }

    pub(crate) fn create_element(&mut self, tag: &str) -> NodeId {
        let element = Element { tag: tag.to_ascii_lowercase(), ..Element::default() };
        self.push_node(NodeKind::Element(element))
    }

    /// Creates a detached element with the given class list and text content.
    pub(crate) fn create_text_element(&mut self, tag: &str, class_name: &str, text: &str) -> NodeId {
        let node = self.create_element(tag);
        self.set_class_name(node, class_name);
        self.set_text_content(node, text);
        node
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let node = Node { parent: None, children: Vec::new(), kind };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Returns `node` and all of its descendants to the free list.
    fn release(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let slot = &mut self.nodes[current.0];
            stack.append(&mut slot.children);
            slot.parent = None;
            slot.kind = NodeKind::Text(String::new());
            self.free.push(current);
        }
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub(crate) fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        self.detach(child);
        let position = reference
            .and_then(|reference| self.nodes[parent.0].children.iter().position(|c| *c == reference))
            .unwrap_or(self.nodes[parent.0].children.len());
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(position, child);
    }

    /// Inserts `child` as the next sibling of `anchor`. No-op when `anchor` is detached.
    pub(crate) fn insert_after(&mut self, anchor: NodeId, child: NodeId) {
        let Some(parent) = self.nodes[anchor.0].parent else {
            return;
        };
        let next = self.next_sibling(anchor);
        self.insert_before(parent, child, next);
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.nodes[node.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let index = siblings.iter().position(|c| *c == node)?;
        siblings.get(index + 1).copied()
    }

    /// Removes `node` from its parent and releases it. Nodes without a parent
    /// are left alone.
    pub(crate) fn remove(&mut self, node: NodeId) {
        if node == self.root || self.nodes[node.0].parent.is_none() {
            return;
        }
        self.detach(node);
        self.release(node);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// Removes and releases every child of `node`.
    pub(crate) fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.release(child);
        }
    }

    /// Number of arena slots in use.
    #[cfg(test)]
    pub(crate) fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    #[cfg(test)]
    pub(crate) fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Element children in document order; text nodes are skipped.
    pub(crate) fn child_elements(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.iter().copied().filter(|c| self.element(*c).is_some()).collect()
    }

    #[cfg(test)]
    pub(crate) fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node.0].kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    pub(crate) fn tag(&self, node: NodeId) -> &str {
        self.element(node).map(|element| element.tag.as_str()).unwrap_or("#text")
    }

    pub(crate) fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attrs.get(name).map(String::as_str)
    }

    pub(crate) fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub(crate) fn id(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    pub(crate) fn set_id(&mut self, node: NodeId, id: &str) {
        self.set_attr(node, "id", id);
    }

    /// `data-foo-bar` attribute lookup by its dataset name (`fooBar` or `foo-bar`).
    pub(crate) fn data(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attr(node, &format!("data-{}", dataset_to_attr(name)))
    }

    pub(crate) fn set_data(&mut self, node: NodeId, name: &str, value: &str) {
        self.set_attr(node, &format!("data-{}", dataset_to_attr(name)), value);
    }

    pub(crate) fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|element| element.classes.iter().any(|c| c == class))
    }

    pub(crate) fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        if let Some(element) = self.element_mut(node) {
            element.classes.push(class.to_string());
        }
    }

    pub(crate) fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.retain(|c| c != class);
        }
    }

    /// Flips `class` and reports whether it is present afterwards.
    pub(crate) fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            self.element(node).is_some()
        }
    }

    /// Sets `class` present or absent explicitly.
    pub(crate) fn set_class(&mut self, node: NodeId, class: &str, present: bool) {
        if present {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    pub(crate) fn class_name(&self, node: NodeId) -> String {
        self.element(node).map(|element| element.classes.join(" ")).unwrap_or_default()
    }

    pub(crate) fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.clear();
            for class in class_name.split_whitespace() {
                if !element.classes.iter().any(|c| c == class) {
                    element.classes.push(class.to_string());
                }
            }
        }
    }

    pub(crate) fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)?
            .styles
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.element_mut(node) {
            match element.styles.iter_mut().find(|(name, _)| name == property) {
                Some(entry) => entry.1 = value.to_string(),
                None => element.styles.push((property.to_string(), value.to_string())),
            }
        }
    }

    pub(crate) fn value(&self, node: NodeId) -> &str {
        self.element(node).map(|element| element.value.as_str()).unwrap_or("")
    }

    pub(crate) fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.value = value.to_string();
        }
    }

    pub(crate) fn is_checked(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|element| element.checked)
    }

    pub(crate) fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(element) = self.element_mut(node) {
            element.checked = checked;
        }
    }

    pub(crate) fn text_content(&self, node: NodeId) -> String {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Element(_) => {
                let mut out = String::new();
                for child in &self.nodes[node.0].children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
        }
    }

    /// Replaces all children with a single text node. Markup in `text` stays text.
    pub(crate) fn set_text_content(&mut self, node: NodeId, text: &str) {
        if self.element(node).is_none() {
            if let NodeKind::Text(existing) = &mut self.nodes[node.0].kind {
                *existing = text.to_string();
            }
            return;
        }
        self.clear_children(node);
        if !text.is_empty() {
            let text_node = self.push_node(NodeKind::Text(text.to_string()));
            self.append_child(node, text_node);
        }
    }

    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        let text_node = self.push_node(NodeKind::Text(text.to_string()));
        self.append_child(parent, text_node);
    }

    /// Element descendants of `node` in document order, excluding `node` itself.
    pub(crate) fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.element(current).is_some() {
                out.push(current);
                stack.extend(self.nodes[current.0].children.iter().rev().copied());
            }
        }
        out
    }

    pub(crate) fn find_all(&self, scope: NodeId, predicate: impl Fn(&Self, NodeId) -> bool) -> Vec<NodeId> {
        self.descendants(scope).into_iter().filter(|node| predicate(self, *node)).collect()
    }

    pub(crate) fn find_first(
        &self,
        scope: NodeId,
        predicate: impl Fn(&Self, NodeId) -> bool,
    ) -> Option<NodeId> {
        self.descendants(scope).into_iter().find(|node| predicate(self, *node))
    }

    pub(crate) fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_first(self.root, |doc, node| doc.id(node) == Some(id))
    }

    pub(crate) fn elements_with_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.find_all(scope, |doc, node| doc.has_class(node, class))
    }

    pub(crate) fn first_with_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.find_first(scope, |doc, node| doc.has_class(node, class))
    }

    pub(crate) fn elements_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.find_all(scope, |doc, node| doc.tag(node) == tag)
    }

    pub(crate) fn first_by_tag(&self, scope: NodeId, tag: &str) -> Option<NodeId> {
        self.find_first(scope, |doc, node| doc.tag(node) == tag)
    }

    /// Nearest ancestor-or-self carrying `class`.
    pub(crate) fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if self.has_class(candidate, class) {
                return Some(candidate);
            }
            current = self.nodes[candidate.0].parent;
        }
        None
    }

    pub(crate) fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.nodes[candidate.0].parent;
        }
        false
    }

    pub(crate) fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        render::write_node(self, node, &mut out);
        out
    }

    pub(crate) fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in &self.nodes[node.0].children {
            render::write_node(self, *child, &mut out);
        }
        out
    }
}

fn dataset_to_attr(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
