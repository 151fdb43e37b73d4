use std::collections::HashMap;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) classes: Vec<String>,
    pub(crate) text: String,
    pub(crate) value: String,
    pub(crate) default_value: String,
    pub(crate) checked: bool,
    pub(crate) disabled: bool,
    pub(crate) required: bool,
}

impl Element {
    fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            attrs: HashMap::new(),
            classes: Vec::new(),
            text: String::new(),
            value: String::new(),
            default_value: String::new(),
            checked: false,
            disabled: false,
            required: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

/// Arena document holding the page tree. Nodes are never deallocated;
/// removal detaches a subtree so traversals no longer reach it.
#[derive(Debug, Clone)]
pub(crate) struct Dom {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            element: Element::new("body"),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn create_element(&mut self, parent: NodeId, tag_name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            element: Element::new(tag_name),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn create_detached(&mut self, tag_name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            element: Element::new(tag_name),
        });
        id
    }

    pub(crate) fn insert_first(&mut self, parent: NodeId, node: NodeId) {
        self.detach(node);
        self.nodes[node.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(0, node);
    }

    pub(crate) fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: NodeId) {
        self.detach(node);
        self.nodes[node.0].parent = Some(parent);
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|child| *child == reference)
            .unwrap_or(self.nodes[parent.0].children.len());
        self.nodes[parent.0].children.insert(position, node);
    }

    pub(crate) fn append(&mut self, parent: NodeId, node: NodeId) {
        self.detach(node);
        self.nodes[node.0].parent = Some(parent);
        self.nodes[parent.0].children.push(node);
    }

    pub(crate) fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != node);
        }
    }

    pub(crate) fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub(crate) fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub(crate) fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    pub(crate) fn element(&self, node: NodeId) -> &Element {
        &self.nodes[node.0].element
    }

    pub(crate) fn element_mut(&mut self, node: NodeId) -> &mut Element {
        &mut self.nodes[node.0].element
    }

    pub(crate) fn tag_name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].element.tag_name
    }

    pub(crate) fn id_attr(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    pub(crate) fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].element.attrs.get(name).map(String::as_str)
    }

    pub(crate) fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .element
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub(crate) fn value(&self, node: NodeId) -> &str {
        &self.nodes[node.0].element.value
    }

    pub(crate) fn set_value(&mut self, node: NodeId, value: &str) {
        self.nodes[node.0].element.value = value.to_string();
    }

    pub(crate) fn checked(&self, node: NodeId) -> bool {
        self.nodes[node.0].element.checked
    }

    pub(crate) fn set_checked(&mut self, node: NodeId, checked: bool) {
        self.nodes[node.0].element.checked = checked;
    }

    pub(crate) fn disabled(&self, node: NodeId) -> bool {
        self.nodes[node.0].element.disabled
    }

    pub(crate) fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        self.nodes[node.0].element.disabled = disabled;
    }

    pub(crate) fn required(&self, node: NodeId) -> bool {
        self.nodes[node.0].element.required
    }

    pub(crate) fn set_required(&mut self, node: NodeId, required: bool) {
        self.nodes[node.0].element.required = required;
    }

    pub(crate) fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0]
            .element
            .classes
            .iter()
            .any(|existing| existing == class)
    }

    pub(crate) fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.nodes[node.0].element.classes.push(class.to_string());
        }
    }

    pub(crate) fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0]
            .element
            .classes
            .retain(|existing| existing != class);
    }

    pub(crate) fn toggle_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            self.remove_class(node, class);
        } else {
            self.add_class(node, class);
        }
    }

    pub(crate) fn set_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.0].element.text = text.to_string();
    }

    pub(crate) fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let element = &self.nodes[node.0].element;
        if !element.text.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&element.text);
        }
        for child in &self.nodes[node.0].children {
            self.collect_text(*child, out);
        }
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.id_attr(*node) == Some(id))
    }

    pub(crate) fn all_with_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|node| self.has_class(*node, class))
            .collect()
    }

    pub(crate) fn first_with_class(&self, class: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.has_class(*node, class))
    }

    pub(crate) fn descendant_with_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|node| *node != root)
            .find(|node| self.has_class(*node, class))
    }

    /// Attached descendants of `root` in document order, `root` included.
    pub(crate) fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            out.push(node);
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Focusable elements under `root` in document order: interactive tags
    /// plus anchors with an href, skipping disabled controls.
    pub(crate) fn focusable_descendants(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|node| self.is_focusable(*node))
            .collect()
    }

    pub(crate) fn is_focusable(&self, node: NodeId) -> bool {
        let element = &self.nodes[node.0].element;
        if element.disabled {
            return false;
        }
        match element.tag_name.as_str() {
            "button" | "input" | "select" | "textarea" => true,
            "a" => element.attrs.contains_key("href"),
            _ => false,
        }
    }

    /// Resolve a minimal selector: `#id`, `.class`, or a bare tag name,
    /// returning the first match in document order.
    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.select_first(selector)
            .ok_or_else(|| Error::ElementNotFound(selector.to_string()))
    }

    fn select_first(&self, selector: &str) -> Option<NodeId> {
        if let Some(id) = selector.strip_prefix('#') {
            self.by_id(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.first_with_class(class)
        } else {
            self.descendants(self.root)
                .into_iter()
                .find(|node| self.tag_name(*node) == selector)
        }
    }

    /// Short textual rendering of a node for assertion failures.
    pub(crate) fn snippet(&self, node: NodeId) -> String {
        let element = &self.nodes[node.0].element;
        let mut out = format!("<{}", element.tag_name);
        if let Some(id) = element.attrs.get("id") {
            out.push_str(&format!(" id=\"{id}\""));
        }
        if !element.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", element.classes.join(" ")));
        }
        if !element.value.is_empty() {
            out.push_str(&format!(" value=\"{}\"", element.value));
        }
        out.push('>');
        let text = self.text_content(node);
        if !text.is_empty() {
            out.push_str(&text);
        }
        out.push_str(&format!("</{}>", element.tag_name));
        out
    }
}
