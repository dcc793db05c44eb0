//! In-memory [`Dom`] for native tests.
//!
//! Nodes live in an arena and are never freed; removal only detaches them,
//! so a removed node can still be inspected. The document root is an
//! `html` element with a single `body` child.

use std::collections::BTreeMap;

use crate::dom::{Dom, ElementSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct MemoryNode {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    value: String,
    styles: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<MemoryNode>,
    root: NodeId,
    body: Option<NodeId>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    #[must_use]
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: vec![MemoryNode {
                tag: "html".to_string(),
                ..MemoryNode::default()
            }],
            root: NodeId(0),
            body: None,
        };
        dom.body = Some(dom.element(dom.root, "body", &[]));
        dom
    }

    /// A document without a body element.
    #[must_use]
    pub fn without_body() -> Self {
        let mut dom = Self::new();
        if let Some(body) = dom.body.take() {
            dom.detach(body);
        }
        dom
    }

    /// # Panics
    ///
    /// Panics on a document built with [`MemoryDom::without_body`].
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body.expect("document has no body")
    }

    /// Create `tag` with `classes` as the last child of `parent`.
    pub fn element(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(MemoryNode {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| (*c).to_string()).collect(),
            parent: Some(parent),
            ..MemoryNode::default()
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Create a named `input` holding `value` under `parent`.
    pub fn input(&mut self, parent: NodeId, name: &str, value: &str, classes: &[&str]) -> NodeId {
        let input = self.element(parent, "input", classes);
        self.set_attribute(input, "name", name);
        self.nodes[input.0].value = value.to_string();
        input
    }

    #[must_use]
    pub fn text(&self, node: NodeId) -> &str {
        &self.nodes[node.0].text
    }

    #[must_use]
    pub fn value(&self, node: NodeId) -> &str {
        &self.nodes[node.0].value
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].styles.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != node);
        }
    }

    fn descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[node.0].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn attached_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.descendants(self.root, &mut out);
        out
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;
    type FormBody = Vec<(String, String)>;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.attached_nodes()
            .into_iter()
            .find(|&node| self.nodes[node.0].attributes.get("id").map(String::as_str) == Some(id))
    }

    fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.attached_nodes()
            .into_iter()
            .filter(|node| self.has_class(node, class))
            .collect()
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes[node.0].attributes.get(name).cloned()
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        self.nodes[node.0].text = text.to_string();
    }

    fn sibling_with_class(&self, node: &NodeId, class: &str) -> Option<NodeId> {
        let parent = self.nodes[node.0].parent?;
        let mut scope = Vec::new();
        self.descendants(parent, &mut scope);
        scope.into_iter().find(|n| self.has_class(n, class))
    }

    fn input_value(&self, node: &NodeId) -> String {
        self.nodes[node.0].value.clone()
    }

    fn set_input_value(&mut self, node: &NodeId, value: &str) {
        self.nodes[node.0].value = value.to_string();
    }

    fn serialize_form(&self, form: &NodeId) -> Option<Self::FormBody> {
        (self.nodes[form.0].tag == "form").then(|| self.form_entries(form))
    }

    fn form_entries(&self, form: &NodeId) -> Vec<(String, String)> {
        let mut scope = Vec::new();
        self.descendants(*form, &mut scope);
        scope
            .into_iter()
            .filter(|n| matches!(self.nodes[n.0].tag.as_str(), "input" | "select" | "textarea"))
            .filter_map(|n| {
                let node = &self.nodes[n.0];
                node.attributes
                    .get("name")
                    .map(|name| (name.clone(), node.value.clone()))
            })
            .collect()
    }

    fn append_to_body(&mut self, spec: &ElementSpec<'_>) -> Option<NodeId> {
        let body = self.body?;
        let classes: Vec<&str> = spec.class_name.split_whitespace().collect();
        let node = self.element(body, spec.tag, &classes);
        self.nodes[node.0].text = spec.text.to_string();
        for (property, value) in spec.styles {
            self.set_style(&node, property, value);
        }
        Some(node)
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        self.nodes[node.0]
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        let mut current = *node;
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

    fn remove(&mut self, node: &NodeId) {
        self.detach(*node);
    }
}
