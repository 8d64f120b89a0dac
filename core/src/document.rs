//! Arena-backed element tree that stands in for the browser DOM.
//!
//! Nodes are never freed; clearing a region detaches its children, and every
//! query walks from a live node, so detached subtrees are unreachable.

use crate::markup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element { tag: String, attrs: Vec<(String, String)> },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    pub(crate) doctype: bool,
}

const ROOT_TAG: &str = "#document";

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let root = Node {
            data: NodeData::Element { tag: ROOT_TAG.to_string(), attrs: Vec::new() },
            parent: None,
            children: Vec::new(),
        };
        Self { nodes: vec![root], root: NodeId(0), doctype: false }
    }

    pub fn parse(html: &str) -> Self {
        let mut doc = Self::new();
        let root = doc.root;
        markup::parse_into(&mut doc, root, html);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node { data, parent: None, children: Vec::new() });
        NodeId(self.nodes.len() - 1)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element { tag: tag.to_ascii_lowercase(), attrs: Vec::new() })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Comment(text.to_string()))
    }

    pub fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0].data
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn detach(&mut self, node: NodeId) {
        if let Some(p) = self.nodes[node.0].parent.take() {
            self.nodes[p.0].children.retain(|c| *c != node);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for c in children {
            self.nodes[c.0].parent = None;
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.tag(node).is_some()
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Element { attrs, .. } => attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[node.0].data {
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[node.0].data {
            attrs.retain(|(k, _)| k != name);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class").is_some_and(|c| c.split_whitespace().any(|x| x == class))
    }

    /// Adds or removes `class`; order of the remaining classes is kept.
    pub fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        if !self.is_element(node) || self.has_class(node, class) == on {
            return;
        }
        let current = self.attr(node, "class").unwrap_or("");
        let mut classes: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
        if on {
            classes.push(class);
        }
        let joined = classes.join(" ");
        self.set_attr(node, "class", &joined);
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        self.set_class(node, class, true);
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.set_class(node, class, false);
    }

    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        let on = !self.has_class(node, class);
        self.set_class(node, class, on);
        on
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        match &self.nodes[node.0].data {
            NodeData::Text(t) => out.push_str(t),
            NodeData::Comment(_) => {}
            NodeData::Element { .. } => {
                for d in self.descendants(node) {
                    if let NodeData::Text(t) = &self.nodes[d.0].data {
                        out.push_str(t);
                    }
                }
            }
        }
        out
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let NodeData::Text(t) = &mut self.nodes[node.0].data {
            *t = text.to_string();
            return;
        }
        if !self.is_element(node) {
            return;
        }
        self.clear_children(node);
        if !text.is_empty() {
            let t = self.create_text(text);
            self.append_child(node, t);
        }
    }

    /// Pre-order descendants of `node`, not including `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev());
        }
        out
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root).into_iter().find(|n| self.attr(*n, "id") == Some(id))
    }

    /// Elements under `scope` carrying attribute `name`, in document order.
    pub fn elements_with_attr(&self, scope: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(scope).into_iter().filter(|n| self.has_attr(*n, name)).collect()
    }

    pub fn elements_with_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope).into_iter().filter(|n| self.has_class(*n, class)).collect()
    }

    pub fn elements_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope).into_iter().filter(|n| self.tag(*n) == Some(tag)).collect()
    }

    pub fn first_element_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).iter().copied().find(|c| self.is_element(*c))
    }

    /// True when `node` is `ancestor` or lies beneath it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// Nearest ancestor-or-self matching `pred`.
    pub fn closest(&self, node: NodeId, pred: impl Fn(&Document, NodeId) -> bool) -> Option<NodeId> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if self.is_element(n) && pred(self, n) {
                return Some(n);
            }
            cur = self.parent(n);
        }
        None
    }

    /// Whether `node` is still reachable from the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    /// Replaces the children of `node` with parsed `html`; returns the first element.
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) -> Option<NodeId> {
        self.clear_children(node);
        markup::parse_into(self, node, html);
        self.first_element_child(node)
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for c in self.children(node) {
            markup::serialize(self, *c, &mut out);
        }
        out
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        if node == self.root {
            return self.inner_html(node);
        }
        let mut out = String::new();
        markup::serialize(self, node, &mut out);
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if self.doctype {
            out.push_str("<!DOCTYPE html>\n");
        }
        out.push_str(&self.inner_html(self.root));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_helpers_keep_order() {
        let mut doc = Document::new();
        let div = doc.create_element("DIV");
        doc.set_attr(div, "class", "a b c");
        doc.remove_class(div, "b");
        assert_eq!(doc.attr(div, "class"), Some("a c"));
        assert!(doc.toggle_class(div, "show"));
        assert!(doc.has_class(div, "show"));
        assert!(!doc.toggle_class(div, "show"));
        assert_eq!(doc.attr(div, "class"), Some("a c"));
        assert_eq!(doc.tag(div), Some("div"));
    }

    #[test]
    fn set_text_replaces_children() {
        let mut doc = Document::parse("<p id=\"x\">old <b>bold</b></p>");
        let p = doc.element_by_id("x").unwrap();
        assert_eq!(doc.text_content(p), "old bold");
        doc.set_text(p, "new");
        assert_eq!(doc.text_content(p), "new");
        assert_eq!(doc.children(p).len(), 1);
        assert!(doc.elements_by_tag(doc.root(), "b").is_empty());
    }

    #[test]
    fn contains_and_closest() {
        let doc = Document::parse("<ul id=\"menu\"><li class=\"item\"><a><span>x</span></a></li></ul><p id=\"out\"></p>");
        let menu = doc.element_by_id("menu").unwrap();
        let span = doc.elements_by_tag(doc.root(), "span")[0];
        let out = doc.element_by_id("out").unwrap();
        assert!(doc.contains(menu, span));
        assert!(!doc.contains(menu, out));
        let li = doc.closest(span, |d, n| d.has_class(n, "item")).unwrap();
        assert_eq!(doc.tag(li), Some("li"));
    }

    #[test]
    fn inner_html_returns_first_element() {
        let mut doc = Document::parse("<div id=\"slot\">placeholder</div>");
        let slot = doc.element_by_id("slot").unwrap();
        let first = doc.set_inner_html(slot, "\n  <aside id=\"sidebar\"></aside><p></p>").unwrap();
        assert_eq!(doc.attr(first, "id"), Some("sidebar"));
        assert_eq!(doc.element_by_id("sidebar"), Some(first));
        assert!(!doc.text_content(slot).contains("placeholder"));
    }
}
