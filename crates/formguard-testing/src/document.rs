//! An in-memory document implementing [`Dom`].

use crate::selector::{Matchable, Selector};
use formguard_core::Dom;
use formguard_rules::ElementId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    value: String,
    checked: bool,
    disabled: bool,
    hidden: bool,
    text: String,
    options: Vec<String>,
    selected: Option<usize>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent,
            ..Self::default()
        }
    }
}

impl Matchable for Node {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// A tree of elements standing in for a browser page.
///
/// Element handles index into an arena; removed elements keep their slot but
/// are no longer reachable from the body.
///
/// ```rust
/// use formguard_testing::MockDocument;
/// use formguard_core::Dom;
///
/// let mut doc = MockDocument::new();
/// let form = doc.form(Some("signup"));
/// let email = doc.input(form, "text");
/// doc.set_attribute(email, "name", "email");
///
/// assert_eq!(doc.query_all("form#signup [name=email]", None), vec![email]);
/// assert_eq!(doc.form_owner(email), Some(form));
/// ```
#[derive(Debug, Clone)]
pub struct MockDocument {
    nodes: Vec<Node>,
}

impl Default for MockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDocument {
    /// A document holding only `<body>`.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("body", None)],
        }
    }

    pub fn body(&self) -> ElementId {
        ElementId::new(0)
    }

    fn node(&self, element: ElementId) -> &Node {
        &self.nodes[element.index() as usize]
    }

    fn node_mut(&mut self, element: ElementId) -> &mut Node {
        &mut self.nodes[element.index() as usize]
    }

    fn push(&mut self, node: Node) -> ElementId {
        let id = ElementId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append a new `<tag>` as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = self.push(Node::new(tag, Some(parent)));
        self.node_mut(parent).children.push(id);
        id
    }

    /// Append a `<form>` to the body, with an id if given.
    pub fn form(&mut self, id: Option<&str>) -> ElementId {
        let body = self.body();
        let form = self.append(body, "form");
        if let Some(id) = id {
            self.set_attribute(form, "id", id);
        }
        form
    }

    pub fn input(&mut self, parent: ElementId, input_type: &str) -> ElementId {
        let input = self.append(parent, "input");
        self.set_attribute(input, "type", input_type);
        input
    }

    pub fn textarea(&mut self, parent: ElementId) -> ElementId {
        self.append(parent, "textarea")
    }

    /// Append a `<select>` whose options carry `values`. The first option starts selected.
    pub fn select(&mut self, parent: ElementId, values: &[&str]) -> ElementId {
        let select = self.append(parent, "select");
        let node = self.node_mut(select);
        node.options = values.iter().map(|v| v.to_string()).collect();
        node.selected = if values.is_empty() { None } else { Some(0) };
        select
    }

    /// Append an element that carries an attribute, e.g. a `[data-zvmsg]` span.
    pub fn append_with_attr(
        &mut self,
        parent: ElementId,
        tag: &str,
        name: &str,
        value: &str,
    ) -> ElementId {
        let element = self.append(parent, tag);
        self.set_attribute(element, name, value);
        element
    }

    pub fn set_value(&mut self, element: ElementId, value: &str) {
        self.node_mut(element).value = value.to_string();
    }

    pub fn set_checked(&mut self, element: ElementId, checked: bool) {
        self.node_mut(element).checked = checked;
    }

    /// Select the option at `index`, or clear the selection.
    pub fn select_option(&mut self, element: ElementId, index: Option<usize>) {
        let node = self.node_mut(element);
        node.selected = index.filter(|i| *i < node.options.len());
    }

    pub fn text(&self, element: ElementId) -> &str {
        &self.node(element).text
    }

    pub fn is_hidden(&self, element: ElementId) -> bool {
        self.node(element).hidden
    }

    pub fn classes(&self, element: ElementId) -> &[String] {
        &self.node(element).classes
    }

    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element).parent
    }

    pub fn children(&self, element: ElementId) -> &[ElementId] {
        &self.node(element).children
    }

    pub fn next_sibling(&self, element: ElementId) -> Option<ElementId> {
        let parent = self.parent(element)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|e| *e == element)?;
        siblings.get(index + 1).copied()
    }

    /// Whether `element` is reachable from the body.
    pub fn is_attached(&self, element: ElementId) -> bool {
        let mut current = element;
        loop {
            if current == self.body() {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// The visible message directly after `element`, if any.
    pub fn message_after(&self, element: ElementId) -> Option<&str> {
        let next = self.next_sibling(element)?;
        (!self.is_hidden(next)).then(|| self.text(next))
    }

    fn descendants(&self, root: ElementId, out: &mut Vec<ElementId>) {
        for &child in self.children(root) {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn matches(&self, element: ElementId, selector: &Selector) -> bool {
        if !selector.subject().matches(self.node(element)) {
            return false;
        }
        let mut current = self.parent(element);
        for compound in selector.ancestors() {
            loop {
                match current {
                    None => return false,
                    Some(ancestor) => {
                        current = self.parent(ancestor);
                        if compound.matches(self.node(ancestor)) {
                            break;
                        }
                    }
                }
            }
        }
        true
    }
}

impl Dom for MockDocument {
    fn query_all(&self, selector: &str, scope: Option<ElementId>) -> Vec<ElementId> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };

        let mut candidates = Vec::new();
        match scope {
            Some(scope) => self.descendants(scope, &mut candidates),
            None => {
                candidates.push(self.body());
                self.descendants(self.body(), &mut candidates);
            }
        }
        candidates
            .into_iter()
            .filter(|element| self.matches(*element, &selector))
            .collect()
    }

    fn tag_name(&self, element: ElementId) -> String {
        self.node(element).tag.clone()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let node = self.node(element);
        if name == "class" {
            return (!node.classes.is_empty()).then(|| node.classes.join(" "));
        }
        node.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let node = self.node_mut(element);
        if name == "class" {
            node.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn value(&self, element: ElementId) -> String {
        let node = self.node(element);
        if node.tag == "select" {
            return self.selected_value(element).unwrap_or_default();
        }
        node.value.clone()
    }

    fn selected_value(&self, element: ElementId) -> Option<String> {
        let node = self.node(element);
        if node.tag != "select" {
            return Some(node.value.clone());
        }
        node.selected.and_then(|i| node.options.get(i).cloned())
    }

    fn is_checked(&self, element: ElementId) -> bool {
        self.node(element).checked
    }

    fn is_disabled(&self, element: ElementId) -> bool {
        self.node(element).disabled
    }

    fn set_disabled(&mut self, element: ElementId, disabled: bool) {
        self.node_mut(element).disabled = disabled;
    }

    fn form_owner(&self, element: ElementId) -> Option<ElementId> {
        let mut current = self.parent(element);
        while let Some(ancestor) = current {
            if self.node(ancestor).tag == "form" {
                return Some(ancestor);
            }
            current = self.parent(ancestor);
        }
        None
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        let node = self.node_mut(element);
        if !node.has_class(class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        self.node_mut(element).classes.retain(|c| c != class);
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element).has_class(class)
    }

    fn create_message_after(&mut self, anchor: ElementId) -> ElementId {
        let parent = self.parent(anchor).unwrap_or_else(|| self.body());
        let mut node = Node::new("span", Some(parent));
        node.hidden = true;
        let message = self.push(node);

        let siblings = &mut self.node_mut(parent).children;
        match siblings.iter().position(|e| *e == anchor) {
            Some(index) => siblings.insert(index + 1, message),
            None => siblings.push(message),
        }
        message
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        self.node_mut(element).text = text.to_string();
    }

    fn set_hidden(&mut self, element: ElementId, hidden: bool) {
        self.node_mut(element).hidden = hidden;
    }

    fn remove(&mut self, element: ElementId) {
        if let Some(parent) = self.node_mut(element).parent.take() {
            self.node_mut(parent).children.retain(|e| *e != element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_respects_scope_and_order() {
        let mut doc = MockDocument::new();
        let first = doc.form(Some("a"));
        let second = doc.form(Some("b"));
        let a1 = doc.input(first, "text");
        let b1 = doc.input(second, "text");
        let a2 = doc.textarea(first);
        doc.set_attribute(a1, "data-validate", "presence");
        doc.set_attribute(a2, "data-validate", "presence");
        doc.set_attribute(b1, "data-validate", "email");

        assert_eq!(doc.query_all("[data-validate]", None), vec![a1, a2, b1]);
        assert_eq!(doc.query_all("[data-validate]", Some(second)), vec![b1]);
        assert_eq!(doc.query_all("[data-validate=email]", None), vec![b1]);
        assert_eq!(doc.query_all("#b input", None), vec![b1]);
        assert_eq!(doc.query_all("form", None), vec![first, second]);
        assert!(doc.query_all("div > p", None).is_empty());
    }

    #[test]
    fn message_nodes_follow_their_anchor() {
        let mut doc = MockDocument::new();
        let form = doc.form(None);
        let input = doc.input(form, "text");
        let after = doc.input(form, "text");

        let message = doc.create_message_after(input);
        assert_eq!(doc.children(form), &[input, message, after]);
        assert!(doc.is_hidden(message));
        assert_eq!(doc.message_after(input), None);

        doc.set_text(message, "can't be empty");
        doc.set_hidden(message, false);
        assert_eq!(doc.message_after(input), Some("can't be empty"));

        doc.remove(message);
        assert!(!doc.is_attached(message));
        assert_eq!(doc.children(form), &[input, after]);
    }

    #[test]
    fn select_values() {
        let mut doc = MockDocument::new();
        let body = doc.body();
        let select = doc.select(body, &["", "red", "blue"]);
        assert_eq!(doc.selected_value(select), Some(String::new()));

        doc.select_option(select, Some(2));
        assert_eq!(doc.value(select), "blue");

        doc.select_option(select, None);
        assert_eq!(doc.selected_value(select), None);
        assert_eq!(doc.value(select), "");
    }

    #[test]
    fn classes_are_a_set() {
        let mut doc = MockDocument::new();
        let body = doc.body();
        let input = doc.input(body, "text");
        doc.add_class(input, "a");
        doc.add_class(input, "a");
        doc.add_class(input, "b");
        assert_eq!(doc.attribute(input, "class").as_deref(), Some("a b"));
        doc.remove_class(input, "a");
        assert_eq!(doc.classes(input), &["b".to_string()]);
    }

    #[test]
    fn form_owner_walks_up() {
        let mut doc = MockDocument::new();
        let form = doc.form(None);
        let row = doc.append(form, "div");
        let input = doc.input(row, "text");
        let outside = doc.input(doc.body(), "text");
        assert_eq!(doc.form_owner(input), Some(form));
        assert_eq!(doc.form_owner(outside), None);
    }
}
