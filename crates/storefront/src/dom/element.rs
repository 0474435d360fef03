//! Named page elements that renderers write into.

use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::node::{ElementNode, Node, escape_html};

/// A subtree that is cleared and rebuilt on every data refresh.
///
/// Renderers only ever replace or append whole subtrees; they never patch
/// individual children of a previous render.
pub trait RenderTarget {
    /// Remove all children.
    fn clear(&self);

    /// Replace all children with `node`.
    fn set_content(&self, node: Node);

    /// Append `node` after the existing children.
    fn append(&self, node: Node);

    /// Replace all children with a single text node.
    fn set_text(&self, text: &str) {
        self.set_content(Node::text(text));
    }
}

/// A page element addressed by id, such as `#products` or `#checkoutBtn`.
#[derive(Debug)]
pub struct Element {
    id: String,
    tag: String,
    state: Mutex<ElementState>,
}

#[derive(Debug, Default)]
struct ElementState {
    classes: Vec<String>,
    disabled: bool,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    #[must_use]
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            state: Mutex::new(ElementState::default()),
        }
    }

    /// Builder: initial classes.
    #[must_use]
    pub fn with_classes(self, classes: &[&str]) -> Self {
        self.set_classes(classes.iter().copied());
        self
    }

    /// Builder: initial text content.
    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    fn lock(&self) -> MutexGuard<'_, ElementState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Replace the class list.
    pub fn set_classes<I, S>(&self, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().classes = classes.into_iter().map(Into::into).collect();
    }

    pub fn add_class(&self, class: &str) {
        let mut state = self.lock();
        if !state.classes.iter().any(|c| c == class) {
            state.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.lock().classes.retain(|c| c != class);
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.lock().classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.lock().classes.clone()
    }

    /// Hidden elements carry the `hidden` class.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.has_class("hidden")
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.lock().disabled = disabled;
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.lock().disabled
    }

    /// Snapshot of the current children.
    #[must_use]
    pub fn children(&self) -> Vec<Node> {
        self.lock().children.clone()
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.lock().children.len()
    }

    #[must_use]
    pub fn inner_html(&self) -> String {
        let state = self.lock();
        let mut out = String::new();
        for child in &state.children {
            child.write_html(&mut out);
        }
        out
    }

    /// The element itself serialised, including id, classes and `disabled`.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let state = self.lock();
        let mut out = format!("<{} id=\"{}\"", self.tag, escape_html(&self.id));
        if !state.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_html(&state.classes.join(" ")));
        }
        if state.disabled {
            out.push_str(" disabled");
        }
        out.push('>');
        for child in &state.children {
            child.write_html(&mut out);
        }
        let _ = write!(out, "</{}>", self.tag);
        out
    }

    #[must_use]
    pub fn text_content(&self) -> String {
        self.lock().children.iter().map(Node::text_content).collect()
    }

    /// Find a rendered descendant by its `id` attribute.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<ElementNode> {
        self.lock()
            .children
            .iter()
            .find_map(|child| child.find_by_id(id))
            .cloned()
    }

    /// All rendered descendants matching `predicate`.
    #[must_use]
    pub fn select<P>(&self, predicate: P) -> Vec<ElementNode>
    where
        P: Fn(&ElementNode) -> bool,
    {
        let state = self.lock();
        let mut found = Vec::new();
        for child in &state.children {
            child.select(&predicate, &mut found);
        }
        found.into_iter().cloned().collect()
    }

    /// Mutate a rendered descendant in place. Returns whether it was found.
    pub(crate) fn update_by_id<F>(&self, id: &str, update: F) -> bool
    where
        F: FnOnce(&mut ElementNode),
    {
        let mut state = self.lock();
        match state
            .children
            .iter_mut()
            .find_map(|child| child.find_by_id_mut(id))
        {
            Some(node) => {
                update(node);
                true
            }
            None => false,
        }
    }
}

impl RenderTarget for Element {
    fn clear(&self) {
        self.lock().children.clear();
    }

    fn set_content(&self, node: Node) {
        let mut state = self.lock();
        state.children.clear();
        state.children.push(node);
    }

    fn append(&self, node: Node) {
        self.lock().children.push(node);
    }
}
