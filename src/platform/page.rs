//! Page element tree.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Handle to an element in a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

/// The element tree the utilities render into.
///
/// Operations on a handle whose element has been removed are ignored.
pub trait Page: Send + Sync {
    /// Create an element with a single class and text content, appended to the body.
    fn append_to_body(&self, class: &str, text: &str) -> ElementId;

    /// Look up an element by its `id` attribute.
    fn element_by_id(&self, dom_id: &str) -> Option<ElementId>;

    /// Whether the element is still attached.
    fn contains(&self, element: ElementId) -> bool;

    /// Text content of the element.
    fn text(&self, element: ElementId) -> Option<String>;

    /// Replace the element's content with plain text.
    fn set_text(&self, element: ElementId, text: &str);

    /// Replace the element's content with markup.
    fn set_html(&self, element: ElementId, html: &str);

    fn add_class(&self, element: ElementId, class: &str);

    fn remove_class(&self, element: ElementId, class: &str);

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Detach the element.
    fn remove(&self, element: ElementId);
}

#[derive(Debug, Clone, Default)]
struct Element {
    dom_id: Option<String>,
    classes: BTreeSet<String>,
    text: String,
    html: Option<String>,
}

#[derive(Debug, Default)]
struct Tree {
    elements: BTreeMap<ElementId, Element>,
    /// Body children in insertion order.
    body: Vec<ElementId>,
    next_id: u64,
    revision: u64,
}

impl Tree {
    fn insert(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, element);
        self.body.push(id);
        self.revision += 1;
        id
    }

    fn with_element(&mut self, id: ElementId, f: impl FnOnce(&mut Element)) {
        if let Some(element) = self.elements.get_mut(&id) {
            f(element);
            self.revision += 1;
        }
    }
}

/// In-process page used by the terminal front end and by tests.
#[derive(Debug, Default)]
pub struct MemoryPage {
    tree: Mutex<Tree>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an addressable element with initial text content.
    pub fn insert_element(&self, dom_id: &str, text: &str) -> ElementId {
        self.tree().insert(Element {
            dom_id: Some(dom_id.to_string()),
            text: text.to_string(),
            ..Element::default()
        })
    }

    /// Markup last written with [`Page::set_html`], if the content is markup.
    pub fn html(&self, element: ElementId) -> Option<String> {
        self.tree()
            .elements
            .get(&element)
            .and_then(|e| e.html.clone())
    }

    /// Text of every attached element carrying `class`, in body order.
    pub fn texts_with_class(&self, class: &str) -> Vec<String> {
        let tree = self.tree();
        tree.body
            .iter()
            .filter_map(|id| tree.elements.get(id))
            .filter(|e| e.classes.contains(class))
            .map(|e| e.text.clone())
            .collect()
    }

    /// Number of attached elements.
    pub fn len(&self) -> usize {
        self.tree().body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counter bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.tree().revision
    }
}

impl Page for MemoryPage {
    fn append_to_body(&self, class: &str, text: &str) -> ElementId {
        self.tree().insert(Element {
            classes: BTreeSet::from([class.to_string()]),
            text: text.to_string(),
            ..Element::default()
        })
    }

    fn element_by_id(&self, dom_id: &str) -> Option<ElementId> {
        let tree = self.tree();
        tree.body
            .iter()
            .copied()
            .find(|id| {
                tree.elements
                    .get(id)
                    .and_then(|e| e.dom_id.as_deref())
                    == Some(dom_id)
            })
    }

    fn contains(&self, element: ElementId) -> bool {
        self.tree().elements.contains_key(&element)
    }

    fn text(&self, element: ElementId) -> Option<String> {
        self.tree().elements.get(&element).map(|e| e.text.clone())
    }

    fn set_text(&self, element: ElementId, text: &str) {
        self.tree().with_element(element, |e| {
            e.text = text.to_string();
            e.html = None;
        });
    }

    fn set_html(&self, element: ElementId, html: &str) {
        self.tree().with_element(element, |e| {
            e.text = strip_tags(html);
            e.html = Some(html.to_string());
        });
    }

    fn add_class(&self, element: ElementId, class: &str) {
        self.tree().with_element(element, |e| {
            e.classes.insert(class.to_string());
        });
    }

    fn remove_class(&self, element: ElementId, class: &str) {
        self.tree().with_element(element, |e| {
            e.classes.remove(class);
        });
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.tree()
            .elements
            .get(&element)
            .is_some_and(|e| e.classes.contains(class))
    }

    fn remove(&self, element: ElementId) {
        let mut tree = self.tree();
        if tree.elements.remove(&element).is_some() {
            tree.body.retain(|id| *id != element);
            tree.revision += 1;
        }
    }
}

/// Text content of a markup fragment.
fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}
