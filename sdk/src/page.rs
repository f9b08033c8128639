//! A minimal document tree for the pieces of a page the pipeline touches.
//!
//! This is deliberately not a real DOM: the locator only needs to enumerate
//! elements in document order, read and write attributes, and the provider
//! bootstrap needs to insert a script tag. Integrators embedding the pipeline
//! against a live page mirror the relevant elements into this tree.

use indexmap::IndexMap;

/// One element in the page tree.
///
/// Elements carry a tag name, an ordered attribute map, and child elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: IndexMap<String, String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Chainable attribute setter for literal tree construction.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Chainable child appender for literal tree construction.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }
}

/// A searchable tree of [`Element`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    children: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element at the top level of the tree.
    pub fn push(&mut self, element: Element) {
        self.children.push(element);
    }

    /// Iterate every element in document order (an element before its
    /// children, children before later siblings).
    pub fn elements(&self) -> Elements<'_> {
        Elements {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Visit every element in document order with mutable access.
    pub fn for_each_element_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut Element),
    {
        fn walk<F: FnMut(&mut Element)>(nodes: &mut [Element], visit: &mut F) {
            for node in nodes {
                visit(node);
                walk(&mut node.children, visit);
            }
        }
        walk(&mut self.children, &mut visit);
    }

    /// Insert `element` immediately before the first element with `tag` in
    /// document order, as a sibling of it. When no such element exists the
    /// new element is appended at the top level instead.
    ///
    /// Returns `true` if a matching element was found.
    pub fn insert_before_first(&mut self, tag: &str, element: Element) -> bool {
        fn insert(nodes: &mut Vec<Element>, tag: &str, mut element: Element) -> Result<(), Element> {
            let mut i = 0;
            while i < nodes.len() {
                if nodes[i].tag() == tag {
                    nodes.insert(i, element);
                    return Ok(());
                }
                match insert(&mut nodes[i].children, tag, element) {
                    Ok(()) => return Ok(()),
                    Err(unplaced) => element = unplaced,
                }
                i += 1;
            }
            Err(element)
        }

        match insert(&mut self.children, tag, element) {
            Ok(()) => true,
            Err(unplaced) => {
                self.children.push(unplaced);
                false
            }
        }
    }
}

/// Document-order iterator over a [`Document`]'s elements.
#[derive(Debug)]
pub struct Elements<'doc> {
    stack: Vec<&'doc Element>,
}

impl<'doc> Iterator for Elements<'doc> {
    type Item = &'doc Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}
