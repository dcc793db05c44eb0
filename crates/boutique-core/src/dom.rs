//! Page abstraction.
//!
//! The controller reads and mutates the page only through [`Dom`]. The
//! browser host implements it on `web-sys` elements; tests use
//! [`MemoryDom`](crate::memory_dom::MemoryDom).
//!
//! Implementations only need class-name and id lookups: every attachment
//! point of the storefront pages is addressed that way.

use std::fmt;

/// Description of an element to create and append to the page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec<'a> {
    pub tag: &'a str,
    /// Full `class` attribute value (space separated).
    pub class_name: &'a str,
    pub text: &'a str,
    /// Inline style declarations, applied in order.
    pub styles: &'a [(&'a str, String)],
}

pub trait Dom {
    /// Handle to an element. Cloning must yield a handle to the same element.
    type Node: Clone + PartialEq + fmt::Debug;
    /// Serialized form payload handed back to the host with a fetch.
    type FormBody;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Every element currently in the page carrying `class`, in document order.
    fn elements_with_class(&self, class: &str) -> Vec<Self::Node>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// First element carrying `class` inside `node`'s parent.
    fn sibling_with_class(&self, node: &Self::Node, class: &str) -> Option<Self::Node>;

    fn input_value(&self, node: &Self::Node) -> String;

    fn set_input_value(&mut self, node: &Self::Node, value: &str);

    /// Multipart payload of a form, including file inputs.
    ///
    /// `None` when the node is not a form the host can serialize.
    fn serialize_form(&self, form: &Self::Node) -> Option<Self::FormBody>;

    /// Text-valued entries of a form, for requests that cannot carry a body.
    fn form_entries(&self, form: &Self::Node) -> Vec<(String, String)>;

    /// Create an element and append it to the body. `None` if the page has
    /// no body to append to.
    fn append_to_body(&mut self, spec: &ElementSpec<'_>) -> Option<Self::Node>;

    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    /// Whether `node` is still part of the page.
    fn is_attached(&self, node: &Self::Node) -> bool;

    fn remove(&mut self, node: &Self::Node);
}
