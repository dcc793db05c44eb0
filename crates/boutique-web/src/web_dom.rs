//! [`Dom`] over the live browser document.

use boutique_core::{Dom, ElementSpec};
use js_sys::Array;
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, FormData, HtmlElement, HtmlFormElement, HtmlInputElement};

pub struct WebDom {
    document: Document,
}

impl WebDom {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl Dom for WebDom {
    type Node = Element;
    type FormBody = FormData;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn elements_with_class(&self, class: &str) -> Vec<Element> {
        let collection = self.document.get_elements_by_class_name(class);
        (0..collection.length())
            .filter_map(|idx| collection.item(idx))
            .collect()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn sibling_with_class(&self, node: &Element, class: &str) -> Option<Element> {
        node.parent_element()?
            .get_elements_by_class_name(class)
            .item(0)
    }

    fn input_value(&self, node: &Element) -> String {
        node.dyn_ref::<HtmlInputElement>()
            .map(HtmlInputElement::value)
            .unwrap_or_default()
    }

    fn set_input_value(&mut self, node: &Element, value: &str) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        }
    }

    fn serialize_form(&self, form: &Element) -> Option<FormData> {
        let form = form.dyn_ref::<HtmlFormElement>()?;
        FormData::new_with_form(form).ok()
    }

    fn form_entries(&self, form: &Element) -> Vec<(String, String)> {
        let Some(data) = self.serialize_form(form) else {
            return Vec::new();
        };
        let Ok(Some(entries)) = js_sys::try_iter(&data) else {
            return Vec::new();
        };
        // File entries have no string value and are skipped.
        entries
            .filter_map(|entry| {
                let pair = entry.ok()?.dyn_into::<Array>().ok()?;
                Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
            })
            .collect()
    }

    fn append_to_body(&mut self, spec: &ElementSpec<'_>) -> Option<Element> {
        let body = self.document.body()?;
        let element = self.document.create_element(spec.tag).ok()?;
        element.set_class_name(spec.class_name);
        element.set_text_content(Some(spec.text));
        for (property, value) in spec.styles {
            self.set_style(&element, property, value);
        }
        body.append_child(&element).ok()?;
        Some(element)
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        if let Some(html) = node.dyn_ref::<HtmlElement>() {
            if let Err(err) = html.style().set_property(property, value) {
                warn!(property, value, error = ?err, "failed to set style");
            }
        }
    }

    fn is_attached(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }
}
