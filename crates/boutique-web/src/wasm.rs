//! JS-facing API.

use std::rc::Rc;

use boutique_core::catalog::CATALOG_PATH;
use tracing::info;
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::host::{Host, Listener};
use crate::logging;
use crate::options::{config_from_json, severity_from_arg};
use crate::web_dom::WebDom;

/// Live wiring of one document. Dropping it (JS `free()`) disposes it.
#[wasm_bindgen]
pub struct Attachment {
    host: Rc<Host>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl Attachment {
    /// Remove every listener and cancel every timer. Idempotent.
    pub fn dispose(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        self.host.dispose();
    }

    /// Show a toast. `severity` is `"success"`, `"error"` or `"info"` (default).
    pub fn notify(&self, message: &str, severity: Option<String>) {
        self.host
            .notify(message, severity_from_arg(severity.as_deref()));
    }

    #[wasm_bindgen(getter, js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Wire the storefront controls of `document` and sync the cart count.
///
/// `config` is an optional plain object; see `ControllerConfig`.
#[wasm_bindgen]
pub fn attach(document: Document, config: JsValue) -> Result<Attachment, JsValue> {
    logging::install();

    let json = if config.is_undefined() || config.is_null() {
        None
    } else {
        let text = js_sys::JSON::stringify(&config)?;
        Some(String::from(text))
    };
    let config = config_from_json(json.as_deref()).map_err(|err| JsValue::from_str(&err))?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;

    let host = Host::new(window, WebDom::new(document), config);
    let listeners = host.wire();
    host.start();
    info!(listeners = listeners.len(), "storefront controller attached");
    Ok(Attachment { host, listeners })
}

#[wasm_bindgen(js_name = formatPrice)]
pub fn format_price(amount: f64) -> String {
    boutique_core::format_price(amount)
}

/// Full-page navigation to the catalog filtered on `category`.
#[wasm_bindgen(js_name = filterByCategory)]
pub fn filter_by_category(category: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    window
        .location()
        .set_href(&boutique_core::category_url(CATALOG_PATH, category))
}

/// Always throws: product search is not available client-side.
#[wasm_bindgen(js_name = searchProducts)]
pub fn search_products(query: &str) -> Result<(), JsValue> {
    boutique_core::search_products(query)
        .map_err(|err| JsValue::from(js_sys::Error::new(&err.to_string())))
}
