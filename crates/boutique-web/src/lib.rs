#![forbid(unsafe_code)]

//! Browser bindings for the boutique storefront controller.
//!
//! The page calls `attach(document)` once its structure is ready. The
//! returned `Attachment` owns every listener and timer it installed and
//! removes them on `dispose()`. `formatPrice`, `filterByCategory` and
//! `searchProducts` are exported as free functions.
//!
//! Everything that touches `web-sys` lives behind `target_arch = "wasm32"`;
//! option parsing and console routing are plain Rust and tested natively.

pub mod console;
pub mod options;

#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
mod web_dom;

#[cfg(target_arch = "wasm32")]
pub use wasm::{Attachment, attach, filter_by_category, format_price, search_products};
