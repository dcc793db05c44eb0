#![forbid(unsafe_code)]

//! Storefront interaction layer: cart count, add-to-cart, quantity steppers,
//! admin forms and toast notifications.
//!
//! The crate is host-independent. [`Controller`] reads and writes the page
//! through the [`Dom`] trait and asks its host for network and timer work
//! through [`Command`]s, so the same logic runs in the browser (see the
//! `boutique-web` crate) and in native tests against
//! [`memory_dom::MemoryDom`].

pub mod catalog;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod http;
pub mod notification;
pub mod stepper;

#[cfg(any(test, feature = "test-helpers"))]
pub mod memory_dom;

pub use catalog::{category_url, format_price, search_products};
pub use config::{ControllerConfig, CountOrdering};
pub use controller::{Command, Controller, Dispatch, DomEvent, Ticket};
pub use dom::{Dom, ElementSpec};
pub use error::{ControllerError, Result, TransportError};
pub use http::{FetchOutcome, HttpMethod, HttpRequest, HttpResponse};
pub use notification::Severity;
