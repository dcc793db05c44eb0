//! Deterministic host for integration tests: a virtual clock, an in-flight
//! fetch list answered by the test, and a record of page-level commands.

#![allow(dead_code)]

use std::collections::BTreeSet;

use boutique_core::memory_dom::{MemoryDom, NodeId};
use boutique_core::{
    Command, Controller, ControllerConfig, Dispatch, Dom, DomEvent, FetchOutcome, HttpRequest,
    HttpResponse, Severity, Ticket,
};
use web_time::Duration;

pub type Body = Vec<(String, String)>;

pub struct Harness {
    pub dom: MemoryDom,
    pub controller: Controller<MemoryDom>,
    pub now: Duration,
    pub in_flight: Vec<(Ticket, HttpRequest<Body>)>,
    timers: BTreeSet<(Duration, Ticket)>,
    pub reloads: Vec<Duration>,
    pub navigations: Vec<String>,
    pub cart_badge: NodeId,
}

impl Harness {
    pub fn new(config: ControllerConfig) -> Self {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let header = dom.element(body, "header", &["site-header"]);
        let cart_badge = dom.element(header, "span", &["badge"]);
        dom.set_attribute(cart_badge, "id", "cart-count");
        dom.set_text(&cart_badge, "0");
        Self {
            dom,
            controller: Controller::new(config),
            now: Duration::ZERO,
            in_flight: Vec::new(),
            timers: BTreeSet::new(),
            reloads: Vec::new(),
            navigations: Vec::new(),
            cart_badge,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ControllerConfig::default())
    }

    /// Harness after page-ready init with the count request answered.
    pub fn ready_with_count(count: u64) -> Self {
        let mut harness = Self::with_defaults();
        harness.init();
        harness.respond_json(0, &format!(r#"{{"count":{count}}}"#));
        harness
    }

    pub fn init(&mut self) {
        self.controller.init();
        self.pump();
    }

    pub fn cart_text(&self) -> &str {
        self.dom.text(self.cart_badge)
    }

    pub fn add_to_cart_form(&mut self, product_id: u32, quantity: u32) -> NodeId {
        let body = self.dom.body();
        let form = self.dom.element(body, "form", &["add-to-cart-form"]);
        self.dom.set_attribute(form, "method", "post");
        self.dom.input(form, "produit_id", &product_id.to_string(), &[]);
        let group = self.dom.element(form, "div", &["quantity-selector"]);
        self.dom.element(group, "button", &["quantity-btn", "decrease"]);
        self.dom
            .input(group, "quantite", &quantity.to_string(), &["quantity-input"]);
        self.dom.element(group, "button", &["quantity-btn", "increase"]);
        form
    }

    pub fn admin_form(&mut self, action: Option<&str>, method: Option<&str>) -> NodeId {
        let body = self.dom.body();
        let form = self.dom.element(body, "form", &["admin-form"]);
        if let Some(action) = action {
            self.dom.set_attribute(form, "action", action);
        }
        if let Some(method) = method {
            self.dom.set_attribute(form, "method", method);
        }
        self.dom.input(form, "nom", "Sérum éclat", &[]);
        self.dom.input(form, "prix", "29.90", &[]);
        form
    }

    pub fn submit(&mut self, form: NodeId) -> Dispatch {
        let dispatch = self
            .controller
            .handle(&mut self.dom, &DomEvent::Submit { form });
        self.pump();
        dispatch
    }

    pub fn click(&mut self, control: NodeId) -> Dispatch {
        let dispatch = self
            .controller
            .handle(&mut self.dom, &DomEvent::Click { control });
        self.pump();
        dispatch
    }

    pub fn notify(&mut self, message: &str, severity: Severity) {
        self.controller.notify(&mut self.dom, message, severity);
        self.pump();
    }

    /// Answer the in-flight request at `index` (issue order).
    pub fn respond(&mut self, index: usize, outcome: FetchOutcome) {
        let (ticket, _) = self.in_flight.remove(index);
        self.controller.complete(&mut self.dom, ticket, outcome);
        self.pump();
    }

    pub fn respond_json(&mut self, index: usize, body: &str) {
        self.respond(index, Ok(HttpResponse::ok(body)));
    }

    /// Move the clock forward, firing due timers in order.
    pub fn advance(&mut self, by: Duration) {
        let target = self.now + by;
        loop {
            let Some((due, ticket)) = self.timers.first().copied() else {
                break;
            };
            if due > target {
                break;
            }
            self.timers.remove(&(due, ticket));
            self.now = due;
            self.controller.timer_fired(&mut self.dom, ticket);
            self.pump();
        }
        self.now = target;
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn notifications(&self) -> Vec<NodeId> {
        self.dom.elements_with_class("notification")
    }

    pub fn notification_texts(&self, class: &str) -> Vec<String> {
        self.dom
            .elements_with_class(class)
            .into_iter()
            .map(|n| self.dom.text(n).to_string())
            .collect()
    }

    fn pump(&mut self) {
        for command in self.controller.take_commands() {
            match command {
                Command::Fetch { ticket, request } => self.in_flight.push((ticket, request)),
                Command::Schedule { ticket, delay } => {
                    self.timers.insert((self.now + delay, ticket));
                }
                Command::Reload => self.reloads.push(self.now),
                Command::Navigate { url } => self.navigations.push(url),
            }
        }
    }
}
