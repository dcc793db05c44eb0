//! Cart & notification controller.
//!
//! [`Controller`] owns every storefront decision but performs no I/O. Entry
//! points mutate the page through a [`Dom`] and queue [`Command`]s; the host
//! drains them with [`Controller::take_commands`], executes them, and reports
//! back through [`Controller::complete`] and [`Controller::timer_fired`].
//!
//! # Invariants
//!
//! 1. Every queued `Fetch` and `Schedule` carries a fresh [`Ticket`]; tickets
//!    are consumed exactly once, unknown tickets are ignored.
//! 2. Failures never escape an entry point: each one becomes a log event and,
//!    except for the initial count sync, an error notification.
//! 3. Add-to-cart failures show the generic message; admin failures show the
//!    server's `error` text when there is one.
//! 4. Under [`CountOrdering::LastResponse`] the last count-carrying response to
//!    arrive wins. Under [`CountOrdering::LatestRequest`] a response issued
//!    before the newest applied one is dropped.
//!
//! # Failure Modes
//!
//! - No `#cart-count` element: counts are received and ignored.
//! - No page body: notifications are skipped (logged).
//! - A request that never completes leaves its ticket pending forever; there
//!   is no timeout.

use std::collections::HashMap;

use tracing::{debug, warn};
use web_time::Duration;

use crate::catalog::{self, category_url};
use crate::config::{ControllerConfig, CountOrdering};
use crate::dom::Dom;
use crate::error::{ControllerError, Result};
use crate::http::{
    AddToCartReply, AdminReply, CartCountReply, FetchOutcome, HttpMethod, HttpRequest, append_query,
    decode,
};
use crate::notification::{NotificationCenter, Severity, ToastId, ToastStep};
use crate::stepper::{self, StepDirection};

/// Identifies one pending fetch or timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Work the host performs on the controller's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<B> {
    /// Execute the request, then call [`Controller::complete`] with `ticket`.
    Fetch {
        ticket: Ticket,
        request: HttpRequest<B>,
    },
    /// Call [`Controller::timer_fired`] with `ticket` once `delay` elapsed.
    Schedule { ticket: Ticket, delay: Duration },
    /// Reload the current page.
    Reload,
    /// Navigate the whole page to `url`.
    Navigate { url: String },
}

/// A page event routed to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent<N> {
    Submit { form: N },
    Click { control: N },
}

/// What the host should do with the original event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Not a storefront control; leave the event alone.
    Ignored,
    Handled,
    /// Handled; the browser's default action must be cancelled.
    PreventDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingFetch {
    CartCount { seq: u64 },
    AddToCart { seq: u64 },
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerAction {
    Toast(ToastId, ToastStep),
    Reload,
}

pub struct Controller<D: Dom> {
    config: ControllerConfig,
    toasts: NotificationCenter<D::Node>,
    fetches: HashMap<Ticket, PendingFetch>,
    timers: HashMap<Ticket, TimerAction>,
    commands: Vec<Command<D::FormBody>>,
    next_ticket: u64,
    next_count_seq: u64,
    applied_count_seq: Option<u64>,
}

impl<D: Dom> std::fmt::Debug for Controller<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("pending_fetches", &self.fetches.len())
            .field("pending_timers", &self.timers.len())
            .field("queued_commands", &self.commands.len())
            .field("live_notifications", &self.toasts.live_count())
            .finish()
    }
}

impl<D: Dom> Controller<D> {
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            toasts: NotificationCenter::new(config.notifications.clone()),
            config,
            fetches: HashMap::new(),
            timers: HashMap::new(),
            commands: Vec::new(),
            next_ticket: 1,
            next_count_seq: 1,
            applied_count_seq: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Page-ready initialization: request the current cart count.
    pub fn init(&mut self) {
        self.sync_cart_count();
    }

    /// Queue a `GET` of the cart count.
    pub fn sync_cart_count(&mut self) {
        let seq = self.next_count_seq();
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: self.config.endpoints.cart_count.clone(),
            body: None,
        };
        self.fetch(request, PendingFetch::CartCount { seq });
    }

    /// Route a submit or click event.
    pub fn handle(&mut self, dom: &mut D, event: &DomEvent<D::Node>) -> Dispatch {
        match event {
            DomEvent::Submit { form } => self.handle_submit(dom, form),
            DomEvent::Click { control } => self.handle_click(dom, control),
        }
    }

    /// Resume the continuation of fetch `ticket`.
    pub fn complete(&mut self, dom: &mut D, ticket: Ticket, outcome: FetchOutcome) {
        let Some(pending) = self.fetches.remove(&ticket) else {
            warn!(ticket = ticket.0, "completion for unknown fetch ignored");
            return;
        };
        match pending {
            PendingFetch::CartCount { seq } => match decode::<CartCountReply>(outcome) {
                Ok(reply) => self.apply_count(dom, seq, reply.count),
                Err(err) => warn!(error = %err, "cart count sync failed"),
            },
            PendingFetch::AddToCart { seq } => match added_to_cart(outcome) {
                Ok(count) => {
                    if let Some(count) = count {
                        self.apply_count(dom, seq, count);
                    }
                    let message = self.config.messages.added_to_cart.clone();
                    self.notify(dom, &message, Severity::Success);
                }
                Err(err) => {
                    warn!(error = %err, "add to cart failed");
                    let message = self.config.messages.add_to_cart_failed.clone();
                    self.notify(dom, &message, Severity::Error);
                }
            },
            PendingFetch::Admin => match admin_succeeded(outcome) {
                Ok(()) => {
                    let message = self.config.messages.admin_succeeded.clone();
                    self.notify(dom, &message, Severity::Success);
                    let delay = self.config.reload_delay();
                    self.schedule(delay, TimerAction::Reload);
                }
                Err(err) => {
                    warn!(error = %err, "admin action failed");
                    let message = err
                        .server_message()
                        .filter(|m| !m.is_empty())
                        .unwrap_or(self.config.messages.admin_failed.as_str())
                        .to_string();
                    self.notify(dom, &message, Severity::Error);
                }
            },
        }
    }

    /// Resume the timer `ticket`.
    pub fn timer_fired(&mut self, dom: &mut D, ticket: Ticket) {
        let Some(action) = self.timers.remove(&ticket) else {
            debug!(ticket = ticket.0, "timer for unknown ticket ignored");
            return;
        };
        match action {
            TimerAction::Toast(id, step) => {
                if let Some((delay, next)) = self.toasts.advance(dom, id, step) {
                    self.schedule(delay, TimerAction::Toast(id, next));
                }
            }
            TimerAction::Reload => self.commands.push(Command::Reload),
        }
    }

    /// Show a toast.
    pub fn notify(&mut self, dom: &mut D, message: &str, severity: Severity) {
        let Some(shown) = self.toasts.show(dom, message, severity) else {
            warn!(%severity, text = message, "no page body; notification dropped");
            return;
        };
        for (delay, step) in shown.schedule {
            self.schedule(delay, TimerAction::Toast(shown.id, step));
        }
    }

    /// Navigate to the catalog filtered on `category`.
    pub fn filter_by_category(&mut self, category: &str) {
        let url = category_url(&self.config.endpoints.catalog, category);
        debug!(%url, "filtering catalog by category");
        self.commands.push(Command::Navigate { url });
    }

    pub fn search_products(&self, query: &str) -> Result<()> {
        catalog::search_products(query)
    }

    /// Drain queued host commands in the order they were issued.
    pub fn take_commands(&mut self) -> Vec<Command<D::FormBody>> {
        std::mem::take(&mut self.commands)
    }

    #[must_use]
    pub fn pending_fetches(&self) -> usize {
        self.fetches.len()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn live_notifications(&self) -> usize {
        self.toasts.live_count()
    }

    /// Forget every pending fetch and timer and remove live notifications.
    /// Returns the timer tickets the host should cancel.
    pub fn shutdown(&mut self, dom: &mut D) -> Vec<Ticket> {
        self.fetches.clear();
        self.commands.clear();
        self.toasts.clear(dom);
        let mut tickets: Vec<Ticket> = self.timers.drain().map(|(ticket, _)| ticket).collect();
        tickets.sort_unstable();
        tickets
    }

    // -----------------------------------------------------------------------
    // Event handlers
    // -----------------------------------------------------------------------

    fn handle_submit(&mut self, dom: &mut D, form: &D::Node) -> Dispatch {
        let selectors = &self.config.selectors;
        let add_to_cart = dom.has_class(form, &selectors.add_to_cart_form);
        let admin = dom.has_class(form, &selectors.admin_form);
        // Each role is an independent listener; a form with both runs both.
        if add_to_cart {
            self.submit_add_to_cart(dom, form);
        }
        if admin {
            self.submit_admin(dom, form);
        }
        if add_to_cart || admin {
            Dispatch::PreventDefault
        } else {
            Dispatch::Ignored
        }
    }

    fn handle_click(&mut self, dom: &mut D, control: &D::Node) -> Dispatch {
        let selectors = &self.config.selectors;
        if !dom.has_class(control, &selectors.quantity_button) {
            return Dispatch::Ignored;
        }
        let Some(direction) = StepDirection::from_tags(
            dom.has_class(control, &selectors.decrease),
            dom.has_class(control, &selectors.increase),
        ) else {
            debug!("quantity control without direction tag");
            return Dispatch::Handled;
        };
        let Some(input) = dom.sibling_with_class(control, &selectors.quantity_input) else {
            warn!("quantity control without sibling input");
            return Dispatch::Handled;
        };
        let next = stepper::step_quantity(&dom.input_value(&input), direction);
        dom.set_input_value(&input, &next.to_string());
        debug!(?direction, quantity = next, "quantity stepped");
        Dispatch::Handled
    }

    fn submit_add_to_cart(&mut self, dom: &D, form: &D::Node) {
        let body = dom.serialize_form(form);
        if body.is_none() {
            warn!("add-to-cart target is not a serializable form; posting without body");
        }
        let seq = self.next_count_seq();
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.config.endpoints.add_to_cart.clone(),
            body,
        };
        self.fetch(request, PendingFetch::AddToCart { seq });
    }

    fn submit_admin(&mut self, dom: &D, form: &D::Node) {
        let action = dom.attribute(form, "action").unwrap_or_default();
        let method = dom
            .attribute(form, "method")
            .map_or(HttpMethod::Post, |raw| HttpMethod::parse(&raw));
        let request = if method.allows_body() {
            HttpRequest {
                method,
                url: action,
                body: dom.serialize_form(form),
            }
        } else {
            HttpRequest {
                url: append_query(&action, &dom.form_entries(form)),
                method,
                body: None,
            }
        };
        debug!(method = %request.method, url = %request.url, "submitting admin form");
        self.fetch(request, PendingFetch::Admin);
    }

    // -----------------------------------------------------------------------
    // Bookkeeping
    // -----------------------------------------------------------------------

    fn apply_count(&mut self, dom: &mut D, seq: u64, count: u64) {
        if self.config.count_ordering == CountOrdering::LatestRequest
            && self.applied_count_seq.is_some_and(|applied| seq < applied)
        {
            debug!(seq, count, "stale cart count ignored");
            return;
        }
        self.applied_count_seq = Some(self.applied_count_seq.map_or(seq, |applied| applied.max(seq)));
        if let Some(display) = dom.element_by_id(&self.config.selectors.cart_count_id) {
            dom.set_text(&display, &count.to_string());
        }
    }

    fn next_ticket(&mut self) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    fn next_count_seq(&mut self) -> u64 {
        let seq = self.next_count_seq;
        self.next_count_seq += 1;
        seq
    }

    fn fetch(&mut self, request: HttpRequest<D::FormBody>, pending: PendingFetch) {
        let ticket = self.next_ticket();
        self.fetches.insert(ticket, pending);
        self.commands.push(Command::Fetch { ticket, request });
    }

    fn schedule(&mut self, delay: Duration, action: TimerAction) {
        let ticket = self.next_ticket();
        self.timers.insert(ticket, action);
        self.commands.push(Command::Schedule { ticket, delay });
    }
}

/// New cart total from an add-to-cart reply, if the server sent one.
fn added_to_cart(outcome: FetchOutcome) -> Result<Option<u64>> {
    let reply: AddToCartReply = decode(outcome)?;
    if reply.success {
        Ok(reply.panier_count)
    } else {
        Err(ControllerError::rejected(None))
    }
}

fn admin_succeeded(outcome: FetchOutcome) -> Result<()> {
    let reply: AdminReply = decode(outcome)?;
    if reply.success {
        Ok(())
    } else {
        Err(ControllerError::rejected(reply.error))
    }
}
