//! Executes controller commands with browser APIs.
//!
//! The host is shared as `Rc<Host>`; every callback handed to the browser
//! holds a `Weak` so listeners and timers never keep a disposed host alive.
//! `RefCell` borrows are released before any command runs and never span an
//! `await`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use boutique_core::{
    Command, Controller, ControllerConfig, Dispatch, Dom, DomEvent, FetchOutcome, HttpRequest,
    HttpResponse, Severity, Ticket, TransportError,
};
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Element, Event, EventTarget, FormData, RequestInit, Response, Window};
use web_time::Duration;

use crate::web_dom::WebDom;

/// An installed event listener, removable on dispose.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn detach(&self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            warn!(kind = self.kind, error = ?err, "failed to remove listener");
        }
    }
}

pub struct Host {
    window: Window,
    dom: RefCell<WebDom>,
    controller: RefCell<Controller<WebDom>>,
    timers: RefCell<HashMap<Ticket, i32>>,
    disposed: Cell<bool>,
}

impl Host {
    pub fn new(window: Window, dom: WebDom, config: ControllerConfig) -> Rc<Self> {
        Rc::new(Self {
            window,
            dom: RefCell::new(dom),
            controller: RefCell::new(Controller::new(config)),
            timers: RefCell::new(HashMap::new()),
            disposed: Cell::new(false),
        })
    }

    /// Listen on every storefront form and quantity control present now.
    pub fn wire(self: &Rc<Self>) -> Vec<Listener> {
        let (forms, buttons) = {
            let dom = self.dom.borrow();
            let controller = self.controller.borrow();
            let selectors = &controller.config().selectors;
            let mut forms = dom.elements_with_class(&selectors.add_to_cart_form);
            for form in dom.elements_with_class(&selectors.admin_form) {
                if !forms.contains(&form) {
                    forms.push(form);
                }
            }
            (forms, dom.elements_with_class(&selectors.quantity_button))
        };

        let mut listeners = Vec::with_capacity(forms.len() + buttons.len());
        for form in forms {
            listeners.extend(self.listen(form, "submit", |form| DomEvent::Submit { form }));
        }
        for control in buttons {
            listeners.extend(self.listen(control, "click", |control| DomEvent::Click { control }));
        }
        listeners
    }

    /// Page-ready initialization.
    pub fn start(self: &Rc<Self>) {
        self.controller.borrow_mut().init();
        self.pump();
    }

    pub fn notify(self: &Rc<Self>, message: &str, severity: Severity) {
        if self.disposed.get() {
            return;
        }
        {
            let mut dom = self.dom.borrow_mut();
            self.controller
                .borrow_mut()
                .notify(&mut dom, message, severity);
        }
        self.pump();
    }

    /// Stop reacting: cancel timers, drop pending work, remove live toasts.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        {
            let mut dom = self.dom.borrow_mut();
            self.controller.borrow_mut().shutdown(&mut dom);
        }
        for (_, handle) in self.timers.borrow_mut().drain() {
            self.window.clear_timeout_with_handle(handle);
        }
        debug!("storefront host disposed");
    }

    fn listen(
        self: &Rc<Self>,
        element: Element,
        kind: &'static str,
        to_event: fn(Element) -> DomEvent<Element>,
    ) -> Option<Listener> {
        let host = Rc::downgrade(self);
        let node = element.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(host) = host.upgrade() {
                host.dispatch(&event, &to_event(node.clone()));
            }
        });
        let target: EventTarget = element.into();
        if let Err(err) =
            target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
        {
            warn!(kind, error = ?err, "failed to install listener");
            return None;
        }
        Some(Listener {
            target,
            kind,
            callback,
        })
    }

    fn dispatch(self: &Rc<Self>, event: &Event, dom_event: &DomEvent<Element>) {
        if self.disposed.get() {
            return;
        }
        let dispatch = {
            let mut dom = self.dom.borrow_mut();
            self.controller.borrow_mut().handle(&mut dom, dom_event)
        };
        if dispatch == Dispatch::PreventDefault {
            event.prevent_default();
        }
        self.pump();
    }

    fn complete(self: &Rc<Self>, ticket: Ticket, outcome: FetchOutcome) {
        if self.disposed.get() {
            return;
        }
        {
            let mut dom = self.dom.borrow_mut();
            self.controller
                .borrow_mut()
                .complete(&mut dom, ticket, outcome);
        }
        self.pump();
    }

    fn fire(self: &Rc<Self>, ticket: Ticket) {
        self.timers.borrow_mut().remove(&ticket);
        if self.disposed.get() {
            return;
        }
        {
            let mut dom = self.dom.borrow_mut();
            self.controller.borrow_mut().timer_fired(&mut dom, ticket);
        }
        self.pump();
    }

    fn pump(self: &Rc<Self>) {
        let commands = self.controller.borrow_mut().take_commands();
        for command in commands {
            match command {
                Command::Fetch { ticket, request } => self.spawn_fetch(ticket, request),
                Command::Schedule { ticket, delay } => self.schedule(ticket, delay),
                Command::Reload => {
                    if let Err(err) = self.window.location().reload() {
                        warn!(error = ?err, "page reload failed");
                    }
                }
                Command::Navigate { url } => {
                    if let Err(err) = self.window.location().set_href(&url) {
                        warn!(%url, error = ?err, "navigation failed");
                    }
                }
            }
        }
    }

    fn spawn_fetch(self: &Rc<Self>, ticket: Ticket, request: HttpRequest<FormData>) {
        let host = Rc::downgrade(self);
        let window = self.window.clone();
        spawn_local(async move {
            let outcome = fetch(&window, &request).await;
            if let Some(host) = host.upgrade() {
                host.complete(ticket, outcome);
            }
        });
    }

    fn schedule(self: &Rc<Self>, ticket: Ticket, delay: Duration) {
        let host = Rc::downgrade(self);
        let callback = Closure::once_into_js(move || {
            if let Some(host) = host.upgrade() {
                host.fire(ticket);
            }
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            Ok(handle) => {
                self.timers.borrow_mut().insert(ticket, handle);
            }
            Err(err) => warn!(ticket = ticket.get(), error = ?err, "failed to schedule timer"),
        }
    }
}

async fn fetch(window: &Window, request: &HttpRequest<FormData>) -> FetchOutcome {
    let init = RequestInit::new();
    init.set_method(request.method.as_str());
    if let Some(body) = &request.body {
        init.set_body(body.as_ref());
    }
    let response: Response = JsFuture::from(window.fetch_with_str_and_init(&request.url, &init))
        .await
        .map_err(transport_error)?
        .dyn_into()
        .map_err(transport_error)?;
    let status = response.status();
    let text = JsFuture::from(response.text().map_err(transport_error)?)
        .await
        .map_err(transport_error)?;
    Ok(HttpResponse::with_status(
        status,
        text.as_string().unwrap_or_default(),
    ))
}

fn transport_error(err: JsValue) -> TransportError {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    TransportError::new(message)
}
