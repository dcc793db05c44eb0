//! Toast notifications.
//!
//! A toast is appended to the body hidden and off-screen, slides in after
//! `enter_delay`, starts sliding out at `dwell` (measured from insertion),
//! and is removed `exit` later if still attached. The center only mutates
//! the page; the caller owns the clock and feeds each [`ToastStep`] back
//! through [`NotificationCenter::advance`] once its delay has elapsed.
//!
//! # Invariants
//!
//! 1. Every shown toast gets a fresh [`ToastId`]; toasts never share an element.
//! 2. A toast is tracked from `show` until its `Remove` step or eviction.
//! 3. With `max_visible = None`, nothing is ever evicted or de-duplicated.
//! 4. Steps for an unknown or already removed toast are no-ops.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;
use web_time::Duration;

use crate::config::NotificationConfig;
use crate::dom::{Dom, ElementSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    Success,
    Error,
    #[default]
    Info,
}

impl Severity {
    /// Parse a severity name; anything unrecognised is `Info`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    #[must_use]
    pub const fn background(self) -> &'static str {
        match self {
            Self::Success => "#4CAF50",
            Self::Error => "#f44336",
            Self::Info => "#2196F3",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastStep {
    Enter,
    Leave,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Appended, still hidden.
    Inserted,
    Visible,
    Leaving,
}

#[derive(Debug, Clone)]
struct Toast<N> {
    id: ToastId,
    node: N,
    phase: ToastPhase,
}

/// Result of [`NotificationCenter::show`]: the new toast and the steps the
/// caller must schedule, with their delays from now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shown {
    pub id: ToastId,
    pub schedule: [(Duration, ToastStep); 2],
}

const HIDDEN_OPACITY: &str = "0";
const HIDDEN_TRANSFORM: &str = "translateX(100%)";
const SHOWN_OPACITY: &str = "1";
const SHOWN_TRANSFORM: &str = "translateX(0)";

#[derive(Debug, Clone)]
pub struct NotificationCenter<N> {
    config: NotificationConfig,
    live: VecDeque<Toast<N>>,
    next_id: u64,
}

impl<N: Clone + PartialEq + fmt::Debug> NotificationCenter<N> {
    #[must_use]
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            config,
            live: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Number of toasts shown and not yet removed.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn phase(&self, id: ToastId) -> Option<ToastPhase> {
        self.live.iter().find(|t| t.id == id).map(|t| t.phase)
    }

    /// Append a toast to the page. `None` when the page has no body.
    pub fn show<D>(&mut self, dom: &mut D, message: &str, severity: Severity) -> Option<Shown>
    where
        D: Dom<Node = N>,
    {
        let class_name = format!("notification notification-{severity}");
        let styles = self.initial_styles(severity);
        let node = dom.append_to_body(&ElementSpec {
            tag: "div",
            class_name: &class_name,
            text: message,
            styles: &styles,
        })?;

        if let Some(limit) = self.config.max_visible {
            while self.live.len() >= limit.max(1) {
                let Some(evicted) = self.live.pop_front() else {
                    break;
                };
                debug!(toast = evicted.id.0, limit, "evicting oldest notification");
                if dom.is_attached(&evicted.node) {
                    dom.remove(&evicted.node);
                }
            }
        }

        let id = ToastId(self.next_id);
        self.next_id += 1;
        self.live.push_back(Toast {
            id,
            node,
            phase: ToastPhase::Inserted,
        });
        debug!(toast = id.0, %severity, "notification shown");

        Some(Shown {
            id,
            schedule: [
                (self.config.enter_delay(), ToastStep::Enter),
                (self.config.dwell(), ToastStep::Leave),
            ],
        })
    }

    /// Apply `step` to toast `id`. Returns a follow-up step to schedule.
    pub fn advance<D>(&mut self, dom: &mut D, id: ToastId, step: ToastStep) -> Option<(Duration, ToastStep)>
    where
        D: Dom<Node = N>,
    {
        let index = self.live.iter().position(|t| t.id == id)?;
        match step {
            ToastStep::Enter => {
                let toast = &mut self.live[index];
                if toast.phase == ToastPhase::Inserted {
                    dom.set_style(&toast.node, "opacity", SHOWN_OPACITY);
                    dom.set_style(&toast.node, "transform", SHOWN_TRANSFORM);
                    toast.phase = ToastPhase::Visible;
                }
                None
            }
            ToastStep::Leave => {
                let toast = &mut self.live[index];
                dom.set_style(&toast.node, "opacity", HIDDEN_OPACITY);
                dom.set_style(&toast.node, "transform", HIDDEN_TRANSFORM);
                toast.phase = ToastPhase::Leaving;
                Some((self.config.exit(), ToastStep::Remove))
            }
            ToastStep::Remove => {
                if let Some(toast) = self.live.remove(index) {
                    if dom.is_attached(&toast.node) {
                        dom.remove(&toast.node);
                    }
                    debug!(toast = id.0, "notification removed");
                }
                None
            }
        }
    }

    /// Detach every live toast from the page.
    pub fn clear<D>(&mut self, dom: &mut D)
    where
        D: Dom<Node = N>,
    {
        for toast in self.live.drain(..) {
            if dom.is_attached(&toast.node) {
                dom.remove(&toast.node);
            }
        }
    }

    fn initial_styles(&self, severity: Severity) -> Vec<(&'static str, String)> {
        vec![
            ("position", "fixed".to_string()),
            ("top", "20px".to_string()),
            ("right", "20px".to_string()),
            ("padding", "15px 20px".to_string()),
            ("border-radius", "5px".to_string()),
            ("color", "white".to_string()),
            ("font-weight", "500".to_string()),
            ("z-index", "10000".to_string()),
            ("opacity", HIDDEN_OPACITY.to_string()),
            ("transform", HIDDEN_TRANSFORM.to_string()),
            ("transition", format!("all {}ms ease", self.config.exit_ms)),
            ("background-color", severity.background().to_string()),
        ]
    }
}
