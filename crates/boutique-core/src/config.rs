//! Controller configuration.
//!
//! [`ControllerConfig::default`] matches the contract of the server-rendered
//! storefront pages: the `#cart-count` badge, `.add-to-cart-form`,
//! `.quantity-btn` / `.quantity-input`, `.admin-form`, and the French
//! user-facing messages. Hosts may override any field; every field is
//! optional when deserializing.

use serde::Deserialize;
use web_time::Duration;

/// How concurrent count-carrying responses are reconciled on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountOrdering {
    /// Whichever response arrives last overwrites the display.
    #[default]
    LastResponse,
    /// A response older than the newest applied one is dropped.
    LatestRequest,
}

/// Server endpoints consumed by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub cart_count: String,
    pub add_to_cart: String,
    pub catalog: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cart_count: "/panier-count".to_string(),
            add_to_cart: "/ajouter-au-panier".to_string(),
            catalog: "/boutique".to_string(),
        }
    }
}

/// Ids and class names the page exposes as attachment points.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub cart_count_id: String,
    pub add_to_cart_form: String,
    pub admin_form: String,
    pub quantity_button: String,
    pub quantity_input: String,
    pub increase: String,
    pub decrease: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            cart_count_id: "cart-count".to_string(),
            add_to_cart_form: "add-to-cart-form".to_string(),
            admin_form: "admin-form".to_string(),
            quantity_button: "quantity-btn".to_string(),
            quantity_input: "quantity-input".to_string(),
            increase: "increase".to_string(),
            decrease: "decrease".to_string(),
        }
    }
}

/// User-facing notification texts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub added_to_cart: String,
    pub add_to_cart_failed: String,
    pub admin_succeeded: String,
    pub admin_failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            added_to_cart: "Produit ajouté au panier !".to_string(),
            add_to_cart_failed: "Erreur lors de l'ajout au panier".to_string(),
            admin_succeeded: "Opération réussie !".to_string(),
            admin_failed: "Erreur lors de l'opération".to_string(),
        }
    }
}

/// Toast timeline and stacking policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Delay between insertion and the enter transition.
    pub enter_delay_ms: u64,
    /// Time from insertion until the exit transition starts.
    pub dwell_ms: u64,
    /// Length of the exit transition; the element is removed afterwards.
    pub exit_ms: u64,
    /// Upper bound on simultaneously shown toasts. `None` stacks without limit.
    pub max_visible: Option<usize>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enter_delay_ms: 100,
            dwell_ms: 3000,
            exit_ms: 300,
            max_visible: None,
        }
    }
}

impl NotificationConfig {
    #[must_use]
    pub fn enter_delay(&self) -> Duration {
        Duration::from_millis(self.enter_delay_ms)
    }

    #[must_use]
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    #[must_use]
    pub fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub endpoints: Endpoints,
    pub selectors: Selectors,
    pub messages: Messages,
    pub notifications: NotificationConfig,
    /// Delay between a successful admin action and the page reload.
    pub reload_delay_ms: u64,
    pub count_ordering: CountOrdering,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            selectors: Selectors::default(),
            messages: Messages::default(),
            notifications: NotificationConfig::default(),
            reload_delay_ms: 1000,
            count_ordering: CountOrdering::default(),
        }
    }
}

impl ControllerConfig {
    /// Parse a JSON configuration object; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_count_ordering(mut self, ordering: CountOrdering) -> Self {
        self.count_ordering = ordering;
        self
    }

    #[must_use]
    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.notifications.max_visible = Some(max_visible);
        self
    }

    #[must_use]
    pub fn with_reload_delay_ms(mut self, delay_ms: u64) -> Self {
        self.reload_delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    #[must_use]
    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }
}
