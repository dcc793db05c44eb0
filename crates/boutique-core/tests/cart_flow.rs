//! Cart count synchronization and add-to-cart submissions.

mod common;

use boutique_core::{
    ControllerConfig, CountOrdering, Dispatch, Dom, HttpMethod, HttpResponse, TransportError,
};
use common::Harness;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const GENERIC_ADD_ERROR: &str = "Erreur lors de l'ajout au panier";

proptest! {
    #[test]
    fn count_sync_renders_server_value(n in any::<u64>()) {
        let harness = Harness::ready_with_count(n);
        prop_assert_eq!(harness.cart_text(), n.to_string());
        prop_assert!(harness.notifications().is_empty());
    }
}

#[test]
fn count_sync_example() {
    let harness = Harness::ready_with_count(3);
    assert_eq!(harness.cart_text(), "3");
}

#[test]
fn count_sync_without_display_is_a_no_op() {
    let mut harness = Harness::with_defaults();
    let badge = harness.cart_badge;
    harness.dom.remove(&badge);
    harness.init();
    harness.respond_json(0, r#"{"count":8}"#);
    assert_eq!(harness.cart_text(), "0");
    assert!(harness.notifications().is_empty());
}

#[test]
fn count_sync_failures_stay_silent() {
    for outcome in [
        Err(TransportError::new("NetworkError when attempting to fetch resource.")),
        Ok(HttpResponse::with_status(500, "<h1>Internal Server Error</h1>")),
        Ok(HttpResponse::ok(r#"{"count":"trois"}"#)),
    ] {
        let mut harness = Harness::with_defaults();
        harness.init();
        harness.respond(0, outcome);
        assert_eq!(harness.cart_text(), "0");
        assert!(harness.notifications().is_empty());
        assert_eq!(harness.controller.pending_fetches(), 0);
    }
}

#[test]
fn add_to_cart_posts_form_fields() {
    let mut harness = Harness::ready_with_count(2);
    let form = harness.add_to_cart_form(12, 3);
    assert_eq!(harness.submit(form), Dispatch::PreventDefault);

    assert_eq!(harness.in_flight.len(), 1);
    let (_, request) = &harness.in_flight[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "/ajouter-au-panier");
    assert_eq!(
        request.body,
        Some(vec![
            ("produit_id".to_string(), "12".to_string()),
            ("quantite".to_string(), "3".to_string()),
        ])
    );
}

#[test]
fn add_to_cart_success_updates_count_and_notifies() {
    let mut harness = Harness::ready_with_count(2);
    let form = harness.add_to_cart_form(12, 1);
    harness.submit(form);
    harness.respond_json(0, r#"{"success":true,"panier_count":7}"#);

    assert_eq!(harness.cart_text(), "7");
    assert_eq!(harness.notifications().len(), 1);
    assert_eq!(
        harness.notification_texts("notification-success"),
        vec!["Produit ajouté au panier !"]
    );
}

#[test]
fn add_to_cart_rejection_shows_generic_error_only() {
    let mut harness = Harness::ready_with_count(2);
    let form = harness.add_to_cart_form(12, 1);
    harness.submit(form);
    harness.respond_json(0, r#"{"success":false}"#);

    assert_eq!(harness.cart_text(), "2");
    assert_eq!(harness.notifications().len(), 1);
    assert_eq!(
        harness.notification_texts("notification-error"),
        vec![GENERIC_ADD_ERROR]
    );
}

#[test]
fn add_to_cart_never_surfaces_server_text() {
    let mut harness = Harness::ready_with_count(2);
    let form = harness.add_to_cart_form(12, 1);
    harness.submit(form);
    harness.respond(
        0,
        Ok(HttpResponse::with_status(
            400,
            r#"{"success":false,"error":"Stock épuisé"}"#,
        )),
    );
    assert_eq!(
        harness.notification_texts("notification-error"),
        vec![GENERIC_ADD_ERROR]
    );
}

#[test]
fn add_to_cart_transport_and_decode_failures_notify() {
    for outcome in [
        Err(TransportError::new("Failed to fetch")),
        Ok(HttpResponse::ok("<!doctype html><title>Connexion</title>")),
    ] {
        let mut harness = Harness::ready_with_count(1);
        let form = harness.add_to_cart_form(4, 1);
        harness.submit(form);
        harness.respond(0, outcome);
        assert_eq!(harness.cart_text(), "1");
        assert_eq!(
            harness.notification_texts("notification-error"),
            vec![GENERIC_ADD_ERROR]
        );
    }
}

#[test]
fn add_to_cart_success_without_count_keeps_display() {
    let mut harness = Harness::ready_with_count(5);
    let form = harness.add_to_cart_form(9, 1);
    harness.submit(form);
    harness.respond_json(0, r#"{"success":true}"#);
    assert_eq!(harness.cart_text(), "5");
    assert_eq!(harness.notification_texts("notification-success").len(), 1);
}

#[test]
fn overlapping_submissions_are_not_blocked_and_last_response_wins() {
    let mut harness = Harness::ready_with_count(0);
    let form = harness.add_to_cart_form(1, 1);
    harness.submit(form);
    harness.submit(form);
    assert_eq!(harness.in_flight.len(), 2);

    // Second request answers first; the older response lands last and wins.
    harness.respond_json(1, r#"{"success":true,"panier_count":2}"#);
    harness.respond_json(0, r#"{"success":true,"panier_count":1}"#);
    assert_eq!(harness.cart_text(), "1");
    assert_eq!(harness.notification_texts("notification-success").len(), 2);
}

#[test]
fn latest_request_ordering_drops_stale_counts() {
    let config = ControllerConfig::default().with_count_ordering(CountOrdering::LatestRequest);
    let mut harness = Harness::new(config);
    harness.init();
    let form = harness.add_to_cart_form(1, 1);
    harness.submit(form);
    harness.submit(form);

    // in flight: [count sync, add #1, add #2]
    harness.respond_json(2, r#"{"success":true,"panier_count":2}"#);
    harness.respond_json(1, r#"{"success":true,"panier_count":1}"#);
    harness.respond_json(0, r#"{"count":0}"#);

    assert_eq!(harness.cart_text(), "2");
    // Stale responses still confirm the addition to the user.
    assert_eq!(harness.notification_texts("notification-success").len(), 2);
}
