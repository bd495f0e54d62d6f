use std::rc::Rc;

use futures::executor::block_on;

use super::*;
use crate::config::RouteTargets;

fn config() -> AppConfig {
    AppConfig {
        backend_url: "https://backend.example.test".to_owned(),
        anon_key: "anon".to_owned(),
        routes: RouteTargets::default(),
        urgency_threshold_hours: 2,
        auth_settle_delay_ms: 0,
        countdown_tick_ms: 1000,
    }
}

#[test]
fn endpoint_joins_without_double_slash() {
    assert_eq!(endpoint("https://b.test/", "/auth/v1/user"), "https://b.test/auth/v1/user");
    assert_eq!(endpoint("https://b.test", "rest/v1/x"), "https://b.test/rest/v1/x");
    assert_eq!(BackendClient::new(&config()).url(REFRESH_PATH), "https://backend.example.test/auth/v1/token?grant_type=refresh_token");
}

#[test]
fn otp_path_encodes_redirect() {
    assert_eq!(
        otp_path("https://app.test/auth/callback"),
        "/auth/v1/otp?redirect_to=https%3A%2F%2Fapp.test%2Fauth%2Fcallback"
    );
}

#[test]
fn restaurants_path_filters_by_owner() {
    assert_eq!(restaurants_path("u-1"), "/rest/v1/restaurants?select=id&user_id=eq.u-1&limit=1");
    assert_eq!(restaurants_path("a b"), "/rest/v1/restaurants?select=id&user_id=eq.a%20b&limit=1");
}

#[test]
fn error_message_prefers_first_non_empty_field() {
    let body = serde_json::json!({ "msg": "  ", "error_description": "Email rate limit exceeded", "error": "429" });
    assert_eq!(error_message(&body).as_deref(), Some("Email rate limit exceeded"));
    assert_eq!(error_message(&serde_json::json!({ "error": "Not found" })).as_deref(), Some("Not found"));
    assert_eq!(error_message(&serde_json::json!({ "code": 500 })), None);
}

#[test]
fn token_response_computes_expiry_from_ttl() {
    let body: TokenResponse = serde_json::from_value(serde_json::json!({
        "access_token": "at2",
        "refresh_token": "rt2",
        "expires_in": 3600,
        "user": { "id": "u1", "email": "chef@example.com" }
    }))
    .unwrap();
    let session = body.into_session(1_000);
    assert_eq!(session.expires_at, Some(4_600));
    assert_eq!(session.user_id(), "u1");
    assert_eq!(session.access_token, "at2");
}

#[test]
fn token_response_prefers_absolute_expiry() {
    let body: TokenResponse = serde_json::from_value(serde_json::json!({
        "access_token": "at", "refresh_token": "rt", "expires_in": 3600, "expires_at": 99, "user": { "id": "u1" }
    }))
    .unwrap();
    assert_eq!(body.into_session(1_000).expires_at, Some(99));
}

#[test]
fn stored_session_round_trips_and_garbage_is_dropped() {
    let session = Session {
        user: User { id: "u1".to_owned(), email: None },
        access_token: "at".to_owned(),
        refresh_token: "rt".to_owned(),
        expires_at: Some(10),
    };
    let raw = serde_json::to_string(&session).unwrap();
    assert_eq!(decode_stored_session(&raw), Some(session));
    assert_eq!(decode_stored_session("{not json"), None);
}

#[test]
fn native_build_has_no_session_and_no_network() {
    let client = BackendClient::new(&config());
    assert_eq!(block_on(client.get_session()), Ok(None));
    assert_eq!(block_on(client.set_session("at", "rt", Some(10))), Err(AuthError::Unavailable));
    assert_eq!(block_on(client.sign_in_with_otp("a@b.test", "/cb")), Err(AuthError::Unavailable));
    assert_eq!(block_on(client.restaurants_owned_by("u1")), Err(ApiError::unavailable()));
}

#[test]
fn subscriptions_are_handed_out() {
    let client = BackendClient::new(&config());
    let subscription = client.on_auth_state_change(Rc::new(|_: crate::net::types::AuthChange| {}));
    subscription.unsubscribe();
}
