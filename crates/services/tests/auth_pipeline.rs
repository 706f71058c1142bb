//! End-to-end exercises of the sign-in flow and the token refresh pipeline
//! through the real service layer, with only the HTTP transport scripted.

mod support;

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde_json::json;

use services::error::ApiError;
use services::{AuthService, QuizService, UserService};
use support::{ScriptedTransport, scripted_client};

fn me_body() -> serde_json::Value {
    json!({
        "id": 1,
        "username": "alex",
        "email": "alex@example.org",
        "language": "fr",
        "is_staff": false,
        "is_superuser": false,
    })
}

#[tokio::test]
async fn login_installs_session_and_loads_profile() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push(StatusCode::OK, json!({ "access": "a1", "refresh": "r1" }));
    transport.push(StatusCode::OK, me_body());

    let api = scripted_client(transport.clone());
    let users = Arc::new(UserService::new(api.clone()));
    let auth = AuthService::new(api.clone(), users.clone());

    let me = auth.login("alex", "hunter2", true).await.unwrap();
    assert_eq!(me.username, "alex");

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);

    // Token request: POST to the token endpoint, no bearer header.
    assert_eq!(calls[0].method, Method::POST);
    assert!(calls[0].url.as_str().ends_with("token/"));
    assert_eq!(calls[0].bearer, None);
    assert_eq!(
        calls[0].body,
        Some(json!({ "username": "alex", "password": "hunter2" }))
    );

    // Profile request carries the freshly issued access token.
    assert_eq!(calls[1].bearer.as_deref(), Some("a1"));

    assert!(auth.is_logged_in());
    assert!(api.session().remember());
    assert_eq!(users.current_user().unwrap().username, "alex");
}

#[tokio::test]
async fn rejected_login_leaves_no_session() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push(
        StatusCode::UNAUTHORIZED,
        json!({ "detail": "No active account found with the given credentials" }),
    );

    let api = scripted_client(transport.clone());
    let users = Arc::new(UserService::new(api.clone()));
    let auth = AuthService::new(api.clone(), users);

    let err = auth.login("alex", "wrong", false).await.unwrap_err();
    assert!(matches!(
        err,
        services::error::AuthError::Api(ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            ..
        })
    ));

    // The 401 from the token endpoint itself never triggers a refresh.
    assert_eq!(transport.calls().len(), 1);
    assert!(!auth.is_logged_in());
}

#[tokio::test]
async fn expired_access_token_is_refreshed_transparently() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push(StatusCode::OK, json!({ "access": "a1", "refresh": "r1" }));
    transport.push(StatusCode::OK, me_body());
    // Quiz list: stale token, refresh, retried with the new one.
    transport.push(StatusCode::UNAUTHORIZED, json!({ "detail": "expired" }));
    transport.push(StatusCode::OK, json!({ "access": "a2" }));
    transport.push(StatusCode::OK, json!([]));

    let api = scripted_client(transport.clone());
    let users = Arc::new(UserService::new(api.clone()));
    let auth = AuthService::new(api.clone(), users);
    let quizzes = QuizService::new(api.clone());

    auth.login("alex", "hunter2", false).await.unwrap();
    let sessions = quizzes.list_sessions(None).await.unwrap();
    assert!(sessions.is_empty());

    let calls = transport.calls();
    assert_eq!(calls.len(), 5);
    assert!(calls[3].url.as_str().ends_with("token/refresh/"));
    assert_eq!(calls[3].body, Some(json!({ "refresh": "r1" })));
    assert_eq!(calls[4].bearer.as_deref(), Some("a2"));

    // The session kept its refresh token across the rotation.
    assert_eq!(api.session().refresh_token().as_deref(), Some("r1"));
}

#[tokio::test]
async fn failed_refresh_signs_the_user_out() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push(StatusCode::OK, json!({ "access": "a1", "refresh": "r1" }));
    transport.push(StatusCode::OK, me_body());
    transport.push(StatusCode::UNAUTHORIZED, json!({ "detail": "expired" }));
    transport.push(
        StatusCode::UNAUTHORIZED,
        json!({ "detail": "Token is invalid or expired" }),
    );

    let api = scripted_client(transport.clone());
    let users = Arc::new(UserService::new(api.clone()));
    let auth = AuthService::new(api.clone(), users);
    let quizzes = QuizService::new(api.clone());

    auth.login("alex", "hunter2", false).await.unwrap();
    let err = quizzes.list_sessions(None).await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired(_)));
    assert!(!auth.is_logged_in());
    assert!(api.session().access_token().is_none());
    // No retry of the original request after the refresh was rejected.
    assert_eq!(transport.calls().len(), 4);
}

#[tokio::test]
async fn logout_clears_session_and_cached_profile() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push(StatusCode::OK, json!({ "access": "a1", "refresh": "r1" }));
    transport.push(StatusCode::OK, me_body());

    let api = scripted_client(transport.clone());
    let users = Arc::new(UserService::new(api.clone()));
    let auth = AuthService::new(api.clone(), users.clone());

    auth.login("alex", "hunter2", true).await.unwrap();
    auth.logout().await;

    assert!(!auth.is_logged_in());
    assert!(users.current_user().is_none());
    // Logout is purely local.
    assert_eq!(transport.calls().len(), 2);
}
