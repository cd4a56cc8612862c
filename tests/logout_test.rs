//! Tests for logout and the body-token session check

mod common;

use common::{create_test_server, full_layout};
use serde_json::{json, Value};

/// Test: logout with a valid token succeeds
#[tokio::test]
async fn test_logout_when_logged_in() {
    let ctx = create_test_server();
    ctx.provision(1, full_layout(7));
    let token = ctx.login_token(1, 7).await;

    let response = ctx.server.post("/logout").json(&json!({ "Token": token })).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body, json!({ "Success": true }));
}

/// Test: after logout the token no longer validates
#[tokio::test]
async fn test_not_logged_in_after_logout() {
    let ctx = create_test_server();
    ctx.provision(1, full_layout(7));
    let token = ctx.login_token(1, 7).await;

    ctx.server.post("/logout").json(&json!({ "Token": token })).await;

    let response = ctx.server.post("/test").json(&json!({ "token": token })).await;
    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["error"], "Not logged in");

    let response = ctx
        .server
        .get("/facebook")
        .add_query_param("token", &token)
        .await;
    assert_eq!(response.status_code(), 401);
}

/// Test: logout with an unknown token reports failure without erroring
#[tokio::test]
async fn test_logout_unknown_token() {
    let ctx = create_test_server();

    let response = ctx.server.post("/logout").json(&json!({ "Token": "nope" })).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body, json!({ "Success": false, "Reason": "Not logged in" }));
}

/// Test: logging out twice reports failure the second time
#[tokio::test]
async fn test_double_logout() {
    let ctx = create_test_server();
    ctx.provision(1, full_layout(7));
    let token = ctx.login_token(1, 7).await;

    ctx.server.post("/logout").json(&json!({ "token": token })).await;
    let response = ctx.server.post("/logout").json(&json!({ "token": token })).await;

    let body: Value = response.json();
    assert_eq!(body["Success"], false);
}

/// Test: can log in again after logout
#[tokio::test]
async fn test_can_relogin_after_logout() {
    let ctx = create_test_server();
    ctx.provision(1, full_layout(7));
    let token = ctx.login_token(1, 7).await;
    ctx.server.post("/logout").json(&json!({ "Token": token })).await;

    let new_token = ctx.login_token(1, 7).await;

    let response = ctx.server.post("/test").json(&json!({ "token": new_token })).await;
    assert_eq!(response.status_code(), 200);
}

/// Test: /test without a token field is a bad request
#[tokio::test]
async fn test_check_requires_token_field() {
    let ctx = create_test_server();

    let response = ctx.server.post("/test").json(&json!({})).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Not logged in");
}
