use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Engine, NewUser, Role};
use migration::MigratorTrait;
use server::{ServerOptions, ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    engine
        .bootstrap_user(NewUser {
            name: "Admin".to_string(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
            password: "secret1".to_string(),
        })
        .await
        .unwrap();

    let state = ServerState::new(Arc::new(engine), &ServerOptions::default());
    router(state)
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_issues_token_and_me_requires_it() {
    let app = app().await;

    let (status, _) = call(&app, "GET", "/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "GET", "/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({ "username": "admin", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app, "admin", "secret1").await;
    let (status, me) = call(&app, "GET", "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "admin");
    assert_eq!(me["role"], "admin");

    let (status, _) = call(&app, "POST", "/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, "GET", "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_ledger_code_is_a_conflict() {
    let app = app().await;
    let token = login(&app, "admin", "secret1").await;

    let (status, code) = call(
        &app,
        "POST",
        "/ledger-codes",
        Some(&token),
        Some(json!({ "code": "Milk Sales", "category": "income" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(code["is_active"], true);

    let (status, _) = call(
        &app,
        "POST",
        "/ledger-codes",
        Some(&token),
        Some(json!({ "code": "  milk   sales ", "category": "expense" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn saving_today_returns_running_totals() {
    let app = app().await;
    let token = login(&app, "admin", "secret1").await;
    let today = Utc::now().date_naive();

    let (_, code) = call(
        &app,
        "POST",
        "/ledger-codes",
        Some(&token),
        Some(json!({ "code": "Feed", "category": "expense" })),
    )
    .await;
    let code_id = code["id"].as_str().unwrap().to_string();

    let (status, saved) = call(
        &app,
        "POST",
        &format!("/days/{today}/save"),
        Some(&token),
        Some(json!({
            "rows": [
                { "ledger_code_id": code_id, "cash_in_minor": 5000, "description": "sold" },
                { "ledger_code_id": code_id, "expenditure_cash_minor": 1200, "description": "feed" },
                { "description": "no code", "cash_in_minor": 10 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["saved_count"], 2);
    assert_eq!(saved["previous_balance_minor"], 0);
    assert_eq!(saved["today_net_minor"], 3800);
    assert_eq!(saved["closing_balance_minor"], 3800);
    assert_eq!(saved["day"]["rows"].as_array().unwrap().len(), 2);

    let (status, opened) = call(&app, "GET", &format!("/days/{today}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(opened["total_balance_minor"], 3800);
    assert_eq!(opened["locked"], false);
}

#[tokio::test]
async fn read_role_cannot_save_or_manage_users() {
    let app = app().await;
    let admin = login(&app, "admin", "secret1").await;

    let (status, _) = call(
        &app,
        "POST",
        "/users",
        Some(&admin),
        Some(json!({
            "name": "Viewer",
            "username": "viewer",
            "email": "viewer@example.com",
            "role": "read",
            "password": "secret1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let viewer = login(&app, "viewer", "secret1").await;
    let today = Utc::now().date_naive();

    let (status, _) = call(
        &app,
        "POST",
        &format!("/days/{today}/save"),
        Some(&viewer),
        Some(json!({ "rows": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, "GET", "/users", Some(&viewer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, "GET", "/ledger-codes", Some(&viewer), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn cash_watch_reports_changes_since_a_value() {
    let app = app().await;
    let token = login(&app, "admin", "secret1").await;

    let (status, cash) = call(
        &app,
        "PUT",
        "/cash",
        Some(&token),
        Some(json!({ "amount_minor": 42_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cash["amount_minor"], 42_000);

    let (status, watched) = call(&app, "GET", "/cash/watch?since=0", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(watched["changed"], true);
    assert_eq!(watched["amount_minor"], 42_000);

    let (status, _) = call(
        &app,
        "PUT",
        "/cash",
        Some(&token),
        Some(json!({ "amount_minor": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_transaction_is_not_found() {
    let app = app().await;
    let token = login(&app, "admin", "secret1").await;

    let (status, _) = call(
        &app,
        "GET",
        "/transactions/00000000-0000-0000-0000-000000000000",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn role_change_and_password_reset_revoke_sessions() {
    let app = app().await;
    let admin = login(&app, "admin", "secret1").await;

    let (status, clerk) = call(
        &app,
        "POST",
        "/users",
        Some(&admin),
        Some(json!({
            "name": "Clerk",
            "username": "clerk",
            "email": "clerk@example.com",
            "role": "write",
            "password": "secret1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let clerk_id = clerk["id"].as_str().unwrap().to_string();

    let token = login(&app, "clerk", "secret1").await;
    let today = Utc::now().date_naive();
    let save = format!("/days/{today}/save");

    let (status, _) = call(&app, "POST", &save, Some(&token), Some(json!({ "rows": [] }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        &app,
        "PATCH",
        &format!("/users/{clerk_id}"),
        Some(&admin),
        Some(json!({ "role": "read" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "POST", &save, Some(&token), Some(json!({ "rows": [] }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let demoted = login(&app, "clerk", "secret1").await;
    let (status, _) = call(&app, "POST", &save, Some(&demoted), Some(json!({ "rows": [] }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(
        &app,
        "POST",
        &format!("/users/{clerk_id}/password"),
        Some(&admin),
        Some(json!({ "password": "secret2" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, "GET", "/me", Some(&demoted), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    login(&app, "clerk", "secret2").await;
}
