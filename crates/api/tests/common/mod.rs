//! Shared helpers for HTTP-level integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use aquasurveyor_api::auth::jwt::JwtConfig;
use aquasurveyor_api::auth::password::hash_password;
use aquasurveyor_api::config::ServerConfig;
use aquasurveyor_api::router::build_app_router;
use aquasurveyor_api::state::AppState;
use aquasurveyor_db::models::user::{CreateUser, User};
use aquasurveyor_db::repositories::UserRepo;
use aquasurveyor_notify::{
    EmailSender, NotificationDispatcher, NotifyError, OutgoingEmail, OutgoingSms, PgHistorySink,
    SmsSender, UnconfiguredChannel,
};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Password used for every user created through [`create_user`].
pub const TEST_PASSWORD: &str = "river42";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        body_limit_bytes: 1024 * 1024,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_mins: 60,
        },
    }
}

/// A channel that accepts every message.
pub struct AcceptingChannel;

#[async_trait]
impl EmailSender for AcceptingChannel {
    async fn send_email(&self, _email: &OutgoingEmail) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[async_trait]
impl SmsSender for AcceptingChannel {
    async fn send_sms(&self, _sms: &OutgoingSms) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Build the full application router with channels that always succeed.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with_channels(pool, Arc::new(AcceptingChannel), Arc::new(AcceptingChannel))
}

/// Build the application with email and SMS left unconfigured, so every
/// delivery attempt fails.
pub fn build_failing_app(pool: PgPool) -> Router {
    build_app_with_channels(
        pool,
        Arc::new(UnconfiguredChannel::new("Email")),
        Arc::new(UnconfiguredChannel::new("SMS")),
    )
}

fn build_app_with_channels(
    pool: PgPool,
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
) -> Router {
    let config = test_config();
    let dispatcher =
        NotificationDispatcher::new(email, sms, Arc::new(PgHistorySink::new(pool.clone())));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        dispatcher,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user directly and return it with a valid access token.
pub async fn create_user(pool: &PgPool, email: &str, phone: Option<&str>) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Test Surveyor".to_string(),
            email: email.to_string(),
            phone_number: phone.map(str::to_string),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        },
    )
    .await
    .expect("user creation should succeed");
    let token = test_config()
        .jwt
        .issue(user.id)
        .expect("token should sign")
        .token;
    (user, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
