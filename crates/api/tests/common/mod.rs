#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use foodgram_api::auth::jwt::{generate_access_token, JwtConfig};
use foodgram_api::config::ServerConfig;
use foodgram_api::router::build_app_router;
use foodgram_api::state::AppState;
use foodgram_core::ingredient_catalog::CatalogEntry;
use foodgram_core::roles::{ROLE_ADMIN, ROLE_USER};
use foodgram_db::models::tag::CreateTag;
use foodgram_db::models::user::CreateUser;
use foodgram_db::repositories::{IngredientRepo, TagRepo, UserRepo};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        page_size: 6,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
    };
    build_app_router(state).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A provisioned user and a bearer token for them.
pub struct TestUser {
    pub id: i64,
    pub token: String,
}

async fn create_user_with_role(pool: &PgPool, username: &str, role: &str) -> TestUser {
    let input = CreateUser {
        email: format!("{username}@test.com"),
        username: username.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        role: Some(role.to_string()),
    };
    let user = UserRepo::create(pool, &input).await.unwrap();
    let token = generate_access_token(user.id, role, &test_config().jwt).unwrap();
    TestUser { id: user.id, token }
}

pub async fn create_user(pool: &PgPool, username: &str) -> TestUser {
    create_user_with_role(pool, username, ROLE_USER).await
}

pub async fn create_admin(pool: &PgPool, username: &str) -> TestUser {
    create_user_with_role(pool, username, ROLE_ADMIN).await
}

/// Seed ingredients and return their ids in input order.
pub async fn seed_ingredients(pool: &PgPool, entries: &[(&str, &str)]) -> Vec<i64> {
    let catalog: Vec<CatalogEntry> = entries
        .iter()
        .map(|(name, unit)| CatalogEntry::new(*name, *unit))
        .collect();
    IngredientRepo::import_catalog(pool, &catalog).await.unwrap();

    let all = IngredientRepo::list(pool, None).await.unwrap();
    entries
        .iter()
        .map(|(name, unit)| {
            all.iter()
                .find(|i| i.name == *name && i.measurement_unit == *unit)
                .unwrap()
                .id
        })
        .collect()
}

pub async fn seed_tag(pool: &PgPool, name: &str, color: &str, slug: &str) -> i64 {
    let input = CreateTag {
        name: name.to_string(),
        color: Some(color.to_string()),
        slug: Some(slug.to_string()),
    };
    TagRepo::create(pool, &input).await.unwrap().id
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
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
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

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
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

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
