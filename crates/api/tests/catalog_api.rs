//! HTTP-level integration tests for tags, ingredients, and the health probe.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_admin, create_user, delete_auth, get, patch_json_auth,
    post_json, post_json_auth, seed_ingredients, seed_tag,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: tags
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_writes_require_admin(pool: PgPool) {
    let body = json!({ "name": "Завтрак", "color": "#E26C2D", "slug": "breakfast" });

    let response = post_json(build_test_app(pool.clone()), "/api/tags", body.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let user = create_user(&pool, "cook").await;
    let response =
        post_json_auth(build_test_app(pool.clone()), "/api/tags", body.clone(), &user.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = create_admin(&pool, "boss").await;
    let response =
        post_json_auth(build_test_app(pool.clone()), "/api/tags", body.clone(), &admin.token)
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "breakfast");
    let id = json["data"]["id"].as_i64().unwrap();

    let response =
        post_json_auth(build_test_app(pool.clone()), "/api/tags", body, &admin.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "ALREADY_EXISTS");

    let response = patch_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/tags/{id}"),
        json!({ "name": "Поздний завтрак" }),
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Поздний завтрак");
    assert_eq!(json["data"]["color"], "#E26C2D");

    let response =
        delete_auth(build_test_app(pool.clone()), &format!("/api/tags/{id}"), &admin.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(pool), &format!("/api/tags/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_rejects_bad_color_and_slug(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/tags",
        json!({ "name": "Ужин", "color": "orange", "slug": "dinner" }),
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json_auth(
        build_test_app(pool),
        "/api/tags",
        json!({ "name": "Ужин", "color": "#123456", "slug": "ужин вечером" }),
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_tags_is_public(pool: PgPool) {
    seed_tag(&pool, "Обед", "#49B64E", "lunch").await;
    seed_tag(&pool, "Ужин", "#8775D2", "dinner").await;

    let response = get(build_test_app(pool), "/api/tags").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let slugs: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs.len(), 2);
    assert!(slugs.contains(&"lunch"));
    assert!(slugs.contains(&"dinner"));
}

// ---------------------------------------------------------------------------
// Test: ingredients
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingredient_prefix_search(pool: PgPool) {
    let ids = seed_ingredients(
        &pool,
        &[("Apple", "pcs"), ("apricot", "g"), ("Banana", "pcs")],
    )
    .await;

    let json = body_json(get(build_test_app(pool.clone()), "/api/ingredients?name=ap").await).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Apple", "apricot"]);

    let json = body_json(get(build_test_app(pool.clone()), "/api/ingredients").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/ingredients/{}", ids[2]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Banana");
    assert_eq!(json["data"]["measurement_unit"], "pcs");

    let response = get(build_test_app(pool), "/api/ingredients/424242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_database(pool: PgPool) {
    let response = get(build_test_app(pool), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
