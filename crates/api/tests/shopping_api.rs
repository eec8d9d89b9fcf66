//! HTTP-level integration tests for favorites, the shopping cart, and the
//! shopping list download.

mod common;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use common::{
    body_json, body_text, build_test_app, create_user, delete_auth, get, get_auth,
    post_auth, post_json_auth, seed_ingredients, seed_tag, TestUser,
};
use serde_json::json;
use sqlx::PgPool;

async fn create_recipe(
    pool: &PgPool,
    author: &TestUser,
    name: &str,
    tag: i64,
    ingredients: &[(i64, i64)],
) -> i64 {
    let body = json!({
        "name": name,
        "text": "Готовить до готовности.",
        "cooking_time": 15,
        "tags": [tag],
        "ingredients": ingredients
            .iter()
            .map(|(id, amount)| json!({ "id": id, "amount": amount }))
            .collect::<Vec<_>>(),
    });
    let response =
        post_json_auth(build_test_app(pool.clone()), "/api/recipes", body, &author.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Test: favorites
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_favorite_is_get_or_create(pool: PgPool) {
    let user = create_user(&pool, "fan").await;
    let ids = seed_ingredients(&pool, &[("Кофе", "г")]).await;
    let tag = seed_tag(&pool, "Напитки", "#663300", "drinks").await;
    let recipe = create_recipe(&pool, &user, "Эспрессо", tag, &[(ids[0], 9)]).await;
    let uri = format!("/api/recipes/{recipe}/favorite");

    let response = post_auth(build_test_app(pool.clone()), &uri, &user.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], recipe);
    assert_eq!(json["data"]["name"], "Эспрессо");
    assert_eq!(json["data"]["cooking_time"], 15);
    assert!(json["data"].get("text").is_none(), "short form only");

    let response = post_auth(build_test_app(pool.clone()), &uri, &user.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "ALREADY_EXISTS");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let view = body_json(
        get_auth(
            build_test_app(pool.clone()),
            &format!("/api/recipes/{recipe}"),
            &user.token,
        )
        .await,
    )
    .await;
    assert_eq!(view["data"]["is_favorited"], true);
    assert_eq!(view["data"]["is_in_shopping_cart"], false);

    let response = delete_auth(build_test_app(pool.clone()), &uri, &user.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(build_test_app(pool), &uri, &user.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_missing_recipe_is_404(pool: PgPool) {
    let user = create_user(&pool, "lost").await;
    let response = post_auth(
        build_test_app(pool.clone()),
        "/api/recipes/999999/shopping_cart",
        &user.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(
        build_test_app(pool),
        "/api/recipes/999999/favorite",
        &user.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: shopping list download
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_download_shopping_cart_aggregates(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let shopper = create_user(&pool, "shopper").await;
    let ids = seed_ingredients(
        &pool,
        &[("Соль", "г"), ("Сахар", "г"), ("Молоко", "мл"), ("Молоко", "стакан")],
    )
    .await;
    let (salt, sugar, milk_ml, milk_cup) = (ids[0], ids[1], ids[2], ids[3]);
    let tag = seed_tag(&pool, "Разное", "#123456", "misc").await;

    let soup = create_recipe(&pool, &author, "Суп", tag, &[(salt, 10), (milk_ml, 200)]).await;
    let pie = create_recipe(
        &pool,
        &author,
        "Пирог",
        tag,
        &[(sugar, 5), (salt, 15), (milk_cup, 1)],
    )
    .await;

    for recipe in [soup, pie] {
        let uri = format!("/api/recipes/{recipe}/shopping_cart");
        let response = post_auth(build_test_app(pool.clone()), &uri, &shopper.token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/recipes/download_shopping_cart",
        &shopper.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=shopping_list.txt"
    );

    let text = body_text(response).await;
    assert_eq!(
        text,
        "СПИСОК ПОКУПОК:\n\
         - Молоко (мл): 200 \n\
         - Молоко (стакан): 1 \n\
         - Сахар (г): 5 \n\
         - Соль (г): 25 \n"
    );

    // Rendering is a pure read: a second download is identical.
    let again = body_text(
        get_auth(
            build_test_app(pool.clone()),
            "/api/recipes/download_shopping_cart",
            &shopper.token,
        )
        .await,
    )
    .await;
    assert_eq!(again, text);

    // The author has an empty cart.
    let empty = body_text(
        get_auth(
            build_test_app(pool),
            "/api/recipes/download_shopping_cart",
            &author.token,
        )
        .await,
    )
    .await;
    assert_eq!(empty, "СПИСОК ПОКУПОК:\n");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_download_requires_auth(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/recipes/download_shopping_cart").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
