//! Integration tests for favorites, the shopping cart, and the shopping list
//! rows read from the cart.

use foodgram_core::ingredient_catalog::CatalogEntry;
use foodgram_core::recipe::{IngredientAmount, ValidatedRecipe};
use foodgram_core::shopping_list::ShoppingList;
use foodgram_db::models::recipe_mark::MarkKind;
use foodgram_db::models::user::CreateUser;
use foodgram_db::repositories::{IngredientRepo, RecipeMarkRepo, RecipeRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, username: &str) -> i64 {
    let input = CreateUser {
        email: format!("{username}@test.com"),
        username: username.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        role: None,
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

async fn ingredient_id(pool: &PgPool, name: &str) -> i64 {
    IngredientRepo::list(pool, None)
        .await
        .unwrap()
        .into_iter()
        .find(|i| i.name == name)
        .expect("ingredient should be seeded")
        .id
}

async fn create_recipe(pool: &PgPool, author: i64, name: &str, items: &[(i64, i32)]) -> i64 {
    let input = ValidatedRecipe {
        name: name.to_string(),
        text: "Cook it.".to_string(),
        cooking_time: 10,
        image: None,
        tag_ids: vec![],
        ingredients: items
            .iter()
            .map(|&(ingredient_id, amount)| IngredientAmount {
                ingredient_id,
                amount,
            })
            .collect(),
    };
    RecipeRepo::create(pool, author, &input).await.unwrap().id
}

async fn mark_rows(pool: &PgPool, table: &str, user_id: i64) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE user_id = $1"))
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Test: add is get-or-create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_mark_is_reported_not_duplicated(pool: PgPool) {
    let user = create_user(&pool, "marker").await;
    IngredientRepo::import_catalog(&pool, &[CatalogEntry::new("rice", "g")])
        .await
        .unwrap();
    let rice = ingredient_id(&pool, "rice").await;
    let recipe = create_recipe(&pool, user, "Plain rice", &[(rice, 100)]).await;

    for kind in [MarkKind::Favorite, MarkKind::ShoppingCart] {
        assert!(RecipeMarkRepo::add(&pool, kind, user, recipe).await.unwrap());
        assert!(!RecipeMarkRepo::add(&pool, kind, user, recipe).await.unwrap());
        assert_eq!(mark_rows(&pool, kind.table(), user).await, 1);
        assert!(RecipeMarkRepo::exists(&pool, kind, user, recipe).await.unwrap());
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_missing_mark_returns_false(pool: PgPool) {
    let user = create_user(&pool, "remover").await;
    IngredientRepo::import_catalog(&pool, &[CatalogEntry::new("oats", "g")])
        .await
        .unwrap();
    let oats = ingredient_id(&pool, "oats").await;
    let recipe = create_recipe(&pool, user, "Porridge", &[(oats, 50)]).await;

    assert!(!RecipeMarkRepo::remove(&pool, MarkKind::Favorite, user, recipe)
        .await
        .unwrap());

    RecipeMarkRepo::add(&pool, MarkKind::Favorite, user, recipe)
        .await
        .unwrap();
    assert!(RecipeMarkRepo::remove(&pool, MarkKind::Favorite, user, recipe)
        .await
        .unwrap());
    assert!(!RecipeMarkRepo::exists(&pool, MarkKind::Favorite, user, recipe)
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// Test: cart rows feed the shopping list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cart_rows_aggregate_into_shopping_list(pool: PgPool) {
    let user = create_user(&pool, "shopper").await;
    let other = create_user(&pool, "other").await;
    IngredientRepo::import_catalog(
        &pool,
        &[
            CatalogEntry::new("Соль", "г"),
            CatalogEntry::new("Сахар", "г"),
            CatalogEntry::new("Молоко", "мл"),
        ],
    )
    .await
    .unwrap();
    let salt = ingredient_id(&pool, "Соль").await;
    let sugar = ingredient_id(&pool, "Сахар").await;
    let milk = ingredient_id(&pool, "Молоко").await;

    let soup = create_recipe(&pool, other, "Суп", &[(salt, 10), (milk, 200)]).await;
    let cake = create_recipe(&pool, other, "Пирог", &[(sugar, 5), (salt, 15)]).await;
    let ignored = create_recipe(&pool, other, "Каша", &[(milk, 1000)]).await;

    RecipeMarkRepo::add(&pool, MarkKind::ShoppingCart, user, soup)
        .await
        .unwrap();
    RecipeMarkRepo::add(&pool, MarkKind::ShoppingCart, user, cake)
        .await
        .unwrap();
    // Favorites never contribute to the shopping list.
    RecipeMarkRepo::add(&pool, MarkKind::Favorite, user, ignored)
        .await
        .unwrap();

    let rows = RecipeMarkRepo::cart_rows(&pool, user).await.unwrap();
    assert_eq!(rows.len(), 4);

    let list = ShoppingList::aggregate(rows).unwrap();
    assert_eq!(
        list.render(),
        "СПИСОК ПОКУПОК:\n\
         - Молоко (мл): 200 \n\
         - Сахар (г): 5 \n\
         - Соль (г): 25 \n"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_cart_has_no_rows(pool: PgPool) {
    let user = create_user(&pool, "idle").await;
    let rows = RecipeMarkRepo::cart_rows(&pool, user).await.unwrap();
    assert!(rows.is_empty());
    assert_eq!(
        ShoppingList::aggregate(rows).unwrap().render(),
        "СПИСОК ПОКУПОК:\n"
    );
}
