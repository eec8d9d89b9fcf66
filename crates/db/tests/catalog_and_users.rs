//! Integration tests for reference data and social graph repositories:
//! - Ingredient catalog import is idempotent
//! - Ingredient prefix search
//! - Tag CRUD and missing-id detection
//! - Subscriptions and viewer-aware profiles

use foodgram_core::ingredient_catalog::CatalogEntry;
use foodgram_db::models::tag::{CreateTag, UpdateTag};
use foodgram_db::models::user::CreateUser;
use foodgram_db::repositories::{IngredientRepo, SubscriptionRepo, TagRepo, UserRepo};
use sqlx::PgPool;

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

// ---------------------------------------------------------------------------
// Test: ingredient catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_catalog_import_is_idempotent(pool: PgPool) {
    let entries = vec![
        CatalogEntry::new("apple", "pcs"),
        CatalogEntry::new("apple juice", "ml"),
        CatalogEntry::new("apple", "g"),
    ];

    let first = IngredientRepo::import_catalog(&pool, &entries).await.unwrap();
    assert_eq!(first.inserted, 3);
    assert_eq!(first.already_present, 0);

    let second = IngredientRepo::import_catalog(&pool, &entries).await.unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(second.already_present, 3);

    assert_eq!(IngredientRepo::list(&pool, None).await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingredient_prefix_search(pool: PgPool) {
    let entries = vec![
        CatalogEntry::new("Apple", "pcs"),
        CatalogEntry::new("apricot", "pcs"),
        CatalogEntry::new("pineapple", "pcs"),
        CatalogEntry::new("100% juice", "ml"),
    ];
    IngredientRepo::import_catalog(&pool, &entries).await.unwrap();

    let found = IngredientRepo::list(&pool, Some("AP")).await.unwrap();
    let names: Vec<&str> = found.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Apple", "apricot"], "prefix match, not substring");

    let literal = IngredientRepo::list(&pool, Some("100%")).await.unwrap();
    assert_eq!(literal.len(), 1);
    let wildcard = IngredientRepo::list(&pool, Some("%")).await.unwrap();
    assert!(wildcard.is_empty(), "`%` must match literally");

    let all = IngredientRepo::list(&pool, Some("   ")).await.unwrap();
    assert_eq!(all.len(), 4, "blank filter lists everything");

    let id = found[0].id;
    let missing = IngredientRepo::find_missing(&pool, &[999_999, id, 999_998])
        .await
        .unwrap();
    assert_eq!(missing, vec![999_999, 999_998]);
}

// ---------------------------------------------------------------------------
// Test: tags
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_crud(pool: PgPool) {
    let created = TagRepo::create(
        &pool,
        &CreateTag {
            name: "Lunch".to_string(),
            color: Some("#49B64E".to_string()),
            slug: Some("lunch".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(created.slug.as_deref(), Some("lunch"));

    let updated = TagRepo::update(
        &pool,
        created.id,
        &UpdateTag {
            name: Some("Late lunch".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("tag should exist");
    assert_eq!(updated.name, "Late lunch");
    assert_eq!(updated.color.as_deref(), Some("#49B64E"), "color unchanged");

    let missing = TagRepo::find_missing(&pool, &[created.id, 424_242]).await.unwrap();
    assert_eq!(missing, vec![424_242]);

    assert!(TagRepo::delete(&pool, created.id).await.unwrap());
    assert!(TagRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
    assert!(!TagRepo::delete(&pool, created.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_tag_slug_violates_unique_constraint(pool: PgPool) {
    let tag = |name: &str, color: &str| CreateTag {
        name: name.to_string(),
        color: Some(color.to_string()),
        slug: Some("same".to_string()),
    };
    TagRepo::create(&pool, &tag("One", "#000001")).await.unwrap();
    let err = TagRepo::create(&pool, &tag("Two", "#000002")).await.unwrap_err();

    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("uq_tags_slug"));
}

// ---------------------------------------------------------------------------
// Test: subscriptions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subscriptions(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let reader = create_user(&pool, "reader").await;

    assert!(SubscriptionRepo::subscribe(&pool, author, reader).await.unwrap());
    assert!(!SubscriptionRepo::subscribe(&pool, author, reader).await.unwrap());

    let authors = SubscriptionRepo::list_authors(&pool, reader, 10, 0).await.unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].id, author);
    assert!(authors[0].is_subscribed);
    assert_eq!(SubscriptionRepo::count_authors(&pool, reader).await.unwrap(), 1);

    let seen_by_reader = UserRepo::find_profile(&pool, author, Some(reader))
        .await
        .unwrap()
        .unwrap();
    assert!(seen_by_reader.is_subscribed);
    let seen_anonymously = UserRepo::find_profile(&pool, author, None)
        .await
        .unwrap()
        .unwrap();
    assert!(!seen_anonymously.is_subscribed);

    assert!(SubscriptionRepo::unsubscribe(&pool, author, reader).await.unwrap());
    assert!(!SubscriptionRepo::unsubscribe(&pool, author, reader).await.unwrap());
    assert_eq!(SubscriptionRepo::count_authors(&pool, reader).await.unwrap(), 0);
}
