//! One-shot ingredient catalog import.
//!
//! Usage: `foodgram-loader [path/to/ingredients.csv]`
//!
//! The path falls back to `INGREDIENTS_CSV`, then `./data/ingredients.csv`.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use foodgram_core::ingredient_catalog::parse_catalog;
use foodgram_db::repositories::IngredientRepo;

const DEFAULT_CATALOG_PATH: &str = "./data/ingredients.csv";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodgram_loader=info,foodgram_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("INGREDIENTS_CSV").ok())
        .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string());

    let text = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read ingredient catalog {path}"))?;
    let entries =
        parse_catalog(&text).with_context(|| format!("invalid ingredient catalog {path}"))?;
    tracing::info!(%path, entries = entries.len(), "Parsed ingredient catalog");

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = foodgram_db::create_pool(&database_url)
        .await
        .context("failed to connect to database")?;
    foodgram_db::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let result = IngredientRepo::import_catalog(&pool, &entries)
        .await
        .context("ingredient import failed")?;

    tracing::info!(
        inserted = result.inserted,
        already_present = result.already_present,
        "Ingredient catalog loaded",
    );

    pool.close().await;
    Ok(())
}
