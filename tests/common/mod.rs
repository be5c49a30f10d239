#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::env;

use investment_board::config::AppConfig;
use investment_board::models::investment::{AnalysisPoint, NewItem};
use investment_board::services::item_repository::ItemRepository;
use investment_board::{build_router, AppState};

pub const TEST_PASSWORD: &str = "correct horse";

/// Set up a migrated test database.
/// Uses TEST_DATABASE_URL or falls back to a private in-memory SQLite db.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let database_url =
        env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

    // A single connection keeps every query on the same in-memory database
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn setup_repository() -> ItemRepository {
    let db = setup_test_db().await.expect("Failed to set up test DB");
    ItemRepository::new(db)
}

pub async fn setup_state() -> AppState {
    let db = setup_test_db().await.expect("Failed to set up test DB");
    let config = AppConfig {
        app_password: TEST_PASSWORD.to_string(),
        body_limit_bytes: 1024 * 1024,
        ..AppConfig::default()
    };
    AppState::new(db, config)
}

pub async fn setup_router() -> axum::Router {
    build_router(setup_state().await)
}

pub fn gold_idea() -> NewItem {
    NewItem {
        instrument: "Gold".to_string(),
        analysis_points: vec![AnalysisPoint::new("Breakout", "trend")],
        follow_up_date: "2026-03-01".to_string(),
        follow_up_time: "14:00".to_string(),
        image: None,
    }
}

pub fn idea(instrument: &str) -> NewItem {
    NewItem {
        instrument: instrument.to_string(),
        ..gold_idea()
    }
}

/// creationDate has millisecond resolution; keep creates apart so ordering is stable
pub async fn tick() {
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setup_test_db() {
        let db = setup_test_db().await;
        assert!(db.is_ok(), "Test database setup should succeed");
    }
}
