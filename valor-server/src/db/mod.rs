//! Database Module
//!
//! Embedded SurrealDB on the RocksDB engine

pub mod models;
pub mod repository;

use shared::error::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Unique `user.email` and `order.order_code`, plus the per-user order lookup
const SCHEMA: &str = r#"
    DEFINE INDEX IF NOT EXISTS user_email ON TABLE user FIELDS email UNIQUE;
    DEFINE INDEX IF NOT EXISTS order_code ON TABLE `order` FIELDS order_code UNIQUE;
    DEFINE INDEX IF NOT EXISTS order_user ON TABLE `order` FIELDS user;
"#;

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB directory and select namespace/database
    pub async fn new(db_path: &str, namespace: &str, database: &str) -> Result<Self, AppError> {
        if let Some(parent) = std::path::Path::new(db_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::database(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::from_connection(db, namespace, database).await
    }

    /// Finish setup of an already opened handle (tests open their own temp dirs)
    pub async fn from_connection(
        db: Surreal<Db>,
        namespace: &str,
        database: &str,
    ) -> Result<Self, AppError> {
        db.use_ns(namespace)
            .use_db(database)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        tracing::info!(namespace, database, "Database connection established (SurrealDB RocksDB)");

        Ok(Self { db })
    }
}
