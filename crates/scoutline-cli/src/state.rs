//! Application state wiring the database for CLI commands.
//!
//! Command handlers construct the concrete repositories and the embedder
//! themselves from cheap clones of the pool; AppState only owns the
//! connection and the resolved data directory.

use std::path::PathBuf;

use scoutline_infra::sqlite::pool::DatabasePool;

/// Shared application state for CLI commands.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabasePool,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: resolve the data directory,
    /// connect to the database, run migrations.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("scoutline.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        Ok(Self { db_pool, data_dir })
    }
}

/// Data directory from `SCOUTLINE_DATA_DIR`, falling back to
/// `~/.scoutline`.
fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SCOUTLINE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".scoutline")
}
