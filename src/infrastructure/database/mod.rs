pub mod entities;
pub mod migrator;
pub mod repositories;

pub use repositories::SeaOrmTariffPlanRepository;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// URL value selecting the in-memory repository instead of a SQL database
pub const MEMORY_DATABASE_URL: &str = "memory";

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL, e.g. `sqlite://./tariffs.db?mode=rwc`
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./tariffs.db?mode=rwc".to_string(),
            max_connections: 10,
        }
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);
    let mut opts = ConnectOptions::new(config.url.clone());
    opts.max_connections(config.max_connections)
        .sqlx_logging(false);
    let db = Database::connect(opts).await?;
    info!("Database connected successfully");
    Ok(db)
}
