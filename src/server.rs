//! Reusable server runtime.
//!
//! [`ServerHandle`] owns the whole lifecycle: storage init, migrations,
//! REST API and graceful shutdown.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::{AdminCredentials, AuthGate};
use crate::config::AppConfig;
use crate::domain::TariffPlanRepository;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, InMemoryTariffPlanRepository, SeaOrmTariffPlanRepository};
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running tariff service.
///
/// ```rust,no_run
/// use tariff_admin::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repo: Arc<dyn TariffPlanRepository>,
    pub config: AppConfig,
    /// Actual bound address (port 0 in config resolves here)
    pub local_addr: std::net::SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        info!("Starting tariff service...");
        for warning in app_cfg.warnings() {
            warn!("{}", warning);
        }

        // ── Storage ────────────────────────────────────────────
        let (repo, db): (Arc<dyn TariffPlanRepository>, Option<DatabaseConnection>) =
            if app_cfg.database.is_memory() {
                info!("Using in-memory tariff plan storage");
                (Arc::new(InMemoryTariffPlanRepository::new()), None)
            } else {
                let db = init_database(&app_cfg.database.connection_config()).await?;
                if opts.auto_migrate {
                    info!("Running database migrations...");
                    Migrator::up(&db, None).await?;
                    info!("Migrations completed");
                }
                (Arc::new(SeaOrmTariffPlanRepository::new(db.clone())), Some(db))
            };

        // ── Auth gate ──────────────────────────────────────────
        let admin = match &app_cfg.admin.password {
            Some(password) => {
                let username = app_cfg.admin.username.clone();
                let password = password.clone();
                let creds = tokio::task::spawn_blocking(move || {
                    AdminCredentials::new(username, &password)
                })
                .await??;
                Some(creds)
            }
            None => None,
        };
        let jwt_config = app_cfg.security.jwt_config();
        info!(
            expiration_hours = jwt_config.expiration_hours,
            api_keys = app_cfg.security.api_key_hashes.len(),
            admin_login = admin.is_some(),
            "Auth gate configured"
        );
        let gate = AuthGate::new(jwt_config, app_cfg.security.api_key_hashes.clone(), admin);

        // ── REST API server ────────────────────────────────────
        let router = create_api_router(AppState::new(repo.clone(), gate));

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let addr = app_cfg.server.address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repo,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for in-flight requests (bounded by `server.shutdown_timeout`),
    /// then close the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        shutdown
            .shutdown_with_cleanup(|| async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
            })
            .await;

        if let Some(db) = db {
            match db.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => warn!("Error closing database connection: {}", e),
            }
        }
        info!("Tariff service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down tariff service...");
        self.trigger_shutdown();
        self.wait().await;
    }
}

/// Initialize tracing (logging) from the application config.
///
/// `RUST_LOG` wins over `logging.level`. Call once per process.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = "memory".into();
        config
    }

    #[tokio::test]
    async fn starts_on_memory_storage_and_shuts_down() {
        let handle = ServerHandle::start(ServerOptions {
            config: memory_config(),
            auto_migrate: false,
        })
        .await
        .unwrap();

        assert!(!handle.api_task.is_finished());
        assert_ne!(handle.local_addr.port(), 0);
        handle.repo.ping().await.unwrap();

        tokio::time::timeout(std::time::Duration::from_secs(10), handle.shutdown())
            .await
            .expect("shutdown should finish");
    }

    #[tokio::test]
    async fn starts_on_sqlite_with_migrations() {
        let mut config = memory_config();
        config.database.url = "sqlite::memory:".into();
        config.database.max_connections = 1;

        let handle = ServerHandle::start(ServerOptions {
            config,
            auto_migrate: true,
        })
        .await
        .unwrap();

        assert!(handle.repo.find_published().await.unwrap().is_empty());
        handle.shutdown().await;
    }
}
