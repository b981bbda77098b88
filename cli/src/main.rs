//! Tariff service CLI server
//!
//! ```sh
//! # Run with default config (~/.config/tariff-service/config.toml)
//! tariff-service
//!
//! # Custom config path and port
//! tariff-service --config /etc/tariff-service/config.toml --port 8081
//!
//! # Validate config without starting
//! tariff-service --check
//!
//! # Mint an API key for an integration
//! tariff-service generate-api-key "CRM sync"
//! ```

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use tariff_admin::config::{AppConfig, ConfigError};
use tariff_admin::infrastructure::crypto::api_key::generate_api_key;
use tariff_admin::server::{init_tracing, ServerHandle, ServerOptions};

/// Tariff plan administration service
#[derive(Parser, Debug)]
#[command(
    name = "tariff-service",
    version,
    about = "Public tariff catalogue and authenticated tariff plan management API",
    long_about = "REST API serving published tariff plans to the site and CRUD \
                  endpoints to the back office.\n\n\
                  Default config: ~/.config/tariff-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "TARIFF_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new API key and print the hash for `security.api_key_hashes`.
    GenerateApiKey {
        /// Label embedded in the key, e.g. the integration name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::GenerateApiKey { name }) = &cli.command {
        let generated = generate_api_key(name);
        println!("API key (shown once): {}", generated.key);
        println!("Prefix              : {}", generated.prefix);
        println!();
        println!("Add to [security] in config.toml:");
        println!("api_key_hashes = [\"{}\"]", generated.key_hash);
        return Ok(());
    }

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(tariff_admin::default_config_path);

    let loaded = AppConfig::load(&config_path);
    if cli.check {
        return check(&config_path, loaded);
    }

    let mut config = match loaded {
        Ok(cfg) => cfg,
        Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            eprintln!("No config at {}, using defaults.", config_path.display());
            let mut cfg = AppConfig::default();
            cfg.apply_env_overrides();
            cfg.validate()?;
            cfg
        }
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config);
    info!("Configuration: {}", config_path.display());

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}

fn check(
    path: &std::path::Path,
    loaded: Result<AppConfig, ConfigError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = loaded?;
    println!("Configuration is valid");
    println!("   Config file : {}", path.display());
    println!("   Address     : {}", config.server.address());
    println!("   Database    : {}", config.database.url);
    println!("   API keys    : {}", config.security.api_key_hashes.len());
    println!("   Admin login : {}", if config.admin.password.is_some() { "enabled" } else { "disabled" });
    println!("   Log level   : {} ({})", config.logging.level, config.logging.format);
    for warning in config.warnings() {
        println!("   warning     : {}", warning);
    }
    Ok(())
}
