//! OrçamentosOnline API server binary

use orcamentos_api::{api, auth, core, db};

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (handles CLI args, env vars, and config file)
    let config = match core::config::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Print error to stderr since logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging system based on configuration
    let _logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Err(e.into());
        }
    };

    // Development gets full 500 detail in response bodies
    core::error::set_verbose_errors(config.server.is_development());

    info!("Configuration loaded successfully");
    info!("Starting OrçamentosOnline API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = config.server.port,
        environment = %config.server.environment,
        "Server configuration"
    );

    // Ensure the database directory exists
    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating database directory: {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
    }

    // Initialize database
    info!("Initializing database...");
    let db = Arc::new(db::DatabaseManager::new(
        &config.database.path,
        config.database.connection_pool_size as u32,
        std::time::Duration::from_millis(config.database.busy_timeout),
    )?);
    info!("Running database migrations...");
    db.migrate()?;
    info!("Database initialized successfully");

    // Ensure the demo account exists
    ensure_demo_user(db.clone(), config.security.bcrypt_cost).await?;

    // Connect to the cache if one is configured; the service runs without it
    let cache = match &config.cache.url {
        Some(url) => match orcamentos_api::cache::CacheClient::connect(url).await {
            Ok(client) => {
                info!("Cache connected");
                Some(client)
            }
            Err(e) => {
                tracing::warn!("Cache unavailable, continuing without it: {}", e);
                None
            }
        },
        None => None,
    };

    // Initialize API server
    info!("Initializing HTTP server...");
    let server_url = format!("http://{}:{}", config.server.host, config.server.port);
    let server = api::ApiServer::new(config, db, cache);

    info!(url = %server_url, "Server ready - starting to serve requests");

    // Start serving (this will block until shutdown signal)
    server.serve().await?;

    Ok(())
}

/// Seed the demo account so the documented demo credentials work against the
/// same lookup-and-verify path as any other user.
async fn ensure_demo_user(db: Arc<db::DatabaseManager>, bcrypt_cost: u32) -> Result<()> {
    use orcamentos_api::db::models::User;
    use orcamentos_api::db::repository::UserRepository;
    use uuid::Uuid;

    const DEMO_EMAIL: &str = "demo@orcamentos.com";

    let user_repo = UserRepository::new(db);
    if user_repo.find_by_email(DEMO_EMAIL).await?.is_some() {
        return Ok(());
    }

    info!("Creating demo user...");
    let password_hash = auth::password::hash_password("demo123", bcrypt_cost)?;
    let demo_user = User {
        id: Uuid::new_v4().to_string(),
        name: "Demo User".to_string(),
        email: DEMO_EMAIL.to_string(),
        phone: "(11) 99999-9999".to_string(),
        password_hash,
        role: "admin".to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    user_repo.create(&demo_user).await?;
    info!("Demo user created: email='{}', password='demo123'", DEMO_EMAIL);

    Ok(())
}
