use tracing::{error, info, warn};

use feedlist::config::Config;
use feedlist::{Database, NewUser, UserRepository, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = feedlist::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        feedlist::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("feedlist {}", env!("CARGO_PKG_VERSION"));

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = ensure_default_user(&db, &config).await {
        warn!("Failed to create default user: {}", e);
    }

    let server = match WebServer::new(&config, db) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!("Server configured on {}", server.addr());

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}

/// Create the configured default user on first start.
async fn ensure_default_user(db: &Database, config: &Config) -> feedlist::Result<()> {
    if config.web.default_user.is_empty() {
        return Ok(());
    }

    let users = UserRepository::new(db.pool());
    if users.get_by_username(&config.web.default_user).await?.is_none() {
        let user = NewUser::new(&config.web.default_user).with_defaults(&config.reading);
        users.create(&user).await?;
        info!("Created default user {}", config.web.default_user);
    }
    Ok(())
}
