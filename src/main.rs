use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Result;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ediary::application::services::{AccountService, EntryService};
use ediary::domain::services::TokenService;
use ediary::infrastructure::config::{run_migrations, AppConfig};
use ediary::infrastructure::driven::database::{PostgresEntryRepository, PostgresUserRepository};
use ediary::infrastructure::driven::email::WebhookNotifier;
use ediary::infrastructure::driving::web::{diary_routes, AppState};

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting application...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration loaded successfully");

    // Set up database connection pool
    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => {
            info!("Database connection established");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // Run database migrations
    if let Err(e) = run_migrations(&pool).await {
        error!("Failed to run database migrations: {}", e);
        std::process::exit(1);
    }

    // Create shared components
    let db_pool = Arc::new(pool);
    let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
    let entry_repo = Arc::new(PostgresEntryRepository::new(db_pool.clone()));
    let notifier = Arc::new(WebhookNotifier::new(config.mail.clone()));

    let tokens = TokenService::new(
        config.auth.secret_key.clone(),
        Duration::seconds(config.auth.reset_token_expiry_secs),
        Duration::hours(config.auth.session_ttl_hours),
        Duration::days(config.auth.remember_ttl_days),
    );

    let account_service = Arc::new(AccountService::new(
        user_repo.clone(),
        entry_repo.clone(),
        notifier.clone(),
        tokens,
        config.server.public_url.clone(),
    ));
    let entry_service = Arc::new(EntryService::new(entry_repo.clone()));

    let app_state = web::Data::new(AppState {
        accounts: account_service,
        entries: entry_service,
    });

    let server_config = config.server.clone();
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .app_data(app_state.clone())
            .service(diary_routes())
    })
    .bind((server_config.host.clone(), server_config.port))?
    .run();

    info!(
        "Server listening on {}:{}",
        server_config.host, server_config.port
    );

    server.await?;

    info!("Application shutting down");
    Ok(())
}
