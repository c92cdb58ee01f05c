use corporate_cms::{
    AppState, HttpMailer, MailerState, S3StorageClient, StorageState,
    config::{AppConfig, Env},
    create_router, newsletter,
    repository::{PostgresRepository, RepositoryState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Entry point: configuration, logging, database, storage, mailer, the
/// newsletter scheduler, and finally the HTTP server.
#[tokio::main]
async fn main() {
    // Configuration first, fail-fast: a missing production secret stops the
    // process here.
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // RUST_LOG wins; otherwise sensible defaults for development.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "corporate_cms=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            // Pretty output for humans.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON output for the log aggregator.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("FATAL: Database migration failed.");

    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    let s3_client = S3StorageClient::new(
        &config.s3_endpoint,
        &config.s3_region,
        &config.s3_key,
        &config.s3_secret,
        &config.s3_bucket,
    )
    .await;

    // LOCAL-ONLY: provision the MinIO bucket for the Dockerized setup.
    if config.env == Env::Local {
        use corporate_cms::storage::StorageService;
        s3_client.ensure_bucket_exists().await;
    }
    let storage = Arc::new(s3_client) as StorageState;

    let mailer = Arc::new(HttpMailer::new(
        &config.mail_api_url,
        &config.mail_api_key,
        &config.mail_from,
    )) as MailerState;

    let app_state = AppState {
        repo,
        storage,
        mailer,
        config,
    };

    // Weekly and monthly newsletter digests run as background tasks.
    newsletter::spawn_digest_scheduler(app_state.clone());

    let app = create_router(app_state);

    let listener = TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("FATAL: Failed to bind 0.0.0.0:3000");

    tracing::info!("Listening on 0.0.0.0:3000");
    tracing::info!("API documentation available at http://localhost:3000/swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated");
}
