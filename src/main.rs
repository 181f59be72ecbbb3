use rusty_bookmanage::{
    adapters::{memory::InMemoryBookRepository, postgres::PostgresBookRepository},
    api::{Messages, handlers::AppState, router::create_router},
    application::book::ServiceDependencies,
    config::{AppConfig, StorageKind},
    ports::BookRepository,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_bookmanage=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize repository
    let book_repository: Arc<dyn BookRepository> = match config.storage {
        StorageKind::Postgres => {
            tracing::info!("Database URL: {}", config.database_url);

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await
                .expect("Failed to connect to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            Arc::new(PostgresBookRepository::new(pool))
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory book storage; data is lost on shutdown");
            Arc::new(InMemoryBookRepository::new())
        }
    };

    // Create application state
    let app_state = Arc::new(AppState {
        service_deps: ServiceDependencies { book_repository },
        messages: Messages::new(),
    });

    // Create router
    let app = create_router(app_state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
