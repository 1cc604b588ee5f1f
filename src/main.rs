use std::sync::Arc;

use cobm::{
    build_router,
    game::{AdminListAuthority, GameRepository, InMemoryGameRepository, PostgresGameRepository},
    AppConfig, AppState, GameService, SessionService, TokenConfig,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cobm=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting channel card game server");

    let config = AppConfig::from_env()?;

    let game_repository: Arc<dyn GameRepository + Send + Sync> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            let repository = PostgresGameRepository::new(pool);
            repository.ensure_schema().await?;
            info!("Using PostgreSQL game store");
            Arc::new(repository)
        }
        None => {
            info!("Using in-memory game store");
            Arc::new(InMemoryGameRepository::new())
        }
    };

    info!(admins = config.admins.len(), "Loaded admin list");
    let authority = Arc::new(AdminListAuthority::new(config.admins.clone()));

    let game_service = Arc::new(GameService::new(game_repository, authority));
    let session_service = Arc::new(SessionService::new(TokenConfig::new(
        config.jwt_secret.clone(),
        config.session_expiration_days,
    )));
    let app = build_router(AppState::new(game_service, session_service));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
