use anyhow::Result;
use org_directory_api::{
    build_router,
    config::Settings,
    database::{fixtures, DbPool, Repository},
    security::ApiTokenValidator,
    services::SearchService,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,org_directory_api=debug".to_string()),
        )
        .with_target(true)
        .json()
        .init();

    info!("Starting organization directory API...");

    let settings = Settings::load()?;
    info!("Configuration loaded");

    let db_pool = DbPool::new(&settings.database).await?;
    let repository = Arc::new(Repository::new(db_pool.clone()));

    repository.ensure_schema().await?;
    if settings.database.seed_fixtures {
        fixtures::load_seed_data(&db_pool).await?;
    }

    let search_service = Arc::new(SearchService::new(repository.clone()));
    let token_validator = Arc::new(ApiTokenValidator::new(
        settings.security.auth_token.clone(),
    ));

    let app = build_router(search_service, token_validator, repository);

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
