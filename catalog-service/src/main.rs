use catalog_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing `.env` is fine; real deployments set the environment directly.
    let dotenv_missing = dotenvy::dotenv().is_err();

    let config = Config::load()?;
    init_tracing(&config)?;

    if dotenv_missing {
        debug!("No .env file found");
    }

    let normalizer = ErrorNormalizer::new(config.disclose_diagnostics());
    let state = AppState::new(config.clone(), MemoryRepository::new());
    let app = build_router(state, normalizer);

    info!(
        base_path = %config.service.base_path,
        environment = %config.service.environment,
        "Catalog routes ready"
    );

    Server::new(config).serve(app).await
}
