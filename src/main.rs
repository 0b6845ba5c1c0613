use price_predictor::{router, AppConfig, AppState, Resources};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "price_predictor=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        model = %config.model_path.display(),
        data = %config.data_path.display(),
        "configuration loaded"
    );

    // Missing resources leave the server up in degraded mode.
    let resources = Resources::load(&config);
    let state = AppState::new(resources, config.log_features)?;
    if !state.service.is_ready() {
        tracing::warn!("starting without a model; /predict will report it unavailable");
    }

    let app = router(state);

    let addr = config.bind_addr();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
