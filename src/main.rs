use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zk_password_auth::{
    api::{create_router, AppState},
    config::Config,
    crypto::VerificationKeyStore,
    error::AppError,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,zk_password_auth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting ZK password authentication server v{}...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded");

    // No key, no service: refuse to start rather than serve unverifiable requests.
    let keys = VerificationKeyStore::load(&config.verification_key_path).map_err(|e| {
        tracing::error!("❌ Failed to load verification key: {}", e);
        e
    })?;
    tracing::info!(
        "✅ Verification key loaded from {} ({} public signals)",
        config.verification_key_path.display(),
        keys.n_public()
    );

    let addr = config.server_address();
    let app = create_router(AppState::new(keys, config));

    tracing::info!("🔒 Server listening on http://{}", addr);
    tracing::info!("🏥 Health check: http://{}/health", addr);
    tracing::info!("🔑 Authentication endpoint: http://{}/authenticate", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
