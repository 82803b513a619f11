use std::sync::Arc;

use anyhow::Context;
use auth::Authenticator;
use marketplace_service::config::Config;
use marketplace_service::domain::product::service::ProductService;
use marketplace_service::domain::user::models::EmailAddress;
use marketplace_service::domain::user::service::UserService;
use marketplace_service::inbound::http::router::create_router;
use marketplace_service::outbound::repositories::InMemoryProductRepository;
use marketplace_service::outbound::repositories::InMemoryUserRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketplace_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "marketplace-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    // A missing jwt.secret fails here, before anything binds.
    let config = Config::load().context("configuration is incomplete")?;

    tracing::info!(
        http_port = config.server.http_port,
        admin_bootstrap = config.admin.enabled,
        "Configuration loaded"
    );

    let user_repository = Arc::new(InMemoryUserRepository::new());
    let product_repository = Arc::new(InMemoryProductRepository::new());

    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes()));
    let user_service = Arc::new(UserService::new(Arc::clone(&user_repository)));
    let product_service = Arc::new(ProductService::new(
        product_repository,
        Arc::clone(&user_repository),
    ));

    if config.admin.enabled {
        let email = config
            .admin
            .email
            .as_deref()
            .filter(|value| !value.is_empty())
            .context("admin.email and admin.password_hash must be set")?;
        let password_hash = config
            .admin
            .password_hash
            .as_deref()
            .filter(|value| !value.is_empty())
            .context("admin.email and admin.password_hash must be set")?;

        let email = EmailAddress::new(email.to_string())
            .map_err(|e| anyhow::anyhow!("admin.email is invalid: {e}"))?;
        user_service
            .ensure_admin(&email, password_hash)
            .await
            .map_err(|e| anyhow::anyhow!("admin bootstrap failed: {e}"))?;
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(user_service, product_service, authenticator);
    axum::serve(http_listener, application).await?;

    Ok(())
}
