use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use token_backend::{
    AppState,
    agora::{AgoraClient, AgoraSigner, TokenSigner},
    cache::AppTokenCache,
    config::Config,
    database::PgUserStore,
    middleware::{RateLimiter, log_errors, rate_limit},
    router::create_router,
};
use tower::ServiceBuilder;
#[cfg(debug_assertions)]
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'token_backend';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client");

    let signer: Arc<dyn TokenSigner> = Arc::new(AgoraSigner::new(&config));
    let state = AppState {
        config: config.clone(),
        users: Arc::new(PgUserStore::new(pool)),
        app_tokens: Arc::new(AppTokenCache::new(signer.clone())),
        signer,
        agora: AgoraClient::from_config(&config).expect("Failed to build HTTP client"),
    };

    let rate_limiter = Arc::new(RateLimiter::new(redis_client, config.clone()));

    let router = create_router(state).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(log_errors))
            .layer(axum::middleware::from_fn_with_state(rate_limiter, rate_limit)),
    );

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding permissive CORS layer for development");
        router.layer(CorsLayer::permissive())
    };

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
