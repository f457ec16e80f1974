use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use doorman::auth::tokens::{TOKEN_SECRET_MIN_BYTES, TokenIssuer};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &doorman::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        bind_addr = %cfg.bind_addr,
        loglevel = %cfg.loglevel,
        token_ttl_days = cfg.token_ttl_days
    );

    // Only the secret's fitness is checked; the value itself stays out of
    // logs and error messages.
    if cfg.token_secret.len() < TOKEN_SECRET_MIN_BYTES {
        return Err(format!(
            "DOORMAN_TOKEN_SECRET must be set to at least {TOKEN_SECRET_MIN_BYTES} bytes"
        )
        .into());
    }

    let store = doorman::db::spawn(&cfg.database_url).await?;
    let issuer = TokenIssuer::new(&cfg.token_secret, cfg.token_ttl_days);

    // Build axum router and serve
    let state = doorman::router::DoormanState::new(store, issuer);
    let app = doorman::router::doorman_router(state);

    let listener = TcpListener::bind(&cfg.bind_addr).await?;
    info!("HTTP server listening on {}", cfg.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
