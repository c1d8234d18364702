//! Notification Gateway - HTTP server for SMS, email and push dispatch.

use std::net::SocketAddr;
use std::sync::Arc;

use color_eyre::eyre::WrapErr as _;
use tower_http::trace::TraceLayer;

use notify_channels::{SendGridEmail, TwilioSms};
use notify_gateway::GatewayConfig;
use notify_http::PushState;
use notify_push::{ExpoRelay, PushService};
use notify_storage::MemoryTokenStore;

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    match dotenvy::dotenv() {
        Err(e) if !e.not_found() => return Err(e).wrap_err("failed to read .env file"),
        _ => {}
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("notify-gateway starting");

    let config = GatewayConfig::from_env().wrap_err("invalid configuration")?;

    let sms = TwilioSms::new(config.twilio.clone(), config.provider_timeout)
        .wrap_err("failed to create SMS client")?;
    let email = SendGridEmail::new(config.sendgrid.clone(), config.provider_timeout)
        .wrap_err("failed to create email client")?;
    let relay = ExpoRelay::with_base_url(
        config.expo_api_url.clone(),
        config.expo_access_token.clone(),
        config.provider_timeout,
    )
    .wrap_err("failed to create push relay client")?;

    let push = PushState::new(PushService::new(relay), MemoryTokenStore::new());

    let app = notify_http::app(Arc::new(sms), Arc::new(email), push)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err("failed to bind")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server error")?;

    tracing::info!("notify-gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
