//! Notification HTTP Layer
//!
//! Axum handlers for SMS, email and push notification endpoints.

mod handlers;
mod middleware;
mod push;

pub use handlers::*;
pub use middleware::*;
pub use push::*;

use std::sync::Arc;

use axum::Router;
use axum::routing::post;
use tower_http::cors::CorsLayer;

use notify_channels::{EmailSender, SmsSender};
use notify_push::PushRelay;
use notify_storage::TokenStore;

/// Mount point of the notification API.
pub const API_PREFIX: &str = "/api/notifications";

/// Create the SMS router.
pub fn sms_router<S>(sender: Arc<S>) -> Router
where
    S: SmsSender + 'static,
{
    Router::new()
        .route("/sms", post(handlers::send_sms::<S>))
        .with_state(sender)
}

/// Create the email router.
pub fn email_router<E>(sender: Arc<E>) -> Router
where
    E: EmailSender + 'static,
{
    Router::new()
        .route("/email", post(handlers::send_email::<E>))
        .with_state(sender)
}

/// Create the push router.
pub fn push_router<R, T>(state: PushState<R, T>) -> Router
where
    R: PushRelay + 'static,
    T: TokenStore + Clone + 'static,
{
    Router::new()
        .route("/push", post(push::send_push::<R, T>))
        .route("/push/register", post(push::register_token::<R, T>))
        .route("/push/receipts", post(push::check_receipts::<R, T>))
        .with_state(state)
}

/// Create the full notification application.
///
/// Unknown routes and unsupported methods answer 404.
pub fn app<S, E, R, T>(sms: Arc<S>, email: Arc<E>, push: PushState<R, T>) -> Router
where
    S: SmsSender + 'static,
    E: EmailSender + 'static,
    R: PushRelay + 'static,
    T: TokenStore + Clone + 'static,
{
    let notifications = Router::new()
        .merge(sms_router(sms))
        .merge(email_router(email))
        .merge(push_router(push))
        .method_not_allowed_fallback(handlers::not_found);

    Router::new()
        .nest(API_PREFIX, notifications)
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(CorsLayer::permissive())
}
