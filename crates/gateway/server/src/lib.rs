//! Notification Gateway - SMS, email and push notification dispatch server.

pub mod config;

pub use config::GatewayConfig;
