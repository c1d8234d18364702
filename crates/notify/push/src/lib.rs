//! Push Notifications
//!
//! Batched push delivery through a push relay, plus receipt reconciliation.

mod error;
mod expo;
mod service;
mod traits;

pub use error::*;
pub use expo::*;
pub use service::*;
pub use traits::*;
