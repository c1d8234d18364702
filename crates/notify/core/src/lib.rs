//! Notification Core Types
//!
//! Data model and pure building blocks for the push delivery pipeline:
//! token validation, batching, tickets, receipts and delivery events.

mod batch;
mod event;
mod message;
mod receipt;
mod token;

pub use batch::*;
pub use event::*;
pub use message::*;
pub use receipt::*;
pub use token::*;
