//! Direct Notification Channels
//!
//! SMS and email delivery through third-party provider APIs.

mod email;
mod error;
mod sms;
mod traits;

pub use email::*;
pub use error::*;
pub use sms::*;
pub use traits::*;
