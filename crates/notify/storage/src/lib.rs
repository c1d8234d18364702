//! Push Token Storage
//!
//! Registry of push tokens per user.

mod memory;
mod traits;

pub use memory::MemoryTokenStore;
pub use traits::*;
