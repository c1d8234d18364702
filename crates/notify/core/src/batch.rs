//! Order-preserving batching.

use std::num::NonZeroUsize;

/// Maximum number of messages the relay accepts in one send request.
pub const SEND_BATCH_LIMIT: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// Maximum number of receipt ids the relay accepts in one receipt query.
pub const RECEIPT_BATCH_LIMIT: NonZeroUsize = NonZeroUsize::new(300).unwrap();

/// Maximum number of relay requests in flight for one operation.
pub const MAX_CONCURRENT_REQUESTS: NonZeroUsize = NonZeroUsize::new(6).unwrap();

/// Split `items` into the fewest batches of at most `max_size` elements.
///
/// Concatenating the batches yields `items` in the original order. An empty
/// input produces no batches.
pub fn partition<T: Clone>(items: &[T], max_size: NonZeroUsize) -> Vec<Vec<T>> {
    items
        .chunks(max_size.get())
        .map(<[T]>::to_vec)
        .collect()
}
