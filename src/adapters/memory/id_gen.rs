//! Deterministic ID generator.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ports::IdGenerator;

/// Produces UUID-shaped IDs from a counter: `00000000-0000-4000-8000-000000000001`, ...
#[derive(Default)]
pub struct SequenceIdGenerator {
    next: AtomicU64,
}

impl SequenceIdGenerator {
    /// Creates a generator whose first ID ends in `...000000000001`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn new_instance_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        format!("00000000-0000-4000-8000-{n:012}")
    }
}
