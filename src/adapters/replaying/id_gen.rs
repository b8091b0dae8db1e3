//! Replaying adapter for the `IdGenerator` port.

use std::sync::{Mutex, PoisonError};

use crate::cassette::format::Port;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::id_gen::IdGenerator;

/// Replays recorded IDs from a cassette.
pub struct ReplayingIdGenerator {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingIdGenerator {
    /// Creates a new replaying ID generator from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl IdGenerator for ReplayingIdGenerator {
    fn new_instance_id(&self) -> String {
        let mut replayer = self.replayer.lock().unwrap_or_else(PoisonError::into_inner);
        let output = &replayer.next_interaction(Port::IdGen.as_str(), "new_instance_id").output;
        output.as_str().expect("id_gen::new_instance_id: expected string output").to_string()
    }
}
