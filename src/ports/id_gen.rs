//! Source of fresh instance IDs.

/// Mints the ID written into a new identity record.
///
/// Each call must return a value never returned before, in the hyphenated
/// 8-4-4-4-12 UUID form. Replaying contexts substitute a recorded sequence.
pub trait IdGenerator: Send + Sync {
    /// Returns an unused instance ID.
    fn new_instance_id(&self) -> String;
}
