//! Random instance IDs.

use uuid::Uuid;

use crate::ports::IdGenerator;

/// Mints random (v4) UUIDs, lowercase and hyphenated.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveIdGenerator;

impl IdGenerator for LiveIdGenerator {
    fn new_instance_id(&self) -> String {
        let mut buf = Uuid::encode_buffer();
        Uuid::new_v4().hyphenated().encode_lower(&mut buf).to_owned()
    }
}
