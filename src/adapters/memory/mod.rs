//! In-process adapters for tests and embedding.
//!
//! [`MemoryRecordStore`] mirrors the live store's semantics (directory
//! creation fills in missing ancestors and refuses to pass through a
//! record, record creation is exclusive) and can be told to fail
//! specific operations or to lose a creation race, which the live
//! filesystem cannot do on demand.

mod id_gen;
mod store;

pub use id_gen::SequenceIdGenerator;
pub use store::{MemoryRecordStore, StoreOp};
