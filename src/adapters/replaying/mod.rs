//! Replaying adapters that serve recorded interactions.

pub mod id_gen;
pub mod store;

pub use id_gen::ReplayingIdGenerator;
pub use store::ReplayingRecordStore;
