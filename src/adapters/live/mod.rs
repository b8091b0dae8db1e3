//! Live adapters for real external interactions.

pub mod id_gen;
pub mod store;

pub use id_gen::LiveIdGenerator;
pub use store::LiveRecordStore;
