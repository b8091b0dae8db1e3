//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the identity core and an
//! external system (durable storage, ID generation). Implementations live
//! in `src/adapters/`.

pub mod id_gen;
pub mod store;

pub use id_gen::IdGenerator;
pub use store::{CreateOutcome, DirStatus, PortError, RecordStore, StoreFuture};
