//! Record store port: a durable byte store keyed by path segments.

use std::error::Error;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Error type returned by store adapters.
pub type PortError = Box<dyn Error + Send + Sync>;

/// Boxed future type alias used by [`RecordStore`] to keep the trait dyn-compatible.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PortError>> + Send + 'a>>;

/// Result of an idempotent directory creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirStatus {
    /// The directory was created by this call.
    Created,
    /// The directory was already there.
    AlreadyPresent,
}

/// Result of a create-exclusive record write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateOutcome {
    /// The record did not exist and now holds the given contents.
    Created,
    /// A record was already present; nothing was written.
    AlreadyExists,
}

/// Durable storage for identity records.
///
/// "Already exists" on directory creation and "not found" on read are
/// expected outcomes and are reported through `Ok` values, never as errors.
pub trait RecordStore: Send + Sync {
    /// Creates a directory, along with any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than the directory already
    /// being present (permissions, a file in the way, disk full, etc.).
    fn create_dir<'a>(&'a self, path: &'a Path) -> StoreFuture<'a, DirStatus>;

    /// Reads a record as UTF-8 text, returning `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read.
    fn read_record<'a>(&'a self, path: &'a Path) -> StoreFuture<'a, Option<String>>;

    /// Creates a record holding `contents`, failing softly if one exists.
    ///
    /// Implementations must be atomic: a concurrent reader observes either
    /// no record or the complete contents, and of several concurrent
    /// creators exactly one gets [`CreateOutcome::Created`].
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be written.
    fn create_record<'a>(
        &'a self,
        path: &'a Path,
        contents: &'a str,
    ) -> StoreFuture<'a, CreateOutcome>;
}
