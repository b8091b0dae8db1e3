//! Recording adapter for the `RecordStore` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::format::Port;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::store::{CreateOutcome, DirStatus, RecordStore, StoreFuture};

/// Records store interactions while delegating to an inner implementation.
pub struct RecordingRecordStore {
    inner: Box<dyn RecordStore>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingRecordStore {
    /// Creates a new recording store wrapping the given implementation.
    pub fn new(inner: Box<dyn RecordStore>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PathInput {
    path: String,
}

#[derive(Serialize)]
struct CreateInput<'a> {
    path: String,
    contents: &'a str,
}

impl RecordStore for RecordingRecordStore {
    fn create_dir<'a>(&'a self, path: &'a Path) -> StoreFuture<'a, DirStatus> {
        Box::pin(async move {
            let result = self.inner.create_dir(path).await;
            let input = PathInput { path: path.display().to_string() };
            record_result(&self.recorder, Port::Store, "create_dir", &input, &result);
            result
        })
    }

    fn read_record<'a>(&'a self, path: &'a Path) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            let result = self.inner.read_record(path).await;
            let input = PathInput { path: path.display().to_string() };
            record_result(&self.recorder, Port::Store, "read_record", &input, &result);
            result
        })
    }

    fn create_record<'a>(
        &'a self,
        path: &'a Path,
        contents: &'a str,
    ) -> StoreFuture<'a, CreateOutcome> {
        Box::pin(async move {
            let result = self.inner.create_record(path, contents).await;
            let input = CreateInput { path: path.display().to_string(), contents };
            record_result(&self.recorder, Port::Store, "create_record", &input, &result);
            result
        })
    }
}
