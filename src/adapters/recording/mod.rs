//! Recording adapters that capture interactions to a cassette.
//!
//! Results are stored as `{"Ok": value}` or `{"Err": message}`, the shape
//! the replaying adapters expect.

pub mod id_gen;
pub mod store;

pub use id_gen::RecordingIdGenerator;
pub use store::RecordingRecordStore;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::{json, Value};

use crate::cassette::format::Port;
use crate::cassette::recorder::CassetteRecorder;

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| json!({ "unserializable": e.to_string() }))
}

/// Record an interaction with a plain return value.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: Port,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.record(port, method, to_json(input), to_json(output));
}

/// Record a `Result` interaction using the `Ok`/`Err` convention.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: Port,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let output = match result {
        Ok(v) => json!({ "Ok": to_json(v) }),
        Err(e) => json!({ "Err": e.to_string() }),
    };
    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.record(port, method, to_json(input), output);
}
