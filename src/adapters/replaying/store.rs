//! Replaying adapter for the `RecordStore` port.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cassette::format::Port;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::store::{CreateOutcome, DirStatus, PortError, RecordStore, StoreFuture};

/// Replays recorded store operations from a cassette.
///
/// Paths are not checked against the recording; calls are matched by
/// method and order only.
pub struct ReplayingRecordStore {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingRecordStore {
    /// Creates a new replaying store from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn next_output(&self, method: &str) -> Value {
        let mut replayer = self.replayer.lock().unwrap_or_else(PoisonError::into_inner);
        replayer.next_interaction(Port::Store.as_str(), method).output.clone()
    }
}

/// Decodes `{"Ok": value}` / `{"Err": message}` into a port result.
fn replay_result<T: DeserializeOwned>(output: Value, method: &str) -> Result<T, PortError> {
    if let Some(err) = output.get("Err") {
        return Err(err.as_str().unwrap_or("unknown error").to_string().into());
    }
    let value = output.get("Ok").cloned().unwrap_or(output);
    serde_json::from_value(value)
        .map_err(|e| format!("store::{method}: failed to deserialize: {e}").into())
}

impl RecordStore for ReplayingRecordStore {
    fn create_dir<'a>(&'a self, _path: &'a Path) -> StoreFuture<'a, DirStatus> {
        let output = self.next_output("create_dir");
        Box::pin(async move { replay_result::<DirStatus>(output, "create_dir") })
    }

    fn read_record<'a>(&'a self, _path: &'a Path) -> StoreFuture<'a, Option<String>> {
        let output = self.next_output("read_record");
        Box::pin(async move { replay_result::<Option<String>>(output, "read_record") })
    }

    fn create_record<'a>(
        &'a self,
        _path: &'a Path,
        _contents: &'a str,
    ) -> StoreFuture<'a, CreateOutcome> {
        let output = self.next_output("create_record");
        Box::pin(async move { replay_result::<CreateOutcome>(output, "create_record") })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn store_with(calls: Vec<(&str, Value)>) -> ReplayingRecordStore {
        let interactions = calls
            .into_iter()
            .zip(0..)
            .map(|((method, output), seq)| Interaction {
                seq,
                port: "store".into(),
                method: method.into(),
                input: json!(null),
                output,
            })
            .collect();
        let cassette = Cassette { name: "test".into(), recorded_at: Utc::now(), interactions };
        ReplayingRecordStore::new(CassetteReplayer::new(&cassette))
    }

    #[tokio::test]
    async fn replays_each_method() {
        let store = store_with(vec![
            ("create_dir", json!({"Ok": "already_present"})),
            ("read_record", json!({"Ok": null})),
            ("create_record", json!({"Ok": "created"})),
        ]);
        let p = Path::new("/any");

        assert_eq!(store.create_dir(p).await.unwrap(), DirStatus::AlreadyPresent);
        assert_eq!(store.read_record(p).await.unwrap(), None);
        assert_eq!(store.create_record(p, "x").await.unwrap(), CreateOutcome::Created);
    }

    #[tokio::test]
    async fn replays_recorded_error() {
        let store = store_with(vec![("read_record", json!({"Err": "Permission denied"}))]);

        let err = store.read_record(Path::new("/any")).await.unwrap_err();
        assert_eq!(err.to_string(), "Permission denied");
    }
}
