//! Recording session shared by the recording adapters of one context.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::recorder::CassetteRecorder;

/// Owns the recorder that every recording adapter in a context writes to.
///
/// Drop the context before calling [`RecordingSession::finish`], so the
/// adapters release their handles.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Starts a session that will write its cassette to `path`.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self { recorder: Arc::new(Mutex::new(CassetteRecorder::new(path, name))) }
    }

    /// A handle for a recording adapter.
    #[must_use]
    pub fn recorder(&self) -> Arc<Mutex<CassetteRecorder>> {
        Arc::clone(&self.recorder)
    }

    /// Writes the cassette file and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if adapters still hold the recorder or the file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "recording adapters still hold the recorder".to_string())?
            .into_inner()
            .map_err(|e| format!("recorder lock poisoned: {e}"))?;
        let path = recorder.path().to_path_buf();
        recorder.finish().map_err(|e| format!("failed to write cassette {}: {e}", path.display()))
    }
}
