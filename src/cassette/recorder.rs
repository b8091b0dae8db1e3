//! Accumulates port interactions and writes them out as a cassette.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;

use super::format::{Cassette, Interaction, Port};

/// Collects the interactions of one session into a cassette bound for
/// `path`.
///
/// The cassette is stamped when the recorder is created, so
/// `recorded_at` marks the start of the session.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    cassette: Cassette,
}

impl CassetteRecorder {
    /// Starts an empty cassette named `name`.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let cassette =
            Cassette { name: name.into(), recorded_at: Utc::now(), interactions: Vec::new() };
        Self { path: path.into(), cassette }
    }

    /// Where [`CassetteRecorder::finish`] will write.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cassette.interactions.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cassette.interactions.is_empty()
    }

    /// Appends one call on `port`. Sequence numbers follow call order
    /// across all ports.
    pub fn record(&mut self, port: Port, method: &str, input: Value, output: Value) {
        let seq = self.cassette.interactions.len() as u64;
        self.cassette.interactions.push(Interaction {
            seq,
            port: port.as_str().to_string(),
            method: method.to_string(),
            input,
            output,
        });
    }

    /// Writes the cassette as YAML, creating missing parent directories,
    /// and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be serialized or written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let yaml = serde_yaml::to_string(&self.cassette).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}
