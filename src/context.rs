//! Service context bundling the port trait objects.

use std::path::Path;

use crate::adapters::live::{LiveIdGenerator, LiveRecordStore};
use crate::adapters::recording::{RecordingIdGenerator, RecordingRecordStore};
use crate::adapters::replaying::{ReplayingIdGenerator, ReplayingRecordStore};
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::ports::id_gen::IdGenerator;
use crate::ports::store::RecordStore;

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying, or caller-supplied).
pub struct ServiceContext {
    /// Durable store for identity records.
    pub store: Box<dyn RecordStore>,
    /// Generator for new instance IDs.
    pub id_gen: Box<dyn IdGenerator>,
}

impl ServiceContext {
    /// Creates a context backed by the real filesystem and random UUIDs.
    #[must_use]
    pub fn live() -> Self {
        Self::with_ports(Box::new(LiveRecordStore), Box::new(LiveIdGenerator))
    }

    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn with_ports(store: Box<dyn RecordStore>, id_gen: Box<dyn IdGenerator>) -> Self {
        Self { store, id_gen }
    }

    /// Creates a live context that records every port interaction.
    ///
    /// The cassette is written to `path` by [`RecordingSession::finish`]
    /// once the context has been dropped.
    #[must_use]
    pub fn recording_at(path: &Path) -> (Self, RecordingSession) {
        let session = RecordingSession::new(path, "agentid-session");
        let ctx = Self::with_ports(
            Box::new(RecordingRecordStore::new(Box::new(LiveRecordStore), session.recorder())),
            Box::new(RecordingIdGenerator::new(
                Box::new(LiveIdGenerator),
                session.recorder(),
            )),
        );
        (ctx, session)
    }

    /// Creates a context that serves every port call from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        Ok(Self::from_cassette(&cassette))
    }

    /// Creates a replaying context from an already loaded cassette.
    ///
    /// Each port gets its own replayer so per-port cursors are independent.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        Self::with_ports(
            Box::new(ReplayingRecordStore::new(CassetteReplayer::new(cassette))),
            Box::new(ReplayingIdGenerator::new(CassetteReplayer::new(cassette))),
        )
    }
}
