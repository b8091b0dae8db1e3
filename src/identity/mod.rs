//! Identity store: stable per-host instance IDs for named agents.
//!
//! Records live at:
//!
//! ```text
//! <root>/
//!   └── <host_id>/
//!       └── agents/
//!           └── <agent_name>/
//!               └── instance_uuid     "<instance id>\n"
//! ```
//!
//! A record is created at most once and never rewritten. Concurrent first
//! use of the same pair is settled by the store's exclusive create: the
//! loser discards its generated ID and returns the winner's.

mod types;

pub use types::{AgentName, HostId, InstanceId};

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::context::ServiceContext;
use crate::error::{IdentityError, Phase};
use crate::ports::store::{CreateOutcome, DirStatus};

/// Directory under each host that holds per-agent directories.
pub const AGENTS_DIR: &str = "agents";
/// File name of an identity record.
pub const RECORD_FILE: &str = "instance_uuid";

/// Resolves and persists instance IDs.
///
/// All I/O goes through `ctx.store`, so the store works with live,
/// in-memory, recording, and replaying adapters. Nothing is cached between
/// calls.
pub struct IdentityStore<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
}

/// Paths derived from one (host, agent) pair.
struct RecordPaths {
    agents_dir: PathBuf,
    agent_dir: PathBuf,
    record: PathBuf,
}

impl<'a> IdentityStore<'a> {
    /// Creates a store rooted at the configured path.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &StoreConfig) -> Self {
        Self { ctx, root: config.root.clone() }
    }

    /// Returns the instance ID for `(host_id, agent_name)`, creating and
    /// persisting a new one on first use.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidArgument`] for a malformed host ID or
    /// agent name (storage is not touched), and [`IdentityError::Storage`]
    /// naming the failed phase for any storage failure.
    pub async fn get_or_create_instance_id(
        &self,
        host_id: &str,
        agent_name: &str,
    ) -> Result<InstanceId, IdentityError> {
        let paths = self.paths(host_id, agent_name)?;

        self.ensure_dir(&paths.agents_dir).await?;
        self.ensure_dir(&paths.agent_dir).await?;

        if let Some(id) = self.read(&paths.record).await? {
            debug!(path = %paths.record.display(), instance_id = %id, "found identity record");
            return Ok(id);
        }

        let candidate = InstanceId::generated(self.ctx.id_gen.new_instance_id());
        let outcome = self
            .ctx
            .store
            .create_record(&paths.record, &candidate.to_record())
            .await
            .map_err(|e| IdentityError::storage(Phase::WriteRecord, &paths.record, e))?;

        match outcome {
            CreateOutcome::Created => {
                info!(
                    host_id,
                    agent_name,
                    instance_id = %candidate,
                    "created identity record"
                );
                Ok(candidate)
            }
            CreateOutcome::AlreadyExists => {
                let existing = self.read(&paths.record).await?.ok_or_else(|| {
                    IdentityError::storage(
                        Phase::WriteRecord,
                        &paths.record,
                        "record reported as existing but could not be found",
                    )
                })?;
                warn!(
                    host_id,
                    agent_name,
                    discarded = %candidate,
                    instance_id = %existing,
                    "concurrent creator won; using its identity record"
                );
                Ok(existing)
            }
        }
    }

    /// Returns the persisted instance ID without creating anything.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidArgument`] for malformed arguments and
    /// [`IdentityError::Storage`] if the record exists but cannot be read.
    pub async fn lookup_instance_id(
        &self,
        host_id: &str,
        agent_name: &str,
    ) -> Result<Option<InstanceId>, IdentityError> {
        let paths = self.paths(host_id, agent_name)?;
        self.read(&paths.record).await
    }

    /// Returns the record path for `(host_id, agent_name)`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidArgument`] for malformed arguments.
    pub fn record_path(&self, host_id: &str, agent_name: &str) -> Result<PathBuf, IdentityError> {
        Ok(self.paths(host_id, agent_name)?.record)
    }

    fn paths(&self, host_id: &str, agent_name: &str) -> Result<RecordPaths, IdentityError> {
        let host = HostId::parse(host_id)?;
        let agent = AgentName::parse(agent_name)?;
        let agents_dir = self.root.join(host.as_str()).join(AGENTS_DIR);
        let agent_dir = agents_dir.join(agent.as_str());
        let record = agent_dir.join(RECORD_FILE);
        Ok(RecordPaths { agents_dir, agent_dir, record })
    }

    async fn ensure_dir(&self, path: &Path) -> Result<(), IdentityError> {
        let status = self
            .ctx
            .store
            .create_dir(path)
            .await
            .map_err(|e| IdentityError::storage(Phase::ProvisionDirectory, path, e))?;
        if status == DirStatus::Created {
            debug!(path = %path.display(), "created directory");
        }
        Ok(())
    }

    async fn read(&self, record: &Path) -> Result<Option<InstanceId>, IdentityError> {
        let contents = self
            .ctx
            .store
            .read_record(record)
            .await
            .map_err(|e| IdentityError::storage(Phase::ReadRecord, record, e))?;
        Ok(contents.map(|c| InstanceId::from_record(&c)))
    }
}
