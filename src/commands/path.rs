//! `agentid path` command.

use crate::cli::Target;
use crate::config::StoreConfig;
use crate::context::ServiceContext;
use crate::identity::IdentityStore;

use super::{render, IdentityReport};

/// Execute the `path` command: print the record location.
///
/// # Errors
///
/// Returns an error string if the arguments are invalid.
pub fn run(
    ctx: &ServiceContext,
    config: &StoreConfig,
    target: &Target,
    json: bool,
) -> Result<String, String> {
    let path = IdentityStore::new(ctx, config)
        .record_path(&target.host_id, &target.agent_name)
        .map_err(|e| e.to_string())?
        .display()
        .to_string();

    let report = IdentityReport {
        host_id: &target.host_id,
        agent_name: &target.agent_name,
        instance_id: None,
        path: path.clone(),
    };
    render(&report, json, &path)
}
