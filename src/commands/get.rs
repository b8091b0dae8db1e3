//! `agentid get` command.

use crate::cli::Target;
use crate::config::StoreConfig;
use crate::context::ServiceContext;
use crate::identity::IdentityStore;

use super::{render, IdentityReport};

/// Execute the `get` command: resolve the instance ID, creating it if needed.
///
/// # Errors
///
/// Returns an error string if the arguments are invalid or storage fails.
pub async fn run(
    ctx: &ServiceContext,
    config: &StoreConfig,
    target: &Target,
    json: bool,
) -> Result<String, String> {
    let store = IdentityStore::new(ctx, config);
    let id = store
        .get_or_create_instance_id(&target.host_id, &target.agent_name)
        .await
        .map_err(|e| e.to_string())?;
    let path = store.record_path(&target.host_id, &target.agent_name).map_err(|e| e.to_string())?;

    let report = IdentityReport {
        host_id: &target.host_id,
        agent_name: &target.agent_name,
        instance_id: Some(id.as_str()),
        path: path.display().to_string(),
    };
    render(&report, json, id.as_str())
}
