//! Command dispatch and handlers.

pub mod get;
pub mod path;
pub mod show;

use std::env;
use std::path::PathBuf;

use serde::Serialize;

use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::StoreConfig;
use crate::context::ServiceContext;

/// Environment variable naming a cassette file to record port calls into.
pub const RECORD_ENV: &str = "AGENTID_RECORD";

/// One resolved identity, as printed by `--json`.
#[derive(Debug, Serialize)]
pub struct IdentityReport<'a> {
    /// Host UUID.
    pub host_id: &'a str,
    /// Agent name.
    pub agent_name: &'a str,
    /// Instance ID, absent for `path`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<&'a str>,
    /// Record path.
    pub path: String,
}

/// Dispatch a parsed command to its handler and print its output.
///
/// When `AGENTID_RECORD` is set to a file path, all port interactions are
/// recorded to a cassette at that path.
///
/// # Errors
///
/// Returns an error string if configuration fails or the handler fails.
pub async fn dispatch(cli: &Cli) -> Result<(), String> {
    let config =
        StoreConfig::resolve(cli.root.as_deref(), cli.config.as_deref()).map_err(|e| e.to_string())?;

    let (ctx, session) = match env::var_os(RECORD_ENV) {
        Some(path) => {
            let (ctx, session) = ServiceContext::recording_at(&PathBuf::from(path));
            (ctx, Some(session))
        }
        None => (ServiceContext::live(), None),
    };

    let result = dispatch_with_context(cli, &ctx, &config).await;

    // Finish recording even when the command failed.
    if let Some(session) = session {
        drop(ctx);
        let path = session.finish()?;
        tracing::info!(path = %path.display(), "recording saved");
    }

    println!("{}", result?);
    Ok(())
}

/// Run a command with the given context, returning the text to print.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub async fn dispatch_with_context(
    cli: &Cli,
    ctx: &ServiceContext,
    config: &StoreConfig,
) -> Result<String, String> {
    match &cli.command {
        Command::Get(target) => get::run(ctx, config, target, cli.json).await,
        Command::Show(target) => show::run(ctx, config, target, cli.json).await,
        Command::Path(target) => path::run(ctx, config, target, cli.json),
    }
}

/// Render a report as JSON or as the given plain-text line.
fn render(report: &IdentityReport<'_>, json: bool, plain: &str) -> Result<String, String> {
    if json {
        serde_json::to_string(report).map_err(|e| format!("Failed to encode output: {e}"))
    } else {
        Ok(plain.to_string())
    }
}
