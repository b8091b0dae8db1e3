//! Stable per-host instance identifiers for named agents.
//!
//! [`identity::IdentityStore`] resolves `(host id, agent name)` to an
//! instance ID, creating and persisting one on first use. Storage and ID
//! generation are reached through the traits in [`ports`].

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod identity;
pub mod ports;

pub use config::StoreConfig;
pub use context::ServiceContext;
pub use error::{IdentityError, Phase};
pub use identity::{IdentityStore, InstanceId};

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub async fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli).await
}
