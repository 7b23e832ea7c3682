//! CLI module for chzzk-bridge-tail.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - Tailing a channel and unsubscribing
//!
//! ```ignore
//! use chzzk_bridge_client::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args())?;
//! run_cli_command(command).await?;
//! ```

pub mod args;
pub mod tail;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, USAGE};
pub use tail::{tail_channel, unsubscribe_channel, TailOutcome};
pub use version::{handle_version_command, VERSION};

use color_eyre::Result;

use crate::BridgeClient;

/// Run a parsed CLI command to completion.
///
/// Tailing stops on Ctrl-C.
pub async fn run_cli_command(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => println!("{}", USAGE),
        CliCommand::Unsubscribe { base_url, channel } => {
            let client = BridgeClient::new(base_url)?;
            let removed = unsubscribe_channel(&client, channel).await?;
            println!("{}", if removed { "unsubscribed" } else { "no subscription" });
        }
        CliCommand::Tail {
            base_url,
            channel,
            last_event_id,
        } => {
            let client = BridgeClient::new(base_url)?;
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "failed to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            };
            match tail_channel(&client, channel, last_event_id, shutdown, std::io::stdout()).await? {
                TailOutcome::AuthRequired { path } => {
                    println!("authorization required, visit: {}", path);
                }
                TailOutcome::Stopped {
                    last_event_id: Some(id),
                } => {
                    eprintln!("resume with --last-event-id {}", id);
                }
                TailOutcome::Stopped { last_event_id: None } => {}
            }
        }
    }
    Ok(())
}
